//! Output formatting module

use carbook_domain::model::MaintenancePreset;
use carbook_domain::service::{
    format_miles, generate_due_report, remaining_label, vehicle_schedule, DueCheckResult,
    MaintenanceStatus, Urgency,
};
use carbook_types::{OutputFormat, Result, Vehicle};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}

/// The most pressing tracked item, for the list view
fn next_due(vehicle: &Vehicle) -> String {
    vehicle_schedule(vehicle)
        .into_iter()
        .find(|s| s.record.due_miles > 0)
        .map(|s| format!("{} ({})", s.record.kind, remaining_label(s.remaining)))
        .unwrap_or_else(|| "-".to_string())
}

pub fn output_vehicle_list(output_format: OutputFormat, vehicles: &[&Vehicle]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(vehicles);
    }
    print!("{}", render_vehicle_list(vehicles));
    Ok(())
}

fn render_vehicle_list(vehicles: &[&Vehicle]) -> String {
    if vehicles.is_empty() {
        return "No vehicles yet.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<28} {:>10} {:>8}  {}\n",
        "ID", "Vehicle", "Mileage", "Records", "Next due"
    ));
    out.push_str(&"-".repeat(84));
    out.push('\n');
    for v in vehicles {
        out.push_str(&format!(
            "{:<10} {:<28} {:>10} {:>8}  {}\n",
            short_id(&v.id),
            v.display_name(),
            format_miles(v.mileage),
            v.maintenance.len(),
            next_due(v)
        ));
    }
    out
}

fn urgency_tag(urgency: Urgency) -> String {
    match urgency {
        Urgency::Unknown => " ".repeat(10),
        _ => format!("{:<10}", format!("[{}]", urgency.label())),
    }
}

fn render_status(out: &mut String, status: &MaintenanceStatus) {
    let record = &status.record;
    if record.due_miles > 0 {
        out.push_str(&format!(
            "{} {}  {}\n",
            urgency_tag(status.urgency),
            record.kind,
            remaining_label(status.remaining)
        ));
    } else {
        out.push_str(&format!("{} {}\n", urgency_tag(status.urgency), record.kind));
    }

    let mut detail = if record.due_miles > 0 {
        format!("Due @ {} mi", format_miles(record.due_miles))
    } else {
        "No due mileage".to_string()
    };
    if let Some(date) = record.last_done {
        detail.push_str(&format!(" • Last done: {}", date.format("%Y-%m-%d")));
    }
    out.push_str(&format!("           {}\n", detail));
    for line in record.notes.lines() {
        out.push_str(&format!("           {}\n", line));
    }
    out.push_str(&format!("           id: {}\n", short_id(&record.id)));
}

pub fn output_vehicle_detail(output_format: OutputFormat, vehicle: &Vehicle) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "vehicle": vehicle,
            "schedule": vehicle_schedule(vehicle),
        }));
    }
    print!("{}", render_vehicle_detail(vehicle));
    Ok(())
}

fn render_vehicle_detail(vehicle: &Vehicle) -> String {
    let schedule = vehicle_schedule(vehicle);
    let name = vehicle.display_name();

    let mut out = String::new();
    out.push_str(&format!("\n{}\n", name));
    out.push_str(&"=".repeat(name.chars().count().max(8)));
    out.push('\n');
    out.push_str(&format!("ID:       {}\n", vehicle.id));
    out.push_str(&format!("VIN:      {}\n", or_dash(&vehicle.vin)));
    out.push_str(&format!("Mileage:  {} mi\n", format_miles(vehicle.mileage)));
    out.push_str(&format!(
        "Added:    {}\n",
        vehicle.created_at.format("%Y-%m-%d %H:%M")
    ));

    out.push_str("\nUpcoming & Logged\n");
    out.push_str("-----------------\n");
    if schedule.is_empty() {
        out.push_str("No maintenance yet.\n");
    }
    for status in &schedule {
        render_status(&mut out, status);
    }
    out
}

pub fn output_vehicle_added(output_format: OutputFormat, vehicle: Option<&Vehicle>) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&vehicle);
    }
    match vehicle {
        Some(v) => println!("Added {} ({})", v.display_name(), v.id),
        None => println!("Nothing added: a vehicle needs a make or a model."),
    }
    Ok(())
}

pub fn output_presets(output_format: OutputFormat, presets: &[MaintenancePreset]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(presets);
    }
    println!("Quick-add Presets");
    println!("=================");
    for p in presets {
        println!("{:<20} +{} mi", p.kind, format_miles(p.interval_miles));
    }
    Ok(())
}

pub fn output_due_report(output_format: OutputFormat, results: &[DueCheckResult]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(results);
    }
    print!("{}", generate_due_report(results));
    Ok(())
}
