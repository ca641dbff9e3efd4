//! Command handlers

use std::path::PathBuf;

use carbook_app::app::{add_preset, import_file, resolve_record, resolve_vehicle};
use carbook_app::config::Config;
use carbook_app::export::export_schedule_to_excel;
use carbook_app::repository::open_vehicle_store;
use carbook_domain::model::PRESETS;
use carbook_domain::service::{check_due, format_miles};
use carbook_infra::legacy_importer::ImportMode;
use carbook_infra::persistence::FileSlotStorage;
use carbook_store::VehicleStore;
use carbook_types::{
    Error, MaintenanceDraft, NewMaintenance, OutputFormat, Result, VehicleDraft,
};
use chrono::Utc;

use crate::cli::{Cli, Commands, VehicleCommand};
use crate::output::{
    output_due_report, output_presets, output_vehicle_added, output_vehicle_detail,
    output_vehicle_list,
};

type Store = VehicleStore<FileSlotStorage>;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Config {
            show,
            set_data_dir,
            set_output,
            reset,
        } => cmd_config(show, set_data_dir, set_output, reset),
        Commands::Vehicles(command) => {
            let mut store = open_vehicle_store(&config)?;
            run(&mut store, command, output_format)
        }
    }
}

fn run(store: &mut Store, command: VehicleCommand, output_format: OutputFormat) -> Result<()> {
    match command {
        VehicleCommand::AddVehicle {
            make,
            model,
            year,
            vin,
            mileage,
        } => {
            let draft = VehicleDraft {
                make,
                model,
                year,
                vin,
                mileage,
            };
            let added = store.add_vehicle(&draft)?;
            output_vehicle_added(output_format, added.as_ref())
        }

        VehicleCommand::List => output_vehicle_list(output_format, &store.list()),

        VehicleCommand::Show { vehicle } => {
            let id = resolve_vehicle(store, &vehicle)?;
            let vehicle = store
                .get(id)
                .ok_or_else(|| Error::NotFound(format!("vehicle {}", id)))?;
            output_vehicle_detail(output_format, vehicle)
        }

        VehicleCommand::Mileage { vehicle, value } => cmd_mileage(store, &vehicle, &value),

        VehicleCommand::RemoveVehicle { vehicle } => cmd_remove_vehicle(store, &vehicle),

        VehicleCommand::AddMaintenance {
            vehicle,
            kind,
            due,
            last_done,
            notes,
        } => {
            let draft = MaintenanceDraft {
                kind,
                due_miles: due,
                last_done,
                notes,
            };
            cmd_add_maintenance(store, &vehicle, &draft)
        }

        VehicleCommand::Preset { vehicle, preset } => {
            let id = resolve_vehicle(store, &vehicle)?;
            let today = Utc::now().date_naive();
            match add_preset(store, id, &preset, today)? {
                Some(record) => println!(
                    "Added {} due @ {} mi",
                    record.kind,
                    format_miles(record.due_miles)
                ),
                None => println!("Vehicle {} no longer exists.", id),
            }
            Ok(())
        }

        VehicleCommand::RemoveMaintenance { vehicle, record } => {
            cmd_remove_maintenance(store, &vehicle, &record)
        }

        VehicleCommand::Presets => output_presets(output_format, PRESETS),

        VehicleCommand::Due => output_due_report(output_format, &check_due(&store.list())),

        VehicleCommand::Export { output } => cmd_export(store, output),

        VehicleCommand::Import {
            file,
            refresh,
            dry_run,
        } => cmd_import(store, file, refresh, dry_run),
    }
}

fn cmd_mileage(store: &mut Store, query: &str, value: &str) -> Result<()> {
    let id = resolve_vehicle(store, query)?;
    if store.update_mileage(id, value)? {
        if let Some(v) = store.get(id) {
            println!(
                "{} now at {} mi",
                v.display_name(),
                format_miles(v.mileage)
            );
        }
    }
    Ok(())
}

fn cmd_remove_vehicle(store: &mut Store, query: &str) -> Result<()> {
    let id = resolve_vehicle(store, query)?;
    let (name, records) = match store.get(id) {
        Some(v) => (v.display_name(), v.maintenance.len()),
        None => return Ok(()),
    };
    if store.remove_vehicle(id)? {
        println!("Removed {} ({} maintenance records)", name, records);
    }
    Ok(())
}

fn cmd_add_maintenance(store: &mut Store, query: &str, draft: &MaintenanceDraft) -> Result<()> {
    let id = resolve_vehicle(store, query)?;
    match store.add_maintenance(id, NewMaintenance::from_draft(draft))? {
        Some(record) if record.due_miles > 0 => println!(
            "Added {} due @ {} mi ({})",
            record.kind,
            format_miles(record.due_miles),
            record.id
        ),
        Some(record) => println!("Added {} ({})", record.kind, record.id),
        None => println!("Nothing added: a maintenance record needs a type or a due mileage."),
    }
    Ok(())
}

fn cmd_remove_maintenance(store: &mut Store, vehicle_query: &str, record_query: &str) -> Result<()> {
    let vehicle_id = resolve_vehicle(store, vehicle_query)?;
    let vehicle = store
        .get(vehicle_id)
        .ok_or_else(|| Error::NotFound(format!("vehicle {}", vehicle_id)))?;
    let record_id = resolve_record(vehicle, record_query)?;
    let kind = vehicle
        .find_record(record_id)
        .map(|r| r.kind.clone())
        .unwrap_or_default();

    if store.remove_maintenance(vehicle_id, record_id)? {
        println!("Removed {} from {}", kind, vehicle_id);
    }
    Ok(())
}

fn cmd_export(store: &Store, output: PathBuf) -> Result<()> {
    let vehicles = store.list();
    if vehicles.is_empty() {
        println!("No vehicles to export.");
        return Ok(());
    }
    export_schedule_to_excel(&vehicles, &output)?;
    println!("Exported {} vehicles to: {}", vehicles.len(), output.display());
    Ok(())
}

fn cmd_import(store: &mut Store, file: PathBuf, refresh: bool, dry_run: bool) -> Result<()> {
    let mode = if refresh {
        ImportMode::Refresh
    } else {
        ImportMode::Append
    };
    let outcome = import_file(store, &file, mode, dry_run)?;

    println!("{}", outcome.summary);
    if outcome.dry_run {
        println!("[DRY RUN] Nothing was written.");
    }
    let result = &outcome.result;
    if mode == ImportMode::Refresh {
        println!("Cleared:             {}", result.cleared);
    }
    println!("Vehicles imported:   {}", result.vehicles_imported);
    println!("Records imported:    {}", result.records_imported);
    println!("Skipped:             {}", result.skipped);
    Ok(())
}

fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbook_app::repository::open_vehicle_store_at;
    use carbook_domain::service::generate_due_report;
    use clap::Parser;
    use tempfile::{tempdir, TempDir};
    use uuid::Uuid;

    fn temp_store() -> (TempDir, Store) {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = open_vehicle_store_at(temp_dir.path().to_path_buf()).expect("Failed to open store");
        (temp_dir, store)
    }

    fn exec(store: &mut Store, args: &[&str]) -> Result<()> {
        let argv = std::iter::once("carbook").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).expect("valid arguments");
        match cli.command {
            Commands::Vehicles(command) => run(store, command, OutputFormat::Table),
            Commands::Config { .. } => panic!("config does not use the store"),
        }
    }

    fn add_civic(store: &mut Store, mileage: &str) -> (Uuid, String) {
        exec(
            store,
            &["add-vehicle", "--make", "Honda", "--model", "Civic", "--mileage", mileage],
        )
        .unwrap();
        let id = store.list()[0].id;
        (id, id.to_string()[..8].to_string())
    }

    #[test]
    fn test_add_vehicle_requires_make_or_model() {
        let (_dir, mut store) = temp_store();
        exec(&mut store, &["add-vehicle", "--year", "2020"]).unwrap();
        assert_eq!(store.count(), 0);

        let (id, _) = add_civic(&mut store, "");
        assert_eq!(store.get(id).unwrap().mileage, 0);
    }

    #[test]
    fn test_mileage_garbage_stores_zero() {
        let (dir, mut store) = temp_store();
        let (id, prefix) = add_civic(&mut store, "30000");

        exec(&mut store, &["mileage", &prefix, "abc"]).unwrap();
        assert_eq!(store.get(id).unwrap().mileage, 0);

        exec(&mut store, &["mileage", &prefix, "41250"]).unwrap();
        exec(&mut store, &["mileage", &prefix, "-5"]).unwrap();
        assert_eq!(store.get(id).unwrap().mileage, 0);

        let reopened = open_vehicle_store_at(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get(id).unwrap().mileage, 0);
    }

    #[test]
    fn test_preset_is_due_one_interval_out() {
        let (_dir, mut store) = temp_store();
        let (id, prefix) = add_civic(&mut store, "30000");

        exec(&mut store, &["preset", &prefix, "oil-change"]).unwrap();
        let record = &store.get(id).unwrap().maintenance[0];
        assert_eq!(record.kind, "Oil Change");
        assert_eq!(record.due_miles, 35000);
        assert_eq!(record.last_done, Some(Utc::now().date_naive()));
        assert_eq!(record.notes, "Preset interval 5,000 mi");

        let err = exec(&mut store, &["preset", &prefix, "Transmission"]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(store.get(id).unwrap().maintenance.len(), 1);
    }

    #[test]
    fn test_remove_maintenance_by_prefix() {
        let (_dir, mut store) = temp_store();
        let (id, prefix) = add_civic(&mut store, "30000");
        exec(
            &mut store,
            &["add-maintenance", &prefix, "--type", "Transmission Service", "--due", "60000"],
        )
        .unwrap();
        exec(&mut store, &["add-maintenance", &prefix, "--due", "45000"]).unwrap();

        let vehicle = store.get(id).unwrap();
        assert_eq!(vehicle.maintenance[0].kind, "Maintenance");
        let transmission = vehicle.maintenance[1].id;
        let record_prefix = transmission.to_string()[..8].to_string();

        exec(&mut store, &["remove-maintenance", &prefix, &record_prefix]).unwrap();
        let kinds: Vec<_> = store
            .get(id)
            .unwrap()
            .maintenance
            .iter()
            .map(|m| m.kind.clone())
            .collect();
        assert_eq!(kinds, vec!["Maintenance"]);

        let err = exec(&mut store, &["remove-maintenance", &prefix, &record_prefix]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_due_reports_overdue_item() {
        let (_dir, mut store) = temp_store();
        let (_, prefix) = add_civic(&mut store, "4800");
        exec(&mut store, &["add-maintenance", &prefix, "--type", "Oil Change", "--due", "4500"]).unwrap();
        exec(&mut store, &["add-maintenance", &prefix, "--type", "Brakes", "--due", "20000"]).unwrap();

        exec(&mut store, &["due"]).unwrap();
        let report = generate_due_report(&check_due(&store.list()));
        assert!(report.contains("Overdue:              1"));
        assert!(report.contains("[Overdue]"));
        assert!(report.contains("300 mi OVER"));
        assert!(!report.contains("[Due Soon]"));
    }

    #[test]
    fn test_remove_vehicle_and_unknown_ids() {
        let (_dir, mut store) = temp_store();
        let (id, prefix) = add_civic(&mut store, "100");

        assert!(matches!(
            exec(&mut store, &["show", "zzzz"]),
            Err(Error::NotFound(_))
        ));
        exec(&mut store, &["show", &prefix]).unwrap();
        exec(&mut store, &["remove-vehicle", &prefix]).unwrap();
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_failed_refresh_import_is_an_error() {
        let (dir, mut store) = temp_store();
        let (id, _) = add_civic(&mut store, "100");

        let backup = dir.path().join("backup.json");
        std::fs::write(
            &backup,
            r#"[{"id": 1, "make": "Ford", "model": "F-150", "mileage": 5, "maintenance": []}]"#,
        )
        .unwrap();
        // A directory on the temp path makes the next write fail
        std::fs::create_dir(dir.path().join("car.vehicles.json.tmp")).unwrap();

        let path = backup.to_string_lossy().to_string();
        let err = exec(&mut store, &["import", &path, "--refresh"]).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(store.get(id).is_some());

        let reopened = open_vehicle_store_at(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.count(), 1);
        assert!(reopened.get(id).is_some());
    }
}
