//! Excel export of the maintenance schedule

use std::path::Path;

use carbook_domain::service::vehicle_schedule;
use carbook_types::{Error, Result, Vehicle};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

fn xlsx(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Write a workbook with a "Vehicles" sheet and a "Maintenance" sheet.
///
/// Maintenance rows follow the display order (ascending due mileage per
/// vehicle) and carry the derived remaining distance and urgency.
pub fn export_schedule_to_excel(vehicles: &[&Vehicle], output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let vehicles_sheet = workbook.add_worksheet();
    write_vehicles_sheet(vehicles_sheet, vehicles)?;

    let maintenance_sheet = workbook.add_worksheet();
    write_maintenance_sheet(maintenance_sheet, vehicles)?;

    workbook.save(output_path).map_err(xlsx)?;
    Ok(())
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(xlsx)?;
    }
    Ok(())
}

fn write_vehicles_sheet(sheet: &mut Worksheet, vehicles: &[&Vehicle]) -> Result<()> {
    sheet.set_name("Vehicles").map_err(xlsx)?;
    write_header(
        sheet,
        &["Vehicle", "Year", "Make", "Model", "VIN", "Mileage", "Records", "Added"],
    )?;

    for (i, v) in vehicles.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, v.display_name()).map_err(xlsx)?;
        sheet.write_string(row, 1, v.year.as_str()).map_err(xlsx)?;
        sheet.write_string(row, 2, v.make.as_str()).map_err(xlsx)?;
        sheet.write_string(row, 3, v.model.as_str()).map_err(xlsx)?;
        sheet.write_string(row, 4, v.vin.as_str()).map_err(xlsx)?;
        sheet.write_number(row, 5, v.mileage as f64).map_err(xlsx)?;
        sheet
            .write_number(row, 6, v.maintenance.len() as f64)
            .map_err(xlsx)?;
        sheet
            .write_string(row, 7, v.created_at.to_rfc3339())
            .map_err(xlsx)?;
    }

    sheet.set_column_width(0, 28).map_err(xlsx)?;
    sheet.set_column_width(4, 20).map_err(xlsx)?;
    Ok(())
}

fn write_maintenance_sheet(sheet: &mut Worksheet, vehicles: &[&Vehicle]) -> Result<()> {
    sheet.set_name("Maintenance").map_err(xlsx)?;
    write_header(
        sheet,
        &["Vehicle", "Type", "Due Miles", "Remaining", "Urgency", "Last Done", "Notes"],
    )?;

    let mut row: u32 = 1;
    for v in vehicles {
        for status in vehicle_schedule(v) {
            let record = &status.record;
            sheet.write_string(row, 0, v.display_name()).map_err(xlsx)?;
            sheet.write_string(row, 1, record.kind.as_str()).map_err(xlsx)?;
            if record.due_miles > 0 {
                sheet
                    .write_number(row, 2, record.due_miles as f64)
                    .map_err(xlsx)?;
            }
            if let Some(remaining) = status.remaining {
                sheet.write_number(row, 3, remaining as f64).map_err(xlsx)?;
            }
            sheet
                .write_string(row, 4, status.urgency.as_str())
                .map_err(xlsx)?;
            if let Some(date) = record.last_done {
                sheet
                    .write_string(row, 5, date.format("%Y-%m-%d").to_string())
                    .map_err(xlsx)?;
            }
            sheet.write_string(row, 6, record.notes.as_str()).map_err(xlsx)?;
            row += 1;
        }
    }

    sheet.set_column_width(0, 28).map_err(xlsx)?;
    sheet.set_column_width(1, 22).map_err(xlsx)?;
    sheet.set_column_width(6, 40).map_err(xlsx)?;
    Ok(())
}
