//! Workbook emission: six sheets, one per report bucket.
//!
//! The workbook is assembled fully in memory and written once with
//! `Workbook::save`, so a failed run can never leave a truncated or locked
//! file behind.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use poe_report_core::{PortRecord, ReportBuckets, SwitchRecord};

const SWITCH_COLUMNS: [&str; 6] = ["serial", "name", "model", "network", "status", "powerUsageWh"];
const PORT_COLUMNS: [&str; 5] = ["portId", "switchSerial", "enabled", "portStatus", "powerUsageWh"];

/// Write all six sheets, in the fixed order and with the fixed labels the
/// report promises. Empty buckets still get a (headered) sheet.
pub fn write_workbook(buckets: &ReportBuckets, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    switch_sheet(workbook.add_worksheet(), "Low Power Switches", &buckets.low_poe, &header)?;
    switch_sheet(workbook.add_worksheet(), "High Power Switches", &buckets.high_poe, &header)?;
    switch_sheet(workbook.add_worksheet(), "No Power Switches", &buckets.no_poe, &header)?;
    port_sheet(workbook.add_worksheet(), "Switchport Power Usage", &buckets.poe_ports, &header)?;
    port_sheet(workbook.add_worksheet(), "Disconnected Ports", &buckets.disconnected_ports, &header)?;
    switch_sheet(workbook.add_worksheet(), "Offline Switches", &buckets.offline_switches, &header)?;

    workbook.save(path)
}

/// Sheet layout shared by both record kinds: a blank-headed row-index
/// column, then the record's fields.
fn write_headers(sheet: &mut Worksheet, columns: &[&str], header: &Format) -> Result<(), XlsxError> {
    for (col, label) in (1u16..).zip(columns) {
        sheet.write_string_with_format(0, col, *label, header)?;
    }
    Ok(())
}

fn switch_sheet(
    sheet: &mut Worksheet,
    name: &str,
    records: &[SwitchRecord],
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(name)?;
    write_headers(sheet, &SWITCH_COLUMNS, header)?;

    let mut row: u32 = 1;
    for record in records {
        sheet.write_number(row, 0, f64::from(row - 1))?;
        sheet.write_string(row, 1, &record.serial)?;
        sheet.write_string(row, 2, &record.name)?;
        sheet.write_string(row, 3, &record.model)?;
        sheet.write_string(row, 4, &record.network)?;
        sheet.write_string(row, 5, record.status.as_str())?;
        sheet.write_number(row, 6, record.power_usage_wh)?;
        row += 1;
    }

    Ok(())
}

fn port_sheet(
    sheet: &mut Worksheet,
    name: &str,
    records: &[PortRecord],
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(name)?;
    write_headers(sheet, &PORT_COLUMNS, header)?;

    let mut row: u32 = 1;
    for record in records {
        sheet.write_number(row, 0, f64::from(row - 1))?;
        sheet.write_string(row, 1, &record.port_id)?;
        sheet.write_string(row, 2, &record.switch_serial)?;
        sheet.write_boolean(row, 3, record.enabled)?;
        sheet.write_string(row, 4, &record.port_status)?;
        sheet.write_number(row, 5, record.power_usage_wh)?;
        row += 1;
    }

    Ok(())
}
