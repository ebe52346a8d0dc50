//! The single forward pass: resolve the organization, fetch inventory and
//! telemetry, classify, and emit the workbook.

use std::collections::HashMap;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::info;

use meraki_api::types::{Device, SwitchPortStatus};
use meraki_api::{DashboardClient, TransportConfig};
use poe_report_core::{availability_index, build_report, network_name_index};

use crate::config::Config;
use crate::error::CliError;
use crate::workbook;

/// Trailing window for port telemetry: power figures aggregate the last
/// hour rather than a single instant.
const PORT_STATUS_TIMESPAN_SECS: u64 = 3600;

/// Per-switch telemetry requests in flight at once. Results are keyed by
/// serial, so completion order never affects the report.
const TELEMETRY_CONCURRENCY: usize = 8;

pub async fn run(config: &Config) -> Result<(), CliError> {
    let transport = TransportConfig {
        timeout: config.timeout(),
    };
    let client = DashboardClient::from_api_key(&config.base_url, &config.api_key, &transport)?;

    let org_id = resolve_org_id(&client, &config.org_name).await?;
    println!("Retrieved organization ID");

    let networks = client.list_organization_networks(&org_id).await?;
    println!("Retrieved networks from the organization");

    let switches = client
        .list_organization_devices(&org_id, &["switch"])
        .await?;
    println!("Retrieved switches from the organization");

    let port_statuses = fetch_port_statuses(&client, &switches).await?;
    println!("Retrieved port statuses from the switches");

    let availabilities = client
        .list_device_availabilities(&org_id, &["switch"])
        .await?;
    println!("Retrieved availabilities of switches");

    let buckets = build_report(
        &switches,
        &network_name_index(&networks),
        &availability_index(&availabilities),
        &port_statuses,
    )?;
    info!(
        switches = buckets.switch_count(),
        ports = buckets.port_count(),
        "classified report buckets"
    );

    println!("Starting to create Excel workbook");
    workbook::write_workbook(&buckets, &config.output)?;
    println!("Created Excel workbook {}", config.output.display());

    Ok(())
}

/// Resolve the organization id by exact name match; the first match wins.
async fn resolve_org_id(client: &DashboardClient, org_name: &str) -> Result<String, CliError> {
    let organizations = client.list_organizations().await?;

    organizations
        .into_iter()
        .find(|org| org.name == org_name)
        .map(|org| org.id)
        .ok_or_else(|| CliError::OrganizationNotFound {
            name: org_name.to_owned(),
        })
}

/// Fetch per-port telemetry for every switch, one request per device with
/// bounded concurrency, keyed by serial.
async fn fetch_port_statuses(
    client: &DashboardClient,
    switches: &[Device],
) -> Result<HashMap<String, Vec<SwitchPortStatus>>, CliError> {
    let mut responses = stream::iter(switches.iter().map(|switch| {
        let serial = switch.serial.clone();
        async move {
            let ports = client
                .get_switch_port_statuses(&serial, PORT_STATUS_TIMESPAN_SECS)
                .await?;
            Ok::<_, meraki_api::Error>((serial, ports))
        }
    }))
    .buffer_unordered(TELEMETRY_CONCURRENCY);

    let mut by_serial = HashMap::with_capacity(switches.len());
    while let Some(response) = responses.next().await {
        let (serial, ports) = response?;
        by_serial.insert(serial, ports);
    }

    Ok(by_serial)
}
