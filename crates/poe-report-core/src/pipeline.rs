//! The join & classify pipeline.
//!
//! Pure functions over the four fetched collections: switch inventory,
//! networks, availabilities, and per-switch port statuses. Joins are keyed
//! by switch serial and network id; insertion order never affects the
//! classification.

use std::collections::HashMap;

use tracing::warn;

use meraki_api::types::{AvailabilityStatus, Device, DeviceAvailability, Network, SwitchPortStatus};

use crate::error::PipelineError;
use crate::model::{PortRecord, ReportBuckets, SwitchRecord};

/// Power-bucket boundary in watt-hours over the sampling window: online
/// switches at or below this draw are "low power", above it "high power".
pub const LOW_POWER_MAX_WH: f64 = 67.0;

/// Connection states the pipeline classifies. Anything else is excluded
/// from both port sheets and the power sum (and logged).
const STATE_CONNECTED: &str = "Connected";
const STATE_DISCONNECTED: &str = "Disconnected";

// ── Index builders ───────────────────────────────────────────────────

/// Map network id -> network name for the record-assembly join.
pub fn network_name_index(networks: &[Network]) -> HashMap<String, String> {
    networks
        .iter()
        .map(|n| (n.id.clone(), n.name.clone()))
        .collect()
}

/// Map switch serial -> availability status.
pub fn availability_index(
    availabilities: &[DeviceAvailability],
) -> HashMap<String, AvailabilityStatus> {
    availabilities
        .iter()
        .map(|a| (a.serial.clone(), a.status))
        .collect()
}

// ── Pipeline ─────────────────────────────────────────────────────────

/// Join the fetched collections and classify every switch and port into
/// its report bucket.
///
/// Missing join keys (a switch without an availability entry, without a
/// port-status entry, or referencing a network that was not fetched) are
/// fatal: the collections come from the same organization in the same run,
/// so a hole means the data is inconsistent.
pub fn build_report(
    switches: &[Device],
    network_names: &HashMap<String, String>,
    availabilities: &HashMap<String, AvailabilityStatus>,
    port_statuses: &HashMap<String, Vec<SwitchPortStatus>>,
) -> Result<ReportBuckets, PipelineError> {
    // Step 1: assemble one record per switch, power not yet computed.
    // Step 2: partition by availability -- anything not online is offline.
    let mut online = Vec::new();
    let mut offline = Vec::new();

    for switch in switches {
        let record = assemble_record(switch, network_names, availabilities)?;
        if record.status.is_online() {
            online.push(record);
        } else {
            offline.push(record);
        }
    }

    let mut buckets = ReportBuckets {
        offline_switches: offline,
        ..ReportBuckets::default()
    };

    // Steps 3 + 4: classify ports and bucket each online switch by its
    // aggregate draw. Offline switches are never scanned.
    for mut record in online {
        let ports = port_statuses
            .get(&record.serial)
            .ok_or_else(|| PipelineError::MissingPortStatuses {
                serial: record.serial.clone(),
            })?;

        let total = classify_ports(&record, ports, &mut buckets);
        record.power_usage_wh = total;

        // Totals are sums of non-negative draws, so <= 0 is the == 0 case.
        if total <= 0.0 {
            buckets.no_poe.push(record);
        } else if total <= LOW_POWER_MAX_WH {
            buckets.low_poe.push(record);
        } else {
            buckets.high_poe.push(record);
        }
    }

    Ok(buckets)
}

/// Step 1: inventory entry + network-name and availability joins.
fn assemble_record(
    switch: &Device,
    network_names: &HashMap<String, String>,
    availabilities: &HashMap<String, AvailabilityStatus>,
) -> Result<SwitchRecord, PipelineError> {
    let network =
        network_names
            .get(&switch.network_id)
            .ok_or_else(|| PipelineError::UnknownNetwork {
                serial: switch.serial.clone(),
                network_id: switch.network_id.clone(),
            })?;

    let status =
        *availabilities
            .get(&switch.serial)
            .ok_or_else(|| PipelineError::MissingAvailability {
                serial: switch.serial.clone(),
            })?;

    Ok(SwitchRecord {
        serial: switch.serial.clone(),
        name: switch.name.clone().unwrap_or_default(),
        model: switch.model.clone(),
        network: network.clone(),
        status,
        power_usage_wh: 0.0,
    })
}

/// Step 3: emit port records for one online switch and return its power
/// total.
///
/// Ports without a power field are skipped entirely -- they are neither
/// disconnected nor PoE-tracked. Only Connected ports contribute to the
/// total, and only while the switch is online (the caller already
/// guarantees that; the check is kept as an invariant, not a branch that
/// can fire).
fn classify_ports(
    record: &SwitchRecord,
    ports: &[SwitchPortStatus],
    buckets: &mut ReportBuckets,
) -> f64 {
    let mut total = 0.0;

    for port in ports {
        let Some(power_usage_wh) = port.power_usage_in_wh else {
            continue;
        };

        let port_record = PortRecord {
            port_id: port.port_id.clone(),
            switch_serial: record.serial.clone(),
            enabled: port.enabled,
            port_status: port.status.clone(),
            power_usage_wh,
        };

        match port.status.as_str() {
            STATE_DISCONNECTED => buckets.disconnected_ports.push(port_record),
            STATE_CONNECTED => {
                buckets.poe_ports.push(port_record);
                if record.status.is_online() {
                    total += power_usage_wh;
                }
            }
            other => {
                // Vendor states beyond Connected/Disconnected fall through
                // both sheets and the sum; surface them instead of
                // dropping silently.
                warn!(
                    serial = %record.serial,
                    port = %port.port_id,
                    state = other,
                    "port in unclassified connection state; excluded from report"
                );
            }
        }
    }

    total
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp, clippy::type_complexity)]

    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use meraki_api::types::{
        AvailabilityStatus, Device, DeviceAvailability, Network, SwitchPortStatus,
    };

    use super::{availability_index, build_report, network_name_index};
    use crate::error::PipelineError;

    // ── Fixture helpers ──────────────────────────────────────────────

    fn network(id: &str, name: &str) -> Network {
        Network {
            id: id.into(),
            name: name.into(),
            extra: HashMap::new(),
        }
    }

    fn switch(serial: &str, network_id: &str, name: Option<&str>) -> Device {
        Device {
            serial: serial.into(),
            network_id: network_id.into(),
            model: "MS225-48LP".into(),
            name: name.map(Into::into),
            product_type: Some("switch".into()),
            extra: HashMap::new(),
        }
    }

    fn availability(serial: &str, status: AvailabilityStatus) -> DeviceAvailability {
        DeviceAvailability {
            serial: serial.into(),
            status,
            extra: HashMap::new(),
        }
    }

    fn port(port_id: &str, status: &str, power: Option<f64>) -> SwitchPortStatus {
        SwitchPortStatus {
            port_id: port_id.into(),
            enabled: true,
            status: status.into(),
            power_usage_in_wh: power,
            extra: HashMap::new(),
        }
    }

    fn single_switch_inputs(
        status: AvailabilityStatus,
        ports: Vec<SwitchPortStatus>,
    ) -> (
        Vec<Device>,
        HashMap<String, String>,
        HashMap<String, AvailabilityStatus>,
        HashMap<String, Vec<SwitchPortStatus>>,
    ) {
        let switches = vec![switch("Q2HP-XXXX", "N_1", Some("closet-sw"))];
        let names = network_name_index(&[network("N_1", "HQ")]);
        let avail = availability_index(&[availability("Q2HP-XXXX", status)]);
        let statuses = HashMap::from([("Q2HP-XXXX".to_owned(), ports)]);
        (switches, names, avail, statuses)
    }

    // ── Index builders ───────────────────────────────────────────────

    #[test]
    fn network_name_index_maps_id_to_name() {
        let index = network_name_index(&[network("N_1", "HQ"), network("N_2", "Warehouse")]);
        assert_eq!(index.get("N_1").map(String::as_str), Some("HQ"));
        assert_eq!(index.get("N_2").map(String::as_str), Some("Warehouse"));
        assert_eq!(index.len(), 2);
    }

    // ── Classification scenarios ─────────────────────────────────────

    #[test]
    fn connected_40wh_lands_in_low_power() {
        let (switches, names, avail, statuses) = single_switch_inputs(
            AvailabilityStatus::Online,
            vec![
                port("A", "Connected", Some(40.0)),
                port("B", "Disconnected", Some(0.0)),
            ],
        );

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.low_poe.len(), 1);
        assert_eq!(buckets.low_poe[0].power_usage_wh, 40.0);
        assert_eq!(buckets.low_poe[0].network, "HQ");
        assert!(buckets.no_poe.is_empty());
        assert!(buckets.high_poe.is_empty());

        assert_eq!(buckets.poe_ports.len(), 1);
        assert_eq!(buckets.poe_ports[0].port_id, "A");
        assert_eq!(buckets.disconnected_ports.len(), 1);
        assert_eq!(buckets.disconnected_ports[0].port_id, "B");
    }

    #[test]
    fn connected_75wh_lands_in_high_power() {
        let (switches, names, avail, statuses) = single_switch_inputs(
            AvailabilityStatus::Online,
            vec![
                port("A", "Connected", Some(75.0)),
                port("B", "Disconnected", Some(0.0)),
            ],
        );

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.high_poe.len(), 1);
        assert_eq!(buckets.high_poe[0].power_usage_wh, 75.0);
        assert!(buckets.low_poe.is_empty());
    }

    #[test]
    fn boundary_exactly_67wh_is_low_power() {
        let (switches, names, avail, statuses) = single_switch_inputs(
            AvailabilityStatus::Online,
            vec![port("A", "Connected", Some(67.0))],
        );

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.low_poe.len(), 1);
        assert!(buckets.high_poe.is_empty());
    }

    #[test]
    fn zero_total_is_no_power() {
        let (switches, names, avail, statuses) = single_switch_inputs(
            AvailabilityStatus::Online,
            vec![
                port("A", "Connected", Some(0.0)),
                port("B", "Disconnected", Some(0.0)),
            ],
        );

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.no_poe.len(), 1);
        // The connected zero-draw port is still PoE-tracked.
        assert_eq!(buckets.poe_ports.len(), 1);
    }

    #[test]
    fn dormant_switch_goes_offline_and_ports_are_not_scanned() {
        let (switches, names, avail, statuses) = single_switch_inputs(
            AvailabilityStatus::Dormant,
            vec![port("A", "Connected", Some(40.0))],
        );

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.offline_switches.len(), 1);
        assert_eq!(buckets.offline_switches[0].status, AvailabilityStatus::Dormant);
        assert_eq!(buckets.offline_switches[0].power_usage_wh, 0.0);
        assert!(buckets.poe_ports.is_empty());
        assert!(buckets.disconnected_ports.is_empty());
        assert_eq!(buckets.switch_count(), 1);
    }

    #[test]
    fn alerting_counts_as_offline() {
        let (switches, names, avail, statuses) =
            single_switch_inputs(AvailabilityStatus::Alerting, vec![]);

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.offline_switches.len(), 1);
    }

    #[test]
    fn offline_switch_needs_no_port_statuses() {
        // An offline switch is never looked up in the port-status map, so
        // a missing entry there is not an error.
        let switches = vec![switch("Q2HP-XXXX", "N_1", None)];
        let names = network_name_index(&[network("N_1", "HQ")]);
        let avail = availability_index(&[availability("Q2HP-XXXX", AvailabilityStatus::Offline)]);

        let buckets = build_report(&switches, &names, &avail, &HashMap::new()).unwrap();

        assert_eq!(buckets.offline_switches.len(), 1);
    }

    // ── Port edge cases ──────────────────────────────────────────────

    #[test]
    fn port_without_power_field_is_skipped() {
        let (switches, names, avail, statuses) = single_switch_inputs(
            AvailabilityStatus::Online,
            vec![
                port("A", "Connected", None),
                port("B", "Disconnected", None),
                port("C", "Connected", Some(10.0)),
            ],
        );

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        // A and B appear in neither port bucket.
        assert_eq!(buckets.port_count(), 1);
        assert_eq!(buckets.poe_ports[0].port_id, "C");
        assert_eq!(buckets.low_poe[0].power_usage_wh, 10.0);
    }

    #[test]
    fn unrecognized_port_state_excluded_from_sheets_and_sum() {
        let (switches, names, avail, statuses) = single_switch_inputs(
            AvailabilityStatus::Online,
            vec![
                port("A", "Connected", Some(30.0)),
                port("B", "Sleeping", Some(99.0)),
            ],
        );

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.port_count(), 1);
        // 99 Wh from the sleeping port never reaches the total.
        assert_eq!(buckets.low_poe[0].power_usage_wh, 30.0);
    }

    #[test]
    fn unnamed_switch_defaults_to_empty_name() {
        let switches = vec![switch("Q2HP-XXXX", "N_1", None)];
        let names = network_name_index(&[network("N_1", "HQ")]);
        let avail = availability_index(&[availability("Q2HP-XXXX", AvailabilityStatus::Online)]);
        let statuses = HashMap::from([("Q2HP-XXXX".to_owned(), vec![])]);

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.no_poe[0].name, "");
    }

    // ── Partition properties ─────────────────────────────────────────

    #[test]
    fn buckets_partition_switches_without_loss_or_duplication() {
        let switches = vec![
            switch("SW-NONE", "N_1", Some("a")),
            switch("SW-LOW", "N_1", Some("b")),
            switch("SW-HIGH", "N_2", Some("c")),
            switch("SW-DOWN", "N_2", Some("d")),
        ];
        let names = network_name_index(&[network("N_1", "HQ"), network("N_2", "Warehouse")]);
        let avail = availability_index(&[
            availability("SW-NONE", AvailabilityStatus::Online),
            availability("SW-LOW", AvailabilityStatus::Online),
            availability("SW-HIGH", AvailabilityStatus::Online),
            availability("SW-DOWN", AvailabilityStatus::Offline),
        ]);
        let statuses = HashMap::from([
            ("SW-NONE".to_owned(), vec![port("1", "Connected", Some(0.0))]),
            ("SW-LOW".to_owned(), vec![port("1", "Connected", Some(12.0))]),
            (
                "SW-HIGH".to_owned(),
                vec![
                    port("1", "Connected", Some(50.0)),
                    port("2", "Connected", Some(30.5)),
                ],
            ),
        ]);

        let buckets = build_report(&switches, &names, &avail, &statuses).unwrap();

        assert_eq!(buckets.switch_count(), switches.len());
        assert_eq!(buckets.no_poe.len(), 1);
        assert_eq!(buckets.low_poe.len(), 1);
        assert_eq!(buckets.high_poe.len(), 1);
        assert_eq!(buckets.offline_switches.len(), 1);

        // Power totals sum only Connected ports.
        assert_eq!(buckets.high_poe[0].power_usage_wh, 80.5);

        // Every serial appears exactly once across switch buckets.
        let mut serials: Vec<&str> = buckets
            .no_poe
            .iter()
            .chain(&buckets.low_poe)
            .chain(&buckets.high_poe)
            .chain(&buckets.offline_switches)
            .map(|r| r.serial.as_str())
            .collect();
        serials.sort_unstable();
        assert_eq!(serials, ["SW-DOWN", "SW-HIGH", "SW-LOW", "SW-NONE"]);
    }

    // ── Fatal join misses ────────────────────────────────────────────

    #[test]
    fn unknown_network_is_fatal() {
        let switches = vec![switch("Q2HP-XXXX", "N_MISSING", None)];
        let names = network_name_index(&[network("N_1", "HQ")]);
        let avail = availability_index(&[availability("Q2HP-XXXX", AvailabilityStatus::Online)]);

        let err = build_report(&switches, &names, &avail, &HashMap::new()).unwrap_err();

        assert_eq!(
            err,
            PipelineError::UnknownNetwork {
                serial: "Q2HP-XXXX".into(),
                network_id: "N_MISSING".into(),
            }
        );
    }

    #[test]
    fn missing_availability_is_fatal() {
        let switches = vec![switch("Q2HP-XXXX", "N_1", None)];
        let names = network_name_index(&[network("N_1", "HQ")]);

        let err = build_report(&switches, &names, &HashMap::new(), &HashMap::new()).unwrap_err();

        assert_eq!(
            err,
            PipelineError::MissingAvailability {
                serial: "Q2HP-XXXX".into(),
            }
        );
    }

    #[test]
    fn missing_port_statuses_for_online_switch_is_fatal() {
        let switches = vec![switch("Q2HP-XXXX", "N_1", None)];
        let names = network_name_index(&[network("N_1", "HQ")]);
        let avail = availability_index(&[availability("Q2HP-XXXX", AvailabilityStatus::Online)]);

        let err = build_report(&switches, &names, &avail, &HashMap::new()).unwrap_err();

        assert_eq!(
            err,
            PipelineError::MissingPortStatuses {
                serial: "Q2HP-XXXX".into(),
            }
        );
    }

    #[test]
    fn empty_inputs_produce_empty_buckets() {
        let buckets =
            build_report(&[], &HashMap::new(), &HashMap::new(), &HashMap::new()).unwrap();
        assert_eq!(buckets.switch_count(), 0);
        assert_eq!(buckets.port_count(), 0);
    }
}
