// ── Derived report records ──
//
// These are the shapes the spreadsheet sheets mirror: one SwitchRecord per
// switch, one PortRecord per port that reports a power figure.

use meraki_api::types::AvailabilityStatus;
use serde::Serialize;

/// One switch, joined from inventory + availability + network-name lookup
/// and augmented with its aggregate PoE draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchRecord {
    pub serial: String,
    /// Display name; empty string when the device was never assigned one.
    pub name: String,
    pub model: String,
    /// Name of the network the switch lives in.
    pub network: String,
    pub status: AvailabilityStatus,
    /// Sum of `power_usage_in_wh` over the switch's Connected ports.
    /// Always 0 for switches that are not online (their ports are never
    /// scanned).
    pub power_usage_wh: f64,
}

/// One switch port that reports a power-usage figure.
///
/// Ports without the field are absent from the report entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortRecord {
    pub port_id: String,
    pub switch_serial: String,
    pub enabled: bool,
    /// Connection state as reported by the dashboard.
    pub port_status: String,
    pub power_usage_wh: f64,
}

/// The six disjoint output sequences of the pipeline, one per sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportBuckets {
    /// Online switches drawing no PoE at all.
    pub no_poe: Vec<SwitchRecord>,
    /// Online switches drawing up to 67 Wh.
    pub low_poe: Vec<SwitchRecord>,
    /// Online switches drawing more than 67 Wh.
    pub high_poe: Vec<SwitchRecord>,
    /// Connected ports with PoE tracking.
    pub poe_ports: Vec<PortRecord>,
    /// Disconnected ports that still report a power field.
    pub disconnected_ports: Vec<PortRecord>,
    /// Switches that are offline, dormant, or alerting.
    pub offline_switches: Vec<SwitchRecord>,
}

impl ReportBuckets {
    /// Total number of switches across the switch buckets.
    pub fn switch_count(&self) -> usize {
        self.no_poe.len() + self.low_poe.len() + self.high_poe.len() + self.offline_switches.len()
    }

    /// Total number of ports across the port buckets.
    pub fn port_count(&self) -> usize {
        self.poe_ports.len() + self.disconnected_ports.len()
    }
}
