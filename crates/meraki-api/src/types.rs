//! Response types for the Meraki Dashboard API v1.
//!
//! All types match the JSON responses from `api.meraki.com/api/v1/`
//! endpoints. Field names use camelCase via `#[serde(rename_all = "camelCase")]`;
//! fields this crate does not model are kept in an `extra` catch-all.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Organizations ────────────────────────────────────────────────────

/// Organization visible to the API key — from `GET /organizations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Networks ─────────────────────────────────────────────────────────

/// Network in an organization — from `GET /organizations/{orgId}/networks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Inventory device — from `GET /organizations/{orgId}/devices`.
///
/// The report only ever requests `productTypes[]=switch`, so every entry
/// here is a physical switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Unique hardware serial; the join key across all collections.
    pub serial: String,
    pub network_id: String,
    pub model: String,
    /// Some devices are never assigned a display name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Switch port telemetry ────────────────────────────────────────────

/// Per-port status — from `GET /devices/{serial}/switch/ports/statuses`.
///
/// `power_usage_in_wh` aggregates PoE draw over the requested timespan and
/// is absent on ports (and models) without PoE reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPortStatus {
    pub port_id: String,
    pub enabled: bool,
    /// Connection state as reported by the dashboard, e.g. `Connected`
    /// or `Disconnected`.
    pub status: String,
    #[serde(default)]
    pub power_usage_in_wh: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Availability ─────────────────────────────────────────────────────

/// Device liveness — from `GET /organizations/{orgId}/devices/availabilities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAvailability {
    pub serial: String,
    pub status: AvailabilityStatus,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Liveness states the dashboard reports for a device.
///
/// `Unknown` absorbs any state added to the API after this enum was
/// written, so a new dashboard release cannot break deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Online,
    Offline,
    Dormant,
    Alerting,
    #[serde(other)]
    Unknown,
}

impl AvailabilityStatus {
    /// Only `online` counts; everything else is treated as offline.
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }

    /// Label used when rendering the status in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Dormant => "dormant",
            Self::Alerting => "alerting",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
