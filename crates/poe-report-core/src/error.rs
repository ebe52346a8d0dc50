use thiserror::Error;

/// Failures in the join pipeline.
///
/// The joins assume every switch has an availability entry, a port-status
/// entry, and a resolvable network. A missing key means the fetched
/// collections disagree with each other, which aborts the run rather than
/// producing a report with silent holes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("switch {serial} references unknown network {network_id}")]
    UnknownNetwork { serial: String, network_id: String },

    #[error("no availability entry for switch {serial}")]
    MissingAvailability { serial: String },

    #[error("no port statuses fetched for switch {serial}")]
    MissingPortStatuses { serial: String },
}
