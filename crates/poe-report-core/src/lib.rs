// poe-report-core: pure join & classify pipeline between meraki-api and
// the report emitter. No I/O happens in this crate.

pub mod error;
pub mod model;
pub mod pipeline;

pub use error::PipelineError;
pub use model::{PortRecord, ReportBuckets, SwitchRecord};
pub use pipeline::{LOW_POWER_MAX_WH, availability_index, build_report, network_name_index};
