//! # Governance network simulator support
//!
//! Event sinks and record exporters shared by the simulator binaries.
//! The library itself owns no output format; everything written to disk
//! is produced here from a `SimulationResult` or the event stream.

mod event_sinks;
mod export;

#[allow(unused_imports)]
pub use event_sinks::{
    CollectorEventSink, ConsoleEventSink, CsvEventSink, EventRecord, EventTypeCounts,
    MultiEventSink, SharedSink,
};
#[allow(unused_imports)]
pub use export::{export_actor_records, export_model_records};
