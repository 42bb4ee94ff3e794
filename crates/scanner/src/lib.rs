pub mod pipeline;
pub mod sink;
pub mod source;

pub use pipeline::{PipelineError, PipelineSummary, ScanPipeline};
pub use sink::{LookupOutcome, ScanSink, SinkError, TracingSink};
pub use source::{NoopScanSource, ScanSource, ScriptedScanSource, SourceError};
