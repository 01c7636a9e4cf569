//! Coverage traces.
//!
//! Every seed owns one [`CoverageVector`] decoded from an externally
//! produced trace record. The [`TraceStore`] keeps the seeds whose records
//! were valid and re-reads records through a [`TraceSource`] on demand.

mod error;
mod record;
mod source;
mod store;
mod vector;


pub use error::{RecordError, TraceError};
pub use record::{parse_record, parse_record_bytes};
pub use source::{TraceDir, TraceFile, TraceSource};
pub use store::{
    DEFAULT_FEATURE_WIDTH, SkipReason, SkippedSeed, TraceStore, TraceStoreBuilder,
};
pub use vector::CoverageVector;
