mod error;
mod report;
mod writer;

#[cfg(test)]
mod tests;

pub use error::OutputError;
pub use report::{hash_file, ClusterSummary, ReportStats, RunReport, SelectedSeed, SkippedEntry};
pub use writer::OutputWriter;
