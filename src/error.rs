use crate::output::OutputError;
use crate::trace::TraceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReduceError {
    #[error("Need at least 2 valid coverage vectors to fit a rank-2 projection, found {available}")]
    InsufficientSample { available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
