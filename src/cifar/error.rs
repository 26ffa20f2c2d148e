use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown dataset selector `{0}` (expected 1-5 or t)")]
    UnknownDataset(String),
    #[error("error opening file: {}", path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record {index} needs {needed} bytes but the batch only holds {available}")]
    TruncatedInput {
        index: usize,
        needed: usize,
        available: usize,
    },
}
