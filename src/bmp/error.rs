use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("channel grids disagree on size: {0:?}")]
    DimensionMismatch([(usize, usize); 3]),
    #[error("cannot encode an image with no pixels")]
    EmptyImage,
    #[error("{width}x{height} is too large for a bitmap header")]
    TooLarge { width: usize, height: usize },
    #[error("failed to write bitmap {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
