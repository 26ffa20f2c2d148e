// Uncompressed 24-bit bitmap output

mod error;
pub use error::EncodeError;

mod header;
pub use header::{file_header, file_size, info_header, HEADER_SIZE};

mod encode;
pub use encode::{encode, row_padding, write};
