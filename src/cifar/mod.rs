// This module contains all the CIFAR-10 specific code in the project

mod error;
pub use error::DecodeError;

mod dataset;
pub use dataset::{Dataset, DEFAULT_DATA_DIR};

mod correct_pixel;
pub use correct_pixel::correct_pixel;

mod batch;
pub use batch::{Batch, Record};
