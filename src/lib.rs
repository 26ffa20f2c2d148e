pub mod bmp;
pub mod channel_grid;
pub mod cifar;
pub mod convert;

pub use channel_grid::ChannelGrid;

// Side length of a CIFAR-10 image
pub const IMAGE_SIDE: usize = 32;
// Number of values in one channel of a CIFAR-10 image
pub const CHANNEL_SIZE: usize = IMAGE_SIDE * IMAGE_SIDE;
// One label byte followed by the red, green and blue channels
pub const RECORD_SIZE: usize = 1 + 3 * CHANNEL_SIZE;

// Selects between the fixed-up behaviour and the behaviour of the old converter.
// Legacy mode exists so that outputs can be reproduced bit for bit:
// - selector `5` reads `data_batch_4.bin`
// - a zero byte decodes to 256, which the encoder then clamps to 255
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compat {
    #[default]
    Corrected,
    Legacy,
}
