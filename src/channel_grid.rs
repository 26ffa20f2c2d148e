use std::ops::{Index, IndexMut};

// A single colour channel of an image.
//
// Values are addressed as grid[column][row]. Columns are stored contiguously,
// so indexing by column hands back a slice of that column's rows.
//
// Intensities are u16 rather than u8: the legacy decoder can produce 256, and
// the encoder is responsible for clamping anything above 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelGrid {
    data: Vec<u16>,
    width: usize,
    height: usize,
}

impl ChannelGrid {
    // 0-initialize the grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height],
            width,
            height,
        }
    }

    // Build a grid from column-major values: the first `height` values form column 0
    pub fn from_columns(width: usize, height: usize, data: Vec<u16>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "grid data does not match {width}x{height}"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, column: usize, row: usize) -> u16 {
        self[column][row]
    }

    pub fn set(&mut self, column: usize, row: usize, value: u16) {
        self[column][row] = value;
    }

    pub fn values(&self) -> &[u16] {
        &self.data
    }
}

impl Index<usize> for ChannelGrid {
    type Output = [u16];

    fn index(&self, column: usize) -> &[u16] {
        &self.data[column * self.height..(column + 1) * self.height]
    }
}

impl IndexMut<usize> for ChannelGrid {
    fn index_mut(&mut self, column: usize) -> &mut [u16] {
        &mut self.data[column * self.height..(column + 1) * self.height]
    }
}
