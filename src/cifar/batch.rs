use std::fs;
use std::path::Path;

use tracing::debug;

use super::{correct_pixel, DecodeError};
use crate::{ChannelGrid, Compat, CHANNEL_SIZE, IMAGE_SIDE, RECORD_SIZE};

// One decoded image from a batch
#[derive(Clone, Debug)]
pub struct Record {
    pub index: usize,
    pub label: u8,
    // Red, green and blue, in that order
    pub channels: [ChannelGrid; 3],
}

impl Record {
    pub fn red(&self) -> &ChannelGrid {
        &self.channels[0]
    }

    pub fn green(&self) -> &ChannelGrid {
        &self.channels[1]
    }

    pub fn blue(&self) -> &ChannelGrid {
        &self.channels[2]
    }
}

// The raw contents of a batch file.
// The expected format is:
// - No header, no separators
// - One 3073-byte record per image
// - Each record starts with the class label 0-9
// - The rest of the record is the red, green and blue channels, 1024 bytes each
//
// The whole file is held in memory. CIFAR-10 batches are ~30MB, so there is no
// point streaming them.
pub struct Batch {
    bytes: Vec<u8>,
}

impl Batch {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| DecodeError::InputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read batch file");
        Ok(Self::from_bytes(bytes))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    // Number of complete records. A trailing partial record is not counted.
    pub fn len(&self) -> usize {
        self.bytes.len() / RECORD_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Decode the record at `index` into fresh channel grids
    pub fn record(&self, index: usize, compat: Compat) -> Result<Record, DecodeError> {
        // Offset one past the end of the record, if it fits in a usize at all
        let end = index
            .checked_add(1)
            .and_then(|records| records.checked_mul(RECORD_SIZE));
        match end {
            Some(end) if end <= self.bytes.len() => Ok(decode_record(
                index,
                &self.bytes[end - RECORD_SIZE..end],
                compat,
            )),
            _ => Err(DecodeError::TruncatedInput {
                index,
                needed: end.unwrap_or(usize::MAX),
                available: self.bytes.len(),
            }),
        }
    }

    pub fn records(&self, compat: Compat) -> impl Iterator<Item = Record> + '_ {
        self.bytes
            .chunks_exact(RECORD_SIZE)
            .enumerate()
            .map(move |(index, bytes)| decode_record(index, bytes, compat))
    }
}

// `bytes` is exactly one record: the label, then red, green and blue
fn decode_record(index: usize, bytes: &[u8], compat: Compat) -> Record {
    let label = bytes[0];
    let channels = array_init::array_init(|channel| {
        let offset = 1 + channel * CHANNEL_SIZE;
        decode_channel(&bytes[offset..offset + CHANNEL_SIZE], compat)
    });
    Record {
        index,
        label,
        channels,
    }
}

// Spread 1024 channel bytes over a 32x32 grid, one whole column of rows at a time.
// Byte k lands at grid[k / 32][k % 32]. The encoder reads the grid back with
// this layout in mind, so the two must change together.
fn decode_channel(bytes: &[u8], compat: Compat) -> ChannelGrid {
    let values = bytes
        .iter()
        .map(|&byte| correct_pixel(byte as i8, compat))
        .collect();
    ChannelGrid::from_columns(IMAGE_SIDE, IMAGE_SIDE, values)
}
