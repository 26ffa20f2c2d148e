use std::fs;
use std::iter;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{file_header, info_header, EncodeError, HEADER_SIZE};
use crate::ChannelGrid;

// Zero bytes needed after each row so that rows are a multiple of 4 bytes long
pub fn row_padding(width: usize) -> usize {
    (4 - (width * 3) % 4) % 4
}

// Encode red, green and blue grids as a complete bitmap file.
//
// The logical image shows grid row `height - 1 - y` on line y and grid column x
// at position x. Bitmaps are stored bottom-up, so the first row written is the
// last logical line, which is grid row 0. Each pixel goes out as blue, green, red.
pub fn encode(channels: &[ChannelGrid; 3]) -> Result<Vec<u8>, EncodeError> {
    let dims: [(usize, usize); 3] =
        array_init::array_init(|c| (channels[c].width(), channels[c].height()));
    if dims.iter().any(|&d| d != dims[0]) {
        return Err(EncodeError::DimensionMismatch(dims));
    }
    let (width, height) = dims[0];
    if width == 0 || height == 0 {
        return Err(EncodeError::EmptyImage);
    }

    let file_bytes = file_header(width, height)?;
    let info_bytes = info_header(width, height)?;

    let padding = row_padding(width);
    let mut bytes = Vec::with_capacity(HEADER_SIZE + (width * 3 + padding) * height);
    bytes.extend(file_bytes);
    bytes.extend(info_bytes);

    for line in (0..height).rev() {
        let row = height - 1 - line;
        for column in 0..width {
            let [r, g, b] = array_init::array_init(|c| clamp(channels[c][column][row]));
            bytes.extend([b, g, r]);
        }
        bytes.extend(iter::repeat(0).take(padding));
    }

    Ok(bytes)
}

// Encode the grids and write them to `<dir>/<stem>.bmp`.
// The directory has to exist already.
pub fn write(
    dir: impl AsRef<Path>,
    stem: &str,
    channels: &[ChannelGrid; 3],
) -> Result<PathBuf, EncodeError> {
    let bytes = encode(channels)?;
    let path = dir.as_ref().join(format!("{stem}.bmp"));
    fs::write(&path, &bytes).map_err(|source| EncodeError::OutputWrite {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote bitmap");
    Ok(path)
}

// Intensities should already fit in a byte, except for legacy zeros (256)
#[inline]
fn clamp(value: u16) -> u8 {
    value.min(u8::MAX as u16) as u8
}
