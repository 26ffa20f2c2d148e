use super::EncodeError;

// Combined size of the file header and the BITMAPINFOHEADER
pub const HEADER_SIZE: usize = 14 + 40;

// Size recorded in the file header.
// Row padding is deliberately left out to match files written by the old converter.
// For widths that are a multiple of 4 (CIFAR is 32 wide) this is the true size.
pub fn file_size(width: usize, height: usize) -> Result<u32, EncodeError> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(3))
        .and_then(|bytes| bytes.checked_add(HEADER_SIZE))
        .and_then(|size| u32::try_from(size).ok())
        .ok_or(EncodeError::TooLarge { width, height })
}

// 'B' 'M', total size, 4 reserved bytes, offset of the pixel data
pub fn file_header(width: usize, height: usize) -> Result<[u8; 14], EncodeError> {
    let mut header = [0u8; 14];
    header[0..2].copy_from_slice(b"BM");
    header[2..6].copy_from_slice(&file_size(width, height)?.to_le_bytes());
    header[10..14].copy_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
    Ok(header)
}

// Only size, width, height, planes and bits per pixel are set.
// Compression (BI_RGB), image size and resolution are left at zero, which
// every reader accepts for uncompressed data.
pub fn info_header(width: usize, height: usize) -> Result<[u8; 40], EncodeError> {
    // Both fields are signed; a negative height would mean top-down rows
    let too_large = || EncodeError::TooLarge { width, height };
    let w = i32::try_from(width).map_err(|_| too_large())?;
    let h = i32::try_from(height).map_err(|_| too_large())?;

    let mut header = [0u8; 40];
    header[0..4].copy_from_slice(&40u32.to_le_bytes());
    header[4..8].copy_from_slice(&w.to_le_bytes());
    header[8..12].copy_from_slice(&h.to_le_bytes());
    // planes
    header[12..14].copy_from_slice(&1u16.to_le_bytes());
    // bpp
    header[14..16].copy_from_slice(&24u16.to_le_bytes());
    Ok(header)
}
