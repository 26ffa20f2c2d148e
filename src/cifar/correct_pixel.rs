use crate::Compat;

// Undo the signed-byte representation of a pixel.
// Values 128-255 arrive as negative bytes, so adding 256 recovers them.
// Zero is the only value where the two modes disagree: the old converter only
// kept strictly positive bytes as-is, which turned black into 256.
pub fn correct_pixel(raw: i8, compat: Compat) -> u16 {
    if raw > 0 {
        raw as u16
    } else if raw == 0 && compat == Compat::Corrected {
        0
    } else {
        (raw as i16 + 256) as u16
    }
}
