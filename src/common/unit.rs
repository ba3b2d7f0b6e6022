//! Unit conversion utilities.
//!
//! Slide geometry in PresentationML is expressed in English Metric Units
//! (EMU). Pictures are placed at their native size, which is their pixel size
//! at the image's resolution.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;

/// Resolution assumed for pictures that carry no usable DPI metadata.
pub const DEFAULT_DPI: u32 = 72;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

#[inline]
pub fn px_to_emu(px: u32, dpi: u32) -> i64 {
    ((px as f64) * EMUS_PER_INCH as f64 / dpi as f64) as i64
}

#[inline]
pub fn emu_to_px(emu: i64, dpi: u32) -> u32 {
    ((emu as f64) * dpi as f64 / EMUS_PER_INCH as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_round_trip() {
        assert_eq!(inches_to_emu(16.0), 14_630_400);
        assert_eq!(inches_to_emu(9.0), 8_229_600);
        assert!((emu_to_inches(8_229_600) - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_px_at_72_dpi_is_one_point() {
        assert_eq!(px_to_emu(1, DEFAULT_DPI), EMUS_PER_PT);
        // 1152x648 at 72 dpi fills a 16in x 9in slide exactly
        assert_eq!(px_to_emu(1152, DEFAULT_DPI), inches_to_emu(16.0));
        assert_eq!(px_to_emu(648, DEFAULT_DPI), inches_to_emu(9.0));
        assert_eq!(emu_to_px(inches_to_emu(16.0), DEFAULT_DPI), 1152);
    }
}
