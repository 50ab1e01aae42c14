/*!
 * Text measurement used by the layout engine.
 */

use unicode_width::UnicodeWidthStr;

use super::model::FontSizeClass;

/// Measures rendered text in the units of the target resolution
pub trait TextMetrics {
    /// Returns `(width, height)` of `text` drawn at `size`
    fn measure(&self, text: &str, size: FontSizeClass) -> (f64, f64);
}

/// Estimates width from display columns: a narrow glyph is half an em,
/// a full-width (CJK) glyph a full em.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl TextMetrics for EstimatedMetrics {
    fn measure(&self, text: &str, size: FontSizeClass) -> (f64, f64) {
        let px = f64::from(size.pixel_size());
        let columns = text.width() as f64;
        (columns * px / 2.0, px)
    }
}

impl<F> TextMetrics for F
where
    F: Fn(&str, FontSizeClass) -> (f64, f64),
{
    fn measure(&self, text: &str, size: FontSizeClass) -> (f64, f64) {
        self(text, size)
    }
}
