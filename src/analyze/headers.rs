//! Header classification and font-size level buckets.

use crate::model::TextBlock;

use super::AnalyzeOptions;

/// Whether a block classifies as a header: large font, bold, or short text.
///
/// List-marker blocks are checked before this in the classification order;
/// a short bullet item never reaches the header test.
pub fn is_header(block: &TextBlock, options: &AnalyzeOptions) -> bool {
    block.avg_font_size >= options.header_font_size
        || block.is_bold()
        || block.text().chars().count() < options.short_header_max_chars
}

/// Header level from descending font-size buckets.
pub fn header_level(font_size: f32) -> u8 {
    if font_size >= 20.0 {
        1
    } else if font_size >= 18.0 {
        2
    } else if font_size >= 16.0 {
        3
    } else if font_size >= 14.0 {
        4
    } else {
        5
    }
}
