//! Text rendering utilities

use crate::font::StandardFont;
use crate::graphics::{color_operands, num, Color};
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// Font face, which also gives the resource name (e.g., "F1")
    pub font: StandardFont,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Calculate X offset for text alignment
///
/// # Arguments
/// * `text_width` - Width of text in points
/// * `container_width` - Available width for alignment
/// * `align` - Desired alignment
pub fn calculate_x_offset(text_width: f64, container_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => (container_width - text_width) / 2.0,
        Align::Right => container_width - text_width,
    }
}

/// Generate PDF operators for text insertion
///
/// `x` is the alignment anchor: the left edge, the center or the right edge
/// of the text depending on `align`. `y` is the baseline, both in PDF
/// coordinates.
///
/// # Arguments
/// * `text_hex` - Hex-encoded WinAnsi text (e.g., "<48656C6C6F>")
/// * `x` - X anchor in points
/// * `y` - Baseline in points (from bottom)
/// * `align` - Text alignment
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    // A zero-width container turns the offset into a shift from the anchor
    let final_x = x + calculate_x_offset(ctx.text_width, 0.0, align);

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!("{} rg\n", color_operands(ctx.color)));
    ops.push_str(&format!(
        "/{} {} Tf\n",
        ctx.font.resource_name(),
        num(f64::from(ctx.font_size))
    ));
    ops.push_str(&format!("{} {} Td\n", num(final_x), num(y)));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}
