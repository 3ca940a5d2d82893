//! PDF Core - Low-level PDF writing
//!
//! This crate provides functionality for:
//! - Building documents of A4 pages from scratch
//! - Writing text in the standard Helvetica faces (WinAnsi encoding)
//! - Drawing lines and rectangles
//! - Inserting images (JPEG, PNG, GIF)
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, PdfDocument, StandardFont};
//!
//! let mut doc = PdfDocument::new();
//! let page = doc.add_page();
//! doc.set_font(StandardFont::HelveticaBold, 18.0);
//! doc.insert_text("QUITTANCE DE LOYER", page, 297.64, 60.0, Align::Center)?;
//! doc.save("quittance.pdf")?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod text;

pub use document::{DocumentInfo, PdfDocument, A4_HEIGHT, A4_WIDTH};
pub use font::{encode_text_hex, encode_win_ansi, FontStyle, FontWeight, StandardFont};
pub use graphics::{generate_line_operators, generate_rect_operators, Color, RectStyle};
pub use image::{
    calculate_scaled_dimensions, detect_format, get_dimensions, ImageDimensions, ImageFormat,
    ImageScaleMode, ImageXObject,
};
pub use text::{calculate_x_offset, generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PdfError::InvalidPage(3, 1).to_string(),
            "Invalid page number: 3 (document has 1 pages)"
        );
        assert_eq!(
            PdfError::ImageError("Unknown image format".to_string()).to_string(),
            "Image error: Unknown image format"
        );
    }
}
