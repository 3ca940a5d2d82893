//! Receipt layout JSON schema types

use crate::binding::check_binding;
use crate::{ReceiptError, Result};
use pdf_core::{Color, FontStyle as PdfFontStyle, FontWeight, StandardFont};
use serde::{Deserialize, Serialize};

/// The built-in receipt layout
pub const STANDARD_LAYOUT: &str = include_str!("../data/standard-layout.json");

/// Parse a layout from JSON and check its bindings and colors
pub fn parse_layout(json: &str) -> Result<Layout> {
    let layout: Layout =
        serde_json::from_str(json).map_err(|e| ReceiptError::Layout(e.to_string()))?;
    layout.check()?;
    Ok(layout)
}

/// Root layout structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Schema version
    pub version: String,

    /// Page size, A4 when absent
    #[serde(default)]
    pub page: PageSize,

    /// Content blocks, drawn in order
    pub blocks: Vec<Block>,
}

impl Layout {
    /// The built-in receipt layout
    pub fn standard() -> Result<Self> {
        parse_layout(STANDARD_LAYOUT)
    }

    /// Parse a layout from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        parse_layout(json)
    }

    /// Find a block by id
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == Some(id))
    }

    fn check(&self) -> Result<()> {
        for block in &self.blocks {
            if let Some(enable) = block.enable() {
                check_binding(enable)?;
            }
            match block {
                Block::Text(b) => {
                    if let Some(bind) = &b.bind {
                        check_binding(bind)?;
                    }
                    if let Some(color) = b.font.as_ref().and_then(|f| f.color.as_deref()) {
                        parse_color(color)?;
                    }
                }
                Block::Line(b) => {
                    if let Some(color) = &b.color {
                        parse_color(color)?;
                    }
                }
                Block::Rect(b) => {
                    for color in [&b.stroke, &b.fill].into_iter().flatten() {
                        parse_color(color)?;
                    }
                }
                Block::Image(_) => {}
            }
        }
        Ok(())
    }
}

/// Parse a `#rrggbb` or `#rgb` color
pub fn parse_color(hex: &str) -> Result<Color> {
    Color::from_hex(hex).ok_or_else(|| ReceiptError::Layout(format!("Invalid color: {hex}")))
}

/// Page size in points
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl Default for PageSize {
    fn default() -> Self {
        Self {
            width: pdf_core::A4_WIDTH,
            height: pdf_core::A4_HEIGHT,
        }
    }
}

/// Content block (tagged union)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// Static or bound text
    Text(TextBlock),
    /// Straight line
    Line(LineBlock),
    /// Rectangle, stroked and/or filled
    Rect(RectBlock),
    /// The landlord signature image
    Image(ImageBlock),
}

impl Block {
    /// Get the block ID if present
    pub fn id(&self) -> Option<&str> {
        match self {
            Block::Text(b) => b.id.as_deref(),
            Block::Line(b) => b.id.as_deref(),
            Block::Rect(b) => b.id.as_deref(),
            Block::Image(b) => b.id.as_deref(),
        }
    }

    /// Get the enable binding if present
    pub fn enable(&self) -> Option<&str> {
        match self {
            Block::Text(b) => b.enable.as_deref(),
            Block::Line(b) => b.enable.as_deref(),
            Block::Rect(b) => b.enable.as_deref(),
            Block::Image(b) => b.enable.as_deref(),
        }
    }
}

/// Position in points, `y` measured from the top of the page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Size in points
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Font specification for a block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Font {
    /// Font size in points
    #[serde(default = "default_font_size")]
    pub size: f32,
    #[serde(default)]
    pub style: FontStyle,
    /// Hex color such as `#135bec`
    #[serde(default)]
    pub color: Option<String>,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            size: default_font_size(),
            style: FontStyle::Regular,
            color: None,
        }
    }
}

fn default_font_size() -> f32 {
    10.0
}

/// Font style
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    #[serde(rename = "bold-italic")]
    BoldItalic,
}

impl FontStyle {
    /// The Helvetica face for this style
    pub fn standard_font(self) -> StandardFont {
        let (weight, style) = match self {
            FontStyle::Regular => (FontWeight::Regular, PdfFontStyle::Normal),
            FontStyle::Bold => (FontWeight::Bold, PdfFontStyle::Normal),
            FontStyle::Italic => (FontWeight::Regular, PdfFontStyle::Italic),
            FontStyle::BoldItalic => (FontWeight::Bold, PdfFontStyle::Italic),
        };
        StandardFont::from_style(weight, style)
    }
}

/// Text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Align> for pdf_core::Align {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => pdf_core::Align::Left,
            Align::Center => pdf_core::Align::Center,
            Align::Right => pdf_core::Align::Right,
        }
    }
}

/// Word wrap configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordWrap {
    /// Maximum characters per line
    #[serde(rename = "maxChars")]
    pub max_chars: usize,
    /// Line height in points
    #[serde(rename = "lineHeight", default = "default_line_height")]
    pub line_height: f64,
}

pub(crate) fn default_line_height() -> f64 {
    13.5
}

fn default_line_width() -> f64 {
    1.0
}

/// Text block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub id: Option<String>,
    /// Data binding path (JSONPath-like)
    #[serde(default)]
    pub bind: Option<String>,
    /// Static text (used if bind is not specified)
    #[serde(default)]
    pub text: Option<String>,
    pub position: Position,
    #[serde(default)]
    pub font: Option<Font>,
    #[serde(default)]
    pub align: Align,
    #[serde(rename = "wordWrap", default)]
    pub word_wrap: Option<WordWrap>,
    /// If set, the block is drawn only when the bound value is truthy
    #[serde(default)]
    pub enable: Option<String>,
}

/// Line block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineBlock {
    #[serde(default)]
    pub id: Option<String>,
    pub from: Position,
    pub to: Position,
    #[serde(default = "default_line_width")]
    pub width: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub enable: Option<String>,
}

/// Rectangle block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectBlock {
    #[serde(default)]
    pub id: Option<String>,
    /// Top-left corner
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(rename = "lineWidth", default = "default_line_width")]
    pub line_width: f64,
    #[serde(default)]
    pub enable: Option<String>,
}

/// Signature image block; the image is fitted inside the box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub id: Option<String>,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub enable: Option<String>,
}
