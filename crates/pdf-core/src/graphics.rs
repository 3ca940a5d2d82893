//! Colors and vector drawing operators

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` or `#rgb` (the `#` is optional)
    ///
    /// # Examples
    /// ```
    /// use pdf_core::Color;
    /// assert_eq!(Color::from_hex("#ffffff"), Some(Color::white()));
    /// assert_eq!(Color::from_hex("000"), Some(Color::black()));
    /// assert_eq!(Color::from_hex("#12345"), None);
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self::from_rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Some(Self::from_rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Mid gray, used for rules and captions
    pub fn gray() -> Self {
        Self::from_rgb(0x80, 0x80, 0x80)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Stroke and fill settings for a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectStyle {
    /// Outline color, `None` for no outline
    pub stroke: Option<Color>,
    /// Fill color, `None` for no fill
    pub fill: Option<Color>,
    /// Outline width in points
    pub line_width: f64,
}

impl RectStyle {
    pub fn stroked(color: Color, line_width: f64) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            line_width,
        }
    }

    pub fn filled(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            line_width: 0.0,
        }
    }
}

/// Format a coordinate for a content stream, keeping at most 3 decimals
pub(crate) fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub(crate) fn color_operands(color: Color) -> String {
    format!(
        "{} {} {}",
        num(f64::from(color.r)),
        num(f64::from(color.g)),
        num(f64::from(color.b))
    )
}

/// Generate operators for a straight line (PDF coordinates)
pub fn generate_line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: f64,
    color: Color,
) -> Vec<u8> {
    format!(
        "q\n{} RG\n{} w\n{} {} m\n{} {} l\nS\nQ\n",
        color_operands(color),
        num(width),
        num(x1),
        num(y1),
        num(x2),
        num(y2)
    )
    .into_bytes()
}

/// Generate operators for a rectangle whose lower-left corner is `(x, y)`
/// in PDF coordinates
///
/// Returns no operators when the style neither strokes nor fills.
pub fn generate_rect_operators(x: f64, y: f64, width: f64, height: f64, style: RectStyle) -> Vec<u8> {
    let paint = match (style.stroke.is_some(), style.fill.is_some()) {
        (true, true) => "B",
        (true, false) => "S",
        (false, true) => "f",
        (false, false) => return Vec::new(),
    };

    let mut ops = String::from("q\n");
    if let Some(stroke) = style.stroke {
        ops.push_str(&format!("{} RG\n{} w\n", color_operands(stroke), num(style.line_width)));
    }
    if let Some(fill) = style.fill {
        ops.push_str(&format!("{} rg\n", color_operands(fill)));
    }
    ops.push_str(&format!(
        "{} {} {} {} re\n{paint}\nQ\n",
        num(x),
        num(y),
        num(width),
        num(height)
    ));
    ops.into_bytes()
}
