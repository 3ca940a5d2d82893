//! Standard Type 1 fonts with WinAnsi encoding
//!
//! Receipts only need Latin text, so the writer relies on the Helvetica
//! family every PDF viewer ships with. Nothing is embedded; widths come from
//! the Adobe font metrics so alignment and wrapping stay exact.

use lopdf::{Dictionary, Object};

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Font style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// One of the four Helvetica faces of the PDF base fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl StandardFont {
    /// All faces, in resource order
    pub const ALL: [StandardFont; 4] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
    ];

    /// Pick the face for a weight and style
    pub fn from_style(weight: FontWeight, style: FontStyle) -> Self {
        match (weight, style) {
            (FontWeight::Regular, FontStyle::Normal) => StandardFont::Helvetica,
            (FontWeight::Bold, FontStyle::Normal) => StandardFont::HelveticaBold,
            (FontWeight::Regular, FontStyle::Italic) => StandardFont::HelveticaOblique,
            (FontWeight::Bold, FontStyle::Italic) => StandardFont::HelveticaBoldOblique,
        }
    }

    /// PostScript name used as `/BaseFont`
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Page resource name (`F1`..`F4`)
    pub fn resource_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
            StandardFont::HelveticaOblique => "F3",
            StandardFont::HelveticaBoldOblique => "F4",
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique
        )
    }

    /// Font dictionary for the page resources
    pub fn to_pdf_dict(self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Font".to_vec()));
        dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        dict.set("BaseFont", Object::Name(self.base_font().as_bytes().to_vec()));
        dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        dict
    }

    /// Advance width of one WinAnsi code, in 1/1000 em
    pub fn glyph_width(self, code: u8) -> u16 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };

        match code {
            0x20..=0x7E => table[(code - 0x20) as usize],
            _ => special_width(self.is_bold(), code, table),
        }
    }

    /// Width of a string in points at the given size
    pub fn text_width_points(self, text: &str, size: f32) -> f64 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| u32::from(self.glyph_width(code)))
            .sum();
        f64::from(units) * f64::from(size) / 1000.0
    }
}

/// Helvetica and Helvetica-Oblique, codes 0x20..=0x7E
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

/// Helvetica-Bold and Helvetica-BoldOblique, codes 0x20..=0x7E
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70
];

/// Widths outside printable ASCII
///
/// Accented letters share the advance of their base letter in Helvetica, so
/// they are looked up through the base letter.
fn special_width(bold: bool, code: u8, table: &[u16; 95]) -> u16 {
    if let Some(base) = decode_win_ansi(code).and_then(base_letter) {
        return table[(base as u8 - 0x20) as usize];
    }

    match (code, bold) {
        (0x80, _) => 556, // Euro
        (0x85 | 0x89 | 0x8C | 0x97 | 0x99, _) => 1000,
        (0x9C, _) => 944,
        (0x82 | 0x91 | 0x92, false) => 222,
        (0x82 | 0x91 | 0x92, true) => 278,
        (0x84 | 0x93 | 0x94, false) => 333,
        (0x84 | 0x93 | 0x94, true) => 500,
        (0x95, _) => 350,
        (0xA0, _) => 278,
        (0xB0, _) => 400,
        (0xC6, _) => 1000,
        (0xE6, _) => 889,
        (0xDF, _) => 611,
        _ => 556,
    }
}

/// Unaccented base letter of a Latin-1 letter, if it has one
fn base_letter(c: char) -> Option<char> {
    let base = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'Ç' => 'C',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'Ñ' => 'N',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'Š' => 'S',
        'Ž' => 'Z',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

/// Code points 0x80..=0x9F of WinAnsiEncoding (Windows-1252)
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('€'),
    None,
    Some('‚'),
    Some('ƒ'),
    Some('„'),
    Some('…'),
    Some('†'),
    Some('‡'),
    Some('ˆ'),
    Some('‰'),
    Some('Š'),
    Some('‹'),
    Some('Œ'),
    None,
    Some('Ž'),
    None,
    None,
    Some('‘'),
    Some('’'),
    Some('“'),
    Some('”'),
    Some('•'),
    Some('–'),
    Some('—'),
    Some('˜'),
    Some('™'),
    Some('š'),
    Some('›'),
    Some('œ'),
    None,
    Some('ž'),
    Some('Ÿ'),
];

fn decode_win_ansi(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(char::from(code)),
        0x80..=0x9F => WIN_ANSI_HIGH[(code - 0x80) as usize],
        _ => None,
    }
}

fn encode_char(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
        '\t' | '\n' | '\r' | '\u{202F}' => b' ',
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|&mapped| mapped == Some(c))
            .map(|i| 0x80 + i as u8)
            .unwrap_or(b'?'),
    }
}

/// Encode text in WinAnsiEncoding
///
/// Characters the encoding lacks become `?`; tabs and line breaks become
/// spaces.
///
/// # Examples
/// ```
/// use pdf_core::encode_win_ansi;
/// assert_eq!(encode_win_ansi("Dû 5 €"), vec![0x44, 0xFB, 0x20, 0x35, 0x20, 0x80]);
/// ```
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Encode text as a PDF hex string (`<48656C6C6F>`)
pub fn encode_text_hex(text: &str) -> String {
    let mut hex = String::with_capacity(text.len() * 2 + 2);
    hex.push('<');
    for byte in encode_win_ansi(text) {
        hex.push_str(&format!("{byte:02X}"));
    }
    hex.push('>');
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_style() {
        assert_eq!(
            StandardFont::from_style(FontWeight::Regular, FontStyle::Normal),
            StandardFont::Helvetica
        );
        assert_eq!(
            StandardFont::from_style(FontWeight::Bold, FontStyle::Italic),
            StandardFont::HelveticaBoldOblique
        );
    }

    #[test]
    fn test_resource_names_are_distinct() {
        let mut names: Vec<&str> = StandardFont::ALL.iter().map(|f| f.resource_name()).collect();
        names.dedup();
        assert_eq!(names, vec!["F1", "F2", "F3", "F4"]);
    }

    #[test]
    fn test_ascii_widths() {
        assert_eq!(StandardFont::Helvetica.glyph_width(b' '), 278);
        assert_eq!(StandardFont::Helvetica.glyph_width(b'A'), 667);
        assert_eq!(StandardFont::Helvetica.glyph_width(b'i'), 222);
        assert_eq!(StandardFont::Helvetica.glyph_width(b'~'), 584);
        assert_eq!(StandardFont::HelveticaBold.glyph_width(b'A'), 722);
        assert_eq!(StandardFont::HelveticaBoldOblique.glyph_width(b'i'), 278);
    }

    #[test]
    fn test_accented_letters_use_base_width() {
        let font = StandardFont::Helvetica;
        assert_eq!(font.glyph_width(0xE9), font.glyph_width(b'e')); // é
        assert_eq!(font.glyph_width(0xC7), font.glyph_width(b'C')); // Ç
        assert_eq!(font.glyph_width(0x80), 556); // €
    }

    #[test]
    fn test_text_width_points() {
        // "Total" = T 611 + o 556 + t 278 + a 556 + l 222 = 2223
        let width = StandardFont::Helvetica.text_width_points("Total", 10.0);
        assert!((width - 22.23).abs() < 1e-9);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Généré"), vec![0x47, 0xE9, 0x6E, 0xE9, 0x72, 0xE9]);
        assert_eq!(encode_win_ansi("€ œ"), vec![0x80, 0x20, 0x9C]);
        assert_eq!(encode_win_ansi("a\tb"), vec![b'a', b' ', b'b']);
    }

    #[test]
    fn test_encode_unknown_as_question_mark() {
        assert_eq!(encode_win_ansi("ก→"), vec![b'?', b'?']);
    }

    #[test]
    fn test_encode_text_hex() {
        assert_eq!(encode_text_hex("Hé"), "<48E9>");
        assert_eq!(encode_text_hex(""), "<>");
    }

    #[test]
    fn test_pdf_dict() {
        let dict = StandardFont::HelveticaBold.to_pdf_dict();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");
        assert_eq!(
            dict.get(b"Encoding").unwrap().as_name().unwrap(),
            b"WinAnsiEncoding"
        );
    }
}
