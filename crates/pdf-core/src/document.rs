//! PDF Document builder

use crate::font::{encode_text_hex, StandardFont};
use crate::graphics::{generate_line_operators, generate_rect_operators, Color, RectStyle};
use crate::image::{
    calculate_scaled_dimensions, deflate, generate_image_operators, ImageScaleMode, ImageXObject,
};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use std::path::Path;

/// A4 page width in points
pub const A4_WIDTH: f64 = 595.28;
/// A4 page height in points
pub const A4_HEIGHT: f64 = 841.89;

/// Entries of the document information dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

/// A page being built: its size, buffered content operators and the
/// resources those operators use
#[derive(Debug)]
struct Page {
    width: f64,
    height: f64,
    content: Vec<u8>,
    fonts: BTreeSet<StandardFont>,
    images: BTreeSet<usize>,
}

/// PDF Document builder providing high-level operations
///
/// All coordinates taken by the drawing methods are in points with the
/// origin at the top-left corner of the page. Content is buffered per page;
/// the PDF object graph is only built by [`PdfDocument::to_bytes`].
#[derive(Debug)]
pub struct PdfDocument {
    pages: Vec<Page>,
    /// Embedded images, referenced as `Im{index + 1}`
    images: Vec<ImageXObject>,
    /// Image data hash -> index in `images`
    image_index: HashMap<u64, usize>,
    current_font: StandardFont,
    current_font_size: f32,
    current_text_color: Color,
    info: DocumentInfo,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create an empty document (no pages, Helvetica 12pt, black text)
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            images: Vec::new(),
            image_index: HashMap::new(),
            current_font: StandardFont::default(),
            current_font_size: 12.0,
            current_text_color: Color::default(),
            info: DocumentInfo::default(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a blank A4 page and return its number (1-indexed)
    pub fn add_page(&mut self) -> usize {
        self.add_page_with_size(A4_WIDTH, A4_HEIGHT)
    }

    /// Append a blank page of the given size in points
    pub fn add_page_with_size(&mut self, width: f64, height: f64) -> usize {
        self.pages.push(Page {
            width,
            height,
            content: Vec::new(),
            fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        });
        self.pages.len()
    }

    /// Page width and height in points
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let count = self.pages.len();
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .map(|p| (p.width, p.height))
            .ok_or(PdfError::InvalidPage(page, count))
    }

    fn page_mut(&mut self, page: usize) -> Result<&mut Page> {
        let count = self.pages.len();
        page.checked_sub(1)
            .and_then(|i| self.pages.get_mut(i))
            .ok_or(PdfError::InvalidPage(page, count))
    }

    /// Set the current font face and size
    pub fn set_font(&mut self, font: StandardFont, size: f32) {
        self.current_font = font;
        self.current_font_size = size;
    }

    /// Set font size only (keep current face)
    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    pub fn font(&self) -> StandardFont {
        self.current_font
    }

    pub fn font_size(&self) -> f32 {
        self.current_font_size
    }

    /// Set text color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Set the document information dictionary
    pub fn set_info(&mut self, info: DocumentInfo) {
        self.info = info;
    }

    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    /// Width of text in points with the current font and size
    pub fn text_width(&self, text: &str) -> f64 {
        self.current_font
            .text_width_points(text, self.current_font_size)
    }

    /// Insert a single line of text
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - Alignment anchor in points
    /// * `y` - Baseline in points (from top)
    /// * `align` - Text alignment
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let ctx = TextRenderContext {
            font: self.current_font,
            font_size: self.current_font_size,
            text_width: self.text_width(text),
            color: self.current_text_color,
        };

        let target = self.page_mut(page)?;

        // Nothing to draw, but the page number is still checked
        if text.is_empty() {
            return Ok(());
        }

        let pdf_y = target.height - y;
        let ops = generate_text_operators(&encode_text_hex(text), x, pdf_y, align, &ctx);

        target.fonts.insert(ctx.font);
        target.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Draw a straight line between two points
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    ) -> Result<()> {
        let target = self.page_mut(page)?;
        let height = target.height;
        let ops = generate_line_operators(x1, height - y1, x2, height - y2, width, color);
        target.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Draw a rectangle whose top-left corner is `(x, y)`
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: RectStyle,
    ) -> Result<()> {
        let target = self.page_mut(page)?;
        let pdf_y = target.height - y - height;
        let ops = generate_rect_operators(x, pdf_y, width, height, style);
        target.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Insert an image stretched to the given box
    ///
    /// # Arguments
    /// * `data` - Image file bytes (JPEG, PNG or GIF)
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `width` - Image width in points
    /// * `height` - Image height in points
    pub fn insert_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.insert_image_scaled(data, page, x, y, width, height, ImageScaleMode::Stretch)
    }

    /// Insert an image with a scaling mode; the image is anchored at the
    /// top-left corner of the box
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image_scaled(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()> {
        // Validate the page before decoding anything
        self.page_mut(page)?;

        let index = self.get_or_create_image(data)?;
        let (orig_width, orig_height) = (self.images[index].width, self.images[index].height);
        let (actual_width, actual_height) =
            calculate_scaled_dimensions(orig_width, orig_height, width, height, mode);

        let target = self.page_mut(page)?;
        let pdf_y = target.height - y - actual_height;
        let ops = generate_image_operators(
            &image_resource_name(index),
            x,
            pdf_y,
            actual_width,
            actual_height,
        );

        target.images.insert(index);
        target.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Decode an image once; identical bytes share one XObject
    fn get_or_create_image(&mut self, data: &[u8]) -> Result<usize> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if let Some(&index) = self.image_index.get(&data_hash) {
            return Ok(index);
        }

        let xobject = ImageXObject::from_bytes(data)?;
        self.images.push(xobject);
        let index = self.images.len() - 1;
        self.image_index.insert(data_hash, index);
        Ok(index)
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize the document
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font_ids: BTreeMap<StandardFont, ObjectId> = BTreeMap::new();
        for font in self.pages.iter().flat_map(|p| p.fonts.iter().copied()) {
            font_ids
                .entry(font)
                .or_insert_with(|| doc.add_object(font.to_pdf_dict()));
        }

        let image_ids: Vec<ObjectId> = self
            .images
            .iter()
            .map(|image| doc.add_object(image.to_pdf_stream()))
            .collect();

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content_id = doc.add_object(content_stream(&page.content)?);

            let mut resources = Dictionary::new();
            let mut fonts = Dictionary::new();
            for font in &page.fonts {
                if let Some(&id) = font_ids.get(font) {
                    fonts.set(font.resource_name(), Object::Reference(id));
                }
            }
            resources.set("Font", Object::Dictionary(fonts));

            if !page.images.is_empty() {
                let mut xobjects = Dictionary::new();
                for &index in &page.images {
                    if let Some(&id) = image_ids.get(index) {
                        xobjects.set(image_resource_name(index), Object::Reference(id));
                    }
                }
                resources.set("XObject", Object::Dictionary(xobjects));
            }

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width as _),
                    Object::Real(page.height as _),
                ]),
            );
            page_dict.set("Resources", Object::Dictionary(resources));
            page_dict.set("Contents", Object::Reference(content_id));

            kids.push(Object::Reference(doc.add_object(page_dict)));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", Object::Integer(kids.len() as i64));
        pages_dict.set("Kids", Object::Array(kids));
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let info_id = doc.add_object(self.info_dict());
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    fn info_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        let entries = [
            ("Title", &self.info.title),
            ("Author", &self.info.author),
            ("Subject", &self.info.subject),
            ("Creator", &self.info.creator),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                dict.set(key, text_string(value));
            }
        }
        dict.set("Producer", text_string("quittance pdf-core"));
        dict
    }
}

fn image_resource_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn content_stream(content: &[u8]) -> Result<Stream> {
    let mut dict = Dictionary::new();
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    Ok(Stream::new(dict, deflate(content)?).with_compression(false))
}

/// Encode a PDF text string: plain ASCII stays literal, anything else is
/// written as UTF-16BE with a byte order mark
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn content(doc: &PdfDocument, page: usize) -> String {
        String::from_utf8(doc.pages[page - 1].content.clone()).unwrap()
    }

    #[test]
    fn test_new_document_is_empty() {
        let doc = PdfDocument::new();
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.font(), StandardFont::Helvetica);
        assert_eq!(doc.font_size(), 12.0);
    }

    #[test]
    fn test_add_page_numbers_from_one() {
        let mut doc = PdfDocument::new();
        assert_eq!(doc.add_page(), 1);
        assert_eq!(doc.add_page_with_size(300.0, 200.0), 2);
        assert_eq!(doc.page_size(1).unwrap(), (A4_WIDTH, A4_HEIGHT));
        assert_eq!(doc.page_size(2).unwrap(), (300.0, 200.0));
    }

    #[test]
    fn test_invalid_page() {
        let mut doc = PdfDocument::new();
        doc.add_page();
        assert!(matches!(doc.page_size(0), Err(PdfError::InvalidPage(0, 1))));
        assert!(matches!(
            doc.insert_text("x", 2, 0.0, 0.0, Align::Left),
            Err(PdfError::InvalidPage(2, 1))
        ));
        assert!(matches!(
            doc.insert_text("", 2, 0.0, 0.0, Align::Left),
            Err(PdfError::InvalidPage(2, 1))
        ));
    }

    #[test]
    fn test_insert_text_converts_to_bottom_origin() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page_with_size(500.0, 800.0);
        doc.set_font(StandardFont::HelveticaBold, 10.0);
        doc.insert_text("A", page, 50.0, 100.0, Align::Left).unwrap();

        let ops = content(&doc, page);
        assert!(ops.contains("/F2 10 Tf"));
        assert!(ops.contains("50 700 Td"));
        assert!(ops.contains("<41> Tj"));
        assert!(doc.pages[0].fonts.contains(&StandardFont::HelveticaBold));
    }

    #[test]
    fn test_insert_text_right_aligned() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page_with_size(500.0, 800.0);
        doc.set_font(StandardFont::Helvetica, 10.0);
        // "A" is 667 units: 6.67pt at 10pt
        doc.insert_text("A", page, 100.0, 0.0, Align::Right).unwrap();
        assert!(content(&doc, page).contains("93.33 800 Td"));
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page();
        doc.insert_text("", page, 0.0, 0.0, Align::Left).unwrap();
        assert!(doc.pages[0].content.is_empty());
        assert!(doc.pages[0].fonts.is_empty());
    }

    #[test]
    fn test_text_width_uses_current_font() {
        let mut doc = PdfDocument::new();
        doc.set_font(StandardFont::Helvetica, 10.0);
        let regular = doc.text_width("Loyer");
        doc.set_font(StandardFont::HelveticaBold, 10.0);
        assert!(doc.text_width("Loyer") > regular);
    }

    #[test]
    fn test_draw_shapes() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page_with_size(100.0, 100.0);
        doc.draw_line(page, 0.0, 10.0, 100.0, 10.0, 1.0, Color::black())
            .unwrap();
        doc.draw_rect(page, 10.0, 10.0, 20.0, 30.0, RectStyle::filled(Color::white()))
            .unwrap();

        let ops = content(&doc, page);
        assert!(ops.contains("0 90 m\n100 90 l"));
        assert!(ops.contains("10 60 20 30 re\nf"));
    }

    #[test]
    fn test_text_string_encoding() {
        assert!(matches!(
            text_string("Receipt"),
            Object::String(ref bytes, StringFormat::Literal) if bytes == b"Receipt"
        ));
        assert!(matches!(
            text_string("é"),
            Object::String(ref bytes, StringFormat::Hexadecimal) if bytes == &[0xFE, 0xFF, 0x00, 0xE9]
        ));
    }

    #[test]
    fn test_to_bytes_round_trip() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page();
        doc.insert_text("Quittance", page, 50.0, 50.0, Align::Left)
            .unwrap();
        doc.add_page();
        doc.set_info(DocumentInfo {
            title: Some("Quittance de loyer".to_string()),
            ..DocumentInfo::default()
        });

        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }
}
