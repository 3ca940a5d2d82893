//! Receipt rendering

use crate::binding::{is_truthy, resolve_binding, value_to_string};
use crate::layout::*;
use crate::model::ReceiptData;
use crate::signature::Signature;
use crate::Result;
use fr_text::wrap_lines;
use pdf_core::{Color, DocumentInfo, ImageScaleMode, PdfDocument, RectStyle};
use serde_json::Value;
use tracing::debug;

/// Renders receipts from a layout
pub struct ReceiptRenderer<'a> {
    layout: &'a Layout,
    /// Landlord signature drawn into image blocks
    signature: Option<&'a Signature>,
}

impl<'a> ReceiptRenderer<'a> {
    /// Create a new renderer for a layout
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            signature: None,
        }
    }

    /// Set the landlord signature
    pub fn with_signature(mut self, signature: &'a Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Render one receipt to PDF bytes
    pub fn render(&self, data: &ReceiptData) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new();
        let page = doc.add_page_with_size(self.layout.page.width, self.layout.page.height);

        doc.set_info(DocumentInfo {
            title: Some(data.title()),
            author: Some(data.landlord.name.clone()),
            subject: Some(format!("Quittance de loyer de {}", data.tenant.name)),
            creator: Some("quittance".to_string()),
        });

        let mut value = data.to_value();
        value["hasSignature"] = Value::Bool(self.signature.is_some());

        self.render_page(&mut doc, page, &value)?;

        let bytes = doc.to_bytes()?;
        debug!(
            "Rendered receipt for {} ({}), {} bytes",
            data.tenant.name,
            data.period.period_start,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Draw every enabled block of the layout onto `page`
    pub fn render_page(&self, doc: &mut PdfDocument, page: usize, data: &Value) -> Result<()> {
        for block in &self.layout.blocks {
            if !is_block_enabled(block, data) {
                continue;
            }

            match block {
                Block::Text(b) => self.render_text_block(doc, page, b, data)?,
                Block::Line(b) => render_line_block(doc, page, b)?,
                Block::Rect(b) => render_rect_block(doc, page, b)?,
                Block::Image(b) => self.render_image_block(doc, page, b)?,
            }
        }
        Ok(())
    }

    fn render_text_block(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        block: &TextBlock,
        data: &Value,
    ) -> Result<()> {
        let text = match &block.bind {
            Some(bind) => resolve_binding(bind, data)
                .map(value_to_string)
                .unwrap_or_default(),
            None => block.text.clone().unwrap_or_default(),
        };

        if text.trim().is_empty() {
            return Ok(());
        }

        let font = block.font.clone().unwrap_or_default();
        let color = match &font.color {
            Some(hex) => parse_color(hex)?,
            None => Color::black(),
        };
        doc.set_font(font.style.standard_font(), font.size);
        doc.set_text_color(color);

        let (lines, line_height) = match &block.word_wrap {
            Some(wrap) => (wrap_lines(&text, wrap.max_chars), wrap.line_height),
            None => (wrap_lines(&text, 0), default_line_height()),
        };

        let align = block.align.into();
        let mut y = block.position.y;
        for line in &lines {
            doc.insert_text(line, page, block.position.x, y, align)?;
            y += line_height;
        }

        Ok(())
    }

    fn render_image_block(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        block: &ImageBlock,
    ) -> Result<()> {
        let Some(signature) = self.signature else {
            return Ok(());
        };

        doc.insert_image_scaled(
            signature.bytes(),
            page,
            block.position.x,
            block.position.y,
            block.size.width,
            block.size.height,
            ImageScaleMode::FitBox,
        )?;
        Ok(())
    }
}

fn render_line_block(doc: &mut PdfDocument, page: usize, block: &LineBlock) -> Result<()> {
    let color = match &block.color {
        Some(hex) => parse_color(hex)?,
        None => Color::black(),
    };
    doc.draw_line(
        page,
        block.from.x,
        block.from.y,
        block.to.x,
        block.to.y,
        block.width,
        color,
    )?;
    Ok(())
}

fn render_rect_block(doc: &mut PdfDocument, page: usize, block: &RectBlock) -> Result<()> {
    let style = RectStyle {
        stroke: block.stroke.as_deref().map(parse_color).transpose()?,
        fill: block.fill.as_deref().map(parse_color).transpose()?,
        line_width: block.line_width,
    };
    doc.draw_rect(
        page,
        block.position.x,
        block.position.y,
        block.size.width,
        block.size.height,
        style,
    )?;
    Ok(())
}

/// Check if a block is enabled based on its enable binding
fn is_block_enabled(block: &Block, data: &Value) -> bool {
    match block.enable() {
        None => true,
        Some(bind) => resolve_binding(bind, data).is_some_and(is_truthy),
    }
}
