//! Image handling for PDF documents

use crate::graphics::num;
use crate::{PdfError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Object, Stream};
use std::io::{Cursor, Write};

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// MIME type of the format
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
        }
    }
}

/// Image scaling mode for insert_image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Stretch to exact dimensions
    Stretch,
    /// Scale proportionally based on width, auto-calculate height
    FitWidth,
    /// Scale proportionally based on height, auto-calculate width
    FitHeight,
    /// Fit within bounding box, preserving aspect ratio
    #[default]
    FitBox,
}

/// Calculate display dimensions based on scaling mode
///
/// # Returns
/// (actual_width, actual_height) in points
pub fn calculate_scaled_dimensions(
    original_width: u32,
    original_height: u32,
    target_width: f64,
    target_height: f64,
    mode: ImageScaleMode,
) -> (f64, f64) {
    if original_width == 0 || original_height == 0 {
        return (target_width, target_height);
    }

    let (w, h) = (f64::from(original_width), f64::from(original_height));
    match mode {
        ImageScaleMode::Stretch => (target_width, target_height),
        ImageScaleMode::FitWidth => (target_width, target_width * h / w),
        ImageScaleMode::FitHeight => (target_height * w / h, target_height),
        ImageScaleMode::FitBox => {
            let scale = (target_width / w).min(target_height / h);
            (w * scale, h * scale)
        }
    }
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }

    if data[..3] == [0xFF, 0xD8, 0xFF] {
        return Ok(ImageFormat::Jpeg);
    }

    if data[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Ok(ImageFormat::Gif);
    }

    Err(PdfError::ImageError("Unknown image format".to_string()))
}

/// Image dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Read image dimensions from the header without decoding pixels
pub fn get_dimensions(data: &[u8]) -> Result<ImageDimensions> {
    match detect_format(data)? {
        ImageFormat::Jpeg => {
            let info = get_jpeg_info(data)?;
            Ok(ImageDimensions {
                width: info.width,
                height: info.height,
            })
        }
        ImageFormat::Png => {
            // IHDR is always the first chunk
            if data.len() < 24 || &data[12..16] != b"IHDR" {
                return Err(PdfError::ImageError("Invalid PNG header".to_string()));
            }
            Ok(ImageDimensions {
                width: u32::from_be_bytes([data[16], data[17], data[18], data[19]]),
                height: u32::from_be_bytes([data[20], data[21], data[22], data[23]]),
            })
        }
        ImageFormat::Gif => {
            // logical screen descriptor, little-endian
            if data.len() < 10 {
                return Err(PdfError::ImageError("Invalid GIF header".to_string()));
            }
            Ok(ImageDimensions {
                width: u32::from(u16::from_le_bytes([data[6], data[7]])),
                height: u32::from(u16::from_le_bytes([data[8], data[9]])),
            })
        }
    }
}

/// JPEG frame header fields
#[derive(Debug, Clone, Copy)]
struct JpegInfo {
    width: u32,
    height: u32,
    num_components: u8,
}

/// Find the first SOF segment of a JPEG stream
fn get_jpeg_info(data: &[u8]) -> Result<JpegInfo> {
    // SOF layout after the marker: length(2) precision(1) height(2) width(2) components(1)
    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];
        // DHT, JPG and DAC share the C4/C8/CC range but are not frame headers
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            return Ok(JpegInfo {
                height: u32::from(u16::from_be_bytes([data[i + 5], data[i + 6]])),
                width: u32::from(u16::from_be_bytes([data[i + 7], data[i + 8]])),
                num_components: data[i + 9],
            });
        }

        let length = usize::from(u16::from_be_bytes([data[i + 2], data[i + 3]]));
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(PdfError::ImageError("Could not parse JPEG info".to_string()))
}

/// Zlib-compress bytes for a FlateDecode stream
pub(crate) fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Blend a channel over a white background
fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" otherwise)
    pub filter: String,
    /// Raw image data (compressed)
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Create an XObject from JPEG, PNG or GIF bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => match get_jpeg_info(data) {
                // CMYK and other component layouts are re-encoded
                Ok(info) if matches!(info.num_components, 1 | 3) => Ok(Self::from_jpeg(data, info)),
                _ => Self::from_decoded(data),
            },
            ImageFormat::Png | ImageFormat::Gif => Self::from_decoded(data),
        }
    }

    /// JPEG data is embedded as is with DCTDecode
    fn from_jpeg(data: &[u8], info: JpegInfo) -> Self {
        let color_space = if info.num_components == 1 {
            "DeviceGray"
        } else {
            "DeviceRGB"
        };

        Self {
            width: info.width,
            height: info.height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "DCTDecode".to_string(),
            data: data.to_vec(),
        }
    }

    /// Decode the image, flatten any alpha channel on white and
    /// Flate-compress the raw samples
    fn from_decoded(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let image = DynamicImage::from_decoder(decoder)?;

        let (raw, color_space) = match color_type {
            image::ColorType::L8 | image::ColorType::L16 => {
                (image.to_luma8().into_raw(), "DeviceGray")
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let gray = image
                    .to_luma_alpha8()
                    .pixels()
                    .map(|p| over_white(p[0], p[1]))
                    .collect();
                (gray, "DeviceGray")
            }
            _ if color_type.has_alpha() => {
                let rgba = image.to_rgba8();
                let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
                for p in rgba.pixels() {
                    rgb.extend_from_slice(&[
                        over_white(p[0], p[3]),
                        over_white(p[1], p[3]),
                        over_white(p[2], p[3]),
                    ]);
                }
                (rgb, "DeviceRGB")
            }
            _ => (image.to_rgb8().into_raw(), "DeviceRGB"),
        };

        Ok(Self {
            width,
            height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: deflate(&raw)?,
        })
    }

    /// Convert to lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", i64::from(self.width));
        dict.set("Height", i64::from(self.height));
        dict.set("ColorSpace", Object::Name(self.color_space.as_bytes().to_vec()));
        dict.set("BitsPerComponent", i64::from(self.bits_per_component));
        dict.set("Filter", Object::Name(self.filter.as_bytes().to_vec()));
        dict.set("Length", self.data.len() as i64);

        // already compressed; stop lopdf from compressing again
        Stream::new(dict, self.data.clone()).with_compression(false)
    }
}

/// Generate operators to draw image at position
///
/// `(x, y)` is the lower-left corner in PDF coordinates.
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{image_name} Do\nQ\n",
        num(width),
        num(height),
        num(x),
        num(y)
    )
    .into_bytes()
}
