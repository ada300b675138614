//! Image handling for PDF generation.
//!
//! Per PDF spec Section 8.9, images are represented as XObjects.
//!
//! # Supported Formats
//!
//! - **JPEG**: Pass-through embedding using DCTDecode filter
//! - **PNG**: Decoded, then Flate-compressed with an optional soft mask
//! - **data: URLs**: base64 payloads of either of the above

use std::io::Write;

use base64::Engine;

use crate::object::{Dictionary, Object};

/// Image format for PDF embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image (DCTDecode filter)
    Jpeg,
    /// PNG image (FlateDecode filter)
    Png,
}

/// Color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// CMYK color (4 components per pixel)
    DeviceCMYK,
}

impl ColorSpace {
    /// Get the PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// Image data for PDF embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per component (always 8 here)
    pub bits_per_component: u8,
    /// Color space
    pub color_space: ColorSpace,
    /// Image format
    pub format: ImageFormat,
    /// Encoded image data as it goes into the stream
    pub data: Vec<u8>,
    /// Optional soft mask (alpha channel) data, Flate-compressed
    pub soft_mask: Option<Vec<u8>>,
}

impl ImageData {
    /// Load a JPEG image from raw JPEG data.
    ///
    /// JPEG images can be embedded directly without transcoding.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        let (width, height, color_space) = parse_jpeg_header(&data)?;

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Jpeg,
            data,
            soft_mask: None,
        })
    }

    /// Load a PNG image from raw PNG data.
    pub fn from_png(data: &[u8]) -> Result<Self, ImageError> {
        use image::GenericImageView;

        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| ImageError::DecodeError(e.to_string()))?;

        let (width, height) = img.dimensions();

        let (color_space, pixels, alpha) = match img.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                (ColorSpace::DeviceGray, img.to_luma8().into_raw(), None)
            },
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = img.to_luma_alpha8();
                let mut gray = Vec::with_capacity((width * height) as usize);
                let mut alpha_channel = Vec::with_capacity((width * height) as usize);
                for pixel in la.pixels() {
                    gray.push(pixel.0[0]);
                    alpha_channel.push(pixel.0[1]);
                }
                (ColorSpace::DeviceGray, gray, Some(alpha_channel))
            },
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = img.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                let mut alpha_channel = Vec::with_capacity((width * height) as usize);
                for pixel in rgba.pixels() {
                    rgb.extend_from_slice(&pixel.0[..3]);
                    alpha_channel.push(pixel.0[3]);
                }
                (ColorSpace::DeviceRGB, rgb, Some(alpha_channel))
            },
            _ => (ColorSpace::DeviceRGB, img.to_rgb8().into_raw(), None),
        };

        // A fully opaque alpha channel adds nothing
        let alpha = alpha.filter(|a| a.iter().any(|&v| v != 255));

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Png,
            data: compress_image_data(&pixels)?,
            soft_mask: alpha.map(|a| compress_image_data(&a)).transpose()?,
        })
    }

    /// Load an image from raw bytes, auto-detecting format.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageError> {
        if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
            return Self::from_jpeg(data.to_vec());
        }

        if data.len() >= 8 && &data[0..8] == b"\x89PNG\r\n\x1a\n" {
            return Self::from_png(data);
        }

        Err(ImageError::UnsupportedFormat)
    }

    /// Load an image from a `data:` URL with a base64 payload.
    ///
    /// Remote URLs are rejected: image bytes must already be resolved.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::InvalidData("not a data: URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::InvalidData("data: URL has no payload".to_string()))?;
        if !header.ends_with(";base64") {
            return Err(ImageError::InvalidData("data: URL is not base64-encoded".to_string()));
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::DecodeError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Build the PDF Image XObject dictionary.
    pub fn build_xobject_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();

        dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert(
            "ColorSpace".to_string(),
            Object::Name(self.color_space.pdf_name().to_string()),
        );
        dict.insert(
            "BitsPerComponent".to_string(),
            Object::Integer(self.bits_per_component as i64),
        );

        let filter = match self.format {
            ImageFormat::Jpeg => "DCTDecode",
            ImageFormat::Png => "FlateDecode",
        };
        dict.insert("Filter".to_string(), Object::Name(filter.to_string()));
        dict.insert("Length".to_string(), Object::Integer(self.data.len() as i64));

        dict
    }

    /// Build a soft mask (alpha channel) XObject dictionary.
    pub fn build_soft_mask_dict(&self) -> Option<Dictionary> {
        self.soft_mask.as_ref().map(|mask_data| {
            let mut dict = Dictionary::new();
            dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
            dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
            dict.insert("Width".to_string(), Object::Integer(self.width as i64));
            dict.insert("Height".to_string(), Object::Integer(self.height as i64));
            dict.insert("ColorSpace".to_string(), Object::Name("DeviceGray".to_string()));
            dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
            dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));
            dict.insert("Length".to_string(), Object::Integer(mask_data.len() as i64));
            dict
        })
    }

    /// Get the aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Calculate dimensions to fit within a bounding box while maintaining aspect ratio.
    pub fn fit_to_box(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let aspect = self.aspect_ratio();
        let box_aspect = max_width / max_height;

        if aspect > box_aspect {
            (max_width, max_width / aspect)
        } else {
            (max_height * aspect, max_height)
        }
    }
}

/// Image embedding error.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Unsupported image format
    #[error("Unsupported image format")]
    UnsupportedFormat,

    /// Failed to decode image
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    /// Failed to compress image data
    #[error("Compression error: {0}")]
    CompressionError(String),

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),
}

/// Parse JPEG header to extract dimensions and color space.
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, ColorSpace), ImageError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidData("Not a valid JPEG".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        // Fill bytes and stuffed zeros
        if marker == 0xFF || marker == 0x00 {
            continue;
        }

        // SOF markers (Start of Frame), excluding DHT/JPG/DAC
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            if pos + 8 > data.len() {
                return Err(ImageError::InvalidData("Truncated JPEG header".to_string()));
            }

            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let color_space = match data[pos + 7] {
                1 => ColorSpace::DeviceGray,
                4 => ColorSpace::DeviceCMYK,
                _ => ColorSpace::DeviceRGB,
            };

            return Ok((width, height, color_space));
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += length;
    }

    Err(ImageError::InvalidData("Could not find JPEG dimensions".to_string()))
}

/// Compress image data using Flate.
fn compress_image_data(data: &[u8]) -> Result<Vec<u8>, ImageError> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| ImageError::CompressionError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ImageError::CompressionError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SOI, APP0 stub, SOF0 for a 3x2 RGB image, EOI.
    fn tiny_jpeg_header() -> Vec<u8> {
        vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0 (length 4)
            0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x02, 0x00, 0x03, 0x03, // SOF0: h=2, w=3, 3 comps
            0x01, 0x11, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01, // component specs
            0xFF, 0xD9, // EOI
        ]
    }

    fn sample(width: u32, height: u32) -> ImageData {
        ImageData {
            width,
            height,
            bits_per_component: 8,
            color_space: ColorSpace::DeviceRGB,
            format: ImageFormat::Jpeg,
            data: vec![],
            soft_mask: None,
        }
    }

    #[test]
    fn test_jpeg_header_parsing() {
        let image = ImageData::from_jpeg(tiny_jpeg_header()).unwrap();
        assert_eq!(image.width, 3);
        assert_eq!(image.height, 2);
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!(image.format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_invalid_jpeg_header() {
        let result = parse_jpeg_header(&[0x00, 0x00]);
        assert!(matches!(result, Err(ImageError::InvalidData(_))));
    }

    #[test]
    fn test_unsupported_format() {
        assert!(matches!(
            ImageData::from_bytes(b"GIF89a......"),
            Err(ImageError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_data_url() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(tiny_jpeg_header());
        let url = format!("data:image/jpeg;base64,{}", encoded);
        let image = ImageData::from_data_url(&url).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
    }

    #[test]
    fn test_remote_url_rejected() {
        let result = ImageData::from_data_url("https://cdn.example.org/lesion.jpg");
        assert!(matches!(result, Err(ImageError::InvalidData(_))));
    }

    #[test]
    fn test_image_fit_to_box() {
        let image = sample(200, 100);

        let (w, h) = image.fit_to_box(100.0, 100.0);
        assert!((w - 100.0).abs() < 0.001);
        assert!((h - 50.0).abs() < 0.001);

        let tall = sample(100, 400);
        let (w, h) = tall.fit_to_box(55.0, 55.0);
        assert!((w - 13.75).abs() < 0.001);
        assert!((h - 55.0).abs() < 0.001);
    }

    #[test]
    fn test_xobject_dict_jpeg() {
        let mut image = sample(100, 50);
        image.data = vec![0xFF, 0xD8];

        let dict = image.build_xobject_dict();

        assert_eq!(dict.get("Subtype"), Some(&Object::Name("Image".to_string())));
        assert_eq!(dict.get("Width"), Some(&Object::Integer(100)));
        assert_eq!(dict.get("Height"), Some(&Object::Integer(50)));
        assert_eq!(dict.get("Filter"), Some(&Object::Name("DCTDecode".to_string())));
        assert_eq!(dict.get("Length"), Some(&Object::Integer(2)));
        assert!(image.build_soft_mask_dict().is_none());
    }
}
