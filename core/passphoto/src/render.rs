use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageFormat, Rgb, RgbImage, RgbaImage};

use crate::crop::CropRegion;
use crate::error::PassphotoError;
use crate::TargetSpec;

/// Decode input bytes into a `DynamicImage`.
pub(crate) fn decode_image(input: &[u8]) -> Result<DynamicImage, PassphotoError> {
    image::load_from_memory(input).map_err(|e| PassphotoError::DecodeError(e.to_string()))
}

/// Detect the input image format from the raw bytes.
pub(crate) fn detect_format(input: &[u8]) -> Result<ImageFormat, PassphotoError> {
    image::guess_format(input).map_err(|e| PassphotoError::DecodeError(e.to_string()))
}

/// Resize to exactly the target dimensions.
///
/// The planned crop already has the output aspect ratio, so this never
/// distorts beyond a pixel of rounding.
pub(crate) fn resize_image(image: &DynamicImage, spec: &TargetSpec) -> DynamicImage {
    image.resize_exact(spec.output_width, spec.output_height, FilterType::Lanczos3)
}

/// Flatten alpha channel by compositing onto an opaque background.
pub(crate) fn flatten_alpha(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    let rgba: RgbaImage = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let mut rgb = RgbImage::new(width, height);
    let [bg_r, bg_g, bg_b] = background.0;

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let blend = |fg: u8, bg: u8| (fg as f32 * alpha + bg as f32 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, Rgb([blend(r, bg_r), blend(g, bg_g), blend(b, bg_b)]));
    }

    rgb
}

/// Encode as baseline sRGB JPEG with a JFIF density of `dpi` × `dpi`.
pub(crate) fn encode_jpeg(
    image: &RgbImage,
    quality: u8,
    dpi: u16,
) -> Result<Vec<u8>, PassphotoError> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder.set_pixel_density(PixelDensity::dpi(dpi));
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| PassphotoError::EncodeError(e.to_string()))?;
    Ok(buffer)
}

/// Render pipeline: crop → resize → flatten → encode.
pub fn render(
    image: &DynamicImage,
    crop: CropRegion,
    spec: &TargetSpec,
) -> Result<Vec<u8>, PassphotoError> {
    let CropRegion {
        x,
        y,
        width,
        height,
    } = crop;
    let cropped = image.crop_imm(x, y, width, height);
    let resized = resize_image(&cropped, spec);
    let flattened = flatten_alpha(&resized, spec.background);
    encode_jpeg(&flattened, spec.jpeg_quality, spec.dpi)
}

/// Read the JFIF pixel density from a JPEG, converted to dots per inch.
///
/// Returns `None` when the data does not start with a JFIF APP0 segment or
/// the density unit is not absolute.
pub fn read_jfif_density(data: &[u8]) -> Option<(u16, u16)> {
    // SOI, APP0 marker, length, "JFIF\0", version, units, Xdensity, Ydensity
    if data.len() < 18 || data[0..4] != [0xFF, 0xD8, 0xFF, 0xE0] || &data[6..11] != b"JFIF\0" {
        return None;
    }
    let units = data[13];
    let x = u16::from_be_bytes([data[14], data[15]]);
    let y = u16::from_be_bytes([data[16], data[17]]);
    match units {
        1 => Some((x, y)),
        // Dots per centimetre
        2 => Some((
            (x as f64 * 2.54).round() as u16,
            (y as f64 * 2.54).round() as u16,
        )),
        _ => None,
    }
}
