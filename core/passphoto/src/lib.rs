//! Passport photo processing: locate the face, crop around it, and produce a
//! 413×531 px, 300 DPI JPEG on a white background.
//!
//! # Example
//!
//! ```no_run
//! use passphoto::PassportPhotoMaker;
//!
//! let raw_bytes = std::fs::read("headshot.jpg").unwrap();
//! let photo = PassportPhotoMaker::new(raw_bytes)
//!     .unwrap()
//!     .make()
//!     .unwrap();
//! std::fs::write("passport.jpg", &photo.data).unwrap();
//! ```
#![warn(missing_docs)]

mod crop;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
/// EXIF orientation handling.
pub mod orientation;
mod output;
mod render;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;

use std::path::Path;

use image::Rgb;

/// Crop planning for the passport frame.
pub use crop::{plan_crop, CropRegion};
/// Error type returned by passphoto operations.
pub use error::PassphotoError;
/// Face detection trait, face bounding-box type and largest-face selection.
pub use face_detector::{locate_face, FaceBounds, FaceDetector};
/// Atomic file output.
pub use output::write_atomic;
/// Render pipeline and JFIF density inspection.
pub use render::{read_jfif_density, render};
#[cfg(feature = "rustface")]
/// Built-in detector that loads the SeetaFace model.
pub use rustface_backend::RustfaceDetector;

/// Output geometry, resolution and appearance of the passport photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSpec {
    /// Output width in pixels.
    pub output_width: u32,
    /// Output height in pixels.
    pub output_height: u32,
    /// Resolution written to the JFIF header, in dots per inch.
    pub dpi: u16,
    /// Target face height as a fraction of the output height.
    pub head_height_fraction: f64,
    /// Opaque color that transparent pixels are composited onto.
    pub background: Rgb<u8>,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
}

impl TargetSpec {
    /// 35×45 mm at 300 DPI, head at 72% of the frame height, white background.
    pub const PASSPORT: TargetSpec = TargetSpec {
        output_width: 413,
        output_height: 531,
        dpi: 300,
        head_height_fraction: 0.72,
        background: Rgb([255, 255, 255]),
        jpeg_quality: 95,
    };
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self::PASSPORT
    }
}

/// Result of a single passport photo render.
#[derive(Debug, Clone)]
pub struct PassportPhoto {
    /// The encoded JPEG bytes.
    pub data: Vec<u8>,

    /// Width of the output image in pixels.
    pub width: u32,

    /// Height of the output image in pixels.
    pub height: u32,

    /// Resolution embedded in the output, in dots per inch.
    pub dpi: u16,

    /// Region of the (upright) source image that was used.
    pub crop: CropRegion,

    /// Face that anchored the crop, in source image coordinates.
    /// `None` means the center-crop fallback was used.
    pub face: Option<FaceBounds>,

    /// Size of the original input in bytes.
    pub original_size: usize,
}

/// Builder for passport photos.
///
/// Validates the input format on construction; decoding, detection, crop
/// planning and rendering happen in [`PassportPhotoMaker::make`].
pub struct PassportPhotoMaker {
    input: Vec<u8>,
    target: TargetSpec,
    /// Without a detector every photo takes the center-crop fallback.
    detector: Option<Box<dyn FaceDetector>>,
}

impl PassportPhotoMaker {
    /// Create a new maker from raw image bytes (JPEG, PNG, WebP, ...).
    pub fn new(input: Vec<u8>) -> Result<Self, PassphotoError> {
        render::detect_format(&input)?;

        Ok(Self {
            input,
            target: TargetSpec::PASSPORT,
            detector: None,
        })
    }

    /// Override the output specification (default: [`TargetSpec::PASSPORT`]).
    pub fn target(mut self, target: TargetSpec) -> Self {
        self.target = target;
        self
    }

    /// Provide a face detector implementation.
    ///
    /// ```no_run
    /// use passphoto::{FaceBounds, FaceDetector, PassphotoError, PassportPhotoMaker};
    ///
    /// struct MyDetector;
    /// impl FaceDetector for MyDetector {
    ///     fn detect(&self, gray: &[u8], width: u32, height: u32)
    ///         -> Result<Vec<FaceBounds>, PassphotoError> {
    ///         Ok(vec![])
    ///     }
    /// }
    ///
    /// let bytes = std::fs::read("photo.jpg").unwrap();
    /// let photo = PassportPhotoMaker::new(bytes).unwrap()
    ///     .face_detector(Box::new(MyDetector))
    ///     .make().unwrap();
    /// ```
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Decode, locate the face, plan the crop and render the photo.
    pub fn make(self) -> Result<PassportPhoto, PassphotoError> {
        let decoded = render::decode_image(&self.input)?;
        let upright = match orientation::read_orientation(&self.input) {
            Some(o) => orientation::apply_orientation(decoded, o),
            None => decoded,
        };

        let (width, height) = (upright.width(), upright.height());
        if width == 0 || height == 0 {
            return Err(PassphotoError::InvalidGeometry { width, height });
        }

        let face = locate_face(&upright, self.detector.as_deref());
        let crop = plan_crop(width, height, face.as_ref(), &self.target)?;
        tracing::debug!(
            ?face,
            ?crop,
            source_width = width,
            source_height = height,
            "crop planned"
        );

        let data = render(&upright, crop, &self.target)?;

        Ok(PassportPhoto {
            data,
            width: self.target.output_width,
            height: self.target.output_height,
            dpi: self.target.dpi,
            crop,
            face,
            original_size: self.input.len(),
        })
    }
}

/// Read `input`, make a passport photo and write it atomically to `output`.
///
/// Nothing is written when reading, decoding or rendering fails.
pub fn process(
    input: &Path,
    output: &Path,
    detector: Option<Box<dyn FaceDetector>>,
) -> Result<PassportPhoto, PassphotoError> {
    let bytes = std::fs::read(input)
        .map_err(|e| PassphotoError::DecodeError(format!("{}: {e}", input.display())))?;

    let mut maker = PassportPhotoMaker::new(bytes)?;
    if let Some(detector) = detector {
        maker = maker.face_detector(detector);
    }
    let photo = maker.make()?;

    write_atomic(output, &photo.data)?;
    Ok(photo)
}
