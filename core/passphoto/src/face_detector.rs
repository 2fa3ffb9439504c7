use std::panic::{self, AssertUnwindSafe};

use image::DynamicImage;

use crate::error::PassphotoError;

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: u32,
    /// Y coordinate of the top-left corner (pixels).
    pub y: u32,
    /// Width of the bounding box (pixels).
    pub width: u32,
    /// Height of the bounding box (pixels).
    pub height: u32,
    /// Detection confidence score. Not used for selection.
    pub confidence: f64,
}

impl FaceBounds {
    /// Create a bounding box with a neutral confidence score.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: 0.0,
        }
    }

    /// Box area in square pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to provide a custom face detector (ONNX, dlib, etc.)
/// and pass it to [`crate::PassportPhotoMaker::face_detector`].
///
/// Detection is best-effort: an `Err` or a panic is logged and treated
/// exactly like "no face found".
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32)
        -> Result<Vec<FaceBounds>, PassphotoError>;
}

/// Run `detector` over `image` and return the largest face by area.
///
/// Returns `None` when there is no detector, no face, or the detector fails.
/// On equal areas the first box reported wins.
pub fn locate_face(
    image: &DynamicImage,
    detector: Option<&dyn FaceDetector>,
) -> Option<FaceBounds> {
    let detector = detector?;
    let gray = image.to_luma8();

    let detected = panic::catch_unwind(AssertUnwindSafe(|| {
        detector.detect(gray.as_raw(), gray.width(), gray.height())
    }));

    let faces = match detected {
        Ok(Ok(faces)) => faces,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "face detection failed, using center crop");
            return None;
        }
        Err(_) => {
            tracing::warn!("face detector panicked, using center crop");
            return None;
        }
    };

    tracing::debug!(count = faces.len(), "faces detected");

    faces
        .into_iter()
        .fold(None, |best: Option<FaceBounds>, face| match best {
            Some(b) if b.area() >= face.area() => Some(b),
            _ => Some(face),
        })
}
