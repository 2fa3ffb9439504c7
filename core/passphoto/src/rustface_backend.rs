use std::path::Path;

use crate::error::PassphotoError;
use crate::face_detector::{FaceBounds, FaceDetector};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Create a detector with the model embedded at build time from
    /// `model/seeta_fd_frontal_v1.0.bin` in the workspace root.
    pub fn bundled() -> Result<Self, PassphotoError> {
        let model_data: &[u8] = include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../model/seeta_fd_frontal_v1.0.bin"
        ));
        Self::from_bytes(model_data)
    }

    /// Create a detector from raw SeetaFace model bytes.
    pub fn from_bytes(model_data: &[u8]) -> Result<Self, PassphotoError> {
        let model = rustface::read_model(std::io::Cursor::new(model_data))
            .map_err(|e| PassphotoError::DetectorUnavailable(e.to_string()))?;
        Ok(Self { model })
    }

    /// Create a detector from a SeetaFace model file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PassphotoError> {
        let data = std::fs::read(path.as_ref()).map_err(|e| {
            PassphotoError::DetectorUnavailable(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_bytes(&data)
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<FaceBounds>, PassphotoError> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        // SeetaFace may report boxes hanging off the top/left edge.
        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                let x = bbox.x().max(0) as u32;
                let y = bbox.y().max(0) as u32;
                let cut_x = (x as i64 - bbox.x() as i64) as u32;
                let cut_y = (y as i64 - bbox.y() as i64) as u32;
                FaceBounds {
                    x,
                    y,
                    width: bbox.width().saturating_sub(cut_x),
                    height: bbox.height().saturating_sub(cut_y),
                    confidence: face.score(),
                }
            })
            .collect())
    }
}
