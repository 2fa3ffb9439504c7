use thiserror::Error;

#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum PassphotoError {
    /// Input could not be read, is not a recognized image format, or is corrupt.
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    /// A source or target dimension is zero.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    /// Encoding or writing the output failed.
    #[error("failed to encode image: {0}")]
    EncodeError(String),

    /// Detector could not start or failed. Never escapes `locate_face`.
    #[error("face detection unavailable: {0}")]
    DetectorUnavailable(String),
}
