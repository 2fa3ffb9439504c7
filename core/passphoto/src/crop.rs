use crate::error::PassphotoError;
use crate::face_detector::FaceBounds;
use crate::TargetSpec;

/// Crop region within the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    /// X coordinate of the top-left corner (pixels).
    pub x: u32,
    /// Y coordinate of the top-left corner (pixels).
    pub y: u32,
    /// Width of the region (pixels).
    pub width: u32,
    /// Height of the region (pixels).
    pub height: u32,
}

/// Plan the crop rectangle for a passport photo.
///
/// With a face, the crop is scaled so the face height becomes
/// `head_height_fraction` of the output height and centered on the face.
/// Without one, the largest centered rectangle with the output aspect ratio
/// is used. The result always lies fully inside the source image.
pub fn plan_crop(
    source_width: u32,
    source_height: u32,
    face: Option<&FaceBounds>,
    spec: &TargetSpec,
) -> Result<CropRegion, PassphotoError> {
    if source_width == 0 || source_height == 0 {
        return Err(PassphotoError::InvalidGeometry {
            width: source_width,
            height: source_height,
        });
    }
    if spec.output_width == 0 || spec.output_height == 0 {
        return Err(PassphotoError::InvalidGeometry {
            width: spec.output_width,
            height: spec.output_height,
        });
    }

    let region = match face {
        Some(face) => face_crop(source_width, source_height, face, spec),
        None => center_crop(source_width, source_height, spec),
    };
    Ok(region)
}

/// Largest rectangle with the output aspect ratio that fits in the source.
fn fitted_size(source_width: u32, source_height: u32, spec: &TargetSpec) -> (u32, u32) {
    let (src_w, src_h) = (source_width as u64, source_height as u64);
    let (out_w, out_h) = (spec.output_width as u64, spec.output_height as u64);

    if src_w * out_h > out_w * src_h {
        // Source is wider than the target — constrain by height
        let w = (src_h * out_w / out_h) as u32;
        (w.max(1), source_height)
    } else {
        // Source is taller than (or equal to) the target — constrain by width
        let h = (src_w * out_h / out_w) as u32;
        (source_width, h.max(1))
    }
}

fn center_crop(source_width: u32, source_height: u32, spec: &TargetSpec) -> CropRegion {
    let (width, height) = fitted_size(source_width, source_height, spec);
    CropRegion {
        x: (source_width - width) / 2,
        y: (source_height - height) / 2,
        width,
        height,
    }
}

fn face_crop(
    source_width: u32,
    source_height: u32,
    face: &FaceBounds,
    spec: &TargetSpec,
) -> CropRegion {
    // Source pixels → output pixels.
    let desired_head_height = spec.output_height as f64 * spec.head_height_fraction;
    let scale = if face.height > 0 {
        desired_head_height / face.height as f64
    } else {
        1.0
    };

    let mut width = ((spec.output_width as f64 / scale).floor() as u32).max(1);
    let mut height = ((spec.output_height as f64 / scale).floor() as u32).max(1);

    if width > source_width || height > source_height {
        (width, height) = fitted_size(source_width, source_height, spec);
    }

    let center_x = face.x as i64 + face.width as i64 / 2;
    let center_y = face.y as i64 + face.height as i64 / 2;
    let x = (center_x - width as i64 / 2).clamp(0, (source_width - width) as i64);
    let y = (center_y - height as i64 / 2).clamp(0, (source_height - height) as i64);

    CropRegion {
        x: x as u32,
        y: y as u32,
        width,
        height,
    }
}
