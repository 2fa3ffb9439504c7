//! Print the detected face and the planned crop for each image given.
//!
//! Usage:
//!   cargo run --example debug_crop_plan --features rustface -- photo1.jpg photo2.png
//!
//! Without the `rustface` feature every image shows the center-crop fallback.

use passphoto::{locate_face, plan_crop, FaceDetector, TargetSpec};

#[cfg(feature = "rustface")]
fn detector() -> Option<Box<dyn FaceDetector>> {
    match passphoto::RustfaceDetector::bundled() {
        Ok(d) => Some(Box::new(d)),
        Err(e) => {
            eprintln!("detector unavailable: {e}");
            None
        }
    }
}

#[cfg(not(feature = "rustface"))]
fn detector() -> Option<Box<dyn FaceDetector>> {
    None
}

fn main() {
    let spec = TargetSpec::PASSPORT;
    let detector = detector();

    for path in std::env::args().skip(1) {
        let image = match image::open(&path) {
            Ok(image) => image,
            Err(e) => {
                println!("=== {path}: {e}");
                continue;
            }
        };
        let (width, height) = (image.width(), image.height());
        println!("=== {path} ({width}x{height}) ===");

        let face = locate_face(&image, detector.as_deref());
        match &face {
            Some(f) => println!(
                "  face: ({}, {}, {}x{}), score={:.2}",
                f.x, f.y, f.width, f.height, f.confidence
            ),
            None => println!("  no face, falling back to center crop"),
        }

        match plan_crop(width, height, face.as_ref(), &spec) {
            Ok(crop) => println!(
                "  crop: ({}, {}, {}x{})",
                crop.x, crop.y, crop.width, crop.height
            ),
            Err(e) => println!("  crop failed: {e}"),
        }
        println!();
    }
}
