use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbImage, RgbaImage};
use passphoto::{
    process, read_jfif_density, CropRegion, FaceBounds, FaceDetector, PassphotoError,
    PassportPhotoMaker,
};
use pretty_assertions::assert_eq;

fn gradient(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ]);
    }
    img
}

fn make_png(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

/// JPEG carrying an EXIF APP1 segment with the given orientation tag.
fn make_jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let img = gradient(width, height);
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 90)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();

    // Little-endian TIFF header, one IFD with a single SHORT Orientation entry.
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    let mut app1 = vec![0xFF, 0xE1];
    app1.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&tiff);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

fn write_input(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

/// Mock face detector for integration tests.
struct MockDetector {
    faces: Vec<FaceBounds>,
}

impl MockDetector {
    fn with_faces(faces: Vec<FaceBounds>) -> Self {
        Self { faces }
    }

    fn with_face(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::with_faces(vec![FaceBounds::new(x, y, width, height)])
    }
}

impl FaceDetector for MockDetector {
    fn detect(
        &self,
        _gray: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<FaceBounds>, PassphotoError> {
        Ok(self.faces.clone())
    }
}

struct FailingDetector;

impl FaceDetector for FailingDetector {
    fn detect(
        &self,
        _gray: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<FaceBounds>, PassphotoError> {
        Err(PassphotoError::DetectorUnavailable(
            "backend crashed".to_string(),
        ))
    }
}

struct PanickingDetector;

impl FaceDetector for PanickingDetector {
    fn detect(
        &self,
        _gray: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<FaceBounds>, PassphotoError> {
        panic!("detector backend blew up");
    }
}

#[test]
fn end_to_end_face_anchored_photo() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "source.png", &make_png(1000, 1000));
    let output = dir.path().join("passport.jpg");

    let photo = process(
        &input,
        &output,
        Some(Box::new(MockDetector::with_face(400, 400, 100, 100))),
    )
    .unwrap();

    assert_eq!(
        photo.crop,
        CropRegion {
            x: 396,
            y: 381,
            width: 108,
            height: 138
        }
    );

    let written = std::fs::read(&output).unwrap();
    assert_eq!(written, photo.data);
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (413, 531));
    assert_eq!(read_jfif_density(&written), Some((300, 300)));
}

#[test]
fn end_to_end_without_detector_uses_center_crop() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "source.png", &make_png(1000, 1000));
    let output = dir.path().join("passport.jpg");

    let photo = process(&input, &output, None).unwrap();

    assert_eq!(photo.face, None);
    assert_eq!(
        photo.crop,
        CropRegion {
            x: 111,
            y: 0,
            width: 777,
            height: 1000
        }
    );
    let decoded = image::open(&output).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (413, 531));
}

#[test]
fn failing_detector_falls_back_to_center_crop() {
    let photo = PassportPhotoMaker::new(make_png(1000, 1000))
        .unwrap()
        .face_detector(Box::new(FailingDetector))
        .make()
        .unwrap();

    assert_eq!(photo.face, None);
    assert_eq!(photo.crop.x, 111);
    assert_eq!(photo.crop.width, 777);
}

#[test]
fn panicking_detector_falls_back_to_center_crop() {
    let photo = PassportPhotoMaker::new(make_png(1000, 1000))
        .unwrap()
        .face_detector(Box::new(PanickingDetector))
        .make()
        .unwrap();

    assert_eq!(photo.face, None);
    assert_eq!(
        photo.crop,
        CropRegion {
            x: 111,
            y: 0,
            width: 777,
            height: 1000
        }
    );
}

#[test]
fn largest_face_anchors_the_crop() {
    let detector = MockDetector::with_faces(vec![
        FaceBounds::new(10, 10, 40, 40),
        FaceBounds::new(400, 400, 100, 100),
        FaceBounds::new(800, 100, 60, 60),
    ]);
    let photo = PassportPhotoMaker::new(make_png(1000, 1000))
        .unwrap()
        .face_detector(Box::new(detector))
        .make()
        .unwrap();

    assert_eq!(photo.face, Some(FaceBounds::new(400, 400, 100, 100)));
    assert_eq!(photo.crop.x, 396);
    assert_eq!(photo.crop.y, 381);
}

#[test]
fn edge_face_stays_inside_source() {
    let photo = PassportPhotoMaker::new(make_png(640, 480))
        .unwrap()
        .face_detector(Box::new(MockDetector::with_face(600, 440, 40, 40)))
        .make()
        .unwrap();

    let crop = photo.crop;
    assert!(crop.x + crop.width <= 640, "{crop:?}");
    assert!(crop.y + crop.height <= 480, "{crop:?}");
}

#[test]
fn transparent_source_gets_white_background() {
    let rgba = RgbaImage::from_pixel(200, 260, image::Rgba([0, 0, 0, 0]));
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(rgba.as_raw(), 200, 260, image::ExtendedColorType::Rgba8)
        .unwrap();

    let photo = PassportPhotoMaker::new(png).unwrap().make().unwrap();
    let decoded = image::load_from_memory(&photo.data).unwrap().to_rgb8();
    for &(x, y) in &[(0, 0), (206, 265), (412, 530)] {
        let pixel = decoded.get_pixel(x, y);
        assert!(
            pixel.0.iter().all(|&c| c >= 250),
            "pixel ({x}, {y}) not white: {pixel:?}"
        );
    }
}

#[test]
fn exif_orientation_is_applied_before_cropping() {
    // Stored landscape, displayed portrait after a 90° rotation.
    let jpeg = make_jpeg_with_orientation(300, 200, 6);
    let photo = PassportPhotoMaker::new(jpeg).unwrap().make().unwrap();

    assert_eq!(
        photo.crop,
        CropRegion {
            x: 0,
            y: 21,
            width: 200,
            height: 257
        }
    );
}

#[test]
fn unreadable_input_is_decode_error_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("passport.jpg");

    let result = process(&dir.path().join("missing.jpg"), &output, None);

    assert!(matches!(result, Err(PassphotoError::DecodeError(_))));
    assert!(!output.exists());
}

#[test]
fn invalid_input_leaves_previous_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "garbage.jpg", b"definitely not an image");
    let output = write_input(dir.path(), "passport.jpg", b"previous");

    assert!(process(&input, &output, None).is_err());
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");
}

#[cfg(unix)]
#[test]
fn output_is_as_readable_as_a_plain_write() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "source.png", &make_png(200, 200));
    let output = dir.path().join("passport.jpg");

    process(&input, &output, None).unwrap();

    let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&output), mode(&input));
}

#[test]
fn unwritable_destination_is_encode_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "source.png", &make_png(100, 100));
    let output = dir.path().join("no_such_dir").join("passport.jpg");

    let result = process(&input, &output, None);

    assert!(matches!(result, Err(PassphotoError::EncodeError(_))));
    assert!(!output.exists());
}
