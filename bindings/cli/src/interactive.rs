//! Dialog-driven entry point used when the program starts without arguments.

use std::process::ExitCode;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

const OUTPUT_FILE_NAME: &str = "passport_photo.jpg";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff", "webp"];

/// Whether a desktop session is around to show dialogs in.
pub fn available() -> bool {
    if cfg!(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd")) {
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
    } else {
        true
    }
}

pub fn run() -> ExitCode {
    let Some(input) = FileDialog::new()
        .set_title("Select a photo")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
    else {
        eprintln!("No input image selected");
        return ExitCode::FAILURE;
    };

    let Some(dir) = FileDialog::new()
        .set_title("Select the output folder")
        .pick_folder()
    else {
        eprintln!("No output folder selected");
        return ExitCode::FAILURE;
    };

    let output = dir.join(OUTPUT_FILE_NAME);
    match crate::make_photo(&input, &output) {
        Ok(photo) => {
            let message = crate::confirmation(&output, &photo);
            println!("{message}");
            show(MessageLevel::Info, "Passport photo created", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            show(MessageLevel::Error, "Passport photo failed", format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn show(level: MessageLevel, title: &str, description: String) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_covers_common_raster_formats() {
        for ext in ["jpg", "jpeg", "png", "webp"] {
            assert!(IMAGE_EXTENSIONS.contains(&ext), "{ext} missing");
        }
    }

    #[test]
    fn output_is_a_jpeg() {
        assert!(OUTPUT_FILE_NAME.ends_with(".jpg"));
    }
}
