//! Headless capture: PNG screenshots and numbered frame sequences.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::sink::{Framebuffer, HEIGHT, WIDTH};

/// Errors that can occur saving a captured frame.
#[derive(Debug)]
pub enum CaptureError {
    /// Underlying I/O failure (directory creation, file creation, ...).
    Io(std::io::Error),
    /// PNG encoding failure.
    Encode(png::EncodingError),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Io(e) => write!(f, "capture I/O error: {e}"),
            CaptureError::Encode(e) => write!(f, "PNG encoding error: {e}"),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Io(e) => Some(e),
            CaptureError::Encode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(e: std::io::Error) -> Self {
        CaptureError::Io(e)
    }
}

impl From<png::EncodingError> for CaptureError {
    fn from(e: png::EncodingError) -> Self {
        CaptureError::Encode(e)
    }
}

/// Save a framebuffer as a single PNG file.
pub fn save_screenshot(fb: &Framebuffer, path: &Path) -> Result<(), CaptureError> {
    let file = fs::File::create(path)?;
    let w = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, WIDTH, HEIGHT);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(fb.data())?;
    Ok(())
}

/// Save a framebuffer as `dir/000001.png`, incrementing per call.
pub fn save_numbered(fb: &Framebuffer, dir: &Path, index: u32) -> Result<(), CaptureError> {
    fs::create_dir_all(dir)?;
    let filename = dir.join(format!("{index:06}.png"));
    save_screenshot(fb, &filename)
}
