use crate::validation::Validator;
use series::{DigitizerError, ImageExtent, SourceImage};
use std::path::Path;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

pub fn is_allowed_image(path: &Path) -> bool {
    Validator::has_extension(path, &ALLOWED_IMAGE_EXTENSIONS)
}

/// Reads only the pixel dimensions of a graph image; the pixels themselves
/// are never decoded.
pub fn probe_image(path: &Path) -> Result<SourceImage, DigitizerError> {
    if !is_allowed_image(path) {
        return Err(DigitizerError::UnsupportedImage(format!(
            "'{}' is not a {} file",
            path.display(),
            ALLOWED_IMAGE_EXTENSIONS.join("/")
        )));
    }
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| DigitizerError::UnsupportedImage(format!("{}: {e}", path.display())))?;
    let extent = ImageExtent::new(width, height)?;
    Ok(SourceImage {
        path: path.to_string_lossy().to_string(),
        extent,
    })
}
