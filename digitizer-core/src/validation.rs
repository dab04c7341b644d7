use std::path::Path;

pub const EXPORT_SIZE_MIN: u32 = 200;
pub const EXPORT_SIZE_MAX: u32 = 8000;

pub struct Validator;

impl Validator {
    pub fn normalize_export_size(width: &mut u32, height: &mut u32) {
        *width = (*width).clamp(EXPORT_SIZE_MIN, EXPORT_SIZE_MAX);
        *height = (*height).clamp(EXPORT_SIZE_MIN, EXPORT_SIZE_MAX);
    }

    pub fn has_extension(path: &Path, valid_extensions: &[&str]) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                valid_extensions
                    .iter()
                    .any(|valid| valid.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
