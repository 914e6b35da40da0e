use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::queue::ImageId;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
const GIF_SIGNATURE: [u8; 4] = *b"GIF8";
const BMP_SIGNATURE: [u8; 2] = *b"BM";

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Local path for an identifier that is not a URL.
pub fn local_path(source: &str) -> &Path {
    Path::new(source.strip_prefix("file://").unwrap_or(source))
}

// --- Helper: Load and Sort Image Paths ---
pub fn load_sorted_image_paths(dir_path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let read_error = |source| LoadError::Read {
        path: dir_path.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir_path).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && extension_of(&path.to_string_lossy()).is_some_and(|ext| format_from_extension(&ext).is_some()) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Downloads or reads the raw bytes behind an identifier.
pub fn fetch_bytes(client: &reqwest::blocking::Client, id: &ImageId) -> Result<Vec<u8>, LoadError> {
    let source = id.as_str();
    if is_remote(source) {
        let response = client.get(source).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    } else {
        let path = local_path(source);
        fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn extension_of(source: &str) -> Option<String> {
    // Drop any query string or fragment before looking at the extension
    let trimmed = source.split(['?', '#']).next().unwrap_or(source);
    Path::new(trimmed)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

fn format_from_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some(".png"),
        "jpg" | "jpeg" => Some(".jpg"),
        "bmp" => Some(".bmp"),
        "gif" => Some(".gif"),
        _ => None,
    }
}

/// File type hint for raylib, from magic bytes first and the extension second.
pub fn sniff_format(bytes: &[u8], id: &ImageId) -> Result<&'static str, LoadError> {
    if bytes.starts_with(&PNG_SIGNATURE) {
        return Ok(".png");
    }
    if bytes.starts_with(&JPEG_SIGNATURE) {
        return Ok(".jpg");
    }
    if bytes.starts_with(&GIF_SIGNATURE) {
        return Ok(".gif");
    }
    if bytes.starts_with(&BMP_SIGNATURE) {
        return Ok(".bmp");
    }
    extension_of(id.as_str())
        .and_then(|ext| format_from_extension(&ext))
        .ok_or_else(|| LoadError::UnsupportedFormat(id.to_string()))
}

/// EXIF orientation of a JPEG, 1 (no rotation) when absent.
pub fn exif_orientation(bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Value::Short(values) = &field.value {
                    if let Some(&orientation) = values.first() {
                        return orientation;
                    }
                }
            }
            1
        }
        Err(e) => {
            // Most JPEGs without EXIF land here
            debug!("no EXIF orientation: {}", e);
            1
        }
    }
}

// --- Decode Image, Apply EXIF Rotation ---
pub fn decode_image(id: &ImageId, bytes: &[u8]) -> Result<Image, LoadError> {
    let format = sniff_format(bytes, id)?;
    let orientation = if format == ".jpg" { exif_orientation(bytes) } else { 1 };

    let mut image = Image::load_image_from_mem(format, bytes).map_err(|e| LoadError::Decode {
        id: id.to_string(),
        message: e.to_string(),
    })?;

    // 1 = Top-left (Normal)
    // 3 = Bottom-right (180 deg)
    // 6 = Top-right (90 deg clockwise)
    // 8 = Bottom-left (90 deg counter-clockwise)
    // Others involve flips and are ignored.
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        1 => {}
        other => warn!(%id, orientation = other, "ignoring mirrored EXIF orientation"),
    }

    Ok(image)
}

/// Decodes and uploads an image to the GPU.
pub fn load_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    id: &ImageId,
    bytes: &[u8],
) -> Result<Texture2D, LoadError> {
    let image = decode_image(id, bytes)?;
    rl.load_texture_from_image(thread, &image).map_err(|e| LoadError::Texture {
        id: id.to_string(),
        message: e.to_string(),
    })
}
