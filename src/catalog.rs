//! Image catalog: decodes files into the in-memory images the engine lays out.
//!
//! The engine itself never touches the filesystem; it consumes [`ImageRef`]
//! values with already-decoded pixels and known dimensions.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{RgbaImage, imageops};

use crate::error::Error;

/// A decoded image plus the identifier it was loaded from.
///
/// Cheap to clone; the pixel buffer is shared. Immutable once created.
#[derive(Debug, Clone)]
pub struct ImageRef {
    source: String,
    image: Arc<RgbaImage>,
}

impl ImageRef {
    pub fn new(source: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            source: source.into(),
            image: Arc::new(image),
        }
    }

    /// Identifier of the original source, typically a file path.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.image
    }
}

/// Decode `paths` in order into [`ImageRef`]s, applying EXIF orientation.
///
/// # Errors
/// Returns [`Error::Decode`] naming the first file that fails to decode.
pub fn load_images(paths: &[PathBuf]) -> Result<Vec<ImageRef>, Error> {
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        out.push(load_image(path)?);
    }
    Ok(out)
}

/// Decode a single file, uprighting it per its EXIF orientation tag.
pub fn load_image(path: &Path) -> Result<ImageRef, Error> {
    let decoded = image::open(path)
        .map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let orientation = read_exif_orientation(path).unwrap_or(1);
    let upright = apply_orientation(decoded, orientation);
    Ok(ImageRef::new(path.display().to_string(), upright))
}

/// Best-effort EXIF orientation (1 = normal) for `path`.
fn read_exif_orientation(path: &Path) -> Option<u32> {
    let f = File::open(path).ok()?;
    let mut buf = BufReader::new(f);
    let reader = exif::Reader::new().read_from_container(&mut buf).ok()?;
    let field = reader.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0)
}

/// Transform `img` so it displays upright for EXIF orientation `o`.
fn apply_orientation(img: RgbaImage, o: u32) -> RgbaImage {
    match o {
        2 => imageops::flip_horizontal(&img),
        3 => imageops::rotate180(&img),
        4 => imageops::flip_vertical(&img),
        5 => imageops::flip_horizontal(&imageops::rotate90(&img)),
        6 => imageops::rotate90(&img),
        7 => imageops::flip_horizontal(&imageops::rotate270(&img)),
        8 => imageops::rotate270(&img),
        _ => img,
    }
}
