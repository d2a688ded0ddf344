//! Directory scanning and ordering for collage input.
//!
//! Input order is load-bearing for a collage (it decides which images share a
//! row), so scanning always returns a deterministic base order and callers
//! re-order per configuration with [`order_paths`].

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};

use crate::error::Error;

/// Options controlling directory scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional maximum recursion depth. `None` or `Some(0)` means unlimited.
    pub max_depth: Option<usize>,
    /// Optional override for allowed extensions (lowercase, without dot).
    pub exts: Option<Vec<&'static str>>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: None,
            exts: None,
        }
    }
}

/// How discovered images are ordered before layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Lexicographic by path.
    #[default]
    Name,
    /// Oldest modification time first.
    Modified,
    /// Shuffled; reproducible when a seed is given.
    Random,
}

/// Return `true` if `path` has an allowed image extension.
#[must_use]
pub fn is_supported_image(path: &Path, exts: Option<&[&str]>) -> bool {
    let default_exts: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];
    let exts = exts.unwrap_or(default_exts);
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| *e == ext)
        })
}

/// Scan the given `paths` for images using the provided options.
///
/// Results come back sorted by path so the base order does not depend on
/// directory iteration order.
///
/// # Errors
/// Returns [`Error::BadDir`] if any path is missing or not a directory, and
/// [`Error::EmptyScan`] if no images are found.
pub fn scan_with_options(paths: &[PathBuf], opts: &ScanOptions) -> Result<Vec<PathBuf>, Error> {
    // Validate inputs first (collect all bad ones).
    let mut bad = Vec::new();
    for p in paths {
        if !p.exists() || !p.is_dir() {
            bad.push(p.clone());
        }
    }
    if !bad.is_empty() {
        let joined = bad
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::BadDir(joined));
    }

    let mut out = Vec::new();
    for root in paths {
        // Depth handling
        let mut wd = WalkDir::new(root);
        if !opts.recursive {
            wd = wd.max_depth(1);
        } else if let Some(d) = opts.max_depth
            && d > 0
        {
            wd = wd.max_depth(d);
        }

        for entry in wd
            .into_iter()
            // Skip hidden dot-directories *below* the root only.
            .filter_entry(|e| !should_skip_dir(e))
            .flatten()
        {
            let path = entry.path();
            if path.is_file() && is_supported_image(path, opts.exts.as_deref()) {
                out.push(path.to_path_buf());
            }
        }
    }

    if out.is_empty() {
        return Err(Error::EmptyScan);
    }
    out.sort();
    Ok(out)
}

/// Re-order `paths` per `order`; `seed` only applies to [`SortOrder::Random`].
pub fn order_paths(paths: &mut [PathBuf], order: SortOrder, seed: Option<u64>) {
    match order {
        SortOrder::Name => paths.sort(),
        SortOrder::Modified => {
            paths.sort_by_key(|p| (modified_time(p), p.clone()));
        }
        SortOrder::Random => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            paths.shuffle(&mut rng);
        }
    }
}

fn modified_time(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

fn should_skip_dir(entry: &DirEntry) -> bool {
    // Never skip the root; tempfile roots can be dot-dirs.
    if entry.depth() == 0 {
        return false;
    }
    // Skip typical hidden dot-directories like .git, .idea, etc.
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|n| n.starts_with('.'))
}
