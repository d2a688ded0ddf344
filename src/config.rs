use std::path::{Path, PathBuf};

use anyhow::{Result, ensure};
use serde::Deserialize;

use crate::builder::CompactionOptions;
use crate::layout::BreakPolicy;
use crate::scan::SortOrder;

/// Top-level application configuration, loaded from kebab-case YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Directories scanned for source photos.
    pub photo_paths: Vec<PathBuf>,
    /// Width of the finished collage in pixels.
    pub target_width: u32,
    /// Baseline row height used to measure images before justification.
    pub row_height: u32,
    /// Canvas fill behind a partial trailing row.
    pub background: [u8; 3],
    /// Order images are laid out in.
    pub order: SortOrder,
    /// Deterministic seed for `order: random`.
    pub shuffle_seed: Option<u64>,
    /// Which row the image crossing the target width lands in.
    pub break_policy: BreakPolicy,
    /// Row-compaction retry policy.
    pub compact: CompactionSettings,
    /// Output image path; the extension picks the format.
    pub output: PathBuf,
    /// Recurse into subdirectories while scanning.
    pub recursive: bool,
}

impl Configuration {
    const fn default_target_width() -> u32 {
        1920
    }

    const fn default_row_height() -> u32 {
        320
    }

    const fn default_background() -> [u8; 3] {
        [35, 35, 35]
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(self.target_width > 0, "target-width must be positive");
        ensure!(self.row_height > 0, "row-height must be positive");
        ensure!(
            self.compact.step > 0,
            "compact.step must be greater than zero"
        );
        ensure!(
            self.compact.min_row_height > 0,
            "compact.min-row-height must be greater than zero"
        );
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            photo_paths: Vec::new(),
            target_width: Self::default_target_width(),
            row_height: Self::default_row_height(),
            background: Self::default_background(),
            order: SortOrder::default(),
            shuffle_seed: None,
            break_policy: BreakPolicy::default(),
            compact: CompactionSettings::default(),
            output: PathBuf::from("collage.png"),
            recursive: true,
        }
    }
}

/// Compaction settings as configured; the builder consumes
/// [`CompactionOptions`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CompactionSettings {
    /// Whether the binary retries builds at reduced row heights.
    pub enabled: bool,
    /// Height reduction per retry, in pixels.
    pub step: u32,
    /// Lowest row height a retry may use.
    pub min_row_height: u32,
}

impl Default for CompactionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            step: 10,
            min_row_height: 32,
        }
    }
}

impl From<&CompactionSettings> for CompactionOptions {
    fn from(settings: &CompactionSettings) -> Self {
        Self {
            step: settings.step,
            min_height: settings.min_row_height,
        }
    }
}
