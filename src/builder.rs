//! Collage build orchestration.
//!
//! A build runs partition, scale, and compose in sequence and either returns
//! a complete [`Collage`] or the first typed failure. Builds are stateless
//! and atomic: changing any parameter means calling [`build`] again with the
//! full set. The engine never logs and never retries; the one retry policy
//! offered here, [`build_compacted`], is a caller-side wrapper over fresh
//! builds.

use image::RgbaImage;

use crate::catalog::ImageRef;
use crate::compose::compose;
use crate::error::BuildError;
use crate::layout::{self, BreakPolicy, Row};

/// Engine options beyond the required width and height.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Row-break decision for the image that crosses the target width.
    pub break_policy: BreakPolicy,
    /// Canvas fill behind a partial trailing row.
    pub background: [u8; 3],
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            break_policy: BreakPolicy::default(),
            background: [35, 35, 35],
        }
    }
}

/// A finished collage: the row layout plus the composed pixel buffer.
#[derive(Debug, Clone)]
pub struct Collage {
    rows: Vec<Row>,
    image: RgbaImage,
}

impl Collage {
    /// Canvas width; always the requested target width.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Canvas height; the sum of the row heights.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The rows in top-to-bottom order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The composed pixel buffer.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the collage, keeping only the pixel buffer.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Build a collage with default options.
///
/// # Errors
/// See [`BuildError`]; the build is atomic and returns no partial output.
pub fn build(
    images: &[ImageRef],
    target_width: u32,
    nominal_height: u32,
) -> Result<Collage, BuildError> {
    build_with(images, target_width, nominal_height, &BuildOptions::default())
}

/// Build a collage with explicit [`BuildOptions`].
pub fn build_with(
    images: &[ImageRef],
    target_width: u32,
    nominal_height: u32,
    options: &BuildOptions,
) -> Result<Collage, BuildError> {
    let spans = layout::partition(images, target_width, nominal_height, options.break_policy)?;
    let rows = layout::scale_rows(images, spans, target_width, nominal_height)?;
    let image = compose(images, &rows, target_width, options.background)?;
    Ok(Collage { rows, image })
}

/// Settings for [`build_compacted`].
#[derive(Debug, Clone)]
pub struct CompactionOptions {
    /// How much the nominal height drops per attempt, in pixels.
    pub step: u32,
    /// Lowest nominal height compaction may reach.
    pub min_height: u32,
}

impl Default for CompactionOptions {
    fn default() -> Self {
        Self {
            step: 10,
            min_height: 32,
        }
    }
}

/// Build, lowering the nominal height until no row holds a single image.
///
/// Caller-side retry policy, not engine behavior: each attempt is a fresh
/// whole-collage layout at a reduced height. Lone-image rows read as holes in
/// a justified layout, so the height shrinks by `step` while the layout has
/// more than one row and any row holds exactly one image, stopping at
/// `min_height`. Returns the collage and the nominal height it was built at.
pub fn build_compacted(
    images: &[ImageRef],
    target_width: u32,
    nominal_height: u32,
    options: &BuildOptions,
    compaction: &CompactionOptions,
) -> Result<(Collage, u32), BuildError> {
    let floor = compaction.min_height.max(1);
    let mut height = nominal_height;
    loop {
        let spans = layout::partition(images, target_width, height, options.break_policy)?;
        if spans.len() <= 1 || spans.iter().all(|row| row.span.len() > 1) {
            break;
        }
        match height.checked_sub(compaction.step).filter(|h| *h >= floor) {
            Some(next) => height = next,
            None => break,
        }
    }
    let collage = build_with(images, target_width, height, options)?;
    Ok((collage, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(w: u32, h: u32) -> ImageRef {
        ImageRef::new(format!("mem:{w}x{h}"), RgbaImage::new(w, h))
    }

    #[test]
    fn identical_inputs_build_identical_buffers() {
        let images = [img(300, 200), img(180, 120), img(240, 160), img(90, 130)];
        let first = build(&images, 500, 150).unwrap();
        let second = build(&images, 500, 150).unwrap();
        assert_eq!(first.image().as_raw(), second.image().as_raw());
        assert_eq!(first.width(), 500);
    }

    #[test]
    fn canvas_height_is_sum_of_row_heights() {
        let images = [img(300, 200), img(180, 120), img(240, 160), img(90, 130)];
        let collage = build(&images, 500, 150).unwrap();
        let total: u32 = collage.rows().iter().map(|row| row.height).sum();
        assert_eq!(collage.height(), total);
    }

    #[test]
    fn empty_input_fails_without_output() {
        let err = build(&[], 400, 100).unwrap_err();
        assert!(matches!(err, BuildError::EmptyInput));
    }

    #[test]
    fn invalid_image_fails_by_source() {
        let images = [img(10, 0)];
        let err = build(&images, 400, 100).unwrap_err();
        assert!(matches!(err, BuildError::InvalidDimension { .. }));
    }

    #[test]
    fn compaction_lowers_height_until_rows_fill() {
        // Three 300x100 images against width 400 break into three lone-image
        // rows at height 100; at height 50 they share one justified row.
        let images = [img(300, 100), img(300, 100), img(300, 100)];
        let (collage, height) = build_compacted(
            &images,
            400,
            100,
            &BuildOptions::default(),
            &CompactionOptions::default(),
        )
        .unwrap();
        assert_eq!(height, 50);
        assert_eq!(collage.rows().len(), 1);
        assert_eq!(collage.width(), 400);
        assert_eq!(collage.height(), 44);
    }

    #[test]
    fn compaction_respects_floor() {
        let images = [img(300, 100), img(300, 100), img(300, 100)];
        let compaction = CompactionOptions {
            step: 10,
            min_height: 80,
        };
        let (_, height) = build_compacted(
            &images,
            400,
            100,
            &BuildOptions::default(),
            &compaction,
        )
        .unwrap();
        assert_eq!(height, 80);
    }

    #[test]
    fn compaction_is_a_no_op_for_full_rows() {
        let images = [img(200, 100), img(200, 100)];
        let (collage, height) = build_compacted(
            &images,
            400,
            100,
            &BuildOptions::default(),
            &CompactionOptions::default(),
        )
        .unwrap();
        assert_eq!(height, 100);
        assert_eq!(collage.rows().len(), 1);
    }
}
