//! Row partitioning and justified scaling.
//!
//! The engine lays an ordered image sequence into horizontal rows. Each row
//! except possibly the last is scaled uniformly so its displayed width equals
//! the target width exactly; the trailing row, when it never reaches the
//! target, keeps the nominal height and stays left-aligned with no stretch.
//!
//! Everything here is pure geometry over [`ImageRef`] dimensions; pixels are
//! only touched by the compositor.

use std::ops::Range;

use serde::Deserialize;

use crate::catalog::ImageRef;
use crate::error::BuildError;

/// An image's width if scaled so its height equals `nominal_height`,
/// preserving its aspect ratio.
pub fn natural_width(image: &ImageRef, nominal_height: u32) -> f64 {
    f64::from(image.width()) * f64::from(nominal_height) / f64::from(image.height())
}

/// Decides which row the image that crosses the target width belongs to.
///
/// Isolated so alternate policies can be swapped in without touching the
/// partition pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakPolicy {
    /// Keep the crossing image if that lands the row nearer the target width
    /// than leaving it out; ties keep it.
    #[default]
    CloserFit,
    /// The crossing image always closes the row it crossed in.
    AlwaysInclude,
    /// The crossing image always opens the next row.
    AlwaysExclude,
}

impl BreakPolicy {
    /// `true` if the crossing image belongs to the row being closed.
    ///
    /// `with` and `without` are the row's natural width with and without the
    /// crossing image; `without` is always below `target`.
    pub fn include_crossing(self, with: f64, without: f64, target: f64) -> bool {
        match self {
            Self::CloserFit => (with - target).abs() <= (target - without).abs(),
            Self::AlwaysInclude => true,
            Self::AlwaysExclude => false,
        }
    }
}

/// A contiguous run of input images assigned to one row by [`partition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpan {
    /// Member indices into the input sequence.
    pub span: Range<usize>,
    /// `false` only for a trailing row that never reached the target width.
    pub justified: bool,
}

/// A row with its scale geometry resolved by [`scale_row`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Member indices into the input sequence.
    pub span: Range<usize>,
    /// Whether the row is stretched to the target width.
    pub justified: bool,
    /// Uniform scale applied to every member of a justified row. Trailing
    /// rows report 1.0; their members scale individually to the nominal
    /// height.
    pub scale: f64,
    /// Display height of the row in pixels.
    pub height: u32,
    /// Display width of each member, in member order.
    pub member_widths: Vec<u32>,
    /// Sum of the member widths. Equals the target width for justified rows.
    pub displayed_width: u32,
}

fn validate(images: &[ImageRef], target_width: u32, nominal_height: u32) -> Result<(), BuildError> {
    if target_width == 0 {
        return Err(BuildError::InvalidParameter {
            name: "target width",
            value: target_width,
        });
    }
    if nominal_height == 0 {
        return Err(BuildError::InvalidParameter {
            name: "nominal row height",
            value: nominal_height,
        });
    }
    if images.is_empty() {
        return Err(BuildError::EmptyInput);
    }
    for image in images {
        if image.width() == 0 || image.height() == 0 {
            return Err(BuildError::InvalidDimension {
                source_id: image.source().to_string(),
                width: image.width(),
                height: image.height(),
            });
        }
    }
    Ok(())
}

/// Greedily partition `images` into rows against `target_width`.
///
/// Single left-to-right pass. Images accumulate into the current row at their
/// natural width for `nominal_height`; once the accumulated width reaches the
/// target, `policy` decides which side of the break the crossing image lands
/// on. Leftover images that never reach the target form a trailing
/// non-justified row.
///
/// # Errors
/// Rejects empty input, non-positive parameters, and zero-sized images.
pub fn partition(
    images: &[ImageRef],
    target_width: u32,
    nominal_height: u32,
    policy: BreakPolicy,
) -> Result<Vec<RowSpan>, BuildError> {
    validate(images, target_width, nominal_height)?;

    let target = f64::from(target_width);
    let mut rows = Vec::new();
    let mut start = 0usize;
    let mut acc = 0.0f64;
    let mut i = 0usize;
    while i < images.len() {
        let with = acc + natural_width(&images[i], nominal_height);
        if with < target {
            acc = with;
            i += 1;
            continue;
        }
        // Image `i` crossed the target. A row is never left empty, so a lone
        // image wider than the target still forms its own row.
        let include = i == start || policy.include_crossing(with, acc, target);
        let end = if include { i + 1 } else { i };
        rows.push(RowSpan {
            span: start..end,
            justified: true,
        });
        start = end;
        acc = 0.0;
        if include {
            i += 1;
        }
    }
    if start < images.len() {
        rows.push(RowSpan {
            span: start..images.len(),
            justified: false,
        });
    }
    Ok(rows)
}

/// Resolve scale, height, and member widths for every span of [`partition`].
pub fn scale_rows(
    images: &[ImageRef],
    spans: Vec<RowSpan>,
    target_width: u32,
    nominal_height: u32,
) -> Result<Vec<Row>, BuildError> {
    spans
        .into_iter()
        .enumerate()
        .map(|(index, span)| scale_row(images, span, target_width, nominal_height, index))
        .collect()
}

/// Resolve one row's geometry.
///
/// Justified rows share one scale factor chosen so the member widths sum to
/// `target_width` exactly; per-image rounding remainders land on the last
/// member. Trailing rows keep `nominal_height` and scale each member to it
/// individually. Every computed dimension is at least 1px.
pub fn scale_row(
    images: &[ImageRef],
    span: RowSpan,
    target_width: u32,
    nominal_height: u32,
    row_index: usize,
) -> Result<Row, BuildError> {
    let members = &images[span.span.clone()];
    if span.justified {
        let natural: f64 = members
            .iter()
            .map(|image| natural_width(image, nominal_height))
            .sum();
        if !natural.is_finite() || natural <= 0.0 {
            return Err(BuildError::Geometry {
                row: row_index,
                natural_width: natural,
            });
        }
        let scale = f64::from(target_width) / natural;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(BuildError::Geometry {
                row: row_index,
                natural_width: natural,
            });
        }
        let height = ((f64::from(nominal_height) * scale).round() as u32).max(1);

        let mut member_widths = Vec::with_capacity(members.len());
        let mut used: i64 = 0;
        for (k, image) in members.iter().enumerate() {
            let width = if k + 1 == members.len() {
                // Last member absorbs the rounding remainder so the row sums
                // to the target exactly.
                (i64::from(target_width) - used).max(1) as u32
            } else {
                (natural_width(image, nominal_height) * scale).round().max(1.0) as u32
            };
            used += i64::from(width);
            member_widths.push(width);
        }
        let displayed_width = member_widths.iter().sum();
        Ok(Row {
            span: span.span,
            justified: true,
            scale,
            height,
            member_widths,
            displayed_width,
        })
    } else {
        let member_widths: Vec<u32> = members
            .iter()
            .map(|image| (natural_width(image, nominal_height).round().max(1.0)) as u32)
            .collect();
        let displayed_width = member_widths.iter().sum();
        Ok(Row {
            span: span.span,
            justified: false,
            scale: 1.0,
            height: nominal_height,
            member_widths,
            displayed_width,
        })
    }
}
