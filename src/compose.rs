//! Canvas compositing: scaled rows onto one RGBA buffer.

use fast_image_resize as fir;
use image::{Rgba, RgbaImage, imageops};

use crate::catalog::ImageRef;
use crate::error::BuildError;
use crate::layout::Row;

/// Composite `rows` onto a fresh canvas of `target_width` and the summed row
/// heights.
///
/// Rows stack top-to-bottom with no gap; members blit left-to-right at their
/// computed widths. The canvas is pre-filled with `background`, visible only
/// beside a trailing partial row. Identical inputs yield pixel-identical
/// output.
///
/// # Errors
/// Returns [`BuildError::Composition`] naming the member that failed to scale
/// or place; no partial canvas is ever returned.
pub fn compose(
    images: &[ImageRef],
    rows: &[Row],
    target_width: u32,
    background: [u8; 3],
) -> Result<RgbaImage, BuildError> {
    let total_height: u64 = rows.iter().map(|row| u64::from(row.height)).sum();
    if total_height == 0 || total_height > u64::from(u32::MAX) {
        return Err(BuildError::Composition {
            source_id: "canvas".to_string(),
            reason: format!("unsupported canvas height {total_height}"),
        });
    }

    let mut canvas = RgbaImage::from_pixel(
        target_width,
        total_height as u32,
        Rgba([background[0], background[1], background[2], 255]),
    );

    let mut y: i64 = 0;
    for row in rows {
        let mut x: i64 = 0;
        for (image, &width) in images[row.span.clone()].iter().zip(&row.member_widths) {
            let scaled =
                resize_rgba(image.pixels(), width, row.height).map_err(|reason| {
                    BuildError::Composition {
                        source_id: image.source().to_string(),
                        reason,
                    }
                })?;
            imageops::overlay(&mut canvas, &scaled, x, y);
            x += i64::from(width);
        }
        y += i64::from(row.height);
    }
    Ok(canvas)
}

/// Resize `source` to exactly `target_w` x `target_h` with a Lanczos3 kernel.
fn resize_rgba(source: &RgbaImage, target_w: u32, target_h: u32) -> Result<RgbaImage, String> {
    if target_w == 0 || target_h == 0 {
        return Err(format!("degenerate resize target {target_w}x{target_h}"));
    }
    if source.width() == target_w && source.height() == target_h {
        return Ok(source.clone());
    }

    let src_view = fir::images::ImageRef::new(
        source.width(),
        source.height(),
        source.as_raw(),
        fir::PixelType::U8x4,
    )
    .map_err(|err| format!("source view: {err}"))?;
    let mut dst_image = fir::images::Image::new(target_w, target_h, fir::PixelType::U8x4);
    let options = fir::ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Lanczos3));
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_view, &mut dst_image, Some(&options))
        .map_err(|err| format!("resize: {err}"))?;
    let buffer = dst_image.into_vec();
    RgbaImage::from_raw(target_w, target_h, buffer)
        .ok_or_else(|| "failed to construct resized RGBA image".to_string())
}
