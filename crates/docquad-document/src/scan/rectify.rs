// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification: warps the region inside a document quad onto
// an upright rectangle.

use docquad_core::error::{DocQuadError, Result};
use docquad_core::{Point, Quad};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{info, instrument, warn};

/// Largest output side accepted, in pixels.
const MAX_OUTPUT_SIDE: f64 = 32_768.0;

/// Quads enclosing less area than this (px²) are treated as collinear.
const MIN_QUAD_AREA: f64 = 1e-6;

/// Size of the rectified output for `quad`, before rounding.
///
/// Width is the shorter of the top and bottom edges; height the shorter of
/// the left and right edges. Taking the minimum shrinks a skewed capture
/// instead of stretching it.
pub fn output_size(quad: &Quad) -> (f64, f64) {
    let width = quad
        .top_left
        .distance(quad.top_right)
        .min(quad.bottom_left.distance(quad.bottom_right));
    let height = quad
        .top_left
        .distance(quad.bottom_left)
        .min(quad.top_right.distance(quad.bottom_right));
    (width, height)
}

fn degenerate(detail: impl Into<String>) -> DocQuadError {
    let detail = detail.into();
    warn!(detail = %detail, "Rejecting degenerate quad");
    DocQuadError::DegenerateGeometry(detail)
}

/// Check that `quad` can be rectified and return the rounded output size.
pub fn validate_quad(quad: &Quad) -> Result<(u32, u32)> {
    if !quad.is_finite() {
        return Err(degenerate("corner coordinates are not finite"));
    }

    let (width, height) = output_size(quad);
    if !(width > 0.0 && height > 0.0) {
        return Err(degenerate(format!(
            "output size {:.2}x{:.2} is not positive",
            width, height
        )));
    }
    if width > MAX_OUTPUT_SIDE || height > MAX_OUTPUT_SIDE {
        return Err(degenerate(format!(
            "output size {:.0}x{:.0} exceeds {} px",
            width, height, MAX_OUTPUT_SIDE
        )));
    }
    if quad.area() < MIN_QUAD_AREA {
        return Err(degenerate("all four corners are collinear"));
    }
    if !quad.is_simple() {
        return Err(degenerate("quad edges cross each other"));
    }

    let out_w = (width.round() as u32).max(1);
    let out_h = (height.round() as u32).max(1);
    Ok((out_w, out_h))
}

/// Crop `image` to the region inside `quad` and undo its perspective.
///
/// `quad` must be in the image's own pixel coordinates. Maps TL, TR, BR, BL
/// to `(0,0)`, `(w,0)`, `(w,h)`, `(0,h)` with a projective transform and
/// resamples bilinearly into a `w` x `h` image. Samples falling outside the
/// source are white.
///
/// Fails with [`DocQuadError::DegenerateGeometry`] when the output would be
/// empty, the corners are collinear, the outline crosses itself, or the
/// transform cannot be solved.
#[instrument(skip_all, fields(width = image.width(), height = image.height(), quad = %quad))]
pub fn crop(image: &DynamicImage, quad: &Quad) -> Result<DynamicImage> {
    let (out_w, out_h) = validate_quad(quad)?;
    let (width, height) = output_size(quad);

    let to_f32 = |p: Point| (p.x as f32, p.y as f32);
    let src = quad.outline().map(to_f32);
    let dest: [(f32, f32); 4] = [
        (0.0, 0.0),                    // top-left
        (width as f32, 0.0),           // top-right
        (width as f32, height as f32), // bottom-right
        (0.0, height as f32),          // bottom-left
    ];

    let projection = Projection::from_control_points(src, dest)
        .ok_or_else(|| degenerate("projective transform is singular"))?;

    let rgba_input = image.to_rgba8();
    let default_pixel = Rgba([255u8, 255, 255, 255]);
    let mut output = RgbaImage::new(out_w, out_h);

    warp_into(&rgba_input, &projection, Interpolation::Bilinear, default_pixel, &mut output);

    info!(out_w, out_h, "Perspective rectification applied");
    Ok(DynamicImage::ImageRgba8(output))
}
