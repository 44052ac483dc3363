// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mapping between original-photo coordinates and letterboxed preview
// coordinates. This is the only code that knows about letterboxing.

use docquad_core::error::{DocQuadError, Result};
use docquad_core::{Original, Point, Preview, PreviewBounds, Quad};

fn invalid(detail: impl Into<String>) -> DocQuadError {
    DocQuadError::InvalidCoordinateSpace(detail.into())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{} must be positive and finite, got {}", name, value)))
    }
}

fn check_mapping(bounds: &PreviewBounds, ratio: f64) -> Result<()> {
    if bounds.is_empty() {
        return Err(invalid(format!("preview bounds {:?} are empty", bounds)));
    }
    check_positive("ratio", ratio)
}

/// Where an image of `image_width` x `image_height` lands when fitted into a
/// `viewport_width` x `viewport_height` viewport with its aspect ratio kept.
///
/// An image proportionally wider than the viewport is letterboxed top and
/// bottom; otherwise left and right. Padding is centred in both cases.
pub fn fit_preview_bounds(
    viewport_width: f64,
    viewport_height: f64,
    image_width: f64,
    image_height: f64,
) -> Result<PreviewBounds> {
    check_positive("viewport width", viewport_width)?;
    check_positive("viewport height", viewport_height)?;
    check_positive("image width", image_width)?;
    check_positive("image height", image_height)?;

    let viewport_ratio = viewport_width / viewport_height;
    let image_ratio = image_width / image_height;

    let mut bounds = PreviewBounds {
        left: 0.0,
        top: 0.0,
        right: viewport_width,
        bottom: viewport_height,
    };

    if image_ratio > viewport_ratio {
        let offset = (viewport_height - viewport_width / image_ratio) / 2.0;
        bounds.top += offset;
        bounds.bottom -= offset;
    } else {
        let offset = (viewport_width - viewport_height * image_ratio) / 2.0;
        bounds.left += offset;
        bounds.right -= offset;
    }

    Ok(bounds)
}

/// Scale factor from original pixels to preview units.
pub fn preview_ratio(bounds: &PreviewBounds, image_height: f64) -> Result<f64> {
    check_positive("image height", image_height)?;
    let ratio = bounds.height() / image_height;
    check_mapping(bounds, ratio)?;
    Ok(ratio)
}

/// Height of a preview container `viewport_width` wide for a photo of the
/// given size: portrait photos get `width / aspect`, landscape photos
/// `width * aspect`. Letterboxing absorbs whatever the photo does not fill.
pub fn preview_height_for(image_width: u32, image_height: u32, viewport_width: f64) -> Result<f64> {
    check_positive("image width", image_width as f64)?;
    check_positive("image height", image_height as f64)?;
    check_positive("viewport width", viewport_width)?;

    let (w, h) = (image_width as f64, image_height as f64);
    let height = if image_height > image_width {
        viewport_width * h / w
    } else {
        viewport_width * w / h
    };
    Ok(height.trunc())
}

/// Map an original-space quad into preview space: scale by `ratio`, then
/// shift by the bounds' top-left corner.
pub fn to_preview(quad: &Quad<Original>, bounds: &PreviewBounds, ratio: f64) -> Result<Quad<Preview>> {
    check_mapping(bounds, ratio)?;
    Ok(quad.map_into(|p| {
        Point::new(p.x * ratio + bounds.left, p.y * ratio + bounds.top)
    }))
}

/// Exact inverse of [`to_preview`].
pub fn to_original(quad: &Quad<Preview>, bounds: &PreviewBounds, ratio: f64) -> Result<Quad<Original>> {
    check_mapping(bounds, ratio)?;
    Ok(quad.map_into(|p| {
        Point::new((p.x - bounds.left) / ratio, (p.y - bounds.top) / ratio)
    }))
}

/// Bounds and ratio for one image shown in one viewport.
///
/// A plain value computed per call; nothing is cached between images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewMapping {
    pub bounds: PreviewBounds,
    pub ratio: f64,
}

impl PreviewMapping {
    pub fn new(
        viewport_width: f64,
        viewport_height: f64,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self> {
        let bounds = fit_preview_bounds(
            viewport_width,
            viewport_height,
            image_width as f64,
            image_height as f64,
        )?;
        let ratio = preview_ratio(&bounds, image_height as f64)?;
        Ok(Self { bounds, ratio })
    }

    pub fn to_preview(&self, quad: &Quad<Original>) -> Result<Quad<Preview>> {
        to_preview(quad, &self.bounds, self.ratio)
    }

    pub fn to_original(&self, quad: &Quad<Preview>) -> Result<Quad<Original>> {
        to_original(quad, &self.bounds, self.ratio)
    }
}
