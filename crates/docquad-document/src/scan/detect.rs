// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document corner detection: finds the largest convex four-sided outline in
// a photo and reports its corners in the photo's own pixel coordinates.

use docquad_core::error::{DocQuadError, Result};
use docquad_core::{CornerOrigin, Point, Quad, ScanConfig};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;
use tracing::{debug, info, instrument, warn};

use super::colorspace::split_luv;
use super::contour::{self, Candidate};
use super::threshold::binarize_otsu;

const CHANNEL_NAMES: [&str; 3] = ["L", "u", "v"];

/// Widest detection image accepted, as a multiple of `shrink_height`.
const MAX_SHRINK_ASPECT: f64 = 16.0;

/// Find the document's four corners in `image`.
///
/// ## Pipeline
///
/// 1. Shrink to `config.shrink_height` rows, preserving aspect ratio
/// 2. Convert to L*u*v* and split into three planes
/// 3. Per plane: Gaussian blur, Otsu binarization, Canny edges, and a
///    morphological close that bridges small gaps in the outline
/// 4. Trace every border in the edge map
/// 5. Approximate each border by a polygon (tolerance proportional to its
///    perimeter) and keep convex quads above the area floor
/// 6. Keep the largest quad per plane, then the largest across planes
/// 7. Scale back to the input's coordinates and label the corners
///
/// Returns [`DocQuadError::CornersNotFound`] when no plane yields a quad; the
/// caller is expected to fall back to [`fallback_quad`].
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn detect_corners(image: &DynamicImage, config: &ScanConfig) -> Result<Quad> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(DocQuadError::ImageError(format!(
            "image is empty ({}x{})",
            width, height
        )));
    }
    config.validate()?;

    // Step 1: Shrink. Everything downstream works in this space.
    let shrink_height = config.shrink_height;
    let scaled_width = shrink_height as f64 * width as f64 / height as f64;
    if scaled_width > shrink_height as f64 * MAX_SHRINK_ASPECT {
        return Err(DocQuadError::ImageError(format!(
            "aspect ratio {}x{} is too wide for detection (limit {}:1)",
            width, height, MAX_SHRINK_ASPECT
        )));
    }
    let shrink_width = (scaled_width.round() as u32).max(1);
    let shrunk = imageops::resize(
        &image.to_rgb8(),
        shrink_width,
        shrink_height,
        FilterType::Triangle,
    );
    debug!(shrink_width, shrink_height, "Shrunk image for detection");

    // Step 2: Colour space split.
    let planes = split_luv(&shrunk);

    // Steps 3-6: Per-plane search, then the cross-plane vote.
    let best = planes
        .iter()
        .zip(CHANNEL_NAMES)
        .map(|(plane, name)| {
            let candidate = find_plane_quad(plane, config);
            debug!(
                channel = name,
                area = candidate.map(|c| c.area),
                "Channel search complete"
            );
            candidate
        })
        .fold(None, contour::larger);

    let Some(candidate) = best else {
        warn!("No convex four-sided outline found in any channel");
        return Err(DocQuadError::CornersNotFound);
    };

    // Step 7: Scale back and label.
    let scale = height as f64 / shrink_height as f64;
    let points = candidate
        .points
        .map(|p| Point::new(p.x * scale, p.y * scale));
    let quad = Quad::from_unordered(points);

    info!(
        shrunk_area = candidate.area,
        top_left = %quad.top_left,
        bottom_right = %quad.bottom_right,
        "Document corners detected"
    );
    Ok(quad)
}

/// Search a single colour plane for the largest qualifying quad.
fn find_plane_quad(plane: &GrayImage, config: &ScanConfig) -> Option<Candidate> {
    let blurred = gaussian_blur_f32(plane, config.blur_sigma);
    let binary = binarize_otsu(&blurred);
    let edges = canny(&binary, config.canny_low, config.canny_high);
    let radius = (config.close_kernel_size / 2).min(u8::MAX as u32) as u8;
    let closed = close(&edges, Norm::LInf, radius);

    let contours = find_contours::<i32>(&closed);
    let candidate = contour::best_candidate(&contours, config);
    debug!(
        contours = contours.len(),
        found = candidate.is_some(),
        "Plane contours traced"
    );
    candidate
}

/// The default quad used when detection fails: the full image rectangle
/// inset by `config.fallback_margin`.
pub fn fallback_quad(width: u32, height: u32, config: &ScanConfig) -> Quad {
    Quad::inset_rect(width as f64, height as f64, config.fallback_margin)
}

/// Detect corners, substituting [`fallback_quad`] when nothing is found.
///
/// Errors other than "not found" (empty image, invalid configuration) are
/// passed through.
pub fn detect_or_fallback(image: &DynamicImage, config: &ScanConfig) -> Result<(Quad, CornerOrigin)> {
    match detect_corners(image, config) {
        Ok(quad) => Ok((quad, CornerOrigin::Detected)),
        Err(DocQuadError::CornersNotFound) => {
            let quad = fallback_quad(image.width(), image.height(), config);
            info!(margin = config.fallback_margin, "Using fallback corners");
            Ok((quad, CornerOrigin::Fallback))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scan::colorspace::rgb_to_luv;
    use image::{Rgb, RgbImage};
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point as PixelPoint;

    const DESK: Rgb<u8> = Rgb([40, 60, 90]);
    const PAPER: Rgb<u8> = Rgb([235, 235, 228]);

    /// A light axis-aligned "sheet" on a dark bluish background.
    pub(crate) fn synthetic_document(
        width: u32,
        height: u32,
        rect: (u32, u32, u32, u32),
    ) -> DynamicImage {
        sheet_on(width, height, rect, DESK, PAPER)
    }

    fn sheet_on(
        width: u32,
        height: u32,
        (x0, y0, x1, y1): (u32, u32, u32, u32),
        background: Rgb<u8>,
        sheet: Rgb<u8>,
    ) -> DynamicImage {
        let mut img = RgbImage::from_pixel(width, height, background);
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, sheet);
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    fn assert_near(actual: Point, expected: (f64, f64), tolerance: f64) {
        let expected = Point::new(expected.0, expected.1);
        assert!(
            actual.distance(expected) <= tolerance,
            "expected {} within {} px, got {}",
            expected,
            tolerance,
            actual
        );
    }

    #[test]
    fn detects_axis_aligned_sheet() {
        let image = synthetic_document(800, 600, (150, 100, 650, 500));
        let quad = detect_corners(&image, &ScanConfig::default()).expect("sheet should be found");

        assert_near(quad.top_left, (150.0, 100.0), 8.0);
        assert_near(quad.top_right, (650.0, 100.0), 8.0);
        assert_near(quad.bottom_left, (150.0, 500.0), 8.0);
        assert_near(quad.bottom_right, (650.0, 500.0), 8.0);
    }

    #[test]
    fn detects_tilted_sheet() {
        let mut img = RgbImage::from_pixel(800, 600, DESK);
        let corners = [(220, 110), (610, 160), (570, 520), (170, 470)];
        let polygon: Vec<PixelPoint<i32>> = corners
            .iter()
            .map(|&(x, y)| PixelPoint::new(x, y))
            .collect();
        draw_polygon_mut(&mut img, &polygon, PAPER);

        let quad = detect_corners(&DynamicImage::ImageRgb8(img), &ScanConfig::default())
            .expect("tilted sheet should be found");

        assert_near(quad.top_left, (220.0, 110.0), 8.0);
        assert_near(quad.top_right, (610.0, 160.0), 8.0);
        assert_near(quad.bottom_left, (170.0, 470.0), 8.0);
        assert_near(quad.bottom_right, (570.0, 520.0), 8.0);
        assert!(quad.is_convex());
    }

    #[test]
    fn isoluminant_sheet_is_found_through_chroma() {
        let gray = Rgb([128, 128, 128]);
        let teal = Rgb([100, 135, 128]);
        // Same packed lightness: the L plane carries no outline at all.
        assert_eq!(rgb_to_luv(128, 128, 128)[0], rgb_to_luv(100, 135, 128)[0]);

        let image = sheet_on(800, 600, (150, 100, 650, 500), gray, teal);
        let quad = detect_corners(&image, &ScanConfig::default())
            .expect("chroma planes should expose the sheet");

        assert_near(quad.top_left, (150.0, 100.0), 8.0);
        assert_near(quad.top_right, (650.0, 100.0), 8.0);
        assert_near(quad.bottom_left, (150.0, 500.0), 8.0);
        assert_near(quad.bottom_right, (650.0, 500.0), 8.0);
    }

    #[test]
    fn extreme_aspect_is_rejected_without_allocating() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(100_000, 1, DESK));
        let err = detect_corners(&image, &ScanConfig::default()).expect_err("too wide");
        assert!(matches!(err, DocQuadError::ImageError(_)));
    }

    #[test]
    fn wide_panorama_within_limit_is_processed() {
        // 12:1 stays under the cap and simply finds nothing.
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1200, 100, DESK));
        let err = detect_corners(&image, &ScanConfig::default()).expect_err("blank");
        assert!(matches!(err, DocQuadError::CornersNotFound));
    }

    #[test]
    fn uniform_image_is_not_found() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([128, 128, 128])));
        let err = detect_corners(&image, &ScanConfig::default()).expect_err("nothing to find");
        assert!(matches!(err, DocQuadError::CornersNotFound));
    }

    #[test]
    fn tiny_sheet_is_below_area_floor() {
        let image = synthetic_document(800, 600, (390, 290, 410, 310));
        let err = detect_corners(&image, &ScanConfig::default()).expect_err("too small");
        assert!(matches!(err, DocQuadError::CornersNotFound));
    }

    #[test]
    fn empty_image_is_an_image_error() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let err = detect_corners(&image, &ScanConfig::default()).expect_err("empty");
        assert!(matches!(err, DocQuadError::ImageError(_)));
    }

    #[test]
    fn invalid_config_is_rejected_before_work() {
        let image = synthetic_document(200, 200, (40, 40, 160, 160));
        let config = ScanConfig { close_kernel_size: 4, ..ScanConfig::default() };
        let err = detect_corners(&image, &config).expect_err("even kernel");
        assert!(matches!(err, DocQuadError::InvalidConfig(_)));
    }

    #[test]
    fn fallback_is_inset_image_rectangle() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1000, 750, Rgb([90, 90, 90])));
        let config = ScanConfig::default();
        let (quad, origin) = detect_or_fallback(&image, &config).expect("fallback");

        assert_eq!(origin, CornerOrigin::Fallback);
        assert_eq!(quad.top_left, Point::new(100.0, 100.0));
        assert_eq!(quad.top_right, Point::new(900.0, 100.0));
        assert_eq!(quad.bottom_left, Point::new(100.0, 650.0));
        assert_eq!(quad.bottom_right, Point::new(900.0, 650.0));
    }

    #[test]
    fn fallback_honours_configured_margin() {
        let config = ScanConfig { fallback_margin: 25.0, ..ScanConfig::default() };
        let quad = fallback_quad(400, 300, &config);
        assert_eq!(quad.top_left, Point::new(25.0, 25.0));
        assert_eq!(quad.bottom_right, Point::new(375.0, 275.0));
    }

    #[test]
    fn detect_or_fallback_reports_detection() {
        let image = synthetic_document(600, 800, (100, 120, 500, 700));
        let (_, origin) = detect_or_fallback(&image, &ScanConfig::default()).expect("detect");
        assert_eq!(origin, CornerOrigin::Detected);
    }
}
