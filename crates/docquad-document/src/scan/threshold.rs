// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global (Otsu) binarization of one colour plane ahead of edge detection.

use image::GrayImage;
use imageproc::contrast::{ThresholdType, otsu_level, threshold};

/// Split `plane` into paper and background at the Otsu level.
///
/// Pixels strictly above the level become 255, the rest 0. An empty plane
/// comes back unchanged.
pub fn binarize_otsu(plane: &GrayImage) -> GrayImage {
    if plane.width() == 0 || plane.height() == 0 {
        return plane.clone();
    }
    threshold(plane, otsu_level(plane), ThresholdType::Binary)
}
