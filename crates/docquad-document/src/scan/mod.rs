// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: colour split, binarization, contour search, corner
// detection, and perspective rectification.

pub mod colorspace;
pub mod contour;
pub mod detect;
pub mod rectify;
pub mod threshold;

pub use detect::{detect_corners, detect_or_fallback, fallback_quad};
pub use rectify::{crop, output_size};
