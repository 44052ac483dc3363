// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection and fallback configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DocQuadError, Result};

/// Tunable parameters of the corner detector and the fallback quad.
///
/// Every field has a default; a JSON document only needs to name the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Height (px) the photo is shrunk to before detection.
    pub shrink_height: u32,
    /// Gaussian sigma applied to each channel before thresholding.
    pub blur_sigma: f32,
    /// Lower Canny hysteresis threshold (0-255 intensity scale).
    pub canny_low: f32,
    /// Upper Canny hysteresis threshold (0-255 intensity scale).
    pub canny_high: f32,
    /// Side of the square structuring element used to close edge gaps. Odd.
    pub close_kernel_size: u32,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub approx_tolerance_fraction: f64,
    /// Minimum candidate area, in shrunk-image px².
    pub min_area: f64,
    /// Inset (original px) of the default quad used when detection fails.
    pub fallback_margin: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            shrink_height: 500,
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 200.0,
            close_kernel_size: 5,
            approx_tolerance_fraction: 0.02,
            min_area: 1000.0,
            fallback_margin: 100.0,
        }
    }
}

impl ScanConfig {
    /// Check every value against its recognized range.
    pub fn validate(&self) -> Result<()> {
        if self.shrink_height == 0 {
            return Err(invalid("shrink_height must be positive"));
        }
        if !(self.blur_sigma > 0.0 && self.blur_sigma.is_finite()) {
            return Err(invalid(format!("blur_sigma must be positive, got {}", self.blur_sigma)));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(invalid(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {}/{}",
                self.canny_low, self.canny_high
            )));
        }
        if self.close_kernel_size == 0 || self.close_kernel_size % 2 == 0 {
            return Err(invalid(format!(
                "close_kernel_size must be odd, got {}",
                self.close_kernel_size
            )));
        }
        if !(self.approx_tolerance_fraction > 0.0 && self.approx_tolerance_fraction < 1.0) {
            return Err(invalid(format!(
                "approx_tolerance_fraction must lie in (0, 1), got {}",
                self.approx_tolerance_fraction
            )));
        }
        if !(self.min_area >= 0.0) {
            return Err(invalid(format!("min_area must be non-negative, got {}", self.min_area)));
        }
        if !(self.fallback_margin >= 0.0 && self.fallback_margin.is_finite()) {
            return Err(invalid(format!(
                "fallback_margin must be non-negative, got {}",
                self.fallback_margin
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn invalid(detail: impl Into<String>) -> DocQuadError {
    DocQuadError::InvalidConfig(detail.into())
}
