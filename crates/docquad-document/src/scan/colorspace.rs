// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sRGB to CIE L*u*v* conversion, split into three 8-bit planes.
//
// Glare shifts lightness far more than chromaticity, so a document edge that
// washes out in L usually survives in u or v.

use image::{GrayImage, Luma, RgbImage};

/// u' chromaticity of the D65 reference white.
const WHITE_U: f32 = 0.197_939_43;
/// v' chromaticity of the D65 reference white.
const WHITE_V: f32 = 0.468_310_96;

/// CIE threshold (6/29)^3 between the cube-root and linear lightness segments.
const EPSILON: f32 = 0.008_856;
/// Slope of the linear lightness segment, (29/3)^3.
const KAPPA: f32 = 903.3;

/// Undo the sRGB transfer curve for a channel in 0.0..=1.0.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert linear RGB to 8-bit L*u*v*.
///
/// Uses the usual 8-bit packing: L in 0..=100 scaled to 0..=255, u in
/// -134..=220 and v in -140..=122 shifted and scaled to 0..=255.
fn luv_from_linear(r: f32, g: f32, b: f32) -> [u8; 3] {
    let x = 0.412_453 * r + 0.357_580 * g + 0.180_423 * b;
    let y = 0.212_671 * r + 0.715_160 * g + 0.072_169 * b;
    let z = 0.019_334 * r + 0.119_193 * g + 0.950_227 * b;

    let lightness = if y > EPSILON {
        116.0 * y.cbrt() - 16.0
    } else {
        KAPPA * y
    };

    let denom = x + 15.0 * y + 3.0 * z;
    let (u, v) = if denom > 0.0 {
        let u_prime = 4.0 * x / denom;
        let v_prime = 9.0 * y / denom;
        (
            13.0 * lightness * (u_prime - WHITE_U),
            13.0 * lightness * (v_prime - WHITE_V),
        )
    } else {
        (0.0, 0.0)
    };

    let pack = |value: f32| value.round().clamp(0.0, 255.0) as u8;
    [
        pack(lightness * 255.0 / 100.0),
        pack((u + 134.0) * 255.0 / 354.0),
        pack((v + 140.0) * 255.0 / 262.0),
    ]
}

/// Convert one 8-bit sRGB pixel to packed L*u*v*.
pub fn rgb_to_luv(r: u8, g: u8, b: u8) -> [u8; 3] {
    luv_from_linear(
        srgb_to_linear(r as f32 / 255.0),
        srgb_to_linear(g as f32 / 255.0),
        srgb_to_linear(b as f32 / 255.0),
    )
}

/// Convert an RGB image to L*u*v* and return the L, u, and v planes.
pub fn split_luv(image: &RgbImage) -> [GrayImage; 3] {
    let linear: [f32; 256] = std::array::from_fn(|i| srgb_to_linear(i as f32 / 255.0));

    let (width, height) = image.dimensions();
    let mut l_plane = GrayImage::new(width, height);
    let mut u_plane = GrayImage::new(width, height);
    let mut v_plane = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let [l, u, v] = luv_from_linear(
            linear[r as usize],
            linear[g as usize],
            linear[b as usize],
        );
        l_plane.put_pixel(x, y, Luma([l]));
        u_plane.put_pixel(x, y, Luma([u]));
        v_plane.put_pixel(x, y, Luma([v]));
    }

    [l_plane, u_plane, v_plane]
}
