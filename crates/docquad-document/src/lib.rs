// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docquad-document — Finding, adjusting, and rectifying a photographed document.
//
// Provides the corner detector (L*u*v* split, Otsu, Canny, contour vote), the
// preview coordinate mapper and corner editor, the perspective rectifier, and
// the `Document` object tying them together.

pub mod document;
pub mod preview;
pub mod scan;

// Re-export the primary entry points so callers can use `docquad_document::Document` etc.
pub use document::Document;
pub use preview::{PreviewMapping, QuadEditor, preview_height_for};
pub use scan::{crop, detect_corners, detect_or_fallback, fallback_quad};
