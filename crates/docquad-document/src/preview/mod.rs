// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview side: fitting the photo into a viewport and letting the user drag
// the detected corners.

pub mod editor;
pub mod mapper;

pub use editor::QuadEditor;
pub use mapper::{PreviewMapping, preview_height_for};
