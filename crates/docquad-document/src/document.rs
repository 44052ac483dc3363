// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One photo moving through the pipeline: detect, adjust, crop.

use docquad_core::error::Result;
use docquad_core::{CornerOrigin, Quad, ScanConfig};
use image::DynamicImage;
use tracing::{info, instrument};

use crate::preview::mapper::{preview_ratio, to_original};
use crate::preview::{PreviewMapping, QuadEditor};
use crate::scan::{detect_or_fallback, rectify};

/// A decoded photo together with its current corners in original-image
/// coordinates.
///
/// Each new photo gets a fresh `Document`; nothing is shared between them.
#[derive(Debug, Clone)]
pub struct Document {
    image: DynamicImage,
    corners: Quad,
    origin: CornerOrigin,
}

impl Document {
    /// Take ownership of `image` and find its starting corners, falling back
    /// to the inset image rectangle when detection finds nothing.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn scan(image: DynamicImage, config: &ScanConfig) -> Result<Self> {
        let (corners, origin) = detect_or_fallback(&image, config)?;
        info!(?origin, "Document ready for review");
        Ok(Self {
            image,
            corners,
            origin,
        })
    }

    /// Wrap `image` with corners the caller already has.
    pub fn with_corners(image: DynamicImage, corners: Quad) -> Self {
        Self {
            image,
            corners,
            origin: CornerOrigin::UserAdjusted,
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn corners(&self) -> &Quad {
        &self.corners
    }

    pub fn origin(&self) -> CornerOrigin {
        self.origin
    }

    /// Replace the corners with user-supplied ones.
    pub fn set_corners(&mut self, corners: Quad) {
        self.corners = corners;
        self.origin = CornerOrigin::UserAdjusted;
    }

    /// How this photo maps into a `viewport_width` x `viewport_height` view.
    pub fn preview_mapping(&self, viewport_width: f64, viewport_height: f64) -> Result<PreviewMapping> {
        PreviewMapping::new(viewport_width, viewport_height, self.width(), self.height())
    }

    /// Start an editing session with the current corners shown in a viewport
    /// of the given size.
    pub fn editor(&self, viewport_width: f64, viewport_height: f64) -> Result<QuadEditor> {
        let mapping = self.preview_mapping(viewport_width, viewport_height)?;
        let quad = mapping.to_preview(&self.corners)?;
        Ok(QuadEditor::new(quad, mapping.bounds))
    }

    /// Bring the corners of `editor` back into original space and adopt them.
    ///
    /// `editor` must come from [`Document::editor`] on this document; its
    /// bounds together with the image height fix the mapping.
    pub fn apply_edits(&mut self, editor: &QuadEditor) -> Result<()> {
        let bounds = *editor.bounds();
        let ratio = preview_ratio(&bounds, self.height() as f64)?;
        let corners = to_original(editor.quad(), &bounds, ratio)?;
        self.set_corners(corners);
        Ok(())
    }

    /// Rectify the region inside the current corners, consuming the document.
    pub fn crop(self) -> Result<DynamicImage> {
        rectify::crop(&self.image, &self.corners)
    }
}
