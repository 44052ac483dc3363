// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docquad.

use thiserror::Error;

/// Top-level error type for all docquad operations.
#[derive(Debug, Error)]
pub enum DocQuadError {
    // -- Detection --
    #[error("no four-sided document outline found in any colour channel")]
    CornersNotFound,

    // -- Rectification --
    #[error("degenerate document geometry: {0}")]
    DegenerateGeometry(String),

    // -- Coordinate mapping --
    #[error("invalid coordinate space mapping: {0}")]
    InvalidCoordinateSpace(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Images --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Collaborator I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocQuadError {
    /// Whether the caller has a defined recovery for this error without
    /// asking the user for anything.
    ///
    /// Only a failed detection qualifies: the caller substitutes the
    /// fallback quad and carries on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CornersNotFound)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocQuadError>;
