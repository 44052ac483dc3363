// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for whatever UI hosts the scanner.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives whether the host recovers silently, prompts the user,
// or gives up on the document.

use crate::error::DocQuadError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The pipeline has a fallback and carries on without asking.
    Recoverable,
    /// The user must do something (drag corners, retake the photo).
    ActionRequired,
    /// Cannot be fixed by the user: bad input file, broken configuration.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `DocQuadError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &DocQuadError) -> HumanError {
    match err {
        DocQuadError::CornersNotFound => HumanError {
            message: "We couldn't find the edges of your document.".into(),
            suggestion: "Drag the corners onto the document, or retake the photo against a plain, contrasting background.".into(),
            severity: Severity::Recoverable,
        },

        DocQuadError::DegenerateGeometry(_) => HumanError {
            message: "The selected area can't be straightened.".into(),
            suggestion: "Drag the four corners so they outline the document without crossing over each other.".into(),
            severity: Severity::ActionRequired,
        },

        DocQuadError::ImageError(detail) => {
            if detail.contains("empty") {
                HumanError {
                    message: "The photo is empty.".into(),
                    suggestion: "Take the photo again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "We couldn't read or save this image.".into(),
                    suggestion: "Try a JPEG or PNG file.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        DocQuadError::Io(_) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: "Check that the file exists and that there is free storage space.".into(),
            severity: Severity::Permanent,
        },

        DocQuadError::InvalidConfig(_) | DocQuadError::Serialization(_) => HumanError {
            message: "The scanner settings are invalid.".into(),
            suggestion: "Remove the custom settings file to go back to the defaults.".into(),
            severity: Severity::Permanent,
        },

        DocQuadError::InvalidCoordinateSpace(_) => HumanError {
            message: "Something went wrong while showing the photo.".into(),
            suggestion: "Close the scanner and try again.".into(),
            severity: Severity::Permanent,
        },
    }
}
