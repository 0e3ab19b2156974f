//! Error types for particle configuration.
//!
//! The simulation and geometry paths never fail; they degrade to empty pools
//! and skipped buffers instead. Loading, saving and validating a
//! [`ParticleTemplate`](crate::ParticleTemplate) are the only fallible
//! operations in the crate.

use crate::template::{MAX_CAPACITY, MAX_RATE};
use std::fmt;

/// A template field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidField {
    /// `rate` exceeds [`MAX_RATE`](crate::template::MAX_RATE).
    Rate,
    /// `floor(duration * rate)` exceeds
    /// [`MAX_CAPACITY`](crate::template::MAX_CAPACITY).
    Capacity,
    /// `speed` is negative or not finite.
    Speed,
    /// `duration` is negative or not finite.
    Duration,
    /// `size` has a negative or non-finite component.
    Size,
    /// `color` has a channel outside `0.0..=1.0`.
    Color,
    /// `spawn_radius` is negative or not finite.
    SpawnRadius,
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidField::Rate => write!(f, "rate must be at most {} particles per second", MAX_RATE),
            InvalidField::Capacity => write!(f, "duration * rate must be at most {} particles", MAX_CAPACITY),
            InvalidField::Speed => write!(f, "speed must be a finite, non-negative number"),
            InvalidField::Duration => write!(f, "duration must be a finite, non-negative number of seconds"),
            InvalidField::Size => write!(f, "size components must be finite and non-negative"),
            InvalidField::Color => write!(f, "color channels must be within 0.0..=1.0"),
            InvalidField::SpawnRadius => write!(f, "spawn_radius must be a finite, non-negative number"),
        }
    }
}

/// Errors that can occur when loading, saving or validating a template.
#[derive(Debug)]
pub enum TemplateError {
    /// Failed to read or write the template file.
    Io(std::io::Error),
    /// The file is not valid template JSON.
    Parse(serde_json::Error),
    /// The template parsed but holds an unusable value.
    Invalid(InvalidField),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Io(e) => write!(f, "Failed to access template file: {}", e),
            TemplateError::Parse(e) => write!(f, "Failed to parse template: {}", e),
            TemplateError::Invalid(field) => write!(f, "Invalid template: {}", field),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Io(e) => Some(e),
            TemplateError::Parse(e) => Some(e),
            TemplateError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for TemplateError {
    fn from(e: std::io::Error) -> Self {
        TemplateError::Io(e)
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(e: serde_json::Error) -> Self {
        TemplateError::Parse(e)
    }
}

impl From<InvalidField> for TemplateError {
    fn from(field: InvalidField) -> Self {
        TemplateError::Invalid(field)
    }
}
