//! Error types for handmorph.
//!
//! Errors only occur at construction boundaries (building an engine,
//! validating a landmark sample). Runtime anomalies never error; they
//! degrade to safe defaults as described in the module docs.

use std::fmt;

/// Errors that can occur when building an engine or validating input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine was configured with zero particles.
    ZeroParticles,
    /// A landmark sample had fewer points than the engine reads.
    ///
    /// The engine depends on landmark indices up to the middle fingertip
    /// (index 12), so a sample must carry at least 13 points.
    TruncatedSample {
        /// Number of landmarks actually provided.
        got: usize,
        /// Minimum number required.
        need: usize,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ZeroParticles => {
                write!(f, "Particle count must be at least 1. Use .with_particle_count() to set one.")
            }
            EngineError::TruncatedSample { got, need } => {
                write!(f, "Landmark sample has {} points but at least {} are required", got, need)
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = EngineError::TruncatedSample { got: 5, need: 13 };
        let msg = e.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("13"));

        assert!(EngineError::ZeroParticles.to_string().contains("at least 1"));
    }
}
