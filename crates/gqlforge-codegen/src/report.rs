//! Diagnostics collected during a generation run.
//!
//! A failed member (struct field, operation) is skipped and recorded here;
//! generation of everything else carries on.

use gqlforge_core::ResolveError;
use std::fmt;

/// One member that could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{owner}.{member}: {source}")]
pub struct GenerationError {
    /// Type (or root operation type) that declares the member.
    pub owner: String,
    /// Field, operation or `operation(argument)` that was skipped.
    pub member: String,
    pub source: ResolveError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    errors: Vec<GenerationError>,
}

impl GenerationReport {
    pub fn record(&mut self, owner: &str, member: &str, source: ResolveError) {
        let error = GenerationError {
            owner: owner.to_string(),
            member: member.to_string(),
            source,
        };
        tracing::warn!("skipping {}", error);
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[GenerationError] {
        &self.errors
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} member(s) could not be generated:", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {}", error)?;
        }
        Ok(())
    }
}
