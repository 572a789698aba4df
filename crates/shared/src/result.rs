//! Workspace result alias.

use crate::errors::ErrorEnvelope;

/// Result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;
