// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("{0} not found in PATH")]
    ToolNotFound(String),

    #[error("command failed: {command}; stderr: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("unexpected output from {command}: {reason}")]
    UnexpectedOutput { command: String, reason: String },

    #[error("instance metadata unavailable: {0}")]
    Metadata(String),

    #[error("timed out after {}s waiting for {device} to appear", .waited.as_secs())]
    DeviceTimeout { device: String, waited: Duration },
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;
