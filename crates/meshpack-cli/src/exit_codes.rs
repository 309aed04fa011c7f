//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Pattern error - empty, malformed, or missing name/version
pub const PATTERN_ERROR: i32 = 2;

/// Render error - pattern could not be turned into manifests
pub const RENDER_ERROR: i32 = 3;

/// Chart error - scaffolding or packaging the chart failed
pub const CHART_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
