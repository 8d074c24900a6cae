//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure, configuration problems
pub const ERROR: i32 = 1;

/// Validation error - input documents rejected before anything was written
pub const VALIDATION_ERROR: i32 = 2;

/// API error - the Dash0 API rejected a request and nothing was written
pub const API_ERROR: i32 = 3;

/// Partial apply - some documents were applied before the batch failed
pub const PARTIAL_APPLY: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
