//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Description                                  |
//! |------|----------------------------------------------|
//! | 0    | Success                                      |
//! | 2    | CLI usage error (missing input/output paths) |
//! | 3    | I/O error reading input or writing output    |
//!
//! Per-token parse errors are reported on stderr but never change the exit
//! code; a run that reads and writes its files successfully exits 0.

/// Success - run completed; per-token parse errors do not affect this.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - missing or bad arguments. Emitted before any file I/O.
/// Matches clap's own error exit code.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - input could not be opened/read, or output could not be
/// written.
pub const EXIT_IO: u8 = 3;
