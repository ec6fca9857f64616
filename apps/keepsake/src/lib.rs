//! # Keepsake Settings Inspector
//!
//! Library surface of the `keepsake` binary, exposed so integration tests
//! can drive commands directly (via `keepsake::cli::*`).

pub mod cli;
