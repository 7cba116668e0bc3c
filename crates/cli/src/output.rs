//! Writing command results to stdout.
//!
//! Logs go to stderr through `tracing`; only command results are printed here.

#![allow(clippy::print_stdout)]

use serde::Serialize;

use crate::error::Result;

/// Print one line of text output.
pub fn line(text: impl std::fmt::Display) {
    println!("{text}");
}

/// Print `value` as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
