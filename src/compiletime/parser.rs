//! This module contains the parser for the pattern syntax.
//! We use the `regex_syntax` crate to validate a rule pattern before the matcher is built and
//! to inspect properties of the pattern, e.g. whether it can match the empty string.

use log::trace;
use std::time::Instant;

use regex_syntax::{hir::Hir, ParserBuilder};

use crate::Result;

/// Parse a rule pattern into its high-level intermediate representation.
/// # Arguments
/// * `input` - A string slice that holds the pattern.
/// * `case_insensitive` - Fold letter case while parsing.
/// # Errors
/// An error is returned if the pattern syntax is invalid.
pub(crate) fn parse_regex_syntax(input: &str, case_insensitive: bool) -> Result<Hir> {
    let now = Instant::now();
    let hir = ParserBuilder::new()
        .case_insensitive(case_insensitive)
        .build()
        .parse(input)?;
    trace!(
        "Parsing '{}' took {} microseconds.",
        input,
        now.elapsed().as_micros()
    );
    Ok(hir)
}

/// Returns true if the pattern can match without consuming any character.
pub(crate) fn matches_empty(hir: &Hir) -> bool {
    hir.properties().minimum_len() == Some(0)
}
