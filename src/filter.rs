//! Movement filtering by amount sign and continuation-line content.

use crate::amount::Amount;
use crate::error::{Norma43Error, Result};
use crate::parser::ParserOptions;
use regex::Regex;

/// What to do with a continuation line after the content filters ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraInfoVerdict {
    /// Keep the line on its movement.
    Attach,

    /// Drop the movement and every continuation line already attached to it.
    Purge,
}

/// Compiled filter configuration.
///
/// Sign filters are checked when a movement line is decoded; content filters
/// are checked once per continuation line.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    filter_positive: bool,
    filter_negative: bool,
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl MovementFilter {
    /// Builds the filter, compiling the include/exclude patterns.
    ///
    /// Empty patterns are treated as not configured.
    pub fn new(options: &ParserOptions) -> Result<Self> {
        Ok(MovementFilter {
            filter_positive: options.filter_positive,
            filter_negative: options.filter_negative,
            include: compile("include", options.include_pattern.as_deref())?,
            exclude: compile("exclude", options.exclude_pattern.as_deref())?,
        })
    }

    /// Returns `true` if a movement with this amount must be left out.
    ///
    /// Zero amounts are never rejected.
    pub fn rejects_amount(&self, amount: Amount) -> bool {
        (self.filter_positive && amount.is_positive())
            || (self.filter_negative && amount.is_negative())
    }

    /// Decides whether a continuation-line payload keeps its movement.
    ///
    /// A configured include pattern must match; a configured exclude pattern
    /// must not.
    pub fn evaluate(&self, payload: &str) -> ExtraInfoVerdict {
        if let Some(include) = &self.include {
            if !include.is_match(payload) {
                return ExtraInfoVerdict::Purge;
            }
        }
        match &self.exclude {
            Some(exclude) if exclude.is_match(payload) => ExtraInfoVerdict::Purge,
            _ => ExtraInfoVerdict::Attach,
        }
    }
}

fn compile(which: &'static str, pattern: Option<&str>) -> Result<Option<Regex>> {
    match pattern {
        None | Some("") => Ok(None),
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|source| Norma43Error::InvalidPattern { which, source }),
    }
}
