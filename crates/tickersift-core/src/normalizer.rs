//! Symbol normalizer: filters a raw ticker universe down to ordinary
//! common equity by suffix/substring pattern rules.
//!
//! Rules are applied in a fixed priority order and the first match wins:
//!
//! | Rule | Category |
//! |------|----------|
//! | contains `^` or `~` | other |
//! | ends with `W`, `WS`, `WT` | warrant |
//! | ends with `U` (len > 1) | unit |
//! | contains `-P` | preferred |
//! | ends with `R` (len > 4) | rights |
//!
//! Matching is done on the trimmed, upper-cased form; kept symbols
//! preserve their trimmed original spelling.

use serde::Serialize;

use crate::Symbol;

/// Why a raw symbol was excluded from the common-equity universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    Other,
    Warrant,
    Unit,
    Preferred,
    Rights,
}

impl ExclusionReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Warrant => "warrant",
            Self::Unit => "unit",
            Self::Preferred => "preferred",
            Self::Rights => "rights",
        }
    }
}

/// Exclusion counts produced by a normalizer pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizerReport {
    pub input_count: usize,
    pub kept: usize,
    pub warrants: usize,
    pub units: usize,
    pub preferred: usize,
    pub rights: usize,
    pub other: usize,
}

impl NormalizerReport {
    /// Total excluded symbols across all categories.
    pub const fn excluded(&self) -> usize {
        self.warrants + self.units + self.preferred + self.rights + self.other
    }

    fn record(&mut self, reason: ExclusionReason) {
        match reason {
            ExclusionReason::Other => self.other += 1,
            ExclusionReason::Warrant => self.warrants += 1,
            ExclusionReason::Unit => self.units += 1,
            ExclusionReason::Preferred => self.preferred += 1,
            ExclusionReason::Rights => self.rights += 1,
        }
    }
}

/// Result of normalizing a raw symbol universe.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUniverse {
    pub symbols: Vec<Symbol>,
    pub report: NormalizerReport,
}

/// Classify a raw symbol against the exclusion rules.
///
/// Returns `None` when the symbol looks like ordinary common equity.
pub fn classify(raw: &str) -> Option<ExclusionReason> {
    let trimmed = raw.trim();
    let upper = trimmed.to_ascii_uppercase();
    let len = trimmed.chars().count();

    if upper.contains('^') || upper.contains('~') {
        return Some(ExclusionReason::Other);
    }

    if upper.ends_with('W') || upper.ends_with("WS") || upper.ends_with("WT") {
        return Some(ExclusionReason::Warrant);
    }

    if upper.ends_with('U') && len > 1 {
        return Some(ExclusionReason::Unit);
    }

    // "-PR" is subsumed by "-P".
    if upper.contains("-P") {
        return Some(ExclusionReason::Preferred);
    }

    // The length guard keeps 1-letter tickers like "R" in the universe.
    if upper.ends_with('R') && len > 4 {
        return Some(ExclusionReason::Rights);
    }

    None
}

/// Filter raw symbol strings down to ordinary common equity.
///
/// Empty lines are dropped silently. Symbols that fail [`Symbol::parse`]
/// after surviving the pattern rules are counted under `other`. The
/// function is pure: no side effects beyond the returned counts.
pub fn normalize<'a, I>(raw: I) -> NormalizedUniverse
where
    I: IntoIterator<Item = &'a str>,
{
    let mut symbols = Vec::new();
    let mut report = NormalizerReport::default();

    for line in raw {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        report.input_count += 1;

        if let Some(reason) = classify(trimmed) {
            report.record(reason);
            continue;
        }

        match Symbol::parse(trimmed) {
            Ok(symbol) => {
                report.kept += 1;
                symbols.push(symbol);
            }
            Err(_) => report.record(ExclusionReason::Other),
        }
    }

    NormalizedUniverse { symbols, report }
}
