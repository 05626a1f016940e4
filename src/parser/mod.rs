//! Bulk text → [`Package`] parsing.
//!
//! Two grammars are supported. The simple grammar reads one package per
//! line. The enhanced grammar is selected as soon as any line starts with
//! `■` or `ㄴ` and reads multi-line packages with priced sub-items.
//! Malformed input never fails: unparseable prices become `0` and nameless
//! packages are dropped.

mod enhanced;
mod line;
mod simple;

use std::fmt;

use crate::domain::Package;
use crate::utils::ids::IdGenerator;

/// Grammar used for a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Simple,
    Enhanced,
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFormat::Simple => f.write_str("simple"),
            TextFormat::Enhanced => f.write_str("enhanced"),
        }
    }
}

pub fn detect_format(text: &str) -> TextFormat {
    if line::meaningful_lines(text).any(line::is_enhanced_marker) {
        TextFormat::Enhanced
    } else {
        TextFormat::Simple
    }
}

/// Parses free-form package text, drawing package ids from `ids`.
pub fn parse_bulk_text<G: IdGenerator + ?Sized>(text: &str, ids: &mut G) -> Vec<Package> {
    let format = detect_format(text);
    let packages = match format {
        TextFormat::Simple => simple::parse(text, ids),
        TextFormat::Enhanced => enhanced::parse(text, ids),
    };
    tracing::debug!(%format, packages = packages.len(), "parsed bulk package text");
    packages
}
