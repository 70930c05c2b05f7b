//! Tag decomposition.
//!
//! A tag's raw content (the part between the `#` delimiters) is itself
//! re-tokenized: bracketed sections become pre-actions, and exactly one bare
//! text section is expected to carry the symbol key and its dot-separated
//! modifier chain, e.g. `[hero:Anna]story.capitalize.replace(a,b)`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::WeftError;
use crate::syntax::tokenizer::{tokenize, Segment};

/// Parenthesized parameter list of a modifier call, e.g. `replace(a,b)`.
static MODIFIER_PARAMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("modifier parameter pattern is valid"));

/// The decomposed parts of one tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTag {
    /// The symbol key, or `None` when the tag carries no bare text section.
    pub symbol: Option<String>,
    /// Modifier specifiers in application order, parameters still attached.
    pub modifiers: Vec<String>,
    /// Raw action strings in declared order.
    pub preactions: Vec<String>,
}

/// Splits tag content into symbol, modifier chain, and pre-actions.
///
/// More than one bare text section is a structural problem: the first one
/// wins and the rest are reported, never silently concatenated.
pub fn decompose_tag(content: &str) -> (ParsedTag, Vec<WeftError>) {
    let (segments, mut errors) = tokenize(content);

    let mut symbol_section: Option<String> = None;
    let mut preactions = Vec::new();
    for segment in segments {
        match segment {
            Segment::Text(section) => {
                if symbol_section.is_none() {
                    symbol_section = Some(section);
                } else {
                    errors.push(WeftError::AmbiguousTag {
                        content: content.to_string(),
                    });
                }
            }
            Segment::Tag(raw) | Segment::Action(raw) => preactions.push(raw),
        }
    }

    let (symbol, modifiers) = match symbol_section {
        Some(section) => {
            let mut pieces = section.split('.');
            let symbol = pieces.next().unwrap_or_default().to_string();
            (Some(symbol), pieces.map(String::from).collect())
        }
        None => (None, Vec::new()),
    };

    (
        ParsedTag {
            symbol,
            modifiers,
            preactions,
        },
        errors,
    )
}

/// Splits a modifier specifier into its name and parameter list.
///
/// `replace(a,b)` yields `("replace", ["a", "b"])`; a bare name yields an
/// empty parameter list.
pub(crate) fn split_modifier(spec: &str) -> (String, Vec<String>) {
    match spec.find('(') {
        Some(idx) if idx > 0 => match MODIFIER_PARAMS.captures(spec) {
            Some(caps) => {
                let params = caps[1].split(',').map(String::from).collect();
                (spec[..idx].to_string(), params)
            }
            None => (spec.to_string(), Vec::new()),
        },
        _ => (spec.to_string(), Vec::new()),
    }
}
