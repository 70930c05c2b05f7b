//! Weft Syntax - The Rule-String Mini-Language
//!
//! A rule string mixes three kinds of material: plain text, `#...#` tags
//! referencing symbols, and `[...]` actions carrying side effects. This
//! module owns the escape-aware tokenizer that splits a rule into those
//! typed segments, and the decomposer that splits a tag's content into its
//! symbol, modifier chain, and pre-actions.

pub mod tag;
pub mod tokenizer;

pub use tag::{decompose_tag, ParsedTag};
pub use tokenizer::{tokenize, Segment};
