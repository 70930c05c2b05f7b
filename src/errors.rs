//! Weft Diagnostics - Soft-Fail Error Accumulation
//!
//! Every failure mode in the engine is represented by a `WeftError` variant.
//! Expansion never aborts on one of these: errors are appended to an ordered
//! diagnostic log (per-call and grammar-wide) while the engine substitutes a
//! visible placeholder and keeps producing text. The only hard `Result`
//! boundary in the crate is grammar loading (`Grammar::from_json`).

use miette::Diagnostic;
use thiserror::Error;

/// Type-safe error classification that corresponds to WeftError variants.
/// Lets callers triage a diagnostic log without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Parse errors: malformed bracket/tag nesting, empty tags or actions
    Parse,
    /// Resolution errors: unknown keys, exhausted rule stacks, missing modifiers
    Resolution,
    /// Structural errors: tag content that does not decompose unambiguously
    Structural,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Parse => "Parse",
            ErrorClass::Resolution => "Resolution",
            ErrorClass::Structural => "Structural",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified diagnostic type for all engine failure modes.
///
/// Positions are character offsets into the rule string being tokenized at
/// the time the error was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum WeftError {
    #[error("{position}: empty tag")]
    #[diagnostic(code(weft::parse::empty_tag))]
    EmptyTag { position: usize },

    #[error("{position}: empty action")]
    #[diagnostic(code(weft::parse::empty_action))]
    EmptyAction { position: usize },

    #[error("unclosed tag")]
    #[diagnostic(code(weft::parse::unclosed_tag))]
    UnclosedTag,

    #[error("too many [")]
    #[diagnostic(code(weft::parse::unbalanced_open))]
    UnbalancedOpen,

    #[error("too many ]")]
    #[diagnostic(code(weft::parse::unbalanced_close))]
    UnbalancedClose,

    #[error("invalid grammar source: {reason}")]
    #[diagnostic(code(weft::parse::invalid_grammar))]
    InvalidGrammar { reason: String },

    #[error("no symbol for key `{key}`")]
    #[diagnostic(code(weft::resolve::unknown_symbol))]
    UnknownSymbol { key: String },

    #[error("rule stack for `{key}` has no alternatives to select")]
    #[diagnostic(code(weft::resolve::exhausted_rules))]
    ExhaustedRules { key: String },

    #[error("too many pops for `{key}`, base rules are never removed")]
    #[diagnostic(code(weft::resolve::excess_pop))]
    ExcessPop { key: String },

    #[error("can't pop: no symbol for key `{key}`")]
    #[diagnostic(code(weft::resolve::unknown_pop_target))]
    UnknownPopTarget { key: String },

    #[error("missing modifier `{name}`")]
    #[diagnostic(code(weft::resolve::missing_modifier))]
    MissingModifier { name: String },

    #[error("multiple bare sections in tag `{content}`")]
    #[diagnostic(code(weft::structure::ambiguous_tag))]
    AmbiguousTag { content: String },

    #[error("tag `{content}` has no symbol section")]
    #[diagnostic(code(weft::structure::missing_symbol_section))]
    MissingSymbolSection { content: String },
}

impl WeftError {
    /// Returns the classification for this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            WeftError::EmptyTag { .. }
            | WeftError::EmptyAction { .. }
            | WeftError::UnclosedTag
            | WeftError::UnbalancedOpen
            | WeftError::UnbalancedClose
            | WeftError::InvalidGrammar { .. } => ErrorClass::Parse,
            WeftError::UnknownSymbol { .. }
            | WeftError::ExhaustedRules { .. }
            | WeftError::ExcessPop { .. }
            | WeftError::UnknownPopTarget { .. }
            | WeftError::MissingModifier { .. } => ErrorClass::Resolution,
            WeftError::AmbiguousTag { .. } | WeftError::MissingSymbolSection { .. } => {
                ErrorClass::Structural
            }
        }
    }
}
