//! Weft Expansion Tree - Recursive Node Evaluation
//!
//! Expansion turns a rule string into finished text. A raw rule is tokenized
//! into typed segments; each segment becomes a node and is evaluated by a
//! match on its variant: text passes through, tags resolve a symbol and
//! apply their modifier chain, actions mutate the rule stacks and emit
//! nothing. Evaluation never aborts: every failure is logged and replaced
//! with a visible placeholder so the caller always gets text back.
//!
//! Errors flow upward as return values accumulated by the caller, not
//! through back-pointers into the tree.

use crate::actions::Action;
use crate::errors::WeftError;
use crate::grammar::Grammar;
use crate::syntax::tag::{decompose_tag, split_modifier};
use crate::syntax::tokenizer::{tokenize, Segment};

// ============================================================================
// NODES
// ============================================================================

/// One node of the expansion tree.
///
/// The variant set is closed: evaluation dispatches by pattern match, and a
/// node's expansion is a pure function of its variant plus the grammar state
/// at the moment it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Unparsed rule text, to be tokenized into children.
    Raw(String),
    /// Literal text, terminal.
    Text(String),
    /// A `#...#` symbol reference with modifiers and pre-actions.
    Tag(String),
    /// A bare `[...]` side-effect instruction.
    Action(String),
}

impl From<Segment> for Node {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Text(text) => Node::Text(text),
            Segment::Tag(content) => Node::Tag(content),
            Segment::Action(raw) => Node::Action(raw),
        }
    }
}

/// The result of expanding one node: finished text plus the errors raised by
/// it and its descendants. Returning a fresh value per expansion keeps
/// re-expansion bugs impossible by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expanded {
    pub text: String,
    pub errors: Vec<WeftError>,
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Expands a single node according to its variant.
pub(crate) fn expand_node(grammar: &mut Grammar, node: &Node, depth: usize) -> Expanded {
    match node {
        Node::Raw(rule) => expand_rule(grammar, rule, depth),
        Node::Text(text) => Expanded {
            text: text.clone(),
            errors: Vec::new(),
        },
        Node::Tag(content) => expand_tag(grammar, content, depth),
        Node::Action(raw) => {
            let mut errors = Vec::new();
            Action::parse(raw).activate(grammar, depth, &mut errors);
            // Actions never emit visible output.
            Expanded {
                text: String::new(),
                errors,
            }
        }
    }
}

/// Tokenizes a rule and expands each resulting child in order, concatenating
/// their finished texts. Both the top-level rule and every tag's chosen
/// alternative pass through here.
pub(crate) fn expand_rule(grammar: &mut Grammar, rule: &str, depth: usize) -> Expanded {
    let (segments, mut errors) = tokenize(rule);
    let mut text = String::new();
    for segment in segments {
        let child = expand_node(grammar, &Node::from(segment), depth + 1);
        text.push_str(&child.text);
        errors.extend(child.errors);
    }
    Expanded { text, errors }
}

/// Expands one tag: pre-actions, symbol resolution, recursive expansion of
/// the selected alternative, modifier chain, then the synthesized
/// post-action pops.
fn expand_tag(grammar: &mut Grammar, content: &str, depth: usize) -> Expanded {
    let (parsed, mut errors) = decompose_tag(content);

    let preactions: Vec<Action> = parsed.preactions.iter().map(|raw| Action::parse(raw)).collect();
    let postactions: Vec<Action> = preactions.iter().filter_map(Action::undo).collect();
    for action in &preactions {
        action.activate(grammar, depth, &mut errors);
    }

    let mut text = match &parsed.symbol {
        Some(key) => {
            let selected = grammar.select_rule(key, content, depth, &mut errors);
            let child = expand_rule(grammar, &selected, depth + 1);
            errors.extend(child.errors);
            child.text
        }
        None => {
            errors.push(WeftError::MissingSymbolSection {
                content: content.to_string(),
            });
            String::new()
        }
    };

    for spec in &parsed.modifiers {
        let (name, params) = split_modifier(spec);
        match grammar.modifiers().get(&name) {
            Some(modifier) => text = modifier(&text, &params),
            None => {
                errors.push(WeftError::MissingModifier { name: name.clone() });
                text.push_str("((.");
                text.push_str(&name);
                text.push_str("))");
            }
        }
    }

    for action in &postactions {
        action.activate(grammar, depth, &mut errors);
    }

    Expanded { text, errors }
}

// ============================================================================
// ESCAPE CLEARING
// ============================================================================

/// Strips one level of escaping from finished text: `\x` becomes `x`, `\\`
/// becomes `\`, a trailing lone `\` is dropped. Runs once, over the fully
/// expanded output, unless the caller asked for raw text.
pub(crate) fn clear_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(ch);
        }
    }
    out
}
