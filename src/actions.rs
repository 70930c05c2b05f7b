//! Weft Actions - Side-Effecting Instructions
//!
//! An action is the bracketed part of the mini-language: `[key:rule1,rule2]`
//! pushes a scoped binding, `[key:POP]` pops one, and `[rule]` (no colon)
//! fires a rule purely for its side effects, discarding its text. A push that
//! originates as a tag's pre-action gets a matching pop as that tag's
//! post-action, which is what bounds the binding's scope to the tag.

use crate::errors::WeftError;
use crate::expansion;
use crate::grammar::Grammar;

/// One parsed side-effecting instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Binds `key` to the given rule strings for the enclosing scope.
    Push { key: String, rules: Vec<String> },
    /// Restores `key`'s previous binding.
    Pop { key: String },
    /// Expands `rule` for side effects only; its text is discarded.
    Call { rule: String },
}

impl Action {
    /// Parses raw action text, splitting on the first `:`.
    ///
    /// No colon means a fire-and-discard call; a right-hand side of exactly
    /// `POP` is a pop; anything else is a push with comma-separated rules.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            None => Action::Call {
                rule: raw.to_string(),
            },
            Some((key, "POP")) => Action::Pop {
                key: key.to_string(),
            },
            Some((key, rules)) => Action::Push {
                key: key.to_string(),
                rules: rules.split(',').map(String::from).collect(),
            },
        }
    }

    /// The action that undoes this one, if any. Only pushes have an undo.
    pub fn undo(&self) -> Option<Action> {
        match self {
            Action::Push { key, .. } => Some(Action::Pop { key: key.clone() }),
            Action::Pop { .. } | Action::Call { .. } => None,
        }
    }

    /// Applies this action against the grammar's rule stacks.
    ///
    /// Push rules are fully expanded *before* being bound, so a random
    /// outcome is fixed once and reused consistently by later references.
    /// Escapes are left in place here; unescaping happens once, at the end
    /// of the top-level expansion.
    pub(crate) fn activate(
        &self,
        grammar: &mut Grammar,
        depth: usize,
        errors: &mut Vec<WeftError>,
    ) {
        match self {
            Action::Push { key, rules } => {
                let mut finished = Vec::with_capacity(rules.len());
                for rule in rules {
                    let expanded = expansion::expand_rule(grammar, rule, depth);
                    errors.extend(expanded.errors);
                    finished.push(expanded.text);
                }
                grammar.push_rules(key, finished);
            }
            Action::Pop { key } => {
                if let Err(err) = grammar.pop_symbol(key) {
                    errors.push(err);
                }
            }
            Action::Call { rule } => {
                let expanded = expansion::expand_rule(grammar, rule, depth);
                errors.extend(expanded.errors);
            }
        }
    }
}
