//! Weft Grammar - The Symbol Registry and Public Entry Points
//!
//! A `Grammar` owns the per-key rule stacks, the modifier registry, the PRNG
//! that drives alternative selection, and the append-only diagnostic log.
//! It is the sole carrier of mutable expansion state: every operation that
//! needs that state receives the grammar explicitly.
//!
//! One top-level expansion runs to completion before another may share the
//! same grammar; nested re-entrant expansion within a single call (push
//! pre-expansion, fire-and-discard calls) is expected and safe.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::Deserialize;

use crate::errors::WeftError;
use crate::expansion::{self, Node};
use crate::modifiers::{ModifierFn, ModifierRegistry};
use crate::rules::{RuleUse, Symbol};

// Using a concrete, seedable PRNG for determinism.
type SmallRng = Xoshiro256StarStar;

// ============================================================================
// CONSTRUCTION INPUT
// ============================================================================

/// The wire shape of one key's rules: a single rule string or an ordered
/// list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawRules {
    One(String),
    Many(Vec<String>),
}

impl RawRules {
    fn into_alternatives(self) -> Vec<String> {
        match self {
            RawRules::One(rule) => vec![rule],
            RawRules::Many(rules) => rules,
        }
    }
}

impl From<&str> for RawRules {
    fn from(rule: &str) -> Self {
        RawRules::One(rule.to_string())
    }
}

impl From<String> for RawRules {
    fn from(rule: String) -> Self {
        RawRules::One(rule)
    }
}

impl From<Vec<String>> for RawRules {
    fn from(rules: Vec<String>) -> Self {
        RawRules::Many(rules)
    }
}

impl From<Vec<&str>> for RawRules {
    fn from(rules: Vec<&str>) -> Self {
        RawRules::Many(rules.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RawRules {
    fn from(rules: [&str; N]) -> Self {
        RawRules::Many(rules.into_iter().map(String::from).collect())
    }
}

// ============================================================================
// EXPANSION RESULT
// ============================================================================

/// The outcome of one `expand` call: the finished text and the diagnostics
/// this call produced. The same diagnostics are also merged into the
/// grammar's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub errors: Vec<WeftError>,
}

// ============================================================================
// GRAMMAR
// ============================================================================

#[derive(Debug)]
pub struct Grammar {
    symbols: HashMap<String, Symbol>,
    modifiers: ModifierRegistry,
    errors: Vec<WeftError>,
    rng: SmallRng,
}

impl Grammar {
    /// An empty grammar with no symbols and no modifiers.
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            modifiers: ModifierRegistry::new(),
            errors: Vec::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Builds a grammar from key/rules pairs.
    pub fn from_map<I, K, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<RawRules>,
    {
        let mut grammar = Self::new();
        for (key, rules) in entries {
            let key = key.into();
            let alternatives = rules.into().into_alternatives();
            grammar
                .symbols
                .insert(key.clone(), Symbol::new(key, alternatives));
        }
        grammar
    }

    /// Builds a grammar from a JSON object mapping keys to a rule string or
    /// an array of alternatives. The only fallible constructor.
    pub fn from_json(source: &str) -> Result<Self, WeftError> {
        let raw: HashMap<String, RawRules> =
            serde_json::from_str(source).map_err(|err| WeftError::InvalidGrammar {
                reason: err.to_string(),
            })?;
        Ok(Self::from_map(raw))
    }

    /// Replaces the PRNG with a seeded one, for reproducible expansions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Replaces the whole modifier registry.
    pub fn with_modifiers(mut self, modifiers: ModifierRegistry) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Merges a registry of modifiers in; later entries overwrite earlier
    /// ones of the same name.
    pub fn add_modifiers(&mut self, modifiers: &ModifierRegistry) {
        self.modifiers.merge(modifiers);
    }

    /// Registers a single modifier, overwriting any existing entry.
    pub fn add_modifier(&mut self, name: &str, modifier: ModifierFn) {
        self.modifiers.register(name, modifier);
    }

    pub(crate) fn modifiers(&self) -> &ModifierRegistry {
        &self.modifiers
    }

    /// Read access to a symbol's stack and use-log.
    pub fn symbol(&self, key: &str) -> Option<&Symbol> {
        self.symbols.get(key)
    }

    /// The grammar-wide diagnostic log: append-only, never cleared
    /// implicitly.
    pub fn errors(&self) -> &[WeftError] {
        &self.errors
    }

    // ------------------------------------------------------------------
    // Expansion entry points
    // ------------------------------------------------------------------

    /// Fully expands `rule`, returning the finished text and the errors this
    /// call produced. With `preserve_escapes` the final unescaping pass is
    /// skipped and backslashes survive in the output.
    pub fn expand(&mut self, rule: &str, preserve_escapes: bool) -> Expansion {
        let root = Node::Raw(rule.to_string());
        let expanded = expansion::expand_node(self, &root, 0);
        let text = if preserve_escapes {
            expanded.text
        } else {
            expansion::clear_escapes(&expanded.text)
        };
        self.errors.extend(expanded.errors.iter().cloned());
        Expansion {
            text,
            errors: expanded.errors,
        }
    }

    /// Convenience wrapper returning only the finished, unescaped text.
    pub fn flatten(&mut self, rule: &str) -> String {
        self.expand(rule, false).text
    }

    // ------------------------------------------------------------------
    // Rule-stack passthroughs
    // ------------------------------------------------------------------

    /// Pushes a new rule set onto `key`'s stack. A key with no symbol yet
    /// gets one whose base is empty, so the paired pop leaves the key
    /// unresolvable rather than permanently bound.
    pub fn push_rules<I, S>(&mut self, key: &str, rules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alternatives = rules.into_iter().map(Into::into).collect();
        self.symbols
            .entry(key.to_string())
            .or_insert_with(|| Symbol::new(key, Vec::new()))
            .push(alternatives);
    }

    /// Pops the top rule set from `key`'s stack, logging (not raising) any
    /// failure.
    pub fn pop_rules(&mut self, key: &str) {
        if let Err(err) = self.pop_symbol(key) {
            self.errors.push(err);
        }
    }

    pub(crate) fn pop_symbol(&mut self, key: &str) -> Result<(), WeftError> {
        match self.symbols.get_mut(key) {
            Some(symbol) => symbol.pop(),
            None => Err(WeftError::UnknownPopTarget {
                key: key.to_string(),
            }),
        }
    }

    /// Resets every symbol's stack to its base rule set and forgets the
    /// use-logs, so the grammar can serve independent expansions without
    /// residual scoped bindings. The error log is not touched.
    pub fn clear_state(&mut self) {
        for symbol in self.symbols.values_mut() {
            symbol.clear_state();
        }
    }

    // ------------------------------------------------------------------
    // Internal selection
    // ------------------------------------------------------------------

    /// Selects one alternative for `key`, recording the use against the
    /// symbol. Failures are appended to `errors` and yield the visible
    /// `((key))` placeholder as the selected rule.
    pub(crate) fn select_rule(
        &mut self,
        key: &str,
        tag: &str,
        depth: usize,
        errors: &mut Vec<WeftError>,
    ) -> String {
        match self.symbols.get_mut(key) {
            Some(symbol) => {
                let record = RuleUse {
                    tag: tag.to_string(),
                    depth,
                };
                match symbol.select(&mut self.rng, record) {
                    Some(rule) => rule,
                    None => {
                        errors.push(WeftError::ExhaustedRules {
                            key: key.to_string(),
                        });
                        format!("(({key}))")
                    }
                }
            }
            None => {
                errors.push(WeftError::UnknownSymbol {
                    key: key.to_string(),
                });
                format!("(({key}))")
            }
        }
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}
