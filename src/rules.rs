//! Weft Rule Stacks - Dynamically Scoped Symbol Bindings
//!
//! Each grammar key owns a `Symbol`: a permanent base `RuleSet` plus a stack
//! of overlay `RuleSet`s pushed by actions. Selection always reads the top of
//! the stack; popping never removes the base. This is what makes
//! `[hero:Anna]` bindings scoped to a single tag's expansion.

use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::errors::WeftError;

// Using a concrete, seedable PRNG for determinism.
type SmallRng = Xoshiro256StarStar;

// ============================================================================
// RULE SET: one scope's alternatives for a key
// ============================================================================

/// An immutable ordered set of alternative rule strings.
///
/// A `RuleSet` with no alternatives is legal (it is the base of a symbol
/// first created by a push); selecting from it yields nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    alternatives: Vec<String>,
}

impl RuleSet {
    pub fn new(alternatives: Vec<String>) -> Self {
        Self { alternatives }
    }

    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Picks a uniformly random alternative, or `None` if there are none.
    pub(crate) fn select(&self, rng: &mut SmallRng) -> Option<&str> {
        if self.alternatives.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.alternatives.len());
        Some(self.alternatives[index].as_str())
    }
}

// ============================================================================
// SYMBOL: per-key stack of rule sets plus an informational use-log
// ============================================================================

/// Informational record of one selection against a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleUse {
    /// Raw content of the tag that triggered the selection.
    pub tag: String,
    /// Depth of that tag in the expansion tree.
    pub depth: usize,
}

/// A grammar key's stack of rule sets.
///
/// The base set is fixed at construction and never removed; overlays come
/// and go with push/pop actions.
#[derive(Debug, Clone)]
pub struct Symbol {
    key: String,
    base: RuleSet,
    overlays: Vec<RuleSet>,
    uses: Vec<RuleUse>,
}

impl Symbol {
    pub fn new(key: impl Into<String>, alternatives: Vec<String>) -> Self {
        Self {
            key: key.into(),
            base: RuleSet::new(alternatives),
            overlays: Vec::new(),
            uses: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The rule set selection currently reads from.
    pub fn active(&self) -> &RuleSet {
        self.overlays.last().unwrap_or(&self.base)
    }

    pub fn base(&self) -> &RuleSet {
        &self.base
    }

    /// Number of rule sets on the stack, base included.
    pub fn stack_depth(&self) -> usize {
        1 + self.overlays.len()
    }

    /// The use-log: which tags selected this symbol, in order. Not required
    /// for correctness; reset by `clear_state`.
    pub fn uses(&self) -> &[RuleUse] {
        &self.uses
    }

    pub fn push(&mut self, alternatives: Vec<String>) {
        self.overlays.push(RuleSet::new(alternatives));
    }

    /// Pops the top overlay. Popping with no overlays left is an error and a
    /// no-op: the base rule set stays.
    pub fn pop(&mut self) -> Result<(), WeftError> {
        match self.overlays.pop() {
            Some(_) => Ok(()),
            None => Err(WeftError::ExcessPop {
                key: self.key.clone(),
            }),
        }
    }

    /// Restores the stack to exactly the base rule set and forgets the
    /// use-log.
    pub fn clear_state(&mut self) {
        self.overlays.clear();
        self.uses.clear();
    }

    /// Selects an alternative from the active rule set, recording the use.
    pub(crate) fn select(&mut self, rng: &mut SmallRng, record: RuleUse) -> Option<String> {
        self.uses.push(record);
        self.active().select(rng).map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn use_record() -> RuleUse {
        RuleUse {
            tag: "test".into(),
            depth: 0,
        }
    }

    #[test]
    fn test_select_single_alternative() {
        let set = RuleSet::new(vec!["only".into()]);
        assert_eq!(set.select(&mut rng()), Some("only"));
    }

    #[test]
    fn test_select_empty_set_yields_none() {
        let set = RuleSet::new(vec![]);
        assert_eq!(set.select(&mut rng()), None);
    }

    #[test]
    fn test_select_stays_within_alternatives() {
        let set = RuleSet::new(vec!["a".into(), "b".into(), "c".into()]);
        let mut rng = rng();
        for _ in 0..50 {
            let picked = set.select(&mut rng).unwrap();
            assert!(["a", "b", "c"].contains(&picked));
        }
    }

    #[test]
    fn test_push_shadows_base() {
        let mut symbol = Symbol::new("key", vec!["base".into()]);
        symbol.push(vec!["overlay".into()]);
        assert_eq!(symbol.active().alternatives(), ["overlay"]);
        symbol.pop().unwrap();
        assert_eq!(symbol.active().alternatives(), ["base"]);
    }

    #[test]
    fn test_pop_below_base_is_error_and_noop() {
        let mut symbol = Symbol::new("key", vec!["base".into()]);
        let err = symbol.pop().unwrap_err();
        assert_eq!(err, WeftError::ExcessPop { key: "key".into() });
        assert_eq!(symbol.active().alternatives(), ["base"]);
        assert_eq!(symbol.select(&mut rng(), use_record()), Some("base".into()));
    }

    #[test]
    fn test_clear_state_restores_base_and_forgets_uses() {
        let mut symbol = Symbol::new("key", vec!["base".into()]);
        symbol.push(vec!["one".into()]);
        symbol.push(vec!["two".into()]);
        let _ = symbol.select(&mut rng(), use_record());
        assert_eq!(symbol.uses().len(), 1);

        symbol.clear_state();
        assert_eq!(symbol.stack_depth(), 1);
        assert_eq!(symbol.active().alternatives(), ["base"]);
        assert!(symbol.uses().is_empty());
    }

    #[test]
    fn test_select_records_use() {
        let mut symbol = Symbol::new("key", vec!["base".into()]);
        let _ = symbol.select(
            &mut rng(),
            RuleUse {
                tag: "key.s".into(),
                depth: 2,
            },
        );
        assert_eq!(symbol.uses()[0].tag, "key.s");
        assert_eq!(symbol.uses()[0].depth, 2);
    }
}
