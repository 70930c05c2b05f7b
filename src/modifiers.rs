//! Weft Modifier System
//!
//! Modifiers are named pure text transforms applied to a tag's resolved
//! text, e.g. `#animal.capitalize.s#`. The registry maps names to functions;
//! the evaluator consults it when walking a tag's modifier chain but knows
//! nothing about individual transforms.
//!
//! The built-in English set mirrors the reference transforms (pluralization,
//! past tense, articles, case folding, literal replace). It is a pre-built
//! instance of the registry, not a privileged part of the engine: callers
//! can swap it out or overwrite individual entries.

use im::HashMap;

/// A pure text transform. Receives the tag's current finished text plus the
/// parenthesized parameters from the modifier specifier.
pub type ModifierFn = fn(text: &str, params: &[String]) -> String;

// ============================================================================
// REGISTRY
// ============================================================================

/// Name-to-function registry, immutable between registrations and cheap to
/// clone. Later registrations for the same name overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ModifierRegistry {
    modifiers: HashMap<String, ModifierFn>,
}

impl ModifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ModifierFn> {
        self.modifiers.get(name)
    }

    pub fn register(&mut self, name: &str, modifier: ModifierFn) {
        self.modifiers.insert(name.to_string(), modifier);
    }

    /// Merges every entry of `other` into this registry, overwriting
    /// collisions with the incoming entry.
    pub fn merge(&mut self, other: &ModifierRegistry) {
        for (name, modifier) in &other.modifiers {
            self.modifiers.insert(name.clone(), *modifier);
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    pub fn list(&self) -> Vec<String> {
        self.modifiers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

// ============================================================================
// BUILT-IN ENGLISH MODIFIERS
// ============================================================================
//
// Registered under their original wire names (camelCase included) so
// existing grammars load unchanged.

pub const MOD_REPLACE: ModifierFn = |text, params| {
    if params.len() < 2 {
        return text.to_string();
    }
    text.replace(&params[0], &params[1])
};

pub const MOD_CAPITALIZE: ModifierFn = |text, _params| {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
};

/// Title case: the first letter of every word is uppercased, the rest
/// lowercased. Word boundaries are non-alphabetic characters.
pub const MOD_CAPITALIZE_ALL: ModifierFn = |text, _params| {
    let mut out = String::with_capacity(text.len());
    let mut boundary = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(ch);
            boundary = true;
        }
    }
    out
};

/// Indefinite article: `an` before a vowel, `a` otherwise, with the
/// "a unicorn" exception for u-words whose third letter is `i`.
pub const MOD_A: ModifierFn = |text, _params| {
    let chars: Vec<char> = text.chars().collect();
    if let Some(&first) = chars.first() {
        if matches!(first, 'u' | 'U') && chars.len() > 2 && matches!(chars[2], 'i' | 'I') {
            return format!("a {text}");
        }
        if matches!(first, 'a' | 'e' | 'i' | 'o' | 'u' | 'A' | 'E' | 'I' | 'O' | 'U') {
            return format!("an {text}");
        }
    }
    format!("a {text}")
};

pub const MOD_S: ModifierFn = |text, _params| pluralize(text);

/// Pluralizes only the first word, e.g. `mother of pearl` to
/// `mothers of pearl`.
pub const MOD_FIRST_S: ModifierFn = |text, _params| {
    let mut words = text.split(' ');
    let first = words.next().unwrap_or_default();
    let mut out = pluralize(first);
    for word in words {
        out.push(' ');
        out.push_str(word);
    }
    out
};

pub const MOD_ED: ModifierFn = |text, _params| {
    let chars: Vec<char> = text.chars().collect();
    match chars.last().copied() {
        None => String::new(),
        Some('e') | Some('E') => format!("{text}d"),
        Some('y') | Some('Y') if chars.len() > 1 && !is_vowel(chars[chars.len() - 2]) => {
            let stem: String = chars[..chars.len() - 1].iter().collect();
            format!("{stem}ied")
        }
        Some(_) => format!("{text}ed"),
    }
};

pub const MOD_UPPERCASE: ModifierFn = |text, _params| text.to_uppercase();

pub const MOD_LOWERCASE: ModifierFn = |text, _params| text.to_lowercase();

fn is_vowel(ch: char) -> bool {
    matches!(
        ch,
        'a' | 'e' | 'i' | 'o' | 'u' | 'A' | 'E' | 'I' | 'O' | 'U'
    )
}

fn pluralize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    match chars.last().copied() {
        None => "s".to_string(),
        Some('s') | Some('h') | Some('x') | Some('S') | Some('H') | Some('X') => {
            format!("{text}es")
        }
        Some('y') | Some('Y') if chars.len() > 1 && !is_vowel(chars[chars.len() - 2]) => {
            let stem: String = chars[..chars.len() - 1].iter().collect();
            format!("{stem}ies")
        }
        Some(_) => format!("{text}s"),
    }
}

// ============================================================================
// REGISTRATION
// ============================================================================

/// Registers the built-in English modifiers with the given registry.
pub fn register_base_english(registry: &mut ModifierRegistry) {
    registry.register("replace", MOD_REPLACE);
    registry.register("capitalize", MOD_CAPITALIZE);
    registry.register("capitalizeAll", MOD_CAPITALIZE_ALL);
    registry.register("a", MOD_A);
    registry.register("s", MOD_S);
    registry.register("firstS", MOD_FIRST_S);
    registry.register("ed", MOD_ED);
    registry.register("uppercase", MOD_UPPERCASE);
    registry.register("lowercase", MOD_LOWERCASE);
}

/// Builds a registry holding exactly the built-in English set.
pub fn base_english() -> ModifierRegistry {
    let mut registry = ModifierRegistry::new();
    register_base_english(&mut registry);
    registry
}
