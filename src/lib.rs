pub use crate::errors::{ErrorClass, WeftError};
pub use crate::grammar::{Expansion, Grammar, RawRules};
pub use crate::modifiers::{base_english, ModifierFn, ModifierRegistry};

pub mod actions;
pub mod errors;
pub mod expansion;
pub mod grammar;
pub mod modifiers;
pub mod rules;
pub mod syntax;
