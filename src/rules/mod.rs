//! Declarative game rules evaluated by the engine

pub mod defaults;
pub mod rule;

pub use defaults::standard_rules;
pub use rule::{Condition, Effect, Rule, RuleSet};
