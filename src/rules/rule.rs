//! Rule definitions and ordered evaluation

use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::Phase;
use crate::state::SimulationState;

pub type Condition = fn(&SimulationState, &GameConfig) -> bool;
pub type Effect = fn(&mut SimulationState, &GameConfig);

/// A single condition/effect pair, optionally tied to one phase
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    /// `None` runs in every evaluation
    pub phase: Option<Phase>,
    pub condition: Condition,
    pub action: Effect,
    /// Stop evaluating further rules once this one fires
    pub terminal: bool,
}

impl Rule {
    pub fn new(name: &'static str, phase: Option<Phase>, condition: Condition, action: Effect) -> Self {
        Self {
            name,
            phase,
            condition,
            action,
            terminal: false,
        }
    }

    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    fn applies_to(&self, phase: Phase) -> bool {
        self.phase.map_or(true, |p| p == phase)
    }
}

/// Ordered rule collection; registration order is evaluation order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub(super) rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<Rule>) -> Result<Self> {
        let mut set = Self::new();
        for rule in rules {
            set.add_rule(rule)?;
        }
        Ok(set)
    }

    /// Append a rule; names must be unique
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(GameError::DuplicateRule(rule.name.to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Remove a rule by name, returning whether it was present
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name != name);
        self.rules.len() != before
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule tagged for `phase` whose condition holds
    ///
    /// Conditions are checked against the state as left by earlier rules.
    /// Returns the names of the rules that fired, in order.
    pub fn evaluate(
        &self,
        state: &mut SimulationState,
        config: &GameConfig,
        phase: Phase,
    ) -> Vec<&'static str> {
        let mut fired = Vec::new();
        for rule in self.rules.iter().filter(|r| r.applies_to(phase)) {
            if !(rule.condition)(state, config) {
                continue;
            }
            (rule.action)(state, config);
            tracing::debug!(rule = rule.name, ?phase, "rule fired");
            fired.push(rule.name);
            if rule.terminal {
                break;
            }
        }
        fired
    }
}
