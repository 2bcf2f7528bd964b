//! DRIFT run state. Lives for exactly one run.

use std::collections::HashSet;
use std::fmt;

use strand_core::models::{DriftTermination, SubQuestion, SubQuestionOutcome};

use super::aggregate::Aggregated;

/// Phases of the DRIFT state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriftPhase {
    Decompose,
    Explore,
    Aggregate,
    ConfidenceCheck,
    ReDecompose,
    Synthesize,
    Terminal,
}

impl fmt::Display for DriftPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriftPhase::Decompose => "decompose",
            DriftPhase::Explore => "explore",
            DriftPhase::Aggregate => "aggregate",
            DriftPhase::ConfidenceCheck => "confidence_check",
            DriftPhase::ReDecompose => "re_decompose",
            DriftPhase::Synthesize => "synthesize",
            DriftPhase::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// Lowercase, strip punctuation, collapse whitespace. Two questions with the
/// same normalized text are the same question.
pub fn normalize_question(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct DriftState {
    pub phase: DriftPhase,
    /// Explore rounds started, 1-based once exploring.
    pub iteration: usize,
    pub confidence: f64,
    pub pending: Vec<SubQuestion>,
    pub outcomes: Vec<SubQuestionOutcome>,
    /// Merged evidence and partial answers as of the last Aggregate.
    pub context: Aggregated,
    /// Every phase entered, in order.
    pub trace: Vec<DriftPhase>,
    /// Transitions into Explore or Synthesize.
    pub loop_transitions: usize,
    pub termination: Option<DriftTermination>,
    asked: HashSet<String>,
    issued: usize,
}

impl Default for DriftState {
    fn default() -> Self {
        Self::new()
    }
}

impl DriftState {
    pub fn new() -> Self {
        Self {
            phase: DriftPhase::Decompose,
            iteration: 0,
            confidence: 0.0,
            pending: Vec::new(),
            outcomes: Vec::new(),
            context: Aggregated::default(),
            trace: vec![DriftPhase::Decompose],
            loop_transitions: 0,
            termination: None,
            asked: HashSet::new(),
            issued: 0,
        }
    }

    pub fn transition(&mut self, to: DriftPhase) {
        if matches!(to, DriftPhase::Explore | DriftPhase::Synthesize) {
            self.loop_transitions += 1;
        }
        if to == DriftPhase::Explore {
            self.iteration += 1;
        }
        self.phase = to;
        self.trace.push(to);
    }

    /// Record `text` as asked. Returns false if an equivalent question was
    /// already asked in this run, or if it normalizes to nothing.
    pub fn mark_asked(&mut self, text: &str) -> bool {
        let normalized = normalize_question(text);
        !normalized.is_empty() && self.asked.insert(normalized)
    }

    pub fn was_asked(&self, text: &str) -> bool {
        self.asked.contains(&normalize_question(text))
    }

    /// Fresh id of the form `sq-{iteration}-{n}`.
    pub fn next_id(&mut self, iteration: usize) -> String {
        self.issued += 1;
        format!("sq-{iteration}-{}", self.issued)
    }

    /// Outcomes of sub-questions explored in round `iteration`.
    pub fn round(&self, iteration: usize) -> impl Iterator<Item = &SubQuestionOutcome> {
        self.outcomes
            .iter()
            .filter(move |o| o.sub_question.iteration == iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_case_and_punctuation() {
        assert_eq!(
            normalize_question("Who founded  Acme Corp?"),
            normalize_question("who founded acme corp")
        );
    }

    #[test]
    fn asked_set_rejects_repeats() {
        let mut state = DriftState::new();
        assert!(state.mark_asked("Who founded Acme?"));
        assert!(!state.mark_asked("who founded acme"));
        assert!(!state.mark_asked("???"));
        assert!(state.was_asked("WHO FOUNDED ACME?"));
    }

    #[test]
    fn explore_transitions_count_iterations() {
        let mut state = DriftState::new();
        state.transition(DriftPhase::Explore);
        state.transition(DriftPhase::Aggregate);
        state.transition(DriftPhase::ConfidenceCheck);
        state.transition(DriftPhase::Synthesize);
        assert_eq!(state.iteration, 1);
        assert_eq!(state.loop_transitions, 2);
        assert_eq!(state.trace.first(), Some(&DriftPhase::Decompose));
    }

    #[test]
    fn ids_are_unique() {
        let mut state = DriftState::new();
        let a = state.next_id(1);
        let b = state.next_id(1);
        assert_ne!(a, b);
    }
}
