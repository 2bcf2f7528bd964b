//! Decompose and ReDecompose: LLM first, deterministic heuristics as fallback.

use strand_core::config::DriftConfig;
use strand_core::models::{FailureKind, PartialFailure, SubQuestion};
use strand_core::traits::{CompletionRequest, ILlmService, LlmTask};
use strand_observability::events;

use super::aggregate::Aggregated;
use super::state::normalize_question;
use crate::guard::guarded;
use crate::parse::parse_question_list;
use crate::prompts;
use crate::seeds::terms;

const MAX_TOKENS: usize = 400;

/// Words that start a new question when they follow "and".
const QUESTION_STARTERS: &[&str] = &[
    "what", "who", "whom", "which", "when", "where", "why", "how", "does", "did", "do", "is",
    "are", "was", "were", "can",
];

/// Sub-question texts from a decomposition step.
#[derive(Debug, Clone, Default)]
pub struct Decomposition {
    pub questions: Vec<String>,
    pub used_llm: bool,
    pub failure: Option<PartialFailure>,
}

/// Refined questions, each tagged with the index of the gap it targets.
#[derive(Debug, Clone, Default)]
pub struct Refinement {
    pub questions: Vec<(usize, String)>,
    pub used_llm: bool,
    pub failure: Option<PartialFailure>,
}

async fn ask_llm(
    llm: &dyn ILlmService,
    task: LlmTask,
    prompt: String,
    unit: &str,
    timeout_ms: u64,
) -> Result<Vec<String>, PartialFailure> {
    let request = CompletionRequest {
        task,
        prompt,
        max_tokens: MAX_TOKENS,
        expect_json: true,
    };
    let completion = guarded(unit, timeout_ms, llm.complete(&request)).await?;
    let questions = parse_question_list(&completion.text);
    if questions.is_empty() {
        let failure = PartialFailure::new(unit, FailureKind::Error, "no questions in llm output");
        events::degradation_triggered(&failure);
        return Err(failure);
    }
    Ok(questions)
}

/// Split `query` into at most `max_sub_questions` sub-questions.
pub async fn decompose(
    query: &str,
    llm: Option<&dyn ILlmService>,
    config: &DriftConfig,
) -> Decomposition {
    let max = config.max_sub_questions.max(1);
    let mut failure = None;
    if let Some(llm) = llm {
        match ask_llm(
            llm,
            LlmTask::Decomposition,
            prompts::decomposition(query, max),
            "drift:decompose",
            config.llm_timeout_ms,
        )
        .await
        {
            Ok(mut questions) => {
                questions.truncate(max);
                return Decomposition {
                    questions,
                    used_llm: true,
                    failure: None,
                };
            }
            Err(f) => failure = Some(f),
        }
    }
    Decomposition {
        questions: heuristic_split(query, max),
        used_llm: false,
        failure,
    }
}

/// Rewrite gap sub-questions in light of what `known` already establishes.
/// LLM output is assigned to gaps in order, wrapping around when it returns
/// more questions than gaps.
pub async fn refine(
    query: &str,
    gaps: &[SubQuestion],
    known: &Aggregated,
    llm: Option<&dyn ILlmService>,
    config: &DriftConfig,
) -> Refinement {
    if gaps.is_empty() {
        return Refinement::default();
    }
    let max = config.max_sub_questions.max(1);
    let mut failure = None;
    if let Some(llm) = llm {
        let gap_refs: Vec<&SubQuestion> = gaps.iter().collect();
        match ask_llm(
            llm,
            LlmTask::ReDecomposition,
            prompts::re_decomposition(
                query,
                &gap_refs,
                &known.partial_answers,
                &known.evidence,
                max,
            ),
            "drift:re_decompose",
            config.llm_timeout_ms,
        )
        .await
        {
            Ok(questions) => {
                return Refinement {
                    questions: questions
                        .into_iter()
                        .take(max)
                        .enumerate()
                        .map(|(i, q)| (i % gaps.len(), q))
                        .collect(),
                    used_llm: true,
                    failure: None,
                };
            }
            Err(f) => failure = Some(f),
        }
    }

    let questions = gaps
        .iter()
        .enumerate()
        .flat_map(|(i, gap)| heuristic_refinements(gap).into_iter().map(move |q| (i, q)))
        .take(max)
        .collect();
    Refinement {
        questions,
        used_llm: false,
        failure,
    }
}

fn as_question(text: &str) -> String {
    let trimmed = text.trim().trim_end_matches(['?', '.', ';', ',']).trim();
    format!("{trimmed}?")
}

/// Split on sentence boundaries and on "and" followed by a question word.
/// Falls back to one question per named entity when the query has no
/// separable clauses, and to the query itself when it has neither.
pub fn heuristic_split(query: &str, max: usize) -> Vec<String> {
    let mut clauses: Vec<String> = Vec::new();
    for sentence in query.split(['?', ';', '.', '\n']) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        let mut current: Vec<&str> = Vec::new();
        for (i, word) in words.iter().enumerate() {
            let next = words.get(i + 1).map(|w| w.to_lowercase());
            let splits_here = word.eq_ignore_ascii_case("and")
                && !current.is_empty()
                && next.as_deref().is_some_and(|n| QUESTION_STARTERS.contains(&n));
            if splits_here {
                clauses.push(current.join(" "));
                current.clear();
            } else {
                current.push(word);
            }
        }
        if !current.is_empty() {
            clauses.push(current.join(" "));
        }
    }
    let clauses: Vec<String> = clauses
        .iter()
        .map(|c| c.trim_end_matches(',').trim())
        .filter(|c| c.split_whitespace().count() >= 2)
        .map(as_question)
        .collect();

    let mut questions = if clauses.len() >= 2 {
        clauses
    } else {
        let mentions = terms::entity_mentions(query);
        let mut out = vec![as_question(query)];
        if mentions.len() >= 2 {
            out.extend(mentions.iter().map(|m| format!("What is known about {m}?")));
        }
        out
    };

    let mut seen = std::collections::HashSet::new();
    questions.retain(|q| {
        let n = normalize_question(q);
        !n.is_empty() && seen.insert(n)
    });
    questions.truncate(max.max(1));
    questions
}

/// Key-term reformulations of a gap: one focused question per extracted term.
pub fn heuristic_refinements(gap: &SubQuestion) -> Vec<String> {
    terms::extract_terms(&gap.text)
        .into_iter()
        .take(2)
        .map(|term| format!("What is known about {term}?"))
        .collect()
}
