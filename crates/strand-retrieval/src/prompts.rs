//! Prompt templates for the LLM-backed steps.

use strand_core::models::{ConversationTurn, EvidenceItem, Speaker, SubQuestion};

/// Conversation turns included in the routing prompt.
const ROUTE_CONTEXT_TURNS: usize = 4;
/// Characters of each evidence passage included in answer prompts.
const EVIDENCE_SNIPPET_CHARS: usize = 400;
/// Aggregated passages shown to the refiner.
const KNOWN_PASSAGES: usize = 3;

pub fn route_classification(query: &str, conversation: &[ConversationTurn]) -> String {
    let mut prompt = String::from(
        "Classify the question into exactly one retrieval route:\n\
         - fast_lookup: a single fact, definition, or keyword lookup\n\
         - entity_focused: about one or a few named entities and their direct facts\n\
         - thematic: broad themes, trends, or summaries across the corpus\n\
         - multi_hop: needs several linked facts or comparisons to answer\n\n\
         Reply with JSON only: {\"route\": \"...\", \"confidence\": 0.0-1.0, \"rationale\": \"...\"}\n\n",
    );
    let recent = conversation.len().saturating_sub(ROUTE_CONTEXT_TURNS);
    if recent < conversation.len() {
        prompt.push_str("Conversation so far:\n");
        for turn in &conversation[recent..] {
            let who = match turn.speaker {
                Speaker::User => "user",
                Speaker::Assistant => "assistant",
            };
            prompt.push_str(&format!("{who}: {}\n", turn.text));
        }
        prompt.push('\n');
    }
    prompt.push_str(&format!("Question: {query}\n"));
    prompt
}

pub fn decomposition(query: &str, max_sub_questions: usize) -> String {
    format!(
        "Break the question into at most {max_sub_questions} independent sub-questions that \
         together answer it. Each sub-question must be answerable on its own.\n\
         Reply with a JSON array of strings only.\n\n\
         Question: {query}\n"
    )
}

pub fn re_decomposition(
    query: &str,
    gaps: &[&SubQuestion],
    partial_answers: &[String],
    evidence: &[EvidenceItem],
    max_sub_questions: usize,
) -> String {
    let mut prompt = format!(
        "The following sub-questions of \"{query}\" found no supporting passages.\n\
         Rewrite each into a more specific or differently phrased question that is more \
         likely to match the source text. Build on what is already known and do not ask \
         for it again. At most {max_sub_questions} questions, one per gap in the same \
         order.\nReply with a JSON array of strings only.\n\n"
    );
    if !partial_answers.is_empty() || !evidence.is_empty() {
        prompt.push_str("Known so far:\n");
        for answer in partial_answers {
            prompt.push_str(&format!("- {}\n", answer.trim()));
        }
        for item in evidence.iter().take(KNOWN_PASSAGES) {
            let snippet: String = item.text.chars().take(EVIDENCE_SNIPPET_CHARS).collect();
            prompt.push_str(&format!("[{}] {}\n", item.citation.passage_name, snippet));
        }
        prompt.push('\n');
    }
    prompt.push_str("Gaps:\n");
    for (i, gap) in gaps.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, gap.text));
    }
    prompt
}

pub fn sub_question_answer(sub_question: &str, evidence: &[EvidenceItem]) -> String {
    let mut prompt = format!(
        "Answer the question using only the passages below. If they do not contain the \
         answer, say so.\n\nQuestion: {sub_question}\n\nPassages:\n"
    );
    for item in evidence {
        let snippet: String = item.text.chars().take(EVIDENCE_SNIPPET_CHARS).collect();
        prompt.push_str(&format!("[{}] {}\n", item.citation.passage_name, snippet));
    }
    prompt
}
