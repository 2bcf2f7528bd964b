//! Rule-based route classification: entity mentions, keyword tables, query
//! shape, and conversational follow-ups.

use strand_core::config::RouterConfig;
use strand_core::models::{ConversationTurn, Route, RouteDecision, RouteSource, Speaker};

use crate::seeds::terms;

/// Breadth / aggregation cues.
const BREADTH_KEYWORDS: &[&str] = &[
    "overall", "themes", "theme", "trends", "trend", "summarize", "summary", "overview",
    "main", "across", "landscape", "patterns", "common", "in general", "broadly", "key topics",
];

/// Cues that the answer chains several facts.
const RELATIONSHIP_KEYWORDS: &[&str] = &[
    "relationship", "connected", "connection", "between", "related", "relate", "impact",
    "affect", "led to", "lead to", "cause", "caused", "because", "compare", "comparison",
    "versus", "influence", "depend", "why did", "how did",
];

/// Single-fact lookup phrasing.
const LOOKUP_PHRASES: &[&str] = &[
    "what is", "what's", "who is", "who's", "when was", "when is", "where is", "define",
    "definition of", "meaning of", "how many", "how much",
];

/// Words that refer back to something named earlier in the conversation.
const REFERENTIAL_WORDS: &[&str] = &[
    "it", "its", "they", "them", "their", "he", "him", "his", "she", "her", "this", "that",
    "those", "these",
];

/// Signals extracted from a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signals {
    pub entity_mentions: Vec<String>,
    /// Mentions borrowed from the previous user turn.
    pub inherited_mentions: Vec<String>,
    pub breadth_hits: usize,
    pub relationship_hits: usize,
    pub lookup_phrasing: bool,
    pub word_count: usize,
    pub question_count: usize,
    pub referential: bool,
}

impl Signals {
    pub fn mention_count(&self) -> usize {
        self.entity_mentions.len() + self.inherited_mentions.len()
    }
}

fn keyword_hits(lower: &str, words: &[&str], keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|kw| {
            if kw.contains(' ') {
                lower.contains(**kw)
            } else {
                words.contains(kw)
            }
        })
        .count()
}

/// Extract routing signals. Follow-ups containing referential words inherit
/// the entity mentions of the most recent user turn.
pub fn extract_signals(query: &str, conversation: &[ConversationTurn]) -> Signals {
    let lower = query.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();

    let referential = words.iter().any(|w| REFERENTIAL_WORDS.contains(w));
    let entity_mentions = terms::entity_mentions(query);
    let inherited_mentions = if referential {
        conversation
            .iter()
            .rev()
            .find(|turn| turn.speaker == Speaker::User)
            .map(|turn| terms::entity_mentions(&turn.text))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    Signals {
        entity_mentions,
        inherited_mentions,
        breadth_hits: keyword_hits(&lower, &words, BREADTH_KEYWORDS),
        relationship_hits: keyword_hits(&lower, &words, RELATIONSHIP_KEYWORDS),
        lookup_phrasing: LOOKUP_PHRASES.iter().any(|p| lower.trim_start().starts_with(p)),
        word_count: words.len(),
        question_count: query.matches('?').count(),
        referential,
    }
}

/// Classify from signals alone.
pub fn classify(query: &str, conversation: &[ConversationTurn], config: &RouterConfig) -> RouteDecision {
    let signals = extract_signals(query, conversation);
    decide(&signals, config)
}

/// Priority: multi-part/relational → thematic breadth → entity focus →
/// short lookup → weak multi-hop default.
pub fn decide(signals: &Signals, config: &RouterConfig) -> RouteDecision {
    let mentions = signals.mention_count();
    let (route, confidence, rationale) = if signals.question_count > 1 {
        (
            Route::MultiHop,
            0.75,
            format!("{} questions in one request", signals.question_count),
        )
    } else if signals.relationship_hits > 0 && mentions >= 2 {
        (
            Route::MultiHop,
            (0.65 + 0.1 * signals.relationship_hits.min(3) as f64).min(0.9),
            format!("relationship cues linking {mentions} entities"),
        )
    } else if signals.word_count >= config.long_query_words {
        (
            Route::MultiHop,
            0.6,
            format!("long query ({} words)", signals.word_count),
        )
    } else if signals.breadth_hits > 0 && signals.entity_mentions.is_empty() {
        (
            Route::Thematic,
            (0.6 + 0.1 * signals.breadth_hits.min(3) as f64).min(0.9),
            "breadth keywords without specific entities".to_string(),
        )
    } else if mentions >= 1 && signals.relationship_hits == 0 {
        let confidence = if signals.inherited_mentions.is_empty() { 0.75 } else { 0.65 };
        let rationale = if signals.inherited_mentions.is_empty() {
            format!("focused on {}", signals.entity_mentions.join(", "))
        } else {
            format!("follow-up about {}", signals.inherited_mentions.join(", "))
        };
        (Route::EntityFocused, confidence, rationale)
    } else if signals.lookup_phrasing && signals.word_count <= config.fast_lookup_max_words {
        (
            Route::FastLookup,
            0.7,
            "short single-fact lookup phrasing".to_string(),
        )
    } else if signals.word_count <= config.fast_lookup_max_words && mentions == 0 {
        (
            Route::FastLookup,
            0.55,
            "short keyword query".to_string(),
        )
    } else {
        (
            Route::MultiHop,
            0.4,
            "no strong signal".to_string(),
        )
    };

    RouteDecision {
        route,
        confidence,
        rationale,
        source: RouteSource::Heuristic,
    }
}
