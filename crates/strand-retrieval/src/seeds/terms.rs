//! Query term extraction, shared by the seed resolver and the router.
//!
//! Order of precedence: quoted phrases, capitalized multi-word spans
//! ("Acme Corp", "Bank of Kent"), then remaining content words. Terms are
//! deduplicated case-insensitively and capped.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use strand_core::constants::MAX_QUERY_TERMS;

static QUOTED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|“([^”]+)”"#).ok());

static WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'’\-]*").ok());

/// Lowercase words that may sit inside a capitalized span.
const CONNECTORS: &[&str] = &["of", "de", "la", "van", "von", "der"];

const STOPWORDS: &[&str] = &[
    "a", "about", "across", "after", "all", "also", "an", "and", "any", "are", "as", "at",
    "be", "been", "before", "being", "between", "both", "but", "by", "can", "could", "describe",
    "did", "do", "does", "during", "each", "either", "explain", "for", "from", "give", "had",
    "has", "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "know", "known", "list", "many", "may", "me", "might", "more", "most", "much",
    "must", "my", "neither", "no", "not", "of", "on", "only", "or", "other", "our", "over",
    "please", "shall", "she", "should", "show", "so", "some", "such", "tell", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "to", "very",
    "vs", "was", "we", "were", "what", "when", "where", "which", "who", "whom", "whose", "why",
    "will", "with", "would", "yes", "you", "your",
];

pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

fn strip_possessive(word: &str) -> (&str, bool) {
    for suffix in ["'s", "’s", "'", "’"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return (stem, true);
        }
    }
    (word, false)
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Phrases inside double quotes.
pub fn quoted_phrases(text: &str) -> Vec<String> {
    let Some(re) = QUOTED.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Runs of capitalized words separated only by whitespace (and inner
/// connectors such as "of"). Leading stopwords like "What" or "The" are
/// skipped and a possessive ends the span.
pub fn capitalized_spans(text: &str) -> Vec<String> {
    let Some(re) = WORD.as_ref() else {
        return Vec::new();
    };

    fn flush(current: &mut Vec<String>, spans: &mut Vec<String>) {
        if !current.is_empty() {
            spans.push(current.join(" "));
            current.clear();
        }
    }

    let mut spans = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut connector: Option<String> = None;
    let mut last_end = 0;

    for m in re.find_iter(text) {
        let gap = &text[last_end..m.start()];
        last_end = m.end();
        if !gap.chars().all(char::is_whitespace) {
            flush(&mut current, &mut spans);
            connector = None;
        }

        let (word, possessive) = strip_possessive(m.as_str());
        if is_capitalized(word) && !(current.is_empty() && is_stopword(word)) {
            if let Some(c) = connector.take() {
                current.push(c);
            }
            current.push(word.to_string());
        } else if !current.is_empty()
            && connector.is_none()
            && CONNECTORS.contains(&word.to_lowercase().as_str())
        {
            connector = Some(word.to_string());
        } else {
            flush(&mut current, &mut spans);
            connector = None;
        }

        if possessive {
            flush(&mut current, &mut spans);
            connector = None;
        }
    }
    flush(&mut current, &mut spans);
    spans
}

/// Quoted phrases plus capitalized spans: the query's named-entity mentions.
pub fn entity_mentions(text: &str) -> Vec<String> {
    let mut out = quoted_phrases(text);
    out.extend(capitalized_spans(text));
    dedupe(out)
}

/// Lowercased non-stopword words of at least three characters.
pub fn content_words(text: &str) -> Vec<String> {
    let Some(re) = WORD.as_ref() else {
        return Vec::new();
    };
    re.find_iter(text)
        .map(|m| strip_possessive(m.as_str()).0.to_lowercase())
        .filter(|w| w.chars().count() >= 3 && !is_stopword(w))
        .collect()
}

/// All resolvable terms of a query, in precedence order, capped at
/// [`MAX_QUERY_TERMS`].
pub fn extract_terms(text: &str) -> Vec<String> {
    extract_terms_with_context(text, &[])
}

/// Like [`extract_terms`], with `context` mentions (carried over from earlier
/// turns) ranked after the query's own mentions and before its content words.
pub fn extract_terms_with_context(text: &str, context: &[String]) -> Vec<String> {
    let mut mentions = entity_mentions(text);
    mentions.extend(context.iter().cloned());
    let covered: HashSet<String> = mentions
        .iter()
        .flat_map(|m| m.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>())
        .collect();

    let mut terms = dedupe(mentions);
    terms.extend(
        content_words(text)
            .into_iter()
            .filter(|w| !covered.contains(w)),
    );
    let mut terms = dedupe(terms);
    terms.truncate(MAX_QUERY_TERMS);
    terms
}

/// Case-insensitive dedupe, first occurrence wins.
pub fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
