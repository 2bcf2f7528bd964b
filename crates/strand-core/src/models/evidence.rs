//! Evidence items handed to the external answer generator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tenant::TenantId;

/// Which part of the engine surfaced a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvidenceSource {
    /// Personalized pagerank walk.
    GraphWalk,
    /// Lexical + vector rank fusion.
    Fusion,
    /// A DRIFT sub-question, by id.
    SubQuestion { sub_question_id: String },
}

/// Provenance attached to every evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: Option<String>,
    pub passage_name: String,
    pub source: EvidenceSource,
    /// 1-based position in the final ranking.
    pub rank: usize,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// A ranked passage with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub passage_id: String,
    pub tenant_id: TenantId,
    pub score: f64,
    pub text: String,
    pub citation: Citation,
}
