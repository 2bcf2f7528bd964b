//! Evidence packaging: passage nodes → cited, ranked [`EvidenceItem`]s.

use std::collections::BTreeMap;

use strand_core::constants::META_DOCUMENT_ID;
use strand_core::models::{Citation, EvidenceItem, EvidenceSource, Node, TenantId};
use strand_observability::events;

/// Build an evidence item for a passage node. `rank` is 1-based.
pub fn from_node(node: &Node, score: f64, source: EvidenceSource, rank: usize) -> EvidenceItem {
    EvidenceItem {
        passage_id: node.id.clone(),
        tenant_id: node.tenant_id.clone(),
        score,
        text: node.text.clone(),
        citation: Citation {
            document_id: node.metadata.get(META_DOCUMENT_ID).cloned(),
            passage_name: node.name.clone(),
            source,
            rank,
            metadata: node.metadata.clone(),
        },
    }
}

/// Drop items owned by another tenant. Each drop is logged as a violation.
pub fn retain_tenant(items: Vec<EvidenceItem>, tenant: &TenantId, unit: &str) -> Vec<EvidenceItem> {
    items
        .into_iter()
        .filter(|item| {
            if &item.tenant_id == tenant {
                true
            } else {
                events::tenant_violation(tenant.as_str(), item.tenant_id.as_str(), unit);
                false
            }
        })
        .collect()
}

/// Merge by passage id keeping the highest score, sort by score descending
/// then passage id, truncate and re-rank from 1.
pub fn merge_ranked(items: impl IntoIterator<Item = EvidenceItem>, top_k: usize) -> Vec<EvidenceItem> {
    let mut best: BTreeMap<String, EvidenceItem> = BTreeMap::new();
    for item in items {
        match best.get(&item.passage_id) {
            Some(existing) if existing.score >= item.score => {}
            _ => {
                best.insert(item.passage_id.clone(), item);
            }
        }
    }
    let mut merged: Vec<EvidenceItem> = best.into_values().collect();
    merged.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.passage_id.cmp(&b.passage_id))
    });
    merged.truncate(top_k);
    rerank(&mut merged);
    merged
}

/// Reassign 1-based ranks in current order.
pub fn rerank(items: &mut [EvidenceItem]) {
    for (i, item) in items.iter_mut().enumerate() {
        item.citation.rank = i + 1;
    }
}
