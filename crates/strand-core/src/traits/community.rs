use async_trait::async_trait;

use crate::errors::StrandResult;
use crate::models::{SeedCandidate, TenantId};

/// Supplies precomputed thematic/community seed candidates for the thematic route.
#[async_trait]
pub trait ICommunityProvider: Send + Sync {
    async fn thematic_seeds(
        &self,
        tenant: &TenantId,
        query: &str,
        limit: usize,
    ) -> StrandResult<Vec<SeedCandidate>>;
}
