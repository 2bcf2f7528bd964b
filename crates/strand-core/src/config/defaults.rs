// Single source of truth for all default values.

// --- Router ---
pub const DEFAULT_ROUTER_LLM_ENABLED: bool = true;
pub const DEFAULT_ROUTER_MIN_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_ROUTER_DISAGREEMENT_MARGIN: f64 = 0.2;
pub const DEFAULT_ROUTER_LLM_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_FAST_LOOKUP_MAX_WORDS: usize = 8;
pub const DEFAULT_LONG_QUERY_WORDS: usize = 25;

// --- Seed resolution ---
pub const DEFAULT_EXACT_WEIGHT: f64 = 1.0;
pub const DEFAULT_ALIAS_WEIGHT: f64 = 0.9;
pub const DEFAULT_FUZZY_WEIGHT: f64 = 0.75;
pub const DEFAULT_FULL_TEXT_WEIGHT: f64 = 0.6;
pub const DEFAULT_STRUCTURAL_WEIGHT: f64 = 0.5;
pub const DEFAULT_VECTOR_WEIGHT: f64 = 0.4;
pub const DEFAULT_COMMUNITY_WEIGHT: f64 = 0.5;
pub const DEFAULT_VECTOR_MIN_SIMILARITY: f64 = 0.35;
pub const DEFAULT_FUZZY_MIN_SCORE: f64 = 0.4;
pub const DEFAULT_CANDIDATES_PER_TERM: usize = 3;
pub const DEFAULT_MAX_SEEDS: usize = 32;
pub const DEFAULT_TIER_TIMEOUT_MS: u64 = 2_000;

// --- Fusion ---
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_FUSION_TOP_K: usize = 10;
pub const DEFAULT_FUSION_OVERFETCH: usize = 3;
pub const DEFAULT_AUTHORITY_BOOST: f64 = 0.1;
pub const DEFAULT_SUMMARY_BOOST: f64 = 0.15;
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 3_000;

// --- PPR ---
pub const DEFAULT_DAMPING: f64 = 0.85;
pub const DEFAULT_MIN_DAMPING: f64 = 0.5;
pub const DEFAULT_PPR_EPSILON: f64 = 1e-6;
pub const DEFAULT_PPR_MAX_ITERATIONS: usize = 20;
pub const DEFAULT_SMALL_SEED_THRESHOLD: usize = 2;
pub const DEFAULT_SMALL_SEED_PENALTY: f64 = 0.1;
pub const DEFAULT_SPARSE_DEGREE_THRESHOLD: f64 = 2.0;
pub const DEFAULT_SPARSE_PENALTY: f64 = 0.1;
pub const DEFAULT_EXPANSION_HOPS: usize = 2;
pub const DEFAULT_EXPANSION_MAX_NODES: usize = 2_000;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4_096;
pub const DEFAULT_EXPANSION_TIMEOUT_MS: u64 = 5_000;

// --- DRIFT ---
pub const DEFAULT_MAX_SUB_QUESTIONS: usize = 5;
pub const DEFAULT_DRIFT_MAX_ITERATIONS: usize = 3;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.75;
pub const DEFAULT_MAX_REDECOMPOSE_DEPTH: usize = 2;
pub const DEFAULT_SUB_QUESTION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_EVIDENCE_PER_SUB_QUESTION: usize = 5;
pub const DEFAULT_ANSWER_SUB_QUESTIONS: bool = true;
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_BLEND_COVERAGE_WEIGHT: f64 = 0.7;

// --- Query ---
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_EMBED_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_GENERATOR_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_EVIDENCE_TOP_K: usize = 10;
pub const DEFAULT_COMMUNITY_SEED_LIMIT: usize = 8;

// --- Cache ---
pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600; // 10 minutes

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
