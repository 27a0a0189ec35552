/// Default weight of the category match subscore.
pub const DEFAULT_CATEGORY_MATCH_WEIGHT: f64 = 0.45;

/// Default weight of the preferred amenity coverage subscore.
pub const DEFAULT_AMENITY_COVERAGE_WEIGHT: f64 = 0.35;

/// Default weight of the capacity fit subscore.
pub const DEFAULT_CAPACITY_FIT_WEIGHT: f64 = 0.20;

/// Credit given when a venue shares the desired node's family but not the node itself.
pub const DEFAULT_FAMILY_MATCH_CREDIT: f64 = 0.6;

/// Subcategories expected under every category of a published snapshot.
pub const DEFAULT_SUBCATEGORIES_PER_CATEGORY: usize = 3;

/// Candidate pool size from which matching is spread across worker threads.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

/// Allowed drift of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;
