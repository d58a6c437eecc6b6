//! Tuning constants.

/// Base unit for rate-limit pauses between Azure Resource Graph pages.
pub const SLEEP_MSEC: u64 = 200;

/// Cache file name prefix; the date stamp and `.json` are appended.
pub const CACHE_FILE_PREFIX: &str = "topology_cache";

/// Page size for Resource Graph queries.
pub const GRAPH_PAGE_SIZE: u32 = 100;

/// Safety limit on a single `az` invocation's stdout.
pub const MAX_CLI_OUTPUT_BYTES: usize = 5_000_000;
