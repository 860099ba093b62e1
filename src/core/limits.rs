/*!
 * Limits and Constants
 *
 * Sizing defaults shared by the containers and the worker pool.
 */

// =============================================================================
// CONCURRENT TABLE
// =============================================================================

/// Bucket count of a freshly constructed table
pub const DEFAULT_TABLE_BUCKETS: usize = 53;

/// Bucket counts a table grows through, smallest first
///
/// Each step roughly doubles the previous one. Primes keep `hash % buckets`
/// well spread even for hashers with weak low bits.
pub const TABLE_PRIME_LADDER: [usize; 26] = [
    53,
    97,
    193,
    389,
    769,
    1_543,
    3_079,
    6_151,
    12_289,
    24_593,
    49_157,
    98_317,
    196_613,
    393_241,
    786_433,
    1_572_869,
    3_145_739,
    6_291_469,
    12_582_917,
    25_165_843,
    50_331_653,
    100_663_319,
    201_326_611,
    402_653_189,
    805_306_457,
    1_610_612_741,
];

// =============================================================================
// WORKER POOL
// =============================================================================

/// Worker count used when the platform cannot report its parallelism
pub const FALLBACK_WORKER_THREADS: usize = 4;

/// Thread name prefix; workers are named `{prefix}-{index}`
pub const WORKER_THREAD_PREFIX: &str = "pool-worker";
