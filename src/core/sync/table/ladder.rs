/*!
 * Prime Ladder
 * Picks the next bucket count when a table outgrows its current array
 */

use crate::core::limits::TABLE_PRIME_LADDER;

/// Smallest ladder prime strictly greater than both `len` and `current`
///
/// Returns `None` once the ladder is exhausted; the table then keeps its
/// bucket count and lets chains grow.
pub(super) fn next_bucket_count(current: usize, len: usize) -> Option<usize> {
    let floor = current.max(len);
    TABLE_PRIME_LADDER.iter().copied().find(|&prime| prime > floor)
}
