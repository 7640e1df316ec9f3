//! Pair generation.
//!
//! A board with `n` pairs holds every symbol in `0..n` exactly twice, in a
//! uniformly random order. The order comes from a forward Fisher–Yates pass:
//! each position `i` swaps with a uniformly chosen `j` in `i..len`.

use crate::cards::SymbolId;
use crate::core::rng::GameRng;

/// Shuffle a slice in place with a forward Fisher–Yates pass.
pub fn shuffle_in_place<T>(items: &mut [T], rng: &mut GameRng) {
    let len = items.len();
    for i in 0..len {
        let j = rng.gen_range_usize(i..len);
        items.swap(i, j);
    }
}

/// Produce `2 * pair_count` symbols, each of `0..pair_count` exactly twice,
/// uniformly permuted.
///
/// ```
/// use match_pairs::board::generate_pair_sequence;
/// use match_pairs::cards::SymbolId;
/// use match_pairs::core::GameRng;
///
/// let mut rng = GameRng::new(42);
/// let mut symbols = generate_pair_sequence(2, &mut rng);
/// symbols.sort();
///
/// let expected: Vec<SymbolId> = [0, 0, 1, 1].into_iter().map(SymbolId::new).collect();
/// assert_eq!(symbols, expected);
/// ```
#[must_use]
pub fn generate_pair_sequence(pair_count: usize, rng: &mut GameRng) -> Vec<SymbolId> {
    let mut symbols: Vec<SymbolId> = (0..pair_count as u32)
        .flat_map(|id| [SymbolId::new(id), SymbolId::new(id)])
        .collect();
    shuffle_in_place(&mut symbols, rng);
    symbols
}
