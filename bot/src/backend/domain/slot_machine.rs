//! Slot machine resolver.
//!
//! Strip layout: ten base symbols with three wrap-padding symbols on each
//! side (16 entries total). A spin samples three independent positions in
//! [3, 12]; position `n` exposes the window `[n-1, n, n+1]` and the middle
//! symbol is the scoring symbol of that reel.
//!
//! Payout table (top-down, first match wins):
//! 1. (two, two, six)             bid * 5000
//! 2. three four-leaf-clovers     bid + 1000
//! 3. three cherries              bid + 800
//! 4. any three-of-a-kind         bid + 500
//! 5. adjacent (two, six)         bid * 4
//! 6. adjacent cherries pair      bid * 3
//! 7. any adjacent pair           bid * 2
//! 8. no match                    bid forfeited

use rand::Rng;
use shared::{PayoutTier, SlotSymbol, SpinOutcome};

use SlotSymbol::*;

/// Lowest valid reel position.
pub const POSITION_MIN: usize = 3;
/// Highest valid reel position.
pub const POSITION_MAX: usize = 12;

/// The sampled strip: the ten-symbol reel pattern, padded with the last
/// three symbols before and the first three after so a window never indexes
/// out of bounds.
const STRIP: [SlotSymbol; 16] = [
    // padding
    Mushroom, Heart, Snowflake,
    // reel pattern
    Cherries, Cookie, Two, FourLeafClover, Cyclone, Sunflower, Six, Mushroom, Heart, Snowflake,
    // padding
    Cherries, Cookie, Two,
];

/// Payout table in the format hosts print for the `payouts` command.
pub const PAYOUTS: &str = "Slot machine payouts:
    :two: :two: :six: Bet * 5000
    :four_leaf_clover: :four_leaf_clover: :four_leaf_clover: +1000
    :cherries: :cherries: :cherries: +800
    :two: :six: Bet * 4
    :cherries: :cherries: Bet * 3

    Three symbols: +500
    Two symbols: Bet * 2";

/// Sample three independent reel positions.
pub fn draw_positions<R: Rng>(rng: &mut R) -> [usize; 3] {
    [
        rng.gen_range(POSITION_MIN..=POSITION_MAX),
        rng.gen_range(POSITION_MIN..=POSITION_MAX),
        rng.gen_range(POSITION_MIN..=POSITION_MAX),
    ]
}

/// Resolve a spin from fixed reel positions.
///
/// Positions must lie in [POSITION_MIN, POSITION_MAX]; `draw_positions`
/// guarantees that for sampled spins.
pub fn resolve(positions: [usize; 3], bid: i64) -> SpinOutcome {
    let reels = [
        window(positions[0]),
        window(positions[1]),
        window(positions[2]),
    ];
    let line = [reels[0][1], reels[1][1], reels[2][1]];
    let (tier, delta) = score(line, bid);

    SpinOutcome {
        reels,
        line,
        tier,
        delta,
    }
}

/// Sample positions and resolve in one step.
pub fn spin<R: Rng>(rng: &mut R, bid: i64) -> SpinOutcome {
    resolve(draw_positions(rng), bid)
}

/// The three visible symbols around a position.
fn window(n: usize) -> [SlotSymbol; 3] {
    [STRIP[n - 1], STRIP[n], STRIP[n + 1]]
}

/// Match the line against the payout table.
fn score(line: [SlotSymbol; 3], bid: i64) -> (PayoutTier, i64) {
    match line {
        [Two, Two, Six] => (PayoutTier::Jackpot, bid.saturating_mul(5000)),
        [FourLeafClover, FourLeafClover, FourLeafClover] => (PayoutTier::ThreeClovers, bid + 1000),
        [Cherries, Cherries, Cherries] => (PayoutTier::ThreeCherries, bid + 800),
        [a, b, c] if a == b && b == c => (PayoutTier::ThreeOfAKind, bid + 500),
        [Two, Six, _] | [_, Two, Six] => (PayoutTier::TwoSix, bid.saturating_mul(4)),
        [Cherries, Cherries, _] | [_, Cherries, Cherries] => {
            (PayoutTier::TwoCherries, bid.saturating_mul(3))
        }
        [a, b, c] if a == b || b == c => (PayoutTier::AnyPair, bid.saturating_mul(2)),
        _ => (PayoutTier::NoMatch, -bid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_window_extraction() {
        // Position 3 sits on the first pattern symbol; its window reaches
        // into the leading padding.
        assert_eq!(window(3), [Snowflake, Cherries, Cookie]);
        // Position 12 is the last pattern symbol; its window reaches into
        // the trailing padding.
        assert_eq!(window(12), [Heart, Snowflake, Cherries]);
    }

    #[test]
    fn test_jackpot_two_two_six() {
        let outcome = resolve([5, 5, 9], 10);
        assert_eq!(outcome.line, [Two, Two, Six]);
        assert_eq!(outcome.tier, PayoutTier::Jackpot);
        assert_eq!(outcome.delta, 50_000);
    }

    #[test]
    fn test_three_clovers() {
        let outcome = resolve([6, 6, 6], 10);
        assert_eq!(outcome.tier, PayoutTier::ThreeClovers);
        assert_eq!(outcome.delta, 1_010);
    }

    #[test]
    fn test_three_cherries() {
        let outcome = resolve([3, 3, 3], 10);
        assert_eq!(outcome.line, [Cherries, Cherries, Cherries]);
        assert_eq!(outcome.tier, PayoutTier::ThreeCherries);
        assert_eq!(outcome.delta, 810);
    }

    #[test]
    fn test_any_three_of_a_kind() {
        // (5,5,5) lines up three twos, which is not the jackpot sequence.
        let outcome = resolve([5, 5, 5], 10);
        assert_eq!(outcome.line, [Two, Two, Two]);
        assert_eq!(outcome.tier, PayoutTier::ThreeOfAKind);
        assert_eq!(outcome.delta, 510);
    }

    #[test]
    fn test_two_six_pair_both_placements() {
        let leading = resolve([5, 9, 7], 10);
        assert_eq!(leading.line, [Two, Six, Cyclone]);
        assert_eq!(leading.tier, PayoutTier::TwoSix);
        assert_eq!(leading.delta, 40);

        let trailing = resolve([7, 5, 9], 10);
        assert_eq!(trailing.line, [Cyclone, Two, Six]);
        assert_eq!(trailing.tier, PayoutTier::TwoSix);
    }

    #[test]
    fn test_cherries_pair_both_placements() {
        let leading = resolve([3, 3, 7], 10);
        assert_eq!(leading.tier, PayoutTier::TwoCherries);
        assert_eq!(leading.delta, 30);

        let trailing = resolve([7, 3, 3], 10);
        assert_eq!(trailing.tier, PayoutTier::TwoCherries);
    }

    #[test]
    fn test_any_adjacent_pair() {
        let leading = resolve([4, 4, 7], 10);
        assert_eq!(leading.line, [Cookie, Cookie, Cyclone]);
        assert_eq!(leading.tier, PayoutTier::AnyPair);
        assert_eq!(leading.delta, 20);

        let trailing = resolve([7, 8, 8], 10);
        assert_eq!(trailing.line, [Cyclone, Sunflower, Sunflower]);
        assert_eq!(trailing.tier, PayoutTier::AnyPair);
    }

    #[test]
    fn test_non_adjacent_pair_is_no_match() {
        // Equal outer reels with a different middle do not pay.
        let outcome = resolve([4, 7, 4], 10);
        assert_eq!(outcome.line, [Cookie, Cyclone, Cookie]);
        assert_eq!(outcome.tier, PayoutTier::NoMatch);
        assert_eq!(outcome.delta, -10);
    }

    #[test]
    fn test_no_match_forfeits_bid() {
        let outcome = resolve([10, 12, 11], 10);
        assert_eq!(outcome.line, [Mushroom, Snowflake, Heart]);
        assert_eq!(outcome.tier, PayoutTier::NoMatch);
        assert_eq!(outcome.delta, -10);
    }

    #[test]
    fn test_draw_positions_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            for position in draw_positions(&mut rng) {
                assert!((POSITION_MIN..=POSITION_MAX).contains(&position));
            }
        }
    }

    #[test]
    fn test_spin_matches_resolve_for_same_draw() {
        let mut draw_rng = StdRng::seed_from_u64(42);
        let positions = draw_positions(&mut draw_rng);

        let mut spin_rng = StdRng::seed_from_u64(42);
        let outcome = spin(&mut spin_rng, 25);

        assert_eq!(outcome, resolve(positions, 25));
    }
}
