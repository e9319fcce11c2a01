//! Runner placement.
//!
//! Runner lists run from the lead runner (head, highest base) to the trailing
//! runner (tail, lowest base). Base indices count from 0 (first base); index
//! `bases - 1` is home.

/// Result of resolving runner movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Resolved base for every runner, batter last if one was placed.
    pub bases: Vec<i64>,
    /// List indices of runners who reached home, highest index first.
    pub scored: Vec<usize>,
}

/// Resolve where runners end up.
///
/// `desired` holds each runner's intended base, head first. When `batter` is
/// given the batter is appended at the tail on that base. Walking from the tail
/// toward the head, any runner at or behind the highest base claimed so far is
/// pushed to the base just past it, so nobody shares or passes a base. Runners
/// at or past home are reported in `scored`, ordered so that removing them one
/// by one keeps the remaining indices valid.
pub fn advance(desired: &[i64], batter: Option<i64>, bases: i64) -> Advance {
    let mut resolved: Vec<i64> = desired.to_vec();
    resolved.extend(batter);

    let mut highest = -1;
    for base in resolved.iter_mut().rev() {
        if *base <= highest {
            *base = highest + 1;
        }
        highest = *base;
    }

    let home = bases - 1;
    let scored = (0..resolved.len()).rev().filter(|i| resolved[*i] >= home).collect();
    Advance {
        bases: resolved,
        scored,
    }
}
