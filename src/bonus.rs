use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Chance that a correct answer with questions still ahead earns a bonus.
pub const BONUS_PROBABILITY: f64 = 0.3;
pub const BONUS_MIN: u32 = 10;
pub const BONUS_MAX: u32 = 59;

/// Source of bonus awards. Consulted at most once per correct answer.
pub trait BonusSource: Send {
    /// Returns the bonus points to offer, or `None` when no bonus triggers.
    fn roll(&mut self) -> Option<u32>;
}

/// Random bonus rolls backed by any `rand` generator.
pub struct RandomBonus<R: Rng = StdRng> {
    rng: R,
}

impl RandomBonus<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomBonus<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> BonusSource for RandomBonus<R> {
    fn roll(&mut self) -> Option<u32> {
        if self.rng.gen_bool(BONUS_PROBABILITY) {
            Some(self.rng.gen_range(BONUS_MIN..=BONUS_MAX))
        } else {
            None
        }
    }
}

/// Never offers a bonus.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBonus;

impl BonusSource for NoBonus {
    fn roll(&mut self) -> Option<u32> {
        None
    }
}

/// Replays a scripted sequence of rolls, then stops offering bonuses.
#[derive(Debug, Default, Clone)]
pub struct FixedBonus {
    rolls: VecDeque<Option<u32>>,
}

impl FixedBonus {
    pub fn new<I: IntoIterator<Item = Option<u32>>>(rolls: I) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    pub fn always(points: u32, times: usize) -> Self {
        Self::new(std::iter::repeat(Some(points)).take(times))
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl BonusSource for FixedBonus {
    fn roll(&mut self) -> Option<u32> {
        self.rolls.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bonus_stays_in_range() {
        let mut bonus = RandomBonus::seeded(7);
        let rolls: Vec<u32> = (0..2_000).filter_map(|_| bonus.roll()).collect();

        assert!(!rolls.is_empty());
        assert!(rolls.iter().all(|p| (BONUS_MIN..=BONUS_MAX).contains(p)));
        // 30% of 2000, with generous slack
        assert!(rolls.len() > 450 && rolls.len() < 750, "{} rolls", rolls.len());
    }

    #[test]
    fn seeded_rolls_are_reproducible() {
        let mut a = RandomBonus::seeded(42);
        let mut b = RandomBonus::seeded(42);
        let first: Vec<_> = (0..50).map(|_| a.roll()).collect();
        let second: Vec<_> = (0..50).map(|_| b.roll()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn no_bonus_never_triggers() {
        let mut bonus = NoBonus;
        assert!((0..100).all(|_| bonus.roll().is_none()));
    }

    #[test]
    fn fixed_bonus_replays_script() {
        let mut bonus = FixedBonus::new([Some(12), None, Some(59)]);
        assert_eq!(bonus.roll(), Some(12));
        assert_eq!(bonus.roll(), None);
        assert_eq!(bonus.remaining(), 1);
        assert_eq!(bonus.roll(), Some(59));
        assert_eq!(bonus.roll(), None);

        let mut always = FixedBonus::always(20, 2);
        assert_eq!(always.roll(), Some(20));
        assert_eq!(always.roll(), Some(20));
        assert_eq!(always.roll(), None);
    }
}
