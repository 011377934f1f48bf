//! Roll function: which effects trigger for a given power and cast count.

use crate::data::effect::Effect;
use crate::roll::rng::Rng;

/// A pure, deterministic roll. Called once per (power, cast) pair by the seed aggregator,
/// possibly from several threads.
pub trait RollFunction: Send + Sync {
    fn roll<'a>(&self, effects: &'a [Effect], power: u32, cast: u32) -> Vec<&'a Effect>;
}

impl<F> RollFunction for F
where
    F: for<'a> Fn(&'a [Effect], u32, u32) -> Vec<&'a Effect> + Send + Sync,
{
    fn roll<'a>(&self, effects: &'a [Effect], power: u32, cast: u32) -> Vec<&'a Effect> {
        self(effects, power, cast)
    }
}

/// Default roller. Each power level owns one SplitMix64 stream; a roll with `cast` casts
/// takes the first `cast` weighted draws from it, so a longer cast extends a shorter one.
/// Effects whose `min_power` exceeds the power are not eligible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeededRoller {
    pub seed: u64,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl RollFunction for SeededRoller {
    fn roll<'a>(&self, effects: &'a [Effect], power: u32, cast: u32) -> Vec<&'a Effect> {
        let eligible: Vec<&Effect> = effects
            .iter()
            .filter(|effect| effect.weight > 0 && effect.min_power <= power)
            .collect();
        let total_weight: u64 = eligible.iter().map(|effect| u64::from(effect.weight)).sum();
        if total_weight == 0 {
            return Vec::new();
        }

        let mut rng = Rng::for_power(self.seed, power);
        (0..cast)
            .filter_map(|_| {
                let mut ticket = rng.below(total_weight);
                eligible.iter().copied().find(|effect| {
                    let weight = u64::from(effect.weight);
                    if ticket < weight {
                        true
                    } else {
                        ticket -= weight;
                        false
                    }
                })
            })
            .collect()
    }
}
