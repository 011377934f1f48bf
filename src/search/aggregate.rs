//! Seed aggregation: roll every (power, cast) pair once and tally which effects trigger.

use std::collections::HashMap;
use std::ops::{Range, RangeInclusive};
use std::ptr;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::effect::Effect;
use crate::parallel::{batch_ranges, WorkerPool};
use crate::roll::RollFunction;
use crate::search::catalog::SentinelRule;
use crate::search::collate::locale_cmp;

/// Powers rolled by the aggregator.
pub const POWER_RANGE: Range<u32> = 0..2_200;
/// Cast counts rolled at every power.
pub const CAST_RANGE: RangeInclusive<u32> = 1..=5;

/// How often one effect triggered for one (power, cast) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Display name of the effect.
    pub effect: String,
    pub power: u32,
    pub cast: u32,
    pub times: u32,
}

/// Effect id -> results in ascending (power, cast) order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedIndex {
    buckets: HashMap<String, Vec<RollResult>>,
}

type Buckets = HashMap<String, Vec<RollResult>>;

impl SeedIndex {
    pub fn from_buckets(buckets: HashMap<String, Vec<RollResult>>) -> Self {
        Self { buckets }
    }

    /// Results for one effect id. Unknown ids have none.
    pub fn bucket(&self, id: &str) -> &[RollResult] {
        self.buckets.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.buckets.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn effect_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn result_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn summary(&self) -> IndexSummary {
        let mut effects: Vec<EffectOccurrence> = self
            .buckets
            .iter()
            .map(|(id, results)| EffectOccurrence {
                id: id.clone(),
                name: results.first().map(|r| r.effect.clone()).unwrap_or_default(),
                combinations: results.len(),
                occurrences: results.iter().map(|r| u64::from(r.times)).sum(),
                first_power: results.first().map(|r| r.power),
            })
            .collect();
        effects.sort_by(|a, b| locale_cmp(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));

        IndexSummary {
            generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            power_min: POWER_RANGE.start,
            power_max: POWER_RANGE.end - 1,
            cast_min: *CAST_RANGE.start(),
            cast_max: *CAST_RANGE.end(),
            effect_count: self.effect_count(),
            result_count: self.result_count(),
            effects,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub generated_at: String,
    pub power_min: u32,
    pub power_max: u32,
    pub cast_min: u32,
    pub cast_max: u32,
    pub effect_count: usize,
    pub result_count: usize,
    pub effects: Vec<EffectOccurrence>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectOccurrence {
    pub id: String,
    pub name: String,
    /// Number of (power, cast) pairs the effect appears at.
    pub combinations: usize,
    /// Total triggers across all pairs.
    pub occurrences: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_power: Option<u32>,
}

/// Roll the full power/cast grid on the current thread.
pub fn build_seed_index<R>(effects: &[Effect], roller: &R, rule: &SentinelRule) -> SeedIndex
where
    R: RollFunction + ?Sized,
{
    let started = Instant::now();
    let index = SeedIndex::from_buckets(collect_range(effects, roller, rule, POWER_RANGE));
    log_build(&index, started, 1);
    index
}

/// Like [build_seed_index] but splits the power range into batches run on `pool`.
/// Batches are merged in power order, so the result equals the serial build.
pub fn build_seed_index_parallel<R>(
    effects: &[Effect],
    roller: &R,
    rule: &SentinelRule,
    pool: &WorkerPool,
) -> SeedIndex
where
    R: RollFunction + ?Sized,
{
    let started = Instant::now();
    let (partials, batches) = pool.install(|| {
        let batches = rayon::current_num_threads().saturating_mul(4);
        let ranges = batch_ranges(POWER_RANGE, batches);
        let partials: Vec<Buckets> = ranges
            .par_iter()
            .map(|powers| collect_range(effects, roller, rule, powers.clone()))
            .collect();
        (partials, ranges.len())
    });

    let mut buckets = Buckets::new();
    for partial in partials {
        for (id, results) in partial {
            buckets.entry(id).or_default().extend(results);
        }
    }
    let index = SeedIndex::from_buckets(buckets);
    log_build(&index, started, batches);
    index
}

fn collect_range<R>(effects: &[Effect], roller: &R, rule: &SentinelRule, powers: Range<u32>) -> Buckets
where
    R: RollFunction + ?Sized,
{
    // The sentinel is identified by its slot, not its id, so a visible entry sharing the
    // sentinel's id is still indexed.
    let sentinels: Vec<&Effect> = effects
        .iter()
        .enumerate()
        .filter(|(position, effect)| rule.is_sentinel(*position, effects.len(), effect))
        .map(|(_, effect)| effect)
        .collect();

    let mut buckets = Buckets::new();
    for power in powers {
        for cast in CAST_RANGE {
            let triggered: Vec<&Effect> = roller
                .roll(effects, power, cast)
                .into_iter()
                .filter(|effect| !sentinels.iter().any(|sentinel| ptr::eq(*sentinel, *effect)))
                .collect();
            for (id, result) in tally_roll(triggered, power, cast) {
                buckets.entry(id.to_string()).or_default().push(result);
            }
        }
    }
    buckets
}

/// One entry per distinct id in `triggered`, in first-trigger order.
fn tally_roll(triggered: Vec<&Effect>, power: u32, cast: u32) -> Vec<(&str, RollResult)> {
    let mut tally: Vec<(&str, RollResult)> = Vec::with_capacity(triggered.len());
    for effect in triggered {
        match tally.iter_mut().find(|(id, _)| *id == effect.id) {
            Some((_, result)) => result.times += 1,
            None => tally.push((
                effect.id.as_str(),
                RollResult {
                    effect: effect.name.clone(),
                    power,
                    cast,
                    times: 1,
                },
            )),
        }
    }
    tally
}

fn log_build(index: &SeedIndex, started: Instant, batches: usize) {
    info!(
        effects = index.effect_count(),
        results = index.result_count(),
        batches,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "seed index built"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::SeededRoller;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scenario() -> Vec<Effect> {
        vec![
            Effect::new("a", "Alpha").with_weight(3),
            Effect::new("b", "Beta").with_weight(2).with_min_power(500),
            Effect::new("sentinel", "Ignore").with_weight(4),
        ]
    }

    #[test]
    fn every_pair_is_rolled_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn counting(effects: &[Effect], _power: u32, _cast: u32) -> Vec<&Effect> {
            CALLS.fetch_add(1, Ordering::Relaxed);
            effects.iter().take(1).collect()
        }
        let effects = scenario();
        let index = build_seed_index(&effects, &counting, &SentinelRule::Trailing);
        assert_eq!(CALLS.load(Ordering::Relaxed), 11_000);
        assert_eq!(index.bucket("a").len(), 11_000);
    }

    #[test]
    fn repeats_within_a_pair_are_counted() {
        fn echo_cast(effects: &[Effect], _power: u32, cast: u32) -> Vec<&Effect> {
            effects.iter().cycle().take(cast as usize * 2).filter(|e| e.id == "a").collect()
        }
        let effects = vec![Effect::new("a", "Alpha"), Effect::new("none", "None")];
        let index = build_seed_index(&effects, &echo_cast, &SentinelRule::Trailing);
        let bucket = index.bucket("a");
        assert_eq!(bucket[0], RollResult { effect: "Alpha".into(), power: 0, cast: 1, times: 1 });
        assert_eq!(bucket[4].cast, 5);
        assert_eq!(bucket[4].times, 5);
        assert!(!index.contains("none"));
    }

    #[test]
    fn sentinel_is_never_indexed() {
        let effects = scenario();
        let index = build_seed_index(&effects, &SeededRoller::new(9), &SentinelRule::Trailing);
        assert!(!index.contains("sentinel"));
        assert!(index.contains("a"));

        let open = build_seed_index(&effects, &SeededRoller::new(9), &SentinelRule::Disabled);
        assert!(open.contains("sentinel"));
    }

    #[test]
    fn visible_effect_sharing_the_sentinel_id_is_indexed() {
        fn everything(effects: &[Effect], _power: u32, _cast: u32) -> Vec<&Effect> {
            effects.iter().collect()
        }
        let effects = vec![
            Effect::new("x", "Visible X"),
            Effect::new("a", "Alpha"),
            Effect::new("x", "Hidden X"),
        ];
        let index = build_seed_index(&effects, &everything, &SentinelRule::Trailing);
        let bucket = index.bucket("x");
        assert_eq!(bucket.len(), 11_000);
        assert!(bucket.iter().all(|r| r.effect == "Visible X" && r.times == 1));
    }

    #[test]
    fn buckets_stay_in_bounds_and_order() {
        let effects = scenario();
        let index = build_seed_index(&effects, &SeededRoller::new(1), &SentinelRule::Trailing);
        for id in ["a", "b"] {
            let bucket = index.bucket(id);
            assert!(!bucket.is_empty());
            for pair in bucket.windows(2) {
                assert!((pair[0].power, pair[0].cast) < (pair[1].power, pair[1].cast));
            }
            for result in bucket {
                assert!(POWER_RANGE.contains(&result.power));
                assert!(CAST_RANGE.contains(&result.cast));
                assert!(result.times >= 1 && result.times <= result.cast);
            }
        }
        assert!(index.bucket("b").iter().all(|r| r.power >= 500));
    }

    #[test]
    fn parallel_build_matches_serial() {
        let effects = scenario();
        let roller = SeededRoller::new(17);
        let serial = build_seed_index(&effects, &roller, &SentinelRule::Trailing);
        let parallel =
            build_seed_index_parallel(&effects, &roller, &SentinelRule::Trailing, &WorkerPool::with_workers(3));
        assert_eq!(serial, parallel);
    }

    #[test]
    fn summary_counts_occurrences() {
        let mut buckets = HashMap::new();
        buckets.insert(
            "a".to_string(),
            vec![
                RollResult { effect: "Alpha".into(), power: 3, cast: 2, times: 2 },
                RollResult { effect: "Alpha".into(), power: 8, cast: 1, times: 1 },
            ],
        );
        let summary = SeedIndex::from_buckets(buckets).summary();
        assert_eq!(summary.effect_count, 1);
        assert_eq!(summary.result_count, 2);
        assert_eq!(summary.power_max, 2_199);
        assert_eq!(summary.effects[0].occurrences, 3);
        assert_eq!(summary.effects[0].first_power, Some(3));
    }

    #[test]
    fn unknown_ids_have_empty_buckets() {
        assert!(SeedIndex::default().bucket("missing").is_empty());
    }
}
