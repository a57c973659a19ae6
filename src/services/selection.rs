use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    error::AppResult,
    models::{CategoryGroup, ScoredCandidate},
    services::recency::{RecencyRecord, RecencyStore},
};

/// Candidates at or below this score are never suggested
pub const MIN_VIABLE_SCORE: f64 = -2.0;

/// Width of a score band
pub const BAND_WIDTH: f64 = 5.0;

/// Upper bound of the confidence scale
pub const MAX_CONFIDENCE: f64 = 0.85;

const CONFIDENCE_BASE: f64 = 0.30;
const CATEGORY_WEIGHT: f64 = 0.25;
const COLOR_WEIGHT: f64 = 0.20;
const WEATHER_WEIGHT: f64 = 0.20;

/// Score band key: floor(score / 5) * 5
pub fn score_band(score: f64) -> i64 {
    ((score / BAND_WIDTH).floor() * BAND_WIDTH) as i64
}

/// Items allowed per functional group during the diversity pass
pub fn per_category_cap(max_items: usize) -> usize {
    if max_items <= 3 {
        2
    } else {
        3
    }
}

/// Picks up to `max_items` candidates
///
/// Samples across score bands with the given random source, so repeated calls
/// vary. Never returns two candidates with the same item id. Items in `recent` are only
/// used once every fresh viable candidate is exhausted.
pub fn select<R: Rng + ?Sized>(
    candidates: &[ScoredCandidate],
    max_items: usize,
    recent: &RecencyRecord,
    rng: &mut R,
) -> Vec<ScoredCandidate> {
    let mut picker = Picker::new(max_items);

    let viable: Vec<&ScoredCandidate> = candidates
        .iter()
        .filter(|c| c.score > MIN_VIABLE_SCORE)
        .collect();
    let (fresh, repeats): (Vec<&ScoredCandidate>, Vec<&ScoredCandidate>) = viable
        .into_iter()
        .partition(|c| !recent.contains(&c.item.id));

    let mut bands: BTreeMap<i64, Vec<&ScoredCandidate>> = BTreeMap::new();
    for candidate in fresh.iter().copied() {
        bands.entry(score_band(candidate.score)).or_default().push(candidate);
    }

    // First pass: one item per group, sampled across bands
    let mut band_keys: Vec<i64> = bands.keys().copied().collect();
    for group in CategoryGroup::SELECTION_ORDER {
        if picker.is_full() {
            break;
        }
        band_keys.shuffle(rng);
        for key in &band_keys {
            let mut members = bands[key].clone();
            members.shuffle(rng);
            if let Some(candidate) = members
                .into_iter()
                .find(|c| c.group == group && !picker.is_used(c))
            {
                picker.take(candidate);
                break;
            }
        }
    }

    // Second pass: highest bands first, neighbouring bands may trade places
    let mut ordered: Vec<i64> = bands.keys().rev().copied().collect();
    for i in 1..ordered.len() {
        if (ordered[i - 1] - ordered[i]).abs() as f64 <= BAND_WIDTH && rng.gen_bool(0.5) {
            ordered.swap(i - 1, i);
        }
    }
    let cap = per_category_cap(max_items);
    'bands: for key in &ordered {
        let mut members = bands[key].clone();
        members.shuffle(rng);
        for candidate in members {
            if picker.is_full() {
                break 'bands;
            }
            if !picker.is_used(candidate) && picker.group_count(candidate.group) < cap {
                picker.take(candidate);
            }
        }
    }

    // Final pass: anything viable, fresh items before recently shown ones
    if !picker.is_full() {
        let mut leftovers: Vec<&ScoredCandidate> = fresh;
        sort_by_score_desc(&mut leftovers);
        let mut recent_leftovers = repeats;
        sort_by_score_desc(&mut recent_leftovers);

        for candidate in leftovers.into_iter().chain(recent_leftovers) {
            if picker.is_full() {
                break;
            }
            if !picker.is_used(candidate) {
                if recent.contains(&candidate.item.id) {
                    tracing::debug!(item_id = %candidate.item.id, "Reusing recently shown item");
                }
                picker.take(candidate);
            }
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        selected = picker.selected.len(),
        max_items,
        "Selection completed"
    );

    picker.selected
}

fn sort_by_score_desc(candidates: &mut [&ScoredCandidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Tracks what has been picked so far
struct Picker {
    max_items: usize,
    selected: Vec<ScoredCandidate>,
    used: HashSet<String>,
    group_counts: HashMap<CategoryGroup, usize>,
}

impl Picker {
    fn new(max_items: usize) -> Self {
        Self {
            max_items,
            selected: Vec::new(),
            used: HashSet::new(),
            group_counts: HashMap::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.selected.len() >= self.max_items
    }

    fn is_used(&self, candidate: &ScoredCandidate) -> bool {
        self.used.contains(&candidate.item.id)
    }

    fn group_count(&self, group: CategoryGroup) -> usize {
        self.group_counts.get(&group).copied().unwrap_or(0)
    }

    fn take(&mut self, candidate: &ScoredCandidate) {
        self.used.insert(candidate.item.id.clone());
        *self.group_counts.entry(candidate.group).or_insert(0) += 1;
        self.selected.push(candidate.clone());
    }
}

/// Confidence of a selection, from how many items matched preferences and weather
pub fn confidence(selected: &[ScoredCandidate]) -> f64 {
    if selected.is_empty() {
        return 0.0;
    }

    let total = selected.len() as f64;
    let fraction = |pred: fn(&ScoredCandidate) -> bool| {
        selected.iter().filter(|c| pred(c)).count() as f64 / total
    };

    let raw = CONFIDENCE_BASE
        + CATEGORY_WEIGHT * fraction(|c| c.matches.preferred_category)
        + COLOR_WEIGHT * fraction(|c| c.matches.preferred_color)
        + WEATHER_WEIGHT * fraction(|c| c.matches.weather_aligned);

    raw.clamp(0.0, MAX_CONFIDENCE)
}

/// Writes the selected items into recency memory
pub async fn remember(
    store: &dyn RecencyStore,
    selected_ids: &[String],
    at: DateTime<Utc>,
) -> AppResult<()> {
    if selected_ids.is_empty() {
        return Ok(());
    }
    store.record(selected_ids, at).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InventoryItem, MatchFlags};
    use crate::services::classifier::classify;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn candidate(id: &str, category: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            item: InventoryItem::new(id, id, category, "Black"),
            group: classify(category),
            score,
            matches: MatchFlags::default(),
        }
    }

    fn closet() -> Vec<ScoredCandidate> {
        vec![
            candidate("tee-1", "T-shirt", 8.0),
            candidate("tee-2", "T-shirt", 7.0),
            candidate("tee-3", "T-shirt", 6.5),
            candidate("tee-4", "T-shirt", 6.0),
            candidate("jeans-1", "Jeans", 4.0),
            candidate("shorts-1", "Shorts", 3.0),
            candidate("dress-1", "Dress", 2.0),
            candidate("jacket-1", "Jacket", -1.0),
            candidate("sneakers-1", "Sneakers", 1.0),
            candidate("scarf-1", "Scarf", 0.5),
            candidate("coat-1", "Coat", -5.0),
        ]
    }

    fn ids(selected: &[ScoredCandidate]) -> Vec<String> {
        selected.iter().map(|c| c.item.id.clone()).collect()
    }

    #[test]
    fn test_score_band() {
        assert_eq!(score_band(0.0), 0);
        assert_eq!(score_band(4.9), 0);
        assert_eq!(score_band(5.0), 5);
        assert_eq!(score_band(11.5), 10);
        assert_eq!(score_band(-1.0), -5);
    }

    #[test]
    fn test_per_category_cap() {
        assert_eq!(per_category_cap(2), 2);
        assert_eq!(per_category_cap(3), 2);
        assert_eq!(per_category_cap(4), 3);
        assert_eq!(per_category_cap(8), 3);
    }

    #[test]
    fn test_selection_is_bounded_and_unique() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for max in 1..=8 {
                let selected = select(&closet(), max, &RecencyRecord::new(), &mut rng);
                assert!(selected.len() <= max);
                let unique: HashSet<String> = ids(&selected).into_iter().collect();
                assert_eq!(unique.len(), selected.len());
            }
        }
    }

    #[test]
    fn test_low_scores_are_never_selected() {
        let mut rng = StdRng::seed_from_u64(7);
        let selected = select(&closet(), 20, &RecencyRecord::new(), &mut rng);
        assert!(!ids(&selected).contains(&"coat-1".to_string()));
        assert_eq!(selected.len(), 10);
    }

    #[test]
    fn test_first_pass_covers_categories() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select(&closet(), 6, &RecencyRecord::new(), &mut rng);
            let groups: HashSet<CategoryGroup> = selected.iter().map(|c| c.group).collect();
            assert_eq!(groups.len(), 6, "seed {}", seed);
        }
    }

    fn tee_heavy_closet() -> Vec<ScoredCandidate> {
        vec![
            candidate("tee-1", "T-shirt", 8.0),
            candidate("tee-2", "T-shirt", 7.5),
            candidate("tee-3", "T-shirt", 7.0),
            candidate("tee-4", "T-shirt", 6.5),
            candidate("tee-5", "T-shirt", 6.0),
            candidate("jeans-1", "Jeans", 4.0),
        ]
    }

    fn tops(selected: &[ScoredCandidate]) -> usize {
        selected
            .iter()
            .filter(|c| c.group == CategoryGroup::Tops)
            .count()
    }

    #[test]
    fn test_diversity_pass_caps_one_group() {
        for seed in 0..50 {
            let small = select(
                &tee_heavy_closet(),
                3,
                &RecencyRecord::new(),
                &mut StdRng::seed_from_u64(seed),
            );
            assert_eq!(small.len(), 3, "seed {}", seed);
            assert_eq!(tops(&small), 2, "seed {}", seed);
            assert!(ids(&small).contains(&"jeans-1".to_string()));

            let large = select(
                &tee_heavy_closet(),
                4,
                &RecencyRecord::new(),
                &mut StdRng::seed_from_u64(seed),
            );
            assert_eq!(large.len(), 4, "seed {}", seed);
            assert_eq!(tops(&large), 3, "seed {}", seed);
        }
    }

    #[test]
    fn test_final_pass_may_exceed_group_cap() {
        let mut rng = StdRng::seed_from_u64(5);
        let selected = select(&tee_heavy_closet(), 6, &RecencyRecord::new(), &mut rng);

        assert_eq!(selected.len(), 6);
        assert_eq!(tops(&selected), 5);
        assert!(tops(&selected) > per_category_cap(6));
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let first = select(&closet(), 4, &RecencyRecord::new(), &mut StdRng::seed_from_u64(3));
        let second = select(&closet(), 4, &RecencyRecord::new(), &mut StdRng::seed_from_u64(3));
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_recent_items_are_skipped() {
        let mut recent = RecencyRecord::new();
        recent.insert("tee-1", Utc::now());
        recent.insert("jeans-1", Utc::now());

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select(&closet(), 4, &recent, &mut rng);
            assert_eq!(selected.len(), 4);
            assert!(!ids(&selected).contains(&"tee-1".to_string()));
            assert!(!ids(&selected).contains(&"jeans-1".to_string()));
        }
    }

    #[test]
    fn test_recent_items_fill_in_when_exhausted() {
        let candidates = vec![
            candidate("tee-1", "T-shirt", 5.0),
            candidate("jeans-1", "Jeans", 4.0),
            candidate("dress-1", "Dress", 3.0),
        ];
        let mut recent = RecencyRecord::new();
        recent.insert("tee-1", Utc::now());
        recent.insert("jeans-1", Utc::now());

        let mut rng = StdRng::seed_from_u64(1);
        let selected = select(&candidates, 3, &recent, &mut rng);
        assert_eq!(ids(&selected)[0], "dress-1");
        assert_eq!(ids(&selected)[1..], ["tee-1".to_string(), "jeans-1".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_in_inventory_are_selected_once() {
        let candidates = vec![
            candidate("same", "T-shirt", 5.0),
            candidate("same", "T-shirt", 5.0),
            candidate("jeans-1", "Jeans", 4.0),
        ];
        let mut rng = StdRng::seed_from_u64(9);
        let selected = select(&candidates, 3, &RecencyRecord::new(), &mut rng);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(confidence(&[]), 0.0);

        let mut matched = candidate("tee-1", "T-shirt", 5.0);
        matched.matches = MatchFlags {
            preferred_color: true,
            preferred_category: true,
            preferred_brand: true,
            weather_aligned: true,
        };
        assert_eq!(confidence(&[matched.clone(), matched]), MAX_CONFIDENCE);

        let plain = candidate("jeans-1", "Jeans", 4.0);
        assert!((confidence(&[plain]) - CONFIDENCE_BASE).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_weather_fraction() {
        let mut aligned = candidate("tee-1", "T-shirt", 6.0);
        aligned.matches.weather_aligned = true;
        let plain = candidate("jeans-1", "Jeans", 1.0);
        let value = confidence(&[aligned, plain]);
        assert!((value - (CONFIDENCE_BASE + WEATHER_WEIGHT * 0.5)).abs() < 1e-9);
        assert!(value > 0.35);
    }

    #[tokio::test]
    async fn test_remember_records_into_store() {
        use crate::services::recency::{InMemoryRecencyStore, RecencyPolicy};

        let store = InMemoryRecencyStore::new(RecencyPolicy::default());
        remember(&store, &["tee-1".to_string()], Utc::now()).await.unwrap();
        assert!(store.load().await.unwrap().contains("tee-1"));
    }
}
