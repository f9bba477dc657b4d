use std::fmt::Debug;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const INTERESTS: [&str; 11] = [
    "cars", "pets", "travel", "hi-tech", "sport", "music", "books", "tv", "cinema", "geek", "otus",
];

pub const INTERESTS_PER_CLIENT: usize = 2;

/// Backing store handed to the scoring functions. The dispatcher never
/// looks inside it.
pub trait Store: Send + Sync + Debug {}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoStore;

impl Store for NoStore {}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub phone: Option<i64>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub fn get_score(_store: &dyn Store, input: &ScoreInput) -> f64 {
    let has_text = |s: &Option<String>| s.as_deref().map_or(false, |s| !s.is_empty());

    let mut score = 0.0;
    if input.phone.is_some() {
        debug!("phone adds 1.5");
        score += 1.5;
    }
    if has_text(&input.email) {
        debug!("email adds 1.5");
        score += 1.5;
    }
    if input.birthday.is_some() && input.gender.is_some() {
        debug!("birthday and gender add 1.5");
        score += 1.5;
    }
    if has_text(&input.first_name) && has_text(&input.last_name) {
        debug!("full name adds 0.5");
        score += 0.5;
    }
    score
}

pub fn get_interests(_store: &dyn Store, _client_id: i64) -> Vec<String> {
    INTERESTS
        .choose_multiple(&mut rand::thread_rng(), INTERESTS_PER_CLIENT)
        .map(|s| s.to_string())
        .collect()
}

/// What the method handlers call to compute results.
pub trait Scoring: Send + Sync {
    fn score(&self, input: &ScoreInput) -> anyhow::Result<f64>;
    fn interests(&self, client_id: i64) -> anyhow::Result<Vec<String>>;
}

#[derive(Debug, Default)]
pub struct StoreScoring<S> {
    store: S,
}

impl<S: Store> StoreScoring<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: Store> Scoring for StoreScoring<S> {
    fn score(&self, input: &ScoreInput) -> anyhow::Result<f64> {
        Ok(get_score(&self.store, input))
    }

    fn interests(&self, client_id: i64) -> anyhow::Result<Vec<String>> {
        Ok(get_interests(&self.store, client_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_sums_independent_parts() {
        let full = ScoreInput {
            phone: Some(79175002040),
            email: Some("stupnikov@otus.ru".into()),
            birthday: NaiveDate::from_ymd_opt(2000, 1, 1),
            gender: Some(1),
            first_name: Some("a".into()),
            last_name: Some("b".into()),
        };
        assert_eq!(get_score(&NoStore, &full), 5.0);

        let phone_only = ScoreInput { phone: Some(79175002040), ..Default::default() };
        assert_eq!(get_score(&NoStore, &phone_only), 1.5);

        let half_name = ScoreInput { first_name: Some("a".into()), ..Default::default() };
        assert_eq!(get_score(&NoStore, &half_name), 0.0);
    }

    #[test]
    fn interests_are_two_distinct_known_entries() {
        for id in 0..20 {
            let picked = get_interests(&NoStore, id);
            assert_eq!(picked.len(), INTERESTS_PER_CLIENT);
            assert_ne!(picked[0], picked[1]);
            assert!(picked.iter().all(|i| INTERESTS.contains(&i.as_str())));
        }
    }

    #[test]
    fn store_scoring_delegates() {
        let scoring = StoreScoring::new(NoStore);
        let input = ScoreInput { email: Some("a@b.cd".into()), ..Default::default() };
        assert_eq!(scoring.score(&input).unwrap(), 1.5);
        assert_eq!(scoring.interests(1).unwrap().len(), 2);
    }
}
