use super::destination::Destination;
use super::seasonal::seasonal_boost;
use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_FEATURED_LIMIT: usize = 6;

/// Ranking score for the picks surface: base rating plus the seasonal boost.
pub fn featured_score(destination: &Destination, today: NaiveDate) -> f64 {
    let boost = seasonal_boost(destination.season_tags.as_slice(), today);
    destination.rating_or_zero() + f64::from(boost)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPick {
    #[serde(flatten)]
    pub destination: Destination,
    pub score: f64,
}

/// Rank the whole candidate set by [`featured_score`] and keep the top `limit`.
/// Equal scores keep their input order.
pub fn pick_featured_scored(
    destinations: &[Destination],
    today: NaiveDate,
    limit: usize,
) -> Vec<ScoredPick> {
    let mut scored: Vec<ScoredPick> = destinations
        .iter()
        .map(|destination| ScoredPick {
            score: featured_score(destination, today),
            destination: destination.clone(),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

pub fn pick_featured(destinations: &[Destination], today: NaiveDate, limit: usize) -> Vec<Destination> {
    pick_featured_scored(destinations, today, limit)
        .into_iter()
        .map(|pick| pick.destination)
        .collect()
}
