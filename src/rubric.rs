use crate::models::{Level, Ratings, CRITERIA};

/// Sum of the five rating weights. Always in 5..=15.
pub fn total_score(ratings: &Ratings) -> u32 {
    CRITERIA.iter().map(|c| ratings.get(*c).weight()).sum()
}

/// Maps a total score to the estimated level.
///
/// Boundary totals 6, 10 and 12 belong to the lower band.
pub fn classify_level(total: u32) -> Level {
    match total {
        0..=6 => Level::A1,
        7..=10 => Level::A2,
        11..=12 => Level::B1,
        _ => Level::B2OrHigher,
    }
}
