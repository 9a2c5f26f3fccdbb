use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult};

/// Star rating scale.
///
/// Variants are declared in ascending order, so the derived `Ord` and
/// [`Rating::ordinal`] agree: `Null < OneStar < ... < FiveStar`.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    /// Unrated.
    #[default]
    Null,
    OneStar,
    TwoStar,
    ThreeStar,
    FourStar,
    FiveStar,
}

impl Rating {
    /// Every value of the scale, `Null` first.
    pub const ALL: [Rating; 6] = [
        Rating::Null,
        Rating::OneStar,
        Rating::TwoStar,
        Rating::ThreeStar,
        Rating::FourStar,
        Rating::FiveStar,
    ];

    /// Number of non-`Null` values.
    pub const MAX_STARS: usize = Self::ALL.len() - 1;

    /// Position on the scale (`Null` is 0).
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Display glyph.
    pub fn stars(self) -> &'static str {
        match self {
            Rating::Null => "NO STAR ASSIGNED",
            Rating::OneStar => "\u{2605}\u{2606}\u{2606}\u{2606}\u{2606}",
            Rating::TwoStar => "\u{2605}\u{2605}\u{2606}\u{2606}\u{2606}",
            Rating::ThreeStar => "\u{2605}\u{2605}\u{2605}\u{2606}\u{2606}",
            Rating::FourStar => "\u{2605}\u{2605}\u{2605}\u{2605}\u{2606}",
            Rating::FiveStar => "\u{2605}\u{2605}\u{2605}\u{2605}\u{2605}",
        }
    }

    /// Convert a 1-based star count into the matching non-`Null` rating.
    ///
    /// Counts outside `1..=MAX_STARS` are rejected rather than clamped.
    pub fn from_star_count(stars: i32) -> DomainResult<Rating> {
        usize::try_from(stars)
            .ok()
            .filter(|n| (1..=Self::MAX_STARS).contains(n))
            .map(|n| Self::ALL[n])
            .ok_or_else(|| DomainError::invalid_rating(stars, Self::MAX_STARS))
    }

    /// Arithmetic mean of the ordinals, rounded half-up to an integer.
    ///
    /// An empty input yields 0.
    pub fn rounded_mean_ordinal<I>(ratings: I) -> i32
    where
        I: IntoIterator<Item = Rating>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r.ordinal()), count + 1));
        if count == 0 {
            return 0;
        }
        // floor(sum / count + 1/2) on non-negative integers.
        ((2 * sum + count) / (2 * count)) as i32
    }
}

impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.stars())
    }
}

/// Something that carries a [`Rating`] derived from its reviews.
pub trait Rateable {
    fn rating(&self) -> Rating;

    /// Overwrite the current rating.
    fn apply_rating(&mut self, rating: Rating);

    /// Overwrite the current rating from a 1-based star count.
    fn apply_stars(&mut self, stars: i32) -> DomainResult<Rating> {
        let rating = Rating::from_star_count(stars)?;
        self.apply_rating(rating);
        Ok(rating)
    }

    /// Recompute the rating as the rounded mean of `ratings`.
    ///
    /// A mean that rounds to zero (no reviews, or only unrated ones) resets
    /// the rating to `Null`.
    fn apply_mean<I>(&mut self, ratings: I) -> DomainResult<Rating>
    where
        I: IntoIterator<Item = Rating>,
        Self: Sized,
    {
        match Rating::rounded_mean_ordinal(ratings) {
            0 => {
                self.apply_rating(Rating::Null);
                Ok(Rating::Null)
            }
            stars => self.apply_stars(stars),
        }
    }
}
