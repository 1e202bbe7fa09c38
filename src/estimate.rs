//! Policies for turning a team's recorded history into a scoring [Rate].
//!
//! Estimators never see odds and never randomise. When an estimator has nothing to go on it
//! returns `None`, and the caller substitutes an explicit fallback from [Fallbacks].

use serde::{Deserialize, Serialize};

use crate::domain::Rate;
use crate::error::Error;
use crate::poisson::MIN_RATE;

/// Counts recorded for one team, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamHistory {
    /// Counts scored in recent matches.
    #[serde(default)]
    pub scored: Vec<f64>,

    /// Counts scored in recent head-to-head meetings with the upcoming opponent.
    #[serde(default)]
    pub h2h_scored: Vec<f64>,
}

pub trait RateEstimator {
    fn estimate(&self, history: &TeamHistory) -> Option<f64>;
}

/// The mean of up to `window` most recent counts.
#[derive(Debug, Clone)]
pub struct RecentForm {
    pub window: usize,
}

impl Default for RecentForm {
    fn default() -> Self {
        Self { window: 5 }
    }
}

impl RateEstimator for RecentForm {
    fn estimate(&self, history: &TeamHistory) -> Option<f64> {
        mean(&history.scored, self.window)
    }
}

/// A weighted blend of recent form and head-to-head form. Falls back to whichever of the two
/// is available when the other is not.
#[derive(Debug, Clone)]
pub struct Blended {
    pub window: usize,
    pub recent_weight: f64,
    pub h2h_weight: f64,
}
impl Blended {
    pub fn validate(&self) -> Result<(), Error> {
        for weight in [self.recent_weight, self.h2h_weight] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::invalid_argument(format!(
                    "blend weight {weight} must be finite and non-negative"
                )));
            }
        }
        if self.recent_weight + self.h2h_weight == 0.0 {
            return Err(Error::invalid_argument("blend weights cannot both be zero"));
        }
        Ok(())
    }
}

impl Default for Blended {
    fn default() -> Self {
        Self {
            window: 5,
            recent_weight: 0.7,
            h2h_weight: 0.3,
        }
    }
}

impl RateEstimator for Blended {
    fn estimate(&self, history: &TeamHistory) -> Option<f64> {
        let recent = mean(&history.scored, self.window);
        let h2h = mean(&history.h2h_scored, self.window);
        match (recent, h2h) {
            (Some(recent), Some(h2h)) => Some(
                (recent * self.recent_weight + h2h * self.h2h_weight)
                    / (self.recent_weight + self.h2h_weight),
            ),
            (recent, h2h) => recent.or(h2h),
        }
    }
}

/// What is being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Goals,
    Corners,
}

/// Rates and lines assumed when no data is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fallbacks {
    pub goals: f64,
    pub corners: f64,
    pub goals_line: f64,
    pub corners_line: f64,
}
impl Fallbacks {
    pub fn rate(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Goals => self.goals,
            Measure::Corners => self.corners,
        }
    }

    pub fn line(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Goals => self.goals_line,
            Measure::Corners => self.corners_line,
        }
    }
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            goals: 1.5,
            corners: 5.0,
            goals_line: 2.5,
            corners_line: 9.5,
        }
    }
}

/// Where an estimated rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    History,
    Fallback,
}

/// Estimates a rate for `history`, substituting the fallback for `measure` when the estimator
/// yields nothing, then clamps the result to [MIN_RATE].
pub fn estimate_rate(
    estimator: &impl RateEstimator,
    history: &TeamHistory,
    measure: Measure,
    fallbacks: &Fallbacks,
) -> Result<(Rate, RateSource), Error> {
    match estimator.estimate(history) {
        Some(value) => Ok((Rate::clamped(value, MIN_RATE)?, RateSource::History)),
        None => Ok((
            Rate::clamped(fallbacks.rate(measure), MIN_RATE)?,
            RateSource::Fallback,
        )),
    }
}

fn mean(values: &[f64], window: usize) -> Option<f64> {
    let recent = &values[..usize::min(window, values.len())];
    if recent.is_empty() {
        None
    } else {
        Some(recent.iter().sum::<f64>() / recent.len() as f64)
    }
}
