//! Per-fixture predictions: rates from history, a score grid, its aggregates and any
//! comparisons against quoted markets.

use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

use anyhow::anyhow;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Line, MarketQuote, MarketType, Rate};
use crate::error::Error;
use crate::estimate::{estimate_rate, Fallbacks, Measure, RateEstimator, RateSource, RecentForm};
use crate::fixture::{Fixture, Slate};
use crate::market::{compare_quote, Comparison, DEFAULT_EDGE_THRESHOLD};
use crate::scoregrid::{
    HandicapSplit, MatchOutcome, OverUnder, ProbableScore, Scoregrid, DEFAULT_MAX_COUNT, MAX_COUNT,
};

pub const DEFAULT_HANDICAP: f64 = -0.5;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(#[from] anyhow::Error);

#[derive(Debug, Clone)]
pub struct Config {
    pub max_count: u8,
    pub top: usize,
    pub threshold: f64,
    pub default_handicap: f64,
    pub fallbacks: Fallbacks,
}
impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        const MAX_COUNT_RANGE: RangeInclusive<u8> = 1..=MAX_COUNT;
        const THRESHOLD_RANGE: RangeInclusive<f64> = 0.0..=1.0;
        if !MAX_COUNT_RANGE.contains(&self.max_count) {
            return Err(anyhow!(
                "max count ({}) outside of allowable range ({MAX_COUNT_RANGE:?})",
                self.max_count
            )
            .into());
        }
        if self.top == 0 {
            return Err(anyhow!("at least one top outcome must be requested").into());
        }
        if !THRESHOLD_RANGE.contains(&self.threshold) {
            return Err(anyhow!(
                "edge threshold ({}) outside of allowable range ({THRESHOLD_RANGE:?})",
                self.threshold
            )
            .into());
        }
        if !self.default_handicap.is_finite() {
            return Err(anyhow!("default handicap must be finite").into());
        }
        Line::total(self.fallbacks.goals_line)
            .map_err(|err| anyhow!("goals line: {err}"))?;
        Line::total(self.fallbacks.corners_line)
            .map_err(|err| anyhow!("corners line: {err}"))?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            top: 3,
            threshold: DEFAULT_EDGE_THRESHOLD,
            default_handicap: DEFAULT_HANDICAP,
            fallbacks: Fallbacks::default(),
        }
    }
}

/// Whether a line was taken from a quoted market or assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LineSource {
    Market,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TotalsPick {
    Over(Line),
    Under(Line),
}

impl Display for TotalsPick {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalsPick::Over(line) => write!(f, "over {}", line.value()),
            TotalsPick::Under(line) => write!(f, "under {}", line.value()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandicapPick {
    Home(Line),
    Away(Line),
    Avoid,
}

impl Display for HandicapPick {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HandicapPick::Home(line) => write!(f, "home {line}"),
            HandicapPick::Away(line) => write!(f, "away {line}"),
            HandicapPick::Avoid => write!(f, "avoid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub home_rate: Rate,
    pub home_rate_source: RateSource,
    pub away_rate: Rate,
    pub away_rate_source: RateSource,
    pub top: Vec<ProbableScore>,
    pub match_outcome: MatchOutcome,
    pub totals: OverUnder,
    pub totals_source: LineSource,
    pub handicap: HandicapSplit,
    pub handicap_source: LineSource,
    pub comparisons: Vec<Comparison>,

    /// Quotes that could not be compared, with the reason. The rest of the report stands.
    pub rejected: Vec<(MarketType, Error)>,
}
impl Report {
    pub fn totals_pick(&self) -> TotalsPick {
        if self.totals.over > self.totals.under {
            TotalsPick::Over(self.totals.line)
        } else {
            TotalsPick::Under(self.totals.line)
        }
    }

    /// The side more likely to cover, quoting the away side's line from its own perspective.
    /// Evenly matched teams are avoided.
    pub fn handicap_pick(&self) -> HandicapPick {
        let split = &self.handicap;
        if self.home_rate == self.away_rate {
            HandicapPick::Avoid
        } else if split.home > split.away {
            HandicapPick::Home(split.handicap)
        } else {
            HandicapPick::Away(split.handicap.negate())
        }
    }
}

pub struct Predictor<E> {
    config: Config,
    estimator: E,
}
impl<E: RateEstimator> Predictor<E> {
    pub fn new(config: Config, estimator: E) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    pub fn predict(&self, fixture: &Fixture, measure: Measure) -> Result<Report, Error> {
        let fallbacks = &self.config.fallbacks;
        let (home_rate, home_rate_source) =
            estimate_rate(&self.estimator, &fixture.home_history, measure, fallbacks)?;
        let (away_rate, away_rate_source) =
            estimate_rate(&self.estimator, &fixture.away_history, measure, fallbacks)?;
        debug!(
            "{}: rates {home_rate}:{away_rate} ({home_rate_source:?}:{away_rate_source:?})",
            fixture.title()
        );

        let scoregrid = Scoregrid::from_univariate_poisson(
            home_rate.value(),
            away_rate.value(),
            self.config.max_count,
        )?;

        let mut comparisons = vec![];
        let mut rejected = vec![];
        for market_type in MarketType::iter() {
            if let Some(quote) = fixture.quote(market_type) {
                match compare_quote(&scoregrid, quote, self.config.threshold) {
                    Ok(quote_comparisons) => comparisons.extend(quote_comparisons),
                    Err(err) => {
                        warn!("{}: rejected {market_type} quote: {err}", fixture.title());
                        rejected.push((market_type, err));
                    }
                }
            }
        }

        let market_line = |market_type: MarketType| {
            let is_rejected = rejected
                .iter()
                .any(|(rejected, _)| *rejected == market_type);
            fixture
                .quote(market_type)
                .and_then(MarketQuote::line)
                .filter(|_| !is_rejected)
        };
        let (totals_line, totals_source) = match market_line(MarketType::Totals) {
            Some(line) => (line.value(), LineSource::Market),
            None => (fallbacks.line(measure), LineSource::Default),
        };
        let (handicap_line, handicap_source) = match market_line(MarketType::Spreads) {
            Some(line) => (line.value(), LineSource::Market),
            None => (self.config.default_handicap, LineSource::Default),
        };

        Ok(Report {
            home_rate,
            home_rate_source,
            away_rate,
            away_rate_source,
            top: scoregrid.top_outcomes(self.config.top)?,
            match_outcome: scoregrid.match_outcome(),
            totals: scoregrid.over_under(totals_line)?,
            totals_source,
            handicap: scoregrid.handicap_cover(handicap_line)?,
            handicap_source,
            comparisons,
            rejected,
        })
    }

    /// Predicts every fixture in `slate` independently. A failed fixture is reported in place
    /// and does not affect the others.
    pub fn predict_slate<'a>(&self, slate: &'a Slate) -> Vec<(&'a Fixture, Result<Report, Error>)> {
        slate
            .fixtures()
            .iter()
            .map(|fixture| {
                let result = self.predict(fixture, slate.measure);
                match &result {
                    Ok(report) => info!(
                        "{} ({}): {} comparisons",
                        fixture.title(),
                        fixture.kickoff,
                        report.comparisons.len()
                    ),
                    Err(err) => warn!("{} ({}): {err}", fixture.title(), fixture.kickoff),
                }
                (fixture, result)
            })
            .collect()
    }
}

impl TryFrom<Config> for Predictor<RecentForm> {
    type Error = ValidationError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        Self::new(config, RecentForm::default())
    }
}
