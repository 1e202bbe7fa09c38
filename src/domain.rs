use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};

use crate::error::Error;
use crate::poisson;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }

    /// Home count less away count.
    pub fn margin(&self) -> i16 {
        self.home as i16 - self.away as i16
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// An expected count of goals or corners for one side in one match.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rate(f64);
impl Rate {
    pub fn new(value: f64) -> Result<Self, Error> {
        poisson::validate_rate(value)?;
        Ok(Self(value))
    }

    /// Raises `value` to at least `floor` before validating it. Upstream estimators use this to
    /// keep degenerate zero-rate distributions out of the model.
    pub fn clamped(value: f64, floor: f64) -> Result<Self, Error> {
        if value.is_nan() {
            return Err(Error::invalid_argument("rate is NaN"));
        }
        Self::new(f64::max(value, floor))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rate {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rate> for f64 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// A threshold against which a score grid is partitioned: a totals line such as 2.5, or a
/// handicap such as -1.5 or -1.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Line(f64);
impl Line {
    pub fn new(value: f64) -> Result<Self, Error> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(Error::invalid_argument(format!("line {value} is not finite")))
        }
    }

    /// A line for totals, which cannot be negative.
    pub fn total(value: f64) -> Result<Self, Error> {
        let line = Self::new(value)?;
        if value < 0.0 {
            return Err(Error::invalid_argument(format!("totals line {value} is negative")));
        }
        Ok(line)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Integer lines admit a push; fractional lines do not.
    pub fn is_integer(&self) -> bool {
        self.0.fract() == 0.0
    }

    pub fn negate(&self) -> Self {
        Self(-self.0)
    }
}

impl TryFrom<f64> for Line {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Line> for f64 {
    fn from(line: Line) -> Self {
        line.0
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 > 0.0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, EnumCount, EnumIter, Display,
    Serialize, Deserialize,
)]
pub enum MarketType {
    #[serde(rename = "h2h")]
    #[strum(serialize = "h2h")]
    HeadToHead,

    #[serde(rename = "totals")]
    #[strum(serialize = "totals")]
    Totals,

    #[serde(rename = "spreads")]
    #[strum(serialize = "spreads")]
    Spreads,
}

/// Decimal prices offered for one market of one fixture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "market")]
pub enum MarketQuote {
    #[serde(rename = "h2h")]
    HeadToHead { home: f64, draw: f64, away: f64 },

    /// Over/under the `line`.
    #[serde(rename = "totals")]
    Totals { line: Line, over: f64, under: f64 },

    /// Home and away prices with `line` applied to the home side.
    #[serde(rename = "spreads")]
    Spreads { line: Line, home: f64, away: f64 },
}
impl MarketQuote {
    pub fn market_type(&self) -> MarketType {
        match self {
            MarketQuote::HeadToHead { .. } => MarketType::HeadToHead,
            MarketQuote::Totals { .. } => MarketType::Totals,
            MarketQuote::Spreads { .. } => MarketType::Spreads,
        }
    }

    pub fn prices(&self) -> Vec<f64> {
        match self {
            MarketQuote::HeadToHead { home, draw, away } => vec![*home, *draw, *away],
            MarketQuote::Totals { over, under, .. } => vec![*over, *under],
            MarketQuote::Spreads { home, away, .. } => vec![*home, *away],
        }
    }

    pub fn line(&self) -> Option<Line> {
        match self {
            MarketQuote::HeadToHead { .. } => None,
            MarketQuote::Totals { line, .. } | MarketQuote::Spreads { line, .. } => Some(*line),
        }
    }
}
