//! Upcoming fixtures as supplied by data collaborators.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::warn;

use crate::domain::{MarketQuote, MarketType};
use crate::estimate::{Measure, TeamHistory};
use crate::file;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
    pub kickoff: DateTime<Utc>,

    #[serde(default)]
    pub home_history: TeamHistory,

    #[serde(default)]
    pub away_history: TeamHistory,

    /// Quotes on hand for this fixture. Not every market is always offered.
    #[serde(default)]
    pub quotes: Vec<MarketQuote>,
}
impl Fixture {
    /// The quote for `market_type`. Where a fixture carries more than one, the first wins.
    pub fn quote(&self, market_type: MarketType) -> Option<&MarketQuote> {
        self.quotes
            .iter()
            .find(|quote| quote.market_type() == market_type)
    }

    pub fn title(&self) -> String {
        format!("{} vs {}", self.home, self.away)
    }

    /// Market types quoted more than once.
    pub fn duplicate_quotes(&self) -> Vec<MarketType> {
        MarketType::iter()
            .filter(|&market_type| {
                self.quotes
                    .iter()
                    .filter(|quote| quote.market_type() == market_type)
                    .count()
                    > 1
            })
            .collect()
    }
}

/// A set of fixtures, ordered by kickoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SlateFile")]
pub struct Slate {
    pub measure: Measure,
    fixtures: Vec<Fixture>,
}
impl Slate {
    pub fn new(measure: Measure, mut fixtures: Vec<Fixture>) -> Self {
        for fixture in &fixtures {
            for market_type in fixture.duplicate_quotes() {
                warn!("{}: ignoring all but the first {market_type} quote", fixture.title());
            }
        }
        fixtures.sort_by_key(|fixture| fixture.kickoff);
        Self { measure, fixtures }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        file::read_json(path)
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

#[derive(Deserialize)]
struct SlateFile {
    #[serde(default = "default_measure")]
    measure: Measure,
    fixtures: Vec<Fixture>,
}

fn default_measure() -> Measure {
    Measure::Goals
}

impl From<SlateFile> for Slate {
    fn from(file: SlateFile) -> Self {
        Slate::new(file.measure, file.fixtures)
    }
}
