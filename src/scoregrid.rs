//! Bounded joint distributions over final scores, and the markets derived from them.
//!
//! A [Scoregrid] holds the probability of every `(home, away)` score in `0..=max_count` on both
//! axes. Scores beyond `max_count` are not represented, so the grid's [mass](Scoregrid::mass)
//! falls short of one by the truncated tail. Aggregations that need a residual bucket put the
//! truncated tail there: the draw in [match_outcome](Scoregrid::match_outcome), the under in
//! [over_under](Scoregrid::over_under) and the away side in
//! [handicap_cover](Scoregrid::handicap_cover). Every aggregate carries the grid mass it was
//! computed against.

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::{Line, Score};
use crate::error::Error;
use crate::factorial::Lookup;
use crate::linear::Matrix;
use crate::poisson;
use crate::probs::SliceExt;

/// The largest supported `max_count`.
pub const MAX_COUNT: u8 = 30;

pub const DEFAULT_MAX_COUNT: u8 = 10;

const MASS_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbableScore {
    pub score: Score,
    pub probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub home: f64,
    /// Residual of the home and away masses; absorbs the truncated tail.
    pub draw: f64,
    pub away: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverUnder {
    pub line: Line,
    pub over: f64,
    /// Residual of the over; an integer line's exact total lands here.
    pub under: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsianTotal {
    pub line: Line,
    pub over: f64,
    pub push: f64,
    pub under: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandicapSplit {
    /// Goals added to the home side's count.
    pub handicap: Line,
    pub home: f64,
    pub push: f64,
    pub away: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scoregrid {
    grid: Matrix<f64>,
}
impl Scoregrid {
    /// Builds a grid from two independent Poisson processes, one per side.
    pub fn from_univariate_poisson(
        home_rate: f64,
        away_rate: f64,
        max_count: u8,
    ) -> Result<Self, Error> {
        validate_max_count(max_count)?;
        poisson::validate_rate(home_rate)?;
        poisson::validate_rate(away_rate)?;

        let factorial = Lookup::default();
        let home_probs = (0..=max_count)
            .map(|count| poisson::univariate(count, home_rate, &factorial))
            .collect::<Vec<_>>();
        let away_probs = (0..=max_count)
            .map(|count| poisson::univariate(count, away_rate, &factorial))
            .collect::<Vec<_>>();

        let size = max_count as usize + 1;
        let mut grid = Matrix::allocate(size, size);
        for (home_goals, home_prob) in home_probs.iter().enumerate() {
            for (away_goals, away_prob) in away_probs.iter().enumerate() {
                grid[(home_goals, away_goals)] = home_prob * away_prob;
            }
        }

        let scoregrid = Self { grid };
        debug!(
            "built {size}x{size} scoregrid from rates {home_rate:.3}:{away_rate:.3}, mass={:.6}",
            scoregrid.mass()
        );
        Ok(scoregrid)
    }

    /// Adopts a grid computed elsewhere, checking that it is a square, non-empty table of
    /// non-negative masses adding up to no more than one.
    pub fn from_matrix(grid: Matrix<f64>) -> Result<Self, Error> {
        if grid.is_empty() {
            return Err(Error::invalid_state("scoregrid is empty"));
        }
        if grid.rows() != grid.cols() {
            return Err(Error::invalid_state(format!(
                "scoregrid is not square: {}x{}",
                grid.rows(),
                grid.cols()
            )));
        }
        if grid.rows() > MAX_COUNT as usize + 1 {
            return Err(Error::invalid_state(format!(
                "scoregrid has {} rows, exceeding {}",
                grid.rows(),
                MAX_COUNT as usize + 1
            )));
        }
        if let Some(((home, away), prob)) = grid
            .cells()
            .find(|(_, prob)| !prob.is_finite() || **prob < 0.0)
        {
            return Err(Error::invalid_state(format!(
                "scoregrid holds an invalid mass {prob} at {home}-{away}"
            )));
        }
        let mass = grid.flatten().sum();
        if mass <= 0.0 || mass > 1.0 + MASS_TOLERANCE {
            return Err(Error::invalid_state(format!(
                "scoregrid mass {mass} is outside (0, 1]"
            )));
        }
        Ok(Self { grid })
    }

    pub fn max_count(&self) -> u8 {
        (self.grid.rows() - 1) as u8
    }

    pub fn matrix(&self) -> &Matrix<f64> {
        &self.grid
    }

    /// The probability of an exact score; zero if the score lies beyond the grid.
    pub fn get(&self, score: &Score) -> f64 {
        let (home, away) = (score.home as usize, score.away as usize);
        if home < self.grid.rows() && away < self.grid.cols() {
            self.grid[(home, away)]
        } else {
            0.0
        }
    }

    /// Sum of all masses in the grid.
    pub fn mass(&self) -> f64 {
        self.grid.flatten().sum()
    }

    /// Probability lost to scores beyond `max_count`.
    pub fn truncation_mass(&self) -> f64 {
        f64::max(0.0, 1.0 - self.mass())
    }

    /// Expected home and away counts within the grid.
    pub fn expectations(&self) -> (f64, f64) {
        let (mut home_expectation, mut away_expectation) = (0.0, 0.0);
        for ((home_goals, away_goals), prob) in self.grid.cells() {
            home_expectation += home_goals as f64 * prob;
            away_expectation += away_goals as f64 * prob;
        }
        (home_expectation, away_expectation)
    }

    /// The `n` most probable scores. Equal probabilities are ordered by the lower total,
    /// then by the lower home count. Returns fewer than `n` if the grid is smaller.
    pub fn top_outcomes(&self, n: usize) -> Result<Vec<ProbableScore>, Error> {
        if n == 0 {
            return Err(Error::invalid_argument("must request at least one outcome"));
        }
        let mut outcomes = self
            .grid
            .cells()
            .map(|((home, away), &probability)| ProbableScore {
                score: Score::new(home as u8, away as u8),
                probability,
            })
            .collect::<Vec<_>>();
        outcomes.sort_by(rank_outcomes);
        outcomes.truncate(n);
        Ok(outcomes)
    }

    /// Splits the grid into totals over and under `line`.
    pub fn over_under(&self, line: f64) -> Result<OverUnder, Error> {
        let line = Line::total(line)?;
        let over = self.gather(|score| score.total() as f64 > line.value());
        Ok(OverUnder {
            line,
            over,
            under: 1.0 - over,
            mass: self.mass(),
        })
    }

    /// Splits the grid three ways around `line`, with the exact total on an integer line
    /// forming a push.
    pub fn asian_total(&self, line: f64) -> Result<AsianTotal, Error> {
        let line = Line::total(line)?;
        let over = self.gather(|score| score.total() as f64 > line.value());
        let push = if line.is_integer() {
            self.gather(|score| score.total() as f64 == line.value())
        } else {
            0.0
        };
        Ok(AsianTotal {
            line,
            over,
            push,
            under: 1.0 - over - push,
            mass: self.mass(),
        })
    }

    /// Home win, draw and away win masses, with the draw taken as the residual.
    pub fn match_outcome(&self) -> MatchOutcome {
        let home = self.gather(|score| score.home > score.away);
        let away = self.gather(|score| score.home < score.away);
        MatchOutcome {
            home,
            draw: 1.0 - home - away,
            away,
            mass: self.mass(),
        }
    }

    /// Splits the grid by whether the home side covers `handicap`, i.e., wins once `handicap`
    /// is added to its count. Only integer handicaps admit a push.
    pub fn handicap_cover(&self, handicap: f64) -> Result<HandicapSplit, Error> {
        let handicap = Line::new(handicap)?;
        let threshold = handicap.negate().value();
        let home = self.gather(|score| score.margin() as f64 > threshold);
        let push = if handicap.is_integer() {
            self.gather(|score| score.margin() as f64 == threshold)
        } else {
            0.0
        };
        Ok(HandicapSplit {
            handicap,
            home,
            push,
            away: 1.0 - home - push,
            mass: self.mass(),
        })
    }

    fn gather(&self, mut filter: impl FnMut(&Score) -> bool) -> f64 {
        let mut prob = 0.0;
        for ((home, away), &cell_prob) in self.grid.cells() {
            if filter(&Score::new(home as u8, away as u8)) {
                prob += cell_prob;
            }
        }
        prob
    }
}

fn validate_max_count(max_count: u8) -> Result<(), Error> {
    if max_count == 0 {
        return Err(Error::invalid_argument("max count must be at least 1"));
    }
    if max_count > MAX_COUNT {
        return Err(Error::numeric_overflow(format!(
            "max count {max_count} exceeds {MAX_COUNT}"
        )));
    }
    Ok(())
}

fn rank_outcomes(a: &ProbableScore, b: &ProbableScore) -> Ordering {
    b.probability
        .total_cmp(&a.probability)
        .then_with(|| a.score.total().cmp(&b.score.total()))
        .then_with(|| a.score.home.cmp(&b.score.home))
}

#[cfg(test)]
mod tests;
