//! Bookmaker prices, their implied probabilities with the overround removed, and comparison
//! against the probabilities of a [Scoregrid].

use serde::Serialize;
use strum_macros::{Display, EnumCount, EnumIter};
use tracing::debug;

use crate::domain::{Line, MarketQuote, MarketType};
use crate::error::Error;
use crate::probs::SliceExt;
use crate::scoregrid::Scoregrid;

/// Smallest difference between the model and the de-vigged market that counts as an edge.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 0.10;

/// The probability implied by a decimal `price`. An infinite price implies zero probability.
pub fn implied_probability(price: f64) -> Result<f64, Error> {
    if price.is_nan() || price <= 0.0 {
        return Err(Error::invalid_argument(format!("price {price} is not positive")));
    }
    Ok(1.0 / price)
}

/// Scales implied probabilities so that they add up to exactly one.
pub fn devig(implied: &[f64]) -> Result<Vec<f64>, Error> {
    if let Some(prob) = implied.iter().find(|prob| prob.is_nan() || **prob < 0.0) {
        return Err(Error::invalid_argument(format!(
            "implied probability {prob} is negative or NaN"
        )));
    }
    let mut probs = implied.to_vec();
    let booksum = probs.sum();
    if booksum == 0.0 || !booksum.is_finite() {
        return Err(Error::invalid_state(format!("cannot de-vig a booksum of {booksum}")));
    }
    probs.scale(1.0 / booksum);
    Ok(probs)
}

/// The model's fair decimal price for an outcome of probability `prob`.
pub fn fair_price(prob: f64) -> f64 {
    1.0 / prob
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overround {
    pub value: f64,
}
impl Overround {
    /// The bookmaker's margin, e.g., `0.05` for a booksum of 1.05.
    pub fn margin(&self) -> f64 {
        self.value - 1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub probs: Vec<f64>,
    pub prices: Vec<f64>,
    pub overround: Overround,
}
impl Market {
    /// Derives fair probabilities from `prices`, assuming the margin was applied
    /// multiplicatively.
    pub fn fit(prices: Vec<f64>) -> Result<Self, Error> {
        let implied = prices
            .iter()
            .map(|&price| implied_probability(price))
            .collect::<Result<Vec<_>, _>>()?;
        let probs = devig(&implied)?;
        let overround = Overround {
            value: implied.sum(),
        };
        Ok(Self {
            probs,
            prices,
            overround,
        })
    }
}

#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumCount, EnumIter, Display, Serialize,
)]
pub enum Verdict {
    ModelFavors,
    BookmakerFavors,
    NoEdge,
}

/// Classifies the signed difference `model - devigged` against `threshold`; the difference
/// must strictly exceed the threshold in magnitude to count.
pub fn compare(model: f64, devigged: f64, threshold: f64) -> Verdict {
    let edge = model - devigged;
    if edge > threshold {
        Verdict::ModelFavors
    } else if edge < -threshold {
        Verdict::BookmakerFavors
    } else {
        Verdict::NoEdge
    }
}

#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumCount, EnumIter, Display, Serialize,
)]
pub enum QuoteOutcome {
    Home,
    Draw,
    Away,
    Over,
    Under,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub market_type: MarketType,
    pub outcome: QuoteOutcome,
    pub line: Option<Line>,
    pub price: f64,
    pub model_prob: f64,
    pub devigged_prob: f64,
    pub verdict: Verdict,
}
impl Comparison {
    pub fn edge(&self) -> f64 {
        self.model_prob - self.devigged_prob
    }
}

/// Compares every outcome of `quote` against the probabilities in `scoregrid`.
///
/// Integer totals and spreads lines are priced by bookmakers with the stake returned on a
/// push, so the model's push mass is excluded and the remaining two outcomes rescaled before
/// comparison.
pub fn compare_quote(
    scoregrid: &Scoregrid,
    quote: &MarketQuote,
    threshold: f64,
) -> Result<Vec<Comparison>, Error> {
    let (outcomes, model_probs) = match quote {
        MarketQuote::HeadToHead { .. } => {
            let outcome = scoregrid.match_outcome();
            (
                vec![QuoteOutcome::Home, QuoteOutcome::Draw, QuoteOutcome::Away],
                vec![outcome.home, outcome.draw, outcome.away],
            )
        }
        MarketQuote::Totals { line, .. } => {
            let split = scoregrid.asian_total(line.value())?;
            (
                vec![QuoteOutcome::Over, QuoteOutcome::Under],
                exclude_push(split.over, split.push, split.under)?,
            )
        }
        MarketQuote::Spreads { line, .. } => {
            let split = scoregrid.handicap_cover(line.value())?;
            (
                vec![QuoteOutcome::Home, QuoteOutcome::Away],
                exclude_push(split.home, split.push, split.away)?,
            )
        }
    };

    let market = Market::fit(quote.prices())?;
    debug!(
        "{} quote {:?} has a margin of {:.3}",
        quote.market_type(),
        market.prices,
        market.overround.margin()
    );
    Ok(outcomes
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| Comparison {
            market_type: quote.market_type(),
            outcome,
            line: quote.line(),
            price: market.prices[index],
            model_prob: model_probs[index],
            devigged_prob: market.probs[index],
            verdict: compare(model_probs[index], market.probs[index], threshold),
        })
        .collect())
}

fn exclude_push(first: f64, push: f64, second: f64) -> Result<Vec<f64>, Error> {
    let mut probs = vec![first, second];
    if push > 0.0 {
        if probs.sum() <= 0.0 {
            return Err(Error::invalid_state("no mass remains once the push is excluded"));
        }
        probs.normalise(1.0);
    }
    Ok(probs)
}
