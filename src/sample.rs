//! Random selection among the most likely scorelines. Kept apart from [crate::scoregrid],
//! which is deterministic; the caller owns and seeds the generator.

use tinyrand::Rand;

use crate::domain::Score;
use crate::error::Error;
use crate::scoregrid::ProbableScore;

/// Picks one of `outcomes` with probability proportional to its mass.
pub fn pick(outcomes: &[ProbableScore], rand: &mut impl Rand) -> Result<Score, Error> {
    let total = outcomes
        .iter()
        .map(|outcome| outcome.probability)
        .sum::<f64>();
    if !total.is_finite() || total <= 0.0 {
        return Err(Error::invalid_argument(format!(
            "cannot sample from outcomes of total mass {total}"
        )));
    }

    let random = random_f64(rand) * total;
    let mut cumulative = 0.0;
    let mut last = outcomes[0].score;
    for outcome in outcomes {
        if outcome.probability > 0.0 {
            cumulative += outcome.probability;
            last = outcome.score;
            if cumulative >= random {
                return Ok(outcome.score);
            }
        }
    }
    Ok(last)
}

#[inline]
fn random_f64(rand: &mut impl Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}
