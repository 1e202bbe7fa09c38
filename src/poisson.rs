use crate::error::Error;
use crate::factorial::Factorial;

/// Conventional floor for a rate supplied by upstream estimators.
pub const MIN_RATE: f64 = 0.05;

/// Rates above this ceiling are refused rather than computed.
pub const MAX_RATE: f64 = 15.0;

/// Probability of exactly `k` events given an expected count of `lambda`.
#[inline]
pub fn univariate(k: u8, lambda: f64, factorial: &impl Factorial) -> f64 {
    lambda.powi(k as i32) * f64::exp(-lambda) / factorial.get_f64(k)
}

/// Checks that `rate` is a usable Poisson parameter, without clamping it.
pub fn validate_rate(rate: f64) -> Result<(), Error> {
    if !rate.is_finite() {
        return Err(Error::invalid_argument(format!("rate {rate} is not finite")));
    }
    if rate < 0.0 {
        return Err(Error::invalid_argument(format!("rate {rate} is negative")));
    }
    if rate > MAX_RATE {
        return Err(Error::numeric_overflow(format!(
            "rate {rate} exceeds the ceiling of {MAX_RATE}"
        )));
    }
    Ok(())
}
