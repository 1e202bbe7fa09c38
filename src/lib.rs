//! Scoreline and totals prediction under an independent Poisson model. Builds a bounded grid of
//! score probabilities from a pair of scoring rates, aggregates it into the usual soccer markets
//! and compares the results against bookmaker prices with the overround removed.

pub mod domain;
pub mod error;
pub mod estimate;
pub mod factorial;
pub mod file;
pub mod fixture;
pub mod linear;
pub mod market;
pub mod poisson;
pub mod print;
pub mod probs;
pub mod report;
pub mod sample;
pub mod scoregrid;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
