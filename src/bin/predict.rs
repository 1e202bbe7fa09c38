use std::env;
use std::process;

use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use tinyrand::{Seeded, StdRand};
use tracing::{debug, error, info};

use scorecast::error::Error;
use scorecast::report::DEFAULT_HANDICAP;
use scorecast::sample;
use scorecast::scoregrid::{Scoregrid, DEFAULT_MAX_COUNT};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// expected count for the home side
    #[clap(long = "home-rate", allow_negative_numbers = true)]
    home_rate: f64,

    /// expected count for the away side
    #[clap(long = "away-rate", allow_negative_numbers = true)]
    away_rate: f64,

    /// largest count per side held in the grid
    #[clap(long = "max-count", default_value_t = DEFAULT_MAX_COUNT as u16)]
    max_count: u16,

    /// totals line
    #[clap(long, default_value_t = 2.5, allow_negative_numbers = true)]
    line: f64,

    /// handicap applied to the home side
    #[clap(long, default_value_t = DEFAULT_HANDICAP, allow_negative_numbers = true)]
    handicap: f64,

    /// number of most likely scorelines to print
    #[clap(long, default_value_t = 3)]
    top: usize,

    /// also pick one of the top scorelines at random, weighted by probability
    #[clap(long)]
    sample: bool,

    /// seed for --sample; taken from the clock if omitted
    #[clap(long)]
    seed: Option<u64>,

    /// also print expected counts and the truncated mass, and log the full grid
    #[clap(short = 'v', long)]
    verbose: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.seed.is_some() && !self.sample {
            bail!("--seed requires --sample");
        }
        Ok(())
    }
}

fn main() {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    if let Err(err) = args.validate() {
        error!("{err}");
        process::exit(2);
    }
    debug!("args: {args:?}");

    match predict(&args) {
        Ok(lines) => {
            for (key, value) in lines {
                println!("{key}: {value}");
            }
        }
        Err(err) => {
            error!("{err}");
            process::exit(err.exit_code());
        }
    }
}

fn predict(args: &Args) -> Result<Vec<(String, String)>, Error> {
    let max_count = u8::try_from(args.max_count).map_err(|_| {
        Error::numeric_overflow(format!("max count {} is too large", args.max_count))
    })?;
    let scoregrid = Scoregrid::from_univariate_poisson(args.home_rate, args.away_rate, max_count)?;
    let top = scoregrid.top_outcomes(args.top)?;
    let over_under = scoregrid.over_under(args.line)?;
    let match_outcome = scoregrid.match_outcome();
    let handicap = scoregrid.handicap_cover(args.handicap)?;

    let mut lines = vec![];
    for (rank, outcome) in top.iter().enumerate() {
        lines.push((
            format!("top.{}", rank + 1),
            format!("{} {:.6}", outcome.score, outcome.probability),
        ));
    }
    let line = over_under.line.value();
    lines.push((format!("over.{line}"), format!("{:.6}", over_under.over)));
    lines.push((format!("under.{line}"), format!("{:.6}", over_under.under)));
    lines.push(("home".into(), format!("{:.6}", match_outcome.home)));
    lines.push(("draw".into(), format!("{:.6}", match_outcome.draw)));
    lines.push(("away".into(), format!("{:.6}", match_outcome.away)));
    let handicap_key = format!("handicap.{}", handicap.handicap);
    lines.push((format!("{handicap_key}.home"), format!("{:.6}", handicap.home)));
    lines.push((format!("{handicap_key}.push"), format!("{:.6}", handicap.push)));
    lines.push((format!("{handicap_key}.away"), format!("{:.6}", handicap.away)));
    lines.push(("mass".into(), format!("{:.6}", scoregrid.mass())));

    if args.verbose {
        let (home_expectation, away_expectation) = scoregrid.expectations();
        lines.push(("expected.home".into(), format!("{home_expectation:.6}")));
        lines.push(("expected.away".into(), format!("{away_expectation:.6}")));
        lines.push(("truncation".into(), format!("{:e}", scoregrid.truncation_mass())));
        info!(
            "{0}x{0} scoregrid:\n{1}",
            scoregrid.max_count() as usize + 1,
            scoregrid.matrix().verbose()
        );
    }

    if args.sample {
        let seed = args
            .seed
            .unwrap_or_else(|| Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64);
        info!("sampling with seed {seed}");
        let mut rand = StdRand::seed(seed);
        let pick = sample::pick(&top, &mut rand)?;
        lines.push(("sample".into(), pick.to_string()));
    }
    Ok(lines)
}
