use std::env;
use std::error::Error;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use rustc_hash::FxHashMap;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tinyrand::{Seeded, StdRand};
use tracing::{debug, info, warn};

use scorecast::estimate::{Blended, RateEstimator, RecentForm};
use scorecast::fixture::Slate;
use scorecast::market::{Verdict, DEFAULT_EDGE_THRESHOLD};
use scorecast::report::{Config, Predictor};
use scorecast::scoregrid::DEFAULT_MAX_COUNT;
use scorecast::{print, sample};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the slate from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// smallest model-versus-market difference reported as an edge
    #[clap(long, default_value_t = DEFAULT_EDGE_THRESHOLD)]
    threshold: f64,

    /// largest count per side held in the grid
    #[clap(long = "max-count", default_value_t = DEFAULT_MAX_COUNT)]
    max_count: u8,

    /// number of most likely scorelines to show per fixture
    #[clap(long, default_value_t = 3)]
    top: usize,

    /// blend recent form with head-to-head form
    #[clap(long)]
    blend: bool,

    /// also pick one of the top scorelines per fixture at random, weighted by probability
    #[clap(long)]
    sample: bool,

    /// seed for --sample; taken from the clock if omitted
    #[clap(long)]
    seed: Option<u64>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        const THRESHOLD_RANGE: RangeInclusive<f64> = 0.0..=1.0;
        if !THRESHOLD_RANGE.contains(&self.threshold) {
            bail!("threshold must lie in the range {THRESHOLD_RANGE:?}");
        }
        if self.seed.is_some() && !self.sample {
            bail!("--seed requires --sample");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let slate = Slate::read(&args.file)?;
    info!("read {} fixtures from {}", slate.len(), args.file.display());

    let config = Config {
        max_count: args.max_count,
        top: args.top,
        threshold: args.threshold,
        ..Config::default()
    };
    if args.blend {
        let estimator = Blended::default();
        estimator.validate()?;
        run(&args, &slate, Predictor::new(config, estimator)?);
    } else {
        run(&args, &slate, Predictor::new(config, RecentForm::default())?);
    }
    Ok(())
}

fn run<E: RateEstimator>(args: &Args, slate: &Slate, predictor: Predictor<E>) {
    let mut rand = args.sample.then(|| {
        let seed = args
            .seed
            .unwrap_or_else(|| Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64);
        info!("sampling with seed {seed}");
        StdRand::seed(seed)
    });

    let mut verdicts = FxHashMap::default();
    let mut failures = 0;
    for (fixture, result) in predictor.predict_slate(slate) {
        println!("{} ({})", fixture.title(), fixture.kickoff);
        let report = match result {
            Ok(report) => report,
            Err(err) => {
                println!("error: {err}\n");
                failures += 1;
                continue;
            }
        };

        println!("{}", Console::default().render(&print::tabulate_summary(&report)));
        println!("{}", Console::default().render(&print::tabulate_outcomes(&report.top)));
        if let Some(rand) = rand.as_mut() {
            match sample::pick(&report.top, rand) {
                Ok(score) => println!("sampled: {score}"),
                Err(err) => warn!("{}: {err}", fixture.title()),
            }
        }
        for (market_type, err) in &report.rejected {
            println!("rejected {market_type} quote: {err}");
        }
        if !report.comparisons.is_empty() {
            println!(
                "{}",
                Console::default().render(&print::tabulate_comparisons(&report.comparisons))
            );
        }
        println!();

        for comparison in &report.comparisons {
            *verdicts.entry(comparison.verdict).or_insert(0usize) += 1;
        }
    }

    let mut tally = verdicts.into_iter().collect::<Vec<(Verdict, usize)>>();
    tally.sort();
    info!("{} fixtures, {failures} failed; verdicts: {tally:?}", slate.len());
}
