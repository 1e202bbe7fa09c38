use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::market::{fair_price, Comparison};
use crate::report::Report;
use crate::scoregrid::ProbableScore;

pub fn tabulate_outcomes(outcomes: &[ProbableScore]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(8)).with(Left)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Score".into(), "Probability".into(), "Fair price".into()],
        ));
    for outcome in outcomes {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", outcome.score).into(),
                format!("{:.6}", outcome.probability).into(),
                format!("{:.3}", fair_price(outcome.probability)).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_summary(report: &Report) -> Table {
    let match_outcome = &report.match_outcome;
    let totals = &report.totals;
    let handicap = &report.handicap;
    let rows = [
        (
            "Rates".to_string(),
            format!(
                "{}:{} ({:?}:{:?})",
                report.home_rate, report.away_rate, report.home_rate_source, report.away_rate_source
            ),
        ),
        (
            "Match".to_string(),
            format!(
                "{:.3} / {:.3} / {:.3}",
                match_outcome.home, match_outcome.draw, match_outcome.away
            ),
        ),
        (
            format!("Totals {} ({})", totals.line.value(), report.totals_source),
            format!("over {:.3}, under {:.3}", totals.over, totals.under),
        ),
        (
            format!("Handicap {} ({})", handicap.handicap, report.handicap_source),
            format!(
                "home {:.3}, push {:.3}, away {:.3}",
                handicap.home, handicap.push, handicap.away
            ),
        ),
        (
            "Suggestions".to_string(),
            format!("{}; {}", report.totals_pick(), report.handicap_pick()),
        ),
        ("Mass".to_string(), format!("{:.6}", match_outcome.mass)),
    ];

    let mut table = Table::default().with_cols(vec![
        Col::new(Styles::default().with(MinWidth(16)).with(Left)),
        Col::new(Styles::default().with(MinWidth(20)).with(Left)),
    ]);
    for (key, value) in rows {
        table.push_row(Row::new(Styles::default(), vec![key.into(), value.into()]));
    }
    table
}

pub fn tabulate_comparisons(comparisons: &[Comparison]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(10)).with(Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(Left)),
            Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(8))
                    .with(HAlign::Right),
            ),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(15)).with(Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Market".into(),
                "Outcome".into(),
                "Price".into(),
                "Model".into(),
                "Book".into(),
                "Edge".into(),
                "Verdict".into(),
            ],
        ));
    for comparison in comparisons {
        let market = match comparison.line {
            Some(line) => format!("{} {line}", comparison.market_type),
            None => comparison.market_type.to_string(),
        };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                market.into(),
                comparison.outcome.to_string().into(),
                format!("{:.2}", comparison.price).into(),
                format!("{:.3}", comparison.model_prob).into(),
                format!("{:.3}", comparison.devigged_prob).into(),
                format!("{:+.3}", comparison.edge()).into(),
                comparison.verdict.to_string().into(),
            ],
        ));
    }
    table
}
