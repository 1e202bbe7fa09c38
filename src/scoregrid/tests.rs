use assert_float_eq::*;

use super::*;
use crate::testing::assert_unit_sum;

fn create_test_4x4_scoregrid() -> Scoregrid {
    let mut grid = Matrix::allocate(4, 4);
    grid[0].copy_from_slice(&[0.04, 0.03, 0.02, 0.01]);
    grid[1].copy_from_slice(&[0.08, 0.06, 0.04, 0.02]);
    grid[2].copy_from_slice(&[0.12, 0.09, 0.06, 0.03]);
    grid[3].copy_from_slice(&[0.16, 0.12, 0.08, 0.04]);
    Scoregrid::from_matrix(grid).unwrap()
}

fn create_poisson_scoregrid() -> Scoregrid {
    Scoregrid::from_univariate_poisson(1.5, 1.0, 5).unwrap()
}

#[test]
fn univariate_poisson_cells() {
    let scoregrid = create_poisson_scoregrid();
    assert_eq!(5, scoregrid.max_count());
    assert_eq!(6, scoregrid.matrix().rows());
    assert_float_relative_eq!(0.12312749793584819, scoregrid.get(&Score::new(1, 0)));
    assert_float_relative_eq!(0.09234562345188614, scoregrid.get(&Score::new(2, 0)));
    assert_eq!(0.0, scoregrid.get(&Score::new(6, 0)));
}

#[test]
fn univariate_poisson_mass_approaches_one() {
    let mut previous = 0.0;
    for max_count in 1..=10 {
        let mass = Scoregrid::from_univariate_poisson(1.5, 1.2, max_count)
            .unwrap()
            .mass();
        assert!(mass > 0.0 && mass <= 1.0, "mass {mass} for max_count {max_count}");
        assert!(mass > previous, "mass {mass} fell below {previous} at max_count {max_count}");
        previous = mass;
    }

    let mass_5 = Scoregrid::from_univariate_poisson(1.5, 1.2, 5)
        .unwrap()
        .mass();
    let mass_10 = Scoregrid::from_univariate_poisson(1.5, 1.2, 10)
        .unwrap()
        .mass();
    assert_float_absolute_eq!(0.9940504791007186, mass_5, 1e-12);
    assert!(mass_10 > mass_5);
    assert!(mass_10 > 0.9999);
}

#[test]
fn truncation_mass() {
    let scoregrid = create_poisson_scoregrid();
    assert_float_absolute_eq!(1.0 - 0.9949524820832946, scoregrid.truncation_mass(), 1e-12);

    let certain = Scoregrid::from_univariate_poisson(0.0, 0.0, 3).unwrap();
    assert_eq!(1.0, certain.mass());
    assert_eq!(0.0, certain.truncation_mass());
    assert_eq!(1.0, certain.get(&Score::new(0, 0)));
}

#[test]
fn univariate_poisson_rejects_invalid_args() {
    assert!(matches!(
        Scoregrid::from_univariate_poisson(-0.1, 1.0, 5),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        Scoregrid::from_univariate_poisson(1.0, f64::NAN, 5),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        Scoregrid::from_univariate_poisson(1.0, 1.0, 0),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        Scoregrid::from_univariate_poisson(20.0, 1.0, 5),
        Err(Error::NumericOverflow(_))
    ));
    assert!(matches!(
        Scoregrid::from_univariate_poisson(1.0, 1.0, MAX_COUNT + 1),
        Err(Error::NumericOverflow(_))
    ));
}

#[test]
fn from_matrix_rejects_malformed() {
    assert_eq!(
        Err(Error::invalid_state("scoregrid is empty")),
        Scoregrid::from_matrix(Matrix::allocate(0, 0))
    );
    assert_eq!(
        Err(Error::invalid_state("scoregrid is not square: 2x3")),
        Scoregrid::from_matrix(Matrix::allocate(2, 3))
    );
    assert_eq!(
        Err(Error::invalid_state("scoregrid mass 0 is outside (0, 1]")),
        Scoregrid::from_matrix(Matrix::allocate(2, 2))
    );
    {
        let mut grid = Matrix::allocate(2, 2);
        grid[0].copy_from_slice(&[0.5, -0.1]);
        assert_eq!(
            Err(Error::invalid_state("scoregrid holds an invalid mass -0.1 at 0-1")),
            Scoregrid::from_matrix(grid)
        );
    }
    {
        let mut grid = Matrix::allocate(2, 2);
        grid[0].copy_from_slice(&[0.5, 0.5]);
        grid[1].copy_from_slice(&[0.5, 0.0]);
        assert!(matches!(Scoregrid::from_matrix(grid), Err(Error::InvalidState(_))));
    }
}

#[test]
fn expectations() {
    let (home, away) = create_poisson_scoregrid().expectations();
    assert_float_absolute_eq!(1.4712613747493297, home, 1e-12);
    assert_float_absolute_eq!(0.9919004806045115, away, 1e-12);
}

#[test]
fn top_outcomes_breaks_ties_by_total_then_home() {
    let scoregrid = create_poisson_scoregrid();
    let top = scoregrid.top_outcomes(1).unwrap();
    assert_eq!(vec![Score::new(1, 0)], scores(&top));
    assert_float_relative_eq!(0.12312749793584819, top[0].probability);

    // 1-0 and 1-1 are exactly as likely when the away rate is 1.0, as are 2-0 and 2-1
    let top = scoregrid.top_outcomes(4).unwrap();
    assert_eq!(
        vec![Score::new(1, 0), Score::new(1, 1), Score::new(2, 0), Score::new(2, 1)],
        scores(&top)
    );
    assert_eq!(top[0].probability, top[1].probability);
    assert_eq!(top[2].probability, top[3].probability);
}

#[test]
fn top_outcomes_sorted_and_bounded() {
    let scoregrid = Scoregrid::from_univariate_poisson(2.2, 0.7, 2).unwrap();
    let top = scoregrid.top_outcomes(100).unwrap();
    assert_eq!(9, top.len());
    for pair in top.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }
    assert!(matches!(scoregrid.top_outcomes(0), Err(Error::InvalidArgument(_))));
}

#[test]
fn match_outcome() {
    let outcome = create_test_4x4_scoregrid().match_outcome();
    assert_float_absolute_eq!(0.65, outcome.home, 1e-12);
    assert_float_absolute_eq!(0.2, outcome.draw, 1e-12);
    assert_float_absolute_eq!(0.15, outcome.away, 1e-12);
    assert_unit_sum(&[outcome.home, outcome.draw, outcome.away]);
}

#[test]
fn match_outcome_draw_absorbs_truncation() {
    let scoregrid = create_poisson_scoregrid();
    let outcome = scoregrid.match_outcome();
    assert_float_absolute_eq!(0.48349186445316944, outcome.home, 1e-12);
    assert_float_absolute_eq!(0.25161510352923355, outcome.away, 1e-12);
    assert_float_absolute_eq!(0.26489303201759706, outcome.draw, 1e-12);
    assert_float_absolute_eq!(0.9949524820832946, outcome.mass, 1e-12);
    assert_eq!(1.0 - outcome.home - outcome.away, outcome.draw);
    assert_unit_sum(&[outcome.home, outcome.draw, outcome.away]);
}

#[test]
fn over_under() {
    let scoregrid = create_test_4x4_scoregrid();
    let split = scoregrid.over_under(2.5).unwrap();
    assert_float_absolute_eq!(0.65, split.over, 1e-12);
    assert_float_absolute_eq!(0.35, split.under, 1e-12);

    // the exact total on an integer line counts as under
    let split = scoregrid.over_under(3.0).unwrap();
    assert_float_absolute_eq!(0.35, split.over, 1e-12);
    assert_float_absolute_eq!(0.65, split.under, 1e-12);
    assert_unit_sum(&[split.over, split.under]);

    assert!(matches!(scoregrid.over_under(-0.5), Err(Error::InvalidArgument(_))));
    assert!(matches!(scoregrid.over_under(f64::NAN), Err(Error::InvalidArgument(_))));
}

#[test]
fn over_under_against_truncated_grid() {
    let split = create_poisson_scoregrid().over_under(2.5).unwrap();
    assert_float_absolute_eq!(0.451139366199965, split.over, 1e-12);
    assert_float_absolute_eq!(0.548860633800035, split.under, 1e-12);
    assert_float_absolute_eq!(0.9949524820832946, split.mass, 1e-12);
    assert_unit_sum(&[split.over, split.under]);
}

#[test]
fn asian_total() {
    let scoregrid = create_test_4x4_scoregrid();
    let split = scoregrid.asian_total(3.0).unwrap();
    assert_float_absolute_eq!(0.35, split.over, 1e-12);
    assert_float_absolute_eq!(0.30, split.push, 1e-12);
    assert_float_absolute_eq!(0.35, split.under, 1e-12);
    assert_unit_sum(&[split.over, split.push, split.under]);

    let split = scoregrid.asian_total(2.5).unwrap();
    assert_eq!(0.0, split.push);
    assert_float_absolute_eq!(0.65, split.over, 1e-12);
}

#[test]
fn handicap_cover_fractional() {
    let scoregrid = create_test_4x4_scoregrid();
    let split = scoregrid.handicap_cover(-0.5).unwrap();
    assert_float_absolute_eq!(0.65, split.home, 1e-12);
    assert_eq!(0.0, split.push);
    assert_float_absolute_eq!(0.35, split.away, 1e-12);
    assert_unit_sum(&[split.home, split.away]);

    let split = scoregrid.handicap_cover(1.5).unwrap();
    assert_float_absolute_eq!(0.95, split.home, 1e-12);
    assert_eq!(0.0, split.push);
    assert_float_absolute_eq!(0.05, split.away, 1e-12);
}

#[test]
fn handicap_cover_integer_has_push() {
    let scoregrid = create_test_4x4_scoregrid();
    let split = scoregrid.handicap_cover(-1.0).unwrap();
    assert_float_absolute_eq!(0.40, split.home, 1e-12);
    assert_float_absolute_eq!(0.25, split.push, 1e-12);
    assert_float_absolute_eq!(0.35, split.away, 1e-12);
    assert_unit_sum(&[split.home, split.push, split.away]);

    // level handicap: the draw is the push
    let split = scoregrid.handicap_cover(0.0).unwrap();
    let outcome = scoregrid.match_outcome();
    assert_float_absolute_eq!(outcome.home, split.home, 1e-12);
    assert_float_absolute_eq!(0.2, split.push, 1e-12);
}

#[test]
fn handicap_cover_poisson() {
    let scoregrid = Scoregrid::from_univariate_poisson(1.5, 1.0, 10).unwrap();
    let split = scoregrid.handicap_cover(-1.0).unwrap();
    assert_float_absolute_eq!(0.24627214970880013, split.home, 1e-12);
    assert_float_absolute_eq!(0.24167298185417302, split.push, 1e-12);
    assert_float_absolute_eq!(0.512054868437027, split.away, 1e-12);

    let split = scoregrid.handicap_cover(-0.5).unwrap();
    assert_float_absolute_eq!(0.48794513156297303, split.home, 1e-12);

    assert!(matches!(scoregrid.handicap_cover(f64::INFINITY), Err(Error::InvalidArgument(_))));
}

#[test]
fn aggregations_are_idempotent() {
    let scoregrid = Scoregrid::from_univariate_poisson(1.7, 0.9, 8).unwrap();
    assert_eq!(scoregrid.match_outcome(), scoregrid.match_outcome());
    assert_eq!(scoregrid.over_under(2.5).unwrap(), scoregrid.over_under(2.5).unwrap());
    assert_eq!(scoregrid.asian_total(2.0).unwrap(), scoregrid.asian_total(2.0).unwrap());
    assert_eq!(scoregrid.handicap_cover(-1.0).unwrap(), scoregrid.handicap_cover(-1.0).unwrap());
    assert_eq!(scoregrid.top_outcomes(5).unwrap(), scoregrid.top_outcomes(5).unwrap());
}

fn scores(outcomes: &[ProbableScore]) -> Vec<Score> {
    outcomes.iter().map(|outcome| outcome.score).collect()
}
