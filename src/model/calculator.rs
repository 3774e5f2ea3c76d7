//! Ad hoc match-up calculator.
//!
//! [`calculate`] is the probability model applied to whatever two teams a user
//! picks. [`outcome_probabilities`] adds a home/draw/away breakdown from
//! independent Poisson goal counts.

use serde::Serialize;

use super::probability::{estimate, BlendWeights, TeamStat};
use super::ModelError;

/// Goals per side considered in the score grid (0..=9).
const MAX_GOALS: u32 = 10;

/// Over 1.5 probability for an arbitrary pairing. Same formula as
/// [`estimate`]; nothing is stored.
pub fn calculate(home: &TeamStat, away: &TeamStat, weights: &BlendWeights) -> Result<f64, ModelError> {
    estimate(home, away, weights)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

/// Home/draw/away probabilities from each side's expected goals.
///
/// Mass beyond nine goals per side is dropped, so the three outcomes sum to
/// slightly less than one for large expectations.
pub fn outcome_probabilities(home_expected: f64, away_expected: f64) -> Result<OutcomeProbabilities, ModelError> {
    for (name, v) in [("home_expected", home_expected), ("away_expected", away_expected)] {
        if !v.is_finite() || v < 0.0 {
            return Err(ModelError::InvalidConfiguration(format!(
                "{name} must be a non-negative number, got {v}"
            )));
        }
    }

    let home_pmf = poisson_pmf(home_expected);
    let away_pmf = poisson_pmf(away_expected);

    let mut out = OutcomeProbabilities {
        home_win: 0.0,
        draw: 0.0,
        away_win: 0.0,
    };
    for (i, ph) in home_pmf.iter().enumerate() {
        for (j, pa) in away_pmf.iter().enumerate() {
            let p = ph * pa;
            match i.cmp(&j) {
                std::cmp::Ordering::Greater => out.home_win += p,
                std::cmp::Ordering::Equal => out.draw += p,
                std::cmp::Ordering::Less => out.away_win += p,
            }
        }
    }
    Ok(out)
}

fn poisson_pmf(lambda: f64) -> [f64; MAX_GOALS as usize] {
    let mut pmf = [0.0; MAX_GOALS as usize];
    let mut p = (-lambda).exp();
    for (k, slot) in pmf.iter_mut().enumerate() {
        if k > 0 {
            p *= lambda / k as f64;
        }
        *slot = p;
    }
    pmf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn calculate_matches_estimate_exactly() {
        let weights = [
            BlendWeights::default(),
            BlendWeights::rates_only(),
            BlendWeights::new(0.8, 0.2, 0.6).unwrap(),
        ];
        let pairs = [
            (TeamStat::new("A", Some(0.9)), TeamStat::new("B", Some(0.88))),
            (
                TeamStat::new("C", Some(0.31)).with_form(0.8),
                TeamStat::new("D", Some(0.77)).with_form(0.2),
            ),
            (TeamStat::new("E", Some(1.0)).with_form(1.0), TeamStat::new("F", Some(0.0))),
        ];
        for w in &weights {
            for (h, a) in &pairs {
                let c = calculate(h, a, w).unwrap();
                let e = estimate(h, a, w).unwrap();
                assert_eq!(c.to_bits(), e.to_bits());
            }
        }
    }

    #[test]
    fn calculate_reports_missing_data() {
        let err = calculate(
            &TeamStat::new("A", Some(0.9)),
            &TeamStat::new("B", None),
            &BlendWeights::default(),
        )
        .unwrap_err();
        assert_eq!(err, ModelError::DataInsufficient { team: "B".into() });
    }

    #[test]
    fn poisson_known_values() {
        let pmf = poisson_pmf(1.0);
        assert_relative_eq!(pmf[0], 0.36787944117144233, epsilon = 1e-12);
        assert_relative_eq!(pmf[1], 0.36787944117144233, epsilon = 1e-12);
        assert_relative_eq!(pmf[2], 0.18393972058572117, epsilon = 1e-12);
    }

    #[test]
    fn symmetric_sides_split_evenly() {
        let o = outcome_probabilities(1.4, 1.4).unwrap();
        assert_relative_eq!(o.home_win, o.away_win, epsilon = 1e-12);
        assert_relative_eq!(o.home_win + o.draw + o.away_win, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn stronger_home_side_is_favoured() {
        let o = outcome_probabilities(2.1, 0.7).unwrap();
        assert!(o.home_win > o.away_win);
        assert!(o.home_win > o.draw);
    }

    #[test]
    fn draw_matches_closed_form_for_low_scoring_sides() {
        // with λ this small the 10x10 grid holds virtually all the mass
        let (h, a): (f64, f64) = (0.3, 0.2);
        let expected_draw: f64 = (0..MAX_GOALS as i32)
            .map(|k| {
                let fact: f64 = (1..=k).map(f64::from).product();
                (-h).exp() * h.powi(k) / fact * (-a).exp() * a.powi(k) / fact
            })
            .sum();
        let o = outcome_probabilities(h, a).unwrap();
        assert_relative_eq!(o.draw, expected_draw, epsilon = 1e-12);
        assert_relative_eq!(o.home_win + o.draw + o.away_win, 1.0, epsilon = 1e-9);
        assert!(o.home_win > o.away_win);
    }

    #[test]
    fn goalless_expectation_is_certain_draw() {
        let o = outcome_probabilities(0.0, 0.0).unwrap();
        assert_eq!(o.draw, 1.0);
        assert_eq!(o.home_win, 0.0);
        assert_eq!(o.away_win, 0.0);
    }

    #[test]
    fn rejects_negative_expectation() {
        assert!(matches!(
            outcome_probabilities(-0.1, 1.0),
            Err(ModelError::InvalidConfiguration(_))
        ));
    }
}
