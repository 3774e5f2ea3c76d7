//! Settling predictions against final scores.
//!
//! Scores are the Brier score and log loss of the model probability against
//! the over 1.5 outcome, plus the plain hit rate.

use serde::Serialize;

const EPS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Two or more goals were scored.
    Hit,
    Miss,
    /// Final score not known yet.
    Pending,
}

impl Outcome {
    pub fn from_score(home: Option<i32>, away: Option<i32>) -> Self {
        match (home, away) {
            (Some(h), Some(a)) if h + a >= 2 => Outcome::Hit,
            (Some(_), Some(_)) => Outcome::Miss,
            _ => Outcome::Pending,
        }
    }

    fn label(self) -> Option<f64> {
        match self {
            Outcome::Hit => Some(1.0),
            Outcome::Miss => Some(0.0),
            Outcome::Pending => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub hit_rate: f64,
}

fn clamp_prob(p: f64) -> f64 {
    p.clamp(EPS, 1.0 - EPS)
}

fn logloss(p: f64, y: f64) -> f64 {
    let p = clamp_prob(p);
    -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
}

/// Score `(model_probability, outcome)` pairs. Pending outcomes are skipped;
/// `None` when nothing is settled.
pub fn evaluate(samples: &[(f64, Outcome)]) -> Option<Metrics> {
    let settled: Vec<(f64, f64)> = samples
        .iter()
        .filter_map(|(p, o)| o.label().map(|y| (*p, y)))
        .collect();
    if settled.is_empty() {
        return None;
    }

    let n = settled.len() as f64;
    let mut brier = 0.0;
    let mut ll = 0.0;
    let mut hits = 0.0;
    for (p, y) in &settled {
        brier += (p - y).powi(2);
        ll += logloss(*p, *y);
        hits += y;
    }
    Some(Metrics {
        samples: settled.len(),
        brier: brier / n,
        log_loss: ll / n,
        hit_rate: hits / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn outcome_from_score() {
        assert_eq!(Outcome::from_score(Some(1), Some(1)), Outcome::Hit);
        assert_eq!(Outcome::from_score(Some(3), Some(0)), Outcome::Hit);
        assert_eq!(Outcome::from_score(Some(1), Some(0)), Outcome::Miss);
        assert_eq!(Outcome::from_score(Some(0), Some(0)), Outcome::Miss);
        assert_eq!(Outcome::from_score(Some(2), None), Outcome::Pending);
        assert_eq!(Outcome::from_score(None, None), Outcome::Pending);
    }

    #[test]
    fn nothing_settled_gives_none() {
        assert!(evaluate(&[]).is_none());
        assert!(evaluate(&[(0.9, Outcome::Pending)]).is_none());
    }

    #[test]
    fn metrics_on_small_sample() {
        let m = evaluate(&[
            (0.9, Outcome::Hit),
            (0.8, Outcome::Miss),
            (0.5, Outcome::Pending),
        ])
        .unwrap();
        assert_eq!(m.samples, 2);
        // ((0.1)^2 + (0.8)^2) / 2
        assert_relative_eq!(m.brier, 0.325, epsilon = 1e-12);
        assert_relative_eq!(m.log_loss, (-(0.9f64.ln()) - 0.2f64.ln()) / 2.0, epsilon = 1e-9);
        assert_relative_eq!(m.hit_rate, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn certain_wrong_prediction_stays_finite() {
        let m = evaluate(&[(1.0, Outcome::Miss)]).unwrap();
        assert!(m.log_loss.is_finite());
        assert_relative_eq!(m.brier, 1.0, epsilon = 1e-12);
    }
}
