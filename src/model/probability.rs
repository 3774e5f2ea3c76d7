//! Match-level over 1.5 goals probability from per-team history.
//!
//! Each team contributes a signal: its historical over 1.5 rate, nudged
//! toward its recent form when form is known:
//!
//!   s = (1 − form_weight)·rate + form_weight·form      (form present)
//!   s = rate                                            (no form)
//!
//! The match probability is the weighted mean of the two signals:
//!
//!   p = (home_weight·s_home + away_weight·s_away) / (home_weight + away_weight)
//!
//! clamped to [0, 1]. With equal home/away weights and no form this is the
//! plain average of the two rates.

use serde::{Deserialize, Serialize};

use super::{is_probability, ModelError};

/// Historical statistics for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStat {
    pub team: String,
    /// Share of the team's finished matches with 2+ total goals.
    /// `None` when the team has no usable history.
    pub over15_rate: Option<f64>,
    /// Number of finished matches the rate was computed from.
    pub sample_size: u32,
    /// Over 1.5 rate across the most recent matches only.
    pub recent_form: Option<f64>,
}

impl TeamStat {
    pub fn new(team: impl Into<String>, over15_rate: Option<f64>) -> Self {
        TeamStat {
            team: team.into(),
            over15_rate,
            sample_size: 0,
            recent_form: None,
        }
    }

    #[cfg(test)]
    pub fn with_form(mut self, form: f64) -> Self {
        self.recent_form = Some(form);
        self
    }

    fn signal(&self, form_weight: f64) -> Result<f64, ModelError> {
        let rate = self.over15_rate.ok_or_else(|| ModelError::DataInsufficient {
            team: self.team.clone(),
        })?;
        if !is_probability(rate) {
            return Err(ModelError::malformed(
                "over15_rate",
                format!("of {} must be within [0, 1], got {rate}", self.team),
            ));
        }
        if let Some(form) = self.recent_form {
            if !is_probability(form) {
                return Err(ModelError::malformed(
                    "recent_form",
                    format!("of {} must be within [0, 1], got {form}", self.team),
                ));
            }
        }
        Ok(match self.recent_form {
            Some(form) if form_weight > 0.0 => (1.0 - form_weight) * rate + form_weight * form,
            _ => rate,
        })
    }
}

/// Tunable weights of the blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub home_weight: f64,
    pub away_weight: f64,
    /// How far recent form pulls a team's signal away from its long-run rate.
    pub form_weight: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        BlendWeights {
            home_weight: 0.5,
            away_weight: 0.5,
            form_weight: 0.2,
        }
    }
}

impl BlendWeights {
    pub fn new(home_weight: f64, away_weight: f64, form_weight: f64) -> Result<Self, ModelError> {
        let w = BlendWeights {
            home_weight,
            away_weight,
            form_weight,
        };
        w.validate()?;
        Ok(w)
    }

    /// Equal home/away weighting with form ignored.
    #[cfg(test)]
    pub fn rates_only() -> Self {
        BlendWeights {
            home_weight: 0.5,
            away_weight: 0.5,
            form_weight: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, v) in [
            ("home_weight", self.home_weight),
            ("away_weight", self.away_weight),
            ("form_weight", self.form_weight),
        ] {
            if !is_probability(v) {
                return Err(ModelError::InvalidConfiguration(format!(
                    "{name} must be within [0, 1], got {v}"
                )));
            }
        }
        if self.home_weight + self.away_weight <= 0.0 {
            return Err(ModelError::InvalidConfiguration(
                "home_weight and away_weight cannot both be zero".into(),
            ));
        }
        Ok(())
    }
}

/// Probability that a match between `home` and `away` ends with 2+ goals.
///
/// Fails with [`ModelError::DataInsufficient`] when either team lacks a
/// historical rate, [`ModelError::MalformedRecord`] when a rate or form lies
/// outside [0, 1], and [`ModelError::InvalidConfiguration`] when the weights
/// are out of range.
pub fn estimate(home: &TeamStat, away: &TeamStat, weights: &BlendWeights) -> Result<f64, ModelError> {
    weights.validate()?;
    let s_home = home.signal(weights.form_weight)?;
    let s_away = away.signal(weights.form_weight)?;
    let p = (weights.home_weight * s_home + weights.away_weight * s_away)
        / (weights.home_weight + weights.away_weight);
    Ok(p.clamp(0.0, 1.0))
}
