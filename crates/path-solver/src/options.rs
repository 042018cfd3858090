//! Solver options.
//!
//! Options deserialize from JSON. The reframe threshold comes in two
//! mutually exclusive forms: a single symmetric `min_motion_to_reframe`,
//! or an `upper`/`lower` pair for direction-dependent sensitivity. Which
//! form is set is checked by [`KinematicOptions::validate`] when the
//! solver receives its first observation.

use std::path::Path;

use reframe_common::error::{ReframeError, ReframeResult};
use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};
use crate::motion::ReframeThreshold;

/// Tuning for a [`crate::KinematicPathSolver`].
///
/// Angular quantities are in degrees; the solver converts pixel deltas
/// using its pixels-per-degree calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KinematicOptions {
    /// Symmetric threshold (degrees) a stationary camera needs before it moves.
    #[serde(default)]
    pub min_motion_to_reframe: Option<f64>,

    /// Threshold for positive deltas when using asymmetric thresholds.
    #[serde(default)]
    pub min_motion_to_reframe_upper: Option<f64>,

    /// Threshold for non-positive deltas when using asymmetric thresholds.
    #[serde(default)]
    pub min_motion_to_reframe_lower: Option<f64>,

    /// Deadband (degrees). A moving camera settles once inside it.
    #[serde(default)]
    pub reframe_window: f64,

    /// How far back the median filter looks (microseconds).
    #[serde(default)]
    pub filtering_time_window_us: u64,

    /// Response time (seconds) the velocity blend is normalized against.
    #[serde(default = "default_update_rate_seconds")]
    pub update_rate_seconds: f64,

    /// Ceiling on the per-observation velocity blend weight.
    #[serde(default = "default_max_update_rate")]
    pub max_update_rate: f64,

    /// Smoothing weight for the mean observation period.
    #[serde(default = "default_mean_period_update_rate")]
    pub mean_period_update_rate: f64,

    /// Velocity limit (degrees per second).
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
}

fn default_update_rate_seconds() -> f64 {
    0.2
}

fn default_max_update_rate() -> f64 {
    0.8
}

fn default_mean_period_update_rate() -> f64 {
    0.25
}

fn default_max_velocity() -> f64 {
    18.0
}

impl Default for KinematicOptions {
    fn default() -> Self {
        Self::symmetric(1.8)
    }
}

impl KinematicOptions {
    /// Options with a single symmetric reframe threshold and default rates.
    pub fn symmetric(min_motion_to_reframe: f64) -> Self {
        Self {
            min_motion_to_reframe: Some(min_motion_to_reframe),
            min_motion_to_reframe_upper: None,
            min_motion_to_reframe_lower: None,
            reframe_window: 0.0,
            filtering_time_window_us: 0,
            update_rate_seconds: default_update_rate_seconds(),
            max_update_rate: default_max_update_rate(),
            mean_period_update_rate: default_mean_period_update_rate(),
            max_velocity: default_max_velocity(),
        }
    }

    /// Options with separate thresholds for positive and negative motion.
    pub fn asymmetric(upper: f64, lower: f64) -> Self {
        Self {
            min_motion_to_reframe: None,
            min_motion_to_reframe_upper: Some(upper),
            min_motion_to_reframe_lower: Some(lower),
            ..Self::symmetric(0.0)
        }
    }

    pub fn with_reframe_window(mut self, degrees: f64) -> Self {
        self.reframe_window = degrees;
        self
    }

    pub fn with_filtering_time_window_us(mut self, window_us: u64) -> Self {
        self.filtering_time_window_us = window_us;
        self
    }

    pub fn with_update_rate_seconds(mut self, seconds: f64) -> Self {
        self.update_rate_seconds = seconds;
        self
    }

    pub fn with_max_update_rate(mut self, rate: f64) -> Self {
        self.max_update_rate = rate;
        self
    }

    pub fn with_mean_period_update_rate(mut self, rate: f64) -> Self {
        self.mean_period_update_rate = rate;
        self
    }

    pub fn with_max_velocity(mut self, degrees_per_sec: f64) -> Self {
        self.max_velocity = degrees_per_sec;
        self
    }

    /// Check every configuration invariant and resolve the threshold form.
    pub fn validate(&self) -> SolverResult<ReframeThreshold> {
        let threshold = match (
            self.min_motion_to_reframe,
            self.min_motion_to_reframe_upper,
            self.min_motion_to_reframe_lower,
        ) {
            (Some(symmetric), None, None) => ReframeThreshold::Symmetric(symmetric),
            (None, Some(upper), Some(lower)) => ReframeThreshold::Asymmetric { upper, lower },
            (None, None, None) => {
                return Err(SolverError::config(
                    "must set min_motion_to_reframe or min_motion_to_reframe_upper and min_motion_to_reframe_lower",
                ));
            }
            (Some(_), _, _) => {
                return Err(SolverError::config(
                    "min_motion_to_reframe cannot be combined with min_motion_to_reframe_upper/lower",
                ));
            }
            (None, _, _) => {
                return Err(SolverError::config(
                    "min_motion_to_reframe_upper and min_motion_to_reframe_lower must be set together",
                ));
            }
        };

        for (name, value) in threshold.named_values() {
            non_negative(name, value)?;
        }
        non_negative("reframe_window", self.reframe_window)?;
        non_negative("max_update_rate", self.max_update_rate)?;
        non_negative("mean_period_update_rate", self.mean_period_update_rate)?;
        non_negative("max_velocity", self.max_velocity)?;
        if !(self.update_rate_seconds > 0.0 && self.update_rate_seconds.is_finite()) {
            return Err(SolverError::config(format!(
                "update_rate_seconds must be greater than 0, got {}",
                self.update_rate_seconds
            )));
        }

        for (name, value) in threshold.named_values() {
            if self.reframe_window > value {
                return Err(SolverError::config(format!(
                    "reframe_window {} cannot exceed {name} {value}",
                    self.reframe_window
                )));
            }
        }

        Ok(threshold)
    }

    /// Parse options from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> ReframeResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ReframeError::from_io_at(e, path))?;
        Self::from_json(&content).map_err(|e| {
            ReframeError::config(format!("Failed to parse options {}: {e}", path.display()))
        })
    }

    /// Pretty JSON, as written by `reframe init`.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn non_negative(name: &str, value: f64) -> SolverResult<()> {
    // Also rejects NaN.
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SolverError::config(format!(
            "{name} must be greater than or equal to 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: SolverError) -> String {
        match err {
            SolverError::InvalidConfiguration { reason } => reason,
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_validate() {
        let threshold = KinematicOptions::default().validate().unwrap();
        assert_eq!(threshold, ReframeThreshold::Symmetric(1.8));
    }

    #[test]
    fn test_asymmetric_validates() {
        let options = KinematicOptions::asymmetric(3.0, 1.0).with_reframe_window(0.5);
        assert_eq!(
            options.validate().unwrap(),
            ReframeThreshold::Asymmetric {
                upper: 3.0,
                lower: 1.0
            }
        );
    }

    #[test]
    fn test_threshold_forms_are_exclusive() {
        let mut neither = KinematicOptions::default();
        neither.min_motion_to_reframe = None;
        assert!(reason(neither.validate().unwrap_err()).contains("must set"));

        let mut both = KinematicOptions::asymmetric(2.0, 2.0);
        both.min_motion_to_reframe = Some(2.0);
        assert!(reason(both.validate().unwrap_err()).contains("cannot be combined"));

        let mut half_pair = KinematicOptions::asymmetric(2.0, 2.0);
        half_pair.min_motion_to_reframe_lower = None;
        assert!(reason(half_pair.validate().unwrap_err()).contains("set together"));
    }

    #[test]
    fn test_deadband_cannot_exceed_threshold() {
        let err = KinematicOptions::symmetric(1.0)
            .with_reframe_window(1.5)
            .validate()
            .unwrap_err();
        assert!(reason(err).contains("reframe_window"));

        // Equal is allowed.
        assert!(KinematicOptions::symmetric(1.0)
            .with_reframe_window(1.0)
            .validate()
            .is_ok());

        // Asymmetric checks both sides.
        let err = KinematicOptions::asymmetric(4.0, 1.0)
            .with_reframe_window(2.0)
            .validate()
            .unwrap_err();
        assert!(reason(err).contains("min_motion_to_reframe_lower"));
    }

    #[test]
    fn test_rate_constants_are_checked() {
        let err = KinematicOptions::default()
            .with_update_rate_seconds(0.0)
            .validate()
            .unwrap_err();
        assert!(reason(err).contains("update_rate_seconds"));

        assert!(KinematicOptions::default()
            .with_max_velocity(-1.0)
            .validate()
            .is_err());
        assert!(KinematicOptions::default()
            .with_mean_period_update_rate(f64::NAN)
            .validate()
            .is_err());
        assert!(KinematicOptions::default()
            .with_max_update_rate(-0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_json_fills_rate_defaults() {
        let options = KinematicOptions::from_json(
            r#"{"min_motion_to_reframe_upper": 2.5, "min_motion_to_reframe_lower": 1.5, "reframe_window": 1.0}"#,
        )
        .unwrap();
        assert_eq!(options.min_motion_to_reframe, None);
        assert_eq!(options.update_rate_seconds, 0.2);
        assert_eq!(options.max_velocity, 18.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        assert!(KinematicOptions::from_json(r#"{"min_motion_to_refrme": 2.0}"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let options = KinematicOptions::symmetric(5.0)
            .with_reframe_window(2.0)
            .with_filtering_time_window_us(1_000_000);
        let parsed = KinematicOptions::from_json(&options.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, options);
    }
}
