//! Motion hysteresis gate.
//!
//! Decides whether the gap between the filtered observation and the
//! current camera position is real motion. A stationary camera only
//! starts moving once the gap clears the reframe threshold; a moving
//! camera only stops once the gap falls inside the (smaller) deadband.
//! Small oscillations around a settled camera therefore never move it,
//! and a moving camera does not chatter at the threshold edge.

/// The configured reframe threshold, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReframeThreshold {
    /// Same threshold in both directions.
    Symmetric(f64),
    /// `upper` applies to positive deltas, `lower` to the rest.
    Asymmetric { upper: f64, lower: f64 },
}

impl ReframeThreshold {
    /// Whether a stationary camera should ignore a delta of `delta_degs`.
    pub fn is_motion_too_small(&self, delta_degs: f64) -> bool {
        match *self {
            Self::Symmetric(threshold) => delta_degs.abs() < threshold,
            Self::Asymmetric { upper, .. } if delta_degs > 0.0 => delta_degs < upper,
            Self::Asymmetric { lower, .. } => delta_degs.abs() < lower,
        }
    }

    /// Threshold values with their option names, for validation messages.
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Self::Symmetric(threshold) => vec![("min_motion_to_reframe", threshold)],
            Self::Asymmetric { upper, lower } => vec![
                ("min_motion_to_reframe_upper", upper),
                ("min_motion_to_reframe_lower", lower),
            ],
        }
    }
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionDecision {
    /// Camera is stationary and the motion is below threshold.
    Hold,
    /// Camera was moving and is now inside the deadband.
    Settle,
    /// Real motion: steer toward `target_px`, which stops one deadband
    /// short of the filtered position.
    Retarget { target_px: f64 },
}

impl MotionDecision {
    pub fn is_motion(&self) -> bool {
        matches!(self, Self::Retarget { .. })
    }
}

/// Threshold plus deadband, validated together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionGate {
    threshold: ReframeThreshold,
    deadband_degs: f64,
}

impl MotionGate {
    /// `deadband_degs` must not exceed any threshold value; see
    /// [`crate::KinematicOptions::validate`].
    pub fn new(threshold: ReframeThreshold, deadband_degs: f64) -> Self {
        Self {
            threshold,
            deadband_degs,
        }
    }

    pub fn threshold(&self) -> ReframeThreshold {
        self.threshold
    }

    pub fn deadband_degs(&self) -> f64 {
        self.deadband_degs
    }

    /// Evaluate the gate for a filtered observation.
    pub fn decide(
        &self,
        filtered_px: i32,
        current_px: f64,
        pixels_per_degree: f64,
        moving: bool,
    ) -> MotionDecision {
        let filtered_px = f64::from(filtered_px);
        let delta_degs = (filtered_px - current_px) / pixels_per_degree;
        let deadband_px = pixels_per_degree * self.deadband_degs;

        if !moving && self.threshold.is_motion_too_small(delta_degs) {
            MotionDecision::Hold
        } else if moving && delta_degs.abs() < self.deadband_degs {
            MotionDecision::Settle
        } else if delta_degs > 0.0 {
            MotionDecision::Retarget {
                target_px: filtered_px - deadband_px,
            }
        } else {
            MotionDecision::Retarget {
                target_px: filtered_px + deadband_px,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> MotionGate {
        MotionGate::new(ReframeThreshold::Symmetric(5.0), 2.0)
    }

    #[test]
    fn test_small_motion_holds_stationary_camera() {
        // 40px at 10px/deg = 4 degrees < 5
        assert_eq!(gate().decide(540, 500.0, 10.0, false), MotionDecision::Hold);
        assert_eq!(gate().decide(460, 500.0, 10.0, false), MotionDecision::Hold);
    }

    #[test]
    fn test_large_motion_retargets_short_of_filtered_position() {
        assert_eq!(
            gate().decide(600, 500.0, 10.0, false),
            MotionDecision::Retarget { target_px: 580.0 }
        );
        assert_eq!(
            gate().decide(400, 500.0, 10.0, false),
            MotionDecision::Retarget { target_px: 420.0 }
        );
    }

    #[test]
    fn test_moving_camera_keeps_going_below_threshold() {
        // 3 degrees: below the threshold but outside the deadband.
        let decision = gate().decide(530, 500.0, 10.0, true);
        assert_eq!(decision, MotionDecision::Retarget { target_px: 510.0 });
        assert!(decision.is_motion());
    }

    #[test]
    fn test_moving_camera_settles_inside_deadband() {
        assert_eq!(gate().decide(515, 500.0, 10.0, true), MotionDecision::Settle);
        assert!(!MotionDecision::Settle.is_motion());
    }

    #[test]
    fn test_zero_delta_on_moving_camera_with_zero_deadband_retargets() {
        let gate = MotionGate::new(ReframeThreshold::Symmetric(1.0), 0.0);
        assert_eq!(
            gate.decide(500, 500.0, 10.0, true),
            MotionDecision::Retarget { target_px: 500.0 }
        );
    }

    #[test]
    fn test_asymmetric_threshold_uses_direction() {
        let threshold = ReframeThreshold::Asymmetric {
            upper: 6.0,
            lower: 2.0,
        };
        assert!(threshold.is_motion_too_small(5.0));
        assert!(!threshold.is_motion_too_small(-3.0));
        assert!(threshold.is_motion_too_small(-1.5));
        assert!(!threshold.is_motion_too_small(6.0));
        // Zero counts as the lower side.
        assert!(threshold.is_motion_too_small(0.0));
    }
}
