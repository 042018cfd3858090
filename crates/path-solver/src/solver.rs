//! Kinematic path solver for one camera axis.
//!
//! # Algorithm
//!
//! For every observation:
//!
//! 1. **Window** the observation into the time-limited history.
//! 2. **Median** the retained positions to reject outliers.
//! 3. **Gate** the gap between median and camera through the motion
//!    hysteresis (see [`crate::motion`]). Real motion retargets the camera
//!    one deadband short of the median.
//! 4. **Blend** the observed angular velocity into the current velocity,
//!    weighted by how long the smoothed observation period is relative to
//!    `update_rate_seconds`, then clamp to `max_velocity`.
//! 5. **Integrate** one step of `velocity * mean_period`, clamped to the
//!    output bounds.
//!
//! Prediction ticks between observations repeat step 5 only.

use reframe_common::clock::us_to_secs;

use crate::error::{SolverError, SolverResult};
use crate::history::{Observation, ObservationWindow};
use crate::motion::{MotionDecision, MotionGate};
use crate::options::KinematicOptions;

/// Smoothed camera state for one axis.
///
/// Every mutator validates before writing, so a call that returns an
/// error leaves the solver unchanged. Timestamps are microseconds and
/// must strictly increase across observations and prediction ticks.
#[derive(Debug, Clone)]
pub struct KinematicPathSolver {
    options: KinematicOptions,
    min_location: i32,
    max_location: i32,
    pixels_per_degree: f64,
    history: ObservationWindow,
    /// `None` until the first observation.
    track: Option<TrackState>,
}

/// State that only exists once the solver has seen an observation.
#[derive(Debug, Clone)]
struct TrackState {
    gate: MotionGate,
    current_position_px: f64,
    target_position_px: f64,
    velocity_deg_per_s: f64,
    moving: bool,
    /// Smoothed seconds between observations; unset until the second observation.
    mean_period_secs: Option<f64>,
    current_time_us: u64,
}

impl TrackState {
    fn check_advances(&self, timestamp_us: u64) -> SolverResult<()> {
        if timestamp_us > self.current_time_us {
            Ok(())
        } else {
            Err(SolverError::NonMonotonicTime {
                timestamp_us,
                current_time_us: self.current_time_us,
            })
        }
    }
}

impl KinematicPathSolver {
    /// Create an uninitialized solver. Options and bounds are validated
    /// when the first observation arrives.
    pub fn new(
        options: KinematicOptions,
        min_location: i32,
        max_location: i32,
        pixels_per_degree: f64,
    ) -> Self {
        let history = ObservationWindow::new(options.filtering_time_window_us);
        Self {
            options,
            min_location,
            max_location,
            pixels_per_degree,
            history,
            track: None,
        }
    }

    /// Feed one observation and advance the camera by one integration step.
    pub fn add_observation(&mut self, position: i32, timestamp_us: u64) -> SolverResult<()> {
        let Some(track) = self.track.as_mut() else {
            return self.initialize(position, timestamp_us);
        };
        track.check_advances(timestamp_us)?;

        self.history.push(Observation::new(timestamp_us, position));
        let filtered_px = self.history.median().unwrap_or(position);

        let decision = track.gate.decide(
            filtered_px,
            track.current_position_px,
            self.pixels_per_degree,
            track.moving,
        );
        let delta_degs = match decision {
            MotionDecision::Hold => 0.0,
            MotionDecision::Settle => {
                tracing::debug!(
                    position = track.current_position_px,
                    filtered_px,
                    "camera settled inside reframe window"
                );
                track.moving = false;
                0.0
            }
            MotionDecision::Retarget { target_px } => {
                // Steer toward the raw target so a camera chasing a subject
                // past a bound overshoots and gets pinned by `integrate`.
                let stored_px =
                    target_px.clamp(f64::from(self.min_location), f64::from(self.max_location));
                if !track.moving {
                    tracing::debug!(
                        position = track.current_position_px,
                        target = stored_px,
                        filtered_px,
                        "camera started reframing"
                    );
                }
                track.target_position_px = stored_px;
                track.moving = true;
                (target_px - track.current_position_px) / self.pixels_per_degree
            }
        };

        let delta_t = us_to_secs(timestamp_us - track.current_time_us);
        let alpha = self.options.mean_period_update_rate;
        let mean_period = match track.mean_period_secs {
            None => delta_t,
            Some(mean) => mean * (1.0 - alpha) + delta_t * alpha,
        };
        track.mean_period_secs = Some(mean_period);

        let observed_velocity = delta_degs / delta_t;
        let update_rate =
            (mean_period / self.options.update_rate_seconds).min(self.options.max_update_rate);
        let blended =
            track.velocity_deg_per_s * (1.0 - update_rate) + observed_velocity * update_rate;
        let max_velocity = self.options.max_velocity;
        track.velocity_deg_per_s = if blended > 0.0 {
            blended.min(max_velocity)
        } else {
            blended.max(-max_velocity)
        };

        self.integrate(timestamp_us);
        Ok(())
    }

    /// Advance the camera to `timestamp_us` without a new observation.
    pub fn update_prediction(&mut self, timestamp_us: u64) -> SolverResult<()> {
        self.track_ref("update_prediction")?.check_advances(timestamp_us)?;
        self.integrate(timestamp_us);
        Ok(())
    }

    /// Whether an observation would be judged real motion, without applying it.
    ///
    /// Always `false` before the first observation.
    pub fn predict_motion_state(&self, position: i32, timestamp_us: u64) -> bool {
        let Some(track) = self.track.as_ref() else {
            return false;
        };
        let filtered_px = self
            .history
            .projected_median(Observation::new(timestamp_us, position))
            .unwrap_or(position);
        track
            .gate
            .decide(
                filtered_px,
                track.current_position_px,
                self.pixels_per_degree,
                track.moving,
            )
            .is_motion()
    }

    /// Rounded camera position.
    pub fn get_state(&self) -> SolverResult<i32> {
        Ok(round_px(self.track_ref("get_state")?.current_position_px))
    }

    /// Unrounded camera position.
    pub fn current_position_px(&self) -> SolverResult<f64> {
        Ok(self.track_ref("current_position_px")?.current_position_px)
    }

    /// Rounded position the camera is steering toward.
    pub fn get_target_position(&self) -> SolverResult<i32> {
        Ok(round_px(
            self.track_ref("get_target_position")?.target_position_px,
        ))
    }

    /// Force the camera position.
    ///
    /// The value is not clamped to the bounds: this is an explicit override,
    /// and the next integration step clamps if needed.
    pub fn set_state(&mut self, position: i32) -> SolverResult<()> {
        self.track_mut("set_state")?.current_position_px = f64::from(position);
        Ok(())
    }

    /// Drop the observation history, keeping camera state.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Replace the calibration used for all future deltas. History is not rescaled.
    pub fn update_pixels_per_degree(&mut self, pixels_per_degree: f64) -> SolverResult<()> {
        check_scale(pixels_per_degree)?;
        self.pixels_per_degree = pixels_per_degree;
        Ok(())
    }

    /// Install new output bounds, rescaling positions and history by the
    /// ratio of the new range to the old one.
    pub fn update_min_max_location(
        &mut self,
        min_location: i32,
        max_location: i32,
    ) -> SolverResult<()> {
        if self.track.is_none() {
            return Err(SolverError::NotInitialized {
                operation: "update_min_max_location",
            });
        }
        if min_location >= max_location {
            return Err(SolverError::InvalidBounds {
                min_location,
                max_location,
            });
        }

        let prior_distance = f64::from(self.max_location) - f64::from(self.min_location);
        let updated_distance = f64::from(max_location) - f64::from(min_location);
        let scale = updated_distance / prior_distance;
        let (lo, hi) = (f64::from(min_location), f64::from(max_location));

        self.history.rescale(scale);
        self.min_location = min_location;
        self.max_location = max_location;
        if let Some(track) = self.track.as_mut() {
            track.current_position_px = (track.current_position_px * scale).clamp(lo, hi);
            track.target_position_px = (track.target_position_px * scale).clamp(lo, hi);
        }

        tracing::debug!(min_location, max_location, scale, "rescaled solver bounds");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.track.is_some()
    }

    /// Whether the motion latch is set. `false` before the first observation.
    pub fn is_moving(&self) -> bool {
        self.track.as_ref().is_some_and(|t| t.moving)
    }

    /// Current velocity in degrees per second. Zero before the first observation.
    pub fn current_velocity(&self) -> f64 {
        self.track.as_ref().map_or(0.0, |t| t.velocity_deg_per_s)
    }

    /// Smoothed observation period, once two observations have been seen.
    pub fn mean_period_secs(&self) -> Option<f64> {
        self.track.as_ref().and_then(|t| t.mean_period_secs)
    }

    /// Last processed timestamp.
    pub fn current_time_us(&self) -> Option<u64> {
        self.track.as_ref().map(|t| t.current_time_us)
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min_location, self.max_location)
    }

    pub fn pixels_per_degree(&self) -> f64 {
        self.pixels_per_degree
    }

    pub fn options(&self) -> &KinematicOptions {
        &self.options
    }

    pub fn history(&self) -> &ObservationWindow {
        &self.history
    }

    fn initialize(&mut self, position: i32, timestamp_us: u64) -> SolverResult<()> {
        let threshold = self.options.validate()?;
        check_scale(self.pixels_per_degree)?;
        if self.min_location >= self.max_location {
            return Err(SolverError::config(format!(
                "min_location {} must be below max_location {}",
                self.min_location, self.max_location
            )));
        }

        let seeded = f64::from(position.clamp(self.min_location, self.max_location));
        self.history.push(Observation::new(timestamp_us, position));
        self.track = Some(TrackState {
            gate: MotionGate::new(threshold, self.options.reframe_window),
            current_position_px: seeded,
            target_position_px: seeded,
            velocity_deg_per_s: 0.0,
            moving: false,
            mean_period_secs: None,
            current_time_us: timestamp_us,
        });

        tracing::debug!(position, seeded, timestamp_us, "solver initialized");
        Ok(())
    }

    /// One integration step. Callers have already checked `timestamp_us`.
    fn integrate(&mut self, timestamp_us: u64) {
        let (min_px, max_px) = (f64::from(self.min_location), f64::from(self.max_location));
        let pixels_per_degree = self.pixels_per_degree;
        let Some(track) = self.track.as_mut() else {
            return;
        };

        let step_secs = track.mean_period_secs.unwrap_or(0.0);
        let candidate =
            track.current_position_px + track.velocity_deg_per_s * step_secs * pixels_per_degree;

        if candidate < min_px || candidate > max_px {
            let bound = if candidate < min_px { min_px } else { max_px };
            tracing::debug!(candidate, bound, "camera hit output bound");
            track.current_position_px = bound;
            track.velocity_deg_per_s = 0.0;
            track.moving = false;
        } else {
            track.current_position_px = candidate;
        }
        track.current_time_us = timestamp_us;

        tracing::trace!(
            timestamp_us,
            position = track.current_position_px,
            velocity = track.velocity_deg_per_s,
            "integrated"
        );
    }

    fn track_ref(&self, operation: &'static str) -> SolverResult<&TrackState> {
        self.track
            .as_ref()
            .ok_or(SolverError::NotInitialized { operation })
    }

    fn track_mut(&mut self, operation: &'static str) -> SolverResult<&mut TrackState> {
        self.track
            .as_mut()
            .ok_or(SolverError::NotInitialized { operation })
    }
}

fn check_scale(pixels_per_degree: f64) -> SolverResult<()> {
    if pixels_per_degree > 0.0 && pixels_per_degree.is_finite() {
        Ok(())
    } else {
        Err(SolverError::InvalidScale { pixels_per_degree })
    }
}

fn round_px(value: f64) -> i32 {
    value.round() as i32
}
