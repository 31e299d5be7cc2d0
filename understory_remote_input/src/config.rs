// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine tuning: click window and drag threshold.

/// Tunables for [`DispatchEngine`](crate::engine::DispatchEngine).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Scale applied to [`pixel_drag_threshold`](Self::pixel_drag_threshold).
    ///
    /// Ray pointers jitter more than mice, so the screen-space threshold is enlarged.
    pub drag_threshold_multiplier: f32,
    /// Maximum seconds between presses on the same target that still count as a multi-click.
    pub click_speed: f64,
    /// Screen distance, in pixels, the pointer must travel from the press before a drag begins.
    pub pixel_drag_threshold: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drag_threshold_multiplier: 1.4,
            click_speed: 0.3,
            pixel_drag_threshold: 10.0,
        }
    }
}

impl EngineConfig {
    /// Check that every value is finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.click_speed.is_finite() && self.click_speed >= 0.0) {
            return Err(ConfigError::ClickSpeed(self.click_speed));
        }
        if !(self.pixel_drag_threshold.is_finite() && self.pixel_drag_threshold >= 0.0) {
            return Err(ConfigError::DragThreshold(self.pixel_drag_threshold));
        }
        if !(self.drag_threshold_multiplier.is_finite() && self.drag_threshold_multiplier >= 0.0) {
            return Err(ConfigError::DragThresholdMultiplier(
                self.drag_threshold_multiplier,
            ));
        }
        Ok(())
    }

    /// Effective drag threshold in pixels.
    pub fn drag_threshold(&self) -> f64 {
        f64::from(self.pixel_drag_threshold) * f64::from(self.drag_threshold_multiplier)
    }
}

/// Rejected [`EngineConfig`] value.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Click window is negative or not finite.
    #[error("click speed must be finite and non-negative, got {0}")]
    ClickSpeed(f64),
    /// Pixel drag threshold is negative or not finite.
    #[error("drag threshold must be finite and non-negative, got {0}")]
    DragThreshold(f32),
    /// Drag threshold multiplier is negative or not finite.
    #[error("drag threshold multiplier must be finite and non-negative, got {0}")]
    DragThresholdMultiplier(f32),
}
