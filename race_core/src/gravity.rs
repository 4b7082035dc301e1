use crate::error::RaceError;

pub const GRAVITY_MIN: f64 = -20.0;
pub const GRAVITY_MAX: f64 = -2.0;
/// Quick-select values offered by the client.
pub const GRAVITY_PRESETS: [f64; 4] = [-2.0, -5.0, -9.82, -15.0];
/// Increment for keyboard nudges.
pub const GRAVITY_STEP: f64 = 0.5;

/// Vertical gravity component chosen in setup, always within
/// `[GRAVITY_MIN, GRAVITY_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySetting(f64);

impl GravitySetting {
    pub fn new(y: f64) -> Result<Self, RaceError> {
        if !y.is_finite() || !(GRAVITY_MIN..=GRAVITY_MAX).contains(&y) {
            return Err(RaceError::GravityOutOfRange(y));
        }
        Ok(Self(y))
    }

    /// Clamp into range. Non-finite input falls back to the strongest pull.
    pub fn clamped(y: f64) -> Self {
        if y.is_nan() {
            return Self(GRAVITY_MIN);
        }
        Self(y.clamp(GRAVITY_MIN, GRAVITY_MAX))
    }

    pub fn y(self) -> f64 {
        self.0
    }

    pub fn nudged(self, delta: f64) -> Self {
        Self::clamped(self.0 + delta)
    }
}
