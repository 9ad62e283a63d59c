//! GPIO fan policy: when the case fan should spin for a given temperature.

/// Fan mode selected by the `gpio_fan_mode` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    AlwaysOn,
    Performance,
    Cool,
    Balanced,
    Quiet,
}

impl FanMode {
    /// Map the `gpio_fan_mode` index; unknown indexes fall back to
    /// [`FanMode::Quiet`].
    #[must_use]
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => Self::AlwaysOn,
            1 => Self::Performance,
            2 => Self::Cool,
            3 => Self::Balanced,
            _ => Self::Quiet,
        }
    }

    /// Temperature in °C at or above which the fan runs.
    #[must_use]
    pub fn threshold(self) -> f64 {
        match self {
            Self::AlwaysOn => f64::NEG_INFINITY,
            Self::Performance => 50.0,
            Self::Cool => 60.0,
            Self::Balanced => 67.5,
            Self::Quiet => 70.0,
        }
    }

    #[must_use]
    pub fn should_run(self, celsius: f64) -> bool {
        celsius >= self.threshold()
    }
}
