#![forbid(unsafe_code)]

/// Easing curve applied to animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Decelerating cubic.
    EaseOut,
    /// Accelerating cubic.
    EaseIn,
    /// Smooth S-curve.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    ///
    /// Input is clamped, so the output is always within [0.0, 1.0].
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }

    /// Stable lowercase name, used in config files and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseOut => "ease_out",
            Self::EaseIn => "ease_in",
            Self::EaseInOut => "ease_in_out",
        }
    }

    /// Parse a name produced by [`Easing::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "ease_out" => Some(Self::EaseOut),
            "ease_in" => Some(Self::EaseIn),
            "ease_in_out" => Some(Self::EaseInOut),
            _ => None,
        }
    }
}
