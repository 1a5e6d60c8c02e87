#![forbid(unsafe_code)]

//! Sheet configuration: component options plus gesture/animation tunables.
//!
//! Every field defaults to the classic sheet behavior, so
//! `SheetConfig::default()` yields a 300 ms show/hide, a 70-unit safety
//! margin, a 20-unit upward overshoot cap and a 40-unit dismiss threshold.
//!
//! # Loading
//!
//! ```toml
//! # sheet.toml
//! animation_duration_ms = 250
//! dismiss_threshold = 60.0
//! dismiss_target = "viewport_edge"
//!
//! [style]
//! background_color_modal = "#1e1e2e"
//! close_icon = false
//! ```
//!
//! ```rust,ignore
//! let config = SheetConfig::from_toml_file("sheet.toml")?;
//! let config = SheetConfig::from_json_str(json)?;
//! ```
//!
//! Loaded configurations are validated; out-of-range values produce
//! [`SheetConfigError::Validation`] listing every problem at once.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use sheet_core::animation::Easing;

use super::style::SheetStyle;

/// Where the panel goes when it is hidden or dismissed.
///
/// The panel is mounted with its top edge on the bottom edge of the
/// viewport, so an offset of 0 is already fully off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum DismissTarget {
    /// Hidden offset is `+content_height`: the mirror of the shown offset.
    ///
    /// The default. The retract travels twice the content height, so the
    /// panel leaves the screen at the midpoint of the animation and keeps
    /// moving below it.
    #[default]
    MirrorContent,
    /// Hidden offset is `0`: the panel's mount position at the viewport edge.
    ViewportEdge,
}

impl DismissTarget {
    /// Offset the panel rests at while hidden.
    #[inline]
    pub fn hidden_offset(self, content_height: f64) -> f64 {
        match self {
            Self::MirrorContent => content_height,
            Self::ViewportEdge => 0.0,
        }
    }
}

/// Configuration for one bottom sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SheetConfig {
    /// Initial visibility request.
    pub visible: bool,
    /// Duration of show, hide and snap-back animations, in milliseconds.
    pub animation_duration_ms: u64,
    /// Easing of timed animations. Drag-follow updates are never eased.
    #[cfg_attr(feature = "config", serde(with = "easing_name"))]
    pub easing: Easing,
    /// Added to every measured content height.
    pub safety_margin: f64,
    /// How far above rest an upward drag may pull the panel.
    pub overshoot_cap: f64,
    /// Downward release displacement above which the sheet dismisses.
    pub dismiss_threshold: f64,
    /// Vertical slop before a press becomes a drag.
    pub drag_threshold: f64,
    /// Hidden-offset convention.
    pub dismiss_target: DismissTarget,
    /// Visual options.
    pub style: SheetStyle,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            visible: false,
            animation_duration_ms: 300,
            easing: Easing::EaseInOut,
            safety_margin: 70.0,
            overshoot_cap: 20.0,
            dismiss_threshold: 40.0,
            drag_threshold: 0.0,
            dismiss_target: DismissTarget::MirrorContent,
            style: SheetStyle::default(),
        }
    }
}

impl SheetConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial visibility flag.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the duration of timed animations.
    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the easing curve for timed animations.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the pixels added to each measured content height.
    pub fn safety_margin(mut self, margin: f64) -> Self {
        self.safety_margin = margin;
        self
    }

    /// Set how far the panel may be pulled above rest.
    pub fn overshoot_cap(mut self, cap: f64) -> Self {
        self.overshoot_cap = cap;
        self
    }

    /// Set the downward release distance that dismisses.
    pub fn dismiss_threshold(mut self, threshold: f64) -> Self {
        self.dismiss_threshold = threshold;
        self
    }

    /// Set the movement below which a press is not yet a drag.
    pub fn drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Set where the panel rests while hidden.
    pub fn dismiss_target(mut self, target: DismissTarget) -> Self {
        self.dismiss_target = target;
        self
    }

    /// Set the visual options.
    pub fn style(mut self, style: SheetStyle) -> Self {
        self.style = style;
        self
    }

    /// Duration of timed animations.
    #[inline]
    pub fn animation_duration_value(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.animation_duration_ms > 60_000 {
            errors.push(format!(
                "animation_duration_ms must be <= 60000, got {}",
                self.animation_duration_ms
            ));
        }

        let non_negative = [
            ("safety_margin", self.safety_margin),
            ("overshoot_cap", self.overshoot_cap),
            ("drag_threshold", self.drag_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }

        if !self.dismiss_threshold.is_finite() || self.dismiss_threshold <= 0.0 {
            errors.push(format!(
                "dismiss_threshold must be finite and > 0, got {}",
                self.dismiss_threshold
            ));
        }

        errors
    }

    fn validated(self) -> Result<Self, SheetConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SheetConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SheetConfigError> {
        let config: Self = toml::from_str(s).map_err(SheetConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, SheetConfigError> {
        let config: Self = serde_json::from_str(s).map_err(SheetConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check a programmatic configuration the same way loaded ones are.
    pub fn checked(self) -> Result<Self, SheetConfigError> {
        self.validated()
    }
}

#[cfg(feature = "config")]
mod easing_name {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use sheet_core::animation::Easing;

    pub fn serialize<S: Serializer>(easing: &Easing, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(easing.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Easing, D::Error> {
        let name = String::deserialize(deserializer)?;
        Easing::from_name(&name).ok_or_else(|| D::Error::custom(format!("unknown easing {name:?}")))
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a sheet configuration.
#[derive(Debug)]
pub enum SheetConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SheetConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SheetConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
