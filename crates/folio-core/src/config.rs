#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Captures every tunable of the behavior layer as a single [`FolioConfig`]
//! that can be loaded from JSON or TOML, so a page can retune timings or
//! point the contact form at a different email service without a rebuild.
//!
//! ```toml
//! [email]
//! owner_name = "Taher Sadabar"
//!
//! [feedback]
//! notification_display_ms = 3000
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the value the page ships with, so
//! `FolioConfig::default()` produces the stock behavior.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::observer::{ObserverOptions, RootMargin};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub observers: ObserverConfig,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub feedback: FeedbackConfig,
    pub email: EmailConfig,
    pub theme: ThemeConfig,
    pub nav: NavConfig,
    pub scroll: ScrollConfig,
    pub decor: DecorConfig,
}

impl FolioConfig {
    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, options) in [
            ("observers.reveal", &self.observers.reveal),
            ("observers.strict", &self.observers.strict),
        ] {
            if !(0.0..=1.0).contains(&options.threshold) {
                errors.push(format!(
                    "{name}.threshold must be in [0, 1], got {}",
                    options.threshold
                ));
            }
        }

        if self.counter.steps == 0 {
            errors.push("counter.steps must be > 0".into());
        }

        if self.feedback.notification_display_ms < self.feedback.notification_fade_in_ms {
            errors.push(format!(
                "feedback.notification_display_ms ({}) must be >= notification_fade_in_ms ({})",
                self.feedback.notification_display_ms, self.feedback.notification_fade_in_ms
            ));
        }

        for (name, value) in [
            ("email.service_id", &self.email.service_id),
            ("email.template_id", &self.email.template_id),
            ("email.owner_name", &self.email.owner_name),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        if self.scroll.parallax_factor < 0.0 {
            errors.push(format!(
                "scroll.parallax_factor must be >= 0, got {}",
                self.scroll.parallax_factor
            ));
        }

        errors
    }
}

/// Visibility observer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Reveal set observer.
    pub reveal: ObserverOptions,
    /// Skill bars and counters.
    pub strict: ObserverOptions,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            reveal: ObserverOptions {
                threshold: 0.1,
                root_margin: RootMargin {
                    bottom: -50.0,
                    ..RootMargin::default()
                },
            },
            strict: ObserverOptions {
                threshold: 0.5,
                root_margin: RootMargin::default(),
            },
        }
    }
}

/// Entrance animation for the reveal set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub offset_px: f64,
    pub duration_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            offset_px: 30.0,
            duration_ms: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Nominal frames per ramp; the per-frame increment is `target / steps`.
    pub steps: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self { steps: 50 }
    }
}

/// Status panel and floating notification timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub status_hide_ms: u64,
    pub notification_fade_in_ms: u64,
    pub notification_display_ms: u64,
    pub notification_fade_out_ms: u64,
}

impl FeedbackConfig {
    #[must_use]
    pub fn status_hide(&self) -> Duration {
        Duration::from_millis(self.status_hide_ms)
    }

    #[must_use]
    pub fn notification_fade_in(&self) -> Duration {
        Duration::from_millis(self.notification_fade_in_ms)
    }

    #[must_use]
    pub fn notification_display(&self) -> Duration {
        Duration::from_millis(self.notification_display_ms)
    }

    /// Time from creation until the notification is detached.
    #[must_use]
    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_display_ms + self.notification_fade_out_ms)
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            status_hide_ms: 5000,
            notification_fade_in_ms: 100,
            notification_display_ms: 3000,
            notification_fade_out_ms: 300,
        }
    }
}

/// Transactional email service identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
    /// Recipient name sent as `to_name`.
    pub owner_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            public_key: "6123VDeliZNwqi0j-".into(),
            service_id: "service_kc6geff".into(),
            template_id: "template_b93bps6".into(),
            owner_name: "Taher Sadabar".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub transition_ms: u64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".into(),
            transition_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Distance below the scroll top used to pick the active section.
    pub active_probe_px: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            active_probe_px: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Scroll top beyond which the nav gets the `scrolled` class.
    pub scrolled_threshold_px: f64,
    /// Scroll top beyond which scrolling down hides the nav.
    pub hide_threshold_px: f64,
    pub parallax_factor: f64,
    pub parallax_base_speed: f64,
    pub parallax_speed_step: f64,
    /// Minimum interval between scroll-driven evaluations.
    pub throttle_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: 50.0,
            hide_threshold_px: 100.0,
            parallax_factor: 0.5,
            parallax_base_speed: 0.2,
            parallax_speed_step: 0.1,
            throttle_ms: 16,
        }
    }
}

/// Decorative handler timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    pub ripple_ms: u64,
    pub pulse_ms: u64,
    pub easter_egg_ms: u64,
    pub mailto_feedback_ms: u64,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            ripple_ms: 600,
            pulse_ms: 300,
            easter_egg_ms: 5000,
            mailto_feedback_ms: 2000,
        }
    }
}
