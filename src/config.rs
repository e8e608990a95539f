//! Engine configuration: command delay bounds, retry interval, and the combat
//! feature toggles.
//!
//! The configuration is a plain key/value record. Keys the engine does not
//! know about (UI preferences and the like) are kept in [`Config::extra`] so a
//! load/save round-trip never drops them.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Lower bound of the random command delay when the configured one is unusable.
pub const DEFAULT_COMMAND_DELAY_MIN_MS: u64 = 900;
/// Upper bound of the random command delay when the configured one is unusable.
pub const DEFAULT_COMMAND_DELAY_MAX_MS: u64 = 1100;
/// Watchdog retry threshold when neither the step nor the config sets one.
pub const DEFAULT_COMMAND_RETRY_MS: u64 = 60_000;
/// The watchdog never ticks faster than this.
pub const MIN_WATCHDOG_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, deserialize_with = "lenient_ms", skip_serializing_if = "Option::is_none")]
    pub command_delay_min: Option<u64>,

    #[serde(default, deserialize_with = "lenient_ms", skip_serializing_if = "Option::is_none")]
    pub command_delay_max: Option<u64>,

    #[serde(default, deserialize_with = "lenient_ms", skip_serializing_if = "Option::is_none")]
    pub command_retry_ms: Option<u64>,

    /// Rise with `brise` instead of `stand` after being knocked down.
    #[serde(default)]
    pub use_backwards_rise_to_stand: bool,

    /// Close distance with `advance` instead of `engage`.
    #[serde(default)]
    pub use_melee_advance: bool,

    /// Close distance with [`Config::custom_approach_command`]. Wins over melee advance.
    #[serde(default)]
    pub use_custom_approach: bool,

    #[serde(default)]
    pub custom_approach_command: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    /// The `(min, max)` delay range in milliseconds.
    ///
    /// Falls back to the defaults for any bound that is missing, and for both
    /// bounds when the range is empty or inverted.
    pub fn delay_bounds(&self) -> (u64, u64) {
        let min = self.command_delay_min.unwrap_or(DEFAULT_COMMAND_DELAY_MIN_MS);
        let max = self.command_delay_max.unwrap_or(DEFAULT_COMMAND_DELAY_MAX_MS);
        if max <= min {
            return (DEFAULT_COMMAND_DELAY_MIN_MS, DEFAULT_COMMAND_DELAY_MAX_MS);
        }
        (min, max)
    }

    /// A randomized command delay: uniform in `[min, max)` plus `additional`.
    pub fn command_delay(&self, additional: Duration) -> Duration {
        let (min, max) = self.delay_bounds();
        let ms = rand::thread_rng().gen_range(min..max);
        Duration::from_millis(ms) + additional
    }

    /// Global watchdog retry threshold. Zero disables the watchdog.
    pub fn command_retry(&self) -> Duration {
        Duration::from_millis(self.command_retry_ms.unwrap_or(DEFAULT_COMMAND_RETRY_MS))
    }

    /// How often the watchdog checks for a stalled sequence.
    pub fn watchdog_interval(&self) -> Duration {
        let max = self
            .command_delay_max
            .unwrap_or(DEFAULT_COMMAND_DELAY_MAX_MS)
            .max(MIN_WATCHDOG_INTERVAL_MS);
        Duration::from_millis(max)
    }

    /// The approach verb used when the target is out of melee range.
    pub fn approach_verb(&self) -> &str {
        if self.use_custom_approach && !self.custom_approach_command.trim().is_empty() {
            self.custom_approach_command.trim()
        } else if self.use_melee_advance {
            "advance"
        } else {
            "engage"
        }
    }

    pub fn stand_command(&self) -> &'static str {
        if self.use_backwards_rise_to_stand {
            "brise"
        } else {
            "stand"
        }
    }
}

/// Accept a millisecond value written either as a number or as a string of
/// digits. Anything else (negative, fractional, free text, null) reads as
/// unset so callers fall back to their defaults.
pub(crate) fn lenient_ms<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    })
}
