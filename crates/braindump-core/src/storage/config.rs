//! TOML-based settings.
//!
//! ```toml
//! [guard]
//! enabled = false
//!
//! [meter]
//! enabled = false
//! goal_tpm = 500.0
//! window_ms = 1000
//! ```
//!
//! Loading never fails: the file is merged field by field over the
//! defaults, and anything missing or malformed keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Content guard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Typing-rate meter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Target types per minute; only scales the progress track.
    #[serde(default = "default_goal_tpm")]
    pub goal_tpm: f64,
    /// Sliding window length.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub meter: MeterConfig,
}

fn default_goal_tpm() -> f64 {
    500.0
}
fn default_window_ms() -> u64 {
    1_000
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            goal_tpm: default_goal_tpm(),
            window_ms: default_window_ms(),
        }
    }
}

impl Config {
    /// Parse settings, falling back to defaults for anything unusable.
    pub fn from_toml_lenient(content: &str) -> Self {
        let user = match content.parse::<toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable settings; using defaults");
                return Self::default();
            }
        };

        let mut merged = match toml::Value::try_from(Self::default()) {
            Ok(toml::Value::Table(table)) => table,
            _ => return Self::default(),
        };
        merge_over(&mut merged, &user, "");

        let mut cfg: Config = match toml::Value::Table(merged).try_into() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "settings did not deserialize; using defaults");
                return Self::default();
            }
        };
        cfg.sanitize();
        cfg
    }

    /// Replace out-of-range values with defaults.
    fn sanitize(&mut self) {
        if !(self.meter.goal_tpm.is_finite() && self.meter.goal_tpm > 0.0) {
            tracing::warn!(value = self.meter.goal_tpm, "meter.goal_tpm must be positive; using default");
            self.meter.goal_tpm = default_goal_tpm();
        }
        if self.meter.window_ms == 0 {
            tracing::warn!("meter.window_ms must be positive; using default");
            self.meter.window_ms = default_window_ms();
        }
    }

    /// Reject out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.meter.goal_tpm.is_finite() && self.meter.goal_tpm > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "meter.goal_tpm".into(),
                message: format!("must be a positive number, got {}", self.meter.goal_tpm),
            });
        }
        if self.meter.window_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "meter.window_ms".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent) = parent_path {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|e| invalid(e.to_string()))?,
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(invalid(format!("cannot parse '{value}' as number")));
                }
            }
            serde_json::Value::Object(_) => return Err(unknown()),
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Get a setting as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::Object(_) => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a setting by dot-separated key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// or is out of range. `self` is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// Overlay `user` onto `base`, keeping base values whose user counterpart
/// is missing or of a different type. Unknown user keys are dropped.
fn merge_over(base: &mut toml::Table, user: &toml::Table, prefix: &str) {
    for (key, base_value) in base.iter_mut() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let Some(user_value) = user.get(key) else {
            continue;
        };

        if let (toml::Value::Table(base_table), toml::Value::Table(user_table)) =
            (&mut *base_value, user_value)
        {
            merge_over(base_table, user_table, &path);
            continue;
        }

        match coerce_like(base_value, user_value) {
            Some(value) => *base_value = value,
            None => tracing::warn!(key = %path, "malformed setting; using default"),
        }
    }

    for key in user.keys().filter(|k| !base.contains_key(*k)) {
        tracing::debug!(key = %key, prefix, "ignoring unknown setting");
    }
}

fn coerce_like(base: &toml::Value, user: &toml::Value) -> Option<toml::Value> {
    use toml::Value;
    match (base, user) {
        // Unsigned fields default to non-negative integers.
        (Value::Integer(b), Value::Integer(u)) if *b >= 0 && *u < 0 => None,
        (Value::Boolean(_), Value::Boolean(_))
        | (Value::Integer(_), Value::Integer(_))
        | (Value::Float(_), Value::Float(_))
        | (Value::String(_), Value::String(_)) => Some(user.clone()),
        (Value::Float(_), Value::Integer(i)) => Some(Value::Float(*i as f64)),
        _ => None,
    }
}
