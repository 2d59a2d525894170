use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StatisticsFormatError;

pub const NO_STATISTICS: &str = "There are no statistics available for this player.";

/// Validated stat-name -> value mapping.
///
/// On the wire this is a JSON object; some rows store it as serialized text,
/// which is accepted on read and parsed with the same rules as form input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "BTreeMap<String, f64>")]
pub struct Statistics(BTreeMap<String, f64>);

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Pretty JSON for the edit form's text area.
    pub fn to_text(&self) -> String {
        if self.0.is_empty() {
            return "{}".to_string();
        }
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line per stat, or the empty-state message.
    pub fn describe(&self) -> String {
        if self.0.is_empty() {
            return NO_STATISTICS.to_string();
        }
        self.0
            .iter()
            .map(|(name, value)| format!("{name}: {}", format_stat(*value)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<(String, f64)> for Statistics {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Statistics> for BTreeMap<String, f64> {
    fn from(stats: Statistics) -> Self {
        stats.0
    }
}

impl TryFrom<Value> for Statistics {
    type Error = StatisticsFormatError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::String(text) if text.trim().is_empty() => Ok(Self::default()),
            Value::String(text) => parse_statistics(&text),
            other => from_value(other),
        }
    }
}

/// Parse the human-edited statistics text. Empty statistics are written `{}`.
pub fn parse_statistics(text: &str) -> Result<Statistics, StatisticsFormatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StatisticsFormatError {
            reason: "empty text, use {} for no statistics".to_string(),
        });
    }
    let value: Value = serde_json::from_str(trimmed).map_err(|err| StatisticsFormatError {
        reason: err.to_string(),
    })?;
    from_value(value)
}

fn from_value(value: Value) -> Result<Statistics, StatisticsFormatError> {
    let Value::Object(map) = value else {
        return Err(StatisticsFormatError {
            reason: "expected an object".to_string(),
        });
    };
    let mut stats = BTreeMap::new();
    for (name, value) in map {
        let Some(number) = value.as_f64() else {
            return Err(StatisticsFormatError {
                reason: format!("value for {name:?} is not a number"),
            });
        };
        stats.insert(name, number);
    }
    Ok(Statistics(stats))
}

fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
