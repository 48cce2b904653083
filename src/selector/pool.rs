use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::backend::KeyInfoReport;

/// Credential rotation policy reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RotationStrategy {
    RoundRobin,
    Random,
    Weighted,
    /// Any name this client does not recognize, kept verbatim
    Other(String),
}

impl RotationStrategy {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "round-robin" | "round_robin" | "roundrobin" => Self::RoundRobin,
            "random" => Self::Random,
            "weighted" => Self::Weighted,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::RoundRobin => "round-robin",
            Self::Random => "random",
            Self::Weighted => "weighted",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RotationStrategy {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<RotationStrategy> for String {
    fn from(strategy: RotationStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl fmt::Display for RotationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential pool metadata for one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPoolEntry {
    pub model: String,
    pub key_count: usize,
    pub strategy: RotationStrategy,
}

/// Read-only mirror of the backend's per-model key pools
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPoolInfo {
    entries: BTreeMap<String, KeyPoolEntry>,
}

impl KeyPoolInfo {
    pub fn from_report(report: KeyInfoReport) -> Self {
        let entries = report
            .into_iter()
            .map(|(model, raw)| {
                let entry = KeyPoolEntry {
                    model: model.clone(),
                    key_count: usize::try_from(raw.key_count).unwrap_or(usize::MAX),
                    strategy: RotationStrategy::parse(&raw.strategy),
                };
                (model, entry)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, model: &str) -> Option<&KeyPoolEntry> {
        self.entries.get(model)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.entries.contains_key(model)
    }

    /// Key count for `model`, zero when unknown
    pub fn key_count(&self, model: &str) -> usize {
        self.get(model).map(|e| e.key_count).unwrap_or(0)
    }

    /// Model identifiers in sorted order
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::KeyPoolReport;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strategy_parse() {
        assert_eq!(RotationStrategy::parse("round-robin"), RotationStrategy::RoundRobin);
        assert_eq!(RotationStrategy::parse("Round_Robin"), RotationStrategy::RoundRobin);
        assert_eq!(RotationStrategy::parse("RANDOM"), RotationStrategy::Random);
        assert_eq!(RotationStrategy::parse("weighted"), RotationStrategy::Weighted);
        assert_eq!(
            RotationStrategy::parse("least-used"),
            RotationStrategy::Other("least-used".to_string())
        );
    }

    #[test]
    fn test_strategy_serde_uses_wire_names() {
        let json = serde_json::to_string(&RotationStrategy::RoundRobin).unwrap();
        assert_eq!(json, "\"round-robin\"");
        let parsed: RotationStrategy = serde_json::from_str("\"sticky\"").unwrap();
        assert_eq!(parsed, RotationStrategy::Other("sticky".into()));
    }

    #[test]
    fn test_from_report() {
        let mut report = KeyInfoReport::new();
        report.insert(
            "gemini-2.5-pro".to_string(),
            KeyPoolReport {
                key_count: 3,
                strategy: "round-robin".to_string(),
            },
        );
        report.insert(
            "gemini-2.5-flash".to_string(),
            KeyPoolReport {
                key_count: 0,
                strategy: "random".to_string(),
            },
        );

        let info = KeyPoolInfo::from_report(report);
        assert_eq!(info.len(), 2);
        assert_eq!(info.key_count("gemini-2.5-pro"), 3);
        assert_eq!(info.key_count("unknown-model"), 0);
        assert_eq!(
            info.models().collect::<Vec<_>>(),
            vec!["gemini-2.5-flash", "gemini-2.5-pro"]
        );
        assert_eq!(
            info.get("gemini-2.5-flash").map(|e| &e.strategy),
            Some(&RotationStrategy::Random)
        );
    }
}
