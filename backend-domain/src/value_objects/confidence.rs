// Confidence value object

use serde::{Deserialize, Serialize};

/// Confidence level reported by the model. The prompt asks for
/// low | medium | high, but replies are not validated against that set:
/// anything else survives as `Other` instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Confidence {
    Low,
    Medium,
    High,
    Other(String),
}

impl Confidence {
    pub fn as_str(&self) -> &str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::Other(raw) => raw,
        }
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Other(String::new())
    }
}

impl From<String> for Confidence {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" => Confidence::Low,
            "medium" => Confidence::Medium,
            "high" => Confidence::High,
            _ => Confidence::Other(raw),
        }
    }
}

impl From<Confidence> for String {
    fn from(value: Confidence) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_decode_case_insensitively() {
        assert_eq!(Confidence::from("HIGH".to_string()), Confidence::High);
        assert_eq!(Confidence::from(" medium ".to_string()), Confidence::Medium);
        assert_eq!(Confidence::from("low".to_string()), Confidence::Low);
    }

    #[test]
    fn unexpected_values_survive_as_other() {
        let value = Confidence::from("very high".to_string());
        assert_eq!(value, Confidence::Other("very high".to_string()));
        assert_eq!(value.as_str(), "very high");
    }

    #[test]
    fn serde_round_trips_through_strings() {
        let decoded: Confidence = serde_json::from_str("\"high\"").expect("decode");
        assert_eq!(decoded, Confidence::High);
        assert_eq!(serde_json::to_string(&decoded).expect("encode"), "\"high\"");

        let unknown: Confidence = serde_json::from_str("\"certain\"").expect("decode unknown");
        assert_eq!(serde_json::to_string(&unknown).expect("encode unknown"), "\"certain\"");
    }
}
