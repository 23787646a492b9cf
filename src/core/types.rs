use serde::{Deserialize, Serialize};

/// Unique, case-sensitive identifier of a symptom (e.g. `G001`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymptomId(pub String);

impl SymptomId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SymptomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SymptomId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Default minimum match percentage
pub const DEFAULT_THRESHOLD: f64 = 20.0;

/// Minimum percentage (inclusive) a disease must reach to count as matched.
///
/// Always within `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Threshold(f64);

impl Threshold {
    /// Create a threshold, rejecting values outside `0..=100` and NaN
    pub fn new(percent: f64) -> Option<Self> {
        if (0.0..=100.0).contains(&percent) {
            Some(Self(percent))
        } else {
            None
        }
    }

    /// Create a threshold, clamping out-of-range values into `0..=100`.
    /// NaN falls back to the default.
    #[must_use]
    pub fn clamped(percent: f64) -> Self {
        if percent.is_nan() {
            Self::default()
        } else {
            Self(percent.clamp(0.0, 100.0))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Inclusive comparison: a percentage exactly at the threshold is accepted
    #[must_use]
    pub fn accepts(self, percentage: f64) -> bool {
        percentage >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_range() {
        assert!(Threshold::new(0.0).is_some());
        assert!(Threshold::new(100.0).is_some());
        assert!(Threshold::new(-0.1).is_none());
        assert!(Threshold::new(100.01).is_none());
        assert!(Threshold::new(f64::NAN).is_none());
    }

    #[test]
    fn test_threshold_clamped() {
        assert!((Threshold::clamped(150.0).value() - 100.0).abs() < f64::EPSILON);
        assert!((Threshold::clamped(-5.0).value() - 0.0).abs() < f64::EPSILON);
        assert!((Threshold::clamped(f64::NAN).value() - DEFAULT_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let threshold = Threshold::new(50.0).unwrap();
        assert!(threshold.accepts(50.0));
        assert!(threshold.accepts(75.0));
        assert!(!threshold.accepts(49.99));
    }

    #[test]
    fn test_symptom_id_serializes_as_string() {
        let id = SymptomId::new("G001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"G001\"");
        let back: SymptomId = serde_json::from_str("\"G001\"").unwrap();
        assert_eq!(back, id);
    }
}
