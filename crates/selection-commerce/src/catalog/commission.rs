//! Marketplace commission schedule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RUB price band used to pick a commission percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommissionTier {
    /// Up to the low boundary (1500 RUB by default).
    Low,
    /// Above low, up to the mid boundary (5000 RUB by default).
    #[default]
    Mid,
    /// Above the mid boundary.
    High,
}

impl CommissionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionTier::Low => "low",
            CommissionTier::Mid => "mid",
            CommissionTier::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(CommissionTier::Low),
            "mid" | "middle" => Some(CommissionTier::Mid),
            "high" => Some(CommissionTier::High),
            _ => None,
        }
    }
}

impl fmt::Display for CommissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commission percentages for each price tier, as published per category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CommissionRates {
    /// Percentage applied in the low tier.
    pub low: f64,
    /// Percentage applied in the mid tier.
    pub mid: f64,
    /// Percentage applied in the high tier.
    pub high: f64,
}

impl CommissionRates {
    pub fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }

    /// Same percentage in every tier.
    pub fn flat(percent: f64) -> Self {
        Self::new(percent, percent, percent)
    }

    /// Percentage for a tier.
    pub fn percent_for(&self, tier: CommissionTier) -> f64 {
        match tier {
            CommissionTier::Low => self.low,
            CommissionTier::Mid => self.mid,
            CommissionTier::High => self.high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_for_tier() {
        let rates = CommissionRates::new(12.0, 15.0, 18.0);
        assert_eq!(rates.percent_for(CommissionTier::Low), 12.0);
        assert_eq!(rates.percent_for(CommissionTier::Mid), 15.0);
        assert_eq!(rates.percent_for(CommissionTier::High), 18.0);
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!(CommissionTier::from_str("MID"), Some(CommissionTier::Mid));
        assert_eq!(CommissionTier::from_str("top"), None);
        assert_eq!(CommissionTier::default(), CommissionTier::Mid);
    }
}
