//! Generic "rule -> record" hazard evaluation
//!
//! A hazard catalogue is a tagged enum where every variant carries its own
//! trigger predicate and severity tiering. Live weather alerts and disaster
//! alerts are two separate catalogues evaluated by the same machinery.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::ParseError;

/// Alert severity, in ascending order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Advisory,
    Watch,
    Warning,
    Danger,
    Critical,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 5] = [
        AlertSeverity::Advisory,
        AlertSeverity::Watch,
        AlertSeverity::Warning,
        AlertSeverity::Danger,
        AlertSeverity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Advisory => "advisory",
            AlertSeverity::Watch => "watch",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Danger => "danger",
            AlertSeverity::Critical => "critical",
        }
    }

    /// Position on the severity scale, 0 for advisory
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Whether field work should stop immediately
    pub fn is_urgent(&self) -> bool {
        *self >= AlertSeverity::Warning
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertSeverity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::new("alert severity", s))
    }
}

/// A fired hazard rule, before it is stamped with an id and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct Finding<K> {
    pub kind: K,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
}

/// A fixed set of independently evaluated threshold rules
pub trait HazardCatalogue: Copy + Sized + 'static {
    /// Readings the rules are evaluated against
    type Input;

    /// Rules in evaluation (and emission) order
    const CATALOGUE: &'static [Self];

    /// Stable wire name of the hazard type
    fn code(self) -> &'static str;

    /// Evaluate this rule; `None` when the trigger does not match
    fn assess(self, input: &Self::Input) -> Option<Finding<Self>>;
}

/// Evaluate every rule of a catalogue against one input.
///
/// Rules never interact, so several findings may come back for one input.
pub fn evaluate_catalogue<K: HazardCatalogue>(input: &K::Input) -> Vec<Finding<K>> {
    K::CATALOGUE
        .iter()
        .filter_map(|kind| kind.assess(input))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(AlertSeverity::Advisory < AlertSeverity::Watch);
        assert!(AlertSeverity::Watch < AlertSeverity::Warning);
        assert!(AlertSeverity::Warning < AlertSeverity::Danger);
        assert!(AlertSeverity::Danger < AlertSeverity::Critical);
        assert_eq!(AlertSeverity::Critical.rank(), 4);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("Critical".parse::<AlertSeverity>().unwrap(), AlertSeverity::Critical);
        assert_eq!("watch".parse::<AlertSeverity>().unwrap(), AlertSeverity::Watch);
        let err = "extreme".parse::<AlertSeverity>().unwrap_err();
        assert_eq!(err.to_string(), "unknown alert severity: extreme");
    }

    #[test]
    fn test_urgency() {
        assert!(!AlertSeverity::Watch.is_urgent());
        assert!(AlertSeverity::Warning.is_urgent());
        assert!(AlertSeverity::Critical.is_urgent());
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Toy {
        Hot,
        Wet,
    }

    impl HazardCatalogue for Toy {
        type Input = (f64, f64);
        const CATALOGUE: &'static [Self] = &[Toy::Hot, Toy::Wet];

        fn code(self) -> &'static str {
            match self {
                Toy::Hot => "hot",
                Toy::Wet => "wet",
            }
        }

        fn assess(self, input: &Self::Input) -> Option<Finding<Self>> {
            let fired = match self {
                Toy::Hot => input.0 > 30.0,
                Toy::Wet => input.1 > 10.0,
            };
            fired.then(|| Finding {
                kind: self,
                severity: AlertSeverity::Warning,
                title: self.code().to_string(),
                message: String::new(),
            })
        }
    }

    #[test]
    fn test_evaluate_catalogue_keeps_declaration_order() {
        let findings = evaluate_catalogue::<Toy>(&(35.0, 20.0));
        let kinds: Vec<Toy> = findings.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![Toy::Hot, Toy::Wet]);

        assert!(evaluate_catalogue::<Toy>(&(20.0, 5.0)).is_empty());
    }
}
