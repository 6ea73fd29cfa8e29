//! Simulation error types
//!
//! Nothing inside a frame is fatal. Systems report anomalies through
//! `SimError`, log them, and skip the affected effect for that frame.

use std::fmt;

use crate::sim::WeaponKind;

#[derive(Debug)]
pub enum SimError {
    /// A weapon behaviour updated without a stat record on its player.
    MissingWeaponStats { weapon: WeaponKind },

    /// Level-up was requested but the upgrade catalog is empty.
    EmptyUpgradeCatalog,

    /// No upgrade was eligible and the guaranteed fallback is missing.
    MissingFallbackUpgrade { id: &'static str },

    /// An upgrade choice index outside the current offer.
    InvalidUpgradeChoice { index: usize, offered: usize },

    /// An entity index was referenced after its removal.
    StaleEntity { index: usize, context: &'static str },

    /// Configuration could not be read or parsed.
    Config { source: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::MissingWeaponStats { weapon } => {
                write!(f, "weapon stats not found for '{}'", weapon.key())
            }
            SimError::EmptyUpgradeCatalog => write!(f, "upgrade catalog is empty"),
            SimError::MissingFallbackUpgrade { id } => {
                write!(f, "fallback upgrade '{id}' not found in catalog")
            }
            SimError::InvalidUpgradeChoice { index, offered } => {
                write!(f, "upgrade choice {index} out of range ({offered} offered)")
            }
            SimError::StaleEntity { index, context } => {
                write!(f, "entity at index {index} no longer exists ({context})")
            }
            SimError::Config { source } => write!(f, "configuration error: {source}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config {
            source: err.to_string(),
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Config {
            source: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::MissingWeaponStats {
            weapon: WeaponKind::Pulse,
        };
        assert_eq!(err.to_string(), "weapon stats not found for 'pulse'");

        let err = SimError::InvalidUpgradeChoice {
            index: 4,
            offered: 3,
        };
        assert!(err.to_string().contains("4"));
    }

    #[test]
    fn test_from_json_error() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: SimError = parse.unwrap_err().into();
        assert!(matches!(err, SimError::Config { .. }));
    }
}
