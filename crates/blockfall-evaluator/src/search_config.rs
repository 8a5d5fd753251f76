use serde::{Deserialize, Serialize};

use crate::{SearchConfigError, weights::StageWeights};

/// Settings of the automated player.
///
/// Missing fields take their default when deserialized, so a config file only needs the
/// values it changes.
///
/// # Example
///
/// ```
/// use blockfall_evaluator::SearchConfig;
///
/// let config: SearchConfig = serde_json::from_str(r#"{ "lookahead": true }"#).unwrap();
/// assert!(config.lookahead);
/// assert_eq!(config.no_move_penalty, 1000.0);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Weight table of the board heuristic.
    pub weights: StageWeights,
    /// Rank placements by the expected score of the following piece.
    pub lookahead: bool,
    /// Second-ply score of a piece kind that has no legal placement.
    pub no_move_penalty: f32,
    /// Subtracted from the score of a vertical I piece against a wall. Zero disables it.
    pub edge_i_bonus: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weights: StageWeights::default(),
            lookahead: false,
            no_move_penalty: 1000.0,
            edge_i_bonus: 0.3,
        }
    }
}

impl SearchConfig {
    /// Checks the scalar settings. The weight table is checked when it is built.
    pub fn validate(&self) -> Result<(), SearchConfigError> {
        for (name, value) in [
            ("no_move_penalty", self.no_move_penalty),
            ("edge_i_bonus", self.edge_i_bonus),
        ] {
            if !value.is_finite() {
                return Err(SearchConfigError::NonFiniteValue { name });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SearchConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let config = SearchConfig {
            no_move_penalty: f32::INFINITY,
            ..SearchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SearchConfigError::NonFiniteValue {
                name: "no_move_penalty"
            })
        );

        let config = SearchConfig {
            edge_i_bonus: f32::NAN,
            ..SearchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SearchConfigError::NonFiniteValue {
                name: "edge_i_bonus"
            })
        );
    }

    #[test]
    fn test_json_round_trip_keeps_weight_table() {
        let json = serde_json::to_string_pretty(&SearchConfig::default()).unwrap();
        assert!(json.contains("below_max_height"));
        let config: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_invalid_weight_table_fails_to_load() {
        let err = serde_json::from_str::<SearchConfig>(r#"{ "weights": [] }"#).unwrap_err();
        assert!(err.to_string().contains("at least one stage"), "{err}");
    }
}
