use std::path::Path;

use anyhow::Context as _;
use blockfall_engine::GameConfig;
use blockfall_evaluator::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::util;

/// Contents of a configuration file: engine rules and automated player settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct BlockfallConfig {
    pub(crate) game: GameConfig,
    pub(crate) search: SearchConfig,
}

impl BlockfallConfig {
    /// Loads and validates a configuration file, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config: Self = util::read_json_file("config", path)?;
        config
            .search
            .validate()
            .with_context(|| format!("Invalid search config in {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let json = r#"{
            "game": { "board_size": { "width": 8, "height": 16 } },
            "search": { "lookahead": true }
        }"#;
        let config: BlockfallConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.game.board_size.width(), 8);
        assert_eq!(config.game.points_per_line, 100);
        assert!(config.search.lookahead);
        assert_eq!(config.search.weights, SearchConfig::default().weights);
    }

    #[test]
    fn test_too_small_board_is_rejected() {
        let json = r#"{ "game": { "board_size": { "width": 3, "height": 20 } } }"#;
        let err = serde_json::from_str::<BlockfallConfig>(json).unwrap_err();
        assert!(err.to_string().contains("at least 6 wide"), "{err}");
    }

    #[test]
    fn test_default_round_trip() {
        let json = serde_json::to_string(&BlockfallConfig::default()).unwrap();
        let config: BlockfallConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, BlockfallConfig::default());
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(BlockfallConfig::load(None).unwrap(), BlockfallConfig::default());
    }
}
