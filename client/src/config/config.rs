use serde::{Deserialize, Serialize};
use snake_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use snake_common::games::snake::{Difficulty, GameConfig};

use super::RenderConfig;

const CONFIG_FILE_NAME: &str = "snake_client_config.yaml";

fn get_config_path() -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME).to_string_lossy().into_owned();
    }
    CONFIG_FILE_NAME.to_string()
}

pub fn get_config_manager(
    path: Option<&str>,
) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    match path {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(&get_config_path()),
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    /// Overrides `game.tick_interval_ms` when set.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub render: RenderConfig,
}

impl Config {
    /// Game config with the difficulty preset folded in.
    pub fn effective_game_config(&self) -> GameConfig {
        let mut game = self.game.clone();
        if let Some(difficulty) = self.difficulty {
            game.tick_interval_ms = difficulty.tick_interval().as_millis() as u32;
        }
        game
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.effective_game_config().validate()?;
        self.render.validate()?;
        Ok(())
    }
}
