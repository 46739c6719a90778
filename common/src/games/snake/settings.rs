use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::grid::Grid;

pub const MIN_TICK_INTERVAL_MS: u32 = 50;
pub const MAX_TICK_INTERVAL_MS: u32 = 1000;
pub const MAX_SCORE_REWARD: u32 = 1_000_000;

/// Tick interval presets selectable before a round starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn tick_interval(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(300),
            Difficulty::Normal => Duration::from_millis(200),
            Difficulty::Hard => Duration::from_millis(100),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub cell_size: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    pub tick_interval_ms: u32,
    pub score_reward: u32,
    pub initial_snake_length: u32,
    pub max_food_attempts: u32,
    pub free_cell_sampling_threshold: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 30,
            grid_width: 600,
            grid_height: 600,
            tick_interval_ms: 200,
            score_reward: 10,
            initial_snake_length: 5,
            max_food_attempts: 100,
            free_cell_sampling_threshold: 0.5,
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cell_size == 0 {
            return Err("cell_size must be greater than 0".to_string());
        }
        if self.grid_width < self.cell_size || self.grid_height < self.cell_size {
            return Err("grid must be at least one cell in each dimension".to_string());
        }
        if self.grid_width > 10_000 || self.grid_height > 10_000 {
            return Err("grid dimensions must not exceed 10000".to_string());
        }
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(format!("tick_interval_ms must be at least {}", MIN_TICK_INTERVAL_MS));
        }
        if self.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(format!("tick_interval_ms must not exceed {}", MAX_TICK_INTERVAL_MS));
        }
        if self.score_reward == 0 {
            return Err("score_reward must be greater than 0".to_string());
        }
        if self.score_reward > MAX_SCORE_REWARD {
            return Err(format!("score_reward must not exceed {}", MAX_SCORE_REWARD));
        }
        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }
        let columns = self.grid_width / self.cell_size;
        if columns <= self.initial_snake_length {
            return Err(format!(
                "grid must have more than {} columns to fit the initial snake",
                self.initial_snake_length
            ));
        }
        if self.max_food_attempts == 0 {
            return Err("max_food_attempts must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.free_cell_sampling_threshold) {
            return Err("free_cell_sampling_threshold must be between 0 and 1".to_string());
        }
        Ok(())
    }
}

/// Resolved, validated form of [`GameConfig`] used by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub grid: Grid,
    pub tick_interval: Duration,
    pub score_reward: u32,
    pub initial_snake_length: usize,
    pub max_food_attempts: u32,
    pub free_cell_sampling_threshold: f32,
}

impl TryFrom<&GameConfig> for GameSettings {
    type Error = String;

    fn try_from(config: &GameConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        let grid = Grid::fit_viewport(
            config.cell_size as i32,
            config.grid_width as i32,
            config.grid_height as i32,
        )?;

        Ok(Self {
            grid,
            tick_interval: Duration::from_millis(config.tick_interval_ms as u64),
            score_reward: config.score_reward,
            initial_snake_length: config.initial_snake_length as usize,
            max_food_attempts: config.max_food_attempts,
            free_cell_sampling_threshold: config.free_cell_sampling_threshold,
        })
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid: Grid::new(30, 600, 600).expect("default grid is valid"),
            tick_interval: Difficulty::Normal.tick_interval(),
            score_reward: 10,
            initial_snake_length: 5,
            max_food_attempts: 100,
            free_cell_sampling_threshold: 0.5,
        }
    }
}
