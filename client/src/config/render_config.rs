use serde::{Deserialize, Serialize};
use snake_common::config::Validate;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub snake_head: char,
    pub snake_body: char,
    pub food: char,
    pub empty: char,
    pub border: char,
    pub clear_screen: bool,
}

impl Validate for RenderConfig {
    fn validate(&self) -> Result<(), String> {
        let glyphs = [self.snake_head, self.snake_body, self.food, self.empty, self.border];
        for (i, a) in glyphs.iter().enumerate() {
            if glyphs[i + 1..].contains(a) {
                return Err(format!("render glyph '{}' is used twice", a));
            }
        }
        if glyphs.iter().any(|c| c.is_control()) {
            return Err("render glyphs must be printable".to_string());
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            snake_head: '@',
            snake_body: 'o',
            food: '*',
            empty: ' ',
            border: '#',
            clear_screen: true,
        }
    }
}
