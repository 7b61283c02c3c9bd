//! Server configuration.

use std::env;

use similarity::{DEFAULT_MIN_COMMON_INGREDIENTS, MatchStrategy};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL.
    pub database_url: String,
    /// Log level.
    pub log_level: String,
    /// Matching strategy name. Unknown names fall back to the default
    /// ingredient-overlap strategy.
    pub match_strategy: String,
    /// Shared-ingredient threshold for the ingredient-overlap strategy.
    pub min_common_ingredients: usize,
}

impl Config {
    /// Loads configuration from environment variables. Missing or malformed
    /// values fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: env::var("RECETARIO_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("RECETARIO_SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:recetario.db?mode=rwc".to_string()),
            log_level: env::var("RECETARIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            match_strategy: env::var("RECETARIO_MATCH_STRATEGY")
                .unwrap_or_else(|_| "ingredient_overlap".to_string()),
            min_common_ingredients: env::var("RECETARIO_MIN_COMMON_INGREDIENTS")
                .unwrap_or_else(|_| DEFAULT_MIN_COMMON_INGREDIENTS.to_string())
                .parse()
                .unwrap_or(DEFAULT_MIN_COMMON_INGREDIENTS),
        }
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves the configured matching strategy.
    pub fn match_strategy(&self) -> MatchStrategy {
        MatchStrategy::from_name(&self.match_strategy, self.min_common_ingredients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::remove_var("RECETARIO_MATCH_STRATEGY");
            env::remove_var("RECETARIO_MIN_COMMON_INGREDIENTS");
        }

        let config = Config::from_env();
        assert_eq!(config.min_common_ingredients, 2);
        assert_eq!(
            config.match_strategy(),
            MatchStrategy::IngredientOverlap { min_common: 2 }
        );
    }
}
