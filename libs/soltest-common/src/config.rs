// Environment configuration shared by the relay and the tester

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 12121;

/// `%s` placeholders are filled with the source path, then the artifact path
pub const DEFAULT_COMPILE_COMMAND: &str = "g++ -DLOCAL -Wall -Wextra -Wconversion -Wshadow -Wfloat-equal -Wno-unused-includes -Wno-unused-const-variable -Wno-sign-conversion -O2 -std=c++23 %s -o %s -lstdc++exp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub compile_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            compile_command: DEFAULT_COMPILE_COMMAND.to_string(),
        }
    }
}

impl Config {
    /// Load from `PORT` and `COMPILE_COMMAND`, empty values fall back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("PORT").ok(),
            std::env::var("COMPILE_COMMAND").ok(),
        )
    }

    fn from_vars(
        port: Option<String>,
        compile_command: Option<String>,
    ) -> Result<Self, ConfigError> {
        let port = match port.filter(|p| !p.trim().is_empty()) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let compile_command = compile_command
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COMPILE_COMMAND.to_string());

        Ok(Self {
            port,
            compile_command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_vars(None, None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config = Config::from_vars(Some("".to_string()), Some("  ".to_string())).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.compile_command, DEFAULT_COMPILE_COMMAND);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(
            Some("8080".to_string()),
            Some("clang++ %s -o %s".to_string()),
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.compile_command, "clang++ %s -o %s");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_vars(Some("http".to_string()), None).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for PORT: \"http\"");
    }
}
