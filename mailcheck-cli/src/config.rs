use anyhow::{Context, Result};
use config::{Config, ConfigError, File};
use extractors::LocalizationContext;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"
[localization]
locale = "en_US"
# Flat or nested `key = "text"` table layered over the English labels
# bundle_path = "/path/to/de_DE.toml"

[output]
pretty = true
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CliConfig {
    pub localization: Option<LocalizationConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocalizationConfig {
    pub locale: String,
    pub bundle_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl CliConfig {
    /// Load the config file, writing the commented defaults first when it does
    /// not exist yet
    pub fn load(path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()?;

        builder.try_deserialize()
    }

    pub fn pretty_output(&self) -> bool {
        self.output.as_ref().map(|o| o.pretty).unwrap_or(true)
    }

    /// Localization context for the configured locale and bundle
    pub fn localization_context(&self) -> Result<LocalizationContext> {
        let Some(localization) = &self.localization else {
            return Ok(LocalizationContext::english());
        };

        match &localization.bundle_path {
            Some(bundle_path) => {
                let bundle = std::fs::read_to_string(bundle_path).with_context(|| {
                    format!("Failed to read localization bundle at {:?}", bundle_path)
                })?;
                let context = LocalizationContext::from_toml_str(&localization.locale, &bundle)?;
                tracing::info!(
                    locale = context.locale(),
                    "Loaded localization bundle from {:?}",
                    bundle_path
                );
                Ok(context)
            }
            None => Ok(LocalizationContext::english()),
        }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("mailcheck").join("cli.toml")
    } else {
        PathBuf::from("cli.toml")
    }
}
