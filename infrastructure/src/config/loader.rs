//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "consensus-quorum";
const ENV_PREFIX: &str = "QUORUM_";
const PROJECT_FILES: [&str; 2] = ["quorum.toml", ".quorum.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `QUORUM_` environment variables, e.g. `QUORUM_CONSENSUS__STRATEGY=ranking`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./quorum.toml` or `./.quorum.toml`
    /// 4. Global config: `$XDG_CONFIG_HOME/consensus-quorum/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// The merged figment, before extraction
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/consensus-quorum/config.toml if set,
    /// otherwise falls back to ~/.config/consensus-quorum/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] {}* variables", ENV_PREFIX));

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:5}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./quorum.toml or ./.quorum.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use quorum_domain::{OutputFormat, Tier};

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.profiles.is_empty());
        assert_eq!(config.consensus.strategy, "voting");
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("consensus-quorum"));
    }

    #[test]
    fn test_project_file_and_env_merge() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "quorum.toml",
                r#"
[consensus]
strategy = "committee"
threshold = 0.75

[tier]
cheap = "fast"
"#,
            )?;
            jail.set_env("QUORUM_CONSENSUS__STRATEGY", "ranking");
            jail.set_env("QUORUM_OUTPUT__FORMAT", "json");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.consensus.strategy, "ranking");
            assert_eq!(config.consensus.threshold, 0.75);
            assert_eq!(config.tier.cheap.as_deref(), Some("fast"));
            assert_eq!(config.output.format, Some(OutputFormat::Json));
            assert_eq!(config.selector().profile_for(Tier::Cheap), "fast");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("quorum.toml", "[cache]\nttl_secs = 100\nkey_prefix_bytes = 64")?;
            jail.create_file("custom.toml", "[cache]\nttl_secs = 200")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.cache.ttl_secs, 200);
            assert_eq!(config.cache.key_prefix_bytes, 64);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("quorum.toml", "[cache]\nttl_secs = \"soon\"")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
