use anchor_core::{Checkpoints, Network};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_dir: String,
    pub network: Network,
    /// Enforce hardcoded checkpoints (the `checkpoints` option)
    pub checkpoints: bool,
}

impl Config {
    fn expand_path(path: &str) -> PathBuf {
        let expanded = shellexpand::tilde(path);
        PathBuf::from(expanded.into_owned())
    }

    fn home_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Compute the default data directory depending on the target OS.
    fn default_data_dir() -> String {
        let home = Self::home_dir();

        if cfg!(target_os = "windows") {
            let base = dirs::data_dir().unwrap_or(home).join("Anchor");
            return base.join("data").to_string_lossy().into_owned();
        }

        home.join(".anchor")
            .join("data")
            .to_string_lossy()
            .into_owned()
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join(".anchor/config.json")
    }

    /// Data directory with tilde expansion applied.
    pub fn data_dir_resolved(&self) -> PathBuf {
        Self::expand_path(&self.data_dir)
    }

    /// Checkpoint policy for the configured network and switch.
    pub fn checkpoint_policy(&self) -> Checkpoints<'static> {
        Checkpoints::for_network(self.network, self.checkpoints)
    }

    /// Load from the default path, writing a default file first if none exists.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            log::info!(
                "Configuration file not found. Creating default configuration: {:?}",
                path
            );
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {:?}", path))?;
        serde_json::from_str(&data)
            .with_context(|| format!("configuration file format error in {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {:?}", path))?;
        Ok(())
    }

    /// Update one key in memory. Call `save` to persist.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => self.data_dir = value.to_string(),
            "network" => self.network = value.parse().map_err(|e: String| anyhow!(e))?,
            "checkpoints" => {
                self.checkpoints = value
                    .parse::<bool>()
                    .with_context(|| format!("checkpoints must be true or false, got {}", value))?
            }
            _ => return Err(anyhow!("Unknown configuration key: {}", key)),
        }
        log::debug!("{} = {} set", key, value);
        Ok(())
    }

    pub fn view(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn init_default() -> Result<PathBuf> {
        let path = Self::default_path();
        Self::default().save_to(&path)?;
        Ok(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            network: Network::Main,
            checkpoints: true,
        }
    }
}
