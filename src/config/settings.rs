use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_location_name() -> String {
    "Kolkata".to_string()
}
fn default_latitude() -> f64 {
    22.5726
}
fn default_longitude() -> f64 {
    88.3639
}
fn default_calc_method() -> String {
    "UmmAlQura".to_string()
}
fn default_madhab() -> String {
    "Hanafi".to_string()
}
fn default_timezone_offset() -> i32 {
    330
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_weekly_target() -> u32 {
    35
}
fn default_monthly_target() -> u32 {
    140
}
fn default_true() -> bool {
    true
}

/// Where the user is. This is the whole of the location provider:
/// coordinates come from setup, not from a geolocation service, and the
/// core never refreshes them on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalahConfig {
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    /// Minutes east of UTC.
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32,
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for SalahConfig {
    fn default() -> Self {
        Self {
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            timezone_offset: default_timezone_offset(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

/// Completion goals shown in stats views. Targets are configured;
/// capacity denominators are always derived from range statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_weekly_target")]
    pub weekly_target: u32,
    #[serde(default = "default_monthly_target")]
    pub monthly_target: u32,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            weekly_target: default_weekly_target(),
            monthly_target: default_monthly_target(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhikrConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for DhikrConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub salah: SalahConfig,
    #[serde(default)]
    pub goals: GoalsConfig,
    #[serde(default)]
    pub dhikr: DhikrConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "qiyam").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("qiyam.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            "[location]\nname = \"Dhaka\"\nlatitude = 23.8103\nlongitude = 90.4125\n",
        )
        .unwrap();
        assert_eq!(config.location.name, "Dhaka");
        assert_eq!(config.salah.calc_method, "UmmAlQura");
        assert_eq!(config.goals.weekly_target, 35);
        assert!(config.dhikr.enabled);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.location.latitude, config.location.latitude);
        assert_eq!(back.salah.timezone_offset, 330);
    }
}
