//! Application configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! environment variables. Out-of-range values never abort startup: they are
//! logged and replaced with their defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{info, warn};

use crate::backend::domain::calendar::parse_timezone;
use crate::backend::domain::cycle::CycleDay;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_ENV: &str = "EXPENSES_CONFIG";
/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_DATA_ROOT: &str = "/app/data";
pub const DEFAULT_DATA_FILE: &str = "data.csv";
pub const DEFAULT_WEB_ADDRESS: &str = "0.0.0.0:8088";
pub const DEFAULT_MONTHLY_BUDGET: f64 = 12000.0;
pub const DEFAULT_RETENTION_DAYS: u32 = 30;
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Contents of the YAML file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_path: Option<String>,
    web_address: Option<String>,
    monthly_budget: Option<f64>,
    cycle_day: Option<i64>,
    timezone: Option<String>,
    backup_time: Option<String>,
    backup_timezone: Option<String>,
    backup_retention_days: Option<u32>,
    backup_dir: Option<String>,
    static_dir: Option<String>,
    mini_app_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backing CSV file; always absolute
    pub data_path: PathBuf,
    pub web_address: String,
    /// Default monthly budget before any runtime override
    pub monthly_budget: f64,
    pub cycle_day: CycleDay,
    /// Timezone that decides what "today" is
    pub timezone: Tz,
    pub backup_time: NaiveTime,
    pub backup_timezone: Tz,
    /// 0 keeps every backup
    pub backup_retention_days: u32,
    pub backup_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Mini app linked from the bot's welcome message
    pub mini_app_url: Option<String>,
}

impl AppConfig {
    /// Load the YAML file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let file = match config_file_path() {
            Some(path) => read_config_file(&path)?,
            None => ConfigFile::default(),
        };
        Ok(Self::resolve(file, |key| env::var(key).ok()))
    }

    fn resolve(file: ConfigFile, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env_value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_path = normalize_data_path(
            env_value("DATA_PATH")
                .or(file.data_path)
                .unwrap_or_else(|| format!("{DEFAULT_DATA_ROOT}/{DEFAULT_DATA_FILE}")),
        );

        let monthly_budget = match env_value("MONTHLY_BUDGET_RUB") {
            Some(raw) => raw.replace(',', ".").parse::<f64>().ok(),
            None => file.monthly_budget,
        };
        let monthly_budget = match monthly_budget {
            Some(budget) if budget.is_finite() && budget > 0.0 => budget,
            Some(budget) => {
                warn!("Monthly budget {} is not positive, using {}", budget, DEFAULT_MONTHLY_BUDGET);
                DEFAULT_MONTHLY_BUDGET
            }
            None => DEFAULT_MONTHLY_BUDGET,
        };

        let cycle_day = match env_value("SALARY_DAY") {
            Some(raw) => raw.parse::<i64>().map(CycleDay::or_default).unwrap_or_else(|_| {
                warn!("SALARY_DAY '{}' is not a number, using default", raw);
                CycleDay::default()
            }),
            None => file.cycle_day.map(CycleDay::or_default).unwrap_or_default(),
        };

        let timezone_name = env_value("DAILY_REPORT_TIMEZONE").or(file.timezone);
        let timezone = parse_timezone(timezone_name.as_deref().unwrap_or("UTC"));
        let backup_timezone = env_value("BACKUP_TIMEZONE")
            .or(file.backup_timezone)
            .map(|name| parse_timezone(&name))
            .unwrap_or(timezone);

        let backup_time = parse_backup_time(env_value("BACKUP_TIME").or(file.backup_time).as_deref());

        let backup_retention_days = match env_value("BACKUP_RETENTION_DAYS") {
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                warn!("BACKUP_RETENTION_DAYS '{}' is invalid, using {}", raw, DEFAULT_RETENTION_DAYS);
                DEFAULT_RETENTION_DAYS
            }),
            None => file.backup_retention_days.unwrap_or(DEFAULT_RETENTION_DAYS),
        };

        let backup_dir = env_value("BACKUP_DIR")
            .or(file.backup_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_backup_dir(&data_path));

        Self {
            web_address: env_value("WEB_ADDRESS")
                .or(file.web_address)
                .unwrap_or_else(|| DEFAULT_WEB_ADDRESS.to_string()),
            static_dir: env_value("STATIC_DIR")
                .or(file.static_dir)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            mini_app_url: env_value("MINI_APP_URL").or(file.mini_app_url).filter(|u| !u.is_empty()),
            data_path,
            monthly_budget,
            cycle_day,
            timezone,
            backup_time,
            backup_timezone,
            backup_retention_days,
            backup_dir,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(ConfigFile::default(), |_| None)
    }
}

fn config_file_path() -> Option<PathBuf> {
    match env::var_os(CONFIG_PATH_ENV) {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.exists().then_some(local)
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let file: ConfigFile = serde_yaml::from_str(&yaml)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    info!("⚙️ Loaded configuration from {}", path.display());
    Ok(file)
}

/// Relative data paths are placed under the container data root
fn normalize_data_path(raw: String) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        Path::new(DEFAULT_DATA_ROOT).join(path)
    }
}

fn default_backup_dir(data_path: &Path) -> PathBuf {
    data_path
        .parent()
        .map(|dir| dir.join("backups"))
        .unwrap_or_else(|| PathBuf::from("backups"))
}

fn parse_backup_time(raw: Option<&str>) -> NaiveTime {
    let default = NaiveTime::from_hms_opt(3, 0, 0).unwrap_or_default();
    match raw {
        None => default,
        Some(value) => NaiveTime::parse_from_str(value, "%H:%M").unwrap_or_else(|_| {
            warn!("Invalid BACKUP_TIME '{}', defaulting to 03:00", value);
            default
        }),
    }
}
