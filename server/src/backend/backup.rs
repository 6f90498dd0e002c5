//! Daily backups of the transaction file.
//!
//! Once at startup and then every day at a configured local time, the backing
//! CSV is copied to `<backup_dir>/YYYY-MM-DD.csv` and `latest.csv`. Dated copies
//! older than the retention window are deleted. Failures are logged and the
//! loop carries on.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::backend::config::AppConfig;
use crate::backend::domain::models::{format_date, parse_date};

pub const LATEST_BACKUP_FILE: &str = "latest.csv";

/// Where, when and how long to keep backups
#[derive(Debug, Clone)]
pub struct BackupSchedule {
    pub source: PathBuf,
    pub backup_dir: PathBuf,
    pub time_of_day: NaiveTime,
    pub timezone: Tz,
    /// 0 keeps every backup
    pub retention_days: u32,
}

impl BackupSchedule {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            source: config.data_path.clone(),
            backup_dir: config.backup_dir.clone(),
            time_of_day: config.backup_time,
            timezone: config.backup_timezone,
            retention_days: config.backup_retention_days,
        }
    }

    /// Back up now, on a blocking thread, logging the outcome
    pub async fn run_now(&self) {
        let schedule = self.clone();
        let today = Utc::now().with_timezone(&self.timezone).date_naive();

        let result = tokio::task::spawn_blocking(move || {
            backup_once(&schedule.source, &schedule.backup_dir, today, schedule.retention_days)
        })
        .await;

        match result {
            Ok(Ok(report)) => {
                info!("🗄️ Backup written to {}", report.path.display());
                for path in &report.pruned {
                    info!("🧹 Removed old backup {}", path.display());
                }
            }
            Ok(Err(e)) => error!(
                "Failed to back up {} to {}: {}",
                self.source.display(),
                self.backup_dir.display(),
                e
            ),
            Err(e) => error!("Backup task failed: {}", e),
        }
    }
}

/// Result of one backup run
#[derive(Debug, Clone, PartialEq)]
pub struct BackupReport {
    pub path: PathBuf,
    pub pruned: Vec<PathBuf>,
}

/// Back up immediately, then daily at the scheduled time until `shutdown` fires
pub async fn run_daily(schedule: BackupSchedule, mut shutdown: watch::Receiver<bool>) {
    if let Err(e) = fs::create_dir_all(&schedule.backup_dir) {
        error!(
            "Failed to create backup directory {}: {}",
            schedule.backup_dir.display(),
            e
        );
    }

    schedule.run_now().await;

    loop {
        let now = Utc::now().with_timezone(&schedule.timezone);
        let next = next_run_at(now, schedule.time_of_day);
        let wait = (next - now).to_std().unwrap_or_default();
        info!("🗄️ Next backup at {} ({})", next.to_rfc3339(), schedule.timezone);

        tokio::select! {
            _ = tokio::time::sleep(wait) => schedule.run_now().await,
            _ = shutdown.changed() => {
                info!("Backup loop stopping");
                return;
            }
        }
    }
}

/// First occurrence of `time_of_day` strictly after `now`, in `now`'s timezone
pub fn next_run_at(now: DateTime<Tz>, time_of_day: NaiveTime) -> DateTime<Tz> {
    let timezone = now.timezone();
    let mut date = now.date_naive();

    loop {
        // earliest() is None when the time falls into a DST gap that day
        if let Some(candidate) = timezone
            .from_local_datetime(&date.and_time(time_of_day))
            .earliest()
        {
            if candidate > now {
                return candidate;
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => return now,
        };
    }
}

/// Copy `source` to the dated backup for `today`, refresh `latest.csv`, prune
pub fn backup_once(
    source: &Path,
    backup_dir: &Path,
    today: NaiveDate,
    retention_days: u32,
) -> io::Result<BackupReport> {
    fs::create_dir_all(backup_dir)?;

    let file_name = format!("{}.csv", format_date(today));
    let path = backup_dir.join(&file_name);
    let temp_path = backup_dir.join(format!("{file_name}.tmp"));

    copy_synced(source, &temp_path)?;
    fs::rename(&temp_path, &path)?;

    if let Err(e) = fs::copy(&path, backup_dir.join(LATEST_BACKUP_FILE)) {
        warn!("Failed to refresh {}: {}", LATEST_BACKUP_FILE, e);
    }

    let pruned = if retention_days > 0 {
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(retention_days)))
            .unwrap_or(NaiveDate::MIN);
        prune(backup_dir, cutoff)?
    } else {
        Vec::new()
    };

    Ok(BackupReport { path, pruned })
}

/// Delete dated backups strictly older than `cutoff`
pub fn prune(backup_dir: &Path, cutoff: NaiveDate) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for entry in fs::read_dir(backup_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(date) = name
            .to_str()
            .and_then(|n| n.strip_suffix(".csv"))
            .and_then(parse_date)
        else {
            continue;
        };

        if date < cutoff {
            let path = entry.path();
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) => warn!("Failed to remove old backup {}: {}", path.display(), e),
            }
        }
    }

    removed.sort();
    Ok(removed)
}

fn copy_synced(source: &Path, destination: &Path) -> io::Result<()> {
    let mut input = File::open(source)?;
    let mut output = File::create(destination)?;
    io::copy(&mut input, &mut output)?;
    output.sync_all()
}
