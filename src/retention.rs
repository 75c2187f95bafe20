use crate::report::FILE_DATE_FORMAT;
use chrono::{Days, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The oldest date that is kept. The sign of `retention_days` is ignored,
/// the window always reaches into the past.
pub fn cutoff_date(today: NaiveDate, retention_days: i64) -> NaiveDate {
    today
        .checked_sub_days(Days::new(retention_days.unsigned_abs()))
        .unwrap_or(NaiveDate::MIN)
}

/// Extracts the date from a file stem ending in `-YYYYMMDD`
pub fn file_date(file_stem: &str) -> Option<NaiveDate> {
    let (_, date) = file_stem.rsplit_once('-')?;

    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDate::parse_from_str(date, FILE_DATE_FORMAT).ok()
}

/// Removes crash files older than `retention_days` days from `dir`, relative
/// to the current local date
pub fn sweep(dir: &Path, retention_days: i64) -> Vec<PathBuf> {
    sweep_at(dir, retention_days, chrono::Local::now().date_naive())
}

/// Removes every file in `dir` whose name carries a date strictly older than
/// `today - |retention_days|`. Files without a date in their name are left
/// alone. Returns the paths that were removed.
pub fn sweep_at(dir: &Path, retention_days: i64, today: NaiveDate) -> Vec<PathBuf> {
    let cutoff = cutoff_date(today, retention_days);

    let rd = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("unable to read crash directory '{}': {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut removed = Vec::new();

    for entry in rd.filter_map(|e| e.ok()) {
        if !entry.file_type().map_or(false, |ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let date = match path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(file_date)
        {
            Some(date) => date,
            None => continue,
        };

        if date >= cutoff {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("removed expired crash file {}", path.display());
                removed.push(path);
            }
            Err(e) => {
                warn!("failed to remove crash file {}: {}", path.display(), e);
            }
        }
    }

    removed
}
