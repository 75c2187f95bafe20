use crate::{config::HandlerConfig, exception::Exception, metadata::Metadata};
use chrono::{NaiveDate, NaiveDateTime};
use std::{
    fmt::Write as _,
    io::Write as _,
    path::{Path, PathBuf},
};
use tracing::{debug, error};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const FILE_DATE_FORMAT: &str = "%Y%m%d";
pub const FILE_EXTENSION: &str = "txt";

/// `<prefix>-<YYYYMMDD>.txt`, one file per calendar day
pub fn file_name(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}-{}.{}",
        prefix,
        date.format(FILE_DATE_FORMAT),
        FILE_EXTENSION
    )
}

/// Formats a single crash report. Only the first cause of the exception is
/// included, deeper causes are dropped.
pub fn format_report(
    timestamp: NaiveDateTime,
    metadata: &Metadata,
    exception: &Exception,
) -> String {
    let mut report = String::with_capacity(2048);

    let _ = write!(report, "\r\n{}\n", timestamp.format(TIMESTAMP_FORMAT));

    for (key, value) in metadata {
        let _ = writeln!(report, "{} = {}", key, value);
    }

    report.push_str(&exception.stack_trace());

    // TODO: walk the whole cause chain once readers of existing crash files
    // can cope with more than one "Caused by" section
    if let Some(cause) = exception.cause() {
        report.push_str("Caused by: ");
        report.push_str(&cause.stack_trace());
    }

    report
}

/// Writable storage is a root that exists, is a directory and isn't read only
pub fn storage_available(root: &Path) -> bool {
    std::fs::metadata(root)
        .map(|md| md.is_dir() && !md.permissions().readonly())
        .unwrap_or(false)
}

/// Appends crash reports to dated files in the crash directory
#[derive(Clone, Debug)]
pub struct ReportWriter {
    storage_root: Option<PathBuf>,
    directory_name: String,
    prefix: String,
}

impl ReportWriter {
    pub fn new(config: &HandlerConfig) -> Self {
        Self {
            storage_root: config.storage_root.clone(),
            directory_name: config.directory_name.clone(),
            prefix: config.file_name_prefix.clone(),
        }
    }

    #[inline]
    pub fn file_name(&self, date: NaiveDate) -> String {
        file_name(&self.prefix, date)
    }

    /// Writes a report for `exception` timestamped with the current local
    /// time, see [`ReportWriter::write_at`]
    pub fn write(&self, metadata: &Metadata, exception: &Exception) -> String {
        self.write_at(chrono::Local::now().naive_local(), metadata, exception)
    }

    /// Appends the formatted report to the file for the day of `now` and
    /// returns that file's name. Nothing is written if there is no usable
    /// storage, and write failures are only logged, so the returned file
    /// may not exist.
    pub fn write_at(
        &self,
        now: NaiveDateTime,
        metadata: &Metadata,
        exception: &Exception,
    ) -> String {
        let file_name = self.file_name(now.date());

        let root = match &self.storage_root {
            Some(root) if storage_available(root) => root,
            _ => {
                debug!("no writable storage available, skipping crash report");
                return file_name;
            }
        };

        let report = format_report(now, metadata, exception);
        let dir = root.join(&self.directory_name);

        match append(&dir, &file_name, report.as_bytes()) {
            Ok(()) => {
                debug!(
                    "wrote {} bytes of crash report to {}",
                    report.len(),
                    dir.join(&file_name).display()
                );
            }
            Err(e) => {
                error!(
                    "an error occurred while writing crash report to '{}': {}",
                    dir.join(&file_name).display(),
                    e
                );
            }
        }

        file_name
    }
}

fn append(dir: &Path, file_name: &str, contents: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(file_name))?;

    file.write_all(contents)?;
    file.flush()
}
