//! Append-only log of forwarded subjects.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Writes one `[YYYY-mm-dd HH:MM:SS TZ] Forwarded: subject` line per send,
/// with the timestamp rendered in `tz`.
#[derive(Debug, Clone)]
pub struct ForwardLog {
    path: PathBuf,
    tz: Tz,
}

impl ForwardLog {
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, subject: &str, at: DateTime<Utc>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let line = format_line(subject, &at.with_timezone(&self.tz));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

fn format_line(subject: &str, at: &DateTime<Tz>) -> String {
    // Newlines in a subject would split the record.
    let subject = subject.replace(['\r', '\n'], " ");
    format!("[{}] Forwarded: {}", at.format("%Y-%m-%d %H:%M:%S %Z"), subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_format_line_eastern() {
        let at = Utc
            .with_ymd_and_hms(2024, 1, 3, 14, 15, 0)
            .unwrap()
            .with_timezone(&chrono_tz::US::Eastern);
        assert_eq!(
            format_line("7612345", &at),
            "[2024-01-03 09:15:00 EST] Forwarded: 7612345"
        );
    }

    #[test]
    fn test_format_line_flattens_newlines() {
        let at = Utc.with_ymd_and_hms(2024, 7, 3, 14, 15, 0).unwrap().with_timezone(&Tz::UTC);
        assert_eq!(
            format_line("a\r\nb", &at),
            "[2024-07-03 14:15:00 UTC] Forwarded: a  b"
        );
    }

    #[test]
    fn test_append_creates_and_appends() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("forwarded_emails.log");
        let log = ForwardLog::new(&path, Tz::UTC);

        let at = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
        log.append("7612345", at).unwrap();
        log.append("7698765", at).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Forwarded: 7612345"));
        assert!(lines[1].ends_with("Forwarded: 7698765"));
    }
}
