use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use retitle_model::RenameOutcome;

/// Append-only rename log. The file is opened, written and flushed per
/// entry; nothing is held open between items.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, outcome: &RenameOutcome) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", outcome.audit_line())?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retitle_model::RenameStatus;

    #[test]
    fn appends_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("rename.log"));

        log.append(&RenameOutcome::new("/m/a.mkv", "/m/b.mkv", RenameStatus::Renamed))
            .unwrap();
        log.append(
            &RenameOutcome::new("/m/c.mkv", "/m/d.mkv", RenameStatus::Failed)
                .with_detail("denied"),
        )
        .unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] RENAMED: /m/a.mkv -> /m/b.mkv"));
        assert!(lines[1].ends_with("] FAILED: /m/c.mkv -> /m/d.mkv (denied)"));
    }
}
