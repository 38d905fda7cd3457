//! Per-run log file mirrored from the formatted tracing output.
//!
//! # Design
//! - The subscriber is installed before the output directory exists, so the
//!   file is attached later through a shared [`RunLog`] handle.
//! - Every formatted event is written to stderr and, once attached, appended
//!   to the run log; a failing file write never fails the stderr write.
//! - The first failed file write is announced once on stderr; later failures
//!   for the same file stay quiet.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use crate::error::{TelemetryError, TelemetryResult};

/// Handle to the optional per-run log file.
#[derive(Clone, Default)]
pub struct RunLog {
    slot: Arc<Mutex<Option<AttachedFile>>>,
}

struct AttachedFile {
    path: PathBuf,
    file: File,
    write_failed: bool,
}

impl AttachedFile {
    const fn new(path: PathBuf, file: File) -> Self {
        Self {
            path,
            file,
            write_failed: false,
        }
    }

    /// Append `buf`, returning the error only for the first failed write.
    fn append(&mut self, buf: &[u8]) -> Option<io::Error> {
        match self.file.write_all(buf) {
            Ok(()) => None,
            Err(_) if self.write_failed => None,
            Err(err) => {
                self.write_failed = true;
                Some(err)
            }
        }
    }
}

impl RunLog {
    /// Create a detached handle; output only reaches stderr until attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` in append mode and mirror subsequent log lines into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    pub fn attach(&self, path: &Path) -> TelemetryResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| TelemetryError::RunLogOpen {
                path: path.to_path_buf(),
                source,
            })?;
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(AttachedFile::new(path.to_path_buf(), file));
        Ok(())
    }

    /// Path of the attached log file, if any.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|attached| attached.path.clone())
    }

    /// Flush and stop mirroring into the file.
    pub fn detach(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(attached) = slot.as_mut() {
            let _ = attached.file.flush();
        }
        *slot = None;
    }

    pub(crate) fn make_writer(&self) -> RunLogMakeWriter {
        RunLogMakeWriter {
            log: self.clone(),
            mirror_stderr: true,
        }
    }

    fn append(&self, buf: &[u8]) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(attached) = slot.as_mut()
            && let Some(err) = attached.append(buf)
        {
            eprintln!(
                "run log write to {} failed, further lines are not persisted: {err}",
                attached.path.display()
            );
        }
    }
}

/// `tracing_subscriber` writer factory that tees into stderr and the run log.
#[derive(Clone)]
pub(crate) struct RunLogMakeWriter {
    log: RunLog,
    mirror_stderr: bool,
}

impl<'a> MakeWriter<'a> for RunLogMakeWriter {
    type Writer = RunLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RunLogWriter {
            log: self.log.clone(),
            stderr: self.mirror_stderr.then(io::stderr),
        }
    }
}

pub(crate) struct RunLogWriter {
    log: RunLog,
    stderr: Option<io::Stderr>,
}

impl Write for RunLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(stderr) = self.stderr.as_mut() {
            stderr.write_all(buf)?;
        }
        self.log.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(stderr) = self.stderr.as_mut() {
            stderr.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn file_only_writer(log: &RunLog) -> RunLogWriter {
        RunLogMakeWriter {
            log: log.clone(),
            mirror_stderr: false,
        }
        .make_writer()
    }

    #[test]
    fn writes_before_attach_are_not_persisted() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("logs.txt");
        let log = RunLog::new();

        file_only_writer(&log).write_all(b"early line\n")?;
        log.attach(&path)?;
        file_only_writer(&log).write_all(b"late line\n")?;
        log.detach();

        assert_eq!(fs::read_to_string(&path)?, "late line\n");
        Ok(())
    }

    #[test]
    fn attach_appends_to_existing_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("logs.txt");
        fs::write(&path, "previous run\n")?;

        let log = RunLog::new();
        log.attach(&path)?;
        assert_eq!(log.path(), Some(path.clone()));
        file_only_writer(&log).write_all(b"this run\n")?;
        log.detach();
        assert!(log.path().is_none());

        assert_eq!(fs::read_to_string(&path)?, "previous run\nthis run\n");
        Ok(())
    }

    #[test]
    fn failed_file_write_is_reported_once() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("logs.txt");
        fs::write(&path, "")?;
        let read_only = File::open(&path)?;
        let mut attached = AttachedFile::new(path, read_only);

        assert!(attached.append(b"first line\n").is_some());
        assert!(attached.append(b"second line\n").is_none());
        assert!(attached.write_failed);
        Ok(())
    }

    #[test]
    fn failed_file_write_does_not_fail_the_writer() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("logs.txt");
        fs::write(&path, "")?;
        let log = RunLog::new();
        *log.slot.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(AttachedFile::new(path.clone(), File::open(&path)?));

        file_only_writer(&log).write_all(b"line one\n")?;
        file_only_writer(&log).write_all(b"line two\n")?;

        let failed = log
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|attached| attached.write_failed);
        assert!(failed);
        assert_eq!(fs::read_to_string(&path)?, "");
        Ok(())
    }

    #[test]
    fn attach_reports_unopenable_path() {
        let log = RunLog::new();
        let result = log.attach(Path::new("/definitely/missing/dir/logs.txt"));
        assert!(matches!(result, Err(TelemetryError::RunLogOpen { .. })));
    }
}
