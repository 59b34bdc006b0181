//! Size-rotated file appender
//!
//! The active file is always at the configured path. Once writing the next
//! line would push it past the size limit, the file is shifted to `<path>.1`
//! (older backups move up to `<path>.2`, … and the oldest is deleted) and a
//! fresh file is opened.

use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One mebibyte, the unit `RotationPolicy::max_megabytes` is expressed in
pub const MEGABYTE: u64 = 1024 * 1024;

/// Default size threshold: 1000 MiB
pub const DEFAULT_MAX_MEGABYTES: u64 = 1000;

/// Configuration for the rotating file appender
///
/// # Examples
///
/// ```
/// use rust_logger_facade::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_megabytes(50)
///     .with_max_backups(7)
///     .with_compression(true);
/// assert_eq!(policy.max_bytes, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Rotate once the active file would exceed this many bytes
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep
    pub max_backup_files: usize,
    /// Gzip rotated files
    pub compress: bool,
    /// Hold an exclusive advisory lock on the active file
    pub lock_file: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_MEGABYTES * MEGABYTE,
            max_backup_files: 5,
            compress: false,
            lock_file: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_megabytes(mut self, megabytes: u64) -> Self {
        self.max_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_file_lock(mut self, enabled: bool) -> Self {
        self.lock_file = enabled;
        self
    }
}

/// File appender that rotates by size
///
/// # Examples
///
/// ```no_run
/// use rust_logger_facade::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_megabytes(100).with_max_backups(3);
/// let appender = RotatingFileAppender::with_policy("/var/log/svc.json", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileAppender {
    /// Create a rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create a rotating file appender with a custom policy
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created, opened, or locked
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_active(&base_path, policy.lock_file)?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    fn open_active(path: &Path, lock: bool) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        if lock && file.try_lock_exclusive().is_err() {
            return Err(LoggerError::file_lock(path.display().to_string()));
        }

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        self.current_size > 0 && self.current_size + incoming > self.policy.max_bytes
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        // Release the handle (and its lock) before renaming
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.policy.max_backup_files == 0 {
            fs::remove_file(&self.base_path).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to truncate log file: {}", e),
                )
            })?;
        } else {
            let oldest = self.backup_path(self.policy.max_backup_files);
            for candidate in [gz_path(&oldest), oldest] {
                if candidate.exists() {
                    if let Err(e) = fs::remove_file(&candidate) {
                        eprintln!(
                            "[LOGGER WARNING] Failed to remove oldest backup {}: {}",
                            candidate.display(),
                            e
                        );
                    }
                }
            }

            for i in (1..self.policy.max_backup_files).rev() {
                let old_path = self.backup_path(i);
                let new_path = self.backup_path(i + 1);
                let (from, to) = if gz_path(&old_path).exists() {
                    (gz_path(&old_path), gz_path(&new_path))
                } else {
                    (old_path, new_path)
                };
                if from.exists() {
                    fs::rename(&from, &to).map_err(|e| {
                        LoggerError::file_rotation(
                            from.display().to_string(),
                            format!("Failed to rotate backup files: {}", e),
                        )
                    })?;
                }
            }

            let backup = self.backup_path(1);
            if self.base_path.exists() {
                fs::rename(&self.base_path, &backup).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;

                if self.policy.compress {
                    compress_file(&backup)?;
                }
            }
        }

        let (file, size) = Self::open_active(&self.base_path, self.policy.lock_file)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;

        Ok(())
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, line: &str) -> Result<()> {
        let bytes_written = line.len() as u64 + 1;

        if self.should_rotate(bytes_written) {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.writer.is_none() {
                    let (file, size) = Self::open_active(&self.base_path, self.policy.lock_file)
                        .map_err(|reopen_err| {
                            eprintln!(
                                "[LOGGER ERROR] Failed to reopen log file after rotation failure: {}",
                                reopen_err
                            );
                            e
                        })?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                }

                // Let the file grow past the limit rather than retrying on every write
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;

        // Flushed per entry: a logger held in a static is never dropped
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to write log entry: {}", e),
                )
            })?;
        self.current_size += bytes_written;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz`, removing the original only once the
/// compressed copy is complete
fn compress_file(path: &Path) -> Result<()> {
    use std::io::BufReader;

    let gz = gz_path(path);
    let mut tmp = gz.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = (|| -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&tmp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        std::io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&tmp, &gz)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress '{}'", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }

    Ok(())
}
