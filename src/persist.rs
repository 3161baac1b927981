//! File publishing helpers shared by the state stores and the report.
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Write `bytes` to a temp file beside `dest`, then rename it into place.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("stage {}", dest.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("write {}", dest.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", dest.display()))?;
    tmp.persist(dest)
        .map_err(|err| err.error)
        .with_context(|| format!("publish {}", dest.display()))?;
    Ok(())
}

pub fn write_json_atomic<T: serde::Serialize>(dest: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .with_context(|| format!("serialize {}", dest.display()))?;
    bytes.push(b'\n');
    write_atomic(dest, &bytes)
}

/// Copy an unreadable state file aside so a fresh start does not lose it.
pub fn backup_corrupt(path: &Path) -> Result<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("compute timestamp")?
        .as_millis();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("state");
    let backup = path.with_file_name(format!("{file_name}.corrupt-{stamp}"));
    fs::copy(path, &backup).with_context(|| format!("back up {}", path.display()))?;
    Ok(backup)
}

/// Load JSON state, treating a missing file as `T::default()`.
///
/// A file that exists but does not parse is backed up and replaced by the
/// default, with a warning naming both paths. A file that cannot be read at
/// all is an error, since the end-of-run save would overwrite it.
pub fn load_json_or_default<T>(path: &Path, what: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("read {what} {}", path.display()));
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(err) => {
            let backup = backup_corrupt(path)?;
            tracing::warn!(
                path = %path.display(),
                backup = %backup.display(),
                error = %err,
                "{what} is unreadable; starting empty"
            );
            Ok(T::default())
        }
    }
}
