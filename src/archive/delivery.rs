//! Handing exported bytes to the outside world.
//!
//! Export only produces bytes and a suggested file name. Where they end up
//! is decided by a `Delivery`: a directory on disk for the CLI, an in-memory
//! list for tests, or whatever a host application plugs in.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{ExportFormat, export};
use crate::models::GraphProject;
use crate::{Error, Result};

/// Receives exported files.
pub trait Delivery {
    /// Deliver `bytes` under `file_name` and return where they went.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

/// Writes delivered files into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Delivery for DirectoryDelivery {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<String> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(Error::Validation(format!(
                "Export file name must be a plain name, got: {:?}",
                file_name
            )));
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        write_atomic(&path, bytes)?;
        Ok(path.display().to_string())
    }
}

/// Keeps delivered files in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDelivery {
    pub files: Vec<(String, Vec<u8>)>,
}

impl MemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Delivery for MemoryDelivery {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<String> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(format!("memory:{}", file_name))
    }
}

/// Export `project` and hand it to `delivery` as `<base_name>.<ext>`.
pub fn export_to<D: Delivery + ?Sized>(
    delivery: &mut D,
    project: &GraphProject,
    format: ExportFormat,
    base_name: &str,
) -> Result<String> {
    let bytes = export(project, format)?;
    let file_name = format!("{}.{}", base_name, format.extension());
    delivery.deliver(&file_name, &bytes)
}

/// Replace `path` with `bytes` without leaving a half-written file behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
