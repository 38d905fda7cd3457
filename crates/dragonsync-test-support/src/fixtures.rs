//! Temporary output roots and descriptor builders.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dragonsync_core::{AssetCategory, AssetDescriptor};
use tempfile::TempDir;

/// Temporary output root removed on drop.
pub struct TempOutput {
    dir: TempDir,
}

impl TempOutput {
    /// Create an empty output root.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create (if needed) and return the directory for `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn category_dir(&self, category: AssetCategory) -> io::Result<PathBuf> {
        let dir = self.root().join(category.dir_name());
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Descriptor whose destination is `<category dir>/<name>.<ext>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the category directory cannot be created.
    pub fn descriptor(
        &self,
        name: &str,
        category: AssetCategory,
        url: impl Into<String>,
    ) -> io::Result<AssetDescriptor> {
        let destination = self
            .category_dir(category)?
            .join(format!("{name}.{}", category.extension()));
        Ok(AssetDescriptor::new(name, category, url, destination))
    }
}

/// Sorted regular files directly inside `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn files_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
