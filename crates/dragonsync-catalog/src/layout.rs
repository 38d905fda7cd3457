//! Output directory layout: `<root>/<version>/<category dir>/<name>.<ext>`.

use std::fs;
use std::path::{Path, PathBuf};

use dragonsync_core::{AssetCategory, CoreError, CoreResult};
use tracing::debug;

const RUN_LOG_FILE: &str = "logs.txt";

/// Paths for one patch under an output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    version_dir: PathBuf,
}

impl OutputLayout {
    /// Layout for `version` under `root`.
    #[must_use]
    pub fn new(root: &Path, version: &str) -> Self {
        Self {
            version_dir: root.join(version),
        }
    }

    /// `<root>/<version>`.
    #[must_use]
    pub fn version_dir(&self) -> &Path {
        &self.version_dir
    }

    /// Directory holding `category` files.
    #[must_use]
    pub fn category_dir(&self, category: AssetCategory) -> PathBuf {
        self.version_dir.join(category.dir_name())
    }

    /// Destination of asset `name` in `category`.
    #[must_use]
    pub fn destination(&self, category: AssetCategory, name: &str) -> PathBuf {
        self.category_dir(category)
            .join(format!("{name}.{}", category.extension()))
    }

    /// Per-run log file.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.version_dir.join(RUN_LOG_FILE)
    }

    /// Create the version directory and one directory per category.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Layout`] naming the directory that could not be created.
    pub fn prepare(&self, categories: &[AssetCategory]) -> CoreResult<()> {
        fs::create_dir_all(&self.version_dir).map_err(|source| CoreError::Layout {
            path: self.version_dir.clone(),
            source,
        })?;
        for category in categories {
            let dir = self.category_dir(*category);
            fs::create_dir_all(&dir).map_err(|source| CoreError::Layout {
                path: dir.clone(),
                source,
            })?;
            debug!(path = %dir.display(), "category directory ready");
        }
        Ok(())
    }
}
