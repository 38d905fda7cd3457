//! Core asset domain types shared across the workspace.
//!
//! # Design
//! - Descriptors are immutable once built; the pipeline only reads and clones them.
//! - A fetch result only exists on success, so the result channel never carries failures.
//! - Colliding destinations are kept as-is; the last completed write wins.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Image family an asset belongs to; decides its directory and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Full champion splash art.
    Splash,
    /// Champion splash art cropped around the subject.
    Centered,
    /// Square champion icon.
    Icon,
    /// Champion loading-screen portrait.
    Portrait,
    /// Item icon.
    Item,
    /// Rune and rune tree icon.
    Rune,
    /// Centered splash art served by `CommunityDragon`.
    CommunityCentered,
}

impl AssetCategory {
    /// Every category in stable order.
    pub const ALL: [Self; 7] = [
        Self::Splash,
        Self::Centered,
        Self::Icon,
        Self::Portrait,
        Self::Item,
        Self::Rune,
        Self::CommunityCentered,
    ];

    /// Stable key used in configuration, CLI flags, and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Splash => "splash",
            Self::Centered => "centered",
            Self::Icon => "icon",
            Self::Portrait => "portrait",
            Self::Item => "item",
            Self::Rune => "rune",
            Self::CommunityCentered => "community_centered",
        }
    }

    /// Directory name under the versioned output root.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Splash => "Splash",
            Self::Centered => "SplashCentered",
            Self::Icon => "Icon",
            Self::Portrait => "Portrait",
            Self::Item => "items",
            Self::Rune => "runes",
            Self::CommunityCentered => "CommunitySplashCentered",
        }
    }

    /// File extension used for persisted payloads.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Splash | Self::Centered | Self::Portrait | Self::CommunityCentered => "jpg",
            Self::Icon | Self::Item | Self::Rune => "png",
        }
    }

    /// Whether the category is derived from the champion catalog.
    #[must_use]
    pub const fn is_champion(self) -> bool {
        matches!(
            self,
            Self::Splash | Self::Centered | Self::Icon | Self::Portrait | Self::CommunityCentered
        )
    }
}

impl Display for AssetCategory {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownCategory {
                value: value.to_string(),
            })
    }
}

/// One unit of download work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    name: String,
    category: AssetCategory,
    source_url: String,
    destination: PathBuf,
}

impl AssetDescriptor {
    /// Build a descriptor from fully-formed URL and destination path.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: AssetCategory,
        source_url: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            source_url: source_url.into(),
            destination: destination.into(),
        }
    }

    /// Logical asset name, used for logging and as the file stem.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category the asset belongs to.
    #[must_use]
    pub const fn category(&self) -> AssetCategory {
        self.category
    }

    /// Locator of the remote payload.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Local path the payload is written to.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Successfully retrieved payload paired with the descriptor that produced it.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    /// Descriptor copied from the dispatched batch.
    pub descriptor: AssetDescriptor,
    /// Complete response body.
    pub payload: Bytes,
}

impl FetchedAsset {
    /// Pair a descriptor with its payload.
    #[must_use]
    pub const fn new(descriptor: AssetDescriptor, payload: Bytes) -> Self {
        Self {
            descriptor,
            payload,
        }
    }
}

/// Catalog entry dropped before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Catalog the entry came from (for example `item.json`).
    pub source: String,
    /// Key of the dropped entry.
    pub key: String,
    /// Machine-readable reason.
    pub reason: String,
}

/// Descriptors resolved for one run plus whatever the resolver had to skip.
#[derive(Debug, Clone, Default)]
pub struct CatalogPlan {
    /// Work to dispatch.
    pub descriptors: Vec<AssetDescriptor>,
    /// Entries that could not be turned into descriptors.
    pub skipped: Vec<SkippedEntry>,
}

impl CatalogPlan {
    /// Whether the resolver had to drop anything.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Append another plan, keeping descriptor order.
    pub fn extend(&mut self, other: Self) {
        self.descriptors.extend(other.descriptors);
        self.skipped.extend(other.skipped);
    }
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every resolvable descriptor was dispatched.
    Success,
    /// Some catalog entries were skipped before dispatch.
    Partial,
    /// Nothing could be resolved.
    Failure,
}

impl RunStatus {
    /// Lowercase label for logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failure => "failure",
        }
    }

    /// Derive the status from the resolved plan.
    ///
    /// Per-asset fetch or persist failures never downgrade a run.
    #[must_use]
    pub fn from_plan(plan: &CatalogPlan) -> Self {
        if plan.descriptors.is_empty() {
            Self::Failure
        } else if plan.is_partial() {
            Self::Partial
        } else {
            Self::Success
        }
    }

    /// Whether the process should exit with a zero status.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Success | Self::Partial)
    }

    /// Process exit code for the status.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success | Self::Partial => 0,
            Self::Failure => 3,
        }
    }
}

impl Display for RunStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
