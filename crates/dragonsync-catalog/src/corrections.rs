//! Catalog name fix-ups for entries the CDN publishes under another spelling.
//!
//! # Design
//! - Rules come from configuration; only names a rule lists are touched.
//! - A rule may also keep the catalog spelling for some categories. The extra
//!   request writes to the corrected file name, so whichever finishes last wins.

use dragonsync_config::NameCorrection;
use dragonsync_core::AssetCategory;

/// One name to request and the file stem it is saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVariant {
    /// Name embedded in the source URL.
    pub request: String,
    /// Name used for the destination file.
    pub file: String,
}

impl NameVariant {
    fn same(name: &str) -> Self {
        Self {
            request: name.to_string(),
            file: name.to_string(),
        }
    }
}

/// Configured correction rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCorrections {
    rules: Vec<NameCorrection>,
}

impl NameCorrections {
    /// Wrap configured rules.
    #[must_use]
    pub const fn new(rules: Vec<NameCorrection>) -> Self {
        Self { rules }
    }

    /// Variants to request for catalog `name` in `category`.
    #[must_use]
    pub fn variants(&self, name: &str, category: AssetCategory) -> Vec<NameVariant> {
        let Some(rule) = self.rules.iter().find(|rule| rule.from == name) else {
            return vec![NameVariant::same(name)];
        };

        let mut variants = vec![NameVariant::same(&rule.to)];
        if rule.keep_original_for.contains(&category) {
            variants.push(NameVariant {
                request: rule.from.clone(),
                file: rule.to.clone(),
            });
        }
        variants
    }
}
