//! Source URL formats per asset category.

use dragonsync_core::AssetCategory;

/// Formats CDN URLs for one patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    ddragon: String,
    community: String,
    version: String,
}

impl UrlBuilder {
    /// Builder for `version` on the given CDN roots.
    #[must_use]
    pub fn new(ddragon_base: &str, community_base: &str, version: &str) -> Self {
        Self {
            ddragon: ddragon_base.trim_end_matches('/').to_string(),
            community: community_base.trim_end_matches('/').to_string(),
            version: version.to_string(),
        }
    }

    /// Image URL for champion `name` in a champion `category`.
    ///
    /// Returns `None` for item and rune categories.
    #[must_use]
    pub fn champion(&self, category: AssetCategory, name: &str) -> Option<String> {
        let Self {
            ddragon,
            community,
            version,
        } = self;
        let url = match category {
            AssetCategory::Splash => format!("{ddragon}/cdn/img/champion/splash/{name}_0.jpg"),
            AssetCategory::Centered => {
                format!("{ddragon}/cdn/img/champion/centered/{name}_0.jpg")
            }
            AssetCategory::Icon => format!("{ddragon}/cdn/{version}/img/champion/{name}.png"),
            AssetCategory::Portrait => format!("{ddragon}/cdn/img/champion/loading/{name}_0.jpg"),
            AssetCategory::CommunityCentered => {
                format!("{community}/{version}/champion/{name}/splash-art/centered")
            }
            AssetCategory::Item | AssetCategory::Rune => return None,
        };
        Some(url)
    }

    /// Item image URL for the catalog's `image.full` file name.
    #[must_use]
    pub fn item(&self, image: &str) -> String {
        format!("{}/cdn/{}/img/item/{image}", self.ddragon, self.version)
    }

    /// Rune icon URL for a path relative to `cdn/img/`.
    #[must_use]
    pub fn rune(&self, icon: &str) -> String {
        format!("{}/cdn/img/{}", self.ddragon, icon.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> UrlBuilder {
        UrlBuilder::new(
            "https://ddragon.leagueoflegends.com/",
            "https://cdn.communitydragon.org",
            "14.1.1",
        )
    }

    #[test]
    fn champion_urls_follow_cdn_layout() {
        let urls = builder();
        assert_eq!(
            urls.champion(AssetCategory::Splash, "Ahri").as_deref(),
            Some("https://ddragon.leagueoflegends.com/cdn/img/champion/splash/Ahri_0.jpg")
        );
        assert_eq!(
            urls.champion(AssetCategory::Centered, "Ahri").as_deref(),
            Some("https://ddragon.leagueoflegends.com/cdn/img/champion/centered/Ahri_0.jpg")
        );
        assert_eq!(
            urls.champion(AssetCategory::Icon, "Ahri").as_deref(),
            Some("https://ddragon.leagueoflegends.com/cdn/14.1.1/img/champion/Ahri.png")
        );
        assert_eq!(
            urls.champion(AssetCategory::Portrait, "Ahri").as_deref(),
            Some("https://ddragon.leagueoflegends.com/cdn/img/champion/loading/Ahri_0.jpg")
        );
        assert_eq!(
            urls.champion(AssetCategory::CommunityCentered, "Ahri").as_deref(),
            Some("https://cdn.communitydragon.org/14.1.1/champion/Ahri/splash-art/centered")
        );
        assert!(urls.champion(AssetCategory::Item, "Ahri").is_none());
    }

    #[test]
    fn item_and_rune_urls() {
        let urls = builder();
        assert_eq!(
            urls.item("1001.png"),
            "https://ddragon.leagueoflegends.com/cdn/14.1.1/img/item/1001.png"
        );
        assert_eq!(
            urls.rune("perk-images/Styles/7200_Domination.png"),
            "https://ddragon.leagueoflegends.com/cdn/img/perk-images/Styles/7200_Domination.png"
        );
    }
}
