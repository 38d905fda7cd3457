//! Catalog resolution against a fake Data Dragon.

use std::path::Path;

use dragonsync_catalog::{CatalogPlanner, DataDragonClient};
use dragonsync_config::SyncConfig;
use dragonsync_core::{AssetCategory, CatalogSource, CoreError, VersionSource};
use dragonsync_test_support::ddragon::{FakeDataDragon, FakeItem, FakeRuneTree};
use serde_json::json;

fn config_for(fake: &FakeDataDragon, categories: Vec<AssetCategory>) -> SyncConfig {
    let mut config = SyncConfig::default();
    config.source.ddragon_base = fake.base_url();
    config.output.root = Path::new("out").to_path_buf();
    config.categories = categories;
    config
}

fn planner(config: &SyncConfig) -> anyhow::Result<CatalogPlanner> {
    let client = DataDragonClient::from_config(config)?;
    Ok(CatalogPlanner::from_config(client, config))
}

#[tokio::test]
async fn latest_version_takes_first_entry() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    let versions = fake.mock_versions();
    let client = DataDragonClient::from_config(&config_for(&fake, Vec::new()))?;

    let version = VersionSource::latest_version(&client).await?;

    versions.assert();
    assert_eq!(version, "14.1.1");
    Ok(())
}

#[tokio::test]
async fn version_endpoint_failure_is_a_status_error() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_versions_status(503);
    let client = DataDragonClient::from_config(&config_for(&fake, Vec::new()))?;

    let result = client.latest_version().await;

    assert!(matches!(
        result,
        Err(CoreError::ResolutionStatus { status: 503, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn champion_plan_applies_fiddlesticks_correction() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_champions(&["Ahri", "Fiddlesticks"]);
    let config = config_for(&fake, vec![AssetCategory::Splash, AssetCategory::Icon]);

    let plan = planner(&config)?.resolve("14.1.1").await?;

    let summary: Vec<_> = plan
        .descriptors
        .iter()
        .map(|descriptor| {
            (
                descriptor.name().to_string(),
                descriptor.category(),
                descriptor
                    .source_url()
                    .trim_start_matches(&fake.base_url())
                    .to_string(),
                descriptor.destination().to_path_buf(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                "Ahri".to_string(),
                AssetCategory::Splash,
                "/cdn/img/champion/splash/Ahri_0.jpg".to_string(),
                Path::new("out/14.1.1/Splash/Ahri.jpg").to_path_buf(),
            ),
            (
                "Ahri".to_string(),
                AssetCategory::Icon,
                "/cdn/14.1.1/img/champion/Ahri.png".to_string(),
                Path::new("out/14.1.1/Icon/Ahri.png").to_path_buf(),
            ),
            (
                "FiddleSticks".to_string(),
                AssetCategory::Splash,
                "/cdn/img/champion/splash/FiddleSticks_0.jpg".to_string(),
                Path::new("out/14.1.1/Splash/FiddleSticks.jpg").to_path_buf(),
            ),
            (
                "FiddleSticks".to_string(),
                AssetCategory::Icon,
                "/cdn/14.1.1/img/champion/FiddleSticks.png".to_string(),
                Path::new("out/14.1.1/Icon/FiddleSticks.png").to_path_buf(),
            ),
            (
                "FiddleSticks".to_string(),
                AssetCategory::Icon,
                "/cdn/14.1.1/img/champion/Fiddlesticks.png".to_string(),
                Path::new("out/14.1.1/Icon/FiddleSticks.png").to_path_buf(),
            ),
        ]
    );
    assert!(plan.skipped.is_empty());
    Ok(())
}

#[tokio::test]
async fn item_plan_uses_sanitised_names_and_records_skips() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_items_raw(json!({
        "data": {
            "1055": { "name": "Doran's Blade", "image": { "full": "1055.png" } },
            "2003": { "name": "Health Potion" }
        }
    }));
    let config = config_for(&fake, vec![AssetCategory::Item]);

    let plan = planner(&config)?.resolve("14.1.1").await?;

    assert_eq!(plan.descriptors.len(), 1);
    let blade = &plan.descriptors[0];
    assert_eq!(blade.name(), "DoransBlade");
    assert_eq!(blade.source_url(), fake.url("/cdn/14.1.1/img/item/1055.png"));
    assert_eq!(
        blade.destination(),
        Path::new("out/14.1.1/items/DoransBlade.png")
    );
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].key, "2003");
    assert!(plan.is_partial());
    Ok(())
}

#[tokio::test]
async fn rune_plan_covers_trees_and_runes() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_runes(&[FakeRuneTree {
        key: "Domination",
        icon: "perk-images/Styles/7200_Domination.png",
        runes: vec![(
            "Electrocute",
            "perk-images/Styles/Domination/Electrocute/Electrocute.png",
        )],
    }]);
    let config = config_for(&fake, vec![AssetCategory::Rune]);

    let plan = planner(&config)?.resolve("14.1.1").await?;

    let names: Vec<_> = plan.descriptors.iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["Domination", "Electrocute"]);
    assert_eq!(
        plan.descriptors[1].source_url(),
        fake.url("/cdn/img/perk-images/Styles/Domination/Electrocute/Electrocute.png")
    );
    Ok(())
}

#[tokio::test]
async fn failed_group_is_skipped_when_others_resolve() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_champions(&["Ahri"]);
    fake.mock_data_status("item.json", 500);
    let config = config_for(&fake, vec![AssetCategory::Portrait, AssetCategory::Item]);

    let plan = planner(&config)?.resolve("14.1.1").await?;

    assert_eq!(plan.descriptors.len(), 1);
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].source, "item.json");
    Ok(())
}

#[tokio::test]
async fn every_group_failing_is_an_error() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_data_status("champion.json", 404);
    fake.mock_data_status("item.json", 404);
    let config = config_for(&fake, vec![AssetCategory::Icon, AssetCategory::Item]);

    let result = planner(&config)?.resolve("14.1.1").await;

    assert!(matches!(
        result,
        Err(CoreError::ResolutionStatus { status: 404, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn items_without_any_entries_are_an_empty_catalog() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_items(&[]);
    let config = config_for(&fake, vec![AssetCategory::Item]);

    let result = planner(&config)?.resolve("14.1.1").await;

    assert!(matches!(result, Err(CoreError::EmptyCatalog { .. })));
    Ok(())
}

#[tokio::test]
async fn item_catalog_without_data_is_malformed() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_items_raw(json!({ "type": "item", "version": "14.1.1" }));
    let config = config_for(&fake, vec![AssetCategory::Item]);

    let result = planner(&config)?.resolve("14.1.1").await;

    assert!(matches!(
        result,
        Err(CoreError::MalformedCatalog {
            catalog: "item.json",
            reason: "missing_data",
        })
    ));
    Ok(())
}

#[tokio::test]
async fn items_sharing_a_file_stem_are_planned_once() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_items(&[
        FakeItem {
            id: "3040",
            name: "Seraph's Embrace",
            image: "3040.png",
        },
        FakeItem {
            id: "3042",
            name: "Seraphs Embrace",
            image: "3042.png",
        },
    ]);
    let config = config_for(&fake, vec![AssetCategory::Item]);

    let plan = planner(&config)?.resolve("14.1.1").await?;

    assert_eq!(plan.descriptors.len(), 1);
    assert_eq!(
        plan.descriptors[0].source_url(),
        fake.url("/cdn/14.1.1/img/item/3040.png")
    );
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].key, "3042");
    assert_eq!(plan.skipped[0].reason, "duplicate_name");
    assert!(plan.is_partial());
    Ok(())
}

#[tokio::test]
async fn fake_items_round_through_the_planner() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    fake.mock_items(&[
        FakeItem {
            id: "1001",
            name: "Boots",
            image: "1001.png",
        },
        FakeItem {
            id: "3006",
            name: "Berserker's Greaves",
            image: "3006.png",
        },
    ]);
    let config = config_for(&fake, vec![AssetCategory::Item]);

    let plan = planner(&config)?.resolve("14.1.1").await?;

    let names: Vec<_> = plan.descriptors.iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["Boots", "BerserkersGreaves"]);
    assert!(!plan.is_partial());
    Ok(())
}
