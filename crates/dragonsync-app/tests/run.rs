//! Whole runs against a fake Data Dragon.

use std::fs;
use std::path::Path;

use dragonsync_app::{AppError, BootstrapDependencies, EXIT_FAILURE, RunOptions, run_app_with};
use dragonsync_config::SyncConfig;
use dragonsync_core::{AssetCategory, CoreError, RunStatus};
use dragonsync_telemetry::RunLog;
use dragonsync_test_support::ddragon::{FakeDataDragon, FakeItem};
use dragonsync_test_support::fixtures::files_in;
use serde_json::json;

fn config_for(fake: &FakeDataDragon, root: &Path, categories: Vec<AssetCategory>) -> SyncConfig {
    let mut config = SyncConfig::default();
    config.source.ddragon_base = fake.base_url();
    config.output.root = root.to_path_buf();
    config.categories = categories;
    config
}

fn dependencies(config: &SyncConfig, options: RunOptions) -> anyhow::Result<BootstrapDependencies> {
    Ok(BootstrapDependencies::from_config(
        config,
        options,
        RunLog::new(),
    )?)
}

#[tokio::test]
async fn every_asset_is_written_under_the_patch_directory() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    let root = tempfile::tempdir()?;
    fake.mock_versions();
    fake.mock_champions(&["Ahri", "Annie"]);
    fake.mock_image("/cdn/14.1.1/img/champion/Ahri.png", b"icon-ahri");
    fake.mock_image("/cdn/14.1.1/img/champion/Annie.png", b"icon-annie");
    let config = config_for(&fake, root.path(), vec![AssetCategory::Icon]);

    let report = run_app_with(dependencies(&config, RunOptions::default())?).await?;

    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.version, "14.1.1");
    assert_eq!(report.planned, 2);
    assert_eq!(report.persisted, 2);
    let icons = root.path().join("14.1.1/Icon");
    assert_eq!(files_in(&icons)?.len(), 2);
    assert_eq!(fs::read(icons.join("Ahri.png"))?, b"icon-ahri");
    assert_eq!(fs::read(icons.join("Annie.png"))?, b"icon-annie");
    assert!(root.path().join("14.1.1/logs.txt").is_file());
    Ok(())
}

#[tokio::test]
async fn missing_asset_does_not_downgrade_the_run() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    let root = tempfile::tempdir()?;
    fake.mock_versions();
    fake.mock_champions(&["Ahri", "Annie"]);
    fake.mock_image("/cdn/14.1.1/img/champion/Ahri.png", b"icon-ahri");
    fake.mock_missing("/cdn/14.1.1/img/champion/Annie.png");
    let config = config_for(&fake, root.path(), vec![AssetCategory::Icon]);

    let report = run_app_with(dependencies(&config, RunOptions::default())?).await?;

    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.status.exit_code(), 0);
    assert_eq!(report.persisted, 1);
    assert_eq!(report.fetch_failures.len(), 1);
    assert_eq!(
        report.fetch_failures[0].url,
        fake.url("/cdn/14.1.1/img/champion/Annie.png")
    );
    assert_eq!(report.fetch_failures[0].reason, "status_404");
    assert!(!root.path().join("14.1.1/Icon/Annie.png").exists());
    Ok(())
}

#[tokio::test]
async fn skipped_catalog_entry_makes_the_run_partial() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    let root = tempfile::tempdir()?;
    fake.mock_versions();
    fake.mock_items_raw(json!({
        "data": {
            "1001": { "name": "Boots", "image": { "full": "1001.png" } },
            "2003": { "name": "Health Potion" }
        }
    }));
    fake.mock_image("/cdn/14.1.1/img/item/1001.png", b"boots");
    let config = config_for(&fake, root.path(), vec![AssetCategory::Item]);

    let report = run_app_with(dependencies(&config, RunOptions::default())?).await?;

    assert_eq!(report.status, RunStatus::Partial);
    assert_eq!(report.status.exit_code(), 0);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(fs::read(root.path().join("14.1.1/items/Boots.png"))?, b"boots");
    Ok(())
}

#[tokio::test]
async fn nothing_resolvable_is_a_failed_run() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    let root = tempfile::tempdir()?;
    fake.mock_versions();
    fake.mock_items_raw(json!({
        "data": { "2003": { "name": "Health Potion" } }
    }));
    let config = config_for(&fake, root.path(), vec![AssetCategory::Item]);

    let report = run_app_with(dependencies(&config, RunOptions::default())?).await?;

    assert_eq!(report.status, RunStatus::Failure);
    assert_eq!(report.status.exit_code(), EXIT_FAILURE);
    assert_eq!(report.planned, 0);
    assert_eq!(report.persisted, 0);
    assert!(files_in(&root.path().join("14.1.1/items"))?.is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_version_list_is_fatal() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    let root = tempfile::tempdir()?;
    fake.mock_versions_status(503);
    let config = config_for(&fake, root.path(), vec![AssetCategory::Icon]);

    let result = run_app_with(dependencies(&config, RunOptions::default())?).await;

    let Err(err) = result else {
        anyhow::bail!("expected the run to fail");
    };
    assert!(matches!(
        err,
        AppError::Resolution {
            operation: "version.latest",
            source: CoreError::ResolutionStatus { status: 503, .. },
        }
    ));
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert!(files_in(root.path())?.is_empty());
    Ok(())
}

#[tokio::test]
async fn requested_patch_skips_the_version_lookup() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("13.24.1").await;
    let root = tempfile::tempdir()?;
    fake.mock_items(&[FakeItem {
        id: "1001",
        name: "Boots",
        image: "1001.png",
    }]);
    fake.mock_image("/cdn/13.24.1/img/item/1001.png", b"boots");
    let config = config_for(&fake, root.path(), vec![AssetCategory::Item]);
    let options = RunOptions {
        patch: Some("13.24.1".to_string()),
        metrics_file: None,
    };

    let report = run_app_with(dependencies(&config, options)?).await?;

    assert_eq!(report.version, "13.24.1");
    assert_eq!(report.status, RunStatus::Success);
    assert!(root.path().join("13.24.1/items/Boots.png").is_file());
    Ok(())
}

#[tokio::test]
async fn metrics_textfile_is_written_after_the_run() -> anyhow::Result<()> {
    let fake = FakeDataDragon::start("14.1.1").await;
    let root = tempfile::tempdir()?;
    let metrics_dir = tempfile::tempdir()?;
    let metrics_file = metrics_dir.path().join("dragonsync.prom");
    fake.mock_versions();
    fake.mock_champions(&["Ahri"]);
    fake.mock_image("/cdn/14.1.1/img/champion/Ahri.png", b"icon-ahri");
    let config = config_for(&fake, root.path(), vec![AssetCategory::Icon]);
    let options = RunOptions {
        patch: None,
        metrics_file: Some(metrics_file.clone()),
    };

    let report = run_app_with(dependencies(&config, options)?).await?;

    let exposition = fs::read_to_string(&metrics_file)?;
    assert!(exposition.contains("dragonsync_fetches_total"));
    assert!(exposition.contains("dragonsync_persists_total"));
    assert_eq!(report.metrics.fetches_delivered, 1);
    assert_eq!(report.metrics.persists_written, 1);
    Ok(())
}
