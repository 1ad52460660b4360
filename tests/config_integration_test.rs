use anyhow::Result;
use careconnect::core::ConfigProvider;
use careconnect::domain::model::{LoadPolicy, ZeroTotalPolicy};
use careconnect::utils::validation::Validate;
use careconnect::{AnalyticsEngine, CliConfig, LocalStorage, TomlConfig};
use clap::Parser;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[tokio::test]
async fn test_toml_file_with_cli_overrides_drives_engine() -> Result<()> {
    let dir = TempDir::new()?;
    let data_path = dir.path().join("resources.csv");
    std::fs::write(
        &data_path,
        "name,staff,doctors,beds,ct,mri\nOk,12,1,1,1,1\nBroken,x,1,1,1,1\nEmpty,0,0,0,0,0\n",
    )?;

    let mut config_file = NamedTempFile::new()?;
    writeln!(
        config_file,
        "[data]\npath = \"{}\"\n\n[rebalance]\nthreshold = 4\n\n[features]\nvariant = \"classic\"\n",
        data_path.to_str().unwrap().replace('\\', "/")
    )?;

    let mut config = TomlConfig::from_file(config_file.path())?;
    let cli = CliConfig::parse_from([
        "careconnect",
        "--skip-invalid-rows",
        "--zero-total-as-zero",
        "chart",
    ]);
    cli.override_toml(&mut config);

    assert!(config.validate().is_ok());
    assert_eq!(config.load_policy(), LoadPolicy::SkipInvalid);
    assert_eq!(config.zero_total_policy(), ZeroTotalPolicy::TreatAsZero);
    assert_eq!(config.interval_ms(), 300_000);
    assert!(!config.search_enabled());

    let engine = AnalyticsEngine::new(LocalStorage::default(), config);
    let store = engine.load_store().await?;
    assert_eq!(store.len(), 2);

    let chart = engine.chart_builder().build_staff_percentages(&store)?;
    assert_eq!(chart[0].percentage, 75.0);
    assert_eq!(chart[1].percentage, 0.0);
    assert_eq!(engine.rebalancer().threshold(), 4);
    Ok(())
}

#[tokio::test]
async fn test_fail_fast_load_reports_parse_error() -> Result<()> {
    let dir = TempDir::new()?;
    let data_path = dir.path().join("resources.csv");
    std::fs::write(&data_path, "h\nOk,12,1,1,1,1\nBroken,x,1,1,1,1\n")?;

    let cli = CliConfig::parse_from([
        "careconnect",
        "--data-path",
        data_path.to_str().unwrap(),
        "show",
    ]);
    assert!(cli.validate().is_ok());

    let engine = AnalyticsEngine::new(LocalStorage::default(), cli);
    let err = engine.load_store().await.unwrap_err();
    assert!(matches!(
        err,
        careconnect::AnalyticsError::ParseError { row: 1, .. }
    ));
    Ok(())
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = TomlConfig::from_file("/no/such/careconnect.toml").unwrap_err();
    assert!(matches!(err, careconnect::AnalyticsError::IoError(_)));
}
