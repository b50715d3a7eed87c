use super::Pipeline;

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

use crate::config::{Overrides, Settings};

const HEADER: &str = "transaction_id,customer_id,card_number,timestamp,vendor_category,vendor_type,vendor,amount,currency,country,city,city_size,card_type,is_card_present,device,channel,device_fingerprint,ip_address,is_outside_home_country,is_high_risk_vendor,is_weekend,last_hour_activity,is_fraud";

fn create_temporary_csv(lines: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    for line in lines {
        writeln!(file, "{line}")?;
    }

    Ok(file)
}

fn create_transactions(currency: &str) -> Result<NamedTempFile> {
    let unresolved = format!("t3,c2,9876,2024-10-01T12:00:00Z,Travel,online,AirX,300.0,{currency},GB,London,large,Premium Credit,false,Chrome,web,df3,3.3.3.3,true,true,false,,1");

    create_temporary_csv(&[
        HEADER,
        r#"t1,c1,1234,2024-10-01T10:00:00Z,Retail,online,ShopA,100.0,EUR,DE,Berlin,large,Basic Credit,false,Chrome,web,df1,1.1.1.1,true,false,false,"{""num_transactions"": 1, ""total_amount"": 100.0, ""unique_merchants"": 1, ""unique_countries"": 1, ""max_single_amount"": 100.0}",0"#,
        r#"t2,c1,1234,2024-10-01T11:00:00Z,Retail,online,ShopB,200.0,USD,US,NYC,large,Basic Credit,false,iOS App,mobile,df2,2.2.2.2,false,true,false,{},1"#,
        &unresolved
    ])
}

fn settings(transactions: &Path, fx: &Path, reports_dir: &Path, strict: bool) -> Settings {
    Settings::default().with_overrides(Overrides {
        transactions_file: Some(transactions.to_path_buf()),
        fx_file: Some(fx.to_path_buf()),
        reports_dir: Some(reports_dir.to_path_buf()),
        strict,
        ..Overrides::default()
    })
}

#[tokio::test]
async fn test_pipeline_runs_every_stage_end_to_end() -> Result<()> {
    let transactions = create_transactions("GBP")?;
    let fx = create_temporary_csv(&["date,USD,EUR,GBP", "2024-10-01,1.0,0.9,0.8"])?;
    let reports_dir = tempdir()?;

    let pipeline = Pipeline::new(settings(transactions.path(), fx.path(), reports_dir.path(), true));
    let out_dir = pipeline.run_all().await?;

    let dataset = fs::read_to_string(out_dir.join("dataset.csv"))?;
    assert_eq!(dataset.lines().count(), 4);
    assert!(dataset.lines().next().is_some_and(|header| header.contains("lha_max_single_amount")));

    Ok(())
}

#[tokio::test]
async fn test_strict_pipeline_aborts_on_unresolved_rates() -> Result<()> {
    let transactions = create_transactions("CHF")?;
    let fx = create_temporary_csv(&["date,USD,EUR", "2024-10-01,1.0,0.9"])?;
    let reports_dir = tempdir()?;

    let strict = Pipeline::new(settings(transactions.path(), fx.path(), reports_dir.path(), true));
    let error = strict.run_all().await.err().map(|error| error.to_string()).unwrap_or_default();
    assert!(error.contains("1 row(s)"), "unexpected error: {error}");

    let lenient = Pipeline::new(settings(transactions.path(), fx.path(), reports_dir.path(), false));
    let out_dir = lenient.run_features().await?;
    assert!(out_dir.join("dataset.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_eda_only_needs_the_transactions_source() -> Result<()> {
    let transactions = create_transactions("USD")?;
    let reports_dir = tempdir()?;

    let pipeline = Pipeline::new(settings(transactions.path(), Path::new("no/fx/here.csv"), reports_dir.path(), false));
    let out_dir = pipeline.run_eda().await?;

    let dataset = fs::read_to_string(out_dir.join("dataset.csv"))?;
    assert!(dataset.lines().next().is_some_and(|header| !header.contains("amount_usd")));

    Ok(())
}

#[tokio::test]
async fn test_pipeline_surfaces_validation_failures() -> Result<()> {
    let transactions = create_temporary_csv(&[
        HEADER,
        "t1,c1,1234,2024-10-01T10:00:00Z,Retail,online,ShopA,-1.0,USD,US,NYC,large,Basic Credit,true,Chrome,web,df1,1.1.1.1,false,false,false,,0"
    ])?;
    let fx = create_temporary_csv(&["date,USD", "2024-10-01,1.0"])?;
    let reports_dir = tempdir()?;

    let pipeline = Pipeline::new(settings(transactions.path(), fx.path(), reports_dir.path(), false));

    assert!(pipeline.run_all().await.is_err());

    Ok(())
}
