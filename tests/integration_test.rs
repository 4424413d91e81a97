use anyhow::Result;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

use listings_normalizer::config::Config;
use listings_normalizer::pipeline::normalize::MetricsNormalizer;
use listings_normalizer::{
    run_pipeline, ListingNormalizer, NormalizerConfig, NormalizerError, PriceBucket, RawTable,
    TableNormalizer,
};

const LISTINGS_CSV: &str = "\
Título,Nota,N_Avaliações,Desconto,Marca,Material,Gênero,Temporada,Qtd_Vendidos,Preço,Categoria
Kit 3 Camisetas,4.6,1200,10% OFF,Marca A,Algodão,Masculino,Não definido,+10mil,\"R$ 79,90\",Roupas
Tênis Esportivo,4.1,85,,Marca B,Sintético,Unissex,Verão,+500,\"R$ 1.234,56\",Calçados
Bolsa Couro,4.8,30,5% OFF,Marca C,Couro,Feminino,Inverno,muitos,\"R$ 250,00\",Acessórios
Meia Kit,,12,,Marca D,Algodão,Unissex,Não definido,+100,\"R$ 19,90\",Roupas
Jaqueta,3.9,400,,Marca E,Poliéster,Masculino,Inverno,+1mil,\"R$ 499,99\",Roupas
";

fn write_config(dir: &std::path::Path, csv_name: &str, extra: &str) -> Result<Config> {
    let toml = format!(
        "[input]\npath = \"{}\"\n{}",
        dir.join(csv_name).display(),
        extra
    );
    let config_path = dir.join("config.toml");
    fs::write(&config_path, toml)?;
    Ok(Config::from_path(&config_path)?)
}

#[test]
fn test_pipeline_cleans_listings_file() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("listings.csv"), LISTINGS_CSV)?;
    let config = write_config(temp_dir.path(), "listings.csv", "")?;

    let result = run_pipeline(&config)?;

    // "muitos" is not a quantity and the blank rating drops "Meia Kit"
    assert_eq!(result.report.rows_read, 5);
    assert_eq!(result.len(), 3);
    assert_eq!(result.report.dropped[0].line, Some(4));
    assert_eq!(result.report.dropped[0].column.as_deref(), Some("Qtd_Vendidos"));
    assert_eq!(result.report.dropped[1].line, Some(5));
    assert_eq!(result.report.dropped[1].column.as_deref(), Some("Nota"));

    let summary: Vec<(f64, f64, &str)> = result
        .records
        .iter()
        .map(|r| (r.quantity_sold, r.price, r.price_bucket.label()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (10000.0, 79.90, "R$50–100"),
            (500.0, 1234.56, "Mais de R$1000"),
            (1000.0, 499.99, "R$200–500"),
        ]
    );

    // Uninterpreted columns survive, blank ones as missing
    let first = serde_json::to_value(&result.records[0])?;
    assert_eq!(first["Marca"], "Marca A");
    assert_eq!(first["Desconto"], "10% OFF");
    let second = serde_json::to_value(&result.records[1])?;
    assert!(second["Desconto"].is_null());

    Ok(())
}

#[test]
fn test_pipeline_reports_schema_errors() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(
        temp_dir.path().join("partial.csv"),
        "Qtd_Vendidos,Preço\n+2mil,\"R$ 99,90\"\n",
    )?;

    let strict = write_config(temp_dir.path(), "partial.csv", "")?;
    match run_pipeline(&strict) {
        Err(NormalizerError::Schema { missing }) => assert_eq!(missing.len(), 4),
        other => panic!("expected schema error, got {:?}", other),
    }

    let lenient = write_config(
        temp_dir.path(),
        "partial.csv",
        "[normalize]\nstrict_schema = false\n",
    )?;
    let result = run_pipeline(&lenient)?;
    assert_eq!(result.records[0].price_bucket, PriceBucket::From50To100);

    Ok(())
}

#[test]
fn test_pipeline_fails_on_all_invalid_rows() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(
        temp_dir.path().join("bad.csv"),
        "Qtd_Vendidos;Preço\nbad;R$ 10,00\n+1mil;consulte\n",
    )?;
    let config = write_config(
        temp_dir.path(),
        "bad.csv",
        "delimiter = \";\"\n[normalize]\nstrict_schema = false\n",
    )?;

    assert!(matches!(
        run_pipeline(&config),
        Err(NormalizerError::EmptyResult { rows_read: 2 })
    ));
    Ok(())
}

#[test]
fn test_pipeline_reports_undecodable_rows() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(
        temp_dir.path().join("mixed.csv"),
        b"Qtd_Vendidos,Pre\xc3\xa7o\n1,\"R$ 1,00\"\n\xff\xfe,\"R$ 2,00\"\n3,\"R$ 3,00\"\n",
    )?;
    let config = write_config(
        temp_dir.path(),
        "mixed.csv",
        "[normalize]\nstrict_schema = false\n",
    )?;

    let result = run_pipeline(&config)?;

    assert_eq!(result.report.rows_read, 3);
    assert_eq!(result.report.rows_kept, 2);
    assert!(!result.report.is_lossless());
    assert_eq!(result.report.dropped.len(), 1);
    assert_eq!(result.report.dropped[0].line, Some(3));
    assert_eq!(result.report.dropped[0].reason.kind(), "undecodable");
    Ok(())
}

#[test]
fn test_pipeline_totals_feed_category_chart() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("listings.csv"), LISTINGS_CSV)?;
    let config = write_config(temp_dir.path(), "listings.csv", "")?;

    let result = run_pipeline(&config)?;

    let by_category = result.totals_by_category();
    assert_eq!(by_category.get("Roupas"), Some(&11000.0));
    assert_eq!(by_category.get("Calçados"), Some(&500.0));
    assert!(!by_category.contains_key("Acessórios"));

    let by_bucket: Vec<(PriceBucket, f64)> = result.totals_by_price_bucket().into_iter().collect();
    assert_eq!(
        by_bucket,
        vec![
            (PriceBucket::From50To100, 10000.0),
            (PriceBucket::From200To500, 1000.0),
            (PriceBucket::Over1000, 500.0),
        ]
    );
    Ok(())
}

#[test]
fn test_missing_input_file_is_io_error() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = write_config(temp_dir.path(), "nowhere.csv", "")?;
    assert!(matches!(run_pipeline(&config), Err(NormalizerError::Io(_))));
    Ok(())
}

#[test]
fn test_metrics_wrapper_is_transparent() -> Result<()> {
    let table = RawTable::from_json_rows(&[
        json!({"Qtd_Vendidos": "+2mil", "Preço": "R$ 99,90"}),
        json!({"Qtd_Vendidos": "bad", "Preço": "R$ 10,00"}),
    ]);
    let plain = ListingNormalizer::new(NormalizerConfig::lenient());
    let wrapped = MetricsNormalizer::new(plain.clone());

    let a = plain.normalize(&table)?;
    let b = wrapped.normalize(&table)?;
    assert_eq!(a.records, b.records);
    assert_eq!(wrapped.name(), "listing");
    Ok(())
}

#[test]
fn test_independent_tables_normalize_concurrently() -> Result<()> {
    let normalizer: Arc<dyn TableNormalizer> =
        Arc::new(ListingNormalizer::new(NormalizerConfig::lenient()));

    let handles: Vec<_> = (1..=8)
        .map(|i| {
            let normalizer = Arc::clone(&normalizer);
            thread::spawn(move || {
                let rows: Vec<_> = (0..50)
                    .map(|j| json!({"Qtd_Vendidos": format!("+{}mil", i), "Preço": format!("R$ {},00", j * 25)}))
                    .collect();
                normalizer.normalize(&RawTable::from_json_rows(&rows))
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().expect("worker panicked")?;
        assert_eq!(result.len(), 50);
        let expected = (i as f64 + 1.0) * 1000.0;
        assert!(result.records.iter().all(|r| r.quantity_sold == expected));
    }
    Ok(())
}
