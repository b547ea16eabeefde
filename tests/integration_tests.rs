use httpmock::prelude::*;
use mensa_etl::{
    HttpSource, LocalStorage, MenuConfig, MenuEngine, MenuError, OutputFormat, RunSettings,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const SCHEDULE: &str = r#"<html><body>
  <div class="c-schedule__item">
    <strong>Montag, 15.01.2024</strong>
    <span class="stwm-artname">Tagesgericht 1</span>
    <p class="js-schedule-dish-description">Gemüsecurry</p>
    <span class="stwm-artname">Biogericht 2</span>
    <p class="js-schedule-dish-description">Gemüsecurry</p>
  </div>
  <div class="c-schedule__item">
    <strong>Dienstag, 16.01.2024</strong>
    <span class="stwm-artname">Salatbar</span>
    <p class="js-schedule-dish-description">Salat nach Wahl</p>
  </div>
</body></html>"#;

fn settings(output_path: &str, formats: Vec<OutputFormat>) -> RunSettings {
    RunSettings {
        year: 2024,
        week: 3,
        input_path: None,
        output_path: output_path.to_string(),
        output_formats: formats,
    }
}

fn config_for(server: &MockServer) -> anyhow::Result<MenuConfig> {
    let toml = format!(
        r#"
[prices]
"Salatbar" = "Self-Service"

[locations.mensa-test]
url = "{}"
format = "tag-tree"
"#,
        server.url("/speiseplan_999_-de.html")
    );
    Ok(MenuConfig::from_toml_str(&toml)?)
}

#[tokio::test]
async fn test_end_to_end_extraction_with_real_http() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/speiseplan_999_-de.html");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(SCHEDULE);
    });

    let config = config_for(&server)?;
    let engine = MenuEngine::new(
        HttpSource::new()?,
        LocalStorage::new(output_path.clone()),
        settings(&output_path, vec![OutputFormat::Json, OutputFormat::Csv]),
        config.tables()?,
    );

    let written = engine.run("mensa-test").await?.expect("known location");
    page_mock.assert();
    assert_eq!(written, vec!["menus.json", "menus.csv"]);

    let json = std::fs::read_to_string(temp_dir.path().join("menus.json"))?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["2024-01-15"][0]["name"], "Gemüsecurry");
    assert_eq!(value["2024-01-15"][0]["price"], 1.0);
    assert_eq!(value["2024-01-15"][1]["name"], "Gemüsecurry (2)");
    assert_eq!(value["2024-01-15"][1]["price"], 1.9);
    assert_eq!(value["2024-01-16"][0]["price"], "Self-Service");

    let csv = std::fs::read_to_string(temp_dir.path().join("menus.csv"))?;
    assert!(csv.starts_with("date,name,price\n"));
    assert!(csv.contains("2024-01-15,Gemüsecurry (2),1.90"));
    assert!(csv.contains("2024-01-16,Salat nach Wahl,Self-Service"));

    Ok(())
}

#[tokio::test]
async fn test_http_error_is_reported() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/speiseplan_999_-de.html");
        then.status(503);
    });

    let engine = MenuEngine::new(
        HttpSource::new()?,
        LocalStorage::new(output_path.clone()),
        settings(&output_path, vec![OutputFormat::Json]),
        config_for(&server)?.tables()?,
    );

    let result = engine.run("mensa-test").await;

    assert!(matches!(result, Err(MenuError::HttpStatus { .. })));
    assert!(!temp_dir.path().join("menus.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_unknown_location_makes_no_request() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).body(SCHEDULE);
    });

    let engine = MenuEngine::new(
        HttpSource::new()?,
        LocalStorage::new(output_path.clone()),
        settings(&output_path, vec![OutputFormat::Json]),
        config_for(&server)?.tables()?,
    );

    assert!(engine.run("mensa-nirgendwo").await?.is_none());
    page_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_input_file_for_column_text_location() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut input = NamedTempFile::new()?;
    writeln!(
        input,
        "{:<24}{:<24}{:<24}{:<24}Freitag",
        "Montag", "Dienstag", "Mittwoch", "Donnerstag"
    )?;
    writeln!(
        input,
        "{:<24}{:<24}{:<24}{:<24}Backfisch € 4,50",
        "Pasta Bolognese € 3,50", "geschlossen", "Gulasch € 3,90", "Suppe € 2,00"
    )?;

    let mut run = settings(&output_path, vec![OutputFormat::Json]);
    run.input_path = Some(input.path().to_str().unwrap().to_string());

    let engine = MenuEngine::new(
        HttpSource::new()?,
        LocalStorage::new(output_path.clone()),
        run,
        MenuConfig::default().tables()?,
    );

    engine.run("fmi-bistro").await?.expect("known location");

    let json = std::fs::read_to_string(temp_dir.path().join("menus.json"))?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value.as_object().unwrap().len(), 4);
    assert!(value.get("2024-01-16").is_none());
    assert_eq!(value["2024-01-15"][0]["name"], "Pasta Bolognese");
    assert_eq!(value["2024-01-15"][0]["price"], 3.5);
    Ok(())
}
