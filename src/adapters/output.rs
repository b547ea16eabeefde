use crate::domain::model::{MenuCollection, OutputFormat};
use crate::utils::error::{MenuError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// One CSV line per dish.
#[derive(Serialize)]
struct CsvRow<'a> {
    date: NaiveDate,
    name: &'a str,
    price: String,
}

/// File name a format is written to, e.g. `menus.json`.
pub fn file_name(format: OutputFormat) -> String {
    format!("menus.{}", format.extension())
}

/// Pretty JSON object keyed by ISO date.
pub fn to_json(menus: &MenuCollection) -> Result<String> {
    Ok(serde_json::to_string_pretty(menus)?)
}

/// CSV with a `date,name,price` header.
pub fn to_csv(menus: &MenuCollection) -> Result<Vec<u8>> {
    // header written by hand so an empty week still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(["date", "name", "price"])?;

    for menu in menus {
        for dish in &menu.dishes {
            writer.serialize(CsvRow {
                date: menu.date,
                name: &dish.name,
                price: dish.price.to_string(),
            })?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| MenuError::IoError(e.into_error()))
}

pub fn render(format: OutputFormat, menus: &MenuCollection) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => Ok(to_json(menus)?.into_bytes()),
        OutputFormat::Csv => to_csv(menus),
    }
}
