use chrono::{Datelike, NaiveDate, Weekday};
use mensa_etl::core::MenuExtractor;
use mensa_etl::{ColumnTextExtractor, ColumnTextVocabulary, Dish, Price, WeeklyText};

fn row(cells: [&str; 5]) -> String {
    format!(
        "{:<28}{:<28}{:<28}{:<28}{}",
        cells[0], cells[1], cells[2], cells[3], cells[4]
    )
}

fn weekly_text() -> String {
    [
        "FMI Bistro Speiseplan KW 3".to_string(),
        String::new(),
        row(["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag"]),
        row([
            "Pasta Bolognese € 3,50",
            "Hähnchencurry € 4,20",
            "geschlossen",
            "Käsespätzle € 3,80",
            "Backfisch € 4,50",
        ]),
        row([
            "Allergene: Gluten, Sellerie",
            "Allergene: Soja",
            "",
            "Allergene: Milch",
            "Allergene: Fisch",
        ]),
        row(["Tomatensuppe € 2,10", "Linsen mit", "", "Gemüsesuppe € 2,00", ""]),
        row(["", "Spätzle € 3,20", "", "", ""]),
    ]
    .join("\n")
}

#[test]
fn test_closed_day_is_omitted() {
    let vocabulary = ColumnTextVocabulary::default();
    let extractor = ColumnTextExtractor::new(&vocabulary);

    let menus = extractor.extract_week(&weekly_text(), 2024, 3);

    assert_eq!(menus.len(), 4);
    let weekdays: Vec<Weekday> = menus.dates().map(|d| d.weekday()).collect();
    assert_eq!(
        weekdays,
        vec![Weekday::Mon, Weekday::Tue, Weekday::Thu, Weekday::Fri]
    );
    assert!(!menus.contains(&NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()));
}

#[test]
fn test_comma_prices_become_decimals() {
    let vocabulary = ColumnTextVocabulary::default();
    let extractor = ColumnTextExtractor::new(&vocabulary);

    let menus = extractor.extract_week(&weekly_text(), 2024, 3);
    let monday = menus
        .get(&NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        .unwrap();

    assert_eq!(
        monday.dishes,
        vec![
            Dish::new("Pasta Bolognese", Price::Fixed(3.5)),
            Dish::new("Tomatensuppe", Price::Fixed(2.1)),
        ]
    );
}

#[test]
fn test_dish_names_span_lines() {
    let vocabulary = ColumnTextVocabulary::default();
    let extractor = ColumnTextExtractor::new(&vocabulary);

    let menus = extractor.extract_week(&weekly_text(), 2024, 3);
    let tuesday = menus
        .get(&NaiveDate::from_ymd_opt(2024, 1, 16).unwrap())
        .unwrap();

    assert_eq!(
        tuesday.dishes,
        vec![
            Dish::new("Hähnchencurry", Price::Fixed(4.2)),
            Dish::new("Linsen mit Spätzle", Price::Fixed(3.2)),
        ]
    );
}

#[test]
fn test_extractor_trait_matches_direct_call() {
    let vocabulary = ColumnTextVocabulary::default();
    let extractor = ColumnTextExtractor::new(&vocabulary);
    let input = WeeklyText {
        text: weekly_text(),
        year: 2024,
        week: 3,
    };

    assert_eq!(
        extractor.extract(&input),
        extractor.extract_week(&input.text, 2024, 3)
    );
}

#[test]
fn test_week_anchoring_across_year_end() {
    let vocabulary = ColumnTextVocabulary::default();
    let extractor = ColumnTextExtractor::new(&vocabulary);

    // week 53 of 2019 rolls into January 2020
    let menus = extractor.extract_week(&weekly_text(), 2019, 53);

    assert_eq!(
        menus.dates().next(),
        Some(&NaiveDate::from_ymd_opt(2020, 1, 6).unwrap())
    );
}
