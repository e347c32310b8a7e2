//! The embedded reference table working with validation, search and
//! contract symbols.

use futureslab_core::{validate_tickers, Expiry, ReferenceTable, SearchFilter};

#[test]
fn embedded_table_loads() {
    let table = ReferenceTable::embedded().unwrap();
    assert!(table.len() > 50);
    assert_eq!(table.description("CL"), Some("Crude Oil"));
    assert_eq!(table.exchange("GC"), Some("CMX"));
    assert!(table.categories().contains(&"energy"));
    assert!(table.exchanges().contains(&"CBT"));
}

#[test]
fn validation_against_embedded_table() {
    let table = ReferenceTable::embedded().unwrap();
    let validated = validate_tickers(&table, &["NG", "ZZZ", "CL", " GC "]);

    assert_eq!(validated.valid, vec!["NG", "CL", "GC"]);
    assert_eq!(validated.invalid, vec!["ZZZ"]);
}

#[test]
fn search_combines_filters() {
    let table = ReferenceTable::embedded().unwrap();

    let energy_nym = table.search(&SearchFilter {
        category: "Energy".into(),
        exchange: "nym".into(),
        ..SearchFilter::default()
    });
    assert!(!energy_nym.is_empty());
    assert!(energy_nym
        .contracts()
        .iter()
        .all(|c| c.category == "energy" && c.exchange == "NYM"));

    let gold = table.search(&SearchFilter {
        description: "gold".into(),
        ..SearchFilter::default()
    });
    assert!(gold.contracts().iter().any(|c| c.ticker == "GC"));

    let table_view = gold.to_table();
    assert_eq!(
        table_view.headers(),
        ["Ticker", "Description", "Exchange", "Category"]
    );
    assert_eq!(table_view.len(), gold.len());
}

#[test]
fn dated_contract_symbol_uses_reference_exchange() {
    let table = ReferenceTable::embedded().unwrap();
    let expiry: Expiry = "2024-12".parse().unwrap();
    let exchange = table.exchange("ZC").unwrap();

    assert_eq!(expiry.contract_symbol("ZC", exchange), "ZCZ24.CBT");
    assert_eq!(expiry.label(), "Dec-2024");
}
