mod common;

use chrono::TimeZone;
use chrono::Utc;
use common::RecordingStore;
use common::init_logging;
use rust_decimal::Decimal;
use tabula_lib::error::ExportError;
use tabula_lib::export::ExportConfig;
use tabula_lib::export::export;
use tabula_lib::import::HeaderMap;
use tabula_lib::import::ImportConfig;
use tabula_lib::import::Importer;
use tabula_lib::model::Collection;
use tabula_lib::model::Row;
use tabula_lib::model::RowId;
use tabula_lib::model::Value;
use tabula_lib::schema::Field;
use tabula_lib::schema::FieldKind;
use tabula_lib::schema::FieldSchema;
use tabula_lib::store::RowStore;
use tabula_lib::store::query::Query;
use tabula_lib::table::Column;
use tabula_lib::table::SelectionSet;
use tabula_lib::table::Table;
use tabula_lib::table::TableConfig;

fn columns() -> Vec<Column> {
    vec![
        Column::field("Product Name", "name"),
        Column::field("Qty", "quantity").format(|v| format!("{v} pcs")),
        Column::field("Unit Cost", "unit_cost"),
        Column::field("Notes", "notes"),
        Column::field("Date Added", "created_at"),
    ]
}

fn header_map(columns: &[Column]) -> HeaderMap {
    columns
        .iter()
        .filter_map(|c| c.key().map(|key| (c.header.clone(), key.to_string())))
        .collect()
}

fn sample_rows() -> Vec<Row> {
    vec![
        Row::with_id(RowId::new_v4())
            .set("name", "Hex \"M8\" Bolt, zinc")
            .set("quantity", 120i64)
            .set("unit_cost", Decimal::new(1050, 2))
            .set("created_at", Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()),
        Row::with_id(RowId::new_v4())
            .set("name", "Washer")
            .set("quantity", 0i64)
            .set("notes", "bulk bin")
            .set("created_at", Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()),
    ]
}

#[tokio::test]
async fn test_export_then_import_reproduces_values() {
    init_logging();
    let columns = columns();
    let original = sample_rows();

    let file = export(&original, &SelectionSet::new(), &columns, &ExportConfig::default()).unwrap();
    assert!(!file.contents().contains("pcs"));

    let store = RecordingStore::new();
    let collection = Collection::new("products");
    Importer::new(collection.clone(), header_map(&columns))
        .with_config(ImportConfig::default().with_timestamp_keys(["created_at"]))
        .import_str(&store, file.contents())
        .await
        .unwrap();

    let imported = store.inner().rows(&collection);
    assert_eq!(imported.len(), original.len());
    for (before, after) in original.iter().zip(&imported) {
        for (key, value) in before.non_null_fields() {
            assert_eq!(after.get(key), Some(value), "field {key}");
        }
    }
}

#[tokio::test]
async fn test_schema_round_trip_keeps_text_and_rounds_rates() {
    init_logging();
    let schema = FieldSchema::new([
        Field::new("name", "Employee", FieldKind::Text).required(),
        Field::new("badge", "Badge", FieldKind::Text),
        Field::new("hourly_rate", "Hourly Rate", FieldKind::Decimal),
        Field::new("hours", "Hours", FieldKind::Integer),
        Field::new("created_at", "Date Added", FieldKind::Timestamp),
    ])
    .unwrap();
    let columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|f| Column::field(f.label.clone(), f.key.clone()))
        .collect();

    let created = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    let original = vec![
        Row::with_id(RowId::new_v4())
            .set("name", "Dela Cruz")
            .set("badge", "0042")
            .set("hourly_rate", Decimal::new(12345, 3))
            .set("hours", 40i64)
            .set("created_at", created),
        Row::with_id(RowId::new_v4())
            .set("name", "1001")
            .set("badge", "1001")
            .set("hourly_rate", 15i64)
            .set("hours", 8i64),
    ];

    let file = export(&original, &SelectionSet::new(), &columns, &ExportConfig::default()).unwrap();
    let lines: Vec<&str> = file.contents().lines().collect();
    assert_eq!(
        lines[1],
        "\"Dela Cruz\",\"0042\",\"12.35\",\"40\",\"2024-05-06T07:08:09.000Z\""
    );
    assert_eq!(lines[2], "\"1001\",\"1001\",\"15.00\",\"8\",\"\"");

    let store = RecordingStore::new();
    let collection = Collection::new("payroll");
    let report = Importer::new(collection.clone(), header_map(&columns))
        .with_schema(schema)
        .import_str(&store, file.contents())
        .await
        .unwrap();
    assert_eq!(report.inserted(), 2);
    assert!(report.rejected().is_empty());

    let imported = store.inner().rows(&collection);
    assert_eq!(imported[0].get("badge"), Some(&Value::Text("0042".into())));
    assert_eq!(imported[1].get("name"), Some(&Value::Text("1001".into())));
    assert_eq!(imported[1].get("badge"), Some(&Value::Text("1001".into())));
    assert_eq!(imported[0].get("hours"), Some(&Value::Int(40)));
    assert_eq!(imported[0].get_timestamp("created_at").unwrap(), Some(created));
    assert_eq!(imported[1].get("created_at"), Some(&Value::Null));

    // Rates come back at the exported precision.
    let rates: Vec<String> = imported
        .iter()
        .map(|row| row.get("hourly_rate").unwrap().to_display_string())
        .collect();
    assert_eq!(rates, vec!["12.35", "15.00"]);
}

#[tokio::test]
async fn test_table_export_uses_selection() {
    init_logging();
    let store = RecordingStore::new();
    let collection = Collection::new("products");
    store.insert(&collection, sample_rows()).await.unwrap();

    let mut table = Table::new(columns(), TableConfig::default());
    table.load(&store, &collection, &Query::new()).await.unwrap();

    let everything = table.export(&ExportConfig::default()).unwrap();
    assert_eq!(everything.contents().lines().count(), 3);

    let washer = table
        .rows()
        .iter()
        .find(|r| r.get_text("name").unwrap() == Some("Washer"))
        .and_then(|r| r.id())
        .unwrap();
    table.toggle_row(washer);

    let file = table
        .export(&ExportConfig::default().with_filename("washers.csv"))
        .unwrap();
    assert_eq!(file.filename(), "washers.csv");
    assert_eq!(
        file.contents(),
        "\"Product Name\",\"Qty\",\"Unit Cost\",\"Notes\",\"Date Added\"\n\
         \"Washer\",\"0\",\"\",\"bulk bin\",\"2024-03-04T00:00:00.000Z\"\n"
    );
}

#[test]
fn test_stale_selection_is_no_match() {
    let selection: SelectionSet = [RowId::new_v4()].into_iter().collect();
    let err = export(&sample_rows(), &selection, &columns(), &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, ExportError::NoMatch));
}
