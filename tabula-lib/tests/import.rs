mod common;

use chrono::TimeZone;
use chrono::Utc;
use common::Call;
use common::RecordingStore;
use common::init_logging;
use tabula_lib::error::ErrorKind;
use tabula_lib::error::ImportError;
use tabula_lib::import::HeaderMap;
use tabula_lib::import::ImportConfig;
use tabula_lib::import::Importer;
use tabula_lib::model::Collection;
use tabula_lib::model::Value;
use tabula_lib::schema::Field;
use tabula_lib::schema::FieldKind;
use tabula_lib::schema::FieldSchema;

fn products() -> Collection {
    Collection::new("products")
}

fn csv_with_rows(n: usize) -> String {
    let mut text = String::from("Product,SKU,Qty\n");
    for i in 0..n {
        text.push_str(&format!("Item {i},SKU-{i},{}\n", i % 50));
    }
    text
}

fn importer() -> Importer {
    Importer::new(
        products(),
        HeaderMap::new()
            .map("Product", "name")
            .map("SKU", "sku")
            .map("Qty", "quantity"),
    )
}

#[tokio::test]
async fn test_large_import_is_chunked_sequentially() {
    init_logging();
    let store = RecordingStore::new();

    let report = importer().import_str(&store, &csv_with_rows(2500)).await.unwrap();

    assert_eq!(report.parsed(), 2500);
    assert_eq!(report.inserted(), 2500);
    assert_eq!(store.insert_sizes(), vec![1000, 1000, 500]);
    assert_eq!(store.inner().len(&products()), 2500);
}

#[tokio::test]
async fn test_smaller_chunk_size() {
    init_logging();
    let store = RecordingStore::new();

    importer()
        .with_config(ImportConfig::default().with_chunk_size(400))
        .import_str(&store, &csv_with_rows(1000))
        .await
        .unwrap();

    assert_eq!(store.insert_sizes(), vec![400, 400, 200]);
}

#[tokio::test]
async fn test_failed_chunk_keeps_earlier_chunks() {
    init_logging();
    let store = RecordingStore::failing_insert(1);

    let err = importer()
        .import_str(&store, &csv_with_rows(2500))
        .await
        .unwrap_err();

    match &err {
        ImportError::Storage {
            chunk, committed, ..
        } => {
            assert_eq!(*chunk, 1);
            assert_eq!(*committed, 1000);
        }
        other => panic!("expected storage error, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.store_error().and_then(|e| e.error_code()), Some("08006"));

    // No third chunk after the failure.
    assert_eq!(store.insert_sizes(), vec![1000, 1000]);
    assert_eq!(store.inner().len(&products()), 1000);
}

#[tokio::test]
async fn test_padded_header_matches() {
    init_logging();
    let store = RecordingStore::new();
    let importer = Importer::new(products(), HeaderMap::new().map("Qty", "quantity"));

    importer.import_str(&store, " Qty \n7\n").await.unwrap();

    let rows = store.inner().rows(&products());
    assert_eq!(rows[0].get("quantity"), Some(&Value::Int(7)));
}

#[tokio::test]
async fn test_blank_leading_fields_drop_row_despite_third_value() {
    init_logging();
    let store = RecordingStore::new();
    let text = "Product,SKU,Qty\n,,12\nBolt,B-1,3\n  ,null,8\n";

    let report = importer().import_str(&store, text).await.unwrap();

    assert_eq!(report.inserted(), 1);
    assert_eq!(report.dropped(), 2);
    let rows = store.inner().rows(&products());
    assert_eq!(rows[0].get_text("name").unwrap(), Some("Bolt"));
}

#[tokio::test]
async fn test_no_data_fails_before_storage() {
    init_logging();
    let store = RecordingStore::new();

    let err = importer().import_str(&store, "Product,SKU,Qty\n").await.unwrap_err();

    assert!(matches!(err, ImportError::NoData));
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_every_row_dropped_is_no_valid_rows() {
    init_logging();
    let store = RecordingStore::new();

    let err = importer()
        .import_str(&store, "Product,SKU,Qty\n,,1\n,,2\n")
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::NoValidRows { parsed: 2 }));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_schema_aware_import() {
    init_logging();
    let schema = FieldSchema::new([
        Field::new("name", "Product", FieldKind::Text).required(),
        Field::new("unit", "Unit", FieldKind::Choice)
            .choices(["pcs", "box"])
            .default_value("pcs"),
        Field::new("quantity", "Qty", FieldKind::Integer),
        Field::new("created_at", "Date Added", FieldKind::Timestamp),
    ])
    .unwrap();

    let importer = Importer::new(
        products(),
        HeaderMap::new()
            .map("Product", "name")
            .map("Unit", "unit")
            .map("Qty", "quantity")
            .map("Date Added", "created_at"),
    )
    .with_schema(schema);

    let text = "\u{feff}Product,Unit,Qty,Date Added\n\
                Bolt,,10,01-02-2024\n\
                Nut,crate,5,2024-03-01\n\
                Washer,box,many,someday\n";

    let store = RecordingStore::new();
    let report = importer.import_str(&store, text).await.unwrap();

    assert_eq!(report.parsed(), 3);
    assert_eq!(report.inserted(), 1);
    assert_eq!(report.rejected().len(), 2);
    assert_eq!(report.rejected()[0].line, 3);
    assert_eq!(report.rejected()[0].errors[0].code.as_deref(), Some("choice"));
    assert_eq!(report.rejected()[1].errors[0].field, "quantity");

    let rows = store.inner().rows(&products());
    assert_eq!(rows[0].get_text("unit").unwrap(), Some("pcs"));
    assert_eq!(
        rows[0].get_timestamp("created_at").unwrap(),
        Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
    );
    assert_eq!(store.calls(), vec![Call::Insert(1)]);
}

#[tokio::test]
async fn test_schema_text_fields_keep_numeric_looking_cells() {
    init_logging();
    let schema = FieldSchema::new([
        Field::new("name", "Name", FieldKind::Text).required(),
        Field::new("sku", "SKU", FieldKind::Text),
        Field::new("bin", "Bin", FieldKind::Choice).choices(["10", "20"]),
    ])
    .unwrap();

    let importer = Importer::new(
        products(),
        HeaderMap::new()
            .map("Name", "name")
            .map("SKU", "sku")
            .map("Bin", "bin")
            .map("Qty", "quantity"),
    )
    .with_schema(schema);

    let store = RecordingStore::new();
    let report = importer
        .import_str(&store, "Name,SKU,Bin,Qty\nBolt,1001,10,5\nNut,0042,20,7\n")
        .await
        .unwrap();

    assert_eq!(report.inserted(), 2);
    assert!(report.rejected().is_empty());

    let rows = store.inner().rows(&products());
    assert_eq!(rows[0].get("sku"), Some(&Value::Text("1001".into())));
    assert_eq!(rows[1].get("sku"), Some(&Value::Text("0042".into())));
    assert_eq!(rows[1].get("bin"), Some(&Value::Text("20".into())));
    // Keys the schema does not declare are still inferred.
    assert_eq!(rows[1].get("quantity"), Some(&Value::Int(7)));
}

#[tokio::test]
async fn test_extra_timestamp_keys_and_unparseable_date() {
    init_logging();
    let importer = Importer::new(
        products(),
        HeaderMap::new().map("Name", "name").map("Logged", "logged_at"),
    )
    .with_config(ImportConfig::default().with_timestamp_keys(["logged_at"]));

    let store = RecordingStore::new();
    importer
        .import_str(&store, "Name,Logged\nA,25/12/2023\nB,yesterday\n")
        .await
        .unwrap();

    let rows = store.inner().rows(&products());
    assert_eq!(
        rows[0].get_timestamp("logged_at").unwrap(),
        Some(Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).unwrap())
    );
    assert_eq!(rows[1].get("logged_at"), Some(&Value::Null));
}
