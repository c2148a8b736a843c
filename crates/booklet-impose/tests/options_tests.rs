use booklet_impose::*;

#[test]
fn test_defaults() {
    let options = ImpositionOptions::default();
    assert_eq!(options.layout, SheetLayout::TwoUp);
    assert_eq!(options.signature_size, SignatureSize::Sixteen);
    assert!(!options.page_numbers);
    assert!(options.validate().is_ok());
}

#[test]
fn test_json_uses_plain_numbers() {
    let options = ImpositionOptions::new(SheetLayout::FourUp, SignatureSize::ThirtyTwo)
        .with_page_numbers(true);
    let json = serde_json::to_value(&options).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "layout": 4, "signature_size": 32, "page_numbers": true })
    );
}

#[test]
fn test_missing_fields_take_defaults() {
    let options: ImpositionOptions = serde_json::from_str(r#"{ "signature_size": 8 }"#).unwrap();
    assert_eq!(options.signature_size, SignatureSize::Eight);
    assert_eq!(options.layout, SheetLayout::TwoUp);
}

#[test]
fn test_unsupported_values_rejected() {
    let err = serde_json::from_str::<ImpositionOptions>(r#"{ "signature_size": 12 }"#).unwrap_err();
    assert!(err.to_string().contains("Unsupported signature size"));

    let err = serde_json::from_str::<ImpositionOptions>(r#"{ "layout": 3 }"#).unwrap_err();
    assert!(err.to_string().contains("Invalid sheet layout"));
}

#[tokio::test]
async fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");

    let options = ImpositionOptions::new(SheetLayout::FourUp, SignatureSize::Eight);
    options.save(&path).await.unwrap();

    let loaded = ImpositionOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_load_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    tokio::fs::write(&path, b"{ not json").await.unwrap();

    match ImpositionOptions::load(&path).await {
        Err(BookletError::Config(msg)) => assert!(msg.contains("Failed to parse config")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}
