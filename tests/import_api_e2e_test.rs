// ==========================================
// Site import API end-to-end tests
// ==========================================
// parse -> preview -> save against a temporary database

use link_marketplace::api::ApiError;
use link_marketplace::domain::{CanonicalField, SiteStatus, TemplateVariant};
use link_marketplace::repository::SiteRepository;
use link_marketplace::config::config_keys;

mod test_helpers;
use test_helpers::{csv_upload, numbered_sites, setup_env, site_line};

async fn auto_mapping_json(env: &test_helpers::TestEnv, name: &str, bytes: &[u8]) -> String {
    let summary = env.state.import_api.parse(name, bytes, None).await.unwrap();
    serde_json::to_string(&summary.mapping).unwrap()
}

#[tokio::test]
async fn test_parse_reports_columns_mapping_and_markup() {
    let env = setup_env().await;
    let bytes = csv_upload(&numbered_sites(3));

    let summary = env.state.import_api.parse("sites.csv", &bytes, None).await.unwrap();
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.columns.len(), 12);
    assert_eq!(summary.mapping.len(), 12);
    assert_eq!(summary.markup_percentage, 25.0);

    let summary = env
        .state
        .import_api
        .parse("sites.csv", &bytes, Some(&env.client.id))
        .await
        .unwrap();
    assert_eq!(summary.markup_percentage, 40.0);

    let unknown = env.state.import_api.parse("sites.csv", &bytes, Some("ghost")).await;
    assert!(matches!(unknown, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_publisher_row_is_rejected_end_to_end() {
    let env = setup_env().await;
    let bytes = csv_upload(&[
        site_line("alpha.example.com", "100", "Acme Media"),
        site_line("beta.example.com", "120", "Nobody Publishing"),
        site_line("gamma.example.com", "140", "hello@blueocean.test"),
    ]);
    let mapping = auto_mapping_json(&env, "sites.csv", &bytes).await;

    let preview = env
        .state
        .import_api
        .preview("sites.csv", &bytes, &mapping, None)
        .await
        .unwrap();
    assert_eq!(preview.total_rows, 3);
    assert_eq!(preview.valid_rows, 2);
    assert_eq!(preview.invalid_rows, 1);

    let row2 = &preview.preview[1];
    assert!(!row2.is_valid);
    let publisher_errors: Vec<_> = row2
        .errors
        .iter()
        .filter(|e| e.field == CanonicalField::Publisher)
        .collect();
    assert_eq!(row2.errors.len(), 1);
    assert_eq!(publisher_errors.len(), 1);

    // default 25% markup
    assert_eq!(preview.preview[0].display_price, Some(125.0));

    let result = env
        .state
        .import_api
        .save(&preview.preview, &[1, 2, 3], "tester")
        .await
        .unwrap();
    assert_eq!(result.saved_count, 2);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Row 2: "), "{}", result.errors[0]);

    assert_eq!(env.state.site_repo.count().await.unwrap(), 2);
    let gamma = env
        .state
        .site_repo
        .find_by_url("https://gamma.example.com/")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(gamma.publisher_id, env.blue_ocean.id);
    assert_eq!(gamma.base_price, 140);
    assert_eq!(gamma.status, SiteStatus::Active);
    assert!(env
        .state
        .site_repo
        .find_by_url("https://beta.example.com/")
        .await
        .unwrap()
        .is_none());

    // audit entry
    let logs = env
        .state
        .action_log_repo
        .find_by_action_type("SITE_IMPORT", 10)
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].actor, "tester");
    assert_eq!(logs[0].payload_json.as_ref().unwrap()["saved_count"], 2);
}

#[tokio::test]
async fn test_duplicate_urls_in_one_batch() {
    let env = setup_env().await;
    let bytes = csv_upload(&[
        site_line("dup.example.com", "100", "Acme Media"),
        site_line("https://dup.example.com", "90", "Blue Ocean"),
    ]);
    let mapping = auto_mapping_json(&env, "sites.csv", &bytes).await;
    let preview = env
        .state
        .import_api
        .preview("sites.csv", &bytes, &mapping, None)
        .await
        .unwrap();
    assert_eq!(preview.valid_rows, 2);

    let result = env
        .state
        .import_api
        .save(&preview.preview, &[1, 2], "tester")
        .await
        .unwrap();
    assert_eq!(result.saved_count, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Row 2: "));
    assert!(result.errors[0].contains("already exists"));

    // re-importing the same file saves nothing
    let again = env
        .state
        .import_api
        .save(&preview.preview, &[1], "tester")
        .await
        .unwrap();
    assert_eq!(again.saved_count, 0);
    assert_eq!(again.errors.len(), 1);
}

#[tokio::test]
async fn test_preview_is_bounded_and_rows_beyond_are_unselectable() {
    let env = setup_env().await;
    let bytes = csv_upload(&numbered_sites(25));
    let mapping = auto_mapping_json(&env, "sites.csv", &bytes).await;

    let preview = env
        .state
        .import_api
        .preview("sites.csv", &bytes, &mapping, None)
        .await
        .unwrap();
    assert_eq!(preview.total_rows, 25);
    assert_eq!(preview.preview.len(), 20);
    assert_eq!(preview.valid_rows + preview.invalid_rows, 20);

    let result = env
        .state
        .import_api
        .save(&preview.preview, &[1, 21], "tester")
        .await
        .unwrap();
    assert_eq!(result.saved_count, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Row 21: "));
}

#[tokio::test]
async fn test_preview_row_limit_follows_config() {
    let env = setup_env().await;
    env.state
        .config_manager
        .set_global_config_value(config_keys::PREVIEW_ROW_LIMIT, "5")
        .unwrap();

    let bytes = csv_upload(&numbered_sites(8));
    let mapping = auto_mapping_json(&env, "sites.csv", &bytes).await;
    let preview = env
        .state
        .import_api
        .preview("sites.csv", &bytes, &mapping, None)
        .await
        .unwrap();
    assert_eq!(preview.preview.len(), 5);
}

#[tokio::test]
async fn test_client_markup_applies_to_display_price() {
    let env = setup_env().await;
    let bytes = csv_upload(&[site_line("alpha.example.com", "100.75", "Acme Media")]);
    let mapping = auto_mapping_json(&env, "sites.csv", &bytes).await;

    let preview = env
        .state
        .import_api
        .preview("sites.csv", &bytes, &mapping, Some(&env.client.id))
        .await
        .unwrap();
    // 100.75 rounds to 101, plus 40%
    assert_eq!(preview.preview[0].row.base_price, "101");
    let price = preview.preview[0].display_price.unwrap();
    assert!((price - 141.4).abs() < 1e-9);
}

#[tokio::test]
async fn test_fatal_input_errors() {
    let env = setup_env().await;
    let bytes = csv_upload(&numbered_sites(2));

    let unsupported = env.state.import_api.parse("sites.txt", &bytes, None).await;
    match unsupported {
        Err(e) => assert_eq!(e.code(), "UNSUPPORTED_FORMAT"),
        Ok(_) => panic!("expected unsupported format"),
    }

    let empty = env
        .state
        .import_api
        .parse("sites.csv", test_helpers::CSV_HEADER.as_bytes(), None)
        .await;
    match empty {
        Err(e) => assert_eq!(e.code(), "EMPTY_DATASET"),
        Ok(_) => panic!("expected empty dataset"),
    }

    let malformed = env
        .state
        .import_api
        .preview("sites.csv", &bytes, "[{not json", None)
        .await;
    assert!(matches!(malformed, Err(ApiError::MalformedMapping(_))));

    let missing_header = env
        .state
        .import_api
        .preview(
            "sites.csv",
            &bytes,
            r#"[{"source_header": "Website", "canonical_field": "url"}]"#,
            None,
        )
        .await;
    assert!(matches!(missing_header, Err(ApiError::MalformedMapping(_))));
}

#[tokio::test]
async fn test_explicit_mapping_with_custom_headers() {
    let env = setup_env().await;
    let bytes = b"Website,Cost,Owner,Niche,Lang,Geo,TAT\n\
                  alpha.example.com,80,Acme Media,Finance,English,UK,2 days\n"
        .to_vec();

    let summary = env.state.import_api.parse("custom.csv", &bytes, None).await.unwrap();
    // "Owner" is not a dictionary header
    assert_eq!(summary.mapping.len(), 6);

    let mapping = r#"[
        {"source_header": "Website", "canonical_field": "url"},
        {"source_header": "Cost", "canonical_field": "base_price"},
        {"source_header": "Owner", "canonical_field": "publisher"},
        {"source_header": "Niche", "canonical_field": "category"},
        {"source_header": "Lang", "canonical_field": "language"},
        {"source_header": "Geo", "canonical_field": "country"},
        {"source_header": "TAT", "canonical_field": "turnaround_time"}
    ]"#;
    let preview = env
        .state
        .import_api
        .preview("custom.csv", &bytes, mapping, None)
        .await
        .unwrap();
    assert_eq!(preview.valid_rows, 1, "{:?}", preview.preview[0].errors);

    let result = env
        .state
        .import_api
        .save(&preview.preview, &[1], "tester")
        .await
        .unwrap();
    assert_eq!(result.saved_count, 1);
}

#[tokio::test]
async fn test_xlsx_upload_round_trip() {
    use rust_xlsxwriter::Workbook;

    let env = setup_env().await;
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = test_helpers::CSV_HEADER.split(',').collect::<Vec<_>>();
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *h).unwrap();
    }
    let values = [
        "sheet.example.com", "40", "45", "1", "5000", "Travel", "1 week", "", "CA", "English",
        "Blue Ocean", "ACTIVE",
    ];
    for (col, v) in values.iter().enumerate() {
        sheet.write_string(1, col as u16, *v).unwrap();
    }
    sheet.write_number(1, 7, 75.0).unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let mapping = auto_mapping_json(&env, "sites.xlsx", &bytes).await;
    let preview = env
        .state
        .import_api
        .preview("sites.xlsx", &bytes, &mapping, None)
        .await
        .unwrap();
    assert_eq!(preview.valid_rows, 1, "{:?}", preview.preview[0].errors);

    let result = env
        .state
        .import_api
        .save(&preview.preview, &[1], "tester")
        .await
        .unwrap();
    assert_eq!(result.saved_count, 1);
    let site = env
        .state
        .site_repo
        .find_by_url("https://sheet.example.com/")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(site.base_price, 75);
}

#[tokio::test]
async fn test_template_download_and_reimport() {
    let env = setup_env().await;

    let current = env.state.import_api.template(None).await.unwrap();
    assert!(current.starts_with(test_helpers::CSV_HEADER));

    env.state
        .config_manager
        .set_global_config_value(config_keys::TEMPLATE_VARIANT, "legacy")
        .unwrap();
    let legacy = env.state.import_api.template(None).await.unwrap();
    assert!(legacy.starts_with("Site URL,Base Price,Publisher,Category"));

    let explicit = env
        .state
        .import_api
        .template(Some(TemplateVariant::Current))
        .await
        .unwrap();
    assert_eq!(explicit, current);

    // the samples use the seeded publishers, so the template imports cleanly
    let bytes = current.into_bytes();
    let mapping = auto_mapping_json(&env, "template.csv", &bytes).await;
    let preview = env
        .state
        .import_api
        .preview("template.csv", &bytes, &mapping, None)
        .await
        .unwrap();
    assert_eq!(preview.total_rows, 10);
    assert_eq!(preview.valid_rows, 10);
}
