// ==========================================
// Test helpers
// ==========================================
// Temporary database, seeded roster/clients, CSV builders
// ==========================================

#![allow(dead_code)]

use link_marketplace::app::AppState;
use link_marketplace::domain::{Client, Publisher};
use link_marketplace::repository::{ClientRepository, PublisherRepository};
use std::error::Error;
use tempfile::NamedTempFile;

/// Current-contract header row
pub const CSV_HEADER: &str =
    "Site URL,DA,DR,Spam Score,Traffic,Category,Turnaround Time,Base Price,Country,Language,Publisher,Status";

/// Creates a temporary database file
///
/// # Returns
/// - NamedTempFile: keep alive for the duration of the test
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();
    Ok((temp_file, db_path))
}

/// Seeded fixture: AppState on a temp db with two publishers and one client
pub struct TestEnv {
    pub _temp_file: NamedTempFile,
    pub state: AppState,
    pub acme: Publisher,
    pub blue_ocean: Publisher,
    pub client: Client,
}

/// AppState with publishers "Acme Media" / "Blue Ocean" and a 40% markup client
pub async fn setup_env() -> TestEnv {
    let (temp_file, db_path) = create_test_db().expect("failed to create temp db");
    let state = AppState::new(db_path).expect("failed to init AppState");

    let acme = state
        .publisher_repo
        .create("Acme Media", "deals@acme.test")
        .await
        .expect("failed to seed publisher");
    let blue_ocean = state
        .publisher_repo
        .create("Blue Ocean", "hello@blueocean.test")
        .await
        .expect("failed to seed publisher");
    let client = state
        .client_repo
        .create("Northwind Buyers", 40.0)
        .await
        .expect("failed to seed client");

    TestEnv {
        _temp_file: temp_file,
        state,
        acme,
        blue_ocean,
        client,
    }
}

/// One current-contract CSV line
pub fn site_line(url: &str, price: &str, publisher: &str) -> String {
    format!(
        "{},55,60,2,120000,Technology,3 days,{},US,English,{},ACTIVE",
        url, price, publisher
    )
}

/// Header plus the given lines
pub fn csv_upload(lines: &[String]) -> Vec<u8> {
    let mut text = String::from(CSV_HEADER);
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    text.push('\n');
    text.into_bytes()
}

/// `n` valid rows on distinct hosts
pub fn numbered_sites(n: usize) -> Vec<String> {
    (1..=n)
        .map(|i| site_line(&format!("site{:02}.example.com", i), "100", "Acme Media"))
        .collect()
}
