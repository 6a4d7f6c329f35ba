//! Integration tests for the openaid backend.
//!
//! The real router is served on an ephemeral port; the remote activity API
//! is replaced by an in-memory source.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, BorderRepository};
use crate::gateway::RESOURCE_ACTIVITY;
use crate::testing::FakeSource;
use crate::{create_router, AppState};

fn dataset() -> Value {
    json!([
        { "id": 660, "identifier": "NL-1-PPR-23872", "title": "Hospitals in Nairobi",
          "description": "Maternal health", "recipient_country_code": "KE",
          "total_budget": "75000.00", "start_actual": "2011-03-01",
          "sector_code": "12220", "sector": "Basic health care" },
        { "id": 661, "title": "Rural hospitals", "description": "Clinics",
          "recipient_country_code": "UG", "total_budget": "600000",
          "sector_code": "12220", "sector": "Basic health care" },
        { "id": 662, "title": "Water wells", "description": "Boreholes, pumps",
          "recipient_country_code": "KE", "total_budget": "20000",
          "sector_code": "14030", "sector": "Water supply" }
    ])
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    source: Arc<FakeSource>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_page_size(15).await
    }

    async fn with_page_size(page_size: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let borders = Arc::new(BorderRepository::new(pool));
        borders
            .seed_reference_data()
            .await
            .expect("Failed to seed borders");

        let source = Arc::new(FakeSource::new(dataset()));

        // Create config
        let config = Config {
            api_url: "http://127.0.0.1:9/".to_string(),
            db_path,
            borders_csv: None,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            cache_ttl_secs: 3600,
            page_size,
            currency_symbol: "€ ".to_string(),
            thousand_separator: ".".to_string(),
        };

        let state = AppState::new(config, source.clone(), borders);
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            source,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    fn with_detail_resources(&self) {
        self.source.set_json(
            "activity/660/",
            json!({
                "id": 660, "identifier": "NL-1-PPR-23872", "title": "Hospitals in Nairobi",
                "description": "Maternal health", "organisation_id": 3,
                "recipient_country_code": "KE", "start_actual": "2011-03-01"
            }),
        );
        self.source.set_json(
            "organisation/3/",
            json!({ "name": "Ministry of Foreign Affairs", "type": 10, "ref": "NL-1" }),
        );
        self.source.set_json(
            "transaction",
            json!([
                { "transaction_type": "Commitments", "provider_org": "Ministry",
                  "value": "75000.00", "transaction_date": "2011-01-10" },
                { "transaction_type": "Disbursement", "value": "25000.00" }
            ]),
        );
        self.source.set_json(
            "policymarker",
            json!([{ "code": 1, "description": "Gender equality", "significance": "1" }]),
        );
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_listing_unfiltered() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/activities").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["activities"].as_array().unwrap().len(), 3);
    assert_eq!(data["pagination"]["total"], 3);
    assert_eq!(data["pagination"]["num_pages"], 1);
    assert_eq!(data["activities"][0]["country_name"], "Kenya");
    assert_eq!(data["activities"][0]["budget_label"], "€ 75.000");
    assert_eq!(data["sorting_links"][0]["class"], "unsorted");

    let map = data["countries"].as_array().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map[0]["iso2"], "KE");
    assert_eq!(map[0]["total_activities"], 2);
    assert_eq!(map[0]["total_budget_label"], "€ 95.000");

    // Second request is served from the snapshot.
    fixture.get_json("/api/activities").await;
    assert_eq!(fixture.source.calls(RESOURCE_ACTIVITY), 1);
}

#[tokio::test]
async fn test_listing_with_country_in_query() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get_json("/api/activities?query=kenya+hospitals&order_by=total_budget")
        .await;
    assert_eq!(status, 200);

    let data = &body["data"];
    assert_eq!(data["selection"]["query"], "hospitals");
    assert_eq!(data["selection"]["countries"], json!(["KE"]));
    assert_eq!(data["activities"].as_array().unwrap().len(), 1);
    assert_eq!(data["activities"][0]["id"], "660");
    assert_eq!(data["sorting_links"][0]["class"], "ascending");

    let countries: Vec<&str> = data["choices"]["countries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["value"].as_str().unwrap())
        .collect();
    assert_eq!(countries, vec!["KE", "UG"]);

    let primary = &fixture.source.queries(RESOURCE_ACTIVITY)[0];
    assert!(primary.contains("recipient_country_code=KE"));
    assert!(primary.contains("_order_by=total_budget"));
}

#[tokio::test]
async fn test_listing_pagination() {
    let fixture = TestFixture::with_page_size(2).await;

    let (status, body) = fixture.get_json("/api/activities?page=last").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["pagination"]["page"], 2);
    assert_eq!(body["data"]["activities"].as_array().unwrap().len(), 1);

    let (status, body) = fixture.get_json("/api/activities?page=3").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_listing_csv_exports_all_results() {
    let fixture = TestFixture::with_page_size(1).await;

    let resp = fixture
        .client
        .get(fixture.url("/api/activities?format=csv&order_by=recipient_country"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=\"search_results.csv\""
    );

    let body = resp.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines[0],
        "title,description,country,start date,budget,principal sector"
    );
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        "Hospitals in Nairobi,Maternal health,Kenya,2011-03-01,€ 75.000,Basic health care"
    );
    assert_eq!(
        lines[2],
        "Water wells,\"Boreholes, pumps\",Kenya,,€ 20.000,Water supply"
    );
    assert!(lines[3].starts_with("Rural hospitals,Clinics,Uganda"));
}

#[tokio::test]
async fn test_listing_csv_honours_page_bounds() {
    let fixture = TestFixture::with_page_size(1).await;

    let resp = fixture
        .client
        .get(fixture.url("/api/activities?format=csv&page=99"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Any page in range still exports the whole result set.
    let resp = fixture
        .client
        .get(fixture.url("/api/activities?format=csv&page=last"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap().lines().count(), 4);
}

#[tokio::test]
async fn test_invalid_parameters_fail_before_remote_calls() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/activities?budget=lots").await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = fixture.get_json("/api/activities?regions=east").await;
    assert_eq!(status, 400);

    let (status, _) = fixture.get_json("/api/activities?page=zero").await;
    assert_eq!(status, 404);

    assert_eq!(fixture.source.calls(RESOURCE_ACTIVITY), 0);
    assert_eq!(fixture.source.marker_calls(), 0);
}

#[tokio::test]
async fn test_unavailable_api_is_not_found() {
    let fixture = TestFixture::new().await;
    fixture.source.set_unavailable(true);

    let (status, body) = fixture.get_json("/api/activities").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = fixture.get_json("/api/projects/660").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_malformed_budget_is_internal_error() {
    let fixture = TestFixture::new().await;
    fixture
        .source
        .set_activities(json!([{ "id": 1, "total_budget": "n/a" }]));

    let (status, body) = fixture.get_json("/api/activities").await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_project_detail() {
    let fixture = TestFixture::new().await;
    fixture.with_detail_resources();

    let (status, body) = fixture.get_json("/api/projects/660").await;
    assert_eq!(status, 200);

    let data = &body["data"];
    assert_eq!(data["organisation"]["name"], "Ministry of Foreign Affairs");
    assert_eq!(data["commitments"].as_array().unwrap().len(), 1);
    assert_eq!(data["disbursements"].as_array().unwrap().len(), 1);
    assert_eq!(
        data["feed_reference"]["organisation"],
        "http://www.akvo.org/rsr/organisation/734"
    );

    let table = data["table"].as_array().unwrap();
    assert_eq!(table[0], json!(["Country Information"]));
    assert_eq!(table[1], json!(["Country", "Kenya"]));
    assert!(table.contains(&json!(["Start date actual", "01-03-2011"])));
    assert!(table.contains(&json!(["Significance", "Significant"])));
    assert!(table.contains(&json!(["Receiver org", "Unknown"])));

    assert_eq!(
        fixture.source.last_query("policymarker").unwrap(),
        "activity__id=660&significance__gt=0&_order_by=code"
    );
}

#[tokio::test]
async fn test_project_csv() {
    let fixture = TestFixture::new().await;
    fixture.with_detail_resources();

    for path in ["/api/projects/660/csv", "/api/projects/660?format=csv"] {
        let resp = fixture.client.get(fixture.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()["content-disposition"],
            "attachment; filename=\"Hospitals in Nairobi.csv\""
        );

        let body = resp.text().await.unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "Hospitals in Nairobi");
        assert_eq!(lines[1], "Maternal health");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Country Information");
        assert!(lines.contains(&"Value,€ 75.000"));
    }
}

#[tokio::test]
async fn test_unknown_project_is_not_found() {
    let fixture = TestFixture::new().await;

    let (status, _) = fixture.get_json("/api/projects/999").await;
    assert_eq!(status, 404);

    let (status, _) = fixture.get_json("/api/projects/abc").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_map_borders() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/map").await;
    assert_eq!(status, 200);

    let borders = body["data"].as_array().unwrap();
    assert!(borders.len() > 200);
    assert!(borders
        .iter()
        .any(|b| b["iso2"] == "KE" && b["name"] == "Kenya"));
}
