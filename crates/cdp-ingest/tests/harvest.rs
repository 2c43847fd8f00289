//! Harvest loop behavior against a mock collection endpoint.

use cdp_ingest::harvest::{HarvestEvent, HarvestObserver, HarvestState, Harvester, NoopObserver};
use cdp_ingest::source::{FieldDefaults, SourceProfile};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_profile(server: &MockServer) -> SourceProfile {
    SourceProfile {
        key: "test-shop".to_string(),
        collection_url: format!("{}/collections/{{handle}}/products.json", server.uri()),
        store_url: server.uri(),
        page_size: 250,
        delay_ms: 0,
        max_pages: 50,
        defaults: FieldDefaults {
            brand: "Test Brand".to_string(),
            gender: "Men".to_string(),
            season: "New Arrival".to_string(),
            rating: 0.0,
            rating_count: 0,
            year: 2026,
        },
    }
}

fn product(id: u64, price: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "handle": format!("product-{id}"),
        "vendor": "Test Brand",
        "product_type": "Shirts",
        "variants": [
            {"id": id * 10, "price": price, "compare_at_price": "2000", "option1": "M"}
        ],
        "images": [{"src": format!("https://cdn.example.com/{id}.jpg")}]
    })
}

fn page_body(products: Vec<Value>) -> Value {
    json!({ "products": products })
}

async fn mount_page(server: &MockServer, page: &str, products: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/collections/shirts/products.json"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(products)))
        .mount(server)
        .await;
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl HarvestObserver for Recorder {
    fn on_event(&mut self, event: &HarvestEvent) {
        self.events.push(match event {
            HarvestEvent::PageFetched { page, .. } => format!("fetched:{page}"),
            HarvestEvent::PageFailed { page, .. } => format!("failed:{page}"),
            HarvestEvent::RecordSkipped { product_id, .. } => format!("skipped:{product_id}"),
            HarvestEvent::Finished { records, .. } => format!("finished:{records}"),
        });
    }
}

#[tokio::test]
async fn harvest_terminates_on_first_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, "1", vec![product(1, "1500"), product(2, "1800")]).await;
    mount_page(&server, "2", vec![]).await;

    let harvester = Harvester::new(test_profile(&server)).unwrap();
    let report = harvester.harvest("shirts", &mut NoopObserver).await;

    assert_eq!(report.state, HarvestState::Exhausted);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.pages, 1);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn harvest_accumulates_across_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "1", vec![product(1, "1500")]).await;
    mount_page(&server, "2", vec![product(2, "900"), product(3, "700")]).await;
    mount_page(&server, "3", vec![]).await;

    let harvester = Harvester::new(test_profile(&server)).unwrap();
    let report = harvester.harvest("shirts", &mut NoopObserver).await;

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.pages, 2);
    let ids: Vec<&str> = report.records.iter().map(|r| r.product_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn fetch_failure_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "1", vec![product(1, "1500")]).await;
    Mock::given(method("GET"))
        .and(path("/collections/shirts/products.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let harvester = Harvester::new(test_profile(&server)).unwrap();
    let mut recorder = Recorder::default();
    let report = harvester.harvest("shirts", &mut recorder).await;

    // Fail-open: page 1's records survive the page 2 failure.
    assert_eq!(report.state, HarvestState::Failed);
    assert_eq!(report.records.len(), 1);
    assert_eq!(
        recorder.events,
        vec!["fetched:1", "failed:2", "finished:1"]
    );
}

#[tokio::test]
async fn malformed_record_costs_only_that_record() {
    let server = MockServer::start().await;
    let mut products: Vec<Value> = (1..=49).map(|id| product(id, "1500")).collect();
    products.push(product(50, "not-a-price"));
    mount_page(&server, "1", products).await;
    mount_page(&server, "2", vec![]).await;

    let harvester = Harvester::new(test_profile(&server)).unwrap();
    let mut recorder = Recorder::default();
    let report = harvester.harvest("shirts", &mut recorder).await;

    assert_eq!(report.state, HarvestState::Exhausted);
    assert_eq!(report.records.len(), 49);
    assert_eq!(report.skipped, 1);
    assert!(recorder.events.contains(&"skipped:50".to_string()));
}

#[tokio::test]
async fn page_cap_stops_never_exhausting_endpoint() {
    let server = MockServer::start().await;
    // Same non-empty page for every request; only the cap can end this.
    Mock::given(method("GET"))
        .and(path("/collections/shirts/products.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(vec![product(1, "1500")])),
        )
        .mount(&server)
        .await;

    let mut profile = test_profile(&server);
    profile.max_pages = 3;
    let harvester = Harvester::new(profile).unwrap();
    let report = harvester.harvest("shirts", &mut NoopObserver).await;

    assert_eq!(report.state, HarvestState::Exhausted);
    assert_eq!(report.pages, 3);
    assert_eq!(report.records.len(), 3);
}

#[tokio::test]
async fn harvest_normalizes_with_profile_defaults() {
    let server = MockServer::start().await;
    mount_page(&server, "1", vec![product(7, "1500")]).await;
    mount_page(&server, "2", vec![]).await;

    let harvester = Harvester::new(test_profile(&server)).unwrap();
    let report = harvester.harvest("shirts", &mut NoopObserver).await;

    let record = &report.records[0];
    assert_eq!(record.price, 1500);
    assert_eq!(record.mrp, 2000);
    assert_eq!(record.discount, 500);
    assert_eq!(record.discount_display_label, "(25% OFF)");
    assert_eq!(record.gender, "Men");
    assert_eq!(record.season, "New Arrival");
    assert_eq!(record.year, 2026);
    assert!(record.product_url.ends_with("/products/product-7"));
}
