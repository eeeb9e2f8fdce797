use birthday_deals::app::{compare, presenter};
use birthday_deals::{
    DealCatalog, DealFinder, DistanceUnit, ExecutionMode, GoogleMapsClient, SearchOptions,
};
use httpmock::prelude::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const TEXT_SEARCH: &str = "/maps/api/place/textsearch/json";

fn write_catalog(rows: &[(&str, &str)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "store,deal").unwrap();
    for (store, deal) in rows {
        writeln!(file, "{},{}", store, deal).unwrap();
    }
    file
}

fn place(id: &str, lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "name": id,
        "formatted_address": format!("{} Main St", id),
        "geometry": {"location": {"lat": lat, "lng": lng}},
        "rating": 4.0,
        "user_ratings_total": 10,
        "place_id": id
    })
}

fn mock_store(server: &MockServer, store: &str, places: Vec<serde_json::Value>) {
    let status = if places.is_empty() { "ZERO_RESULTS" } else { "OK" };
    server.mock(|when, then| {
        when.method(GET).path(TEXT_SEARCH).query_param("query", store);
        then.status(200)
            .json_body(serde_json::json!({"status": status, "results": places}));
    });
}

fn finder_for(
    server: &MockServer,
    catalog: DealCatalog,
    options: SearchOptions,
) -> DealFinder<GoogleMapsClient, GoogleMapsClient> {
    let client =
        GoogleMapsClient::with_endpoint("test-key", &server.base_url(), Duration::from_secs(5))
            .unwrap();
    DealFinder::new(client.clone(), client, catalog, options)
}

#[tokio::test]
async fn test_end_to_end_search_with_geocoding() {
    let server = MockServer::start();
    let geocode_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/maps/api/geocode/json")
            .query_param("address", "Springfield");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 40.0, "lng": -74.0}}}]
        }));
    });
    mock_store(&server, "Acme Cafe", vec![place("acme", 40.02, -74.0)]);
    // Provider returns a result outside the true radius first.
    mock_store(
        &server,
        "Book Barn",
        vec![place("book-far", 40.2, -74.0), place("book-near", 40.01, -74.0)],
    );
    mock_store(&server, "Toy Town", vec![place("toy-far", 41.0, -74.0)]);
    mock_store(&server, "Shoe Shack", vec![]);

    let file = write_catalog(&[
        ("Acme Cafe", "Free coffee"),
        ("Book Barn", "10% off"),
        ("Toy Town", "Free balloon"),
        ("Shoe Shack", "Free socks"),
    ]);
    let catalog = DealCatalog::from_path(file.path()).unwrap();
    let finder = finder_for(&server, catalog, SearchOptions::default());

    let report = finder.find("Springfield", 5.0).await;

    geocode_mock.assert();
    assert!(report.failures.is_empty());
    assert_eq!(report.store_names(), vec!["Book Barn", "Acme Cafe"]);
    assert_eq!(report.matches[0].place_id, "book-near");
    assert!(report.matches.iter().all(|m| m.distance <= 5.0));

    let text = presenter::render_text(&report, "Springfield", 5.0, DistanceUnit::Miles);
    assert!(text.contains("Found 2 stores with birthday deals:"));
    assert!(text.contains("1. Book Barn"));
    assert!(text.contains("Rating: 4/5 (10 reviews)"));
}

#[tokio::test]
async fn test_failing_store_is_isolated() {
    let server = MockServer::start();
    mock_store(&server, "Acme Cafe", vec![place("acme", 40.01, -74.0)]);
    server.mock(|when, then| {
        when.method(GET)
            .path(TEXT_SEARCH)
            .query_param("query", "Broken Bakery");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path(TEXT_SEARCH)
            .query_param("query", "Limit Lounge");
        then.status(200).json_body(serde_json::json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "You have exceeded your daily request quota."
        }));
    });

    let catalog: DealCatalog = [
        ("Broken Bakery", "Free bread"),
        ("Acme Cafe", "Free coffee"),
        ("Limit Lounge", "Free drink"),
    ]
    .into_iter()
    .collect();
    let finder = finder_for(&server, catalog, SearchOptions::default());

    let report = finder.find("40.0,-74.0", 5.0).await;

    assert_eq!(report.store_names(), vec!["Acme Cafe"]);
    let failed: Vec<&str> = report
        .failures
        .iter()
        .map(|f| f.store_name.as_str())
        .collect();
    assert_eq!(failed, vec!["Broken Bakery", "Limit Lounge"]);
    assert!(report.failures[1].reason.contains("OVER_QUERY_LIMIT"));
}

#[tokio::test]
async fn test_unresolvable_origin_searches_nothing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/maps/api/geocode/json");
        then.status(200)
            .json_body(serde_json::json!({"status": "ZERO_RESULTS", "results": []}));
    });
    let search_mock = server.mock(|when, then| {
        when.method(GET).path(TEXT_SEARCH);
        then.status(200)
            .json_body(serde_json::json!({"status": "ZERO_RESULTS", "results": []}));
    });

    let catalog: DealCatalog = [("Acme Cafe", "Free coffee")].into_iter().collect();
    let finder = finder_for(&server, catalog, SearchOptions::default());

    let report = finder.find("Nowhere Special", 5.0).await;

    assert!(report.matches.is_empty());
    assert!(report.origin_error.is_some());
    search_mock.assert_hits(0);
}

#[tokio::test]
async fn test_compare_modes_agree() {
    let server = MockServer::start();
    let stores: Vec<(String, String)> = (0..8)
        .map(|i| (format!("Store {}", i), format!("Deal {}", i)))
        .collect();
    for (i, (store, _)) in stores.iter().enumerate() {
        let lat = 40.0 + 0.01 * ((i * 5) % 8) as f64;
        mock_store(&server, store, vec![place(&format!("p{}", i), lat, -74.0)]);
    }

    let catalog: DealCatalog = stores.into_iter().collect();
    let finder = finder_for(
        &server,
        catalog,
        SearchOptions {
            max_workers: 4,
            ..SearchOptions::default()
        },
    );

    let comparison = compare::compare_modes(&finder, "40.0,-74.0", 3.0).await;

    assert!(comparison.same_results());
    assert!(!comparison.sequential.matches.is_empty());
    let sequential = finder
        .find_with_mode("40.0,-74.0", 3.0, ExecutionMode::Sequential)
        .await;
    assert_eq!(sequential.matches, comparison.concurrent.matches);
}
