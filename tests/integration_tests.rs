use httpmock::prelude::*;
use serde_json::json;
use std::io::Read;
use tempfile::TempDir;
use wine_explorer::{
    render_error, Dashboard, ExportFormat, Exporter, HttpWineApi, LocalStorage, Settings, View,
};

fn dashboard(server: &MockServer) -> Dashboard<HttpWineApi> {
    let settings = Settings::load(None, Some(&server.base_url())).unwrap();
    let api = HttpWineApi::from_config(&settings).unwrap();
    Dashboard::new(api, &settings)
}

fn bucket_wine(id: i64, name: &str, price: f64) -> serde_json::Value {
    json!({"id": id, "name": name, "winery": "Bodega", "price": price, "points": 88, "country": "Spain"})
}

#[tokio::test]
async fn test_bucket_drilldown_accumulates_pages_and_exports_zip() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();

    let mut first_page = server.mock(|when, then| {
        when.method(GET)
            .path("/api/wines/bucket/")
            .query_param("price_min", "20")
            .query_param("price_max", "30")
            .query_param("points_min", "88")
            .query_param("points_max", "89")
            .query_param("limit", "10");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "wines": [bucket_wine(1, "Garnacha", 21.0), bucket_wine(2, "Tempranillo", 24.0)],
                "pagination": {"next_cursor": "abc", "has_next": true},
                "total": 3
            }));
    });

    let mut dashboard = dashboard(&server);
    let out = dashboard.select_bucket(23.4, 88.2).await.unwrap();
    assert!(out.contains("Wines in $20–30 · 88–89 pts"));
    assert!(out.contains("more available"));
    first_page.assert();
    first_page.delete();

    // 第二頁重複回傳 id 2，清單不應重複
    let second_page = server.mock(|when, then| {
        when.method(GET)
            .path("/api/wines/bucket/")
            .query_param("cursor", "abc");
        then.status(200).json_body(json!({
            "wines": [bucket_wine(2, "Tempranillo", 24.0), bucket_wine(3, "Monastrell", 29.5)],
            "pagination": {"next_cursor": null, "has_next": false},
            "total": 3
        }));
    });

    let out = dashboard.more_bucket().await.unwrap();
    second_page.assert();
    assert!(out.contains("Monastrell"));
    assert!(out.contains("Showing all 3 wines"));

    let ids: Vec<i64> = dashboard.bucket_rows().iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    // 已無下一頁時不再發出請求
    dashboard.more_bucket().await.unwrap();
    second_page.assert_hits(1);

    let exporter = Exporter::new(LocalStorage::new(output_path.clone()));
    let location = exporter
        .export("bucket", dashboard.bucket_rows(), ExportFormat::Zip)
        .await
        .unwrap();
    assert!(location.ends_with("bucket.zip"));

    let zip_data = std::fs::read(std::path::Path::new(&output_path).join("bucket.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(file_names.contains(&"bucket.csv".to_string()));
    assert!(file_names.contains(&"bucket.json".to_string()));
    assert!(file_names.contains(&"metadata.json".to_string()));

    let mut csv_content = String::new();
    archive
        .by_name("bucket.csv")
        .unwrap()
        .read_to_string(&mut csv_content)
        .unwrap();
    assert_eq!(csv_content.lines().count(), 4);
    assert!(csv_content.contains("Monastrell"));
}

#[tokio::test]
async fn test_scatter_then_bucket_reports_aggregated_count() {
    let server = MockServer::start();
    let page_one = server.mock(|when, then| {
        when.method(GET)
            .path("/api/stats/price-rating-aggregated")
            .query_param("page", "1")
            .query_param("page_size", "300");
        then.status(200).json_body(json!({
            "buckets": [{
                "price_min": 20.0, "price_max": 30.0,
                "points_min": 88.0, "points_max": 89.0,
                "count": 412,
                "examples": [{"name": "Garnacha", "price": 21.0, "points": 88, "winery": "Borsao"}]
            }],
            "total_wines": 412,
            "total_buckets": 1
        }));
    });
    let page_two = server.mock(|when, then| {
        when.method(GET)
            .path("/api/stats/price-rating-aggregated")
            .query_param("page", "2");
        then.status(200).json_body(json!({"buckets": [], "total_wines": 412, "total_buckets": 1}));
    });
    let bucket = server.mock(|when, then| {
        when.method(GET).path("/api/wines/bucket/");
        then.status(200).json_body(json!({
            "wines": [bucket_wine(1, "Garnacha", 21.0)],
            "pagination": {"next_cursor": null, "has_next": false}
        }));
    });

    let mut dashboard = dashboard(&server);
    let plot = dashboard.scatter(5, 200.0).await.unwrap();
    assert!(plot.contains("1 buckets, 412 wines"));
    page_one.assert();
    page_two.assert();

    // 已讀到空頁，再次繪圖不發出請求
    dashboard.scatter(5, 200.0).await.unwrap();
    page_two.assert_hits(1);

    let out = dashboard.select_bucket(25.0, 88.5).await.unwrap();
    assert!(out.contains("Scatter bucket holds 412 wines"));
    bucket.assert();
}

#[tokio::test]
async fn test_unreachable_api_shows_single_error_line() {
    // 沒有服務在此埠監聽
    let api = HttpWineApi::new("http://127.0.0.1:9/").unwrap();
    let mut dashboard = Dashboard::new(api, &Settings::default());

    let error = dashboard.world_map(None).await.unwrap_err();
    assert!(error.is_transport());
    assert_eq!(
        render_error(View::WorldMap, &error),
        "Failed to load country statistics"
    );
    assert_eq!(
        error.user_friendly_message(),
        "Could not load data from the wine API"
    );
}

#[tokio::test]
async fn test_wine_detail_and_heatmap() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/wines/129");
        then.status(200).json_body(json!({
            "id": 129,
            "title": "Quinta do Crasto 2011 Reserva",
            "description": "Dense and structured.",
            "points": 93,
            "price": 45.0,
            "country": "Portugal",
            "province": "Douro",
            "variety": "Portuguese Red",
            "winery": "Quinta do Crasto",
            "taster_name": "Roger Voss",
            "taster_twitter_handle": "@vossroger"
        }));
    });
    let heatmap = server.mock(|when, then| {
        when.method(GET)
            .path("/api/stats/price-rating-heatmap")
            .query_param("country", "Portugal");
        then.status(200).json_body(json!({
            "data": [[0, 0, 3], [1, 1, 12]],
            "x_categories": [10.0, 20.0],
            "y_categories": [88.0, 89.0],
            "bucket_map": {},
            "max_count": 12,
            "total_wines": 15,
            "bucket_size": {"price": 10.0, "points": 1.0}
        }));
    });

    let dashboard = dashboard(&server);
    let detail = dashboard.wine(129).await.unwrap();
    assert!(detail.contains("Quinta do Crasto 2011 Reserva"));
    assert!(detail.contains("Rating:      93 points"));
    assert!(detail.contains("Origin:      Douro, Portugal"));
    assert!(detail.contains("Roger Voss (@vossroger)"));

    let filters = wine_explorer::domain::model::HeatmapFilters {
        country: Some("Portugal".to_string()),
        ..Default::default()
    };
    let grid = dashboard.heatmap(&filters).await.unwrap();
    heatmap.assert();
    assert!(grid.contains("15 wines, densest cell 12 wines"));
    assert!(grid.contains("   89 | #"));
    assert!(grid.contains("   88 |. "));
}
