use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use wine_explorer::core::browse::CountryBrowser;
use wine_explorer::core::rag::{AnswerSource, RagSession};
use wine_explorer::core::search::SearchSession;
use wine_explorer::{HttpWineApi, WineError};
use wine_explorer::domain::model::WineFilters;

fn api(server: &MockServer) -> Result<Arc<HttpWineApi>> {
    Ok(Arc::new(HttpWineApi::new(&server.base_url())?))
}

fn result_page(ids: &[i64], page: u32, pages: u32) -> serde_json::Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "title": format!("Wine {}", id), "points": 90, "price": 20.0}))
        .collect();
    json!({"items": items, "total": 45, "page": page, "size": 20, "pages": pages})
}

#[tokio::test]
async fn test_search_pages_forward_and_back() -> Result<()> {
    let server = MockServer::start();
    let page_one = server.mock(|when, then| {
        when.method(POST)
            .path("/api/wines/search")
            .json_body(json!({"search": "cherry", "country": "Italy", "page": 1, "size": 20}));
        then.status(200).json_body(result_page(&[1, 2], 1, 3));
    });
    let page_two = server.mock(|when, then| {
        when.method(POST)
            .path("/api/wines/search")
            .json_body(json!({"search": "cherry", "country": "Italy", "page": 2, "size": 20}));
        then.status(200).json_body(result_page(&[3, 4], 2, 3));
    });

    let mut session = SearchSession::new(api(&server)?, 20);
    let filters = WineFilters::from_query_string("?search=cherry&country=Italy")?;

    let first = session.search(filters).await?;
    assert_eq!(first.items.len(), 2);

    let second = session.next_page().await?;
    assert_eq!(second.items[0].id, 3);
    assert_eq!(session.filters().to_query_string(), "search=cherry&country=Italy&page=2");

    session.previous_page().await?;
    let info = session.page_info().ok_or_else(|| anyhow::anyhow!("no page info"))?;
    assert_eq!(info.current, 1);
    assert!(!info.has_previous());
    assert!(info.has_next());

    // 超出範圍的頁碼不發出請求
    let err = session.go_to_page(4).await.unwrap_err();
    assert!(matches!(err, WineError::ValidationError { .. }));

    page_one.assert_hits(2);
    page_two.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_rag_answer_is_cached_by_trimmed_query() -> Result<()> {
    let server = MockServer::start();
    let answer = server.mock(|when, then| {
        when.method(POST)
            .path("/api/search/answer")
            .json_body(json!({"query": "best value Riesling"}));
        then.status(200).json_body(json!({
            "answer": "Look at Mosel Kabinett.",
            "sources": [
                {"id": 10, "title": "Dr. Loosen Kabinett", "country": "Germany", "variety": "Riesling"},
                {"id": 11, "title": "Selbach Kabinett", "country": "Germany", "variety": "Riesling"}
            ]
        }));
    });

    let mut session = RagSession::new(api(&server)?);
    let first = session.ask("best value Riesling").await?;
    assert_eq!(first.source, AnswerSource::Network);
    assert_eq!(first.source_wines().len(), 2);

    let second = session.ask("  best value Riesling  ").await?;
    assert_eq!(second.source, AnswerSource::Cache);
    assert_eq!(second.answer, first.answer);

    assert!(session.ask("   ").await.is_err());
    answer.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_country_switch_starts_a_fresh_feed() -> Result<()> {
    let server = MockServer::start();
    let france = server.mock(|when, then| {
        when.method(GET).path("/api/wines/by-country/France");
        then.status(200).json_body(json!({
            "country": "France",
            "wines": [{"id": 1, "title": "Chablis", "points": 90}],
            "next_cursor": "f1",
            "has_next": true
        }));
    });
    let italy = server.mock(|when, then| {
        when.method(GET).path("/api/wines/by-country/Italy");
        then.status(200).json_body(json!({
            "country": "Italy",
            "wines": [{"id": 2, "title": "Barolo", "points": 94}],
            "next_cursor": null,
            "has_next": false
        }));
    });

    let mut browser = CountryBrowser::new(api(&server)?, 10, 20);
    browser.select("France").await?;
    assert!(browser.has_more());

    browser.select("Italy").await?;
    assert_eq!(browser.country(), Some("Italy"));
    assert_eq!(browser.wines().len(), 1);
    assert_eq!(browser.wines()[0].title, "Barolo");
    assert!(!browser.has_more());

    // 沒有游標時 load_more 不發出請求
    assert_eq!(browser.load_more().await?, 0);

    france.assert_hits(1);
    italy.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_failed_country_load_leaves_empty_list() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/wines/by-country/Atlantis");
        then.status(404).json_body(json!({"detail": "Country not found"}));
    });

    let mut browser = CountryBrowser::new(api(&server)?, 10, 20);
    let err = browser.select("Atlantis").await.unwrap_err();
    match err {
        WineError::ApiError { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Country not found");
        }
        other => anyhow::bail!("unexpected error: {other}"),
    }
    assert_eq!(browser.country(), Some("Atlantis"));
    assert!(browser.wines().is_empty());
    Ok(())
}
