// Browsing against a mocked TMDB server: HTTP client, catalog feed,
// paginator and persistence together.

use cinebrowse::backends::tmdb::{TmdbApi, TmdbBackend};
use cinebrowse::config::ApiConfig;
use cinebrowse::core::Route;
use cinebrowse::core::pagination::PaginatorOptions;
use cinebrowse::core::viewmodels::{BrowseViewModel, CatalogFeed, MountOutcome};
use cinebrowse::models::MediaSummary;
use cinebrowse::utils::{PaginationError, TransportError};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::common::TestContext;

fn backend(server: &ServerGuard) -> Arc<TmdbBackend> {
    let api = TmdbApi::new(server.url(), "test_key", "pt-BR", Duration::from_secs(5))
        .expect("client builds");
    Arc::new(TmdbBackend::new(api, "https://image.tmdb.org/t/p"))
}

fn movie(id: u64, poster: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Filme {}", id),
        "poster_path": if poster { json!(format!("/p{}.jpg", id)) } else { json!(null) },
        "backdrop_path": null,
        "vote_average": 6.5,
        "release_date": "2023-05-01",
        "overview": ""
    })
}

fn page_body(page: u32, total_pages: u32, results: Vec<serde_json::Value>) -> String {
    json!({
        "page": page,
        "total_pages": total_pages,
        "total_results": 40,
        "results": results
    })
    .to_string()
}

fn view_model(
    backend: Arc<TmdbBackend>,
    route: &Route,
    ctx: &TestContext,
) -> BrowseViewModel<MediaSummary> {
    let catalog = route.catalog().expect("list route");
    let feed = CatalogFeed::new(backend, catalog);
    BrowseViewModel::new(
        route.page_key(),
        feed.paginator(PaginatorOptions::default()),
        &ctx.store,
    )
}

#[tokio::test]
async fn test_movies_route_pages_and_restores() {
    let mut server = Server::new_async().await;
    let page_one = server
        .mock("GET", "/trending/movie/week")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(page_body(
            1,
            2,
            vec![movie(1, true), movie(2, true), movie(3, false)],
        ))
        .expect(1)
        .create_async()
        .await;
    let page_two = server
        .mock("GET", "/trending/movie/week")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(page_body(2, 2, vec![movie(2, true), movie(4, true)]))
        .expect(1)
        .create_async()
        .await;

    let ctx = TestContext::new();
    let route: Route = "/movies".parse().unwrap();
    let backend = backend(&server);

    let vm = view_model(backend.clone(), &route, &ctx);
    assert_eq!(vm.mount().await.unwrap(), MountOutcome::Fetched);
    assert!(vm.load_more().await.unwrap());
    vm.teardown();

    let ids: Vec<u64> = vm.state().items().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert!(!vm.state().has_more());

    // coming back within the horizon hits no endpoint
    let again = view_model(backend, &route, &ctx);
    assert_eq!(again.mount().await.unwrap(), MountOutcome::Restored);
    assert_eq!(again.state().len(), 3);

    page_one.assert_async().await;
    page_two.assert_async().await;
}

#[tokio::test]
async fn test_search_route_encodes_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "star wars".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(page_body(1, 1, vec![movie(11, true)]))
        .create_async()
        .await;

    let ctx = TestContext::new();
    let route: Route = "/search?q=star%20wars".parse().unwrap();
    let vm = view_model(backend(&server), &route, &ctx);
    vm.mount().await.unwrap();

    mock.assert_async().await;
    assert_eq!(vm.state().items()[0].title, "Filme 11");
    assert_eq!(vm.page_key(), "search-movie-star wars");
}

#[tokio::test]
async fn test_server_error_surfaces_on_state() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let ctx = TestContext::new();
    let route: Route = "/genres/28".parse().unwrap();
    let vm = view_model(backend(&server), &route, &ctx);

    let err = vm.mount().await.unwrap_err();
    assert!(matches!(
        err,
        PaginationError::Transport(TransportError::Status { status: 503, .. })
    ));
    assert!(vm.state().is_empty());
    assert!(!vm.state().is_loading());
}

#[test]
fn test_backend_requires_api_key() {
    let config = ApiConfig {
        api_key: None,
        ..ApiConfig::default()
    };
    assert_eq!(
        TmdbBackend::from_config(&config).unwrap_err(),
        TransportError::MissingApiKey
    );
}
