//! Integration tests for the category crawler
//!
//! These tests serve listing pages from wiremock and walk them through the
//! real HTTP renderer.

use crate::common::{create_test_config, listing_html, next_disabled, next_link};
use catalog_harvester::crawler::{build_http_client, CategoryCrawler, HttpRenderer, Termination};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn crawler_for(server: &MockServer) -> (CategoryCrawler<HttpRenderer>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&server.uri(), vec![], dir.path());
    let client = build_http_client(&config.user_agent).expect("Failed to build client");
    let crawler = CategoryCrawler::from_config(HttpRenderer::new(client), &config)
        .expect("Failed to build crawler");
    (crawler, dir)
}

fn category_url(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), path)).expect("Failed to parse category URL")
}

#[tokio::test]
async fn test_page_chain_visited_exactly_once_each() {
    let mock_server = MockServer::start().await;

    // Pages 1..=4 link forward; only page 5 carries the disabled marker
    let pages = 5;
    for page in 1..=pages {
        let product = format!("/en_US/p/item-{page}/{}/", 100 + page);
        let next = if page < pages {
            next_link(&format!("/en_US/balls/272/page/{}/", page + 1))
        } else {
            next_disabled()
        };
        let page_path = if page == 1 {
            "/en_US/balls/272/".to_string()
        } else {
            format!("/en_US/balls/272/page/{page}/")
        };

        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(html(listing_html(&[&product], &next)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let (crawler, _dir) = crawler_for(&mock_server).await;
    let crawl = crawler
        .crawl(&category_url(&mock_server, "/en_US/balls/272/"))
        .await;

    assert_eq!(crawl.pages_visited, 5);
    assert_eq!(crawl.termination, Termination::NextDisabled);
    assert_eq!(crawl.product_urls.len(), 5);
    assert!(crawl
        .product_urls
        .contains(&format!("{}/en_US/p/item-3/103/", mock_server.uri())));
}

#[tokio::test]
async fn test_duplicate_products_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/c/1/"))
        .respond_with(html(listing_html(
            &["/p/ball/10/", "/p/net/11/"],
            &next_link("/c/1/page/2/"),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c/1/page/2/"))
        .respond_with(html(listing_html(
            &["/p/net/11/", "/p/cone/12/"],
            &next_disabled(),
        )))
        .mount(&mock_server)
        .await;

    let (crawler, _dir) = crawler_for(&mock_server).await;
    let crawl = crawler.crawl(&category_url(&mock_server, "/c/1/")).await;

    assert_eq!(crawl.pages_visited, 2);
    assert_eq!(crawl.product_urls.len(), 3);
}

#[tokio::test]
async fn test_missing_next_control_ends_category() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/c/1/"))
        .respond_with(html(listing_html(&["/p/ball/10/"], "")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (crawler, _dir) = crawler_for(&mock_server).await;
    let crawl = crawler.crawl(&category_url(&mock_server, "/c/1/")).await;

    assert_eq!(crawl.pages_visited, 1);
    assert_eq!(crawl.termination, Termination::NoNextControl);
}

#[tokio::test]
async fn test_server_error_abandons_but_keeps_gathered_urls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/c/1/"))
        .respond_with(html(listing_html(
            &["/p/ball/10/"],
            &next_link("/c/1/page/2/"),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c/1/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (crawler, _dir) = crawler_for(&mock_server).await;
    let crawl = crawler.crawl(&category_url(&mock_server, "/c/1/")).await;

    assert!(crawl.termination.is_abandoned());
    assert_eq!(crawl.pages_visited, 2);
    assert_eq!(crawl.product_urls.len(), 1);
}

#[tokio::test]
async fn test_slow_page_counts_as_no_products() {
    let mock_server = MockServer::start().await;

    // Page timeout in the test config is 1 second
    Mock::given(method("GET"))
        .and(path("/c/1/"))
        .respond_with(
            html(listing_html(&["/p/ball/10/"], &next_disabled()))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let (crawler, _dir) = crawler_for(&mock_server).await;
    let crawl = crawler.crawl(&category_url(&mock_server, "/c/1/")).await;

    assert_eq!(crawl.termination, Termination::NoProducts);
    assert!(crawl.product_urls.is_empty());
}

#[tokio::test]
async fn test_empty_listing_counts_as_no_products() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/c/1/"))
        .respond_with(html(listing_html(&[], &next_link("/c/1/page/2/"))))
        .mount(&mock_server)
        .await;

    let (crawler, _dir) = crawler_for(&mock_server).await;
    let crawl = crawler.crawl(&category_url(&mock_server, "/c/1/")).await;

    assert_eq!(crawl.pages_visited, 1);
    assert_eq!(crawl.termination, Termination::NoProducts);
}
