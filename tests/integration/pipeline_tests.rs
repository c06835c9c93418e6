//! End-to-end tests of the discovery pipeline
//!
//! A single mock server plays both the storefront and its product API. The
//! persisted CSV files are read back to check what a run leaves on disk.

use crate::common::{create_test_config, facet_path, listing_html, next_disabled, resolve_path};
use catalog_harvester::crawler::{build_http_client, HttpRenderer};
use catalog_harvester::output::{read_url_list, CsvOutput};
use catalog_harvester::DiscoveryPipeline;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Answers a resolution call with a URL naming the product and the size
fn resolve_by_size(request: &Request) -> ResponseTemplate {
    let body: serde_json::Value = match serde_json::from_slice(&request.body) {
        Ok(body) => body,
        Err(_) => return ResponseTemplate::new(400),
    };
    let product_id = request.url.path().rsplit('/').next().unwrap_or_default();
    let size = body["value"].as_str().unwrap_or_default();

    ResponseTemplate::new(200)
        .set_body_json(json!({"url": format!("/en_US/p/variant/{product_id}/?size={size}")}))
}

async fn mount_size_only_facets(server: &MockServer, product_id: &str) {
    Mock::given(method("GET"))
        .and(path(facet_path(product_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 12,
                "name": "Size",
                "options": [
                    {"id": "S", "label": "Small"},
                    {"id": "M", "label": "Medium"},
                    {"id": "L", "label": "Large"}
                ]
            }
        ])))
        .expect(1)
        .mount(server)
        .await;
}

fn pipeline_for(
    config: &catalog_harvester::Config,
) -> DiscoveryPipeline<HttpRenderer> {
    let client = build_http_client(&config.user_agent).expect("Failed to build client");
    DiscoveryPipeline::from_config(config, HttpRenderer::new(client.clone()), client)
        .expect("Failed to build pipeline")
}

fn output_for(config: &catalog_harvester::Config) -> CsvOutput {
    CsvOutput::new(&config.output.products_path, &config.output.variants_path)
}

#[tokio::test]
async fn test_full_harvest_single_category() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/en_US/balls/272/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(
                    &["/en_US/p/match-ball/15/", "/en_US/p/training-ball/16/"],
                    &next_disabled(),
                ))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_size_only_facets(&mock_server, "15").await;
    mount_size_only_facets(&mock_server, "16").await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/en_US/xhr/product/get_filter_attributes/\d+$"))
        .respond_with(resolve_by_size)
        .expect(6)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&base, vec![format!("{base}/en_US/balls/272/")], dir.path());
    let categories: Vec<Url> = config
        .categories
        .iter()
        .map(|c| Url::parse(c).expect("Failed to parse category"))
        .collect();

    let mut pipeline = pipeline_for(&config);
    let summary = pipeline
        .run(&categories, &mut output_for(&config))
        .await
        .expect("Harvest failed");

    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.products, 2);
    assert_eq!(summary.variants, 6);
    assert_eq!(summary.products_expanded, 2);
    assert_eq!(summary.products_fallback(), 0);

    let products = read_url_list(Path::new(&config.output.products_path)).expect("products file");
    assert_eq!(
        products,
        vec![
            format!("{base}/en_US/p/match-ball/15/"),
            format!("{base}/en_US/p/training-ball/16/"),
        ]
    );

    let variants = read_url_list(Path::new(&config.output.variants_path)).expect("variants file");
    assert_eq!(variants.len(), 6);
    assert!(variants.contains(&format!("{base}/en_US/p/variant/16/?size=M")));

    let raw = std::fs::read_to_string(&config.output.variants_path).expect("variants file");
    assert!(raw.starts_with("Product/Variant URL\n"));
}

#[tokio::test]
async fn test_unavailable_api_keeps_products_as_variants() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/c/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(
            &["/en_US/p/match-ball/15/", "/en_US/gift-card/"],
            &next_disabled(),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(facet_path("15")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&base, vec![format!("{base}/c/1/")], dir.path());
    let categories = vec![Url::parse(&config.categories[0]).expect("category")];

    let mut pipeline = pipeline_for(&config);
    let summary = pipeline
        .run(&categories, &mut output_for(&config))
        .await
        .expect("Harvest failed");

    assert_eq!(summary.products, 2);
    assert_eq!(summary.products_fallback(), 2);
    assert_eq!(pipeline.sets().variants(), pipeline.sets().products());
}

#[tokio::test]
async fn test_variant_stage_from_product_list() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_size_only_facets(&mock_server, "15").await;
    Mock::given(method("POST"))
        .and(path(resolve_path("15")))
        .respond_with(resolve_by_size)
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&base, vec![], dir.path());
    let list = dir.path().join("input.csv");
    std::fs::write(
        &list,
        format!("Product URL\n{base}/en_US/p/match-ball/15/\n{base}/en_US/p/match-ball/15/\n"),
    )
    .expect("Failed to write product list");

    let products = read_url_list(&list).expect("product list");
    let mut pipeline = pipeline_for(&config);
    let summary = pipeline
        .run_variants_only(products, &mut output_for(&config))
        .await
        .expect("Variant stage failed");

    assert_eq!(summary.products, 1);
    assert_eq!(summary.variants, 3);
    assert!(!Path::new(&config.output.products_path).exists());
}
