//! End-to-end pipeline tests against a mock catalog

use crate::helpers::{
    catalog_page, fresh_cache, imageless_card, product_card, test_config, RecordingNotifier,
};
use shopsift::notify::{LogNotifier, Notifier};
use shopsift::scraper::Pipeline;
use shopsift::storage::{JsonFileStorage, ProductStorage};
use shopsift::{ProductCache, StoreCounts};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

async fn mount_catalog(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn build_pipeline(
    config: &shopsift::Config,
    cache: Arc<dyn ProductCache>,
    storage: Arc<dyn ProductStorage>,
    notifier: Arc<dyn Notifier>,
) -> Pipeline {
    Pipeline::new(config, cache, storage, notifier).expect("Failed to build pipeline")
}

#[tokio::test]
async fn test_full_scrape_persists_products() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    let cards = vec![
        product_card(
            "101",
            "Dental Mirror",
            "249.00",
            &format!("{}/img/mirror.jpg", mock_server.uri()),
        ),
        product_card(
            "102",
            "Scaler",
            "399.00",
            &format!("{}/img/scaler.jpg", mock_server.uri()),
        ),
    ];
    mount_catalog(&mock_server, "/", catalog_page(&cards)).await;

    Mock::given(method("GET"))
        .and(path("/img/mirror.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/scaler.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), out_dir.path());
    let storage = Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());
    let pipeline = build_pipeline(
        &config,
        Arc::new(fresh_cache()),
        storage.clone(),
        Arc::new(LogNotifier),
    );

    let counts = pipeline.run(1).await.expect("Scrape failed");
    assert_eq!(counts, StoreCounts { new: 2, updated: 0 });

    let mut products = storage.load_products().unwrap();
    products.sort_by(|a, b| a.product_id.cmp(&b.product_id));
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product_id, "101");
    assert_eq!(products[0].title, "Dental Mirror");
    assert_eq!(products[0].price, 249.0);
    assert!(products[0].is_complete());

    // Raw image bytes written verbatim
    let image_bytes = std::fs::read(&products[0].image_path).unwrap();
    assert_eq!(image_bytes, JPEG_BYTES);
}

#[tokio::test]
async fn test_cached_product_not_redownloaded() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    let cards = vec![product_card(
        "201",
        "Probe",
        "120.00",
        &format!("{}/img/probe.jpg", mock_server.uri()),
    )];
    mount_catalog(&mock_server, "/", catalog_page(&cards)).await;

    // The image must be fetched exactly once across both runs
    Mock::given(method("GET"))
        .and(path("/img/probe.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), out_dir.path());
    let cache: Arc<dyn ProductCache> = Arc::new(fresh_cache());
    let storage: Arc<dyn ProductStorage> =
        Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());

    let pipeline = build_pipeline(&config, cache.clone(), storage.clone(), Arc::new(LogNotifier));

    let first = pipeline.run(1).await.unwrap();
    assert_eq!(first, StoreCounts { new: 1, updated: 0 });

    // Same price on the second pass: dropped at the cache, before download
    let second = pipeline.run(1).await.unwrap();
    assert_eq!(second, StoreCounts { new: 0, updated: 0 });
}

#[tokio::test]
async fn test_price_change_forces_reprocess() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    let image_url = format!("{}/img/forceps.jpg", mock_server.uri());
    mount_catalog(
        &mock_server,
        "/",
        catalog_page(&[product_card("301", "Forceps", "500.00", &image_url)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/forceps.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), out_dir.path());
    let cache: Arc<dyn ProductCache> = Arc::new(fresh_cache());
    let storage: Arc<dyn ProductStorage> =
        Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());

    let pipeline = build_pipeline(&config, cache.clone(), storage.clone(), Arc::new(LogNotifier));
    let first = pipeline.run(1).await.unwrap();
    assert_eq!(first, StoreCounts { new: 1, updated: 0 });

    // The catalog now lists a new price for the same product
    mock_server.reset().await;
    mount_catalog(
        &mock_server,
        "/",
        catalog_page(&[product_card("301", "Forceps", "450.00", &image_url)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/forceps.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .expect(1)
        .mount(&mock_server)
        .await;

    let second = pipeline.run(1).await.unwrap();
    assert_eq!(second, StoreCounts { new: 0, updated: 1 });

    let products = storage.load_products().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price, 450.0);
}

#[tokio::test]
async fn test_zero_pages_returns_zero_counts() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    // Nothing should be fetched at all
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), out_dir.path());
    let storage = Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());
    let pipeline = build_pipeline(
        &config,
        Arc::new(fresh_cache()),
        storage,
        Arc::new(LogNotifier),
    );

    let counts = pipeline.run(0).await.unwrap();
    assert_eq!(counts, StoreCounts::default());
}

#[tokio::test]
async fn test_requested_pages_capped_at_max() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    mount_catalog(&mock_server, "/", catalog_page(&[])).await;

    // Page 2 must never be requested with max-page-limit = 1
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri(), out_dir.path());
    config.scraper.max_page_limit = 1;

    let storage = Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());
    let pipeline = build_pipeline(
        &config,
        Arc::new(fresh_cache()),
        storage,
        Arc::new(LogNotifier),
    );

    let counts = pipeline.run(5).await.unwrap();
    assert_eq!(counts, StoreCounts::default());
}

#[tokio::test]
async fn test_failed_page_skipped_pipeline_continues() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    // Page 1 always fails; fetcher retries then skips it
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    // Page 2 works and carries one product
    mount_catalog(
        &mock_server,
        "/page/2",
        catalog_page(&[product_card(
            "401",
            "Curette",
            "220.00",
            &format!("{}/img/curette.jpg", mock_server.uri()),
        )]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/curette.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), out_dir.path());
    let storage = Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());
    let pipeline = build_pipeline(
        &config,
        Arc::new(fresh_cache()),
        storage.clone(),
        Arc::new(LogNotifier),
    );

    // Must not error despite page 1 exhausting its retries
    let counts = pipeline.run(2).await.expect("Run should not fail");
    assert_eq!(counts, StoreCounts { new: 1, updated: 0 });

    let products = storage.load_products().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_id, "401");
}

#[tokio::test]
async fn test_candidate_without_image_not_downloaded() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    mount_catalog(
        &mock_server,
        "/",
        catalog_page(&[imageless_card("501", "Imageless", "99.00")]),
    )
    .await;

    // No image endpoint may ever be hit
    Mock::given(method("GET"))
        .and(path("/img/never.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), out_dir.path());
    let storage = Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());
    let pipeline = build_pipeline(
        &config,
        Arc::new(fresh_cache()),
        storage.clone(),
        Arc::new(LogNotifier),
    );

    let counts = pipeline.run(1).await.unwrap();
    assert_eq!(counts, StoreCounts::default());
    assert!(storage.load_products().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_image_download_drops_only_that_candidate() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    let cards = vec![
        product_card(
            "601",
            "Broken Image",
            "10.00",
            &format!("{}/img/broken.jpg", mock_server.uri()),
        ),
        product_card(
            "602",
            "Good Image",
            "20.00",
            &format!("{}/img/good.jpg", mock_server.uri()),
        ),
    ];
    mount_catalog(&mock_server, "/", catalog_page(&cards)).await;

    Mock::given(method("GET"))
        .and(path("/img/broken.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/good.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), out_dir.path());
    let storage = Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());
    let pipeline = build_pipeline(
        &config,
        Arc::new(fresh_cache()),
        storage.clone(),
        Arc::new(LogNotifier),
    );

    let counts = pipeline.run(1).await.unwrap();
    assert_eq!(counts, StoreCounts { new: 1, updated: 0 });

    let products = storage.load_products().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_id, "602");
}

#[tokio::test]
async fn test_notifier_receives_final_counts() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    mount_catalog(
        &mock_server,
        "/",
        catalog_page(&[product_card(
            "701",
            "Elevator",
            "310.00",
            &format!("{}/img/elevator.jpg", mock_server.uri()),
        )]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/elevator.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), out_dir.path());
    let storage = Arc::new(JsonFileStorage::new(&config.output.products_path).unwrap());
    let recorder = Arc::new(RecordingNotifier::new());

    let pipeline = build_pipeline(
        &config,
        Arc::new(fresh_cache()),
        storage,
        recorder.clone(),
    );
    pipeline.run(1).await.unwrap();

    assert_eq!(*recorder.calls.lock().unwrap(), vec![(1, 0)]);
}
