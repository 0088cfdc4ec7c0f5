use skimmer::config::Config;
use skimmer::fetcher::{FetchError, PageBody, build_page_client, fetch};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn client() -> reqwest::Client {
    build_page_client(&Config::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(
                    "<html><head><title>Test</title></head><body>Hello World</body></html>"
                        .as_bytes(),
                )
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/test", mock_server.uri());
    let result = fetch(&client(), &url).await.unwrap();

    assert_eq!(result.url_final.as_str(), url);
    assert!(result.is_text());
    match result.body {
        PageBody::Text(text) => assert!(text.contains("Hello World")),
        other => panic!("expected text body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/notfound", mock_server.uri());
    let result = fetch(&client(), &url).await;

    match result {
        Err(FetchError::Http { status }) => assert_eq!(status.as_u16(), 404),
        _ => panic!("Expected HTTP 404 error"),
    }
}

#[tokio::test]
async fn test_fetch_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/redirect"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/final"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body>Final page</body></html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/redirect", mock_server.uri());
    let result = fetch(&client(), &url).await.unwrap();

    assert!(result.url_final.as_str().ends_with("/final"));
    match result.body {
        PageBody::Text(text) => assert!(text.contains("Final page")),
        other => panic!("expected text body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let original_content =
        "<html><head><title>Compressed</title></head><body>This content is gzipped!</body></html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(original_content.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed_data)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/gzipped", mock_server.uri());
    let result = fetch(&client(), &url).await.unwrap();

    match result.body {
        PageBody::Text(text) => assert!(text.contains("This content is gzipped!")),
        other => panic!("expected text body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_pdf_is_binary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4 fake pdf bytes".to_vec())
                .insert_header("Content-Type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/report.pdf", mock_server.uri());
    let result = fetch(&client(), &url).await.unwrap();

    assert_eq!(result.content_type, "application/pdf");
    assert!(result.is_binary());
    match result.body {
        PageBody::Binary(bytes) => assert!(bytes.starts_with(b"%PDF")),
        other => panic!("expected binary body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_unsupported_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF]) // JPEG header
                .insert_header("Content-Type", "image/jpeg"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/image", mock_server.uri());
    let result = fetch(&client(), &url).await.unwrap();

    assert_eq!(result.content_type, "image/jpeg");
    assert!(matches!(result.body, PageBody::Unsupported));
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;

    // 6MB > 5MB limit
    let large_body = "x".repeat(6 * 1024 * 1024);

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(large_body.as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/large", mock_server.uri());
    let result = fetch(&client(), &url).await;

    match result {
        Err(FetchError::BodyTooLarge(size)) => assert_eq!(size, 6 * 1024 * 1024),
        other => panic!("Expected BodyTooLarge error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_invalid_url() {
    let result = fetch(&client(), "not-a-valid-url").await;

    match result {
        Err(FetchError::InvalidUrl(_)) => {}
        _ => panic!("Expected InvalidUrl error"),
    }
}

#[tokio::test]
async fn test_fetch_timeout() {
    use std::time::{Duration, Instant};

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"<html></html>".to_vec())
                .insert_header("Content-Type", "text/html")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.set_total_timeout(Duration::from_secs(1));
    let client = build_page_client(&config).unwrap();

    let url = format!("{}/slow", mock_server.uri());
    let started = Instant::now();
    let result = fetch(&client, &url).await;

    assert!(matches!(
        result,
        Err(FetchError::RequestTimeout | FetchError::ConnectTimeout)
    ));
    // must respect the configured budget, not hang for the full delay
    assert!(started.elapsed() < Duration::from_secs(5));
}
