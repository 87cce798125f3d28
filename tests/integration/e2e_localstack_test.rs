//! End-to-end tests against LocalStack S3
//!
//!   HTTP request -> shrinkray -> S3 get/put -> 301 redirect
//!
//! Run with:
//!   cargo build --release
//!   cargo test --test integration_tests e2e -- --ignored --nocapture

use super::test_harness::ServerTestHarness;
use std::io::Cursor;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;
use testcontainers::{clients::Cli, RunnableImage};
use testcontainers_modules::localstack::LocalStack;

static PORT_COUNTER: AtomicU16 = AtomicU16::new(29400);

const IMAGE_BUCKET: &str = "images";
const CONF_BUCKET: &str = "resize-config";
const CONF_FILE: &str = "dimensions.json";
const BASE_URL: &str = "https://cdn.example.com";

fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |_, _| image::Rgba([255, 0, 0, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, image::ImageFormat::Jpeg)
        .unwrap();
    buffer.into_inner()
}

async fn s3_client(endpoint: &str) -> aws_sdk_s3::Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .endpoint_url(endpoint)
        .region(aws_config::Region::new("us-east-1"))
        .credentials_provider(aws_credential_types::Credentials::new(
            "test", "test", None, None, "test",
        ))
        .load()
        .await;
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}

async fn put(client: &aws_sdk_s3::Client, bucket: &str, key: &str, body: Vec<u8>, ct: &str) {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body.into())
        .content_type(ct)
        .send()
        .await
        .expect("Failed to upload object");
}

/// Create both buckets and seed the originals and the dimension config
async fn seed(client: &aws_sdk_s3::Client, dimensions_json: &str) {
    for bucket in [IMAGE_BUCKET, CONF_BUCKET] {
        client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .expect("Failed to create bucket");
    }

    put(
        client,
        CONF_BUCKET,
        CONF_FILE,
        dimensions_json.as_bytes().to_vec(),
        "application/json",
    )
    .await;
    put(client, IMAGE_BUCKET, "photo.jpg", create_test_jpeg(100, 80), "image/jpeg").await;
    put(
        client,
        IMAGE_BUCKET,
        "notes.txt",
        b"not an image".to_vec(),
        "text/plain",
    )
    .await;
}

fn server_env(endpoint: &str) -> Vec<(&'static str, String)> {
    vec![
        ("BUCKET", IMAGE_BUCKET.to_string()),
        ("URL", BASE_URL.to_string()),
        ("CONF_BUCKET", CONF_BUCKET.to_string()),
        ("CONF_FILE", CONF_FILE.to_string()),
        ("S3_ENDPOINT", endpoint.to_string()),
        ("AWS_ACCESS_KEY_ID", "test".to_string()),
        ("AWS_SECRET_ACCESS_KEY", "test".to_string()),
        ("AWS_REGION", "us-east-1".to_string()),
    ]
}

fn no_redirect_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap()
}

#[test]
#[ignore] // Requires Docker and a release build
fn test_e2e_resize_stores_variant_and_redirects() {
    let docker = Cli::default();
    let container =
        docker.run(RunnableImage::from(LocalStack::default()).with_env_var(("SERVICES", "s3")));
    let endpoint = format!("http://127.0.0.1:{}", container.get_host_port_ipv4(4566));

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let s3 = runtime.block_on(async {
        let client = s3_client(&endpoint).await;
        seed(&client, r#"{"supportedDimensions":[]}"#).await;
        client
    });

    let harness =
        ServerTestHarness::start(&server_env(&endpoint), next_port()).expect("Failed to start");
    let response = no_redirect_client()
        .get(harness.url("/?key=40x30/photo.jpg"))
        .send()
        .expect("Request failed");

    assert_eq!(response.status(), 301);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "https://cdn.example.com/40x30/photo.jpg"
    );

    let (stored, content_type) = runtime.block_on(async {
        let object = s3
            .get_object()
            .bucket(IMAGE_BUCKET)
            .key("40x30/photo.jpg")
            .send()
            .await
            .expect("Resized object should exist");
        let content_type = object.content_type().map(str::to_string);
        let body = object.body.collect().await.unwrap().into_bytes();
        (body, content_type)
    });

    assert_eq!(content_type.as_deref(), Some("image/jpeg"));
    let decoded = image::load_from_memory(&stored).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (40, 30));
}

#[test]
#[ignore] // Requires Docker and a release build
fn test_e2e_resolves_to_supported_dimension() {
    let docker = Cli::default();
    let container =
        docker.run(RunnableImage::from(LocalStack::default()).with_env_var(("SERVICES", "s3")));
    let endpoint = format!("http://127.0.0.1:{}", container.get_host_port_ipv4(4566));

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let s3 = runtime.block_on(async {
        let client = s3_client(&endpoint).await;
        seed(
            &client,
            r#"{"supportedDimensions":[{"width":64,"height":48}]}"#,
        )
        .await;
        client
    });

    let harness =
        ServerTestHarness::start(&server_env(&endpoint), next_port()).expect("Failed to start");
    let response = no_redirect_client()
        .get(harness.url("/?key=10x10/photo.jpg"))
        .send()
        .expect("Request failed");
    assert_eq!(response.status(), 301);

    // Stored under the requested key, rendered at the configured size
    let stored = runtime.block_on(async {
        s3.get_object()
            .bucket(IMAGE_BUCKET)
            .key("10x10/photo.jpg")
            .send()
            .await
            .expect("Resized object should exist")
            .body
            .collect()
            .await
            .unwrap()
            .into_bytes()
    });
    let decoded = image::load_from_memory(&stored).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

#[test]
#[ignore] // Requires Docker and a release build
fn test_e2e_errors_are_reported_as_json() {
    let docker = Cli::default();
    let container =
        docker.run(RunnableImage::from(LocalStack::default()).with_env_var(("SERVICES", "s3")));
    let endpoint = format!("http://127.0.0.1:{}", container.get_host_port_ipv4(4566));

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let client = s3_client(&endpoint).await;
        seed(&client, r#"{"supportedDimensions":[]}"#).await;
    });

    let harness =
        ServerTestHarness::start(&server_env(&endpoint), next_port()).expect("Failed to start");
    let client = no_redirect_client();

    for (query, kind) in [
        ("", "MissingParameters"),
        ("?key=photo.jpg", "MalformedKey"),
        ("?key=0x10/photo.jpg", "InvalidDimensions"),
        ("?key=10x10/missing.jpg", "ObjectNotFound"),
        ("?key=10x10/notes.txt", "NotAnImage"),
    ] {
        let response = client
            .get(harness.url(&format!("/{}", query)))
            .send()
            .expect("Request failed");
        assert_eq!(response.status(), 500, "query {:?}", query);

        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["errorType"], kind, "query {:?}", query);
        assert!(body["errorMessage"].is_string());
    }

    let metrics = client
        .get(harness.url("/metrics"))
        .send()
        .unwrap()
        .text()
        .unwrap();
    assert!(metrics.contains("shrinkray_errors_total{kind=\"NotAnImage\"} 1"));
}
