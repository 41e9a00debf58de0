//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Titles and ISBNs are unique, so every run uses its own suffix
fn unique_suffix() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos()
        .to_string()
}

async fn create_book(client: &Client, title: &str, isbn: &str) -> i64 {
    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "title": title,
            "isbn": isbn,
            "publishedDate": "1965-08-01"
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse create response");
    body["id"].as_i64().expect("No book ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_get_and_delete_book() {
    let client = Client::new();
    let suffix = unique_suffix();
    let id = create_book(&client, &format!("Dune {}", suffix), &suffix).await;

    let response = client
        .get(format!("{}/book/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["isbn"], suffix.as_str());
    assert_eq!(body["publishedDate"], "1965-08-01");

    let response = client
        .delete(format!("{}/book/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("{}/book/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_is_rejected() {
    let client = Client::new();
    let suffix = unique_suffix();
    let id = create_book(&client, &format!("Original {}", suffix), &suffix).await;

    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "title": format!("Copy {}", suffix),
            "isbn": suffix,
            "publishedDate": "1965-08-01"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Cleanup
    let _ = client
        .delete(format!("{}/book/{}", BASE_URL, id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_list_with_single_date_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/book?publishedAfter=2000-01-01", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
#[ignore]
async fn test_localized_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/book/{}", BASE_URL, i32::MAX))
        .header("Accept-Language", "pt-BR")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        format!("Livro com id {} não foi encontrado", i32::MAX)
    );
}
