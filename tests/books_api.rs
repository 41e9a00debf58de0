//! Router tests over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use book_registry::{api, config::AppConfig, repository::Repository, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    api::create_router(AppState::new(AppConfig::default(), Repository::in_memory()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    language: Option<&str>,
) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(language) = language {
        request = request.header(header::ACCEPT_LANGUAGE, language);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send(app, method, uri, body, None).await;
    (status, serde_json::from_str(&text).unwrap())
}

async fn create(app: &Router, title: &str, isbn: &str, published: &str) -> i64 {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/book",
        Some(json!({ "title": title, "isbn": isbn, "publishedDate": published })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

async fn seed(app: &Router) {
    create(app, "Dune", "9780441013593", "1965-08-01").await;
    create(app, "Dune Messiah", "9780593098233", "1969-10-15").await;
    create(app, "Children of Dune", "9780593098240", "1976-04-01").await;
    create(app, "Neuromancer", "9780441569595", "1984-07-01").await;
}

#[tokio::test]
async fn test_insert_then_get_round_trip() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/book",
        Some(json!({ "title": "Dune", "isbn": "9780441013593", "publishedDate": "1965-08-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book successfully created");

    let id = body["id"].as_i64().unwrap();
    let (status, book) = send_json(&app, Method::GET, &format!("/book/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        book,
        json!({ "id": id, "title": "Dune", "isbn": "9780441013593", "publishedDate": "1965-08-01" })
    );
}

#[tokio::test]
async fn test_unknown_id_is_not_found_everywhere() {
    let app = app();
    let payload = json!({ "title": "Dune", "isbn": "1", "publishedDate": "1965-08-01" });

    let (status, body) = send_json(&app, Method::GET, "/book/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "status": 404, "error": "Not Found", "message": "Book with id 77 was not found" })
    );

    let (status, _) = send_json(&app, Method::PUT, "/book/77", Some(payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, Method::DELETE, "/book/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The failed update did not create anything
    let (_, list) = send_json(&app, Method::GET, "/book", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_insert_rejects_duplicate_title_or_isbn() {
    let app = app();
    create(&app, "Dune", "9780441013593", "1965-08-01").await;

    for payload in [
        json!({ "title": "Dune", "isbn": "0000000000", "publishedDate": "2000-01-01" }),
        json!({ "title": "Another", "isbn": "9780441013593", "publishedDate": "2000-01-01" }),
    ] {
        let (status, body) = send_json(&app, Method::POST, "/book", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "A book with this title or ISBN already exists");
    }
}

#[tokio::test]
async fn test_insert_reports_missing_fields() {
    let app = app();
    let (status, body) = send_json(&app, Method::POST, "/book", Some(json!({ "title": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(
        body["message"],
        "Title is required; ISBN is required; Published date is required"
    );
}

#[tokio::test]
async fn test_malformed_body_dates_and_json() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/book",
        Some(json!({ "title": "Dune", "isbn": "1", "publishedDate": "01/08/1965" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "status": 400,
            "error": "Bad Request",
            "message": "Dates must be informed in 'yyyy-MM-dd' format"
        })
    );

    let (status, body) = send_json(&app, Method::POST, "/book", Some(json!(42))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad request");
}

#[tokio::test]
async fn test_list_requires_both_dates() {
    let app = app();
    seed(&app).await;

    let (status, body) = send_json(&app, Method::GET, "/book?publishedAfter=2000-01-01", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "status": 400,
            "error": "Bad Request",
            "message": "If filtering by date, both before and after dates must be informed"
        })
    );

    let (status, _) = send_json(&app, Method::GET, "/book?publishedBefore=2000-01-01", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_inclusive_date_range() {
    let app = app();
    seed(&app).await;

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/book?publishedAfter=1965-08-01&publishedBefore=1976-04-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune", "Dune Messiah", "Children of Dune"]);
}

#[tokio::test]
async fn test_list_filters_by_title_substring_ignoring_case() {
    let app = app();
    seed(&app).await;

    let (status, body) = send_json(&app, Method::GET, "/book?title=dun", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = send_json(&app, Method::GET, "/book?title=dune&isbn=9780593", None).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune Messiah", "Children of Dune"]);

    let (_, body) = send_json(&app, Method::GET, "/book", None).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_list_filters_by_whitespace_title() {
    let app = app();
    seed(&app).await;

    let (status, body) = send_json(&app, Method::GET, "/book?title=%20", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune Messiah", "Children of Dune"]);

    let (_, body) = send_json(&app, Method::GET, "/book?title=", None).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_malformed_id_gets_error_body() {
    let app = app();
    let payload = json!({ "title": "Dune", "isbn": "1", "publishedDate": "1965-08-01" });
    let expected = json!({ "status": 400, "error": "Bad Request", "message": "Bad request" });

    for uri in ["/book/abc", "/book/99999999999"] {
        let (status, body) = send_json(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, expected);

        let (status, body) = send_json(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, expected);

        let (status, body) = send_json(&app, Method::PUT, uri, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, expected);
    }

    let (_, text) = send(&app, Method::GET, "/book/abc", None, Some("pt-BR")).await;
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["message"], "Requisição inválida");
}

#[tokio::test]
async fn test_list_rejects_malformed_date_parameter() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::GET,
        "/book?publishedAfter=yesterday&publishedBefore=2000-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Dates must be informed in 'yyyy-MM-dd' format");
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let dune = create(&app, "Dune", "9780441013593", "1965-08-01").await;
    create(&app, "Neuromancer", "9780441569595", "1984-07-01").await;

    // Unchanged title and isbn are not a collision with itself
    let (status, message) = send(
        &app,
        Method::PUT,
        &format!("/book/{}", dune),
        Some(json!({ "title": "Dune", "isbn": "9780441013593", "publishedDate": "1965-09-01" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Book successfully updated");

    let (_, book) = send_json(&app, Method::GET, &format!("/book/{}", dune), None).await;
    assert_eq!(book["publishedDate"], "1965-09-01");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/book/{}", dune),
        Some(json!({ "title": "Neuromancer", "isbn": "9780441013593", "publishedDate": "1965-08-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A book with this title or ISBN already exists");
}

#[tokio::test]
async fn test_delete_twice() {
    let app = app();
    let id = create(&app, "Dune", "9780441013593", "1965-08-01").await;

    let (status, message) = send(&app, Method::DELETE, &format!("/book/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Book successfully deleted");

    let (status, body) = send_json(&app, Method::DELETE, &format!("/book/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Book with id {} was not found", id));
}

#[tokio::test]
async fn test_messages_follow_accept_language() {
    let app = app();

    let (status, text) = send(&app, Method::GET, "/book/5", None, Some("pt-BR,pt;q=0.9,en;q=0.8")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["message"], "Livro com id 5 não foi encontrado");

    let (_, text) = send(
        &app,
        Method::POST,
        "/book",
        Some(json!({ "title": "Dune", "isbn": "1", "publishedDate": "1965-08-01" })),
        Some("pt-BR"),
    )
    .await;
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["message"], "Livro cadastrado com sucesso");

    // Unsupported languages fall back to the default locale
    let (_, text) = send(&app, Method::GET, "/book/5", None, Some("de-DE")).await;
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["message"], "Book with id 5 was not found");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send_json(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
