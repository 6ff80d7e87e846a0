use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{header, StatusCode as HttpStatusCode};
use serde_json::{json, Value};
use service::person::repo::InMemoryPersonRepository;
use service::seed::seed_people;
use tokio::net::TcpListener;

use server::ServerState;

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn start_server(seed: bool) -> anyhow::Result<TestApp> {
    let repo = Arc::new(InMemoryPersonRepository::new());
    if seed {
        seed_people(&*repo).await?;
    }
    let app = server::app(ServerState::new(repo));

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(TestApp { base_url: format!("http://{}", addr) })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn new_person(first: &str, email: &str) -> Value {
    json!({ "firstName": first, "lastName": "Doe", "age": 30.5, "email": email })
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let res = client().get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn list_returns_seeded_people_in_id_order() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let res = client().get(app.url("/Persons")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "success");
    assert!(body["error"].is_null());
    let data = body["data"].as_array().expect("array");
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["id"], 1);
    assert_eq!(data[0]["firstName"], "John");
    assert_eq!(data[4]["email"], "charlie.davis@example.com");
    Ok(())
}

#[tokio::test]
async fn empty_store_lists_empty_array() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let body: Value = client().get(app.url("/Persons")).send().await?.json().await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn create_then_fetch() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();

    // client supplied id is ignored
    let mut payload = new_person("Ann", "ann@example.com");
    payload["id"] = json!(99);
    let res = c.post(app.url("/Persons")).json(&payload).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    assert_eq!(
        res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/Persons/1")
    );
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["age"], 30.5);

    let res = c.get(app.url("/Persons/1")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["email"], "ann@example.com");
    assert_eq!(body["data"]["lastName"], "Doe");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_conflict() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();
    let res = c.post(app.url("/Persons")).json(&new_person("A", "dup@example.com")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.post(app.url("/Persons")).json(&new_person("B", "dup@example.com")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "error");
    assert!(body["data"].is_null());
    assert!(body["error"].as_str().unwrap_or_default().contains("dup@example.com"));
    Ok(())
}

#[tokio::test]
async fn invalid_payloads_are_rejected() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();

    let res = c.post(app.url("/Persons")).json(&new_person("", "blank@example.com")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.post(app.url("/Persons")).json(&new_person("A", "not-an-email")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let mut negative = new_person("A", "neg@example.com");
    negative["age"] = json!(-1);
    let res = c.post(app.url("/Persons")).json(&negative).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c
        .post(app.url("/Persons"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "error");

    let res = c.post(app.url("/Persons")).body("{}").send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body: Value = c.get(app.url("/Persons")).send().await?.json().await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn unknown_id_is_not_found() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();

    let res = c.get(app.url("/Persons/42")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "not found: Person with id 42 does not exist");

    let res = c.put(app.url("/Persons/42")).json(&new_person("A", "a@example.com")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(app.url("/Persons/42")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let res = client().get(app.url("/Persons/abc")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_replaces_fields() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let payload = json!({ "id": 2, "firstName": "Janet", "lastName": "Smith", "age": 23.0, "email": "janet@example.com" });
    let res = c.put(app.url("/Persons/2")).json(&payload).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["id"], 2);
    assert_eq!(body["data"]["firstName"], "Janet");

    // keeping the own email is not a conflict
    let res = c.put(app.url("/Persons/2")).json(&payload).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let body: Value = c.get(app.url("/Persons/2")).send().await?.json().await?;
    assert_eq!(body["data"]["email"], "janet@example.com");
    Ok(())
}

#[tokio::test]
async fn update_with_mismatched_id_is_bad_request() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let payload = json!({ "id": 3, "firstName": "X", "lastName": "Y", "age": 1.0, "email": "x@example.com" });
    let res = client().put(app.url("/Persons/2")).json(&payload).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let body: Value = client().get(app.url("/Persons/2")).send().await?.json().await?;
    assert_eq!(body["data"]["firstName"], "Jane");
    Ok(())
}

#[tokio::test]
async fn update_to_taken_email_is_conflict() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let payload = json!({ "id": 2, "firstName": "Jane", "lastName": "Smith", "age": 22.3, "email": "john.doe@example.com" });
    let res = client().put(app.url("/Persons/2")).json(&payload).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn delete_then_gone() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let res = c.delete(app.url("/Persons/3")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let res = c.get(app.url("/Persons/3")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.delete(app.url("/Persons/3")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    // ids are not reused
    let res = c.post(app.url("/Persons")).json(&new_person("New", "new@example.com")).send().await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["id"], 6);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let res = client().get(app.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert!(body["paths"]["/Persons/{id}"].is_object());
    Ok(())
}
