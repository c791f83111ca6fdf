use super::*;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::draft::DraftField;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
struct Backend {
    next_id: i64,
    laptops: Vec<Value>,
    received: Vec<(String, Value)>,
    content_types: Vec<String>,
}

impl Backend {
    fn note_headers(&mut self, headers: &HeaderMap) {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.content_types.push(content_type);
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.laptops
            .iter()
            .position(|laptop| laptop["id"] == json!(id))
    }
}

#[derive(Clone)]
struct ServerState {
    backend: Arc<Mutex<Backend>>,
    failure: Option<(StatusCode, String)>,
}

impl ServerState {
    fn failure_response(&self) -> Option<Response> {
        self.failure
            .as_ref()
            .map(|(status, body)| (*status, body.clone()).into_response())
    }
}

fn json_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    json_response(StatusCode::NOT_FOUND, json!({"message": "Laptop not found"}))
}

async fn list_laptops(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    if let Some(response) = state.failure_response() {
        return response;
    }
    let mut backend = state.backend.lock().await;
    backend.note_headers(&headers);
    json_response(StatusCode::OK, Value::Array(backend.laptops.clone()))
}

async fn create_laptop(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    if let Some(response) = state.failure_response() {
        return response;
    }
    let mut backend = state.backend.lock().await;
    backend.note_headers(&headers);
    backend.received.push(("POST /laptops".into(), payload.clone()));
    backend.next_id += 1;
    let mut stored = payload;
    stored["id"] = json!(backend.next_id);
    backend.laptops.push(stored.clone());
    json_response(StatusCode::CREATED, stored)
}

async fn get_laptop(State(state): State<ServerState>, Path(id): Path<i64>) -> Response {
    if let Some(response) = state.failure_response() {
        return response;
    }
    let backend = state.backend.lock().await;
    match backend.position(id) {
        Some(index) => json_response(StatusCode::OK, backend.laptops[index].clone()),
        None => not_found(),
    }
}

async fn update_laptop(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Response {
    if let Some(response) = state.failure_response() {
        return response;
    }
    let mut backend = state.backend.lock().await;
    backend
        .received
        .push((format!("PUT /laptops/{id}"), payload.clone()));
    let Some(index) = backend.position(id) else {
        return not_found();
    };
    let mut stored = payload;
    stored["id"] = json!(id);
    backend.laptops[index] = stored.clone();
    json_response(StatusCode::OK, stored)
}

async fn delete_laptop(State(state): State<ServerState>, Path(id): Path<i64>) -> Response {
    if let Some(response) = state.failure_response() {
        return response;
    }
    let mut backend = state.backend.lock().await;
    let Some(index) = backend.position(id) else {
        return not_found();
    };
    backend.laptops.remove(index);
    StatusCode::NO_CONTENT.into_response()
}

async fn serve(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn spawn_laptops_server(
    failure: Option<(StatusCode, &str)>,
) -> (String, Arc<Mutex<Backend>>) {
    let backend = Arc::new(Mutex::new(Backend::default()));
    let state = ServerState {
        backend: Arc::clone(&backend),
        failure: failure.map(|(status, body)| (status, body.to_string())),
    };
    let app = Router::new()
        .route("/api/laptops", get(list_laptops).post(create_laptop))
        .route(
            "/api/laptops/:id",
            get(get_laptop).put(update_laptop).delete(delete_laptop),
        )
        .with_state(state);
    let server_url = serve(app).await;
    (format!("{server_url}/api"), backend)
}

#[derive(Default)]
struct RecordingObserver {
    events: std::sync::Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().expect("events").clone()
    }

    fn push(&self, event: String) {
        self.events.lock().expect("events").push(event);
    }
}

impl RequestObserver for RecordingObserver {
    fn on_request(&self, request: &observer::OutboundRequest<'_>) {
        self.push(format!(
            "request {} {} {}",
            request.method,
            request.url.path(),
            request.payload.map(Value::to_string).unwrap_or_default()
        ));
    }

    fn on_response(&self, response: &observer::InboundResponse<'_>) {
        self.push(format!(
            "response {} {} {}",
            response.method,
            response.url.path(),
            response.status.as_u16()
        ));
    }

    fn on_failure(&self, failure: &observer::FailedRequest<'_>) {
        self.push(format!(
            "failure {} {} {}",
            failure.method,
            failure.url.path(),
            failure.error
        ));
    }
}

fn quiet_client(base_url: &str) -> LaptopClient {
    LaptopClient::new_with_observer(base_url, Arc::new(NoopObserver)).expect("client")
}

fn dell_draft() -> LaptopDraft {
    let mut draft = LaptopDraft::default();
    draft.set(DraftField::Brand, "Dell");
    draft.set(DraftField::Model, "XPS 13");
    draft.set(DraftField::Price, "999.99");
    draft.set(DraftField::Ram, "16");
    draft
}

#[tokio::test]
async fn create_sends_coerced_payload_and_list_reflects_it() {
    let (base_url, backend) = spawn_laptops_server(None).await;
    let client = quiet_client(&base_url);

    let created = client.create(&dell_draft()).await.expect("create");
    assert_eq!(created.id, Some(LaptopId::Number(1)));

    {
        let backend = backend.lock().await;
        let (route, payload) = &backend.received[0];
        assert_eq!(route, "POST /laptops");
        assert_eq!(
            payload,
            &json!({
                "brand": "Dell",
                "model": "XPS 13",
                "price": 999.99,
                "processor": "",
                "ram": 16,
                "storage": 0,
                "gpu": "",
                "operatingSystem": "",
                "screenSize": 0.0,
                "description": "",
                "isAvailable": true,
                "stockQuantity": 0
            })
        );
    }

    let laptops = client.list_all().await.expect("list");
    assert_eq!(laptops.len(), 1);
    assert_eq!(laptops[0].brand, "Dell");
    assert_eq!(laptops[0].model, "XPS 13");
    assert_eq!(laptops[0].price, 999.99);
    assert_eq!(laptops[0].ram, 16);
    assert_eq!(laptops[0].storage, 0);
}

#[tokio::test]
async fn update_then_get_returns_record_as_submitted() {
    let (base_url, backend) = spawn_laptops_server(None).await;
    let client = quiet_client(&base_url);
    let created = client.create(&dell_draft()).await.expect("create");
    let id = created.id.clone().expect("id");

    let mut edited = client.get_by_id(&id).await.expect("get");
    edited.price = 1249.5;
    edited.description = "  keeps its padding  ".into();
    edited
        .extra
        .insert("color".into(), json!({"name": "platinum"}));

    client.update(&id, &edited).await.expect("update");
    let fetched = client.get_by_id(&id).await.expect("refetch");

    assert_eq!(fetched, edited);
    let backend = backend.lock().await;
    let (route, payload) = backend.received.last().expect("put");
    assert_eq!(route, "PUT /laptops/1");
    assert_eq!(payload["description"], json!("  keeps its padding  "));
    assert!(payload.get("id").is_none());
}

#[tokio::test]
async fn removed_laptop_is_gone_and_reads_as_not_found() {
    let (base_url, _backend) = spawn_laptops_server(None).await;
    let client = quiet_client(&base_url);
    let id = client
        .create(&dell_draft())
        .await
        .expect("create")
        .id
        .expect("id");

    let response = client.remove(&id).await.expect("remove");
    assert_eq!(response, Value::Null);

    assert!(client.list_all().await.expect("list").is_empty());
    let err = client.get_by_id(&id).await.expect_err("gone");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Failed to fetch laptop: Laptop not found");

    let err = client.remove(&id).await.expect_err("second delete");
    assert_eq!(err.kind(), ErrorKind::DeleteFailed);
}

#[tokio::test]
async fn fetch_failures_prefer_server_message() {
    let (base_url, _backend) = spawn_laptops_server(Some((
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message":"database offline","title":"Internal Server Error"}"#,
    )))
    .await;
    let client = quiet_client(&base_url);

    let err = client.list_all().await.expect_err("list fails");
    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    assert_eq!(err.to_string(), "Failed to fetch laptops: database offline");

    let err = client
        .get_by_id(&LaptopId::Number(3))
        .await
        .expect_err("get fails");
    assert_eq!(err.to_string(), "Failed to fetch laptop: database offline");

    let err = client.create(&dell_draft()).await.expect_err("create fails");
    assert_eq!(
        err.to_string(),
        "Failed to create laptop: Internal Server Error"
    );
}

#[tokio::test]
async fn create_failure_prefers_title_then_message() {
    let (base_url, _backend) = spawn_laptops_server(Some((
        StatusCode::BAD_REQUEST,
        r#"{"message":"price must be positive"}"#,
    )))
    .await;
    let client = quiet_client(&base_url);

    let err = client.create(&dell_draft()).await.expect_err("create fails");
    assert_eq!(err.kind(), ErrorKind::CreateFailed);
    assert_eq!(
        err.to_string(),
        "Failed to create laptop: price must be positive"
    );
}

#[tokio::test]
async fn failures_without_structured_body_use_status_text() {
    let (base_url, _backend) =
        spawn_laptops_server(Some((StatusCode::SERVICE_UNAVAILABLE, "maintenance"))).await;
    let client = quiet_client(&base_url);
    let id = LaptopId::Number(1);

    let err = client
        .update(&id, &dell_draft().to_record())
        .await
        .expect_err("update fails");
    assert_eq!(err.kind(), ErrorKind::UpdateFailed);
    assert_eq!(
        err.to_string(),
        "Failed to update laptop: Request failed with status code 503"
    );

    let err = client.remove(&id).await.expect_err("delete fails");
    assert_eq!(
        err.to_string(),
        "Failed to delete laptop: Request failed with status code 503"
    );
}

#[tokio::test]
async fn unreachable_backend_reports_fetch_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = quiet_client(&format!("http://{addr}"));
    let err = client.list_all().await.expect_err("no server");
    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    assert!(err.to_string().starts_with("Failed to fetch laptops: "));
}

#[tokio::test]
async fn blank_required_fields_never_reach_the_network() {
    let (base_url, backend) = spawn_laptops_server(None).await;
    let observer = Arc::new(RecordingObserver::default());
    let client = LaptopClient::new_with_observer(&base_url, observer.clone()).expect("client");

    let mut draft = dell_draft();
    draft.set(DraftField::Model, "   ");
    let err = client.create(&draft).await.expect_err("invalid");
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);

    let mut record = dell_draft().to_record();
    record.brand.clear();
    let err = client
        .update(&LaptopId::Number(1), &record)
        .await
        .expect_err("invalid");
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);

    assert!(observer.events().is_empty());
    assert!(backend.lock().await.received.is_empty());
}

#[tokio::test]
async fn observer_sees_every_exchange_and_json_header_is_sent() {
    let (base_url, backend) = spawn_laptops_server(None).await;
    let observer = Arc::new(RecordingObserver::default());
    let client = LaptopClient::new_with_observer(&base_url, observer.clone()).expect("client");

    client.list_all().await.expect("list");
    client.create(&dell_draft()).await.expect("create");
    let _ = client.get_by_id(&LaptopId::Number(99)).await;

    let events = observer.events();
    assert_eq!(events.len(), 6);
    assert_eq!(events[0], "request GET /api/laptops ");
    assert_eq!(events[1], "response GET /api/laptops 200");
    assert!(events[2].starts_with("request POST /api/laptops {"));
    assert_eq!(events[3], "response POST /api/laptops 201");
    assert_eq!(
        events[5],
        "failure GET /api/laptops/99 Request failed with status code 404"
    );

    let backend = backend.lock().await;
    assert_eq!(
        backend.content_types,
        vec!["application/json".to_string(), "application/json".to_string()]
    );
}

#[tokio::test]
async fn empty_success_body_for_single_laptop_is_not_found() {
    let app = Router::new().route("/laptops/:id", get(|| async { "null" }));
    let base_url = serve(app).await;
    let client = quiet_client(&base_url);

    let err = client
        .get_by_id(&LaptopId::Number(4))
        .await
        .expect_err("empty");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Failed to fetch laptop: Laptop 4 not found");
}

#[tokio::test]
async fn non_array_list_body_reads_as_empty_collection() {
    let app = Router::new().route(
        "/laptops",
        get(|| async { Json(json!({"items": "not an array"})) }),
    );
    let base_url = serve(app).await;
    let client = quiet_client(&base_url);

    assert!(client.list_all().await.expect("list").is_empty());
}

#[test]
fn base_url_keeps_prefix_and_drops_trailing_slash() {
    let client = quiet_client("https://inventory.example.com/api/");
    assert_eq!(client.base_url().as_str(), "https://inventory.example.com/api");
    assert_eq!(
        client.item_url(&LaptopId::Number(5)).as_str(),
        "https://inventory.example.com/api/laptops/5"
    );
    assert_eq!(
        client.item_url(&LaptopId::from("a/b")).as_str(),
        "https://inventory.example.com/api/laptops/a%2Fb"
    );
    assert_eq!(
        client.item_url(&LaptopId::from("007")).as_str(),
        "https://inventory.example.com/api/laptops/007"
    );

    let bare = quiet_client("http://localhost:5000");
    assert_eq!(bare.collection_url().as_str(), "http://localhost:5000/laptops");
}

#[test]
fn base_url_rejects_unsupported_addresses() {
    assert!(matches!(
        parse_base_url("ftp://files.example.com"),
        Err(SetupError::InvalidBaseUrl { .. })
    ));
    assert!(parse_base_url("not a url").is_err());
    assert!(parse_base_url("http://host/api?x=1").is_err());
}
