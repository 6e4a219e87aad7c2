#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::process::{Command, Output};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Runs the `opsdesk` binary in an isolated temp directory
pub struct OpsdeskTest {
    pub temp_dir: TempDir,
    api_url: Option<String>,
}

impl OpsdeskTest {
    pub fn new() -> Self {
        OpsdeskTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            api_url: None,
        }
    }

    /// Point every run at `api`
    pub fn with_api(api: &MockApi) -> Self {
        let mut test = Self::new();
        test.api_url = Some(api.url());
        test
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_opsdesk"));
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("OPSDESK_LOG");
        match &self.api_url {
            Some(url) => cmd.env("OPSDESK_API_URL", url),
            None => cmd.env_remove("OPSDESK_API_URL"),
        };
        cmd.output().expect("Failed to execute opsdesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout).expect("Command output should be valid JSON")
    }

    pub fn login(&self) {
        self.run_success(&["login", "Operator"]);
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".opsdesk");
        fs::create_dir_all(&dir).expect("Failed to create .opsdesk directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(relative)).expect("Failed to read file")
    }

    pub fn file_exists(&self, relative: &str) -> bool {
        self.temp_dir.path().join(relative).exists()
    }
}

// ============================================================================
// Mock operations API
// ============================================================================

/// One request as the mock API received it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct ApiState {
    customers: Vec<Value>,
    invoices: Vec<Value>,
    requests: Vec<Recorded>,
    required_token: Option<String>,
    fail_with: Option<StatusCode>,
}

type Shared = Arc<Mutex<ApiState>>;

/// In-process HTTP server with the operations API's routes.
///
/// Runs on its own thread and runtime so both blocking tests and
/// `#[tokio::test]` tests can use it.
pub struct MockApi {
    addr: SocketAddr,
    state: Shared,
}

impl MockApi {
    pub fn start() -> Self {
        let state = Shared::default();

        let app = Router::new()
            .route("/customers", get(list_customers).post(create_customer))
            .route("/customers/{id}", put(update_customer))
            .route("/search-customers", get(search_customers))
            .route("/invoices/all", get(list_invoices))
            .route("/invoices/search", get(search_invoices))
            .with_state(state.clone());

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock api");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("mock api address");

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock api runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("mock api server");
            });
        });

        MockApi { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn with_customers(self, customers: Vec<Value>) -> Self {
        self.state.lock().customers = customers;
        self
    }

    pub fn with_invoices(self, invoices: Vec<Value>) -> Self {
        self.state.lock().invoices = invoices;
        self
    }

    /// Answer 401 unless `Authorization: Bearer <token>` is sent
    pub fn require_token(self, token: &str) -> Self {
        self.state.lock().required_token = Some(format!("Bearer {token}"));
        self
    }

    /// Answer every request with `status`
    pub fn fail_with(&self, status: StatusCode) {
        self.state.lock().fail_with = Some(status);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

/// Record the request and decide whether to refuse it.
fn admit(
    state: &Shared,
    method: Method,
    path: String,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: Option<Value>,
) -> Result<(), Response> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut state = state.lock();
    state.requests.push(Recorded {
        method,
        path,
        query,
        body,
        authorization: authorization.clone(),
    });

    let authorized = match &state.required_token {
        Some(required) => authorization.as_ref() == Some(required),
        None => true,
    };
    if !authorized {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response());
    }
    if let Some(status) = state.fail_with {
        return Err((status, Json(json!({ "message": "simulated failure" }))).into_response());
    }
    Ok(())
}

fn matches_filter(record: &Value, query: &HashMap<String, String>) -> bool {
    let text = |v: &Value, key: &str| v.get(key).and_then(Value::as_str).unwrap_or("").to_string();
    let person = record.get("customer").unwrap_or(record);

    if let Some(phone) = query.get("phone") {
        let stored = if text(person, "phone").is_empty() {
            text(person, "phoneNumber")
        } else {
            text(person, "phone")
        };
        return stored.contains(phone.as_str());
    }
    if let Some(name) = query.get("name") {
        let full = format!("{} {}", text(person, "firstName"), text(person, "lastName"));
        return full.to_lowercase().contains(&name.to_lowercase());
    }
    false
}

async fn list_customers(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, Response> {
    admit(&state, Method::GET, "/customers".into(), HashMap::new(), &headers, None)?;
    Ok(Json(state.lock().customers.clone()))
}

async fn search_customers(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, Response> {
    admit(&state, Method::GET, "/search-customers".into(), query.clone(), &headers, None)?;
    let found = state
        .lock()
        .customers
        .iter()
        .filter(|c| matches_filter(c, &query))
        .cloned()
        .collect();
    Ok(Json(found))
}

async fn create_customer(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<StatusCode, Response> {
    admit(&state, Method::POST, "/customers".into(), HashMap::new(), &headers, Some(body.clone()))?;
    let mut state = state.lock();
    let mut stored = body;
    stored["id"] = json!(state.customers.len() + 1000);
    state.customers.push(stored);
    Ok(StatusCode::CREATED)
}

async fn update_customer(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    let path = format!("/customers/{id}");
    admit(&state, Method::PUT, path, HashMap::new(), &headers, Some(body.clone()))?;
    let mut state = state.lock();
    let Some(existing) = state
        .customers
        .iter_mut()
        .find(|c| c.get("id").map(|v| v.to_string().trim_matches('"') == id) == Some(true))
    else {
        return Err((StatusCode::NOT_FOUND, Json(json!({ "message": "no such customer" })))
            .into_response());
    };
    let mut updated = body;
    updated["id"] = existing["id"].clone();
    *existing = updated.clone();
    Ok(Json(updated))
}

async fn list_invoices(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, Response> {
    admit(&state, Method::GET, "/invoices/all".into(), query.clone(), &headers, None)?;
    let status = query.get("status").cloned().unwrap_or_default();
    let offset: usize = query.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: usize = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);

    let page = state
        .lock()
        .invoices
        .iter()
        .filter(|i| i.get("status").and_then(Value::as_str) == Some(status.as_str()))
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();
    Ok(Json(page))
}

async fn search_invoices(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, Response> {
    admit(&state, Method::GET, "/invoices/search".into(), query.clone(), &headers, None)?;
    let found = state
        .lock()
        .invoices
        .iter()
        .filter(|i| matches_filter(i, &query))
        .cloned()
        .collect();
    Ok(Json(found))
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn customer_json(id: u64, first: &str, last: &str, phone: &str) -> Value {
    json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "email": format!("{}@example.com", first.to_lowercase()),
        "phoneNumber": phone,
        "gender": "F",
        "county": "Kiambu",
        "town": "Thika",
        "location": "1.23,36.8",
        "category": "Residential",
        "monthlyCharge": "1500",
        "status": "ACTIVE",
    })
}

pub fn invoice_json(id: u64, status: &str, first: &str, phone: &str) -> Value {
    json!({
        "id": id,
        "invoiceNumber": format!("INV-{id:04}"),
        "customer": {
            "id": id + 500,
            "firstName": first,
            "lastName": "Doe",
            "phone": phone,
        },
        "invoiceAmount": 2500.5,
        "status": status,
    })
}

pub fn invoices(count: u64, status: &str) -> Vec<Value> {
    (1..=count)
        .map(|id| invoice_json(id, status, "Jane", "0711000000"))
        .collect()
}
