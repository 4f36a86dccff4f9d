//! Mock insights backend for testing
//!
//! Serves the backend routes on an ephemeral local port and records every
//! request, so tests can count POSTs, inspect multipart bodies and check
//! that screens re-fetch. Also provides in-memory picker and notifier ports.
//!
//! Default routes:
//! - POST /upload-csv/ returns { message: "3 records uploaded successfully" }
//! - GET /insights/summary/ returns { total_income, total_expense, net }
//! - GET /insights/category-totals/, /insights/daily/,
//!   /insights/summary-text/, /transactions/ return small fixtures

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::PickedAsset;
use crate::ports::{FilePicker, Notification, NotificationKind, Notifier, PickOutcome, PickRequest};

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lower-cased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
struct MockRoute {
    status: u16,
    body: String,
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<String, MockRoute>,
    requests: Vec<RecordedRequest>,
    delay_ms: u64,
}

fn route_key(method: &str, path: &str) -> String {
    format!("{} {}", method.to_ascii_uppercase(), path)
}

/// Mock backend server
pub struct MockBackendServer {
    port: u16,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<MockState>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockBackendServer {
    /// Start a server with the default routes on a random port
    pub fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let state = Arc::new(Mutex::new(MockState::default()));

        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let state_clone = state.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let state = state_clone.clone();
                        thread::spawn(move || handle_connection(stream, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        let server = Self {
            port,
            running,
            state,
            thread_handle: Some(thread_handle),
        };
        server.install_default_routes();
        Ok(server)
    }

    fn install_default_routes(&self) {
        self.set_route(
            "POST",
            "/upload-csv/",
            200,
            r#"{"message": "3 records uploaded successfully"}"#,
        );
        self.set_route(
            "GET",
            "/insights/summary/",
            200,
            r#"{"total_income": 1000.005, "total_expense": 400.002, "net": 600.0}"#,
        );
        self.set_route(
            "GET",
            "/insights/category-totals/",
            200,
            r#"[{"category": "Salary", "total": 3500.0}, {"category": "Groceries", "total": -245.5}]"#,
        );
        self.set_route(
            "GET",
            "/insights/daily/",
            200,
            r#"[{"date": "2024-03-01", "total_spent": -45.23}, {"date": "2024-03-02", "total_spent": 3500}]"#,
        );
        self.set_route(
            "GET",
            "/insights/summary-text/",
            200,
            r#"{"summary": "You earned $3500.00, spent $245.50, and your net balance is $3254.50. Top spending category: Groceries."}"#,
        );
        self.set_route(
            "GET",
            "/transactions/",
            200,
            r#"[{"date": "2024-03-01T00:00:00", "amount": -45.23, "category": "Groceries", "description": "Tesco", "user_id": "demo_user"}]"#,
        );
    }

    /// Replace the response for a route
    pub fn set_route(&self, method: &str, path: &str, status: u16, body: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.routes.insert(
                route_key(method, path),
                MockRoute {
                    status,
                    body: body.to_string(),
                },
            );
        }
    }

    /// Delay every response by `delay_ms`
    pub fn set_delay(&self, delay_ms: u64) {
        if let Ok(mut state) = self.state.lock() {
            state.delay_ms = delay_ms;
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// Number of recorded requests for a method and path
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .count()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBackendServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A base URL nothing listens on
pub fn unreachable_base_url() -> String {
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .unwrap_or(9);
    format!("http://127.0.0.1:{}", port)
}

fn handle_connection(mut stream: TcpStream, state: &Arc<Mutex<MockState>>) {
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));

    let Some(request) = read_request(&mut stream) else {
        send_response(&mut stream, 400, r#"{"detail": "Bad Request"}"#);
        return;
    };

    let (route, delay_ms) = match state.lock() {
        Ok(mut s) => {
            let route = s.routes.get(&route_key(&request.method, &request.path)).cloned();
            s.requests.push(request);
            (route, s.delay_ms)
        }
        Err(_) => (None, 0),
    };

    if delay_ms > 0 {
        thread::sleep(Duration::from_millis(delay_ms));
    }

    match route {
        Some(route) => send_response(&mut stream, route.status, &route.body),
        None => send_response(&mut stream, 404, r#"{"detail": "Not Found"}"#),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn read_more(stream: &mut TcpStream, buf: &mut Vec<u8>) -> Option<()> {
    let mut chunk = [0u8; 8192];
    let n = stream.read(&mut chunk).ok()?;
    if n == 0 {
        return None;
    }
    buf.extend_from_slice(&chunk[..n]);
    Some(())
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        read_more(stream, &mut buf)?;
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?;
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), Some(q.to_string())),
        None => (target.to_string(), None),
    };

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    let mut body = buf[header_end..].to_vec();
    if let Some(length) = header("content-length").and_then(|v| v.parse::<usize>().ok()) {
        while body.len() < length {
            read_more(stream, &mut body)?;
        }
        body.truncate(length);
    } else if header("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        while find(&body, b"0\r\n\r\n").is_none() {
            read_more(stream, &mut body)?;
        }
        body = dechunk(&body)?;
    }

    Some(RecordedRequest {
        method,
        path,
        query,
        headers,
        body,
    })
}

fn dechunk(raw: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let mut rest = raw;
    loop {
        let line_end = find(rest, b"\r\n")?;
        let size_text = String::from_utf8_lossy(&rest[..line_end]);
        let size = usize::from_str_radix(size_text.split(';').next()?.trim(), 16).ok()?;
        rest = &rest[line_end + 2..];
        if size == 0 {
            return Some(out);
        }
        if rest.len() < size + 2 {
            return None;
        }
        out.extend_from_slice(&rest[..size]);
        rest = &rest[size + 2..];
    }
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

// =============================================================================
// In-memory ports
// =============================================================================

/// Picker returning a fixed answer and counting how often it was opened
pub struct StubPicker {
    answer: std::result::Result<PickOutcome, String>,
    calls: AtomicUsize,
}

impl StubPicker {
    pub fn cancelled() -> Self {
        Self::with_outcome(PickOutcome::Cancelled)
    }

    /// A single file, optionally without a display name
    pub fn file(uri: impl Into<PathBuf>, name: Option<&str>) -> Self {
        Self::with_outcome(PickOutcome::Picked(vec![PickedAsset {
            uri: uri.into(),
            name: name.map(str::to_string),
            mime_type: Some(crate::domain::CSV_MIME_TYPE.to_string()),
        }]))
    }

    pub fn with_outcome(outcome: PickOutcome) -> Self {
        Self {
            answer: Ok(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FilePicker for StubPicker {
    async fn pick(&self, _request: &PickRequest) -> Result<PickOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(Error::Picker)
    }
}

/// Notifier that keeps every notification
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.all().iter().filter(|n| n.kind == kind).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::ApiClient;
    use crate::domain::{SelectedFile, TransactionFilter, CSV_MIME_TYPE};
    use crate::ports::InsightsBackend;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn client_for(server: &MockBackendServer) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), &server.base_url())
    }

    #[tokio::test]
    async fn test_upload_sends_single_file_part() {
        let server = MockBackendServer::start().unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("upload.csv");
        std::fs::write(&path, "date,amount\n2024-03-01,-45.23\n").unwrap();

        let file = SelectedFile {
            uri: path,
            name: "march.csv".to_string(),
            mime_type: CSV_MIME_TYPE,
        };
        let response = client_for(&server)
            .upload_csv("/upload-csv/", &file)
            .await
            .unwrap();
        assert_eq!(
            response.message.as_deref(),
            Some("3 records uploaded successfully")
        );

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert!(request
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary="));

        let body = request.body_text();
        assert_eq!(body.matches("Content-Disposition").count(), 1);
        assert!(body.contains(r#"name="file"; filename="march.csv""#));
        assert!(body.contains("Content-Type: text/csv"));
        assert!(body.contains("2024-03-01,-45.23"));
    }

    #[tokio::test]
    async fn test_upload_error_in_ok_body() {
        let server = MockBackendServer::start().unwrap();
        server.set_route("POST", "/upload-csv/", 200, r#"{"error": "No columns to parse"}"#);
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();

        let file = SelectedFile {
            uri: path,
            name: "empty.csv".to_string(),
            mime_type: CSV_MIME_TYPE,
        };
        let err = client_for(&server)
            .upload_csv("/upload-csv/", &file)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Server { status: 200, .. }));
        assert!(err.to_string().contains("No columns to parse"));
    }

    #[tokio::test]
    async fn test_summary_and_not_found() {
        let server = MockBackendServer::start().unwrap();
        let client = client_for(&server);

        let summary = client.summary().await.unwrap();
        assert_eq!(summary.render().income, "$1000.01");

        server.set_route("GET", "/insights/summary/", 404, r#"{"detail": "Not Found"}"#);
        let err = client.summary().await.unwrap_err();
        match err {
            Error::Server { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparsable_summary_is_network_error() {
        let server = MockBackendServer::start().unwrap();
        server.set_route("GET", "/insights/summary/", 200, "<html>oops</html>");
        let err = client_for(&server).summary().await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = ApiClient::with_client(reqwest::Client::new(), &unreachable_base_url());
        let err = client.summary().await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_transactions_query_params() {
        let server = MockBackendServer::start().unwrap();
        let filter = TransactionFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
            category: Some("Groceries".to_string()),
        };

        let rows = client_for(&server).transactions(&filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description.as_deref(), Some("Tesco"));

        let request = &server.requests()[0];
        assert_eq!(request.path, "/transactions/");
        assert_eq!(
            request.query.as_deref(),
            Some("start_date=2024-03-01&end_date=2024-03-31&category=Groceries")
        );
    }

    #[tokio::test]
    async fn test_insight_routes() {
        let server = MockBackendServer::start().unwrap();
        let client = client_for(&server);

        let totals = client.category_totals().await.unwrap();
        assert_eq!(totals[0].category, "Salary");

        let daily = client.daily_spending().await.unwrap();
        assert_eq!(daily.len(), 2);

        let text = client.summary_text(None, None).await.unwrap();
        assert!(text.summary.contains("Groceries"));
        assert!(server.requests().iter().all(|r| r.query.is_none()));
    }
}
