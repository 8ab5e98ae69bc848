#![allow(dead_code)]

use std::{
    env,
    path::PathBuf,
    sync::{
        Arc, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use notesum::{Config, VendorConfig};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::{Mutex, MutexGuard},
    task::JoinHandle,
};

static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub const NOTE_TEXT: &str = "Meeting moved to 3pm";
pub const USER_QUERY: &str = "When is the meeting?";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

pub async fn acquire_test_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().await
}

/// Sets or clears an environment variable, restoring the old value on drop.
pub struct EnvVarGuard {
    key: String,
    original: Option<String>,
}

impl EnvVarGuard {
    pub fn set(key: &str, value: &str) -> Self {
        let original = env::var(key).ok();
        // Tests use a global mutex lock, so mutating process environment is synchronized.
        unsafe { env::set_var(key, value) };
        Self {
            key: key.to_string(),
            original,
        }
    }

    pub fn unset(key: &str) -> Self {
        let original = env::var(key).ok();
        // Tests use a global mutex lock, so mutating process environment is synchronized.
        unsafe { env::remove_var(key) };
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(value) = &self.original {
            // Tests use a global mutex lock, so mutating process environment is synchronized.
            unsafe { env::set_var(&self.key, value) };
        } else {
            // Tests use a global mutex lock, so mutating process environment is synchronized.
            unsafe { env::remove_var(&self.key) };
        }
    }
}

/// A path under the temp dir that no other test uses. Nothing is created.
pub fn unique_path(name: &str) -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    env::temp_dir().join(format!("notesum-{}-{name}-{id}", std::process::id()))
}

pub struct MockVendorServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockVendorServer {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

impl Drop for MockVendorServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn openai_body(content: Option<&str>) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn gemini_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Config pointing both vendors at the same mock server.
pub fn config_for(
    base_url: &str,
    openai_api_key: Option<&str>,
    gemini_api_key: Option<&str>,
) -> Config {
    Config {
        openai: VendorConfig::new(
            openai_api_key.map(ToString::to_string),
            "gpt-4o-mini".to_string(),
            base_url.to_string(),
        ),
        gemini: VendorConfig::new(
            gemini_api_key.map(ToString::to_string),
            "gemini-2.5-flash".to_string(),
            base_url.to_string(),
        ),
        timeout_seconds: Some(5),
    }
}

pub async fn start_mock_vendor_server(
    status_code: u16,
    body: &str,
) -> anyhow::Result<MockVendorServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let base_url = format!("http://{}/v1", address);
    let body = body.to_string();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let requests_for_task = requests.clone();

    let handle = tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(value) => value,
                Err(_) => break,
            };
            let body = body.clone();
            let requests = requests_for_task.clone();
            tokio::spawn(async move {
                if let Err(error) =
                    handle_vendor_connection(&mut socket, status_code, &body, &requests).await
                {
                    eprintln!("mock vendor request handling failed: {}", error);
                }
            });
        }
    });

    Ok(MockVendorServer {
        base_url,
        requests,
        handle,
    })
}

async fn handle_vendor_connection(
    socket: &mut TcpStream,
    status_code: u16,
    body: &str,
    requests: &Mutex<Vec<RecordedRequest>>,
) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let bytes_read = socket.read(&mut chunk).await?;
        if bytes_read == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..bytes_read]);
        if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or("/").to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let bytes_read = socket.read(&mut chunk).await?;
        if bytes_read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..bytes_read]);
    }

    let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    requests.lock().await.push(RecordedRequest {
        method,
        path,
        headers,
        body: request_body,
    });

    let status_text = if status_code == 200 { "OK" } else { "ERROR" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_code,
        status_text,
        body.len(),
        body
    );

    socket.write_all(response.as_bytes()).await?;
    Ok(())
}
