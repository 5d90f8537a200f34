use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct StatusResponse {
    is_fallback: bool,
    last_error: Option<String>,
    last_fetch: Option<String>,
    refresh_secs: u64,
    theme: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn fetch_status(client: &Client, base_url: &str) -> Option<StatusResponse> {
    let resp = client.get(format!("{base_url}/api/status")).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json().await.ok()
}

/// Waits until the server answers and its first poll has completed.
async fn wait_until_polled(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(status) = fetch_status(&client, base_url).await {
            if status.last_fetch.is_some() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not complete its first poll");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    // nothing listens here, so every poll fails and the fallback is served
    let upstream = format!("http://127.0.0.1:{}/report", pick_free_port());
    let child = Command::new(env!("CARGO_BIN_EXE_gamification_dashboard"))
        .env("PORT", port.to_string())
        .env("DASHBOARD_API_URL", upstream)
        .env("DASHBOARD_REFRESH_SECS", "1")
        .env("DASHBOARD_TIMEOUT_SECS", "2")
        .env("DASHBOARD_THEME", "slate")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_polled(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_status_reports_fallback_mode() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let status = fetch_status(&client, &server.base_url).await.expect("status");
    assert!(status.is_fallback);
    assert!(status.last_error.is_some());
    assert_eq!(status.refresh_secs, 1);
    assert_eq!(status.theme, "slate");
}

#[tokio::test]
async fn http_dashboard_serves_fallback_view() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let view: serde_json::Value = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["kpi"]["total_students"], 1842.0);
    assert_eq!(view["kpi"]["schools_count"], 5);
    assert_eq!(view["schools"][0]["name"], "Hillcrest Middle School");
    assert_eq!(view["mission_engagement"].as_array().unwrap().len(), 6);
    assert_eq!(view["insights"].as_array().unwrap().len(), 5);
    assert_eq!(view["trends"]["logins"]["current"], 235.0);
    assert_eq!(view["trends"]["logins"]["previous"], 192.0);
}

#[tokio::test]
async fn http_index_shows_fallback_banner() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client.get(&server.base_url).send().await.unwrap();
    assert!(response.status().is_success());
    let html = response.text().await.unwrap();
    assert!(html.contains("Showing sample data"));
    assert!(html.contains("Gamification in Schools"));
}
