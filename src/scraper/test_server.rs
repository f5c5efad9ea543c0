// In-process HTTP/1.1 upstream for tests
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct TestServer {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v3/PdpReviews", self.addr)
    }
}

/// Answers each connection with whatever `respond` returns for the raw
/// request text. `None` closes the connection without answering.
pub async fn spawn_with<F>(respond: F) -> TestServer
where
    F: Fn(&str) -> Option<(&'static str, String)> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let (task_hits, task_requests) = (hits.clone(), requests.clone());
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            task_hits.fetch_add(1, Ordering::SeqCst);
            let mut buf = vec![0u8; 16 * 1024];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let answer = respond(&request);
            task_requests.lock().unwrap().push(request);

            let Some((status, body)) = answer else {
                continue;
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    TestServer { addr, hits, requests }
}

/// Same `status` and `body` for every request. An empty status closes the
/// connection without answering.
pub async fn spawn_server(status: &'static str, body: &'static str) -> TestServer {
    spawn_with(move |_| (!status.is_empty()).then(|| (status, body.to_string()))).await
}
