//! Local HTTP server standing in for the list/export backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;

use datagrid_lib::GridClient;
use datagrid_lib::auth::StaticTokenProvider;

pub const TOKEN: &str = "test-token";
pub const ORGANIZATION: &str = "org-42";

/// A request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// What the server answers.
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/json".to_string())],
            body: body.to_string().into_bytes(),
            delay: None,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Handler = Arc<dyn Fn(&Recorded) -> Reply + Send + Sync>;

pub struct MockServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let handler = handler.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let handler = handler.clone();
                        let log = log.clone();
                        async move {
                            let recorded = record(&req);
                            log.lock().unwrap().push(recorded.clone());
                            let reply = handler(&recorded);
                            if let Some(delay) = reply.delay {
                                tokio::time::sleep(delay).await;
                            }
                            let mut builder = Response::builder().status(reply.status);
                            for (name, value) in &reply.headers {
                                builder = builder.header(*name, value.as_str());
                            }
                            Ok::<_, Infallible>(builder.body(Full::new(Bytes::from(reply.body))).unwrap())
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn client(&self) -> GridClient {
        GridClient::builder()
            .url(self.base_url())
            .token_provider(StaticTokenProvider::new(TOKEN))
            .organization_id(ORGANIZATION)
            .build()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn record(req: &Request<Incoming>) -> Recorded {
    let query = req
        .uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();
    let headers = req
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            Some((name.as_str().to_ascii_lowercase(), value.to_str().ok()?.to_string()))
        })
        .collect();
    Recorded {
        path: req.uri().path().to_string(),
        query,
        headers,
    }
}

/// Serves `total` employees paginated the way the backend does.
pub fn employees(total: usize) -> impl Fn(&Recorded) -> Reply + Send + Sync + 'static {
    move |req: &Recorded| {
        let page: usize = req.param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let size: usize = req
            .param("page_size")
            .and_then(|p| p.parse().ok())
            .unwrap_or(20);
        let start = (page - 1) * size;
        if start >= total && page > 1 {
            return Reply::json(
                404,
                json!({
                    "success": false,
                    "error": {"code": 404, "message": "Invalid page.", "details": {"detail": "Invalid page."}}
                }),
            );
        }
        let results: Vec<_> = (start..total.min(start + size))
            .map(|i| json!({"id": i + 1, "name": format!("Employee {}", i + 1), "department": "eng"}))
            .collect();
        Reply::json(200, json!({"count": total, "next": null, "previous": null, "results": results}))
    }
}
