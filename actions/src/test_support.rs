//! Test doubles for the action provider tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lit_agentkit_core::{
    Error, ExecuteJsRequest, ExecuteJsResponse, LitClient, Network, Result, SessionSigs,
    SessionSigsRequest, WalletProvider, U256,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Lit client that records every call
#[derive(Default)]
pub struct RecordingLitClient {
    session_calls: AtomicUsize,
    execute_calls: AtomicUsize,
    session_requests: Mutex<Vec<SessionSigsRequest>>,
    execute_requests: Mutex<Vec<ExecuteJsRequest>>,
    fail_execute: Option<String>,
}

impl RecordingLitClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_execute: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn remote_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst) + self.execute_calls.load(Ordering::SeqCst)
    }

    pub fn session_requests(&self) -> Vec<SessionSigsRequest> {
        self.session_requests.lock().unwrap().clone()
    }

    pub fn execute_requests(&self) -> Vec<ExecuteJsRequest> {
        self.execute_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LitClient for RecordingLitClient {
    async fn get_session_sigs(&self, request: &SessionSigsRequest) -> Result<SessionSigs> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        self.session_requests.lock().unwrap().push(request.clone());

        let mut sigs = SessionSigs::new();
        sigs.insert("https://node-1".into(), json!({ "sig": "0xsig" }));
        Ok(sigs)
    }

    async fn execute_js(&self, request: &ExecuteJsRequest) -> Result<ExecuteJsResponse> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        self.execute_requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.fail_execute {
            return Err(Error::lit(message.clone()));
        }
        Ok(serde_json::from_value(json!({
            "success": true,
            "response": "{\"magicNumber\":42}",
            "logs": "The magic number is: 42\n"
        }))?)
    }
}

pub struct StaticWallet;

#[async_trait]
impl WalletProvider for StaticWallet {
    fn name(&self) -> &str {
        "static"
    }

    fn address(&self) -> String {
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string()
    }

    fn network(&self) -> Network {
        Network::from_chain_id(84532)
    }

    async fn get_balance(&self) -> Result<U256> {
        Ok(U256::from(1_500_000_000_000_000_000u128))
    }
}

/// HTTP server answering each connection with the next canned JSON body
pub struct MockHttpServer {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockHttpServer {
    pub async fn start(bodies: Vec<Value>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        tokio::spawn(async move {
            for body in bodies {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);

                let body = body.to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { url, requests }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw requests received so far, head and body
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + length {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
