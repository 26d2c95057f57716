//! Shared test harness for crossbench integration tests.
//!
//! Provides:
//! 1. `Workspace` -- a temp directory holding config, dataset and output dir
//! 2. `StubServer` -- a one-response-per-connection HTTP stub standing in for a vendor API

#![allow(dead_code)]

use assert_cmd::Command;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

// ---------------------------------------------------------------------------
// StubServer
// ---------------------------------------------------------------------------

/// One captured HTTP request: lowercased head plus raw body.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// Serves canned `(status, body)` replies in order, one per connection.
/// Once the script runs out every request gets a 500.
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    pub fn start(replies: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            let mut queue: VecDeque<(u16, String)> = replies.into();
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let Some(request) = read_request(&stream) else {
                    continue;
                };
                seen.lock().unwrap().push(request);
                let (status, payload) = queue
                    .pop_front()
                    .unwrap_or((500, r#"{"error":"script exhausted"}"#.to_string()));
                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
                    payload.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            url: format!("http://{addr}/v1/chat"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &TcpStream) -> Option<CapturedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut head = String::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        if line == "\r\n" {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        head.push_str(&lower);
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(CapturedRequest {
        head,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

/// OpenAI/DeepSeek-shaped reply carrying `content`.
pub fn chat_reply(content: &str) -> (u16, String) {
    let body = serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    });
    (200, body.to_string())
}

/// Anthropic-shaped reply carrying `text`.
pub fn messages_reply(text: &str) -> (u16, String) {
    let body = serde_json::json!({
        "type": "message",
        "content": [{"type": "text", "text": text}]
    });
    (200, body.to_string())
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// Temp working directory with `config.json`, `clues.csv` and an `out/` target.
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::TempDir::new().expect("Failed to create temp workspace"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.json")
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.path().join("clues.csv")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Write a config with no delay, the given batch size and endpoint overrides.
    pub fn write_config(&self, batch_size: usize, endpoints: serde_json::Value) {
        let config = serde_json::json!({
            "rate_limit": 0,
            "batch_size": batch_size,
            "max_rows": null,
            "request_timeout": 10,
            "endpoints": endpoints,
        });
        std::fs::write(self.config_path(), config.to_string()).unwrap();
    }

    /// Write a dataset from `(word, clue)` pairs.
    pub fn write_dataset(&self, rows: &[(&str, &str)]) {
        let mut csv = String::from("Date,Word,Clue,Length\n");
        for (word, clue) in rows {
            csv.push_str(&format!("1/1/2020,{word},\"{clue}\",{}\n", word.chars().count()));
        }
        std::fs::write(self.dataset_path(), csv).unwrap();
    }

    /// Parsed results artifact for `model`.
    pub fn artifact(&self, model: &str) -> serde_json::Value {
        let path = self.output_dir().join(format!("{model}_results.json"));
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("missing artifact {}: {e}", path.display()));
        serde_json::from_str(&content).unwrap()
    }

    /// `crossbench` with a scrubbed environment, running inside the workspace.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("crossbench").expect("crossbench binary");
        cmd.current_dir(self.path());
        for var in [
            "OPENAI_API_KEY",
            "ANTHROPIC_API_KEY",
            "DEEPSEEK_API_KEY",
            "MODEL_NAME",
            "HTTP_PROXY",
            "HTTPS_PROXY",
            "ALL_PROXY",
            "http_proxy",
            "https_proxy",
            "all_proxy",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("NO_PROXY", "127.0.0.1,localhost");
        cmd
    }

    /// `crossbench run` for `model` against this workspace's files.
    pub fn run_model(&self, model: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("run")
            .arg("--model")
            .arg(model)
            .arg("--config")
            .arg(self.config_path())
            .arg("--dataset")
            .arg(self.dataset_path())
            .arg("--output")
            .arg(self.output_dir())
            .arg("--no-progress");
        cmd
    }
}
