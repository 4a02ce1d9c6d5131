//! A minimal blocking HTTP/1.1 frontend: the AuthZen 1.0 evaluation
//! endpoint plus a handful of monitoring endpoints. No async runtime, for
//! the same reason as the TCP frontend (§5): the engine never suspends.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::json;
use spocp_engine::DecisionEngine;

use crate::authzen::{self, EvaluationResponse};

struct HttpRequest {
    method: String,
    path: String,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<HttpRequest>> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(None);
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some(value) = header.strip_prefix("Content-Length:").or_else(|| header.strip_prefix("content-length:")) {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;
    Ok(Some(HttpRequest { method, path, body }))
}

fn write_json_response(stream: &mut TcpStream, status: u16, reason: &str, body: &serde_json::Value) -> std::io::Result<()> {
    let payload = serde_json::to_vec(body).unwrap_or_default();
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        payload.len()
    )?;
    stream.write_all(&payload)
}

fn handle_evaluation(engine: &Arc<RwLock<DecisionEngine>>, body: &[u8]) -> (u16, &'static str, serde_json::Value) {
    let request: authzen::EvaluationRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(error) => {
            return (400, "Bad Request", json!({ "error": format!("malformed request body: {error}") }));
        }
    };
    let element = match authzen::request_to_element(&request) {
        Ok(e) => e,
        Err(error) => return (400, "Bad Request", json!({ "error": error.to_string() })),
    };
    let decision = engine.read().query(&element);
    (200, "OK", serde_json::to_value(EvaluationResponse { decision }).unwrap())
}

fn handle_stats(engine: &Arc<RwLock<DecisionEngine>>) -> serde_json::Value {
    let stats = engine.read().index_stats();
    json!({
        "total": stats.total,
        "distinct_tag_count": stats.distinct_tag_count,
        "atom_rule_count": stats.atom_rule_count,
        "average_bucket_size": stats.average_bucket_size,
        "most_populous_tag": stats.most_populous_tag.map(|t| String::from_utf8_lossy(&t).into_owned()),
    })
}

fn handle_connection(mut stream: TcpStream, engine: &Arc<RwLock<DecisionEngine>>) {
    let request = match read_request(&mut stream) {
        Ok(Some(request)) => request,
        Ok(None) => return,
        Err(error) => {
            log::warn!("failed to read HTTP request: {error}");
            return;
        }
    };

    let (status, reason, body) = match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/access/v1/evaluation") => handle_evaluation(engine, &request.body),
        ("GET", "/health") => (200, "OK", json!({ "status": "ok" })),
        ("GET", "/ready") => (200, "OK", json!({ "status": "ready" })),
        ("GET", "/stats") => (200, "OK", handle_stats(engine)),
        ("GET", "/metrics") => (200, "OK", handle_stats(engine)),
        _ => (404, "Not Found", json!({ "error": "no such endpoint" })),
    };

    if let Err(error) = write_json_response(&mut stream, status, reason, &body) {
        log::warn!("failed to write HTTP response: {error}");
    }
}

/// Runs the accept loop forever, spawning one thread per connection.
pub fn serve(listener: TcpListener, engine: Arc<RwLock<DecisionEngine>>) {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || handle_connection(stream, &engine));
            }
            Err(error) => log::warn!("failed to accept HTTP connection: {error}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn evaluation_translates_and_queries() {
        let mut engine = DecisionEngine::new();
        engine
            .add_rule_text(b"(4:http(2:id10:index.html)(6:action3:GET)(7:subject(4:type4:user)))")
            .unwrap();
        let engine = Arc::new(RwLock::new(engine));

        let body = br#"{
            "subject": {"type": "user", "id": "olav"},
            "resource": {"type": "http", "id": "index.html"},
            "action": {"name": "GET"}
        }"#;
        let (status, _, body) = handle_evaluation(&engine, body);
        assert_eq!(status, 200);
        assert_eq!(body["decision"], true);
    }

    #[test]
    fn evaluation_rejects_malformed_body() {
        let engine = Arc::new(RwLock::new(DecisionEngine::new()));
        let (status, _, _) = handle_evaluation(&engine, b"not json");
        assert_eq!(status, 400);
    }
}
