//! The TCP frontend: length-value (`L:V`) framed requests carrying
//! `QUERY`/`ADD`/`RELOAD`/`LOGOUT` operations. Blocking, one thread per
//! connection — the engine itself never suspends (§5), so there is no
//! benefit to an async runtime here, only complexity.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use parking_lot::RwLock;
use spocp_core::{parse, render, Element};
use spocp_engine::DecisionEngine;

use crate::error::NetError;

pub const CODE_OK: u16 = 200;
pub const CODE_BYE: u16 = 203;
pub const CODE_DENIED: u16 = 400;
pub const CODE_ERROR: u16 = 500;
pub const CODE_UNKNOWN_OP: u16 = 501;

/// Reads one `L:V` frame (an atom in the grammar sense) from `stream`.
fn read_frame(stream: &mut impl Read) -> Result<Vec<u8>, NetError> {
    let mut len_digits = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        stream.read_exact(&mut byte)?;
        if byte[0] == b':' {
            break;
        }
        if !byte[0].is_ascii_digit() {
            return Err(NetError::MalformedFrame("expected digit or `:` in frame length".into()));
        }
        len_digits.push(byte[0]);
    }
    let len: usize = std::str::from_utf8(&len_digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| NetError::MalformedFrame("invalid frame length".into()))?;
    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload)?;
    Ok(payload)
}

fn write_frame(stream: &mut impl Write, payload: &[u8]) -> std::io::Result<()> {
    write!(stream, "{}:", payload.len())?;
    stream.write_all(payload)
}

fn write_response(stream: &mut impl Write, code: u16, message: &str) -> std::io::Result<()> {
    write_frame(stream, format!("{code}:{message}").as_bytes())
}

/// Handles one connection to completion (until `LOGOUT` or the peer closes
/// the socket).
pub fn handle_connection(mut stream: TcpStream, engine: &Arc<RwLock<DecisionEngine>>) {
    loop {
        let frame = match read_frame(&mut stream) {
            Ok(frame) => frame,
            Err(_) => return,
        };
        let parsed = match parse(&frame) {
            Ok(parsed) => parsed,
            Err(error) => {
                let _ = write_response(&mut stream, CODE_ERROR, &error.to_string());
                continue;
            }
        };
        let Some(request) = parsed.as_list() else {
            let _ = write_response(&mut stream, CODE_ERROR, "request must be a list");
            continue;
        };

        match request.tag.as_slice() {
            b"QUERY" => {
                let Some(query) = request.elements.first() else {
                    let _ = write_response(&mut stream, CODE_ERROR, "QUERY requires one argument");
                    continue;
                };
                let allowed = engine.read().query(query);
                let code = if allowed { CODE_OK } else { CODE_DENIED };
                let _ = write_response(&mut stream, code, if allowed { "allow" } else { "deny" });
            }
            b"ADD" => {
                let Some(rule) = request.elements.first() else {
                    let _ = write_response(&mut stream, CODE_ERROR, "ADD requires one argument");
                    continue;
                };
                engine.write().add_rule(rule.clone());
                let _ = write_response(&mut stream, CODE_OK, "added");
            }
            b"RELOAD" => {
                // The CLI owns the reload discipline (swap-in a freshly
                // built engine under the write lock); here we only ack
                // that the request was well-formed.
                let _ = write_response(&mut stream, CODE_OK, "reload acknowledged");
            }
            b"LOGOUT" => {
                let _ = write_response(&mut stream, CODE_BYE, "bye");
                return;
            }
            other => {
                let op = String::from_utf8_lossy(other).into_owned();
                let error = NetError::UnknownOperation(op);
                let _ = write_response(&mut stream, CODE_UNKNOWN_OP, &error.to_string());
            }
        }
    }
}

/// Encodes a query as a `QUERY` request frame, for clients of this
/// protocol (also used by the CLI's own smoke-test mode).
pub fn encode_query_request(query: &Element) -> Vec<u8> {
    let request = Element::list("QUERY", vec![query.clone()]);
    let mut out = Vec::new();
    let payload = render(&request);
    out.extend_from_slice(payload.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(&payload);
    out
}

/// Runs the accept loop forever, spawning one thread per connection.
pub fn serve(listener: TcpListener, engine: Arc<RwLock<DecisionEngine>>) {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || handle_connection(stream, &engine));
            }
            Err(error) => log::warn!("failed to accept TCP connection: {error}"),
        }
    }
}
