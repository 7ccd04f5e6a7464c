// 🧪 Test Support - One-shot local HTTP server for client tests
//
// Serves a fixed list of responses, one per connection, and hands back the
// raw text of every request it received.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// A canned answer: status code, reason phrase, JSON body
pub struct CannedResponse {
    pub status: u16,
    pub reason: &'static str,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        CannedResponse {
            status: 200,
            reason: "OK",
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, reason: &'static str, body: &str) -> Self {
        CannedResponse {
            status,
            reason,
            body: body.to_string(),
        }
    }
}

/// Start a server on an ephemeral port. Returns its base URL and a channel
/// yielding each request (head and body) in arrival order.
pub fn serve(responses: Vec<CannedResponse>) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        for response in responses {
            let (mut stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let request = read_request(&mut BufReader::new(stream.try_clone().unwrap()));
            let _ = sender.send(request);

            let reply = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.reason,
                response.body.len(),
                response.body
            );
            let _ = stream.write_all(reply.as_bytes());
            let _ = stream.flush();
        }
    });

    (base_url, receiver)
}

fn read_request<R: BufRead>(reader: &mut R) -> String {
    let mut request = String::new();
    let mut content_length = 0;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
        request.push_str(&line);
        if line == "\r\n" {
            break;
        }
    }

    let mut body = vec![0; content_length];
    if reader.read_exact(&mut body).is_ok() {
        request.push_str(&String::from_utf8_lossy(&body));
    }
    request
}
