use std::{
    collections::HashMap,
    io::{BufRead, BufReader, Write},
    net::{TcpListener, TcpStream},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

struct Route {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    delay: Duration,
}

/// Throwaway HTTP server answering GETs from a fixed route table.
///
/// Unknown paths answer 404. Every request path is recorded.
pub struct ArtifactServer {
    port: u16,
    hits: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
}

/// Collects routes before the server starts.
#[derive(Default)]
pub struct ArtifactServerBuilder {
    routes: HashMap<String, Route>,
}

impl ArtifactServerBuilder {
    pub fn json(mut self, path: &str, body: serde_json::Value) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status: 200,
                content_type: "application/json",
                body: body.to_string().into_bytes(),
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn bytes(mut self, path: &str, content_type: &'static str, body: Vec<u8>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status: 200,
                content_type,
                body,
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn status(mut self, path: &str, status: u16) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status,
                content_type: "text/plain",
                body: b"error".to_vec(),
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// Like [`Self::json`], but the answer is held back for `delay`.
    pub fn slow_json(mut self, path: &str, body: serde_json::Value, delay: Duration) -> Self {
        self = self.json(path, body);
        if let Some(route) = self.routes.get_mut(path) {
            route.delay = delay;
        }
        self
    }

    pub fn start(self) -> ArtifactServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind artifact server");
        let port = listener.local_addr().expect("local addr").port();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let routes = Arc::new(self.routes);
        {
            let hits = hits.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                for stream in listener.incoming() {
                    if stop.load(Ordering::SeqCst) {
                        break;
                    }
                    let Ok(stream) = stream else {
                        continue;
                    };
                    let routes = routes.clone();
                    let hits = hits.clone();
                    thread::spawn(move || serve(stream, &routes, &hits));
                }
            });
        }
        ArtifactServer { port, hits, stop }
    }
}

impl ArtifactServer {
    pub fn builder() -> ArtifactServerBuilder {
        ArtifactServerBuilder::default()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// How many times `path` was requested.
    pub fn hits(&self, path: &str) -> usize {
        self.hits
            .lock()
            .map(|hits| hits.iter().filter(|hit| *hit == path).count())
            .unwrap_or(0)
    }
}

impl Drop for ArtifactServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = TcpStream::connect(("127.0.0.1", self.port));
    }
}

fn serve(mut stream: TcpStream, routes: &HashMap<String, Route>, hits: &Mutex<Vec<String>>) {
    let Ok(reader_stream) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(reader_stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) => break,
            Ok(_) if header.trim().is_empty() => break,
            Ok(_) => {}
            Err(_) => return,
        }
    }
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    if let Ok(mut hits) = hits.lock() {
        hits.push(path.clone());
    }
    let (status, content_type, body) = match routes.get(&path) {
        Some(route) => {
            thread::sleep(route.delay);
            (route.status, route.content_type, route.body.as_slice())
        }
        None => (404, "text/plain", b"not found".as_slice()),
    };
    let reason = if status == 200 { "OK" } else { "Error" };
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
