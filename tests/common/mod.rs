//! 集成测试公共工具
#![allow(dead_code)]

use std::borrow::Cow;
use std::io::{Read, Write};
use std::net::{IpAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use geoip_resolver::errors::{GeoIpError, Result};
use geoip_resolver::services::geoip::{EmbeddedSource, RemoteLookup};

mod fixtures;

pub use fixtures::{embedded_fixture_bytes, external_fixture};

/// 保证不存在的外部路径
pub fn missing_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/does-not-exist.mmdb")
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

// ============== 内置数据源 ==============

/// 记录 load 次数的内置数据源，可选延迟用于放大并发窗口
pub struct CountingSource {
    bytes: Option<Vec<u8>>,
    delay: Duration,
    loads: AtomicUsize,
}

impl CountingSource {
    pub fn new(bytes: Option<Vec<u8>>) -> Self {
        Self::with_delay(bytes, Duration::ZERO)
    }

    pub fn with_delay(bytes: Option<Vec<u8>>, delay: Duration) -> Self {
        Self {
            bytes,
            delay,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl EmbeddedSource for CountingSource {
    fn load(&self) -> Option<Cow<'static, [u8]>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.bytes.clone().map(Cow::Owned)
    }
}

// ============== 远程查询 ==============

/// 返回固定结果的远程查询
pub struct StubRemote {
    result: Result<String>,
    calls: AtomicUsize,
}

impl StubRemote {
    pub fn ok(code: &str) -> Self {
        Self {
            result: Ok(code.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err(GeoIpError::remote_unavailable("stub: status 429")),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteLookup for StubRemote {
    fn lookup(&self, _ip: IpAddr) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

// ============== HTTP 桩服务 ==============

/// 本地 HTTP 桩服务，对每个请求返回固定响应
pub struct HttpStub {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_target: Arc<Mutex<Option<String>>>,
}

impl HttpStub {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// 最近一次请求的 request-target（路径 + 查询串）
    pub fn last_target(&self) -> Option<String> {
        self.last_target.lock().unwrap().clone()
    }
}

pub fn spawn_http_stub(status: u16, body: &'static str) -> HttpStub {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let last_target = Arc::new(Mutex::new(None));

    let thread_hits = Arc::clone(&hits);
    let thread_target = Arc::clone(&last_target);
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let target = read_request_target(&mut stream);
            thread_hits.fetch_add(1, Ordering::SeqCst);
            *thread_target.lock().unwrap() = target;

            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason(status),
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    HttpStub {
        base_url,
        hits,
        last_target,
    }
}

/// 接受连接但从不响应，用于超时测试
pub fn spawn_silent_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    base_url
}

/// 一个当前没有监听者的本地地址
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn read_request_target(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(String::from)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
