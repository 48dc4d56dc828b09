//! 测试用 mmdb，运行时用 maxminddb-writer 生成
#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use maxminddb_writer::Database;
use maxminddb_writer::paths::IpAddrWithMask;
use serde_json::{Value, json};

/// 内置格式：country / continent 直接存放两位代码
fn embedded_records() -> Vec<(&'static str, Value)> {
    vec![
        (
            "203.0.113.0/24",
            json!({
                "country": "JP", "country_name": "Japan",
                "continent": "AS", "continent_name": "Asia",
            }),
        ),
        (
            "198.51.100.0/24",
            json!({
                "country": "", "country_name": "",
                "continent": "EU", "continent_name": "Europe",
            }),
        ),
    ]
}

/// 外部格式（ipinfo lite）：country_code / continent_code 为代码，country / continent 多为名称
fn external_records() -> Vec<(&'static str, Value)> {
    vec![
        (
            "192.0.2.0/24",
            json!({
                "country_code": "US", "country": "United States",
                "continent_code": "NA", "continent": "North America",
            }),
        ),
        (
            "203.0.113.0/24",
            json!({
                "country_code": "", "country": "JP",
                "continent_code": "", "continent": "",
            }),
        ),
        (
            "198.51.100.0/25",
            json!({
                "country_code": "", "country": "",
                "continent_code": "EU", "continent": "Europe",
            }),
        ),
        (
            "198.51.100.128/25",
            json!({
                "country_code": "", "country": "",
                "continent_code": "", "continent": "",
            }),
        ),
        (
            "100.64.0.0/24",
            json!({ "country": "Oceania Territory", "continent": "OC" }),
        ),
        (
            "100.64.1.0/24",
            json!({
                "country": { "iso_code": "FR", "names": { "en": "France" } },
                "continent_code": "EU",
            }),
        ),
        (
            "100.64.2.0/24",
            json!({
                "country_code": "", "country": "USA",
                "continent_code": "NA", "continent": "North America",
            }),
        ),
    ]
}

fn build_database(records: &[(&str, Value)]) -> Vec<u8> {
    let mut db = Database::default();
    for (network, record) in records {
        let data = db.insert_value(record).expect("record should encode");
        let path: IpAddrWithMask = network.parse().expect("network should parse");
        db.insert_node(path, data);
    }

    let mut raw = Vec::new();
    db.write_to(&mut raw).expect("database should serialize");
    raw
}

/// 内置格式测试库的内容
pub fn embedded_fixture_bytes() -> Vec<u8> {
    static BYTES: OnceLock<Vec<u8>> = OnceLock::new();
    BYTES.get_or_init(|| build_database(&embedded_records())).clone()
}

/// 外部格式测试库的路径，首次调用时写入 target 临时目录
pub fn external_fixture() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
        let path = dir.join("ipinfo_lite.mmdb");

        // 多个测试进程可能同时写入，先写临时文件再原子替换
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).expect("temp file");
        tmp.write_all(&build_database(&external_records()))
            .expect("write fixture");
        tmp.persist(&path).expect("persist fixture");
        path
    })
    .clone()
}
