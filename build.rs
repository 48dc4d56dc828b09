use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use maxminddb_writer::Database;
use maxminddb_writer::paths::IpAddrWithMask;
use serde_json::json;

/// 发布构建时放入的真实数据库
const SOURCE_DB: &str = "assets/geoip.db";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", SOURCE_DB);

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let embed_dir = out_dir.join("geoip");
    fs::create_dir_all(&embed_dir).expect("failed to create embed dir");
    let target = embed_dir.join("geoip.db");

    if Path::new(SOURCE_DB).is_file() {
        fs::copy(SOURCE_DB, &target).expect("failed to copy assets/geoip.db");
        return;
    }

    // 没有真实数据库时打包一个只含文档地址段的示例库，保证可以编译和测试
    println!(
        "cargo:warning={} not found, bundling a sample database",
        SOURCE_DB
    );
    fs::write(&target, sample_database()).expect("failed to write sample geoip.db");
}

fn sample_database() -> Vec<u8> {
    let records = [
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
    ];

    let mut db = Database::default();
    for (network, record) in &records {
        let data = db.insert_value(record).expect("failed to encode record");
        let path: IpAddrWithMask = network.parse().expect("invalid network");
        db.insert_node(path, data);
    }

    let mut raw = Vec::new();
    db.write_to(&mut raw).expect("failed to serialize sample database");
    raw
}
