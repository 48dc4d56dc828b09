//! GeoIP 服务模块
//!
//! 将 IP 地址解析为两位小写国家码，依次尝试：
//! - ipinfo.io 远程查询
//! - 外部挂载的 ipinfo_lite.mmdb
//! - 内置 geoip.db

mod embedded;
mod external_api;
mod maxmind;
mod provider;
mod record;

pub use embedded::{BundledDatabase, EMBEDDED_DB_NAME, EmbeddedSource};
pub use external_api::{HTTP_TIMEOUT_SECS, IpInfoClient, RemoteLookup, ip_from_bytes, parse_ip};
pub use maxmind::{DatabaseSelector, DatabaseSource, LocalDatabase};
pub use provider::GeoIpResolver;
pub use record::IpRecord;
