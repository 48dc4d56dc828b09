//! GeoIP 查询入口
//!
//! 查询顺序：
//! 1. ipinfo.io（启用时），成功直接返回
//! 2. 本地 mmdb：外部 ipinfo_lite.mmdb 优先，其次内置 geoip.db

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, info, trace};

use super::external_api::{IpInfoClient, RemoteLookup, ip_from_bytes, parse_ip};
use super::maxmind::{DatabaseSelector, DatabaseSource, LocalDatabase};
use crate::config::StaticConfig;
use crate::errors::Result;

/// 统一 GeoIP 解析器
///
/// 数据库句柄在首次本地查询时初始化，之后只读共享；
/// 通过 `Arc<GeoIpResolver>` 在调用方之间传递
pub struct GeoIpResolver {
    remote: Option<Arc<dyn RemoteLookup>>,
    database: DatabaseSelector,
}

impl GeoIpResolver {
    /// 根据 StaticConfig 初始化
    pub fn new(config: &StaticConfig) -> Self {
        let remote: Option<Arc<dyn RemoteLookup>> = if config.remote.enabled {
            let client = IpInfoClient::from_config(&config.remote);
            if config.remote.token.is_none() {
                debug!("GeoIP: No ipinfo token configured, remote lookups are unauthenticated");
            }
            Some(Arc::new(client))
        } else {
            debug!("GeoIP: Remote lookup disabled");
            None
        };

        let database = DatabaseSelector::new(&config.database.external_path);

        info!(
            "GeoIP: Initialized (remote: {}, external database: {})",
            remote.as_ref().map_or("disabled", |r| r.name()),
            config.database.external_path
        );
        Self::from_parts(remote, database)
    }

    pub fn from_parts(remote: Option<Arc<dyn RemoteLookup>>, database: DatabaseSelector) -> Self {
        Self { remote, database }
    }

    /// 查询 IP 对应的两位小写国家码（或洲码）
    ///
    /// 远程查询失败时静默回退到本地数据库；只有本地也失败时才返回错误
    pub fn lookup(&self, ip: IpAddr) -> Result<String> {
        if let Some(code) = self.lookup_remote(ip) {
            return Ok(code);
        }

        let db = self.database.get()?;
        db.lookup_code(ip)
    }

    /// 查询文本形式的 IP
    pub fn lookup_str(&self, ip: &str) -> Result<String> {
        self.lookup(parse_ip(ip)?)
    }

    /// 查询二进制形式的 IP（4 或 16 字节）
    pub fn lookup_bytes(&self, ip: &[u8]) -> Result<String> {
        self.lookup(ip_from_bytes(ip)?)
    }

    /// 在 tokio 阻塞线程池中执行查询
    pub async fn lookup_async(self: &Arc<Self>, ip: IpAddr) -> Result<String> {
        let resolver = Arc::clone(self);
        tokio::task::spawn_blocking(move || resolver.lookup(ip)).await?
    }

    /// 获取本地数据库句柄（首次调用时初始化）
    pub fn database(&self) -> Result<Arc<LocalDatabase>> {
        self.database.get()
    }

    /// 当前使用的本地数据库来源，尚未初始化或初始化失败时为 None
    pub fn database_source(&self) -> Option<DatabaseSource> {
        self.database.active_source()
    }

    /// 远程 provider 名称
    pub fn remote_name(&self) -> Option<&'static str> {
        self.remote.as_ref().map(|r| r.name())
    }

    fn lookup_remote(&self, ip: IpAddr) -> Option<String> {
        let remote = self.remote.as_ref()?;
        match remote.lookup(ip) {
            Ok(code) if !code.is_empty() => {
                trace!("GeoIP: {} resolved {} -> {}", remote.name(), ip, code);
                Some(code)
            }
            Ok(_) => {
                debug!("GeoIP: {} returned empty code for {}", remote.name(), ip);
                None
            }
            Err(e) => {
                debug!(
                    "GeoIP: {} lookup for {} failed: {}, falling back to local database",
                    remote.name(),
                    ip,
                    e
                );
                None
            }
        }
    }
}
