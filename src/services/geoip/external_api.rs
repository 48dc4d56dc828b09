//! ipinfo.io 查询
//!
//! GET `{base_url}/{ip}/country`，响应体为纯文本国家码（如 `US\n`）
//! 不重试、不缓存，失败由上层回退到本地数据库

use std::net::IpAddr;
use std::time::Duration;

use tracing::trace;
use ureq::Agent;

use super::record::is_two_letter;
use crate::config::RemoteConfig;
use crate::errors::{GeoIpError, Result};

/// 默认 HTTP 请求超时时间
pub const HTTP_TIMEOUT_SECS: u64 = 2;

/// 远程国家码查询
pub trait RemoteLookup: Send + Sync {
    /// 返回两位小写国家码
    fn lookup(&self, ip: IpAddr) -> Result<String>;

    /// provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// ipinfo.io 客户端
pub struct IpInfoClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl IpInfoClient {
    /// 创建客户端
    ///
    /// `base_url` 例如 `https://ipinfo.io`，末尾的 `/` 会被去掉
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.token.clone(),
        )
    }

    /// 拼接请求地址，token 做百分号编码
    pub fn country_url(&self, ip: IpAddr) -> String {
        match &self.token {
            Some(token) => format!(
                "{}/{}/country?token={}",
                self.base_url,
                ip,
                urlencoding::encode(token)
            ),
            None => format!("{}/{}/country", self.base_url, ip),
        }
    }

    /// 查询文本形式的 IP，空串或无法解析时直接返回 InvalidInput，不发请求
    pub fn lookup_str(&self, ip: &str) -> Result<String> {
        let ip = parse_ip(ip)?;
        self.lookup(ip)
    }

    fn fetch_country(&self, url: &str) -> Result<String> {
        let mut resp = self.agent.get(url).call()?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Err(GeoIpError::remote_unavailable(format!(
                "ipinfo returned status {}",
                status
            )));
        }

        let body = resp.body_mut().read_to_string()?;
        let code = body.trim();

        // 简化判断：只要不是 2 个字符就认为失败（HTML 错误页、限流提示等）
        if !is_two_letter(code) {
            return Err(GeoIpError::remote_unavailable(format!(
                "invalid country code from ipinfo ({} bytes)",
                code.len()
            )));
        }

        Ok(code.to_lowercase())
    }
}

impl RemoteLookup for IpInfoClient {
    fn lookup(&self, ip: IpAddr) -> Result<String> {
        let url = self.country_url(ip);
        trace!("Querying ipinfo for {}", ip);
        self.fetch_country(&url)
    }

    fn name(&self) -> &'static str {
        "ipinfo.io"
    }
}

/// 解析文本形式的 IP 地址
pub fn parse_ip(input: &str) -> Result<IpAddr> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GeoIpError::invalid_input("empty ip address"));
    }
    input
        .parse()
        .map_err(|_| GeoIpError::invalid_input(format!("invalid ip address: {}", input)))
}

/// 解析二进制形式的 IP 地址（4 或 16 字节）
pub fn ip_from_bytes(bytes: &[u8]) -> Result<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Ok(IpAddr::from(octets));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        return Ok(IpAddr::from(octets));
    }
    Err(GeoIpError::invalid_input(format!(
        "ip address must be 4 or 16 bytes, got {}",
        bytes.len()
    )))
}
