//! mmdb 记录结构与国家码提取
//!
//! 同时兼容两种 mmdb 格式：
//! - 内置 geoip.db：country/continent 是代码，country_name/continent_name 是名字
//! - 外部 ipinfo_lite.mmdb：country/continent 是名字，country_code/continent_code 是代码

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// 本地数据库返回的记录，缺失或非字符串字段视为空串
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IpRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub country_code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(deserialize_with = "lenient_string")]
    pub country_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub continent_code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub continent: String,
    #[serde(deserialize_with = "lenient_string")]
    pub continent_name: String,
}

impl IpRecord {
    /// 按优先级提取两位代码（小写）
    ///
    /// 1. country_code 非空
    /// 2. country 恰好 2 位
    /// 3. continent_code 非空（洲码兜底）
    /// 4. continent 恰好 2 位
    pub fn resolve_code(&self) -> Option<String> {
        if !self.country_code.is_empty() {
            return Some(self.country_code.to_lowercase());
        }
        if is_two_letter(&self.country) {
            return Some(self.country.to_lowercase());
        }
        if !self.continent_code.is_empty() {
            return Some(self.continent_code.to_lowercase());
        }
        if is_two_letter(&self.continent) {
            return Some(self.continent.to_lowercase());
        }
        None
    }
}

/// 按字节长度判断，与远程响应的校验规则一致
pub(crate) fn is_two_letter(value: &str) -> bool {
    value.len() == 2
}

/// GeoLite2 之类的库里 country 是嵌套 map，这里直接忽略
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Field::deserialize(deserializer)? {
        Field::Text(s) => s,
        Field::Other(_) => String::new(),
    })
}
