//! 内置 geoip.db
//!
//! 编译时通过 rust-embed 打包 `assets/geoip.db`，外部 mmdb 不可用时使用
//! 构建脚本会把它放到 `$OUT_DIR/geoip/`，缺失时改为生成示例库

use std::borrow::Cow;

use rust_embed::Embed;

/// 内置数据库在 assets 目录中的文件名
pub const EMBEDDED_DB_NAME: &str = "geoip.db";

#[derive(Embed)]
#[folder = "$OUT_DIR/geoip/"]
struct GeoAssets;

/// 内置数据库的字节来源
pub trait EmbeddedSource: Send + Sync {
    /// 返回数据库内容，缺失时返回 None
    fn load(&self) -> Option<Cow<'static, [u8]>>;
}

/// 随二进制打包的默认数据库
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledDatabase;

impl EmbeddedSource for BundledDatabase {
    fn load(&self) -> Option<Cow<'static, [u8]>> {
        GeoAssets::get(EMBEDDED_DB_NAME).map(|file| file.data)
    }
}

impl EmbeddedSource for &'static [u8] {
    fn load(&self) -> Option<Cow<'static, [u8]>> {
        Some(Cow::Borrowed(*self))
    }
}

impl EmbeddedSource for Vec<u8> {
    fn load(&self) -> Option<Cow<'static, [u8]>> {
        Some(Cow::Owned(self.clone()))
    }
}
