//! 本地 mmdb 数据库
//!
//! 数据源选择（只执行一次）：
//! 1. 外部 mmdb 文件存在且能打开 → 使用外部文件
//! 2. 否则 → 使用内置 geoip.db
//! 3. 内置也解析失败 → 记录错误，之后的查询都返回该错误

use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use maxminddb::{MaxMindDbError, Reader};
use tracing::{debug, info, trace, warn};

use super::embedded::{BundledDatabase, EmbeddedSource};
use super::record::IpRecord;
use crate::errors::{GeoIpError, Result};

/// 当前使用的数据库来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSource {
    External(PathBuf),
    Embedded,
}

impl fmt::Display for DatabaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External(path) => write!(f, "external ({})", path.display()),
            Self::Embedded => write!(f, "embedded"),
        }
    }
}

/// 已打开的只读 mmdb
pub struct LocalDatabase {
    reader: Reader<Vec<u8>>,
    source: DatabaseSource,
}

impl LocalDatabase {
    /// 从文件打开
    pub fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, MaxMindDbError> {
        let reader = Reader::open_readfile(path.as_ref())?;
        Ok(Self {
            reader,
            source: DatabaseSource::External(path.as_ref().to_path_buf()),
        })
    }

    /// 从内存中的数据库内容打开
    pub fn from_bytes(bytes: Vec<u8>) -> std::result::Result<Self, MaxMindDbError> {
        let reader = Reader::from_source(bytes)?;
        Ok(Self {
            reader,
            source: DatabaseSource::Embedded,
        })
    }

    pub fn source(&self) -> &DatabaseSource {
        &self.source
    }

    /// mmdb 元数据中的 database_type
    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }

    /// 查询原始记录
    pub fn lookup_record(&self, ip: IpAddr) -> Result<IpRecord> {
        let result = self
            .reader
            .lookup(ip)
            .map_err(|e| GeoIpError::record_not_found(format!("{}: {}", ip, e)))?;

        let record = result
            .decode::<IpRecord>()
            .map_err(|e| GeoIpError::code_not_found(format!("{}: undecodable record: {}", ip, e)))?;

        record.ok_or_else(|| {
            GeoIpError::record_not_found(format!("{} is not in the {} database", ip, self.source))
        })
    }

    /// 查询两位小写代码
    pub fn lookup_code(&self, ip: IpAddr) -> Result<String> {
        let record = self.lookup_record(ip)?;
        trace!("Local lookup for {}: {:?}", ip, record);

        record
            .resolve_code()
            .ok_or_else(|| GeoIpError::code_not_found(format!("IP not found: {}", ip)))
    }
}

/// 数据库选择器
///
/// 首次调用 [`DatabaseSelector::get`] 时选择数据源并缓存结果（包括失败），
/// 并发首次调用只会初始化一次，所有调用者看到相同结果
pub struct DatabaseSelector {
    external_path: PathBuf,
    embedded: Arc<dyn EmbeddedSource>,
    handle: OnceLock<Result<Arc<LocalDatabase>>>,
}

impl DatabaseSelector {
    /// 使用随二进制打包的内置数据库作为兜底
    pub fn new<P: Into<PathBuf>>(external_path: P) -> Self {
        Self::with_embedded(external_path, Arc::new(BundledDatabase))
    }

    pub fn with_embedded<P: Into<PathBuf>>(
        external_path: P,
        embedded: Arc<dyn EmbeddedSource>,
    ) -> Self {
        Self {
            external_path: external_path.into(),
            embedded,
            handle: OnceLock::new(),
        }
    }

    pub fn external_path(&self) -> &Path {
        &self.external_path
    }

    /// 获取数据库句柄，首次调用时初始化
    pub fn get(&self) -> Result<Arc<LocalDatabase>> {
        self.handle.get_or_init(|| self.init()).clone()
    }

    /// 已初始化且成功时返回数据源
    pub fn active_source(&self) -> Option<DatabaseSource> {
        match self.handle.get() {
            Some(Ok(db)) => Some(db.source().clone()),
            _ => None,
        }
    }

    fn init(&self) -> Result<Arc<LocalDatabase>> {
        let path = &self.external_path;

        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => match LocalDatabase::open(path) {
                Ok(db) => {
                    info!(
                        "GeoIP: Using external database at {} ({})",
                        path.display(),
                        db.database_type()
                    );
                    return Ok(Arc::new(db));
                }
                Err(e) => {
                    warn!(
                        "GeoIP: Failed to open external database at {}: {}, falling back to embedded database",
                        path.display(),
                        e
                    );
                }
            },
            Ok(_) => debug!("GeoIP: {} is not a regular file, skipping", path.display()),
            Err(_) => debug!("GeoIP: No external database at {}", path.display()),
        }

        let Some(bytes) = self.embedded.load() else {
            warn!("GeoIP: Embedded database is missing");
            return Err(GeoIpError::database_init_failed(
                "external database unavailable and embedded database is missing",
            ));
        };

        match LocalDatabase::from_bytes(bytes.into_owned()) {
            Ok(db) => {
                info!("GeoIP: Using embedded database ({})", db.database_type());
                Ok(Arc::new(db))
            }
            Err(e) => {
                warn!("GeoIP: Failed to parse embedded database: {}", e);
                Err(GeoIpError::database_init_failed(format!(
                    "embedded database: {}",
                    e
                )))
            }
        }
    }
}
