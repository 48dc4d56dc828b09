use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoIpError {
    InvalidInput(String),
    RemoteUnavailable(String),
    DatabaseInitFailed(String),
    RecordNotFound(String),
    CodeNotFound(String),
    TaskFailed(String),
}

impl GeoIpError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoIpError::InvalidInput(_) => "G001",
            GeoIpError::RemoteUnavailable(_) => "G002",
            GeoIpError::DatabaseInitFailed(_) => "G003",
            GeoIpError::RecordNotFound(_) => "G004",
            GeoIpError::CodeNotFound(_) => "G005",
            GeoIpError::TaskFailed(_) => "G006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoIpError::InvalidInput(_) => "Invalid Input",
            GeoIpError::RemoteUnavailable(_) => "Remote Lookup Unavailable",
            GeoIpError::DatabaseInitFailed(_) => "Database Initialization Failed",
            GeoIpError::RecordNotFound(_) => "Record Not Found",
            GeoIpError::CodeNotFound(_) => "Country Code Not Found",
            GeoIpError::TaskFailed(_) => "Lookup Task Failed",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoIpError::InvalidInput(msg) => msg,
            GeoIpError::RemoteUnavailable(msg) => msg,
            GeoIpError::DatabaseInitFailed(msg) => msg,
            GeoIpError::RecordNotFound(msg) => msg,
            GeoIpError::CodeNotFound(msg) => msg,
            GeoIpError::TaskFailed(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoIpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoIpError {}

// 便捷的构造函数
impl GeoIpError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        GeoIpError::InvalidInput(msg.into())
    }

    pub fn remote_unavailable<T: Into<String>>(msg: T) -> Self {
        GeoIpError::RemoteUnavailable(msg.into())
    }

    pub fn database_init_failed<T: Into<String>>(msg: T) -> Self {
        GeoIpError::DatabaseInitFailed(msg.into())
    }

    pub fn record_not_found<T: Into<String>>(msg: T) -> Self {
        GeoIpError::RecordNotFound(msg.into())
    }

    pub fn code_not_found<T: Into<String>>(msg: T) -> Self {
        GeoIpError::CodeNotFound(msg.into())
    }

    pub fn task_failed<T: Into<String>>(msg: T) -> Self {
        GeoIpError::TaskFailed(msg.into())
    }
}

impl From<ureq::Error> for GeoIpError {
    fn from(err: ureq::Error) -> Self {
        GeoIpError::RemoteUnavailable(err.to_string())
    }
}

impl From<tokio::task::JoinError> for GeoIpError {
    fn from(err: tokio::task::JoinError) -> Self {
        GeoIpError::TaskFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoIpError>;
