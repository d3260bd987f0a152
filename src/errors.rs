use std::fmt;

pub type Result<T> = std::result::Result<T, DeeplinkerError>;

#[derive(Debug, Clone)]
pub enum DeeplinkerError {
    Validation(String),
    AliasConflict(String),
    AliasSpaceExhausted(String),
    NotFound(String),
    DateParse(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
}

impl DeeplinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            DeeplinkerError::Validation(_) => "E001",
            DeeplinkerError::AliasConflict(_) => "E002",
            DeeplinkerError::AliasSpaceExhausted(_) => "E003",
            DeeplinkerError::NotFound(_) => "E004",
            DeeplinkerError::DateParse(_) => "E005",
            DeeplinkerError::DatabaseConfig(_) => "E006",
            DeeplinkerError::DatabaseConnection(_) => "E007",
            DeeplinkerError::DatabaseOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            DeeplinkerError::Validation(_) => "Validation Error",
            DeeplinkerError::AliasConflict(_) => "Alias Conflict",
            DeeplinkerError::AliasSpaceExhausted(_) => "Alias Space Exhausted",
            DeeplinkerError::NotFound(_) => "Resource Not Found",
            DeeplinkerError::DateParse(_) => "Date Parse Error",
            DeeplinkerError::DatabaseConfig(_) => "Database Configuration Error",
            DeeplinkerError::DatabaseConnection(_) => "Database Connection Error",
            DeeplinkerError::DatabaseOperation(_) => "Database Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            DeeplinkerError::Validation(msg) => msg,
            DeeplinkerError::AliasConflict(msg) => msg,
            DeeplinkerError::AliasSpaceExhausted(msg) => msg,
            DeeplinkerError::NotFound(msg) => msg,
            DeeplinkerError::DateParse(msg) => msg,
            DeeplinkerError::DatabaseConfig(msg) => msg,
            DeeplinkerError::DatabaseConnection(msg) => msg,
            DeeplinkerError::DatabaseOperation(msg) => msg,
        }
    }

    /// Whether the error is safe to surface verbatim to API callers.
    /// Store-level failures are reported generically and logged instead.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DeeplinkerError::Validation(_)
                | DeeplinkerError::AliasConflict(_)
                | DeeplinkerError::NotFound(_)
                | DeeplinkerError::DateParse(_)
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for DeeplinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DeeplinkerError {}

// 便捷的构造函数
impl DeeplinkerError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        DeeplinkerError::Validation(msg.into())
    }

    pub fn alias_conflict<T: Into<String>>(msg: T) -> Self {
        DeeplinkerError::AliasConflict(msg.into())
    }

    pub fn alias_space_exhausted<T: Into<String>>(msg: T) -> Self {
        DeeplinkerError::AliasSpaceExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        DeeplinkerError::NotFound(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        DeeplinkerError::DateParse(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        DeeplinkerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        DeeplinkerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        DeeplinkerError::DatabaseOperation(msg.into())
    }
}
