use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Ошибка чтения входного файла или записи вывода
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Некорректные параметры запуска
    #[error("config error: {0}")]
    Config(String),
}

impl AppError {
    pub fn config<S: Into<String>>(s: S) -> Self {
        Self::Config(s.into())
    }
}
