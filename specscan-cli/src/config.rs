use std::path::PathBuf;

use crate::AppError;

/// Формат вывода.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Массив объектов `{ tsf, central_freq, rssi, noise, data }`
    Json,
    /// CSV в формате rtl_power: одна строка на запись
    RtlPower,
    /// Текст в формате rtl_power_fftw: блок комментариев и строка на бин
    RtlPowerFftw,
    /// Одна строка на запись: поля + статистика magnitude
    Summary,
}

/// Полная конфигурация запуска.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Файл, снятый с debugfs (`spectral_scan0`)
    pub input_path: PathBuf,
    /// Куда писать (None = stdout)
    pub output_path: Option<PathBuf>,
    pub format: OutputFormat,
    /// Завершаться с кодом 2, если были предупреждения декодера
    pub strict: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для OutputFormat
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::RtlPower => write!(f, "csv"),
            OutputFormat::RtlPowerFftw => write!(f, "rtl_power_fftw"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" | "rtl_power" | "rtl-power" => Ok(OutputFormat::RtlPower),
            "rtl_power_fftw" | "rtl-power-fftw" => Ok(OutputFormat::RtlPowerFftw),
            "summary" | "text" => Ok(OutputFormat::Summary),
            _ => Err(AppError::config(format!(
                "Unknown output format: '{s}'. Use: json, csv, rtl_power_fftw, summary"
            ))),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
