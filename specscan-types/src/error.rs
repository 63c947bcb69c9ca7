use thiserror::Error;

use crate::SampleKind;

/// Результат для операций декодирования и расчёта спектра.
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Ошибки декодирования потока spectral scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// В буфере осталось меньше байт, чем занимает TLV-заголовок
    #[error("truncated header: {remaining} bytes left, need {needed}")]
    TruncatedHeader { remaining: usize, needed: usize },

    /// Длина записи из заголовка выходит за конец буфера
    #[error("truncated record: need {needed} bytes, {remaining} left")]
    TruncatedRecord { needed: usize, remaining: usize },

    /// Запись длиннее максимально возможной для любого варианта
    #[error("record too long: {length} bytes (max {max})")]
    RecordTooLong { length: usize, max: usize },

    /// Неизвестный тип сэмпла
    #[error("unknown sample type: {0}")]
    UnknownKind(u8),

    /// Длина полезной нагрузки не совпадает с форматом варианта
    #[error("{kind} payload length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        kind: SampleKind,
        expected: usize,
        found: usize,
    },

    /// Количество бинов вне допустимого набора
    #[error("{kind}: invalid bin count {bins}")]
    InvalidBinCount { kind: SampleKind, bins: usize },

    /// HT20/40 запись с типом канала, отличным от HT40+/HT40-
    #[error("invalid HT40 channel type: {0}")]
    InvalidChannelType(u8),

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    pub fn length_mismatch(
        kind: SampleKind,
        expected: usize,
        found: usize,
    ) -> Self {
        Self::LengthMismatch {
            kind,
            expected,
            found,
        }
    }

    /// Ошибка исчерпания буфера: цикл декодирования дальше идти не может.
    ///
    /// Остальные ошибки касаются одной записи, которую можно пропустить.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ScanError::TruncatedHeader { .. } | ScanError::TruncatedRecord { .. }
        )
    }
}
