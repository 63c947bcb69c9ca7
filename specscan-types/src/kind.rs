use serde::Serialize;

use crate::{ScanError, ScanResult};

/// Тип сэмпла в поле `type` TLV-заголовка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum SampleKind {
    /// ath9k, 20 МГц канал, 56 бинов
    Ht20 = 1,
    /// ath9k, 40 МГц канал, 2 × 64 бина
    Ht20_40 = 2,
    /// ath10k, переменное число бинов
    Ath10k = 3,
    /// ath11k, переменное число бинов, magnitude без сдвига
    Ath11k = 4,
}

impl SampleKind {
    pub fn from_u8(v: u8) -> ScanResult<Self> {
        match v {
            1 => Ok(SampleKind::Ht20),
            2 => Ok(SampleKind::Ht20_40),
            3 => Ok(SampleKind::Ath10k),
            4 => Ok(SampleKind::Ath11k),
            _ => Err(ScanError::UnknownKind(v)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleKind::Ht20 => "HT20",
            SampleKind::Ht20_40 => "HT20/40",
            SampleKind::Ath10k => "ath10k",
            SampleKind::Ath11k => "ath11k",
        }
    }
}

impl std::fmt::Display for SampleKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
