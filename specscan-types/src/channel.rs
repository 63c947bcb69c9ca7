use serde::Serialize;

use crate::{ScanError, ScanResult};

/// Тип канала nl80211 из HT20/40 сэмпла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum ChannelType {
    NoHt = 0,
    Ht20 = 1,
    /// Вторичный канал ниже основного
    Ht40Minus = 2,
    /// Вторичный канал выше основного
    Ht40Plus = 3,
}

impl ChannelType {
    pub fn from_u8(v: u8) -> ScanResult<Self> {
        match v {
            0 => Ok(ChannelType::NoHt),
            1 => Ok(ChannelType::Ht20),
            2 => Ok(ChannelType::Ht40Minus),
            3 => Ok(ChannelType::Ht40Plus),
            _ => Err(ScanError::InvalidChannelType(v)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Смещение центра 40 МГц полосы относительно основного канала (МГц).
    ///
    /// Определено только для HT40+/HT40-.
    pub fn center_offset_mhz(&self) -> ScanResult<i32> {
        match self {
            ChannelType::Ht40Plus => Ok(10),
            ChannelType::Ht40Minus => Ok(-10),
            _ => Err(ScanError::InvalidChannelType(self.as_u8())),
        }
    }
}
