use serde::Serialize;

use crate::SampleKind;

/// Сэмпл ath9k в режиме HT20 (фиксированно 56 бинов)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ht20Sample {
    /// Показатель сдвига magnitude
    pub max_exp: u8,
    /// Частота канала, МГц
    pub freq: u16,
    pub rssi: i8,
    /// Уровень шума, дБм
    pub noise: i8,
    pub max_magnitude: u16,
    pub max_index: u8,
    pub bitmap_weight: u8,
    /// TSF таймер, мкс
    pub tsf: u64,
    pub bins: Vec<u8>,
}

/// Сэмпл ath9k в режиме HT20/40 (128 бинов: нижняя и верхняя половины)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ht40Sample {
    /// Сырое значение nl80211 channel type, см. [`crate::ChannelType`]
    pub channel_type: u8,
    pub freq: u16,
    pub lower_rssi: i8,
    pub upper_rssi: i8,
    pub tsf: u64,
    pub lower_noise: i8,
    pub upper_noise: i8,
    pub lower_max_magnitude: u16,
    pub upper_max_magnitude: u16,
    pub lower_max_index: u8,
    pub upper_max_index: u8,
    pub lower_bitmap_weight: u8,
    pub upper_bitmap_weight: u8,
    pub max_exp: u8,
    pub bins: Vec<u8>,
}

/// Сэмпл ath10k (64, 128 или 256 бинов)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ath10kSample {
    pub chan_width_mhz: u8,
    pub freq1: u16,
    pub freq2: u16,
    pub noise: i16,
    pub max_magnitude: u16,
    pub total_gain_db: u16,
    pub base_pwr_db: u16,
    pub tsf: u64,
    pub max_index: i8,
    pub rssi: u8,
    pub relpwr_db: u8,
    pub avgpwr_db: u8,
    pub max_exp: u8,
    pub bins: Vec<u8>,
}

/// Сэмпл ath11k (32, 64, 128 или 256 бинов)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ath11kSample {
    pub chan_width_mhz: u8,
    pub max_index: i8,
    pub max_exp: u8,
    pub freq1: u16,
    pub freq2: u16,
    pub max_magnitude: u16,
    pub rssi: u16,
    pub tsf: u32,
    pub noise: u32,
    /// Сэмпл относится к основному сегменту фрагментированного скана
    pub is_primary: bool,
    pub bins: Vec<u8>,
}

/// Одна декодированная запись потока
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SampleRecord {
    Ht20(Ht20Sample),
    Ht40(Ht40Sample),
    Ath10k(Ath10kSample),
    Ath11k(Ath11kSample),
}

impl Ath11kSample {
    /// Прошивка кладёт знаковые значения в беззнаковые поля.
    pub fn rssi_signed(&self) -> i16 {
        self.rssi as i16
    }

    pub fn noise_signed(&self) -> i32 {
        self.noise as i32
    }

    /// freq2 отличен от нуля и от freq1: скан разбит на два сегмента.
    pub fn is_fragmented(&self) -> bool {
        self.freq2 != 0 && self.freq2 != self.freq1
    }
}

impl SampleRecord {
    pub fn kind(&self) -> SampleKind {
        match self {
            SampleRecord::Ht20(_) => SampleKind::Ht20,
            SampleRecord::Ht40(_) => SampleKind::Ht20_40,
            SampleRecord::Ath10k(_) => SampleKind::Ath10k,
            SampleRecord::Ath11k(_) => SampleKind::Ath11k,
        }
    }

    /// Основная частота записи, МГц (`freq` или `freq1`).
    pub fn freq(&self) -> u16 {
        match self {
            SampleRecord::Ht20(s) => s.freq,
            SampleRecord::Ht40(s) => s.freq,
            SampleRecord::Ath10k(s) => s.freq1,
            SampleRecord::Ath11k(s) => s.freq1,
        }
    }

    /// RSSI для отображения; для HT20/40 — нижняя половина.
    pub fn rssi(&self) -> i32 {
        match self {
            SampleRecord::Ht20(s) => s.rssi.into(),
            SampleRecord::Ht40(s) => s.lower_rssi.into(),
            SampleRecord::Ath10k(s) => s.rssi.into(),
            SampleRecord::Ath11k(s) => s.rssi_signed().into(),
        }
    }

    /// Уровень шума для отображения; для HT20/40 — нижняя половина.
    pub fn noise(&self) -> i32 {
        match self {
            SampleRecord::Ht20(s) => s.noise.into(),
            SampleRecord::Ht40(s) => s.lower_noise.into(),
            SampleRecord::Ath10k(s) => s.noise.into(),
            SampleRecord::Ath11k(s) => s.noise_signed(),
        }
    }

    pub fn tsf(&self) -> u64 {
        match self {
            SampleRecord::Ht20(s) => s.tsf,
            SampleRecord::Ht40(s) => s.tsf,
            SampleRecord::Ath10k(s) => s.tsf,
            SampleRecord::Ath11k(s) => s.tsf.into(),
        }
    }

    pub fn max_exp(&self) -> u8 {
        match self {
            SampleRecord::Ht20(s) => s.max_exp,
            SampleRecord::Ht40(s) => s.max_exp,
            SampleRecord::Ath10k(s) => s.max_exp,
            SampleRecord::Ath11k(s) => s.max_exp,
        }
    }

    pub fn bins(&self) -> &[u8] {
        match self {
            SampleRecord::Ht20(s) => &s.bins,
            SampleRecord::Ht40(s) => &s.bins,
            SampleRecord::Ath10k(s) => &s.bins,
            SampleRecord::Ath11k(s) => &s.bins,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bins().len()
    }
}
