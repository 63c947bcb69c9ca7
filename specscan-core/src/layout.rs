//! Каталог бинарных раскладок сэмплов spectral scan.
//!
//! Запись потока: `type` (u8) + `length` (u16, big-endian) + `length` байт
//! полезной нагрузки. Все многобайтовые поля нагрузки хранятся в big-endian.
//!
//! ```text
//! HT20 (type 1), 17 + 56 байт:
//! [0]      max_exp          u8
//! [1..3]   freq             u16
//! [3]      rssi             i8
//! [4]      noise            i8
//! [5..7]   max_magnitude    u16
//! [7]      max_index        u8
//! [8]      bitmap_weight    u8
//! [9..17]  tsf              u64
//! [17..73] data             [u8; 56]
//!
//! HT20/40 (type 2), 24 + 128 байт:
//! [0]      channel_type     u8
//! [1..3]   freq             u16
//! [3] [4]  lower/upper_rssi i8
//! [5..13]  tsf              u64
//! [13][14] lower/upper_noise i8
//! [15..19] lower/upper_max_magnitude u16
//! [19][20] lower/upper_max_index u8
//! [21][22] lower/upper_bitmap_weight u8
//! [23]     max_exp          u8
//! [24..]   data             [u8; 128]
//!
//! ath10k (type 3), 26 + {64,128,256} байт:
//! chan_width_mhz u8, freq1 u16, freq2 u16, noise i16, max_magnitude u16,
//! total_gain_db u16, base_pwr_db u16, tsf u64, max_index i8, rssi u8,
//! relpwr_db u8, avgpwr_db u8, max_exp u8, data
//!
//! ath11k (type 4), 20 + {32,64,128,256} байт:
//! chan_width_mhz u8, max_index i8, max_exp u8, freq1 u16, freq2 u16,
//! max_magnitude u16, rssi u16, tsf u32, noise u32, is_primary u8, data
//! ```

use specscan_types::SampleKind;

/// Размер TLV-заголовка: type (1) + length (2)
pub const TLV_HEADER_SIZE: usize = 3;

pub const HT20_FIXED_SIZE: usize = 17;
pub const HT20_NUM_BINS: usize = 56;

pub const HT20_40_FIXED_SIZE: usize = 24;
pub const HT20_40_NUM_BINS: usize = 128;

pub const ATH10K_FIXED_SIZE: usize = 26;
pub const ATH10K_BIN_COUNTS: &[usize] = &[64, 128, 256];
pub const ATH10K_MAX_NUM_BINS: usize = 256;

pub const ATH11K_FIXED_SIZE: usize = 20;
pub const ATH11K_BIN_COUNTS: &[usize] = &[32, 64, 128, 256];

/// Максимальный размер записи вместе с заголовком (худший случай ath10k)
pub const MAX_RECORD_SIZE: usize = TLV_HEADER_SIZE + ATH10K_FIXED_SIZE + ATH10K_MAX_NUM_BINS;

/// Допустимое число бинов варианта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinDomain {
    /// Ровно столько бинов, длина записи фиксирована
    Fixed(usize),
    /// Число бинов выводится из длины и должно входить в набор
    OneOf(&'static [usize]),
}

/// Раскладка одного варианта записи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    pub kind: SampleKind,
    /// Размер фиксированных полей (без TLV-заголовка и без бинов)
    pub fixed_size: usize,
    pub bins: BinDomain,
}

pub const HT20_LAYOUT: SampleLayout = SampleLayout {
    kind: SampleKind::Ht20,
    fixed_size: HT20_FIXED_SIZE,
    bins: BinDomain::Fixed(HT20_NUM_BINS),
};

pub const HT20_40_LAYOUT: SampleLayout = SampleLayout {
    kind: SampleKind::Ht20_40,
    fixed_size: HT20_40_FIXED_SIZE,
    bins: BinDomain::Fixed(HT20_40_NUM_BINS),
};

pub const ATH10K_LAYOUT: SampleLayout = SampleLayout {
    kind: SampleKind::Ath10k,
    fixed_size: ATH10K_FIXED_SIZE,
    bins: BinDomain::OneOf(ATH10K_BIN_COUNTS),
};

pub const ATH11K_LAYOUT: SampleLayout = SampleLayout {
    kind: SampleKind::Ath11k,
    fixed_size: ATH11K_FIXED_SIZE,
    bins: BinDomain::OneOf(ATH11K_BIN_COUNTS),
};

impl SampleLayout {
    pub fn for_kind(kind: SampleKind) -> &'static SampleLayout {
        match kind {
            SampleKind::Ht20 => &HT20_LAYOUT,
            SampleKind::Ht20_40 => &HT20_40_LAYOUT,
            SampleKind::Ath10k => &ATH10K_LAYOUT,
            SampleKind::Ath11k => &ATH11K_LAYOUT,
        }
    }

    /// Наибольшая допустимая длина нагрузки для варианта.
    pub fn max_payload_size(&self) -> usize {
        match self.bins {
            BinDomain::Fixed(n) => self.fixed_size + n,
            BinDomain::OneOf(counts) => {
                self.fixed_size + counts.iter().copied().max().unwrap_or(0)
            }
        }
    }
}

impl BinDomain {
    pub fn contains(
        &self,
        bins: usize,
    ) -> bool {
        match self {
            BinDomain::Fixed(n) => *n == bins,
            BinDomain::OneOf(counts) => counts.contains(&bins),
        }
    }
}
