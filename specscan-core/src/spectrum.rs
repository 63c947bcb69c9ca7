//! Оценка мощности по бинам spectral scan.
//!
//! Для бина с magnitude `m` и показателем `e`:
//!
//! ```text
//! scaled = max(m << e, 1)
//! power  = noise + rssi + 20·log10(scaled) − 10·log10(S)
//! ```
//!
//! где `S` — сумма `max(m << e, 1)²` по всем бинам записи (для HT20/40 — по
//! своей половине). Формула эмпирическая, физический смысл не подтверждён;
//! порядок операций сохраняется как есть.

use serde::Serialize;
use specscan_types::{
    Ath10kSample, Ath11kSample, ChannelType, Ht20Sample, Ht40Sample, SampleRecord, ScanResult,
};

use crate::layout::{HT20_40_NUM_BINS, HT20_NUM_BINS};

/// Ширина виртуального 64-точечного преобразования HT20, МГц
const HT20_SPAN_MHZ: f64 = 22.0;
const HT20_FFT_POINTS: f64 = 64.0;
/// Номинальная ширина канала HT20, МГц
const HT20_CHANNEL_MHZ: f64 = 20.0;

const HT40_SPAN_MHZ: f64 = 40.0;
const HT40_FFT_POINTS: f64 = 128.0;

/// Одна точка спектра
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumPoint {
    pub freq_mhz: f64,
    pub power_dbfs: f64,
}

/// Статистика квадратов сдвинутых magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MagnitudeStats {
    pub max: f64,
    pub min: f64,
    pub square_sum: f64,
}

impl From<SpectrumPoint> for (f64, f64) {
    fn from(p: SpectrumPoint) -> Self {
        (p.freq_mhz, p.power_dbfs)
    }
}

/// `m << e` без переполнения.
pub fn shifted_magnitude(
    m: u8,
    exp: u8,
) -> f64 {
    f64::from(m) * 2f64.powi(i32::from(exp))
}

/// Сумма квадратов сдвинутых magnitude, каждая не меньше 1.
pub fn square_sum(
    bins: &[u8],
    exp: u8,
) -> f64 {
    bins.iter()
        .map(|&m| {
            let v = shifted_magnitude(m, exp).max(1.0);
            v * v
        })
        .sum()
}

/// Мощность одного бина.
pub fn bin_power(
    noise: f64,
    rssi: f64,
    scaled: f64,
    square_sum: f64,
) -> f64 {
    noise + rssi + 20.0 * scaled.max(1.0).log10() - square_sum.log10() * 10.0
}

fn bin_freq(
    start: f64,
    span: f64,
    points: f64,
    i: usize,
) -> f64 {
    start + span * (i as f64 + 0.5) / points
}

/// Центральная частота, относительно которой раскладываются бины (МГц).
pub fn center_freq_mhz(record: &SampleRecord) -> ScanResult<f64> {
    match record {
        SampleRecord::Ht20(s) => Ok(f64::from(s.freq)),
        SampleRecord::Ht40(s) => ht40_center(s),
        SampleRecord::Ath10k(s) => Ok(f64::from(s.freq1)),
        SampleRecord::Ath11k(s) => Ok(f64::from(ath11k_anchor(s).0)),
    }
}

/// Полоса, которую покрывают бины записи (МГц).
///
/// Для HT20 это номинальная ширина канала, для ath11k учитывается
/// фрагментация.
pub fn bandwidth_mhz(record: &SampleRecord) -> f64 {
    match record {
        SampleRecord::Ht20(_) => HT20_CHANNEL_MHZ,
        SampleRecord::Ht40(_) => HT40_SPAN_MHZ,
        SampleRecord::Ath10k(s) => f64::from(s.chan_width_mhz),
        SampleRecord::Ath11k(s) => f64::from(ath11k_anchor(s).1),
    }
}

/// Спектр мощности записи, по возрастанию номера бина.
///
/// HT20/40 запись с типом канала, отличным от HT40+/HT40-, даёт
/// [`specscan_types::ScanError::InvalidChannelType`].
pub fn power_spectrum(record: &SampleRecord) -> ScanResult<Vec<SpectrumPoint>> {
    match record {
        SampleRecord::Ht20(s) => Ok(ht20_spectrum(s)),
        SampleRecord::Ht40(s) => ht40_spectrum(s),
        SampleRecord::Ath10k(s) => Ok(ath10k_spectrum(s)),
        SampleRecord::Ath11k(s) => Ok(ath11k_spectrum(s)),
    }
}

fn ht20_spectrum(s: &Ht20Sample) -> Vec<SpectrumPoint> {
    let sum = square_sum(&s.bins, s.max_exp);
    // 56 бинов — середина 64-точечного преобразования шириной 22 МГц
    let start = f64::from(s.freq) - (HT20_SPAN_MHZ * HT20_NUM_BINS as f64 / HT20_FFT_POINTS) / 2.0;

    s.bins
        .iter()
        .enumerate()
        .map(|(i, &m)| SpectrumPoint {
            freq_mhz: bin_freq(start, HT20_SPAN_MHZ, HT20_FFT_POINTS, i),
            power_dbfs: bin_power(
                f64::from(s.noise),
                f64::from(s.rssi),
                shifted_magnitude(m, s.max_exp),
                sum,
            ),
        })
        .collect()
}

fn ht40_center(s: &Ht40Sample) -> ScanResult<f64> {
    let offset = ChannelType::from_u8(s.channel_type)?.center_offset_mhz()?;
    Ok(f64::from(i32::from(s.freq) + offset))
}

fn ht40_spectrum(s: &Ht40Sample) -> ScanResult<Vec<SpectrumPoint>> {
    let center = ht40_center(s)?;
    let half = HT20_40_NUM_BINS / 2;
    let (lower, upper) = s.bins.split_at(half.min(s.bins.len()));
    let lower_sum = square_sum(lower, s.max_exp);
    let upper_sum = square_sum(upper, s.max_exp);
    let start = center - (HT40_SPAN_MHZ * HT20_40_NUM_BINS as f64 / HT40_FFT_POINTS) / 2.0;

    let points = s
        .bins
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let (noise, rssi, sum) = if i < half {
                (s.lower_noise, s.lower_rssi, lower_sum)
            } else {
                (s.upper_noise, s.upper_rssi, upper_sum)
            };

            SpectrumPoint {
                freq_mhz: bin_freq(start, HT40_SPAN_MHZ, HT40_FFT_POINTS, i),
                power_dbfs: bin_power(
                    f64::from(noise),
                    f64::from(rssi),
                    shifted_magnitude(m, s.max_exp),
                    sum,
                ),
            }
        })
        .collect();

    Ok(points)
}

fn ath10k_spectrum(s: &Ath10kSample) -> Vec<SpectrumPoint> {
    let bins = s.bins.len() as f64;
    let width = f64::from(s.chan_width_mhz);
    let sum = square_sum(&s.bins, s.max_exp);
    // Половина ширины берётся целочисленно
    let start = f64::from(s.freq1) - f64::from(s.chan_width_mhz / 2);

    s.bins
        .iter()
        .enumerate()
        .map(|(i, &m)| SpectrumPoint {
            freq_mhz: bin_freq(start, width, bins, i),
            power_dbfs: bin_power(
                f64::from(s.noise),
                f64::from(s.rssi),
                shifted_magnitude(m, s.max_exp),
                sum,
            ),
        })
        .collect()
}

/// Опорная частота и ширина для ath11k.
///
/// При фрагментированном скане ширина делится пополам, а сегмент выбирается
/// по `is_primary`.
fn ath11k_anchor(s: &Ath11kSample) -> (u16, u8) {
    if s.is_fragmented() {
        let freq = if s.is_primary { s.freq1 } else { s.freq2 };
        (freq, s.chan_width_mhz / 2)
    } else {
        (s.freq1, s.chan_width_mhz)
    }
}

fn ath11k_spectrum(s: &Ath11kSample) -> Vec<SpectrumPoint> {
    let bins = s.bins.len() as f64;
    let (anchor, width) = ath11k_anchor(s);
    let start = f64::from(anchor) - f64::from(width / 2);
    // Сумма по несдвинутым magnitude, сами бины сдвигаются на max_exp
    let sum = square_sum(&s.bins, 0);
    let noise = f64::from(s.noise_signed());
    let rssi = f64::from(s.rssi_signed());

    s.bins
        .iter()
        .enumerate()
        .map(|(i, &m)| SpectrumPoint {
            freq_mhz: bin_freq(start, f64::from(width), bins, i),
            power_dbfs: bin_power(noise, rssi, shifted_magnitude(m, s.max_exp), sum),
        })
        .collect()
}

fn stats_of(
    bins: &[u8],
    exp: u8,
) -> MagnitudeStats {
    let mut stats = MagnitudeStats {
        max: 0.0,
        min: f64::MAX,
        square_sum: 0.0,
    };

    for &m in bins {
        let v = shifted_magnitude(m, exp);
        let sq = v * v;
        stats.square_sum += sq;
        stats.max = stats.max.max(sq);
        stats.min = stats.min.min(sq);
    }

    if bins.is_empty() {
        stats.min = 0.0;
    }

    stats
}

/// Статистика magnitude записи: одна запись, для HT20/40 — две (нижняя и
/// верхняя половины).
pub fn magnitude_stats(record: &SampleRecord) -> Vec<MagnitudeStats> {
    match record {
        SampleRecord::Ht20(s) => vec![stats_of(&s.bins, s.max_exp)],
        SampleRecord::Ht40(s) => {
            let (lower, upper) = s.bins.split_at((HT20_40_NUM_BINS / 2).min(s.bins.len()));
            vec![stats_of(lower, s.max_exp), stats_of(upper, s.max_exp)]
        }
        SampleRecord::Ath10k(s) => vec![stats_of(&s.bins, s.max_exp)],
        SampleRecord::Ath11k(s) => vec![stats_of(&s.bins, 0)],
    }
}

#[cfg(test)]
mod tests {
    use specscan_types::ScanError;

    use super::*;

    fn ht20(bins: Vec<u8>) -> Ht20Sample {
        Ht20Sample {
            max_exp: 0,
            freq: 2412,
            rssi: 20,
            noise: -95,
            max_magnitude: 0,
            max_index: 0,
            bitmap_weight: 0,
            tsf: 0,
            bins,
        }
    }

    fn ht40(channel_type: u8) -> Ht40Sample {
        Ht40Sample {
            channel_type,
            freq: 5180,
            lower_rssi: 10,
            upper_rssi: 30,
            tsf: 0,
            lower_noise: -90,
            upper_noise: -80,
            lower_max_magnitude: 0,
            upper_max_magnitude: 0,
            lower_max_index: 0,
            upper_max_index: 0,
            lower_bitmap_weight: 0,
            upper_bitmap_weight: 0,
            max_exp: 0,
            bins: vec![1; 128],
        }
    }

    fn ath11k(
        freq1: u16,
        freq2: u16,
        is_primary: bool,
    ) -> Ath11kSample {
        Ath11kSample {
            chan_width_mhz: 160,
            max_index: 0,
            max_exp: 0,
            freq1,
            freq2,
            max_magnitude: 0,
            rssi: 0,
            tsf: 0,
            noise: 0,
            is_primary,
            bins: vec![1; 64],
        }
    }

    fn assert_strictly_increasing(points: &[SpectrumPoint]) {
        for w in points.windows(2) {
            assert!(w[1].freq_mhz > w[0].freq_mhz, "{} > {}", w[1].freq_mhz, w[0].freq_mhz);
        }
    }

    #[test]
    fn test_bin_power_formula() {
        // noise + rssi + 20·log10(100) − 10·log10(10000) = -95 + 20 + 40 − 40
        let p = bin_power(-95.0, 20.0, 100.0, 10_000.0);
        assert!((p - -75.0).abs() < 1e-12);
    }

    #[test]
    fn test_shifted_magnitude() {
        assert_eq!(shifted_magnitude(3, 0), 3.0);
        assert_eq!(shifted_magnitude(3, 4), 48.0);
        assert_eq!(shifted_magnitude(0, 7), 0.0);
    }

    #[test]
    fn test_ht20_zero_bins_are_finite() {
        let rec = SampleRecord::Ht20(ht20(vec![0; 56]));
        let points = power_spectrum(&rec).unwrap();

        assert_eq!(points.len(), 56);
        for p in &points {
            assert!(p.power_dbfs.is_finite());
        }
        // S = 56, каждый бин прижат к 1
        let expected = -95.0 + 20.0 + 0.0 - 56f64.log10() * 10.0;
        assert!((points[0].power_dbfs - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ht20_geometry() {
        let rec = SampleRecord::Ht20(ht20(vec![5; 56]));
        let points = power_spectrum(&rec).unwrap();

        assert_strictly_increasing(&points);
        let first = 2412.0 - 9.625 + 22.0 * 0.5 / 64.0;
        assert!((points[0].freq_mhz - first).abs() < 1e-9);
        // Шаг бина 22/64 МГц, полоса симметрична вокруг несущей
        let step = points[1].freq_mhz - points[0].freq_mhz;
        assert!((step - 22.0 / 64.0).abs() < 1e-9);
        let mid = (points[27].freq_mhz + points[28].freq_mhz) / 2.0;
        assert!((mid - 2412.0).abs() < 1e-9);
    }

    #[test]
    fn test_ht40_plus_geometry() {
        let rec = SampleRecord::Ht40(ht40(ChannelType::Ht40Plus.as_u8()));

        assert_eq!(center_freq_mhz(&rec).unwrap(), 5190.0);

        let points = power_spectrum(&rec).unwrap();
        assert_eq!(points.len(), 128);
        assert_eq!(points[0].freq_mhz, 5170.15625);
        assert_strictly_increasing(&points);
    }

    #[test]
    fn test_ht40_minus_center() {
        let rec = SampleRecord::Ht40(ht40(ChannelType::Ht40Minus.as_u8()));
        assert_eq!(center_freq_mhz(&rec).unwrap(), 5170.0);
    }

    #[test]
    fn test_ht40_halves_use_own_noise_and_rssi() {
        let rec = SampleRecord::Ht40(ht40(ChannelType::Ht40Plus.as_u8()));
        let points = power_spectrum(&rec).unwrap();

        // Все бины равны 1, S = 64 в каждой половине
        let lower = -90.0 + 10.0 + 0.0 - 64f64.log10() * 10.0;
        let upper = -80.0 + 30.0 + 0.0 - 64f64.log10() * 10.0;
        assert!((points[0].power_dbfs - lower).abs() < 1e-12);
        assert!((points[63].power_dbfs - lower).abs() < 1e-12);
        assert!((points[64].power_dbfs - upper).abs() < 1e-12);
        assert!((points[127].power_dbfs - upper).abs() < 1e-12);
    }

    #[test]
    fn test_ht40_invalid_channel_type() {
        for ct in [0u8, 1, 4, 255] {
            let rec = SampleRecord::Ht40(ht40(ct));
            assert!(matches!(
                power_spectrum(&rec),
                Err(ScanError::InvalidChannelType(v)) if v == ct
            ));
        }
    }

    #[test]
    fn test_ath10k_geometry_and_shift() {
        let s = Ath10kSample {
            chan_width_mhz: 40,
            freq1: 5190,
            freq2: 0,
            noise: -100,
            max_magnitude: 0,
            total_gain_db: 0,
            base_pwr_db: 0,
            tsf: 0,
            max_index: 0,
            rssi: 30,
            relpwr_db: 0,
            avgpwr_db: 0,
            max_exp: 2,
            bins: (0..128).map(|i| (i % 16) as u8).collect(),
        };
        let sum = square_sum(&s.bins, 2);
        let rec = SampleRecord::Ath10k(s);
        let points = power_spectrum(&rec).unwrap();

        assert_eq!(points.len(), 128);
        assert_strictly_increasing(&points);
        assert_eq!(points[0].freq_mhz, 5170.0 + 40.0 * 0.5 / 128.0);

        // bin 5: 5 << 2 = 20
        let expected = -100.0 + 30.0 + 20.0 * 20f64.log10() - sum.log10() * 10.0;
        assert!((points[5].power_dbfs - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ath11k_anchor_selection() {
        // Не фрагментирован: freq1, полная ширина
        let s = ath11k(5250, 0, false);
        let pts = power_spectrum(&SampleRecord::Ath11k(s)).unwrap();
        assert_eq!(pts[0].freq_mhz, 5250.0 - 80.0 + 160.0 * 0.5 / 64.0);

        // Фрагментирован, основной сегмент: freq1, половина ширины
        let s = ath11k(5210, 5290, true);
        let pts = power_spectrum(&SampleRecord::Ath11k(s)).unwrap();
        assert_eq!(pts[0].freq_mhz, 5210.0 - 40.0 + 80.0 * 0.5 / 64.0);
        assert_strictly_increasing(&pts);

        // Фрагментирован, вторичный сегмент: freq2
        let s = ath11k(5210, 5290, false);
        let rec = SampleRecord::Ath11k(s);
        assert_eq!(center_freq_mhz(&rec).unwrap(), 5290.0);
        let pts = power_spectrum(&rec).unwrap();
        assert_eq!(pts[0].freq_mhz, 5290.0 - 40.0 + 80.0 * 0.5 / 64.0);
    }

    #[test]
    fn test_bandwidth() {
        assert_eq!(bandwidth_mhz(&SampleRecord::Ht20(ht20(vec![0; 56]))), 20.0);
        assert_eq!(bandwidth_mhz(&SampleRecord::Ht40(ht40(3))), 40.0);
        assert_eq!(bandwidth_mhz(&SampleRecord::Ath11k(ath11k(5250, 0, true))), 160.0);
        assert_eq!(bandwidth_mhz(&SampleRecord::Ath11k(ath11k(5210, 5290, true))), 80.0);
    }

    #[test]
    fn test_ath11k_sum_ignores_max_exp() {
        let mut s = ath11k(5250, 0, true);
        s.max_exp = 3;
        s.noise = (-90i32) as u32;
        s.rssi = 10;
        s.bins = vec![2; 32];

        let points = power_spectrum(&SampleRecord::Ath11k(s)).unwrap();

        // S = 32 · 2², бин = 2 << 3 = 16
        let expected = -90.0 + 10.0 + 20.0 * 16f64.log10() - 128f64.log10() * 10.0;
        for p in &points {
            assert!((p.power_dbfs - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_magnitude_stats() {
        let mut bins = vec![0u8; 56];
        bins[3] = 4;
        bins[10] = 2;
        let mut s = ht20(bins);
        s.max_exp = 1;

        let stats = magnitude_stats(&SampleRecord::Ht20(s));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].max, 64.0);
        assert_eq!(stats[0].min, 0.0);
        assert_eq!(stats[0].square_sum, 64.0 + 16.0);

        let halves = magnitude_stats(&SampleRecord::Ht40(ht40(3)));
        assert_eq!(halves.len(), 2);
        assert_eq!(halves[0].square_sum, 64.0);
        assert_eq!(halves[1].square_sum, 64.0);
    }

    #[test]
    fn test_point_into_tuple() {
        let (f, p): (f64, f64) = SpectrumPoint {
            freq_mhz: 1.5,
            power_dbfs: -3.0,
        }
        .into();
        assert_eq!((f, p), (1.5, -3.0));
    }
}
