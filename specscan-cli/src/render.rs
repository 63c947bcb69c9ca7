//! Вывод декодированных записей.
//!
//! Рендереры получают готовый список записей и сами вызывают расчёт
//! спектра. Запись, для которой спектр посчитать нельзя (HT20/40 с неверным
//! типом канала), пропускается с предупреждением.

use std::io::Write;

use chrono::{Local, NaiveDateTime};
use log::warn;
use serde::Serialize;
use specscan_core::{bandwidth_mhz, magnitude_stats, power_spectrum, square_sum, SpectrumPoint};
use specscan_types::SampleRecord;

use crate::{AppResult, OutputFormat};

/// Объект JSON-вывода, одна запись потока.
#[derive(Debug, Serialize)]
pub struct JsonRecord {
    pub tsf: u64,
    pub central_freq: u16,
    pub rssi: i32,
    pub noise: i32,
    pub data: Vec<(f64, f64)>,
}

impl JsonRecord {
    pub fn new(
        record: &SampleRecord,
        points: Vec<SpectrumPoint>,
    ) -> Self {
        Self {
            tsf: record.tsf(),
            central_freq: record.freq(),
            rssi: record.rssi(),
            noise: record.noise(),
            data: points.into_iter().map(Into::into).collect(),
        }
    }
}

/// Выводит записи в выбранном формате, возвращает число выведенных записей.
///
/// Строки rtl_power помечаются текущим локальным временем.
pub fn render<W: Write>(
    records: &[SampleRecord],
    format: OutputFormat,
    out: &mut W,
) -> AppResult<usize> {
    render_at(records, format, Local::now().naive_local(), out)
}

/// То же, что [`render`], с явной отметкой времени.
pub fn render_at<W: Write>(
    records: &[SampleRecord],
    format: OutputFormat,
    at: NaiveDateTime,
    out: &mut W,
) -> AppResult<usize> {
    match format {
        OutputFormat::Json => render_json(records, out),
        OutputFormat::RtlPower => render_rtl_power(records, at, out),
        OutputFormat::RtlPowerFftw => render_rtl_power_fftw(records, at, out),
        OutputFormat::Summary => render_summary(records, out),
    }
}

fn spectrum_or_skip(
    index: usize,
    record: &SampleRecord,
) -> Option<Vec<SpectrumPoint>> {
    match power_spectrum(record) {
        Ok(points) => Some(points),
        Err(e) => {
            warn!("record #{index} ({}) skipped: {e}", record.kind());
            None
        }
    }
}

/// `[ {...},\n{...} ]`, по одному объекту на строку.
pub fn render_json<W: Write>(
    records: &[SampleRecord],
    out: &mut W,
) -> AppResult<usize> {
    let mut written = 0;

    write!(out, "[")?;

    for (i, record) in records.iter().enumerate() {
        let Some(points) = spectrum_or_skip(i, record) else {
            continue;
        };

        if written > 0 {
            write!(out, ",")?;
        }
        writeln!(out)?;
        serde_json::to_writer(&mut *out, &JsonRecord::new(record, points))?;
        written += 1;
    }

    writeln!(out, "\n]")?;
    out.flush()?;

    Ok(written)
}

/// Границы строки rtl_power, Гц.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub low_hz: i64,
    pub high_hz: i64,
    pub step_hz: i64,
    pub samples: usize,
}

impl RowSpan {
    /// HT20 отсчитывается от `freq - 10 МГц`, остальные варианты от
    /// частоты первого бина.
    pub fn new(
        record: &SampleRecord,
        points: &[SpectrumPoint],
    ) -> Self {
        let width_mhz = bandwidth_mhz(record);
        let samples = points.len();

        let low_mhz = match record {
            SampleRecord::Ht20(s) => f64::from(s.freq) - width_mhz / 2.0,
            _ => points.first().map_or(0.0, |p| p.freq_mhz),
        };

        Self {
            low_hz: (low_mhz * 1e6) as i64,
            high_hz: ((low_mhz + width_mhz) * 1e6) as i64,
            step_hz: (width_mhz * 1e6 / samples.max(1) as f64) as i64,
            samples,
        }
    }
}

/// CSV rtl_power: `дата, время, low, high, step, samples, p0, p1, ...`,
/// одна строка на запись.
pub fn render_rtl_power<W: Write>(
    records: &[SampleRecord],
    at: NaiveDateTime,
    out: &mut W,
) -> AppResult<usize> {
    let stamp = at.format("%Y-%m-%d, %H:%M:%S").to_string();
    let mut written = 0;

    for (i, record) in records.iter().enumerate() {
        let Some(points) = spectrum_or_skip(i, record) else {
            continue;
        };
        let span = RowSpan::new(record, &points);

        write!(
            out,
            "{stamp}, {}, {}, {}, {}",
            span.low_hz, span.high_hz, span.step_hz, span.samples
        )?;
        for p in &points {
            write!(out, ", {:.6}", p.power_dbfs)?;
        }
        writeln!(out)?;
        written += 1;
    }

    out.flush()?;

    Ok(written)
}

/// Текст rtl_power_fftw: отметки `# Acquisition`, блок `# key = value`,
/// затем строки `<частота ГГц>e+09  <мощность>` и пустая строка между записями.
pub fn render_rtl_power_fftw<W: Write>(
    records: &[SampleRecord],
    at: NaiveDateTime,
    out: &mut W,
) -> AppResult<usize> {
    let stamp = at.format("%Y-%m-%d %H:%M:%S").to_string();
    let mut written = 0;

    for (i, record) in records.iter().enumerate() {
        let Some(points) = spectrum_or_skip(i, record) else {
            continue;
        };

        writeln!(out, "# Acquisition start: {stamp}")?;
        writeln!(out, "# Acquisition end: {stamp}")?;
        writeln!(out, "#")?;
        for (key, value) in fftw_fields(record) {
            writeln!(out, "# {key} = {value}")?;
        }
        for p in &points {
            writeln!(out, "{:.6}e+09  {:.6}", p.freq_mhz / 1000.0, p.power_dbfs)?;
        }
        writeln!(out)?;
        written += 1;
    }

    out.flush()?;

    Ok(written)
}

fn fftw_fields(record: &SampleRecord) -> Vec<(&'static str, String)> {
    match record {
        SampleRecord::Ht20(s) => vec![
            ("datasquaresum", square_sum(&s.bins, s.max_exp).to_string()),
            ("noise", s.noise.to_string()),
            ("max_exp", s.max_exp.to_string()),
            ("rssi", s.rssi.to_string()),
        ],
        SampleRecord::Ht40(s) => {
            let (lower, upper) = s.bins.split_at(s.bins.len() / 2);
            vec![
                ("datasquaresum_lower", square_sum(lower, s.max_exp).to_string()),
                ("datasquaresum_upper", square_sum(upper, s.max_exp).to_string()),
                ("noise_lower", s.lower_noise.to_string()),
                ("noise_upper", s.upper_noise.to_string()),
                ("max_exp", s.max_exp.to_string()),
                ("rssi_lower", s.lower_rssi.to_string()),
                ("rssi_upper", s.upper_rssi.to_string()),
            ]
        }
        SampleRecord::Ath10k(s) => vec![
            ("freq1", s.freq1.to_string()),
            ("freq2", s.freq2.to_string()),
            ("total_gain_db", s.total_gain_db.to_string()),
            ("relpwr_db", s.relpwr_db.to_string()),
            ("avgpwr_db", s.avgpwr_db.to_string()),
            ("base_pwr_db", s.base_pwr_db.to_string()),
            ("max_exp", s.max_exp.to_string()),
            ("max_magnitude", s.max_magnitude.to_string()),
            ("datasquaresum", square_sum(&s.bins, s.max_exp).to_string()),
            ("rssi", s.rssi.to_string()),
            ("noise", s.noise.to_string()),
        ],
        SampleRecord::Ath11k(s) => vec![
            ("freq1", s.freq1.to_string()),
            ("freq2", s.freq2.to_string()),
            ("max_exp", s.max_exp.to_string()),
            ("max_magnitude", s.max_magnitude.to_string()),
            ("rssi", s.rssi_signed().to_string()),
            ("noise", s.noise_signed().to_string()),
        ],
    }
}

/// Одна строка на запись.
pub fn summary_line(record: &SampleRecord) -> String {
    let head = match record {
        SampleRecord::Ht20(s) => format!(
            "HT20 freq {:04} rssi {:03}, noise {:03}, max_magnitude {:04} max_index {:03} bitmap_weight {:03} tsf {}",
            s.freq, s.rssi, s.noise, s.max_magnitude, s.max_index, s.bitmap_weight, s.tsf
        ),
        SampleRecord::Ht40(s) => format!(
            "HT20/40 freq {:04} channel_type {} lower_rssi {:03}, upper_rssi {:03}, lower_noise {:03}, upper_noise {:03}, \
             lower_max_magnitude {:04} upper_max_magnitude {:04} lower_max_index {:03} upper_max_index {:03} \
             lower_bitmap_weight {:03} upper_bitmap_weight {:03} tsf {}",
            s.freq,
            s.channel_type,
            s.lower_rssi,
            s.upper_rssi,
            s.lower_noise,
            s.upper_noise,
            s.lower_max_magnitude,
            s.upper_max_magnitude,
            s.lower_max_index,
            s.upper_max_index,
            s.lower_bitmap_weight,
            s.upper_bitmap_weight,
            s.tsf
        ),
        SampleRecord::Ath10k(s) => format!(
            "ath10k freq {:04}/{:04} (width {} MHz), rssi {:03}, noise {:03}, max_magnitude {:04} max_index {:03} tsf {}",
            s.freq1, s.freq2, s.chan_width_mhz, s.rssi, s.noise, s.max_magnitude, s.max_index, s.tsf
        ),
        SampleRecord::Ath11k(s) => format!(
            "ath11k freq {:04}/{:04} (width {} MHz){}, rssi {:04}, noise {:04}, max_magnitude {:04} max_index {:03} max_exp {:03} tsf {:08}",
            s.freq1,
            s.freq2,
            s.chan_width_mhz,
            if s.is_primary { " primary" } else { "" },
            s.rssi_signed(),
            s.noise_signed(),
            s.max_magnitude,
            s.max_index,
            s.max_exp,
            s.tsf
        ),
    };

    let stats = magnitude_stats(record)
        .iter()
        .map(|st| {
            format!(
                "datamax = {}, datamin = {}, datasquaresum = {}",
                st.max, st.min, st.square_sum
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    format!("{head} | {} bins | {stats}", record.bin_count())
}

pub fn render_summary<W: Write>(
    records: &[SampleRecord],
    out: &mut W,
) -> AppResult<usize> {
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "result[{i:03}]: {}", summary_line(record))?;
    }

    out.flush()?;

    Ok(records.len())
}
