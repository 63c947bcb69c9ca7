use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, warn};
use specscan_types::{
    Ath10kSample, Ath11kSample, Ht20Sample, Ht40Sample, SampleKind, SampleRecord, ScanError,
    ScanResult,
};

use crate::layout::{BinDomain, SampleLayout, MAX_RECORD_SIZE, TLV_HEADER_SIZE};

/// TLV-заголовок записи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvHeader {
    /// Сырое значение `type`, может не соответствовать ни одному варианту
    pub kind: u8,
    /// Длина нагрузки без заголовка
    pub payload_len: u16,
}

/// Предупреждение, накопленное за проход декодирования.
#[derive(Debug)]
pub struct DecodeWarning {
    /// Смещение TLV-заголовка проблемной записи
    pub offset: usize,
    pub error: ScanError,
}

/// Результат одного прохода по буферу.
///
/// Записи идут в порядке следования в потоке и после декодирования не
/// изменяются.
#[derive(Debug, Default)]
pub struct DecodeOutcome {
    pub records: Vec<SampleRecord>,
    pub warnings: Vec<DecodeWarning>,
    /// Сколько байт буфера пройдено, включая пропущенные записи.
    pub bytes_consumed: usize,
}

impl TlvHeader {
    /// Полная длина записи вместе с заголовком.
    pub fn record_len(&self) -> usize {
        TLV_HEADER_SIZE + self.payload_len as usize
    }
}

impl std::fmt::Display for DecodeWarning {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "offset {}: {}", self.offset, self.error)
    }
}

impl DecodeOutcome {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Поток разобран целиком и без единого предупреждения.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn push_warning(
        &mut self,
        offset: usize,
        error: ScanError,
    ) {
        warn!("offset {offset}: {error}");
        self.warnings.push(DecodeWarning { offset, error });
    }
}

/// Читает TLV-заголовок из начала `buf`.
pub fn decode_header(buf: &[u8]) -> ScanResult<TlvHeader> {
    if buf.len() < TLV_HEADER_SIZE {
        return Err(ScanError::TruncatedHeader {
            remaining: buf.len(),
            needed: TLV_HEADER_SIZE,
        });
    }

    let mut rd = Cursor::new(buf);
    let kind = rd.read_u8()?;
    let payload_len = rd.read_u16::<BigEndian>()?;

    Ok(TlvHeader { kind, payload_len })
}

/// Декодирует весь буфер.
///
/// Нехватка данных на заголовок или запись останавливает проход; ошибки
/// отдельной записи (длина, число бинов, неизвестный тип) пропускают только
/// её. Уже декодированные записи сохраняются в любом случае.
pub fn decode(buf: &[u8]) -> DecodeOutcome {
    let mut outcome = DecodeOutcome::default();
    let mut pos = 0;

    while pos < buf.len() {
        let rest = &buf[pos..];

        let header = match decode_header(rest) {
            Ok(h) => h,
            Err(e) => {
                outcome.push_warning(pos, e);
                break;
            }
        };

        let record_len = header.record_len();

        if record_len > rest.len() {
            outcome.push_warning(
                pos,
                ScanError::TruncatedRecord {
                    needed: record_len,
                    remaining: rest.len(),
                },
            );
            break;
        }

        if record_len > MAX_RECORD_SIZE {
            outcome.push_warning(
                pos,
                ScanError::RecordTooLong {
                    length: record_len,
                    max: MAX_RECORD_SIZE,
                },
            );
            pos += record_len;
            continue;
        }

        match parse_payload(header.kind, &rest[TLV_HEADER_SIZE..record_len]) {
            Ok(record) => outcome.records.push(record),
            Err(e) => outcome.push_warning(pos, e),
        }

        pos += record_len;
    }

    outcome.bytes_consumed = pos;

    debug!(
        "decoded {} records from {} bytes ({} warnings)",
        outcome.records.len(),
        buf.len(),
        outcome.warnings.len()
    );

    outcome
}

/// Разбирает нагрузку по сырому значению `type` из заголовка.
pub fn parse_payload(
    kind: u8,
    payload: &[u8],
) -> ScanResult<SampleRecord> {
    parse_variant(SampleKind::from_u8(kind)?, payload)
}

/// Разбирает нагрузку записи известного типа.
///
/// Проверяются только размеры; значения полей прошивке доверяем.
pub fn parse_variant(
    kind: SampleKind,
    payload: &[u8],
) -> ScanResult<SampleRecord> {
    let layout = SampleLayout::for_kind(kind);
    let bins = checked_bin_count(layout, payload.len())?;
    let mut rd = Cursor::new(payload);

    let record = match kind {
        SampleKind::Ht20 => SampleRecord::Ht20(read_ht20(&mut rd, bins)?),
        SampleKind::Ht20_40 => SampleRecord::Ht40(read_ht40(&mut rd, bins)?),
        SampleKind::Ath10k => SampleRecord::Ath10k(read_ath10k(&mut rd, bins)?),
        SampleKind::Ath11k => SampleRecord::Ath11k(read_ath11k(&mut rd, bins)?),
    };

    Ok(record)
}

/// Проверяет длину нагрузки и возвращает число бинов.
fn checked_bin_count(
    layout: &SampleLayout,
    payload_len: usize,
) -> ScanResult<usize> {
    match layout.bins {
        BinDomain::Fixed(n) => {
            let expected = layout.fixed_size + n;
            if payload_len != expected {
                return Err(ScanError::length_mismatch(
                    layout.kind,
                    expected,
                    payload_len,
                ));
            }
            Ok(n)
        }
        BinDomain::OneOf(_) => {
            if payload_len < layout.fixed_size {
                return Err(ScanError::length_mismatch(
                    layout.kind,
                    layout.fixed_size,
                    payload_len,
                ));
            }

            let bins = payload_len - layout.fixed_size;
            if !layout.bins.contains(bins) {
                return Err(ScanError::InvalidBinCount {
                    kind: layout.kind,
                    bins,
                });
            }
            Ok(bins)
        }
    }
}

fn read_bins(
    rd: &mut Cursor<&[u8]>,
    count: usize,
) -> ScanResult<Vec<u8>> {
    let mut bins = vec![0u8; count];
    rd.read_exact(&mut bins)?;
    Ok(bins)
}

fn read_ht20(
    rd: &mut Cursor<&[u8]>,
    bins: usize,
) -> ScanResult<Ht20Sample> {
    Ok(Ht20Sample {
        max_exp: rd.read_u8()?,
        freq: rd.read_u16::<BigEndian>()?,
        rssi: rd.read_i8()?,
        noise: rd.read_i8()?,
        max_magnitude: rd.read_u16::<BigEndian>()?,
        max_index: rd.read_u8()?,
        bitmap_weight: rd.read_u8()?,
        tsf: rd.read_u64::<BigEndian>()?,
        bins: read_bins(rd, bins)?,
    })
}

fn read_ht40(
    rd: &mut Cursor<&[u8]>,
    bins: usize,
) -> ScanResult<Ht40Sample> {
    Ok(Ht40Sample {
        channel_type: rd.read_u8()?,
        freq: rd.read_u16::<BigEndian>()?,
        lower_rssi: rd.read_i8()?,
        upper_rssi: rd.read_i8()?,
        tsf: rd.read_u64::<BigEndian>()?,
        lower_noise: rd.read_i8()?,
        upper_noise: rd.read_i8()?,
        lower_max_magnitude: rd.read_u16::<BigEndian>()?,
        upper_max_magnitude: rd.read_u16::<BigEndian>()?,
        lower_max_index: rd.read_u8()?,
        upper_max_index: rd.read_u8()?,
        lower_bitmap_weight: rd.read_u8()?,
        upper_bitmap_weight: rd.read_u8()?,
        max_exp: rd.read_u8()?,
        bins: read_bins(rd, bins)?,
    })
}

fn read_ath10k(
    rd: &mut Cursor<&[u8]>,
    bins: usize,
) -> ScanResult<Ath10kSample> {
    Ok(Ath10kSample {
        chan_width_mhz: rd.read_u8()?,
        freq1: rd.read_u16::<BigEndian>()?,
        freq2: rd.read_u16::<BigEndian>()?,
        noise: rd.read_i16::<BigEndian>()?,
        max_magnitude: rd.read_u16::<BigEndian>()?,
        total_gain_db: rd.read_u16::<BigEndian>()?,
        base_pwr_db: rd.read_u16::<BigEndian>()?,
        tsf: rd.read_u64::<BigEndian>()?,
        max_index: rd.read_i8()?,
        rssi: rd.read_u8()?,
        relpwr_db: rd.read_u8()?,
        avgpwr_db: rd.read_u8()?,
        max_exp: rd.read_u8()?,
        bins: read_bins(rd, bins)?,
    })
}

fn read_ath11k(
    rd: &mut Cursor<&[u8]>,
    bins: usize,
) -> ScanResult<Ath11kSample> {
    Ok(Ath11kSample {
        chan_width_mhz: rd.read_u8()?,
        max_index: rd.read_i8()?,
        max_exp: rd.read_u8()?,
        freq1: rd.read_u16::<BigEndian>()?,
        freq2: rd.read_u16::<BigEndian>()?,
        max_magnitude: rd.read_u16::<BigEndian>()?,
        rssi: rd.read_u16::<BigEndian>()?,
        tsf: rd.read_u32::<BigEndian>()?,
        noise: rd.read_u32::<BigEndian>()?,
        is_primary: rd.read_u8()? != 0,
        bins: read_bins(rd, bins)?,
    })
}
