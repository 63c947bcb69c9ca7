//! Декодер потока Atheros spectral scan
//!
//! Разбирает бинарный TLV поток, который драйверы ath9k/ath10k/ath11k отдают
//! через debugfs, и считает оценку мощности для каждого частотного бина.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use specscan_core::{decode, power_spectrum};
//!
//! let buf = std::fs::read("/tmp/fft_results")?;
//! let outcome = decode(&buf);
//!
//! for record in &outcome.records {
//!     for point in power_spectrum(record)? {
//!         println!("{:.3} MHz {:.2} dB", point.freq_mhz, point.power_dbfs);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decode;
pub mod layout;
pub mod spectrum;

pub use decode::*;
pub use layout::*;
pub use spectrum::*;
pub use specscan_types::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
