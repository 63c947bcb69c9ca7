use std::{fs, path::Path};

use log::{debug, info};
use specscan_core::{decode, DecodeOutcome};

use crate::AppResult;

/// Читает файл целиком в память.
pub fn read_scan_file(path: &Path) -> AppResult<Vec<u8>> {
    let buf = fs::read(path)?;
    debug!("read {} bytes from {:?}", buf.len(), path);
    Ok(buf)
}

/// Читает и декодирует файл за один проход.
pub fn load_scan_file(path: &Path) -> AppResult<DecodeOutcome> {
    let buf = read_scan_file(path)?;
    let outcome = decode(&buf);

    info!(
        "{:?}: {} records, {} warnings",
        path,
        outcome.records.len(),
        outcome.warnings.len()
    );

    Ok(outcome)
}
