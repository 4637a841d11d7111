use std::{fs, path::Path};

use crate::{
    error::Error,
    structs::{SpeFile, SpectralRegionDef, Spectrum},
};

use super::{
    ascii_header::{EOFH_DELIMITER, SOFH_LEN, parse_ascii_header},
    spectral_header::{
        BIN_HEADER_SIZE, DataType, RECORD_SIZE, SpectralHeaderRecord, parse_binary_header,
        parse_record,
    },
};

/// Reads and parses a MultiPak SPE file from disk.
pub fn read_spe(path: impl AsRef<Path>) -> Result<SpeFile, Error> {
    let bytes = fs::read(path)?;
    parse_spe(&bytes)
}

/// Parses a MultiPak SPE export from its raw bytes.
///
/// The whole buffer is required up front: spectral records address their
/// data blocks by absolute offset into the binary section.
pub fn parse_spe(bytes: &[u8]) -> Result<SpeFile, Error> {
    let delim_pos = find_delimiter(bytes)
        .ok_or_else(|| Error::MalformedHeader("EOFH delimiter not found".to_owned()))?;
    if delim_pos < SOFH_LEN {
        return Err(Error::MalformedHeader(
            "ASCII header shorter than its opening marker".to_owned(),
        ));
    }

    let text = std::str::from_utf8(&bytes[SOFH_LEN..delim_pos])
        .map_err(|e| Error::MalformedHeader(format!("ASCII header is not UTF-8: {e}")))?;
    let header = parse_ascii_header(text)?;

    // All data offsets below are relative to this position.
    let binary = &bytes[delim_pos + EOFH_DELIMITER.len()..];

    let bin_header = parse_binary_header(slice_at(binary, 0, BIN_HEADER_SIZE, "binary header")?)?;

    let count = header.region_defs.len();
    if bin_header.spectra_count as usize != count {
        return Err(Error::MalformedHeader(format!(
            "binary header declares {} spectra but the ASCII header defines {count} regions",
            bin_header.spectra_count
        )));
    }
    if bin_header.record_block_len as usize != RECORD_SIZE * count {
        return Err(Error::MalformedHeader(format!(
            "record block length {} does not match {count} records of {RECORD_SIZE} bytes",
            bin_header.record_block_len
        )));
    }

    let mut records = Vec::with_capacity(count);
    for n in 0..count {
        let raw = slice_at(
            binary,
            BIN_HEADER_SIZE + n * RECORD_SIZE,
            RECORD_SIZE,
            "spectral record",
        )?;
        let record = parse_record(raw, n)?;
        if record.points != header.region_defs[n].points {
            return Err(Error::MalformedHeader(format!(
                "record {n}: {} points but region {:?} defines {}",
                record.points, header.region_defs[n].name, header.region_defs[n].points
            )));
        }
        records.push(record);
    }

    let mut spectra = Vec::with_capacity(count);
    for (def, record) in header.region_defs.iter().zip(&records) {
        spectra.push(decode_spectrum(binary, def, record)?);
    }

    Ok(SpeFile {
        x_ray_source: header.x_ray_source,
        source_energy_ev: header.source_energy_ev,
        intensity_cal: header.intensity_cal,
        region_defs: header.region_defs,
        spectra,
    })
}

#[inline]
fn find_delimiter(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(EOFH_DELIMITER.len())
        .position(|w| w == EOFH_DELIMITER)
}

fn decode_spectrum(
    binary: &[u8],
    def: &SpectralRegionDef,
    record: &SpectralHeaderRecord,
) -> Result<Spectrum, Error> {
    let raw = slice_at(
        binary,
        record.data_start as usize,
        record.data_length as usize,
        "spectrum data",
    )?;

    let intensity = match record.data_type {
        DataType::F4 => raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
        DataType::F8 => raw
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect(),
    };

    Ok(Spectrum {
        name: def.name.clone(),
        binding_energy: energy_axis(def),
        intensity,
    })
}

/// Regenerates the implicit binding-energy axis: exactly `points` values
/// from `start_energy` by `step`. A start/step/end triple whose implied
/// length disagrees with `points` is clipped to `points`, never an error.
#[inline]
fn energy_axis(def: &SpectralRegionDef) -> Vec<f64> {
    (0..def.points)
        .map(|i| def.start_energy + i as f64 * def.step)
        .collect()
}

#[inline]
fn slice_at<'a>(
    bytes: &'a [u8],
    offset: usize,
    len: usize,
    field: &'static str,
) -> Result<&'a [u8], Error> {
    let end = offset.checked_add(len).ok_or(Error::TruncatedData {
        field,
        offset,
        len,
        available: bytes.len(),
    })?;
    if end > bytes.len() {
        return Err(Error::TruncatedData {
            field,
            offset,
            len,
            available: bytes.len().saturating_sub(offset.min(bytes.len())),
        });
    }
    Ok(&bytes[offset..end])
}
