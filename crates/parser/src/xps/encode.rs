use std::{fs, path::Path};

use crate::{error::Error, structs::Spectrum};

/// 11-byte file magic, `XPSPEAK 4.0`.
pub const PREAMBLE: [u8; 11] = *b"XPSPEAK 4.0";
/// The container has a fixed number of region slots.
pub const MAX_SPECTRA: usize = 61;
/// `points + 1` is packed into a signed 16-bit field.
pub const MAX_POINTS: usize = i16::MAX as usize - 1;

/// Opens every populated spectrum block, `DP`.
const BLOCK_MAGIC: [u8; 2] = [0x44, 0x50];
/// Marks every unused region slot in the trailer, `DA`.
const SLOT_PAD_MARKER: [u8; 2] = [0x44, 0x41];

/// Each block carries this many all-zero channel placeholders. Their vendor
/// semantics are not public; they are emitted as opaque required bytes.
const RESERVED_CHANNELS: usize = 6;

const FILE_TRAILER_WORD: u32 = 8;

/// Per-spectrum block size in bytes, closed form.
#[inline]
pub const fn block_len(points: usize) -> usize {
    236 + 32 * points
}

/// Encodes the spectra, in order, into an XPSPEAK 4.1 `.xps` payload.
///
/// Samples are down-cast to `f32` on write regardless of input precision;
/// the loss is a format constraint, not an accident.
pub fn encode_xps(spectra: &[Spectrum]) -> Result<Vec<u8>, Error> {
    if spectra.len() > MAX_SPECTRA {
        return Err(Error::TooManySpectra {
            count: spectra.len(),
            max: MAX_SPECTRA,
        });
    }

    let total = PREAMBLE.len()
        + spectra.iter().map(|s| block_len(s.points())).sum::<usize>()
        + SLOT_PAD_MARKER.len() * (MAX_SPECTRA - spectra.len())
        + 80
        + 4;

    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&PREAMBLE);

    for spectrum in spectra {
        encode_block(&mut buf, spectrum)?;
    }

    for _ in spectra.len()..MAX_SPECTRA {
        buf.extend_from_slice(&SLOT_PAD_MARKER);
    }
    write_zeros(&mut buf, 80);
    write_u32_le(&mut buf, FILE_TRAILER_WORD);

    debug_assert_eq!(buf.len(), total);
    Ok(buf)
}

/// Encodes to a `.xps` file on disk.
pub fn write_xps(path: impl AsRef<Path>, spectra: &[Spectrum]) -> Result<(), Error> {
    let bytes = encode_xps(spectra)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn encode_block(buf: &mut Vec<u8>, spectrum: &Spectrum) -> Result<(), Error> {
    let points = spectrum.binding_energy.len();
    if points != spectrum.intensity.len() {
        return Err(Error::MismatchedAxes {
            name: spectrum.name.clone(),
            binding_energy: points,
            intensity: spectrum.intensity.len(),
        });
    }
    if points == 0 {
        return Err(Error::EmptySpectrum {
            name: spectrum.name.clone(),
        });
    }
    if points > MAX_POINTS {
        return Err(Error::TooManyPoints {
            name: spectrum.name.clone(),
            points,
            max: MAX_POINTS,
        });
    }

    let field_a = points as u16;
    let field_b = (points + 1) as u16;

    buf.extend_from_slice(&BLOCK_MAGIC);
    write_u16_le(buf, field_a);
    buf.extend_from_slice(&[0xff, 0xff, 0x00, 0x00]);
    buf.resize(buf.len() + 20, 0x20);
    write_u16_le(buf, field_a);

    write_sub_header(buf, field_b);
    write_f32_slice_le(buf, &spectrum.binding_energy);
    write_sub_header(buf, field_b);
    write_f32_slice_le(buf, &spectrum.intensity);

    // Extrema over the unmodified inputs, cast to f32 only on write.
    let (be_min, be_max) = min_max(&spectrum.binding_energy);
    let (i_min, i_max) = min_max(&spectrum.intensity);
    for v in [be_max, be_min, i_max, i_min] {
        write_f32_le(buf, v as f32);
    }
    write_zeros(buf, 60);

    for _ in 0..RESERVED_CHANNELS {
        write_sub_header(buf, field_b);
        write_zeros(buf, 4 * points);
    }
    write_zeros(buf, 18);

    Ok(())
}

/// `01 00`, the point count plus one, ten zero bytes.
#[inline]
fn write_sub_header(buf: &mut Vec<u8>, field_b: u16) {
    buf.extend_from_slice(&[0x01, 0x00]);
    write_u16_le(buf, field_b);
    write_zeros(buf, 10);
}

#[inline]
fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[inline]
fn write_u16_le(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

#[inline]
fn write_u32_le(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

#[inline]
fn write_f32_le(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

#[inline]
fn write_f32_slice_le(buf: &mut Vec<u8>, xs: &[f64]) {
    for &x in xs {
        write_f32_le(buf, x as f32);
    }
}

#[inline]
fn write_zeros(buf: &mut Vec<u8>, n: usize) {
    buf.resize(buf.len() + n, 0);
}
