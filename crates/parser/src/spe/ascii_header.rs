use hashbrown::HashMap;

use crate::{
    error::Error,
    structs::{IntensityCalibration, SpectralRegionDef},
};

/// Opening marker `SOFH\r\n`; the ASCII text starts right after it.
pub const SOFH_LEN: usize = 6;
/// Delimiter closing the ASCII section; the binary section starts 8 bytes
/// after the match position.
pub const EOFH_DELIMITER: &[u8; 8] = b"\r\nEOFH\r\n";

const KEY_REG_DEF: &str = "SpectralRegDef";
const KEY_XRAY_SOURCE: &str = "XraySource";
const KEY_INTENSITY_CAL: &str = "IntensityCalCoeff";

const REG_DEF_FIELDS: usize = 13;

/// Decoded ASCII header section.
///
/// Scalar keys occur once and collapse into `scalars`; the repeating
/// `SpectralRegDef` key is kept as an ordered list — a map would silently
/// drop all regions but one.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiHeader {
    pub x_ray_source: String,
    pub source_energy_ev: f64,
    pub intensity_cal: IntensityCalibration,
    pub region_defs: Vec<SpectralRegionDef>,
    /// Every single-occurrence key, verbatim (the extracted ones included).
    pub scalars: HashMap<String, String>,
}

pub fn parse_ascii_header(text: &str) -> Result<AsciiHeader, Error> {
    let mut scalars: HashMap<String, String> = HashMap::new();
    let mut region_defs = Vec::new();

    for line in text.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(Error::MalformedHeader(format!(
                "header line without ':': {line:?}"
            )));
        };
        let key = key.trim();
        let value = value.trim();

        if key == KEY_REG_DEF {
            region_defs.push(parse_region_def(value)?);
        } else {
            scalars.insert(key.to_owned(), value.to_owned());
        }
    }

    let x_ray_source = scalars
        .get(KEY_XRAY_SOURCE)
        .cloned()
        .ok_or_else(|| Error::MalformedHeader(format!("missing {KEY_XRAY_SOURCE}")))?;

    // Second token is the source energy, e.g. "Al 1486.6".
    let source_energy_ev = x_ray_source
        .split_whitespace()
        .nth(1)
        .and_then(|t| t.parse::<f64>().ok())
        .ok_or_else(|| {
            Error::MalformedHeader(format!(
                "{KEY_XRAY_SOURCE} {x_ray_source:?}: no parseable energy token"
            ))
        })?;

    let cal_raw = scalars
        .get(KEY_INTENSITY_CAL)
        .cloned()
        .ok_or_else(|| Error::MalformedHeader(format!("missing {KEY_INTENSITY_CAL}")))?;
    let intensity_cal = parse_intensity_cal(&cal_raw)?;

    Ok(AsciiHeader {
        x_ray_source,
        source_energy_ev,
        intensity_cal,
        region_defs,
        scalars,
    })
}

fn parse_intensity_cal(value: &str) -> Result<IntensityCalibration, Error> {
    let mut tokens = value.split_whitespace();
    let (Some(ta), Some(tb)) = (tokens.next(), tokens.next()) else {
        return Err(Error::MalformedHeader(format!(
            "{KEY_INTENSITY_CAL} {value:?}: expected two coefficients"
        )));
    };
    Ok(IntensityCalibration {
        ta: parse_f64(ta, "Ta")?,
        tb: parse_f64(tb, "Tb")?,
    })
}

/// Splits a `SpectralRegDef` value into its 13 positional fields. Tokens
/// past the 13th are folded into the trailing string field.
fn parse_region_def(value: &str) -> Result<SpectralRegionDef, Error> {
    let fields: Vec<&str> = value.split_whitespace().collect();
    if fields.len() < REG_DEF_FIELDS {
        return Err(Error::MalformedHeader(format!(
            "{KEY_REG_DEF} {value:?}: expected {REG_DEF_FIELDS} fields, got {}",
            fields.len()
        )));
    }

    Ok(SpectralRegionDef {
        num1: parse_u32(fields[0], "num1")?,
        num2: parse_u32(fields[1], "num2")?,
        name: fields[2].to_owned(),
        atomic_number: parse_u32(fields[3], "atomic_number")?,
        points: parse_u32(fields[4], "points")? as usize,
        step: parse_f64(fields[5], "step")?,
        start_energy: parse_f64(fields[6], "start_energy")?,
        end_energy: parse_f64(fields[7], "end_energy")?,
        start2: parse_f64(fields[8], "start2")?,
        end2: parse_f64(fields[9], "end2")?,
        dwell_time: parse_f64(fields[10], "dwell_time")?,
        pass_energy: parse_f64(fields[11], "pass_energy")?,
        tail: fields[REG_DEF_FIELDS - 1..].join(" "),
    })
}

#[inline]
fn parse_u32(token: &str, field: &'static str) -> Result<u32, Error> {
    token
        .parse::<u32>()
        .map_err(|_| Error::MalformedHeader(format!("{field}: cannot parse {token:?} as integer")))
}

#[inline]
fn parse_f64(token: &str, field: &'static str) -> Result<f64, Error> {
    token
        .parse::<f64>()
        .map_err(|_| Error::MalformedHeader(format!("{field}: cannot parse {token:?} as float")))
}
