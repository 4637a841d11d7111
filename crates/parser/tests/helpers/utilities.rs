use xpsio::block_len;

const BIN_HEADER_SIZE: usize = 16;
const RECORD_SIZE: usize = 96;

/// One region: name, start energy, step, intensities (stored as f8).
pub type Region<'a> = (&'a str, f64, f64, Vec<f64>);

/// Builds a minimal MultiPak SPE byte image with f8 data blocks.
pub fn build_spe(regions: &[Region<'_>]) -> Vec<u8> {
    let mut lines = vec![
        "XraySource: Al 1486.6".to_owned(),
        "IntensityCalCoeff: 32.1 0.36".to_owned(),
    ];
    for (i, (name, start, step, intensity)) in regions.iter().enumerate() {
        let end = start + step * (intensity.len() as f64 - 1.0);
        lines.push(format!(
            "SpectralRegDef: {n} {n} {name} 1 {points} {step} {start} {end} {start} {end} 0.05 23.5 {name}",
            n = i + 1,
            points = intensity.len(),
        ));
    }

    let mut bytes = format!("SOFH\r\n{}\r\nEOFH\r\n", lines.join("\r\n")).into_bytes();

    let count = regions.len();
    let data_total: usize = regions.iter().map(|(_, _, _, v)| v.len() * 8).sum();
    for v in [
        1u32,
        count as u32,
        (RECORD_SIZE * count) as u32,
        data_total as u32,
    ] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }

    let mut data_start = BIN_HEADER_SIZE + RECORD_SIZE * count;
    for (i, (_, _, _, intensity)) in regions.iter().enumerate() {
        let mut record = [0u8; RECORD_SIZE];
        let put = |record: &mut [u8; RECORD_SIZE], slot: usize, v: u32| {
            record[slot * 4..slot * 4 + 4].copy_from_slice(&v.to_le_bytes());
        };
        put(&mut record, 0, i as u32 + 1);
        put(&mut record, 5, intensity.len() as u32);
        put(&mut record, 19, (intensity.len() * 8) as u32);
        put(&mut record, 20, data_start as u32);
        record[18 * 4..18 * 4 + 4].copy_from_slice(b"f8\0\0");
        bytes.extend_from_slice(&record);
        data_start += intensity.len() * 8;
    }

    for (_, _, _, intensity) in regions {
        for &v in intensity {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
    }

    bytes
}

/// What a structural walk of an encoded `.xps` payload recovers.
#[derive(Debug, PartialEq, Eq)]
pub struct ScannedXps {
    pub point_counts: Vec<usize>,
    pub pad_markers: usize,
    pub trailer_word: u32,
}

/// Walks an encoded payload block by block using only the reserved
/// constant fields: magic bytes, point counts, pad markers, trailer.
pub fn scan_xps(bytes: &[u8]) -> ScannedXps {
    assert_eq!(&bytes[..11], b"XPSPEAK 4.0", "missing preamble");

    let mut at = 11;
    let mut point_counts = Vec::new();
    while bytes[at..at + 2] == [0x44, 0x50] {
        let points = u16::from_le_bytes([bytes[at + 2], bytes[at + 3]]) as usize;
        point_counts.push(points);
        at += block_len(points);
    }

    let mut pad_markers = 0;
    while bytes[at..at + 2] == [0x44, 0x41] {
        pad_markers += 1;
        at += 2;
    }

    assert!(bytes[at..at + 80].iter().all(|&b| b == 0), "trailer padding");
    at += 80;
    let trailer_word = u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap());
    assert_eq!(at + 4, bytes.len(), "trailing garbage after trailer word");

    ScannedXps {
        point_counts,
        pad_markers,
        trailer_word,
    }
}
