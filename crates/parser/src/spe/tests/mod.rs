
use super::ascii_header::EOFH_DELIMITER;
use super::spectral_header::{BIN_HEADER_SIZE, RECORD_SIZE};

/// One synthetic region for building SPE fixtures in memory.
pub(crate) struct RegionFixture {
    pub name: &'static str,
    pub atomic_number: u32,
    pub start: f64,
    pub step: f64,
    pub data_type: [u8; 4],
    pub intensity: Vec<f64>,
    /// Trailing bytes between this data block and the next; the format
    /// allows them and records address data by absolute offset.
    pub gap: usize,
}

impl RegionFixture {
    pub(crate) fn f8(
        name: &'static str,
        atomic_number: u32,
        start: f64,
        step: f64,
        intensity: Vec<f64>,
    ) -> Self {
        Self {
            name,
            atomic_number,
            start,
            step,
            data_type: *b"f8\0\0",
            intensity,
            gap: 0,
        }
    }

    pub(crate) fn f4(
        name: &'static str,
        atomic_number: u32,
        start: f64,
        step: f64,
        intensity: Vec<f64>,
    ) -> Self {
        Self {
            data_type: *b"f4\0\0",
            ..Self::f8(name, atomic_number, start, step, intensity)
        }
    }

    fn points(&self) -> usize {
        self.intensity.len()
    }

    fn end(&self) -> f64 {
        self.start + self.step * (self.points() as f64 - 1.0)
    }

    fn elem_size(&self) -> usize {
        if &self.data_type[..2] == b"f4" { 4 } else { 8 }
    }

    fn data_length(&self) -> usize {
        self.points() * self.elem_size()
    }

    pub(crate) fn reg_def_line(&self, index: usize) -> String {
        format!(
            "SpectralRegDef: {n} {n} {name} {z} {points} {step} {start} {end} {start} {end} 0.05 23.5 {name}",
            n = index + 1,
            name = self.name,
            z = self.atomic_number,
            points = self.points(),
            step = self.step,
            start = self.start,
            end = self.end(),
        )
    }
}

/// Assembles a complete SPE byte image from the fixtures.
pub(crate) fn build_spe(regions: &[RegionFixture]) -> Vec<u8> {
    let mut lines = vec![
        "Platform: SmartSoft-XPS".to_owned(),
        "TechniqueEx: XPS".to_owned(),
        "XraySource: Al 1486.6".to_owned(),
        "IntensityCalCoeff: 32.1 0.36".to_owned(),
        format!("NoSpectralReg: {}", regions.len()),
    ];
    for (i, region) in regions.iter().enumerate() {
        lines.push(region.reg_def_line(i));
    }

    let mut bytes = format!("SOFH\r\n{}\r\nEOFH\r\n", lines.join("\r\n")).into_bytes();

    let count = regions.len();
    let data_total: usize = regions.iter().map(|r| r.data_length() + r.gap).sum();

    // Binary header: group, spectra_count, record block length, data length.
    for v in [
        1u32,
        count as u32,
        (RECORD_SIZE * count) as u32,
        data_total as u32,
    ] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }

    let mut data_start = BIN_HEADER_SIZE + RECORD_SIZE * count;
    for (i, region) in regions.iter().enumerate() {
        let mut slots = [0u32; 24];
        slots[0] = i as u32 + 1;
        slots[3] = i as u32 + 1;
        slots[5] = region.points() as u32;
        slots[19] = region.data_length() as u32;
        slots[20] = data_start as u32;

        let mut record = [0u8; RECORD_SIZE];
        for (slot, v) in slots.iter().enumerate() {
            record[slot * 4..slot * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        record[8 * 4..8 * 4 + 4].copy_from_slice(b"chn\0");
        record[10 * 4..10 * 4 + 4].copy_from_slice(b"sar\0");
        record[14 * 4..14 * 4 + 4].copy_from_slice(b"c/s\0");
        record[18 * 4..18 * 4 + 4].copy_from_slice(&region.data_type);
        bytes.extend_from_slice(&record);

        data_start += region.data_length() + region.gap;
    }

    for region in regions {
        for &v in &region.intensity {
            if region.elem_size() == 4 {
                bytes.extend_from_slice(&(v as f32).to_le_bytes());
            } else {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        bytes.extend(std::iter::repeat_n(0u8, region.gap));
    }

    bytes
}

/// Offset of the binary section within a built file.
pub(crate) fn bin_start(bytes: &[u8]) -> usize {
    bytes
        .windows(EOFH_DELIMITER.len())
        .position(|w| w == EOFH_DELIMITER)
        .expect("fixture has no EOFH delimiter")
        + EOFH_DELIMITER.len()
}
