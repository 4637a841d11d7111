use crate::error::Error;

/// Four little-endian `u32`s open the binary section.
pub const BIN_HEADER_SIZE: usize = 16;
/// Each spectral record is 24 four-byte slots.
pub const RECORD_SLOTS: usize = 24;
pub const RECORD_SIZE: usize = RECORD_SLOTS * 4;

/// Sample encoding of one region's data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 32-bit little-endian float (`f4` tag).
    F4,
    /// 64-bit little-endian float (`f8` tag).
    F8,
}

impl DataType {
    pub fn from_tag(tag: [u8; 4]) -> Result<Self, Error> {
        match &tag[..2] {
            b"f4" => Ok(DataType::F4),
            b"f8" => Ok(DataType::F8),
            _ => Err(Error::UnsupportedDataType {
                tag: String::from_utf8_lossy(&tag)
                    .trim_end_matches(['\0', ' '])
                    .to_owned(),
            }),
        }
    }

    #[inline]
    pub fn elem_size(self) -> usize {
        match self {
            DataType::F4 => 4,
            DataType::F8 => 8,
        }
    }
}

/// Binary section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    pub group: u32,
    pub spectra_count: u32,
    /// Declared length of the record block; must equal
    /// `RECORD_SIZE * spectra_count`.
    pub record_block_len: u32,
    pub data_block_len: u32,
}

pub fn parse_binary_header(bytes: &[u8]) -> Result<BinaryHeader, Error> {
    let mut r = Reader::new(bytes);
    Ok(BinaryHeader {
        group: r.read_u32_le("group")?,
        spectra_count: r.read_u32_le("spectra_count")?,
        record_block_len: r.read_u32_le("record_block_len")?,
        data_block_len: r.read_u32_le("data_block_len")?,
    })
}

/// One 96-byte spectral record, decoded by explicit slot offsets.
///
/// Slots not named here are flags and counters the vendor tool never
/// reads back; they are skipped, not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralHeaderRecord {
    /// Slot 0.
    pub spectrum_number: u32,
    /// Slot 5; must match the ASCII region definition's `points`.
    pub points: usize,
    /// Slot 8, e.g. `chn`.
    pub channel_tag: [u8; 4],
    /// Slot 10, e.g. `sar`.
    pub sar_tag: [u8; 4],
    /// Slot 14, e.g. `c/s`.
    pub y_unit: [u8; 4],
    /// Slot 18.
    pub data_type: DataType,
    /// Slot 19, bytes; must equal `points * data_type.elem_size()`.
    pub data_length: u32,
    /// Slot 20, byte offset of the first sample relative to the start of
    /// the binary section (not to this record).
    pub data_start: u32,
    /// Slot 23, offset of trailing per-region information.
    pub extra_offset: u32,
}

/// Decodes one record from its 96-byte slice. `index` is the region's
/// position in file order, used only for error context.
pub fn parse_record(bytes: &[u8], index: usize) -> Result<SpectralHeaderRecord, Error> {
    let mut r = Reader::new(bytes);

    let spectrum_number = r.read_u32_le("spectrum_number")?;
    r.skip_slots(4, "record flags")?; // slots 1-4
    let points = r.read_u32_le("points")? as usize;
    r.skip_slots(2, "record flags")?; // slots 6-7
    let channel_tag = r.read_arr::<4>("channel_tag")?;
    r.skip_slots(1, "record counters")?; // slot 9
    let sar_tag = r.read_arr::<4>("sar_tag")?;
    r.skip_slots(3, "record counters")?; // slots 11-13
    let y_unit = r.read_arr::<4>("y_unit")?;
    r.skip_slots(3, "record counters")?; // slots 15-17
    let data_type = DataType::from_tag(r.read_arr::<4>("data_type")?)?;
    let data_length = r.read_u32_le("data_length")?;
    let data_start = r.read_u32_le("data_start")?;
    r.skip_slots(2, "record counters")?; // slots 21-22
    let extra_offset = r.read_u32_le("extra_offset")?;

    let expected = points
        .checked_mul(data_type.elem_size())
        .ok_or_else(|| Error::MalformedHeader(format!("record {index}: points overflow")))?;
    if data_length as usize != expected {
        return Err(Error::MalformedHeader(format!(
            "record {index}: data_length {data_length} does not match {points} points of {} bytes",
            data_type.elem_size()
        )));
    }

    Ok(SpectralHeaderRecord {
        spectrum_number,
        points,
        channel_tag,
        sar_tag,
        y_unit,
        data_type,
        data_length,
        data_start,
        extra_offset,
    })
}

/// Field-named little-endian cursor over a byte slice.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[inline]
    fn need(&self, n: usize, field: &'static str) -> Result<(), Error> {
        if self.pos + n <= self.bytes.len() {
            Ok(())
        } else {
            Err(Error::TruncatedData {
                field,
                offset: self.pos,
                len: n,
                available: self.bytes.len().saturating_sub(self.pos),
            })
        }
    }

    #[inline]
    pub(crate) fn read_u32_le(&mut self, field: &'static str) -> Result<u32, Error> {
        self.need(4, field)?;
        let v = u32::from_le_bytes(self.bytes[self.pos..self.pos + 4].try_into().unwrap());
        self.pos += 4;
        Ok(v)
    }

    #[inline]
    pub(crate) fn read_arr<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], Error> {
        self.need(N, field)?;
        let v: [u8; N] = self.bytes[self.pos..self.pos + N].try_into().unwrap();
        self.pos += N;
        Ok(v)
    }

    #[inline]
    pub(crate) fn skip_slots(&mut self, n: usize, field: &'static str) -> Result<(), Error> {
        self.need(n * 4, field)?;
        self.pos += n * 4;
        Ok(())
    }
}
