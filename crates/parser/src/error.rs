use thiserror::Error;

/// Failure modes of the SPE reader and the XPSPEAK encoder.
///
/// Every variant is reported synchronously from the parse/encode call that
/// hit it; nothing is retried or recovered.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural damage in either header layer: missing `EOFH` delimiter,
    /// unparseable `Key: Value` line, region/record count disagreement.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// A declared byte range extends past the end of the buffer.
    #[error("{field}: out of range (offset={offset}, len={len}, available={available})")]
    TruncatedData {
        field: &'static str,
        offset: usize,
        len: usize,
        available: usize,
    },

    /// Spectral record carries a data-type tag other than `f4` or `f8`.
    #[error("unsupported data type tag {tag:?} (expected \"f4\" or \"f8\")")]
    UnsupportedDataType { tag: String },

    /// More spectra than the XPSPEAK container has region slots for.
    #[error("{count} spectra exceed the {max} region slots of the XPSPEAK format")]
    TooManySpectra { count: usize, max: usize },

    /// Binding-energy and intensity axes of one spectrum differ in length.
    #[error(
        "spectrum {name:?}: binding energy has {binding_energy} samples, intensity has {intensity}"
    )]
    MismatchedAxes {
        name: String,
        binding_energy: usize,
        intensity: usize,
    },

    /// A spectrum with no samples cannot be encoded (the min/max trailer
    /// would be undefined).
    #[error("spectrum {name:?} has no samples")]
    EmptySpectrum { name: String },

    /// `points + 1` must fit the legacy signed 16-bit point field.
    #[error("spectrum {name:?}: {points} points exceed the 16-bit point field (max {max})")]
    TooManyPoints {
        name: String,
        points: usize,
        max: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
