use serde::{Deserialize, Serialize};

/// One `SpectralRegDef` line from the ASCII header, 13 positional fields.
///
/// The binding-energy axis is never stored in the file; it is regenerated
/// from `start_energy`, `step` and `end_energy`. Invariant:
/// `points == round((end_energy - start_energy) / step) + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SpectralRegionDef {
    pub num1: u32,
    pub num2: u32,
    /// Region identifier, e.g. `C1s`; join key to the binary records by
    /// declaration order.
    pub name: String,
    pub atomic_number: u32,
    /// Sample count of the region.
    pub points: usize,
    /// Axis step in eV; signed, a high-to-low scan stores it negative.
    pub step: f64,
    pub start_energy: f64,
    pub end_energy: f64,
    pub start2: f64,
    pub end2: f64,
    /// Acquisition time per point, seconds.
    pub dwell_time: f64,
    pub pass_energy: f64,
    pub tail: String,
}

/// Intensity calibration coefficients (Ta, Tb) from `IntensityCalCoeff`.
/// Carried as metadata only; the reader never applies them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct IntensityCalibration {
    pub ta: f64,
    pub tb: f64,
}

/// A named spectrum: regenerated binding-energy axis paired with decoded
/// intensities, equal lengths. Reader output unit and encoder input unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Spectrum {
    pub name: String,
    /// eV, arithmetic sequence from the region definition.
    pub binding_energy: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl Spectrum {
    #[inline]
    pub fn points(&self) -> usize {
        self.binding_energy.len()
    }
}

/// Parsed MultiPak SPE file: scalar metadata plus spectra in declaration
/// order. `region_defs[n]` describes `spectra[n]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SpeFile {
    /// Raw `XraySource` value, e.g. `"Al 1486.6"`; keeps the anode name.
    pub x_ray_source: String,
    /// Second `XraySource` token, eV.
    pub source_energy_ev: f64,
    pub intensity_cal: IntensityCalibration,
    pub region_defs: Vec<SpectralRegionDef>,
    pub spectra: Vec<Spectrum>,
}
