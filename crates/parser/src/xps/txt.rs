use std::{fs, path::Path};

use crate::{error::Error, structs::Spectrum};

/// Renders a spectrum as two-column text, one `BE intensity` line per
/// sample, six decimal places each.
pub fn encode_txt(spectrum: &Spectrum) -> Result<String, Error> {
    if spectrum.binding_energy.len() != spectrum.intensity.len() {
        return Err(Error::MismatchedAxes {
            name: spectrum.name.clone(),
            binding_energy: spectrum.binding_energy.len(),
            intensity: spectrum.intensity.len(),
        });
    }

    let mut out = String::with_capacity(spectrum.points() * 24);
    for (be, intensity) in spectrum.binding_energy.iter().zip(&spectrum.intensity) {
        out.push_str(&format!("{be:.6} {intensity:.6}\n"));
    }
    Ok(out)
}

/// Renders to a text file on disk.
pub fn write_txt(path: impl AsRef<Path>, spectrum: &Spectrum) -> Result<(), Error> {
    let text = encode_txt(spectrum)?;
    fs::write(path, text)?;
    Ok(())
}
