
use crate::structs::Spectrum;

pub(crate) fn spectrum(name: &str, binding_energy: Vec<f64>, intensity: Vec<f64>) -> Spectrum {
    Spectrum {
        name: name.to_owned(),
        binding_energy,
        intensity,
    }
}
