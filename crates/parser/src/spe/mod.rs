pub mod ascii_header;
pub mod parse;
pub mod spectral_header;
pub use parse::{parse_spe, read_spe};

#[cfg(test)]
mod tests;
