pub mod encode;
pub use encode::{MAX_POINTS, MAX_SPECTRA, block_len, encode_xps, write_xps};
pub mod txt;
pub use txt::{encode_txt, write_txt};

#[cfg(test)]
mod tests;
