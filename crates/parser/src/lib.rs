pub mod error;
pub use error::Error;
pub mod structs;
pub use structs::*;
pub mod spe;
pub use spe::{parse_spe, read_spe};
pub mod xps;
pub use xps::{block_len, encode_txt, encode_xps, write_txt, write_xps};
