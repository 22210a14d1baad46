//! Amino acids, proteases, and the in-silico digestion of protein sequences.

mod amino_acid;
mod digest;
mod protease;

pub use amino_acid::*;
pub use digest::*;
pub use protease::*;
