//! Random password generation.
//!
//! Characters are drawn uniformly from the union of the enabled classes
//! using an OS-seeded CSPRNG.  One character from each enabled class is
//! placed first and the whole buffer is then shuffled, so every class is
//! represented whenever the length allows it.

use rand::prelude::*;
use rand::rngs::StdRng;
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Default generated password length.
pub const DEFAULT_LENGTH: usize = 16;

/// Longest password `generate` will produce.
pub const MAX_LENGTH: usize = 4096;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
/// The 32 printable ASCII punctuation characters.
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Which characters a generated password may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub upper: bool,
    pub lower: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            upper: true,
            lower: true,
            digits: true,
            symbols: true,
        }
    }
}

impl GeneratorOptions {
    /// Default classes with a custom length.
    pub fn with_length(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    fn classes(&self) -> Vec<&'static [u8]> {
        [
            (self.upper, UPPER),
            (self.lower, LOWER),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter_map(|(enabled, set)| enabled.then_some(set))
        .collect()
    }
}

/// Generate a random password according to `options`.
///
/// Fails with `InvalidInput` if the length is zero or above
/// [`MAX_LENGTH`], or if every class is disabled.
pub fn generate(options: &GeneratorOptions) -> Result<Zeroizing<String>> {
    if options.length == 0 {
        return Err(VaultError::InvalidInput(
            "password length must be at least 1".into(),
        ));
    }
    if options.length > MAX_LENGTH {
        return Err(VaultError::InvalidInput(format!(
            "password length must be at most {MAX_LENGTH}"
        )));
    }

    let classes = options.classes();
    if classes.is_empty() {
        return Err(VaultError::InvalidInput(
            "at least one character class must be enabled".into(),
        ));
    }

    let alphabet: Vec<u8> = classes.iter().flat_map(|set| set.iter().copied()).collect();

    let mut rng = StdRng::try_from_os_rng().map_err(|e| {
        VaultError::Io(std::io::Error::other(format!("OS random source failed: {e}")))
    })?;

    let mut buf = Zeroizing::new(Vec::with_capacity(options.length));

    if options.length >= classes.len() {
        for set in &classes {
            buf.push(set[rng.random_range(0..set.len())]);
        }
    }
    while buf.len() < options.length {
        buf.push(alphabet[rng.random_range(0..alphabet.len())]);
    }
    buf.shuffle(&mut rng);

    // Every byte comes from an ASCII table.
    let password: String = buf.iter().map(|&b| char::from(b)).collect();
    Ok(Zeroizing::new(password))
}
