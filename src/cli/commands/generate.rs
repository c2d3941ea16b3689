//! `passvault generate`: print a random password.  No vault is needed.

use crate::cli::load_settings;
use crate::errors::Result;
use crate::generator::{self, GeneratorOptions};

/// Which classes `generate` should leave out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exclusions {
    pub upper: bool,
    pub lower: bool,
    pub digits: bool,
    pub symbols: bool,
}

/// Execute the `generate` command.
pub fn execute(length: Option<usize>, exclude: Exclusions) -> Result<()> {
    let settings = load_settings()?;
    let options = GeneratorOptions {
        length: length.unwrap_or(settings.generator_length),
        upper: !exclude.upper,
        lower: !exclude.lower,
        digits: !exclude.digits,
        symbols: !exclude.symbols,
    };

    let password = generator::generate(&options)?;
    println!("{}", password.as_str());

    Ok(())
}
