use std::io::Write;

use crate::settings::Settings;

/// Print the effective catalog (built-in or loaded, after the platform
/// filter) as pretty JSON.
pub fn run<W: Write>(settings: &Settings, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = settings.load_catalog()?;
    writeln!(out, "{}", catalog.to_json()?)?;
    Ok(())
}
