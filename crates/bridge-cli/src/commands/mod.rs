pub mod config;
pub mod run;
pub mod trace;
pub mod trigger;
pub mod validate;

use std::path::PathBuf;

/// Resolve the script body from a positional argument or --file.
pub fn read_script(script: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    match (script, file) {
        (Some(_), Some(_)) => anyhow::bail!("Pass either a script argument or --file, not both"),
        (Some(s), None) => Ok(s),
        (None, Some(path)) => Ok(std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?),
        (None, None) => anyhow::bail!("A script argument or --file is required"),
    }
}
