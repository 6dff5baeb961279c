//! Keypair generation.

use std::io::Write;
use std::path::{Path, PathBuf};

use puzi_core::Keypair;
use tracing::info;

use crate::error::CliError;
use crate::output::{KeyInfo, OutputFormat};

/// Keygen command executor.
pub struct KeygenCommand {
    out: PathBuf,
    force: bool,
}

impl KeygenCommand {
    /// Create a new keygen command.
    #[must_use]
    pub fn new(out: &Path, force: bool) -> Self {
        Self {
            out: out.to_path_buf(),
            force,
        }
    }

    /// Generate a keypair and write it to the output file.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        if self.out.exists() && !self.force {
            return Err(CliError::InvalidArgument(format!(
                "{} already exists (use --force to overwrite)",
                self.out.display()
            )));
        }
        let keypair = Keypair::generate();
        keypair.write_to_file(&self.out)?;
        info!(address = %keypair.address(), path = %self.out.display(), "keypair written");
        format.write(
            writer,
            &KeyInfo {
                address: keypair.address(),
                path: self.out.display().to_string(),
            },
        )
    }
}
