use crate::cli::Cli;
use crate::errors::Result;
use clap::CommandFactory;
use clap_complete::{generate as generate_script, Shell};
use std::io;

/// Print a completion script for `shell` to stdout
pub fn generate(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate_script(shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}
