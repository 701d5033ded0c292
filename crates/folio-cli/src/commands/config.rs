use std::path::Path;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use folio_config::Config;

use crate::cli::Cli;

pub fn show(config: &Config, path: &Path) -> Result<()> {
    println!("# {}", path.display());
    println!("{}", toml::to_string_pretty(config)?);
    println!("# database: {}", config.database_path().display());
    println!("# media:    {}", config.media_root().display());
    Ok(())
}

pub fn completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "folio", &mut std::io::stdout());
}
