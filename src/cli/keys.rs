use std::path::PathBuf;

use clap::Args;

use crate::data::json::read_samples;
use crate::norm::discover_norm_keys;

#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Samples to scan (JSON array)
    #[arg(long)]
    pub(crate) input: PathBuf,
}

pub fn handle(args: KeysArgs) -> anyhow::Result<()> {
    let samples = read_samples(&args.input)?;
    for key in discover_norm_keys(&samples) {
        println!("{key}");
    }
    Ok(())
}
