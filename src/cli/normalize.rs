use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use serde_json::Value as Json;
use tracing::info;

use crate::data::json::{read_samples, sample_to_json, write_json};
use crate::norm::NormalizerTransform;
use crate::targets::loader::load_targets;

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Target config TOML
    #[arg(long)]
    pub(crate) config: PathBuf,

    /// Input samples (JSON array)
    #[arg(long)]
    pub(crate) input: PathBuf,

    /// Output JSON file
    #[arg(long)]
    pub(crate) out: PathBuf,
}

pub fn handle(args: NormalizeArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    info!(stage = "normalize", "starting stage");

    let targets = load_targets(&args.config)?;
    let transform = NormalizerTransform::from_targets(&targets)?;
    let mut samples = read_samples(&args.input)?;
    transform.apply_all(&mut samples)?;

    let out = samples
        .iter()
        .map(sample_to_json)
        .collect::<Result<Vec<_>, _>>()?;
    let out = Json::Array(out);
    write_json(&args.out, &out)?;
    info!(
        stage = "normalize",
        elapsed_ms = start.elapsed().as_millis(),
        samples = samples.len(),
        targets = targets.targets.len(),
        "finished stage"
    );
    Ok(())
}
