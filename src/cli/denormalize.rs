use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use serde_json::{Map, Value as Json};
use tracing::info;

use crate::data::Batch;
use crate::data::json::{
    batch_to_json, read_samples, read_side_tensors, side_tensors_to_json, write_json,
};
use crate::norm::{SideTensors, denormalize_batch};

#[derive(Args, Debug)]
pub struct DenormalizeArgs {
    /// Normalized samples (JSON array)
    #[arg(long)]
    pub(crate) input: PathBuf,

    /// Output JSON file
    #[arg(long)]
    pub(crate) out: PathBuf,

    /// Optional side tensors (JSON object keyed by target)
    #[arg(long)]
    pub(crate) side: Option<PathBuf>,

    /// Samples per batch; all samples form one batch when omitted
    #[arg(long)]
    pub(crate) batch_size: Option<usize>,
}

pub fn handle(args: DenormalizeArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    info!(stage = "denormalize", "starting stage");

    let samples = read_samples(&args.input)?;
    if samples.is_empty() {
        anyhow::bail!("no samples in {}", args.input.display());
    }
    let batch_size = match args.batch_size {
        Some(0) => anyhow::bail!("--batch-size must be positive"),
        Some(n) => n,
        None => samples.len(),
    };
    let mut batches = samples
        .chunks(batch_size)
        .map(Batch::collate)
        .collect::<Result<Vec<_>, _>>()?;

    let mut side = match &args.side {
        Some(path) => read_side_tensors(path)?,
        None => SideTensors::new(),
    };
    let keys = denormalize_batch(&mut batches, &mut side)?;

    let rendered = batches
        .iter()
        .map(batch_to_json)
        .collect::<Result<Vec<_>, _>>()?;
    let mut out = Map::new();
    out.insert("batches".to_string(), Json::Array(rendered));
    if args.side.is_some() {
        out.insert("side".to_string(), side_tensors_to_json(&side)?);
    }
    write_json(&args.out, &Json::Object(out))?;

    info!(
        stage = "denormalize",
        elapsed_ms = start.elapsed().as_millis(),
        batches = batches.len(),
        keys = keys.len(),
        "finished stage"
    );
    Ok(())
}
