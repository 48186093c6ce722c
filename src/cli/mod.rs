use clap::{Parser, Subcommand};

mod denormalize;
mod keys;
mod normalize;

#[derive(Parser, Debug)]
#[command(name = "target-norm", version, about = "Target normalization CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Normalize(normalize::NormalizeArgs),
    Denormalize(denormalize::DenormalizeArgs),
    Keys(keys::KeysArgs),
}

impl Cli {
    pub fn dispatch(self) -> anyhow::Result<()> {
        match self.command {
            Command::Normalize(args) => normalize::handle(args),
            Command::Denormalize(args) => denormalize::handle(args),
            Command::Keys(args) => keys::handle(args),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/cli/mod.rs"]
mod tests;
