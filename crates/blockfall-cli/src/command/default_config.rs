use std::path::PathBuf;

use crate::{config::BlockfallConfig, util::JsonOutput};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    let DefaultConfigArg { output } = arg;
    JsonOutput::create(output.as_deref())?.write_pretty(&BlockfallConfig::default())
}
