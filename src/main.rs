use anyhow::Result;
use clap::Parser;

use declassify::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
