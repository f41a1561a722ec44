//! qnatsv converts a knowledge-base JSON export into the TSV file set
//! accepted by the knowledge-base import tool.
//!
//! Usage: `qnatsv <INPUT.json>`

mod commands;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = commands::parse_args();
    commands::init_tracing(&cli);
    commands::run(cli)
}
