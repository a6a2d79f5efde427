use std::io::{self, BufReader};

use anyhow::Result;
use tracing::info;

use ferz_engine::EngineConfig;
use ferz_play::Session;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    info!("ferz starting");

    let mut session = Session::new(EngineConfig::default(), io::stdout());
    session.run(BufReader::new(io::stdin()))?;
    Ok(())
}
