use std::io::Write;

use anyhow::Result;
use clap::Parser;
use neofs_morph_cli::{logging, open_store, ReplayArgs, Runner, Scenario};
use tracing::info;

fn main() -> Result<()> {
    let args = ReplayArgs::parse();
    let settings = args.settings()?;
    logging::init(&settings.logging)?;

    let scenario = Scenario::load(&args.scenario)?;
    let store = open_store(&settings.storage)?;
    info!(
        scenario = %args.scenario.display(),
        steps = scenario.steps.len(),
        backend = ?settings.storage.backend,
        "replaying scenario"
    );

    let mut runner = Runner::new(store.as_ref(), &settings.governance);
    let reports = runner.run(&scenario)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for report in &reports {
        if args.pretty {
            serde_json::to_writer_pretty(&mut out, report)?;
        } else {
            serde_json::to_writer(&mut out, report)?;
        }
        writeln!(out)?;
    }

    let failed = reports.iter().filter(|report| report.is_error()).count();
    info!(steps = reports.len(), failed, "replay finished");
    Ok(())
}
