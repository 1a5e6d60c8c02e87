use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::clock::FrameClock;
use crate::error::Result;
use crate::harness::{SheetHarness, to_jsonl};
use crate::script::SheetScript;

#[derive(Debug, Parser)]
#[command(
    name = "sheet-replay",
    about = "Replay a bottom sheet step script and print a JSONL trace",
    version
)]
pub struct Cli {
    /// Path to the JSON step script.
    pub script: PathBuf,

    /// Frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Print only the final trace line.
    #[arg(long)]
    pub last: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}

pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let script = SheetScript::from_json_file(&cli.script)?;
    let clock = FrameClock::new(Duration::from_millis(cli.frame_ms));
    let mut harness = SheetHarness::for_script(&script, clock)?;
    harness.run(&script)?;
    let trace = harness.trace();
    let lines = if cli.last {
        trace.last().map(std::slice::from_ref).unwrap_or_default()
    } else {
        trace
    };
    out.write_all(to_jsonl(lines)?.as_bytes())?;
    tracing::info!(
        steps = trace.len(),
        closes = harness.closes(),
        "replay finished"
    );
    Ok(())
}
