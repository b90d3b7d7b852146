use std::path::Path;
use std::process;

use anyhow::{bail, Result};

use barrier_bars::{
    config::DemoConfig,
    logging,
    player::{Mode, Player},
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const RUN_USAGE: &str = "barrier-bars run [config.json]";
const PREVIEW_USAGE: &str = "barrier-bars preview [config.json]";
const DEFAULTS_USAGE: &str = "barrier-bars defaults";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("run") => {
            let path = args.next();
            play(path.as_deref(), Mode::Run)
        }
        Some("preview") => {
            let path = args.next();
            play(path.as_deref(), Mode::Preview)
        }
        Some("defaults") => {
            println!("{}", serde_json::to_string_pretty(&DemoConfig::default())?);
            Ok(())
        }
        _ => bail!(
            "Barrier bars — two-phase barrier synchronization demo\n\nUsage:\n  {RUN_USAGE}\n  {PREVIEW_USAGE}\n  {DEFAULTS_USAGE}"
        ),
    }
}

fn play(path: Option<&str>, mode: Mode) -> Result<()> {
    let _guard = logging::init()?;

    let config = DemoConfig::load(path.map(Path::new))?;
    config.validate()?;
    tracing::info!(?mode, canvas = %config.canvas, bars = config.number, "starting player");

    let mut player = Player::new(config)?;
    player.play(mode)
}
