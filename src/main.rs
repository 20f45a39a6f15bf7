#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use power_up_adventure::app::App;
use power_up_adventure::asset::LevelSource;
use power_up_adventure::config::GameOptions;
use power_up_adventure::formatter::FrameFormatter;
use power_up_adventure::input::InputScript;
use power_up_adventure::level::LevelCatalog;

struct Args {
    script: Option<PathBuf>,
    levels: Option<PathBuf>,
    frames: Option<u64>,
    realtime: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        script: None,
        levels: None,
        frames: None,
        realtime: false,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--realtime" => args.realtime = true,
            "--levels" => args.levels = Some(iter.next().context("--levels needs a directory")?.into()),
            "--frames" => {
                let value = iter.next().context("--frames needs a number")?;
                args.frames = Some(value.parse().with_context(|| format!("invalid frame count '{value}'"))?);
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
            path if args.script.is_none() => args.script = Some(path.into()),
            extra => bail!("unexpected argument '{extra}'"),
        }
    }
    Ok(args)
}

fn init_tracing() -> Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().event_format(FrameFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber).context("could not set the tracing subscriber")
}

/// `power-up-adventure [SCRIPT] [--realtime] [--levels DIR] [--frames N]`
pub fn main() -> Result<()> {
    init_tracing()?;
    let args = parse_args()?;

    let options = GameOptions::load()?;
    let source = args.levels.map(LevelSource::Directory).unwrap_or_default();
    let levels = LevelCatalog::load(&source)?;

    let script = match &args.script {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
            InputScript::parse(&text)?
        }
        None => InputScript::default(),
    };

    let mut app = App::new(options, levels, script, args.realtime)?;
    if let Some(frames) = args.frames {
        app = app.with_frame_limit(frames);
    }

    let frames = app.run()?;
    info!(frames, "Exiting");
    Ok(())
}
