use anyhow::{bail, Result};
use chordtap_parser::cfg;
use clap::Parser;
use simplelog::*;

use std::path::PathBuf;

#[cfg(target_os = "linux")]
use chordtap_state_machine::Chordtap;
use chordtap_state_machine::{default_cfg, ValidatedArgs, DEFAULT_CONSOLE, DEFAULT_DEVICE};

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
/// chordtap: types the chords of a chorded keyboard into the Linux console
///
/// chordtap reads chord messages from a chorded keyboard on a serial line,
/// looks up the action bound to each completed chord in its configuration
/// and types the result into the console, switches virtual consoles, or runs
/// a shell command.
struct Args {
    /// Configuration file(s) to use with chordtap. If not specified, defaults to
    /// chordtap.conf in the current working directory,
    /// '$XDG_CONFIG_HOME/chordtap/chordtap.conf' and '/etc/chordtap.conf'.
    /// Only the first file found is used.
    #[arg(short, long, verbatim_doc_comment)]
    cfg: Option<Vec<PathBuf>>,

    /// Serial device the chorded keyboard is connected to.
    #[arg(long, default_value = DEFAULT_DEVICE)]
    device: PathBuf,

    /// Console device that actions are typed into.
    #[arg(long, default_value = DEFAULT_CONSOLE)]
    console: PathBuf,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging; implies --debug as well.
    #[arg(short, long)]
    trace: bool,

    /// Validate configuration file and exit
    #[arg(long, verbatim_doc_comment)]
    check: bool,
}

/// Parse CLI arguments and initialize logging.
fn cli_init() -> Result<ValidatedArgs> {
    let args = Args::parse();

    let cfg_paths = args.cfg.unwrap_or_else(default_cfg);

    let log_lvl = match (args.debug, args.trace) {
        (_, true) => LevelFilter::Trace,
        (true, false) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    };

    let mut log_cfg = ConfigBuilder::new();
    if let Err(e) = log_cfg.set_time_offset_to_local() {
        eprintln!("WARNING: could not set log TZ to local: {e:?}");
    };
    log_cfg.set_time_format_rfc3339();
    CombinedLogger::init(vec![TermLogger::new(
        log_lvl,
        log_cfg.build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .expect("logger can init");
    log::info!("chordtap v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(config_file) = cfg_paths.first() {
        if !config_file.exists() {
            bail!(
                "Could not find the config file ({})\nFor more info, pass the `-h` or `--help` flags.",
                cfg_paths[0].to_str().unwrap_or("?")
            )
        }
    } else {
        bail!("No config files provided\nFor more info, pass the `-h` or `--help` flags.");
    }

    if args.check {
        log::info!("validating config only and exiting");
        let status = match cfg::new_from_file(&cfg_paths[0]) {
            Ok(_) => 0,
            Err(e) => {
                log::error!("{e:?}");
                1
            }
        };
        std::process::exit(status);
    }

    Ok(ValidatedArgs {
        paths: cfg_paths,
        device_path: args.device,
        console_path: args.console,
    })
}

#[cfg(target_os = "linux")]
fn main_impl() -> Result<()> {
    let args = cli_init()?;
    let chordtap_arc = Chordtap::new_arc(&args)?;

    // The event loop only reads the device and forwards messages to the processing loop, which
    // owns the decoder. A slow console write stalls decoding but never the device reads.
    let (tx, rx) = std::sync::mpsc::sync_channel(100);
    Chordtap::start_processing_loop(chordtap_arc, rx);

    sd_notify::notify(true, &[sd_notify::NotifyState::Ready])?;

    Chordtap::event_loop(&args.device_path, tx)?;

    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn main_impl() -> Result<()> {
    let _args = cli_init()?;
    bail!("chordtap drives the Linux console and only runs on Linux")
}

fn main() -> Result<()> {
    let ret = main_impl();
    if let Err(ref e) = ret {
        log::error!("{e}\n");
    }
    ret
}
