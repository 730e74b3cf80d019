use anyhow::{anyhow, bail, Result};
use chordtap_parser::cfg;
use chordtap_state_machine::{default_cfg, oskbd::*, Chordtap};
use clap::Parser;
use simplelog::{format_description, *};
use std::path::PathBuf;
use std::sync::Arc;

pub fn default_sim() -> Vec<PathBuf> {
    let mut sims = Vec::new();

    let default = PathBuf::from("test/sim.txt");
    if default.is_file() {
        sims.push(default);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let fallback = config_dir.join("chordtap").join("test").join("sim.txt");
        if fallback.is_file() {
            sims.push(fallback);
        }
    }

    sims
}

#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
/// chordtap_simulated_input: a cli tool that helps debug a chordtap configuration by:
/// - reading a text file with a sequence of chord messages and delays
/// - decoding them with chordtap
/// - printing out what chordtap would type, which consoles it would switch to and which
///   commands it would run
/// - (optionally) saving the result to a file for reference
///
/// Simulation items are separated by whitespace:
///   t:<ms>                   let <ms> milliseconds pass
///   c:[<modifier>:]<hex>     a chord message, e.g. c:03 or c:shift:0x03
///   m:<hex>                  a raw device message, e.g. m:0x0903
struct Args {
    /// Configuration file(s) to use with chordtap. If not specified, defaults to
    /// chordtap.conf in the current working directory,
    /// '$XDG_CONFIG_HOME/chordtap/chordtap.conf' and '/etc/chordtap.conf'
    #[arg(short, long, verbatim_doc_comment)]
    cfg: Option<Vec<PathBuf>>,

    /// Simulation file(s) to use with chordtap_simulated_input. If not specified, defaults to
    /// test/sim.txt in the current working directory and
    /// '$XDG_CONFIG_HOME/chordtap/test/sim.txt'
    #[arg(short = 's', long, verbatim_doc_comment)]
    sim: Option<Vec<PathBuf>>,

    /// Save output to the simulation file's path with its name appended by the value of this argument.
    #[arg(short = 'o', long, verbatim_doc_comment)]
    out: Option<String>,
}

fn log_init() {
    let mut log_cfg = ConfigBuilder::new();
    if let Err(e) = log_cfg.set_time_offset_to_local() {
        eprintln!("WARNING: could not set log TZ to local: {e:?}");
    };
    log_cfg.set_time_format_custom(format_description!(
        version = 2,
        "[hour]:[minute]:[second].[subsecond digits:4]"
    ));
    CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Info,
        log_cfg.build(),
        TerminalMode::Stderr,
        ColorChoice::AlwaysAnsi,
    )])
    .expect("logger can init");
}

/// Parse CLI arguments
fn cli_init_fsim() -> Result<(PathBuf, Vec<PathBuf>, Option<String>)> {
    let args = Args::parse();
    let cfg_paths = args.cfg.unwrap_or_else(default_cfg);
    let sim_paths = args.sim.unwrap_or_else(default_sim);

    log::info!(
        "chordtap_simulated_input v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let Some(config_file) = cfg_paths.first() else {
        bail!("No config files provided\nFor more info, pass the `-h` or `--help` flags.");
    };
    if !config_file.exists() {
        bail!(
            "Could not find the config file ({})\nFor more info, pass the `-h` or `--help` flags.",
            config_file.to_str().unwrap_or("?")
        )
    }
    if let Some(config_sim_file) = sim_paths.first() {
        if !config_sim_file.exists() {
            bail!(
                "Could not find the simulation file ({})\nFor more info, pass the `-h` or `--help` flags.",
                config_sim_file.to_str().unwrap_or("?")
            )
        }
    } else {
        bail!("No simulation files provided\nFor more info, pass the `-h` or `--help` flags.");
    }

    Ok((config_file.clone(), sim_paths, args.out))
}

fn main_impl() -> Result<()> {
    log_init();
    let (cfg_path, sim_paths, sim_appendix) = cli_init_fsim()?;
    let cfg = match cfg::new_from_file(&cfg_path) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            log::error!("{e:?}");
            bail!("failed to parse file");
        }
    };

    for config_sim_file in &sim_paths {
        let mut k = Chordtap::new_with_output(cfg.clone(), SimOut::new());
        let mut clock = SimClock::new();
        let mut transcript = Vec::new();
        log::info!("Evaluating simulation file = {:?}", config_sim_file);
        let s = std::fs::read_to_string(config_sim_file)?;
        for l in s.lines() {
            for item in l.split_whitespace() {
                match parse_sim_item(item).map_err(|e| anyhow!("{e} in line: {l}"))? {
                    SimItem::Tick(ms) => clock.advance_ms(ms),
                    SimItem::Msg(msg) => {
                        let already = k.out.outputs.len();
                        let repeating = k.handle_message(msg, clock.now()).repeating;
                        transcript.push(format!(
                            "t:{}ms in:{:#06x}{}",
                            clock.elapsed_ms(),
                            msg.0,
                            if repeating { " (repeat)" } else { "" }
                        ));
                        transcript.extend(k.out.outputs[already..].iter().cloned());
                    }
                }
            }
        }
        let result = transcript.join("\n");
        println!("{result}");
        if let Some(appendix) = &sim_appendix {
            let mut out_path = config_sim_file.clone().into_os_string();
            out_path.push(appendix);
            std::fs::write(&out_path, format!("{result}\n"))?;
            log::info!("Saved the output to {:?}", out_path);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let ret = main_impl();
    if let Err(ref e) = ret {
        log::error!("{e}\n");
    }
    ret
}
