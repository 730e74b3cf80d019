use chordtap_parser::cfg::*;
use chordtap_parser::tables::ModSelector;

mod sim_tests;

fn init_log() {
    use simplelog::*;
    use std::sync::OnceLock;
    static LOG_INIT: OnceLock<()> = OnceLock::new();
    LOG_INIT.get_or_init(|| {
        let mut log_cfg = ConfigBuilder::new();
        if let Err(e) = log_cfg.set_time_offset_to_local() {
            eprintln!("WARNING: could not set log TZ to local: {e:?}");
        };
        log_cfg.set_time_format_rfc3339();
        CombinedLogger::init(vec![TermLogger::new(
            // Note: set to a different level to see logs in tests.
            LevelFilter::Off,
            log_cfg.build(),
            TerminalMode::Stderr,
            ColorChoice::AlwaysAnsi,
        )])
        .expect("logger can init");
    });
}

#[test]
fn parse_sample_cfg() {
    init_log();
    let cfg = new_from_file(&std::path::PathBuf::from("./cfg_samples/chordtap.conf")).unwrap();
    assert_eq!(cfg.functions.len(), 4);
    for sel in ModSelector::ALL {
        assert!(cfg.tables.table(sel).populated() > 0, "{sel:?} is empty");
    }
}

#[test]
fn missing_cfg_file_is_an_error() {
    init_log();
    let e = new_from_file(&std::path::PathBuf::from("./cfg_samples/does-not-exist.conf"))
        .unwrap_err();
    assert_eq!(e.to_string(), "Error in configuration file");
}
