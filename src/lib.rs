use std::path::PathBuf;

pub mod chordtap;
pub mod oskbd;

pub use chordtap::*;

type CfgPath = PathBuf;

pub const DEFAULT_DEVICE: &str = "/dev/ttyS0";
pub const DEFAULT_CONSOLE: &str = "/dev/tty0";

pub struct ValidatedArgs {
    pub paths: Vec<CfgPath>,
    /// Serial device the chorded keyboard is attached to.
    pub device_path: PathBuf,
    /// Console that actions are typed into.
    pub console_path: PathBuf,
}

pub fn default_cfg() -> Vec<PathBuf> {
    let mut cfgs = Vec::new();

    let default = PathBuf::from("chordtap.conf");
    if default.is_file() {
        cfgs.push(default);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let fallback = config_dir.join("chordtap").join("chordtap.conf");
        if fallback.is_file() {
            cfgs.push(fallback);
        }
    }

    let system = PathBuf::from("/etc/chordtap.conf");
    if system.is_file() {
        cfgs.push(system);
    }

    cfgs
}
