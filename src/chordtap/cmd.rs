//! The built-in functions an action can invoke.

use super::ActionError;
use crate::oskbd::{ConsoleDevice, ProcessSpawner};

// local log prefix
const LP: &str = "cmd:";

/// Switch to the virtual console numbered by the leading digits of `arg`, so `2` and `2nd` both
/// pick console 2. Zero, a sign, or no leading number does nothing.
pub(super) fn console_switch(arg: &str, out: &mut impl ConsoleDevice) -> Result<(), ActionError> {
    let console = match leading_number(arg) {
        Some(0) | None => {
            log::debug!("{LP} `{arg}` is not a virtual console number, ignoring");
            return Ok(());
        }
        Some(n) => n,
    };
    log::info!("{LP} switching to virtual console {console}");
    out.activate_console(console)
        .map_err(|source| ActionError::ConsoleSwitch { console, source })
}

fn leading_number(arg: &str) -> Option<u16> {
    let arg = arg.trim_start();
    let arg = arg.strip_prefix('+').unwrap_or(arg);
    let end = arg
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(arg.len());
    arg[..end].parse().ok()
}

/// Start `command` through the shell and return without waiting for it.
pub(super) fn shell_exec(command: &str, out: &mut impl ProcessSpawner) -> Result<(), ActionError> {
    log::info!("{LP} running `{command}`");
    let pid = out
        .spawn_shell(command)
        .map_err(|source| ActionError::Spawn {
            command: command.to_string(),
            source,
        })?;
    log::debug!("{LP} `{command}` started as pid {pid}");
    Ok(())
}
