//! Performs a resolved action against the output device.

use std::io;

use chordtap_parser::action::Action;
use chordtap_parser::functions::{FnIndex, FnKind, FunctionRegistry};
use thiserror::Error;

use super::cmd::{console_switch, shell_exec};
use crate::oskbd::{ConsoleDevice, OutputDevice};

// local log prefix
const LP: &str = "dispatch:";

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("failed to inject byte {byte:#04x} into the console: {source}")]
    Injection { byte: u8, source: io::Error },
    #[error("failed to switch to virtual console {console}: {source}")]
    ConsoleSwitch { console: u16, source: io::Error },
    #[error("failed to run `{command}`: {source}")]
    Spawn { command: String, source: io::Error },
    #[error("no function is bound at index {0}")]
    UnboundFunction(u8),
}

/// Perform `action`, then unblank the display whatever the outcome.
///
/// Byte injection stops at the first byte that fails. Failures are logged here and returned.
pub fn dispatch<O: OutputDevice>(
    action: &Action,
    functions: &FunctionRegistry,
    out: &mut O,
) -> Result<(), ActionError> {
    let ret = match action {
        Action::Literal(b) => inject_bytes(std::slice::from_ref(b), out),
        Action::Text(bytes) => inject_bytes(bytes, out),
        Action::Invoke(idx) => invoke(*idx, functions, out),
    };
    if let Err(e) = out.unblank() {
        log::debug!("{LP} unblank failed: {e}");
    }
    if let Err(e) = &ret {
        log::error!("{LP} {e}");
    }
    ret
}

fn inject_bytes(bytes: &[u8], out: &mut impl ConsoleDevice) -> Result<(), ActionError> {
    for &byte in bytes {
        out.inject_byte(byte)
            .map_err(|source| ActionError::Injection { byte, source })?;
    }
    Ok(())
}

fn invoke<O: OutputDevice>(
    idx: FnIndex,
    functions: &FunctionRegistry,
    out: &mut O,
) -> Result<(), ActionError> {
    let bound = functions
        .get(idx)
        .ok_or(ActionError::UnboundFunction(idx.0))?;
    log::debug!("{LP} invoking {}({})", bound.kind.name(), bound.arg);
    match bound.kind {
        FnKind::Console => console_switch(&bound.arg, out),
        FnKind::Exec => shell_exec(&bound.arg, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oskbd::SimOut;

    #[test]
    fn text_injects_in_order_then_unblanks() {
        let mut out = SimOut::new();
        let action = Action::Text(b"ab".to_vec().into_boxed_slice());
        dispatch(&action, &FunctionRegistry::new(), &mut out).unwrap();
        assert_eq!(out.outputs, vec!["out:a", "out:b", "unblank"]);
    }

    #[test]
    fn injection_stops_at_first_failure_and_still_unblanks() {
        let mut out = SimOut::new();
        out.fail_inject_after = Some(1);
        let action = Action::Text(b"abc".to_vec().into_boxed_slice());
        let e = dispatch(&action, &FunctionRegistry::new(), &mut out).unwrap_err();
        assert!(matches!(e, ActionError::Injection { byte: b'b', .. }));
        assert_eq!(out.outputs, vec!["out:a", "out-err:b", "unblank"]);
    }

    #[test]
    fn invoke_runs_bound_functions() {
        let mut functions = FunctionRegistry::new();
        let vt = functions.register(FnKind::Console, "3").unwrap();
        let exec = functions.register(FnKind::Exec, "date").unwrap();
        let mut out = SimOut::new();
        dispatch(&Action::Invoke(vt), &functions, &mut out).unwrap();
        dispatch(&Action::Invoke(exec), &functions, &mut out).unwrap();
        assert_eq!(out.outputs, vec!["vt:3", "unblank", "exec:date", "unblank"]);
    }

    #[test]
    fn unbound_index_is_an_error() {
        let mut out = SimOut::new();
        let e = dispatch(&Action::Invoke(FnIndex(9)), &FunctionRegistry::new(), &mut out)
            .unwrap_err();
        assert!(matches!(e, ActionError::UnboundFunction(9)));
        assert_eq!(out.outputs, vec!["unblank"]);
    }
}
