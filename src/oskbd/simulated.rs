//! Output that just records text instead of actually doing anything OS-related.

use std::io;

use chordtap_parser::tables::resolve_modifier_keyword;
use web_time::{Duration, Instant};

use super::*;

/// Records every console request as a line in `outputs`:
/// `out:<byte>`, `unblank`, `vt:<n>` and `exec:<command>`.
#[derive(Debug, Default)]
pub struct SimOut {
    pub outputs: Vec<String>,
    /// When `Some(n)`, the byte injection after `n` more successful ones fails.
    pub fail_inject_after: Option<usize>,
    /// Make console switches fail.
    pub fail_console_switch: bool,
    /// Make shell spawns fail.
    pub fail_spawn: bool,
    next_pid: u32,
}

impl SimOut {
    pub fn new() -> Self {
        Self {
            next_pid: 1000,
            ..Default::default()
        }
    }
}

impl ConsoleDevice for SimOut {
    fn inject_byte(&mut self, b: u8) -> io::Result<()> {
        if let Some(n) = self.fail_inject_after.as_mut() {
            if *n == 0 {
                self.outputs.push(format!("out-err:{}", b.escape_ascii()));
                return Err(io::Error::other("simulated injection failure"));
            }
            *n -= 1;
        }
        self.outputs.push(format!("out:{}", b.escape_ascii()));
        Ok(())
    }

    fn unblank(&mut self) -> io::Result<()> {
        self.outputs.push("unblank".into());
        Ok(())
    }

    fn activate_console(&mut self, n: u16) -> io::Result<()> {
        if self.fail_console_switch {
            return Err(io::Error::other("simulated console switch failure"));
        }
        self.outputs.push(format!("vt:{n}"));
        Ok(())
    }
}

impl ProcessSpawner for SimOut {
    fn spawn_shell(&mut self, command: &str) -> io::Result<u32> {
        if self.fail_spawn {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "simulated spawn failure",
            ));
        }
        self.outputs.push(format!("exec:{command}"));
        self.next_pid += 1;
        Ok(self.next_pid)
    }
}

// ------------------ Simulation scripts --------------------

/// A monotonic clock that only moves when told to.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    start: Instant,
    elapsed_ms: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed_ms: 0,
        }
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.elapsed_ms += ms;
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn now(&self) -> Instant {
        self.start + Duration::from_millis(self.elapsed_ms)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

/// One whitespace separated item of a simulation script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimItem {
    /// `t:<ms>`: let time pass.
    Tick(u64),
    /// `c:[<modifier>:]<hex code>` or `m:<hex message>`: a device message arrives.
    Msg(ChordMessage),
}

/// Parse one simulation script item, e.g. `t:120`, `c:03`, `c:shift:0x03` or `m:0x0903`.
pub fn parse_sim_item(item: &str) -> Result<SimItem, String> {
    let (kind, val) = item
        .split_once(':')
        .ok_or_else(|| format!("invalid item {item}"))?;
    match kind {
        "t" => val
            .parse::<u64>()
            .map(SimItem::Tick)
            .map_err(|_| format!("invalid tick in {item}")),
        "c" => parse_sim_chord(val)
            .map(SimItem::Msg)
            .ok_or_else(|| format!("invalid chord in {item}")),
        "m" => parse_hex(val)
            .map(|raw| SimItem::Msg(ChordMessage(raw)))
            .ok_or_else(|| format!("invalid message in {item}")),
        _ => Err(format!("invalid item {item}")),
    }
}

fn parse_sim_chord(val: &str) -> Option<ChordMessage> {
    let (mods, code) = match val.rsplit_once(':') {
        Some((keyword, code)) => {
            if keyword.is_empty() {
                return None;
            }
            (resolve_modifier_keyword(keyword)?.bits(), code)
        }
        None => (ModBits::empty(), val),
    };
    let code = u8::try_from(parse_hex(code)?).ok()?;
    Some(ChordMessage::new(mods, code))
}

fn parse_hex(s: &str) -> Option<u32> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).ok()
}
