//! Platform specific code for reading chord messages and writing to the console.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::*;

mod simulated;
pub use simulated::*;

use std::io;

use chordtap_parser::tables::ModBits;

// local log prefix
const LP: &str = "chord-in:";

// ------------------ ChordMessage --------------------

/// One message from the chorded keyboard: the chord code in the low byte and the modifier bits
/// above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordMessage(pub u32);

impl ChordMessage {
    pub fn new(mods: ModBits, code: u8) -> Self {
        Self(mods.bits() | u32::from(code))
    }

    pub fn code(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Everything except the chord code. Not masked to the known modifiers.
    pub fn mod_bits(self) -> u32 {
        self.0 & !0xff
    }
}

// ------------------ Output traits --------------------

/// The console a resolved action is typed into.
pub trait ConsoleDevice {
    /// Queue one byte in the console's input as if it had been typed.
    fn inject_byte(&mut self, b: u8) -> io::Result<()>;
    /// Ask the console to unblank the display.
    fn unblank(&mut self) -> io::Result<()>;
    /// Switch to virtual console number `n`.
    fn activate_console(&mut self, n: u16) -> io::Result<()>;
}

pub trait ProcessSpawner {
    /// Start `command` through the shell without waiting for it to finish. Returns the pid.
    fn spawn_shell(&mut self, command: &str) -> io::Result<u32>;
}

/// Everything an action can touch.
pub trait OutputDevice: ConsoleDevice + ProcessSpawner {}

impl<T: ConsoleDevice + ProcessSpawner> OutputDevice for T {}

// ------------------ Packet framing --------------------

pub const PACKET_LEN: usize = 5;

/// Reassembles device packets into [`ChordMessage`]s.
///
/// A packet is five bytes. The first has bit 7 clear and the rest have it set. Byte `i`
/// contributes its low seven bits at bit offset `7 * i`.
#[derive(Debug, Default)]
pub struct PacketAssembler {
    buf: [u8; PACKET_LEN],
    len: usize,
}

impl PacketAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a message once a packet completes.
    pub fn push(&mut self, byte: u8) -> Option<ChordMessage> {
        if byte & 0x80 == 0 {
            if self.len != 0 {
                log::debug!("{LP} resync, dropping {} byte partial packet", self.len);
            }
            self.buf[0] = byte;
            self.len = 1;
            return None;
        }
        if self.len == 0 {
            log::debug!("{LP} resync, skipping {byte:#04x} outside of a packet");
            return None;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < PACKET_LEN {
            return None;
        }
        self.len = 0;
        // The high bits of the last byte fall off the end of the u32; they carry nothing.
        let msg = self
            .buf
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, b)| acc | (u32::from(b & 0x7f) << (7 * i)));
        log::trace!("{LP} packet {:02x?} -> {msg:#x}", self.buf);
        Some(ChordMessage(msg))
    }
}
