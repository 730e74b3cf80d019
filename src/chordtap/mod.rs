//! Implements the glue between the chord message stream, the decoder and the console.

use anyhow::{bail, Result};
use log::info;
use parking_lot::Mutex;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::JoinHandle;
use web_time::Instant;

use chordtap_parser::cfg::{self, Cfg};

use crate::oskbd::*;

mod cmd;

mod decoder;
pub use decoder::*;

mod dispatch;
pub use dispatch::*;

#[cfg(target_os = "linux")]
mod linux;

/// Outcome of [`Chordtap::handle_message`].
#[derive(Debug, Default)]
pub struct Handled {
    /// Whether the decoder is in its double-tap/hold state.
    pub repeating: bool,
    /// Set when the action fired by this message failed. Already logged.
    pub failure: Option<ActionError>,
}

/// A device message and the time it was read.
pub type TimedMessage = (ChordMessage, Instant);

pub struct Chordtap<O: OutputDevice> {
    /// Handle to the console that actions are typed into.
    pub out: O,
    /// Action tables and function bindings. Read-only once loaded.
    pub cfg: Arc<Cfg>,
    /// Decoder state for the one device stream this instance serves.
    pub decoder: DecoderState,
}

impl<O: OutputDevice> Chordtap<O> {
    pub fn new_with_output(cfg: Arc<Cfg>, out: O) -> Self {
        Self {
            out,
            cfg,
            decoder: DecoderState::new(Instant::now()),
        }
    }

    pub fn new_from_str(cfg_text: &str, out: O) -> Result<Self> {
        let cfg = match cfg::new_from_str(cfg_text) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{e:?}");
                bail!("failed to parse config");
            }
        };
        Ok(Self::new_with_output(Arc::new(cfg), out))
    }

    /// Decode one device message received at `now` and perform the action it completes, if any.
    ///
    /// A message whose modifier combination has no table is ignored and reports not repeating.
    /// A failed action does not change what the decoder reports. Must be called for every
    /// message in arrival order; hold-to-repeat advances only as messages arrive.
    pub fn handle_message(&mut self, msg: ChordMessage, now: Instant) -> Handled {
        let Some(table) = self.cfg.tables.table_for_bits(msg.mod_bits()) else {
            log::debug!(
                "no table for modifier bits {:#06x}, ignoring {msg:?}",
                msg.mod_bits()
            );
            return Handled::default();
        };
        let step = self.decoder.step(msg.code(), now);
        log::trace!("{msg:?} -> {step:?}");
        let mut failure = None;
        if let Some(code) = step.fire {
            match table.get(code) {
                Some(action) => {
                    log::debug!("chord {code:#04x} fired {action:?}");
                    failure = dispatch(action, &self.cfg.functions, &mut self.out).err();
                }
                None => log::debug!("chord {code:#04x} fired but has no action"),
            }
        }
        Handled {
            repeating: step.repeating,
            failure,
        }
    }
}

impl<O: OutputDevice + Send + 'static> Chordtap<O> {
    /// Handle messages from `rx` on a new thread until the sending side hangs up.
    pub fn start_processing_loop(
        chordtap: Arc<Mutex<Self>>,
        rx: Receiver<TimedMessage>,
    ) -> JoinHandle<()> {
        info!("entering the processing loop");
        std::thread::spawn(move || {
            for (msg, at) in rx.iter() {
                let mut k = chordtap.lock();
                // Failures were logged by the dispatcher and do not stop decoding.
                k.handle_message(msg, at);
            }
            info!("message channel closed, leaving the processing loop");
        })
    }
}

#[cfg(target_os = "linux")]
impl Chordtap<ConsoleOut> {
    pub fn new(args: &crate::ValidatedArgs) -> Result<Self> {
        let cfg = match cfg::new_from_file(&args.paths[0]) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{e:?}");
                bail!("failed to parse file");
            }
        };
        let out = match ConsoleOut::new(&args.console_path) {
            Ok(out) => out,
            Err(err) => {
                log::error!(
                    "Failed to open the console {}. Typing into the console needs root.",
                    args.console_path.display()
                );
                bail!(err)
            }
        };
        Ok(Self::new_with_output(Arc::new(cfg), out))
    }

    pub fn new_arc(args: &crate::ValidatedArgs) -> Result<Arc<Mutex<Self>>> {
        Ok(Arc::new(Mutex::new(Self::new(args)?)))
    }
}
