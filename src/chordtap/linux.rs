use anyhow::{bail, Result};
use log::info;
use std::path::Path;
use std::sync::mpsc::SyncSender as Sender;
use web_time::Instant;

use super::*;

impl Chordtap<ConsoleOut> {
    /// Enter an infinite loop that reads chord messages from the device and sends them to the
    /// processing thread.
    pub fn event_loop(device_path: &Path, tx: Sender<TimedMessage>) -> Result<()> {
        info!("entering the event loop");
        let mut msg_in = match MsgIn::new(device_path) {
            Ok(msg_in) => msg_in,
            Err(e) => {
                bail!("failed to open chord keyboard device: {}", e)
            }
        };

        loop {
            let messages = msg_in.read()?;
            let now = Instant::now();
            log::trace!("{messages:?}");
            for msg in messages {
                if let Err(e) = tx.send((msg, now)) {
                    bail!("failed to send on channel: {}", e)
                }
            }
        }
    }
}
