//! Contains the input/output code for the chord keyboard and the console on Linux.

use nix::sys::termios::{cfmakeraw, cfsetspeed, tcgetattr, tcsetattr, BaudRate, SetArg};

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::*;

const TIOCSTI: u32 = 0x5412;
const TIOCLINUX: u32 = 0x541C;
const VT_ACTIVATE: u32 = 0x5606;
const TIOCL_UNBLANKSCREEN: u8 = 4;

nix::ioctl_write_ptr_bad!(tiocsti, TIOCSTI, u8);
nix::ioctl_write_ptr_bad!(tioclinux, TIOCLINUX, u8);
nix::ioctl_write_int_bad!(vt_activate, VT_ACTIVATE);

/// Handle for reading chord messages from the keyboard's serial line.
pub struct MsgIn {
    device: File,
    assembler: PacketAssembler,
    buf: [u8; 64],
}

impl MsgIn {
    pub fn new(dev_path: &Path) -> Result<Self, io::Error> {
        match MsgIn::new_linux(dev_path) {
            Ok(s) => Ok(s),
            Err(e) => {
                log::error!(
                    "Failed to open the chord keyboard at {}. Make sure the user running chordtap \
                     can read it, usually via the `dialout` group. E: {}",
                    dev_path.display(),
                    e
                );
                Err(e)
            }
        }
    }

    fn new_linux(dev_path: &Path) -> Result<Self, io::Error> {
        let device = OpenOptions::new().read(true).open(dev_path)?;
        if let Err(e) = set_raw_2400_baud(&device) {
            // Pipes and pre-configured devices are still readable.
            log::warn!(
                "could not configure {} as a serial line, reading it as is: {e}",
                dev_path.display()
            );
        }
        Ok(MsgIn {
            device,
            assembler: PacketAssembler::new(),
            buf: [0; 64],
        })
    }

    /// Block until at least one complete message has arrived.
    pub fn read(&mut self) -> Result<Vec<ChordMessage>, io::Error> {
        loop {
            let n = self.device.read(&mut self.buf)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "chord keyboard device was closed",
                ));
            }
            let messages: Vec<ChordMessage> = self.buf[..n]
                .iter()
                .filter_map(|b| self.assembler.push(*b))
                .collect();
            if !messages.is_empty() {
                return Ok(messages);
            }
        }
    }
}

fn set_raw_2400_baud(device: &File) -> nix::Result<()> {
    let fd = device.as_raw_fd();
    let mut termios = tcgetattr(fd)?;
    cfmakeraw(&mut termios);
    cfsetspeed(&mut termios, BaudRate::B2400)?;
    tcsetattr(fd, SetArg::TCSANOW, &termios)
}

/// Handle for typing into the Linux console and running commands on it.
pub struct ConsoleOut {
    console: File,
    console_path: PathBuf,
}

impl ConsoleOut {
    pub fn new(console_path: &Path) -> Result<Self, io::Error> {
        let console = OpenOptions::new().write(true).open(console_path)?;
        log::info!("Opened console {}", console_path.display());
        Ok(ConsoleOut {
            console,
            console_path: console_path.to_path_buf(),
        })
    }
}

impl ConsoleDevice for ConsoleOut {
    fn inject_byte(&mut self, b: u8) -> io::Result<()> {
        // SAFETY: the fd is open for the lifetime of `self` and the pointer is to a live byte.
        unsafe { tiocsti(self.console.as_raw_fd(), &b) }?;
        Ok(())
    }

    fn unblank(&mut self) -> io::Result<()> {
        let subcode = TIOCL_UNBLANKSCREEN;
        // SAFETY: as above; TIOCLINUX reads only the subcode byte for this request.
        unsafe { tioclinux(self.console.as_raw_fd(), &subcode) }?;
        Ok(())
    }

    fn activate_console(&mut self, n: u16) -> io::Result<()> {
        // SAFETY: VT_ACTIVATE takes the console number by value.
        unsafe { vt_activate(self.console.as_raw_fd(), n.into()) }?;
        Ok(())
    }
}

impl ProcessSpawner for ConsoleOut {
    fn spawn_shell(&mut self, command: &str) -> io::Result<u32> {
        let stdout = OpenOptions::new().write(true).open(&self.console_path)?;
        let stderr = stdout.try_clone()?;
        let stdin = File::open("/dev/null")?;
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()?;
        let pid = child.id();
        // Reap the child so it does not linger as a zombie; nobody waits on the result.
        std::thread::spawn(move || match child.wait() {
            Ok(status) => log::debug!("shell pid {pid} exited with {status}"),
            Err(e) => log::warn!("failed to wait for shell pid {pid}: {e}"),
        });
        Ok(pid)
    }
}
