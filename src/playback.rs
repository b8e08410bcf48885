
use std::io::{self, Write};
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::config::DEFAULT_PLAY_COMMAND;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    program: String,
    args: Vec<String>,
}

impl Default for Player {
    fn default() -> Self {
        let mut parts = DEFAULT_PLAY_COMMAND.split_whitespace();
        let program = parts.next().unwrap_or("aplay");
        Self::new(program, parts)
    }
}

impl Player {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn play(&self, stream: &[u8]) -> Result<()> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        log::debug!("Spawned {} (pid {}) for {} bytes", self.program, child.id(), stream.len());

        let mut guard = ChildGuard::new(child);
        if let Some(mut stdin) = guard.child.stdin.take() {
            match stdin.write_all(stream).and_then(|_| stdin.flush()) {
                Ok(()) => {},
                // Player closed its stdin early; its exit status decides.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    log::debug!("{} stopped reading before the end of the stream", self.program);
                },
                Err(e) => return Err(e.into()),
            }
        }
        let status = guard.wait()?;
        log::debug!("{} exited with {}", self.program, status);

        if status.success() {
            Ok(())
        } else {
            Err(Error::PlaybackExit(status))
        }
    }
}

struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self { child, reaped: false }
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        drop(self.child.stdin.take());
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        drop(self.child.stdin.take());
        if let Err(e) = self.child.kill() {
            log::debug!("Failed to kill playback process: {}", e);
        }
        if let Err(e) = self.child.wait() {
            log::warn!("Failed to reap playback process: {}", e);
        }
    }
}
