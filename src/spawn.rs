//! Launching commands detached from the window manager.

use crate::errors::WmResult;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{Pid, setsid};
use std::os::unix::process::CommandExt;
use std::process::Command;
use tracing::{debug, info, warn};

/// Replaced by the index of the selected monitor.
pub const MONITOR_TOKEN: &str = "{monitor}";

pub fn command_line(argv: &[String], monitor: usize) -> Vec<String> {
    let monitor = monitor.to_string();
    argv.iter()
        .map(|arg| arg.replace(MONITOR_TOKEN, &monitor))
        .collect()
}

/// Start `argv` in its own session. Failures are logged and otherwise
/// ignored.
pub fn spawn(argv: &[String], monitor: usize) {
    let argv = command_line(argv, monitor);
    let Some((program, args)) = argv.split_first() else {
        return;
    };

    let mut command = Command::new(program);
    command.args(args);
    // SAFETY: only async-signal-safe calls run between fork and exec.
    unsafe {
        command.pre_exec(|| {
            setsid()?;
            let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
            sigaction(Signal::SIGCHLD, &default)?;
            Ok(())
        });
    }

    match command.spawn() {
        Ok(child) => debug!(pid = child.id(), ?argv, "spawned"),
        Err(error) => warn!(%error, ?argv, "failed to spawn"),
    }
}

/// Let the kernel reap children so that spawned commands never linger as
/// zombies, and collect any that already exited.
pub fn ignore_children() -> WmResult<()> {
    let action = SigAction::new(
        SigHandler::SigIgn,
        SaFlags::SA_NOCLDSTOP | SaFlags::SA_NOCLDWAIT | SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    // SAFETY: no handler function is installed.
    unsafe { sigaction(Signal::SIGCHLD, &action) }.map_err(std::io::Error::from)?;

    while let Ok(status) = waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
        if status == WaitStatus::StillAlive {
            break;
        }
    }
    Ok(())
}

pub fn autostart(commands: &[Vec<String>]) {
    if commands.is_empty() {
        return;
    }
    info!(count = commands.len(), "running autostart commands");
    for argv in commands {
        spawn(argv, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test_case(&["dmenu_run", "-m", "{monitor}"], 2, &["dmenu_run", "-m", "2"]; "whole argument")]
    #[test_case(&["rofi", "-monitor={monitor}"], 0, &["rofi", "-monitor=0"]; "inside an argument")]
    #[test_case(&["kitty"], 1, &["kitty"]; "no token")]
    #[test]
    fn monitor_token_is_substituted(input: &[&str], monitor: usize, expected: &[&str]) {
        assert_eq!(command_line(&argv(input), monitor), argv(expected));
    }
}
