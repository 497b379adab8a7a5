use std::io;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// A command line bound to the launch key, plus how it is run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Launch {
    pub command: String,
    /// Run in the foreground with the terminal handed over, instead of in
    /// the background with its output discarded.
    pub in_terminal: bool,
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("launch command is empty")]
    Empty,
    #[error("could not start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Whether `name` resolves on `PATH`.
pub fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// The task manager to open when none is configured: `htop` if installed,
/// `top` otherwise.
pub fn default_command() -> Launch {
    default_command_with(command_exists)
}

pub fn default_command_with(exists: impl Fn(&str) -> bool) -> Launch {
    let command = if exists("htop") { "htop" } else { "top" };
    Launch {
        command: command.to_string(),
        in_terminal: true,
    }
}

/// The configured command, or the default task manager when it is blank.
pub fn resolve(configured: &str, in_terminal: bool) -> Launch {
    resolve_with(configured, in_terminal, command_exists)
}

pub fn resolve_with(configured: &str, in_terminal: bool, exists: impl Fn(&str) -> bool) -> Launch {
    let command = configured.trim();
    if command.is_empty() {
        return default_command_with(exists);
    }
    Launch {
        command: command.to_string(),
        in_terminal,
    }
}

fn shell(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Runs the command attached to the current terminal and waits for it.
pub fn run_foreground(launch: &Launch) -> Result<ExitStatus, LaunchError> {
    if launch.command.trim().is_empty() {
        return Err(LaunchError::Empty);
    }
    shell(&launch.command)
        .status()
        .map_err(|source| LaunchError::Spawn {
            command: launch.command.clone(),
            source,
        })
}

/// Starts the command without waiting, detached from the terminal.
pub fn spawn_detached(launch: &Launch) -> Result<(), LaunchError> {
    if launch.command.trim().is_empty() {
        return Err(LaunchError::Empty);
    }
    shell(&launch.command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|source| LaunchError::Spawn {
            command: launch.command.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_command_falls_back_to_a_task_manager() {
        let with_htop = resolve_with("   ", false, |name| name == "htop");
        assert_eq!(
            with_htop,
            Launch {
                command: "htop".to_string(),
                in_terminal: true
            }
        );
        let without = resolve_with("", false, |_| false);
        assert_eq!(without.command, "top");
        assert!(without.in_terminal);
    }

    #[test]
    fn configured_command_is_trimmed_and_kept() {
        let launch = resolve_with("  btop --utf-force ", false, |_| true);
        assert_eq!(launch.command, "btop --utf-force");
        assert!(!launch.in_terminal);
    }

    #[test]
    fn empty_launch_is_refused() {
        let launch = Launch {
            command: " ".to_string(),
            in_terminal: true,
        };
        assert!(matches!(run_foreground(&launch), Err(LaunchError::Empty)));
        assert!(matches!(spawn_detached(&launch), Err(LaunchError::Empty)));
    }

    #[cfg(unix)]
    #[test]
    fn foreground_command_reports_its_exit_status() {
        let launch = Launch {
            command: "exit 3".to_string(),
            in_terminal: true,
        };
        assert_eq!(run_foreground(&launch).unwrap().code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn detached_command_starts() {
        let launch = Launch {
            command: "true".to_string(),
            in_terminal: false,
        };
        assert!(spawn_detached(&launch).is_ok());
    }
}
