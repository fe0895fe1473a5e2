//! External open action
//!
//! URLs come from the generation service, which is trusted; no scheme or
//! host checks happen here.

use std::process::{Command, Stdio};

use super::InteractionError;

pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<(), InteractionError>;
}

/// Opens URLs with the platform's default handler
///
/// The handler is spawned with no stdio, so the browser gets no handle back
/// to this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), InteractionError> {
        spawn_detached(open_command(url))
            .map_err(|e| InteractionError::Open(format!("{}: {}", url, e)))
    }
}

/// Spawn `command` and reap it on a background thread
fn spawn_detached(mut command: Command) -> std::io::Result<()> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            tracing::debug!("Failed to reap opener process: {}", e);
        }
    });
    Ok(())
}

#[cfg(target_os = "macos")]
fn open_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

// `cmd /C start` would split the URL on `&`
#[cfg(target_os = "windows")]
fn open_command(url: &str) -> Command {
    let mut command = Command::new("rundll32");
    command.args(["url.dll,FileProtocolHandler", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

/// Opener that records URLs instead of launching anything
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingOpener {
    pub opened: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), InteractionError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_command_passes_url_last() {
        let command = open_command("https://unsplash.com/s/photos/forest");
        let last = command.get_args().last().unwrap();
        assert_eq!(last, "https://unsplash.com/s/photos/forest");
    }

    #[test]
    fn test_open_command_keeps_query_string_whole() {
        let url = "https://www.shutterstock.com/search/cats-&-dogs";
        let command = open_command(url);
        let last = command.get_args().last().unwrap();
        assert_eq!(last, url);
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_detached_runs_program() {
        assert!(spawn_detached(Command::new("true")).is_ok());
        // Give the reaper thread time to collect the exit status
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_detached_missing_program() {
        let err = spawn_detached(Command::new("stockq-no-such-opener")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_recording_opener() {
        let opener = RecordingOpener::default();
        opener.open("https://example.com/a").unwrap();
        assert_eq!(opener.opened.borrow().as_slice(), ["https://example.com/a"]);
    }
}
