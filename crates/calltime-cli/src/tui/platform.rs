//! Hand links to the host: the system opener when there is one, the clipboard otherwise.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// How a link reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Opened,
    Copied,
}

#[cfg(target_os = "macos")]
fn opener(url: &str) -> io::Result<Command> {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    Ok(cmd)
}

#[cfg(windows)]
fn opener(url: &str) -> io::Result<Command> {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    Ok(cmd)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn opener(url: &str) -> io::Result<Command> {
    let has_display = ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()));
    if !has_display {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "no graphical session",
        ));
    }
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    Ok(cmd)
}

/// Open `url` with the platform's default handler without waiting for it.
pub fn open_url(url: &str) -> io::Result<()> {
    opener(url)?
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

/// OSC 52 "set clipboard" sequence for `text`.
pub fn osc52(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

pub fn copy_to_clipboard(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(osc52(text).as_bytes())?;
    out.flush()
}

/// Open `url`, or copy it to the clipboard when no opener is available.
pub fn deliver_link(out: &mut impl Write, url: &str) -> io::Result<Delivery> {
    match open_url(url) {
        Ok(()) => {
            tracing::info!(url, "link opened");
            Ok(Delivery::Opened)
        }
        Err(e) => {
            tracing::debug!(error = %e, "opener unavailable, copying link instead");
            copy_to_clipboard(out, url)?;
            Ok(Delivery::Copied)
        }
    }
}
