use std::path::PathBuf;
use std::process::{Command, Stdio};

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/loam/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(temp_dir)
            .join(".local")
            .join("share")
            .join("loam")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(temp_dir)
            .join("loam")
    }
}

pub fn config_dir() -> PathBuf {
    // On macOS and Linux, always use ~/.config/loam/
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("loam")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("loam")
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Program and arguments used to hand a URL to the desktop.
pub fn open_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else if cfg!(windows) {
        (
            "rundll32",
            vec!["url.dll,FileProtocolHandler".to_string(), url.to_string()],
        )
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

/// Open `url` in the system browser. The child is spawned detached and never
/// awaited; only a failure to spawn is reported.
pub fn open_url(url: &str) -> std::io::Result<()> {
    let (program, args) = open_command(url);
    Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_command_passes_url_last() {
        let (program, args) = open_command("https://example.org/m1");
        assert!(!program.is_empty());
        assert_eq!(args.last().map(String::as_str), Some("https://example.org/m1"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn linux_uses_xdg_open() {
        assert_eq!(open_command("x").0, "xdg-open");
    }
}
