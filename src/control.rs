//! Line-oriented control console.
//!
//! Reads `name value` pairs from stdin and applies them to a
//! [`SharedConfig`]. Changes show up on the next tick.
//!
//! ```text
//! friction 0.85
//! max_particles 400   # trailing comments are ignored
//! show
//! quit
//! ```

use crate::config::{Param, SharedConfig};
use crate::error::ConfigError;
use crate::input::ExitSignal;
use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

/// What a single console line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set a parameter to a value.
    Set { name: String, value: f32 },
    /// Log the current configuration.
    Show,
    /// Stop the overlay.
    Quit,
}

/// Parse one console line. Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ConfigError> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("show"), None, None) => Ok(Some(Command::Show)),
        (Some("quit" | "exit"), None, None) => Ok(Some(Command::Quit)),
        (Some(name), Some(value), None) => {
            let value = value
                .parse::<f32>()
                .map_err(|_| ConfigError::Malformed(line.to_string()))?;
            Ok(Some(Command::Set {
                name: name.to_string(),
                value,
            }))
        }
        _ => Err(ConfigError::Malformed(line.to_string())),
    }
}

/// Apply one console line to `config`, raising `exit` on `quit`.
pub fn apply_line(config: &SharedConfig, exit: &ExitSignal, line: &str) -> Result<(), ConfigError> {
    match parse_line(line)? {
        None => {}
        Some(Command::Quit) => {
            log::info!("quit requested from console");
            exit.raise();
        }
        Some(Command::Show) => {
            let current = config.snapshot();
            for param in Param::ALL {
                log::info!("{param} = {}", current.get(param));
            }
        }
        Some(Command::Set { name, value }) => {
            let applied = config.set_parameter(&name, value)?;
            log::info!("{name} set to {applied}");
        }
    }
    Ok(())
}

/// Feed every line of `reader` into `config` until EOF or `quit`.
pub fn run<R: BufRead>(config: &SharedConfig, exit: &ExitSignal, reader: R) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if let Err(e) = apply_line(config, exit, &line) {
                    log::warn!("{e}");
                }
                if exit.is_raised() {
                    break;
                }
            }
            Err(e) => {
                log::warn!("control input closed: {e}");
                break;
            }
        }
    }
    log::debug!("control console finished");
}

/// Start a background thread reading commands from stdin.
pub fn spawn_stdin(config: SharedConfig, exit: ExitSignal) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("control-console".into())
        .spawn(move || run(&config, &exit, io::stdin().lock()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_line("friction 0.8").unwrap(),
            Some(Command::Set {
                name: "friction".into(),
                value: 0.8
            })
        );
    }

    #[test]
    fn test_parse_blank_and_comments() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # just a note").unwrap(), None);
        assert_eq!(parse_line("show # dump").unwrap(), Some(Command::Show));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_line("friction"), Err(ConfigError::Malformed(_))));
        assert!(matches!(parse_line("friction fast"), Err(ConfigError::Malformed(_))));
        assert!(matches!(parse_line("a 1 2"), Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_run_applies_good_lines_and_skips_bad() {
        let config = SharedConfig::default();
        let exit = ExitSignal::new();
        let script = "gen_rate 4\nbogus 1\nfriction nope\nline_spacing 30\n";
        run(&config, &exit, Cursor::new(script));
        assert!(!exit.is_raised());

        let current = config.snapshot();
        assert_eq!(current.gen_rate, 4.0);
        assert_eq!(current.line_spacing, 30.0);
        assert_eq!(current.friction, 0.92);
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(parse_line("quit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_line("  exit  # bye").unwrap(), Some(Command::Quit));
        assert!(matches!(parse_line("quit now"), Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_quit_raises_exit_and_stops_reading() {
        let config = SharedConfig::default();
        let exit = ExitSignal::new();
        run(&config, &exit, Cursor::new("gen_rate 3\nquit\ngen_rate 9\n"));

        assert!(exit.is_raised());
        assert_eq!(config.snapshot().gen_rate, 3.0);
    }
}
