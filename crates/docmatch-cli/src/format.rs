/// Color support detection for the diff output.
///
/// The decision is made once at startup and handed to the core as a
/// [`docmatch_core::Palette`].
use std::io::IsTerminal as _;

use docmatch_core::Palette;

/// The environment inputs that decide whether colors are used.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorEnv {
    /// `NO_COLOR` is present.
    pub no_color: bool,
    /// `FORCE_COLOR` is present.
    pub force_color: bool,
    /// `CI` is present.
    pub ci: bool,
    /// `TERM` is `dumb`.
    pub dumb_term: bool,
    /// stdout is a terminal.
    pub stdout_tty: bool,
}

impl ColorEnv {
    /// Reads the current process environment.
    pub fn from_process() -> Self {
        Self {
            no_color: std::env::var_os("NO_COLOR").is_some(),
            force_color: std::env::var_os("FORCE_COLOR").is_some(),
            ci: std::env::var_os("CI").is_some(),
            dumb_term: std::env::var_os("TERM").is_some_and(|t| t == "dumb"),
            stdout_tty: std::io::stdout().is_terminal(),
        }
    }
}

/// Returns `true` if ANSI color codes should be emitted.
///
/// Checked in order, first hit wins:
/// - `no_color_flag` (`--no-color`) disables.
/// - `NO_COLOR` disables, per <https://no-color.org>.
/// - `FORCE_COLOR` enables.
/// - `CI` disables.
/// - `TERM=dumb` disables.
/// - Otherwise colors follow whether stdout is a TTY.
pub fn colors_enabled(no_color_flag: bool, env: ColorEnv) -> bool {
    if no_color_flag || env.no_color {
        return false;
    }
    if env.force_color {
        return true;
    }
    if env.ci || env.dumb_term {
        return false;
    }
    env.stdout_tty
}

/// Builds the palette for this process.
pub fn palette(no_color_flag: bool) -> Palette {
    Palette::new(colors_enabled(no_color_flag, ColorEnv::from_process()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tty() -> ColorEnv {
        ColorEnv {
            stdout_tty: true,
            ..ColorEnv::default()
        }
    }

    #[test]
    fn tty_gets_colors() {
        assert!(colors_enabled(false, tty()));
        assert!(!colors_enabled(false, ColorEnv::default()));
    }

    #[test]
    fn flag_and_no_color_beat_force_color() {
        let env = ColorEnv {
            force_color: true,
            ..tty()
        };
        assert!(!colors_enabled(true, env));
        assert!(!colors_enabled(
            false,
            ColorEnv {
                no_color: true,
                ..env
            }
        ));
    }

    #[test]
    fn force_color_beats_ci_and_pipes() {
        let env = ColorEnv {
            force_color: true,
            ci: true,
            ..ColorEnv::default()
        };
        assert!(colors_enabled(false, env));
    }

    #[test]
    fn ci_and_dumb_terminals_disable() {
        assert!(!colors_enabled(false, ColorEnv { ci: true, ..tty() }));
        assert!(!colors_enabled(
            false,
            ColorEnv {
                dumb_term: true,
                ..tty()
            }
        ));
    }
}
