//! Terminal styling and capability detection.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for shelter names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for addresses and secondary text.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for distance badges.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for normal status.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for degraded status.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red for errors.
    pub const RED: &str = "\x1b[31m";
    /// Reverse video for the selected entry.
    pub const REVERSE: &str = "\x1b[7m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
    pub reverse: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            red: colors::RED,
            reverse: colors::REVERSE,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            yellow: "",
            red: "",
            reverse: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Check `LANG`/`LC_ALL` for a UTF-8 hint before printing pictographs.
#[must_use]
pub fn supports_unicode() -> bool {
    for var in ["LC_ALL", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if value.to_uppercase().contains("UTF") {
                return true;
            }
        }
    }
    cfg!(windows)
}
