//! Rendering a session snapshot for the terminal.

use std::fmt::Write;

use clap::ValueEnum;
use shelterfinder_lib::{SessionSnapshot, StatusKind};

use crate::terminal::ColorPalette;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Glyph set for list decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub pin: &'static str,
    pub walker: &'static str,
}

impl Glyphs {
    pub const fn unicode() -> Self {
        Self {
            pin: "📍",
            walker: "🚶",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            pin: "@",
            walker: "~",
        }
    }
}

/// Status line followed by one block per ranked shelter.
pub fn render_text(snapshot: &SessionSnapshot, palette: &ColorPalette, glyphs: Glyphs) -> String {
    let mut out = String::new();

    if let Some(status) = &snapshot.status {
        let color = match status.kind {
            StatusKind::Info => palette.green,
            StatusKind::Degraded => palette.yellow,
            StatusKind::Error => palette.red,
        };
        let _ = writeln!(out, "{color}{}{}", status.text, palette.reset);
    }

    for card in &snapshot.shelters {
        let marker = if snapshot.selected == Some(card.index) {
            palette.reverse
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "\n{marker}{}{}{}",
            palette.white_bold,
            card.title(),
            palette.reset
        );
        let _ = writeln!(
            out,
            "   {}{} {}{}",
            palette.gray, glyphs.pin, card.address, palette.reset
        );
        let _ = writeln!(
            out,
            "   {}{}{}  {} {}",
            palette.cyan, card.distance_label, palette.reset, glyphs.walker, card.walking_label
        );
        if let Some(remarks) = &card.remarks {
            let _ = writeln!(out, "   {}{}{}", palette.gray, remarks, palette.reset);
        }
    }

    out
}

pub fn render_json(snapshot: &SessionSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}
