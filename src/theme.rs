use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Cosmic,
    Retro,
    Minimal,
}

/// Colours used by the renderer for a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub text: Color,
    pub muted: Color,
    pub correct: Color,
    pub incorrect: Color,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Cosmic, Theme::Retro, Theme::Minimal];

    pub fn next(self) -> Self {
        match self {
            Theme::Cosmic => Theme::Retro,
            Theme::Retro => Theme::Minimal,
            Theme::Minimal => Theme::Cosmic,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Cosmic => Palette {
                primary: Color::Magenta,
                secondary: Color::Cyan,
                text: Color::White,
                muted: Color::DarkGray,
                correct: Color::Green,
                incorrect: Color::Red,
            },
            Theme::Retro => Palette {
                primary: Color::Rgb(255, 176, 0),
                secondary: Color::Rgb(255, 94, 91),
                text: Color::Rgb(255, 236, 179),
                muted: Color::Rgb(130, 110, 80),
                correct: Color::Rgb(124, 252, 0),
                incorrect: Color::Rgb(255, 69, 0),
            },
            Theme::Minimal => Palette {
                primary: Color::White,
                secondary: Color::Gray,
                text: Color::Reset,
                muted: Color::DarkGray,
                correct: Color::Green,
                incorrect: Color::Red,
            },
        }
    }
}
