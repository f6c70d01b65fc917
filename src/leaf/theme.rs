use std::fmt;

use crossterm::style::Color;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// colors used when writing to a terminal
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    pub accent: Color,
    pub muted: Color,
}

impl Theme {
    /// Only the exact stored literal `dark` selects the dark theme; any
    /// other value, or none at all, falls back to light.
    pub fn from_stored(value: Option<&str>) -> Theme {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette { accent: Color::DarkBlue, muted: Color::DarkGrey },
            Theme::Dark => Palette { accent: Color::Cyan, muted: Color::Grey },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "{}",
               match *self {
                   Theme::Light => "light",
                   Theme::Dark => "dark",
               })
    }
}
