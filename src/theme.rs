use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Named colour palettes. Presentation-only: the engine never looks at it.
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
pub enum Theme {
    #[default]
    Dark,
    Neon,
    Forest,
    Ocean,
    Sunset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub primary: Color,
    pub muted: Color,
    pub error: Color,
    pub warning: Color,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Dark,
        Theme::Neon,
        Theme::Forest,
        Theme::Ocean,
        Theme::Sunset,
    ];

    pub fn next(self) -> Theme {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Theme::Dark => "Sleek dark theme with vibrant blue accents",
            Theme::Neon => "Cyberpunk-inspired with electric colors",
            Theme::Forest => "Rich natural greens with earthy accents",
            Theme::Ocean => "Deep blues with aquatic highlights",
            Theme::Sunset => "Warm gradients with rich reds and oranges",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Rgb(10, 12, 20),
                text: Color::Rgb(226, 232, 240),
                primary: Color::Rgb(96, 165, 250),
                muted: Color::Rgb(100, 116, 139),
                error: Color::Rgb(239, 68, 68),
                warning: Color::Rgb(245, 158, 11),
            },
            Theme::Neon => Palette {
                background: Color::Rgb(14, 5, 33),
                text: Color::Rgb(240, 230, 255),
                primary: Color::Rgb(255, 0, 255),
                muted: Color::Rgb(120, 90, 160),
                error: Color::Rgb(255, 60, 90),
                warning: Color::Rgb(0, 255, 255),
            },
            Theme::Forest => Palette {
                background: Color::Rgb(7, 20, 9),
                text: Color::Rgb(220, 237, 200),
                primary: Color::Rgb(74, 222, 128),
                muted: Color::Rgb(101, 130, 90),
                error: Color::Rgb(220, 80, 60),
                warning: Color::Rgb(202, 160, 60),
            },
            Theme::Ocean => Palette {
                background: Color::Rgb(5, 21, 37),
                text: Color::Rgb(207, 232, 252),
                primary: Color::Rgb(34, 211, 238),
                muted: Color::Rgb(80, 120, 150),
                error: Color::Rgb(248, 113, 113),
                warning: Color::Rgb(251, 191, 36),
            },
            Theme::Sunset => Palette {
                background: Color::Rgb(26, 10, 20),
                text: Color::Rgb(254, 226, 210),
                primary: Color::Rgb(251, 146, 60),
                muted: Color::Rgb(150, 100, 110),
                error: Color::Rgb(225, 29, 72),
                warning: Color::Rgb(250, 204, 21),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_all_themes() {
        let mut theme = Theme::Dark;
        let mut seen = vec![theme];
        for _ in 0..4 {
            theme = theme.next();
            seen.push(theme);
        }
        assert_eq!(seen, Theme::ALL.to_vec());
        assert_eq!(theme.next(), Theme::Dark);
    }

    #[test]
    fn palettes_distinguish_error_from_primary() {
        for theme in Theme::ALL {
            let p = theme.palette();
            assert_ne!(p.primary, p.error, "{theme}");
        }
    }
}
