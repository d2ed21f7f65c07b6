use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::BillError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS colour with the given opacity, used for tinted panels.
    pub fn with_alpha(&self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {:.2})", self.r, self.g, self.b, alpha)
    }

    /// Components scaled to 0.0..=1.0 for PDF colour operators
    pub fn unit(&self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Blue, Theme::Green, Theme::Orange, Theme::Purple];

    pub fn palette(self) -> Palette {
        match self {
            Theme::Blue => Palette {
                primary: Rgb::new(0x19, 0x76, 0xd2),
                secondary: Rgb::new(0x42, 0xa5, 0xf5),
            },
            Theme::Green => Palette {
                primary: Rgb::new(0x38, 0x8e, 0x3c),
                secondary: Rgb::new(0x66, 0xbb, 0x6a),
            },
            Theme::Orange => Palette {
                primary: Rgb::new(0xf5, 0x7c, 0x00),
                secondary: Rgb::new(0xff, 0xb7, 0x4d),
            },
            Theme::Purple => Palette {
                primary: Rgb::new(0x7b, 0x1f, 0xa2),
                secondary: Rgb::new(0xba, 0x68, 0xc8),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Blue => "blue",
            Theme::Green => "green",
            Theme::Orange => "orange",
            Theme::Purple => "purple",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown theme names are rejected rather than silently replaced.
impl FromStr for Theme {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| BillError::UnknownTheme(s.to_string()))
    }
}
