use ratatui::style::Color;
use tracing::warn;

/// Runtime theme
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey: Color,

    // Semantic colors
    pub accent: Color,
    pub heading: Color,
    pub card: Color,
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::navy()
    }
}

impl Theme {
    /// Navy and gold, the school's house colors
    pub fn navy() -> Self {
        Self {
            bg0: Color::Rgb(0x0f, 0x1b, 0x33),
            bg1: Color::Rgb(0x16, 0x25, 0x44),
            bg2: Color::Rgb(0x22, 0x33, 0x57),
            fg0: Color::Rgb(0xe8, 0xe4, 0xd8),
            fg1: Color::Rgb(0xc9, 0xc4, 0xb5),
            grey: Color::Rgb(0x8a, 0x93, 0xa8),
            accent: Color::Rgb(0xc9, 0xa8, 0x4c),
            heading: Color::Rgb(0xd4, 0xb8, 0x5c),
            card: Color::Rgb(0x1d, 0x2e, 0x52),
            error: Color::Rgb(0xea, 0x69, 0x62),
            success: Color::Rgb(0xa9, 0xb6, 0x65),
        }
    }

    pub fn ivory() -> Self {
        Self {
            bg0: Color::Rgb(0xfa, 0xf7, 0xf0),
            bg1: Color::Rgb(0xf0, 0xeb, 0xdf),
            bg2: Color::Rgb(0xe2, 0xdb, 0xc9),
            fg0: Color::Rgb(0x1b, 0x25, 0x3d),
            fg1: Color::Rgb(0x3a, 0x45, 0x5e),
            grey: Color::Rgb(0x7a, 0x7f, 0x8c),
            accent: Color::Rgb(0xa8, 0x87, 0x3a),
            heading: Color::Rgb(0x0f, 0x1b, 0x33),
            card: Color::Rgb(0xe9, 0xe2, 0xd0),
            error: Color::Rgb(0xc1, 0x3b, 0x33),
            success: Color::Rgb(0x4f, 0x7a, 0x28),
        }
    }

    /// Resolve a configured theme name, falling back to navy
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "navy" | "dark" => Self::navy(),
            "ivory" | "light" => Self::ivory(),
            other => {
                warn!("Unknown theme '{}', using navy", other);
                Self::navy()
            }
        }
    }
}
