/// ANSI foreground color used to tint a display name on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl ColorTag {
    pub const ALL: [ColorTag; 6] = [
        ColorTag::Red,
        ColorTag::Green,
        ColorTag::Yellow,
        ColorTag::Blue,
        ColorTag::Magenta,
        ColorTag::Cyan,
    ];

    pub const RESET: &'static str = "\x1b[0m";

    pub fn ansi_code(&self) -> &'static str {
        match self {
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Blue => "\x1b[34m",
            Self::Magenta => "\x1b[35m",
            Self::Cyan => "\x1b[36m",
        }
    }

    /// Wrap `text` in this color, resetting afterwards.
    pub fn paint(&self, text: &str) -> String {
        format!("{}{}{}", self.ansi_code(), text, Self::RESET)
    }
}
