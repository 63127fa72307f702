use ratatui::style::Color;

/// Nord palette, only the shades the picker draws with.
pub struct NordTheme {
    pub nord0: Color,
    pub nord1: Color,
    pub nord3: Color,
    pub nord4: Color,
    pub nord6: Color,
    pub nord8: Color,
    pub nord10: Color,
    pub nord11: Color,
    pub nord13: Color,
    pub nord14: Color,
}

impl Default for NordTheme {
    fn default() -> Self {
        Self {
            nord0: Color::Rgb(46, 52, 64),
            nord1: Color::Rgb(59, 66, 82),
            nord3: Color::Rgb(76, 86, 106),
            nord4: Color::Rgb(216, 222, 233),
            nord6: Color::Rgb(236, 239, 244),
            nord8: Color::Rgb(136, 192, 208),
            nord10: Color::Rgb(94, 129, 172),
            nord11: Color::Rgb(191, 97, 106),
            nord13: Color::Rgb(235, 203, 139),
            nord14: Color::Rgb(163, 190, 140),
        }
    }
}

impl NordTheme {
    pub fn bg(&self) -> Color {
        self.nord0
    }
    pub fn bg_secondary(&self) -> Color {
        self.nord1
    }
    pub fn muted(&self) -> Color {
        self.nord3
    }
    pub fn fg(&self) -> Color {
        self.nord4
    }
    pub fn fg_bright(&self) -> Color {
        self.nord6
    }
    pub fn accent(&self) -> Color {
        self.nord8
    }
    pub fn active(&self) -> Color {
        self.nord10
    }
    pub fn success(&self) -> Color {
        self.nord14
    }
    pub fn warning(&self) -> Color {
        self.nord13
    }
    pub fn danger(&self) -> Color {
        self.nord11
    }
}
