use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub muted: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub card_background: Color32,
    pub card_border: Color32,
    pub nav_background: Color32,
    pub h1_size: f32,
    pub h2_size: f32,
    pub body_size: f32,
    pub small_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x11, 0x11, 0x1B),
            foreground: Color32::from_rgb(0xE5, 0xE7, 0xEB),
            muted: Color32::from_rgb(0x9C, 0xA3, 0xAF),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x60, 0xA5, 0xFA),
            card_background: Color32::from_rgba_unmultiplied(255, 255, 255, 26),
            card_border: Color32::from_rgba_unmultiplied(255, 255, 255, 51),
            nav_background: Color32::from_rgba_unmultiplied(0, 0, 0, 204),
            h1_size: 84.0,
            h2_size: 60.0,
            body_size: 34.0,
            small_size: 24.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            muted: Color32::from_rgb(0x55, 0x5B, 0x6E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x25, 0x63, 0xEB),
            card_background: Color32::from_rgba_unmultiplied(0, 0, 0, 13),
            card_border: Color32::from_rgba_unmultiplied(0, 0, 0, 38),
            nav_background: Color32::from_rgba_unmultiplied(240, 240, 245, 230),
            h1_size: 84.0,
            h2_size: 60.0,
            body_size: 34.0,
            small_size: 24.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    pub fn is_dark(&self) -> bool {
        self.name == "dark"
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    pub fn heading_size(&self, level: u8) -> f32 {
        match level {
            1 => self.h1_size,
            2 => self.h2_size,
            _ => self.body_size * 1.2,
        }
    }

    /// Gradient (top, bottom) for a slide background token such as
    /// `purple-black`. Background tokens only apply to the dark theme; the
    /// light theme and unknown tokens get the plain theme background.
    pub fn slide_background(&self, token: &str) -> (Color32, Color32) {
        let plain = (self.background, self.background);
        if !self.is_dark() {
            return plain;
        }
        let mut parts = token.split('-').map(palette_color);
        match (parts.next().flatten(), parts.next().flatten()) {
            (Some(from), Some(to)) => (from, to),
            (Some(solid), None) => (solid, solid),
            _ => plain,
        }
    }
}

/// Deep "900" shades used for slide backgrounds.
fn palette_color(name: &str) -> Option<Color32> {
    let color = match name {
        "black" => Color32::from_rgb(0x00, 0x00, 0x00),
        "gray" => Color32::from_rgb(0x11, 0x18, 0x27),
        "red" => Color32::from_rgb(0x7F, 0x1D, 0x1D),
        "orange" => Color32::from_rgb(0x7C, 0x2D, 0x12),
        "amber" => Color32::from_rgb(0x78, 0x35, 0x0F),
        "green" => Color32::from_rgb(0x14, 0x53, 0x2D),
        "emerald" => Color32::from_rgb(0x06, 0x4E, 0x3B),
        "teal" => Color32::from_rgb(0x13, 0x4E, 0x4A),
        "cyan" => Color32::from_rgb(0x16, 0x4E, 0x63),
        "blue" => Color32::from_rgb(0x1E, 0x3A, 0x8A),
        "indigo" => Color32::from_rgb(0x31, 0x2E, 0x81),
        "violet" => Color32::from_rgb(0x4C, 0x1D, 0x95),
        "purple" => Color32::from_rgb(0x58, 0x1C, 0x87),
        "pink" => Color32::from_rgb(0x83, 0x18, 0x43),
        _ => return None,
    };
    Some(color)
}
