use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub tile_bg: Color,
  pub new_badge: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "Slate",
    bg: Color::Rgb(15, 17, 21),
    fg: Color::Rgb(240, 242, 245),
    accent: Color::Rgb(99, 140, 255),
    muted: Color::Rgb(130, 138, 150),
    border: Color::Rgb(45, 50, 60),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(45, 52, 65),
    tile_bg: Color::Rgb(24, 27, 33),
    new_badge: Color::Rgb(120, 220, 140),
    status: Color::Rgb(99, 140, 255),
    error: Color::Rgb(240, 100, 100),
    key_fg: Color::Rgb(15, 17, 21),
    key_bg: Color::Rgb(130, 138, 150),
  },
  Theme {
    name: "Dusk",
    bg: Color::Rgb(30, 24, 36),
    fg: Color::Rgb(236, 228, 240),
    accent: Color::Rgb(240, 150, 90),
    muted: Color::Rgb(150, 135, 160),
    border: Color::Rgb(70, 58, 82),
    highlight_fg: Color::Rgb(30, 24, 36),
    highlight_bg: Color::Rgb(240, 150, 90),
    tile_bg: Color::Rgb(40, 32, 48),
    new_badge: Color::Rgb(250, 210, 110),
    status: Color::Rgb(240, 150, 90),
    error: Color::Rgb(255, 110, 120),
    key_fg: Color::Rgb(30, 24, 36),
    key_bg: Color::Rgb(150, 135, 160),
  },
  Theme {
    name: "Paper",
    bg: Color::Rgb(250, 248, 242),
    fg: Color::Rgb(40, 40, 40),
    accent: Color::Rgb(30, 110, 200),
    muted: Color::Rgb(120, 120, 120),
    border: Color::Rgb(200, 196, 186),
    highlight_fg: Color::Rgb(250, 248, 242),
    highlight_bg: Color::Rgb(30, 110, 200),
    tile_bg: Color::Rgb(238, 234, 224),
    new_badge: Color::Rgb(20, 140, 70),
    status: Color::Rgb(30, 110, 200),
    error: Color::Rgb(200, 40, 40),
    key_fg: Color::Rgb(250, 248, 242),
    key_bg: Color::Rgb(120, 120, 120),
  },
];
