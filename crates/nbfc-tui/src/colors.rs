//! Material Design 3 dark theme colors

use ratatui::style::Color;

pub const ON_SURFACE: Color = Color::Rgb(0xe6, 0xe1, 0xe1);
pub const SUBTEXT: Color = Color::Rgb(0xcb, 0xc5, 0xca);
pub const OUTLINE: Color = Color::Rgb(0x94, 0x8f, 0x94);

pub const PRIMARY: Color = Color::Rgb(0xcb, 0xc4, 0xcb);

pub const SUCCESS: Color = Color::Rgb(0xb5, 0xcc, 0xba);

pub const WARNING: Color = Color::Rgb(0xff, 0xd9, 0x66);
