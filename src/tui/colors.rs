//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::ColumnId;

/// Card background when not selected.
pub const CARD_BG: Color = Color::Rgb(38, 38, 46);
/// Placeholder text and secondary details.
pub const MUTED: Color = Color::Rgb(140, 140, 150);
/// Validation messages.
pub const ERROR_RED: Color = Color::Rgb(239, 68, 68);
/// Drop cursor while dragging with the keyboard.
pub const DROP_CURSOR: Color = Color::Rgb(255, 215, 0);

/// Brand colour of a column.
pub fn column_color(id: ColumnId) -> Color {
    let (r, g, b) = id.rgb();
    Color::Rgb(r, g, b)
}
