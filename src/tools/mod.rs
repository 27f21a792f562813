pub mod eraser;
pub mod fill;

use egui::Pos2;

pub use eraser::erase_circle;
pub use fill::{flood_fill, flood_fill_region};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    #[default]
    Fill,
    Erase,
    Pan,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Fill, Tool::Erase, Tool::Pan];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Fill => "Fill Bucket",
            Tool::Erase => "Eraser",
            Tool::Pan => "Pan",
        }
    }
}

/// Pointer input in canvas-local screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    /// The pointer left the canvas; ends any drag like `Up`.
    Leave,
}

impl PointerEvent {
    pub fn pos(&self) -> Option<Pos2> {
        match *self {
            PointerEvent::Down(p) | PointerEvent::Move(p) | PointerEvent::Up(p) => Some(p),
            PointerEvent::Leave => None,
        }
    }
}
