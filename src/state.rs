use crate::tools::{eraser, Tool};

/// Starting color of a fresh session.
pub const DEFAULT_COLOR: &str = "#FF0000";

/// Tolerance the editor passes to the fill engine. Looser than the engine's
/// own default so anti-aliased outline edges are absorbed into regions.
pub const EDITOR_FILL_TOLERANCE: u32 = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct ToolSettings {
    pub fill_tolerance: u32,
    pub eraser_radius: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            fill_tolerance: EDITOR_FILL_TOLERANCE,
            eraser_radius: eraser::DEFAULT_RADIUS,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Shortcut {
    pub key: egui::Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Shortcut {
    pub fn new(key: egui::Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub fn ctrl(mut self, value: bool) -> Self {
        self.ctrl = value;
        self
    }

    pub fn matches(&self, i: &egui::InputState) -> bool {
        i.key_pressed(self.key)
            && i.modifiers.ctrl == self.ctrl
            && i.modifiers.shift == self.shift
            && i.modifiers.alt == self.alt
    }

    pub fn format(&self) -> String {
        let mut s = String::new();
        if self.ctrl {
            s.push_str("Ctrl+");
        }
        if self.shift {
            s.push_str("Shift+");
        }
        if self.alt {
            s.push_str("Alt+");
        }
        s.push_str(self.key.name());
        s
    }
}

pub struct Keybindings {
    pub fill: Shortcut,
    pub erase: Shortcut,
    pub pan: Shortcut,
    pub zoom_in: Shortcut,
    pub zoom_out: Shortcut,
    pub reset_zoom: Shortcut,
    pub fit_to_screen: Shortcut,
    pub undo: Shortcut,
    pub redo: Shortcut,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            fill: Shortcut::new(egui::Key::F),
            erase: Shortcut::new(egui::Key::E),
            pan: Shortcut::new(egui::Key::H),
            zoom_in: Shortcut::new(egui::Key::Plus),
            zoom_out: Shortcut::new(egui::Key::Minus),
            reset_zoom: Shortcut::new(egui::Key::Num0),
            fit_to_screen: Shortcut::new(egui::Key::Num0).ctrl(true),
            undo: Shortcut::new(egui::Key::Z).ctrl(true),
            redo: Shortcut::new(egui::Key::Y).ctrl(true),
        }
    }
}

impl Keybindings {
    pub fn for_tool(&self, tool: Tool) -> Shortcut {
        match tool {
            Tool::Fill => self.fill,
            Tool::Erase => self.erase,
            Tool::Pan => self.pan,
        }
    }
}
