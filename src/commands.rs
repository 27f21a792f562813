use crate::layers::PixelRect;
use image::{GenericImage, GenericImageView, RgbaImage};

/// A reversible edit of the color layer.
pub trait Command {
    fn undo(&self, layer: &mut RgbaImage);
    fn redo(&self, layer: &mut RgbaImage);
    fn name(&self) -> &str;
}

pub struct CommandStack {
    commands: Vec<Box<dyn Command>>,
    cursor: usize, // Slot for the next command
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandStack {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            cursor: 0,
        }
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        // A new edit drops everything that could have been redone
        if self.cursor < self.commands.len() {
            self.commands.truncate(self.cursor);
        }
        self.commands.push(command);
        self.cursor += 1;
    }

    /// Returns the undone command's name, if any.
    pub fn undo(&mut self, layer: &mut RgbaImage) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let command = &self.commands[self.cursor];
        command.undo(layer);
        Some(command.name())
    }

    pub fn redo(&mut self, layer: &mut RgbaImage) -> Option<&str> {
        if self.cursor >= self.commands.len() {
            return None;
        }
        let command = &self.commands[self.cursor];
        command.redo(layer);
        self.cursor += 1;
        Some(command.name())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = 0;
    }
}

/// Before/after copies of one rectangle of the color layer.
pub struct PatchCommand {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub old_patch: RgbaImage,
    pub new_patch: RgbaImage,
}

impl PatchCommand {
    pub fn capture(name: &str, before: &RgbaImage, after: &RgbaImage, rect: PixelRect) -> Self {
        Self {
            name: name.to_string(),
            x: rect.x,
            y: rect.y,
            old_patch: before.view(rect.x, rect.y, rect.width, rect.height).to_image(),
            new_patch: after.view(rect.x, rect.y, rect.width, rect.height).to_image(),
        }
    }

    fn apply(&self, layer: &mut RgbaImage, patch: &RgbaImage) {
        if let Err(e) = layer.copy_from(patch, self.x, self.y) {
            log::error!("Failed to restore {} patch: {}", self.name, e);
        }
    }
}

impl Command for PatchCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn undo(&self, layer: &mut RgbaImage) {
        self.apply(layer, &self.old_patch);
    }

    fn redo(&self, layer: &mut RgbaImage) {
        self.apply(layer, &self.new_patch);
    }
}
