use crate::catalog::{display_name_for, CatalogEntry, ImageCatalog};
use crate::color::{hex_to_rgba, rgba_to_hex, PRESET_COLORS};
use crate::export::{print_image, save_image, suggested_filename};
use crate::image_source::ImageSource;
use crate::session::{EditorSession, LoadOutcome, LoadState};
use crate::state::{Keybindings, ToolSettings};
use crate::tools::{PointerEvent, Tool};
use eframe::egui::{
    self, Color32, ColorImage, Context, Pos2, Rect, Sense, Stroke, TextureOptions, Ui, Vec2,
};
use eframe::Frame;
use image::Rgba;
use std::sync::Arc;

const THUMBNAIL_SIZE: f32 = 64.0;
const SWATCH_SIZE: f32 = 22.0;

pub struct ColoringApp {
    session: EditorSession,
    catalog: Box<dyn ImageCatalog>,
    entries: Vec<CatalogEntry>,
    keybindings: Keybindings,
    display_texture: Option<egui::TextureHandle>,
    uploaded_generation: Option<u64>,
    pointer_inside: bool,
    current_name: String,
    notice: Option<String>,
}

impl ColoringApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        catalog: Box<dyn ImageCatalog>,
        settings: ToolSettings,
        initial: Option<String>,
    ) -> Self {
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(26, 27, 38); // #1a1b26
        visuals.panel_fill = Color32::from_rgb(26, 27, 38);
        visuals.extreme_bg_color = Color32::from_rgb(22, 22, 30);
        cc.egui_ctx.set_visuals(visuals);
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut session = EditorSession::new(Vec2::ZERO, settings);
        let ctx = cc.egui_ctx.clone();
        session.set_load_notifier(Arc::new(move || ctx.request_repaint()));

        let entries = catalog.list_selectable_images();
        let mut app = Self {
            session,
            catalog,
            entries,
            keybindings: Keybindings::default(),
            display_texture: None,
            uploaded_generation: None,
            pointer_inside: false,
            current_name: String::new(),
            notice: None,
        };

        // Start on the requested picture, else the first catalog page
        let initial = initial.or_else(|| app.entries.first().map(|e| e.image_url.clone()));
        if let Some(reference) = initial {
            app.select(&reference, None);
        }
        app
    }

    fn select(&mut self, reference: &str, display_name: Option<&str>) {
        self.current_name = display_name
            .map(str::to_string)
            .unwrap_or_else(|| display_name_for(reference));
        self.session.select_image(ImageSource::parse(reference));
    }

    fn poll_load(&mut self) {
        match self.session.poll_load() {
            Some(LoadOutcome::Failed(message)) => {
                self.notice = Some(format!(
                    "Failed to load image. Please try another one or check the URL/file.\n\n{message}"
                ));
            }
            Some(LoadOutcome::Loaded { .. }) | None => {}
        }
    }

    fn update_texture(&mut self, ctx: &Context) {
        let generation = self.session.compositor().generation();
        if self.uploaded_generation == Some(generation) {
            return;
        }
        let display = self.session.compositor().display();
        let color_image = ColorImage::from_rgba_unmultiplied(
            [display.width() as usize, display.height() as usize],
            display.as_raw(),
        );
        // The display is already screen-sized; sampling happened on the CPU.
        match &mut self.display_texture {
            Some(texture) => texture.set(color_image, TextureOptions::NEAREST),
            None => {
                self.display_texture =
                    Some(ctx.load_texture("display", color_image, TextureOptions::NEAREST));
            }
        }
        self.uploaded_generation = Some(generation);
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let kb = &self.keybindings;
        let (tool, zoom_in, zoom_out, fit, reset, undo, redo) = ctx.input(|i| {
            let tool = Tool::ALL
                .into_iter()
                .find(|t| kb.for_tool(*t).matches(i));
            (
                tool,
                kb.zoom_in.matches(i) || i.key_pressed(egui::Key::Equals),
                kb.zoom_out.matches(i),
                kb.fit_to_screen.matches(i),
                kb.reset_zoom.matches(i),
                kb.undo.matches(i),
                kb.redo.matches(i),
            )
        });

        if let Some(tool) = tool {
            if tool != Tool::Pan || self.session.viewport().can_pan() {
                self.session.set_tool(tool);
            }
        }
        if zoom_in {
            self.session.zoom_in();
        }
        if zoom_out {
            self.session.zoom_out();
        }
        if fit {
            self.session.fit_to_screen();
        } else if reset {
            self.session.reset_zoom_pan();
        }
        if undo {
            self.session.undo();
        }
        if redo {
            self.session.redo();
        }
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.heading("Colorbook");
        ui.separator();

        self.image_picker(ui);
        ui.separator();
        self.color_picker(ui);
        ui.separator();

        ui.label("Tools");
        ui.horizontal(|ui| {
            for tool in [Tool::Fill, Tool::Erase] {
                let label = format!("{} ({})", tool.name(), self.keybindings.for_tool(tool).format());
                if ui.selectable_label(self.session.tool() == tool, label).clicked() {
                    self.session.set_tool(tool);
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label("Tolerance:");
            ui.add(egui::DragValue::new(&mut self.session.settings.fill_tolerance).range(0..=255));
            ui.label("Eraser:");
            ui.add(egui::DragValue::new(&mut self.session.settings.eraser_radius).range(1.0..=100.0));
        });
        ui.separator();

        ui.label("View");
        ui.horizontal_wrapped(|ui| {
            if ui.button("Zoom In").clicked() {
                self.session.zoom_in();
            }
            if ui.button("Zoom Out").clicked() {
                self.session.zoom_out();
            }
            if ui.button("Reset (1:1)").clicked() {
                self.session.reset_zoom_pan();
            }
            if ui.button("Fit to Screen").clicked() {
                self.session.fit_to_screen();
            }
            let can_pan = self.session.viewport().can_pan();
            let pan = ui.add_enabled(
                can_pan,
                egui::SelectableLabel::new(self.session.tool() == Tool::Pan, "Pan (Drag)"),
            );
            if pan.clicked() {
                self.session.set_tool(Tool::Pan);
            }
        });
        ui.label(format!("Zoom: {:.0}%", self.session.viewport().scale() * 100.0));
        ui.separator();

        ui.label("Actions");
        ui.horizontal_wrapped(|ui| {
            if ui.add_enabled(self.session.can_undo(), egui::Button::new("Undo")).clicked() {
                self.session.undo();
            }
            if ui.add_enabled(self.session.can_redo(), egui::Button::new("Redo")).clicked() {
                self.session.redo();
            }
            let has_image = self.session.layers().is_some();
            if ui.add_enabled(has_image, egui::Button::new("Clear")).clicked() {
                self.session.clear_coloring();
            }
            if ui.add_enabled(has_image, egui::Button::new("Download")).clicked() {
                self.download();
            }
            if ui.add_enabled(has_image, egui::Button::new("Print")).clicked() {
                self.print();
            }
        });
    }

    fn image_picker(&mut self, ui: &mut Ui) {
        ui.label("Load Image");
        if ui.button("Upload…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Image", &["png", "jpg", "jpeg", "webp", "bmp"])
                .pick_file()
            {
                let reference = path.to_string_lossy().into_owned();
                self.select(&reference, None);
            }
        }
        if ui.small_button("Refresh gallery").clicked() {
            self.entries = self.catalog.list_selectable_images();
        }

        if self.entries.is_empty() {
            return;
        }
        ui.label("Or select one:");
        let mut picked = None;
        egui::ScrollArea::vertical()
            .max_height(THUMBNAIL_SIZE * 3.5)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for entry in &self.entries {
                        let response = match ImageSource::parse(&entry.image_url) {
                            ImageSource::File(path) => ui.add(egui::ImageButton::new(
                                egui::Image::new(format!("file://{}", path.display()))
                                    .fit_to_exact_size(Vec2::splat(THUMBNAIL_SIZE)),
                            )),
                            _ => ui.button(&entry.display_name),
                        };
                        if response.on_hover_text(&entry.display_name).clicked() {
                            picked = Some(entry.clone());
                        }
                    }
                });
            });
        if let Some(entry) = picked {
            self.select(&entry.image_url, Some(&entry.display_name));
        }
    }

    fn color_picker(&mut self, ui: &mut Ui) {
        let current = hex_to_rgba(self.session.active_color(), 255).unwrap_or(Rgba([0, 0, 0, 255]));
        ui.horizontal(|ui| {
            ui.label("Custom Color");
            let mut rgb = [current[0], current[1], current[2]];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                self.session
                    .set_active_color(rgba_to_hex(Rgba([rgb[0], rgb[1], rgb[2], 255])));
            }
        });

        ui.horizontal_wrapped(|ui| {
            for preset in PRESET_COLORS {
                let Some(color) = hex_to_rgba(preset, 255) else {
                    continue;
                };
                let selected = self.session.active_color().eq_ignore_ascii_case(preset);
                let stroke = if selected {
                    Stroke::new(2.0, Color32::from_rgb(59, 130, 246))
                } else {
                    Stroke::new(1.0, Color32::from_gray(160))
                };
                let swatch = egui::Button::new("")
                    .fill(Color32::from_rgb(color[0], color[1], color[2]))
                    .stroke(stroke)
                    .min_size(Vec2::splat(SWATCH_SIZE));
                if ui.add(swatch).on_hover_text(preset).clicked() {
                    self.session.set_active_color(preset);
                }
            }
        });
    }

    fn download(&mut self) {
        let Some(picture) = self.session.composite() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(suggested_filename(&self.current_name))
            .save_file()
        else {
            return;
        };
        if let Err(e) = save_image(&picture, &path) {
            log::error!("Download failed: {}", e);
            self.notice = Some(format!("Download failed: {e}"));
        }
    }

    fn print(&mut self) {
        let Some(picture) = self.session.composite() else {
            return;
        };
        if let Err(e) = print_image(&picture) {
            log::error!("Print failed: {:#}", e);
            self.notice = Some(format!("Print failed: {e:#}"));
        }
    }

    fn render_canvas(&mut self, ui: &mut Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        self.session.set_viewport_size(rect.size());
        painter.rect_filled(rect, 0.0, Color32::from_gray(229));

        match self.session.load_state() {
            LoadState::Loading(_) => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Loading Image...",
                    egui::FontId::proportional(18.0),
                    Color32::DARK_GRAY,
                );
                ui.ctx().request_repaint();
                return;
            }
            LoadState::Empty | LoadState::Failed(_) => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Select an image from the gallery or upload one to start coloring.",
                    egui::FontId::proportional(16.0),
                    Color32::GRAY,
                );
                return;
            }
            LoadState::Ready => {}
        }

        self.update_texture(ui.ctx());
        if let Some(texture) = &self.display_texture {
            painter.image(
                texture.id(),
                Rect::from_min_size(rect.min, texture.size_vec2()),
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        let local = |p: Pos2| (p - rect.min).to_pos2();
        let (hover, pressed, down, released, moving, scroll) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.is_moving(),
                i.raw_scroll_delta.y,
            )
        });

        match hover.filter(|p| rect.contains(*p)) {
            Some(pos) => {
                let p = local(pos);
                if pressed {
                    self.session.dispatch(PointerEvent::Down(p));
                } else if down && moving {
                    self.session.dispatch(PointerEvent::Move(p));
                }
                // A quick click can press and release within one frame.
                if released {
                    self.session.dispatch(PointerEvent::Up(p));
                }
                if scroll != 0.0 {
                    // egui scrolls up with positive deltas; wheel-up zooms in
                    self.session.zoom(-scroll, Some(p));
                }
                self.pointer_inside = true;
            }
            None => {
                if self.pointer_inside {
                    self.session.dispatch(PointerEvent::Leave);
                    self.pointer_inside = false;
                }
            }
        }

        response.on_hover_cursor(match self.session.tool() {
            Tool::Fill | Tool::Erase => egui::CursorIcon::Crosshair,
            Tool::Pan if self.session.viewport().is_panning() => egui::CursorIcon::Grabbing,
            Tool::Pan => egui::CursorIcon::Grab,
        });

        // The redraw triggered by input lands next frame
        self.update_texture(ui.ctx());
    }

    fn notice_window(&mut self, ctx: &Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.notice = None;
                }
            });
    }
}

impl eframe::App for ColoringApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.poll_load();
        self.handle_shortcuts(ctx);

        egui::SidePanel::left("toolbar")
            .exact_width(256.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.toolbar(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.render_canvas(ui);
            });

        self.notice_window(ctx);
    }
}
