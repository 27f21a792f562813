//! The editor session: one active image, its layers, the viewport and the
//! pointer controller that routes input to the tools.

use crate::color::hex_to_rgba;
use crate::commands::{CommandStack, PatchCommand};
use crate::compositor::{flatten, Compositor};
use crate::image_source::ImageSource;
use crate::layers::{CanvasLayers, PixelRect};
use crate::loader::{ImageLoader, Notifier};
use crate::state::{ToolSettings, DEFAULT_COLOR};
use crate::tools::{eraser, fill, PointerEvent, Tool};
use crate::viewport::{PixelPoint, Viewport};
use egui::{Pos2, Vec2};
use image::RgbaImage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Empty,
    Loading(ImageSource),
    Ready,
    Failed(String),
}

/// What a finished load did to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { width: u32, height: u32 },
    Failed(String),
}

/// An erase drag in progress: the layer as it was at pointer-down plus the
/// area touched since.
struct EraseStroke {
    before: RgbaImage,
    dirty: Option<PixelRect>,
}

pub struct EditorSession {
    layers: Option<CanvasLayers>,
    viewport: Viewport,
    compositor: Compositor,
    history: CommandStack,
    loader: ImageLoader,
    load_state: LoadState,
    stroke: Option<EraseStroke>,
    tool: Tool,
    active_color: String,
    pub settings: ToolSettings,
}

impl EditorSession {
    pub fn new(viewport_size: Vec2, settings: ToolSettings) -> Self {
        Self {
            layers: None,
            viewport: Viewport::new(viewport_size),
            compositor: Compositor::new(),
            history: CommandStack::new(),
            loader: ImageLoader::new(),
            load_state: LoadState::Empty,
            stroke: None,
            tool: Tool::default(),
            active_color: DEFAULT_COLOR.to_string(),
            settings,
        }
    }

    pub fn set_load_notifier(&mut self, notify: Notifier) {
        self.loader.set_notifier(notify);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn layers(&self) -> Option<&CanvasLayers> {
        self.layers.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading(_))
    }

    pub fn image_size(&self) -> Option<[u32; 2]> {
        self.viewport.image_size()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn active_color(&self) -> &str {
        &self.active_color
    }

    pub fn can_undo(&self) -> bool {
        self.layers.is_some() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.layers.is_some() && self.history.can_redo()
    }

    /// Switching tools finishes any drag of the previous tool.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            self.end_gestures();
            self.tool = tool;
        }
    }

    /// Stored as given; parsed only when a fill happens.
    pub fn set_active_color(&mut self, color: impl Into<String>) {
        self.active_color = color.into();
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Drops the current image and starts decoding `source` in the background.
    pub fn select_image(&mut self, source: ImageSource) {
        self.unload();
        self.loader.request(source.clone());
        self.load_state = LoadState::Loading(source);
    }

    /// Applies the current load's result if it has arrived.
    pub fn poll_load(&mut self) -> Option<LoadOutcome> {
        let done = self.loader.poll()?;
        Some(self.finish_load(done.source, done.outcome))
    }

    /// Blocking variant of [`EditorSession::poll_load`].
    pub fn wait_for_load(&mut self, timeout: std::time::Duration) -> Option<LoadOutcome> {
        let done = self.loader.wait(timeout)?;
        Some(self.finish_load(done.source, done.outcome))
    }

    fn finish_load(
        &mut self,
        source: ImageSource,
        outcome: Result<RgbaImage, crate::error::EditorError>,
    ) -> LoadOutcome {
        match outcome {
            Ok(image) => {
                let (width, height) = image.dimensions();
                log::info!("Loaded {source} ({width}x{height})");
                self.install_image(image);
                LoadOutcome::Loaded { width, height }
            }
            Err(e) => {
                log::error!("Failed to load image {source}: {e}");
                self.unload();
                let message = e.to_string();
                self.load_state = LoadState::Failed(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Makes `image` the active outline: fresh transparent color layer, empty
    /// history, viewport fitted to the new dimensions.
    pub fn install_image(&mut self, image: RgbaImage) {
        let (width, height) = image.dimensions();
        self.loader.cancel();
        self.stroke = None;
        self.history.clear();
        self.layers = Some(CanvasLayers::from_image(image));
        self.viewport.set_image_size(Some([width, height]));
        self.viewport.fit_to_screen();
        self.load_state = LoadState::Ready;
        self.recomposite();
    }

    fn unload(&mut self) {
        self.layers = None;
        self.stroke = None;
        self.history.clear();
        self.viewport.set_image_size(None);
        self.compositor.clear();
        self.load_state = LoadState::Empty;
    }

    // ---------------------------------------------------------------------
    // Pointer dispatch
    // ---------------------------------------------------------------------

    /// Routes one pointer event to the active tool. Returns true when the
    /// display was redrawn.
    pub fn dispatch(&mut self, event: PointerEvent) -> bool {
        if self.is_loading() || self.layers.is_none() {
            self.end_gestures();
            return false;
        }
        match self.tool {
            Tool::Fill => self.handle_fill(event),
            Tool::Erase => self.handle_erase(event),
            Tool::Pan => self.handle_pan(event),
        }
    }

    fn image_point(&self, screen: Pos2) -> Option<PixelPoint> {
        self.viewport.screen_to_image_point(screen)
    }

    fn handle_fill(&mut self, event: PointerEvent) -> bool {
        let PointerEvent::Down(screen) = event else {
            return false;
        };
        let Some(point) = self.image_point(screen) else {
            return false;
        };
        let Some(color) = hex_to_rgba(&self.active_color, 255) else {
            log::warn!("Ignoring fill with malformed color '{}'", self.active_color);
            return false;
        };
        let Some(layers) = self.layers.as_mut() else {
            return false;
        };
        if fill::already_filled(layers.color(), point.x, point.y, color) {
            return false;
        }

        let before = layers.color().clone();
        let (base, color_layer) = layers.split_mut();
        let Some(rect) = fill::flood_fill_region(
            color_layer,
            base,
            point.x,
            point.y,
            color,
            self.settings.fill_tolerance,
        ) else {
            return false;
        };

        self.history.push(Box::new(PatchCommand::capture(
            "Fill",
            &before,
            layers.color(),
            rect,
        )));
        self.recomposite();
        true
    }

    fn handle_erase(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down(screen) => {
                // A press without a matching release still closes the old stroke.
                self.finish_stroke();
                let Some(layers) = self.layers.as_ref() else {
                    return false;
                };
                if self.image_point(screen).is_none() {
                    return false;
                }
                self.stroke = Some(EraseStroke {
                    before: layers.color().clone(),
                    dirty: None,
                });
                self.erase_at(screen)
            }
            PointerEvent::Move(screen) => {
                if self.stroke.is_none() {
                    return false;
                }
                self.erase_at(screen)
            }
            PointerEvent::Up(_) | PointerEvent::Leave => self.finish_stroke(),
        }
    }

    fn erase_at(&mut self, screen: Pos2) -> bool {
        let Some(point) = self.image_point(screen) else {
            return false;
        };
        let radius = self.settings.eraser_radius;
        let Some(layers) = self.layers.as_mut() else {
            return false;
        };
        let (width, height) = layers.dimensions();
        eraser::erase_circle(layers.color_mut(), point.x, point.y, radius);

        if let (Some(stroke), Some(rect)) = (
            self.stroke.as_mut(),
            eraser::disc_bounds(width, height, point.x, point.y, radius),
        ) {
            stroke.dirty = Some(stroke.dirty.map_or(rect, |d| d.union(rect)));
        }
        self.recomposite();
        true
    }

    /// Ends an erase drag: records the undo patch and redraws once more.
    fn finish_stroke(&mut self) -> bool {
        let Some(stroke) = self.stroke.take() else {
            return false;
        };
        let Some(layers) = self.layers.as_ref() else {
            return false;
        };
        if let Some(rect) = stroke.dirty {
            self.history.push(Box::new(PatchCommand::capture(
                "Erase",
                &stroke.before,
                layers.color(),
                rect,
            )));
        }
        self.recomposite();
        true
    }

    fn handle_pan(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down(screen) => {
                self.viewport.start_pan(screen);
                false
            }
            PointerEvent::Move(screen) => {
                if self.viewport.pan(screen) {
                    self.recomposite();
                    true
                } else {
                    false
                }
            }
            PointerEvent::Up(_) | PointerEvent::Leave => {
                self.viewport.end_pan();
                false
            }
        }
    }

    fn end_gestures(&mut self) {
        self.finish_stroke();
        self.viewport.end_pan();
    }

    // ---------------------------------------------------------------------
    // Viewport
    // ---------------------------------------------------------------------

    pub fn set_viewport_size(&mut self, size: Vec2) {
        if self.viewport.set_viewport_size(size) {
            self.recomposite();
        }
    }

    /// Wheel zoom; positive `delta_y` zooms out.
    pub fn zoom(&mut self, delta_y: f32, anchor: Option<Pos2>) {
        self.viewport.zoom(delta_y, anchor);
        self.recomposite();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.recomposite();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.recomposite();
    }

    pub fn reset_zoom_pan(&mut self) {
        self.viewport.reset_zoom_pan();
        self.recomposite();
    }

    pub fn fit_to_screen(&mut self) {
        self.viewport.fit_to_screen();
        self.recomposite();
    }

    // ---------------------------------------------------------------------
    // History and output
    // ---------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.end_gestures();
        let Some(layers) = self.layers.as_mut() else {
            return false;
        };
        match self.history.undo(layers.color_mut()) {
            Some(name) => log::debug!("Undo: {name}"),
            None => return false,
        }
        self.recomposite();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.end_gestures();
        let Some(layers) = self.layers.as_mut() else {
            return false;
        };
        match self.history.redo(layers.color_mut()) {
            Some(name) => log::debug!("Redo: {name}"),
            None => return false,
        }
        self.recomposite();
        true
    }

    /// Wipes all coloring; undoable.
    pub fn clear_coloring(&mut self) -> bool {
        self.end_gestures();
        let Some(layers) = self.layers.as_mut() else {
            return false;
        };
        if layers.color().pixels().all(|p| p[3] == 0) {
            return false;
        }
        let before = layers.color().clone();
        layers.clear_color();
        let (width, height) = layers.dimensions();
        self.history.push(Box::new(PatchCommand::capture(
            "Clear",
            &before,
            layers.color(),
            PixelRect::full(width, height),
        )));
        self.recomposite();
        true
    }

    /// The flattened picture (outline plus coloring) for download or print.
    pub fn composite(&self) -> Option<RgbaImage> {
        self.layers.as_ref().map(flatten)
    }

    fn recomposite(&mut self) {
        let Some(layers) = self.layers.as_ref() else {
            self.compositor.clear();
            return;
        };
        let size = self.viewport.viewport_size();
        let size = [size.x.max(0.0).round() as u32, size.y.max(0.0).round() as u32];
        self.compositor
            .recomposite(layers, &self.viewport.state(), size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_source::tests::png_data_uri;
    use crate::viewport::ViewportState;
    use image::{ImageBuffer, Rgba};
    use std::time::Duration;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    /// 20x10 page split by a black wall at x = 10.
    fn split_page() -> RgbaImage {
        let mut page = ImageBuffer::from_pixel(20, 10, WHITE);
        for y in 0..10 {
            page.put_pixel(10, y, BLACK);
        }
        page
    }

    /// Session showing the page at 1:1 with no offset, so screen == image.
    fn session_with(page: RgbaImage) -> EditorSession {
        let mut session = EditorSession::new(Vec2::new(20.0, 10.0), ToolSettings::default());
        session.install_image(page);
        session.reset_zoom_pan();
        assert_eq!(session.viewport().state(), ViewportState::default());
        session
    }

    fn color_at(session: &EditorSession, x: u32, y: u32) -> Rgba<u8> {
        *session.layers().unwrap().color().get_pixel(x, y)
    }

    #[test]
    fn everything_is_a_noop_before_an_image_loads() {
        let mut session = EditorSession::new(Vec2::new(100.0, 100.0), ToolSettings::default());
        for tool in Tool::ALL {
            session.set_tool(tool);
            assert!(!session.dispatch(PointerEvent::Down(Pos2::new(5.0, 5.0))));
            assert!(!session.dispatch(PointerEvent::Move(Pos2::new(6.0, 5.0))));
            assert!(!session.dispatch(PointerEvent::Up(Pos2::new(6.0, 5.0))));
        }
        assert!(!session.undo());
        assert!(!session.clear_coloring());
        assert!(session.composite().is_none());
        assert_eq!(session.viewport().state(), ViewportState::default());
        assert!(!session.viewport().is_panning());
    }

    #[test]
    fn press_without_release_still_records_the_stroke() {
        let mut session = session_with(split_page());
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        session.settings.eraser_radius = 0.0;
        session.set_tool(Tool::Erase);

        session.dispatch(PointerEvent::Down(Pos2::new(2.5, 2.5)));
        session.dispatch(PointerEvent::Down(Pos2::new(8.5, 8.5)));
        session.dispatch(PointerEvent::Up(Pos2::new(8.5, 8.5)));
        assert_eq!(color_at(&session, 2, 2), CLEAR);
        assert_eq!(color_at(&session, 8, 8), CLEAR);

        assert!(session.undo());
        assert_eq!(color_at(&session, 8, 8), RED);
        assert_eq!(color_at(&session, 2, 2), CLEAR);
        assert!(session.undo());
        assert_eq!(color_at(&session, 2, 2), RED);
    }

    #[test]
    fn repeated_fill_adds_no_history() {
        let mut session = session_with(split_page());
        assert!(session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0))));
        assert!(!session.dispatch(PointerEvent::Down(Pos2::new(5.0, 5.0))));
        assert!(session.undo());
        assert!(!session.can_undo());
    }

    #[test]
    fn fill_on_pointer_down_only_and_respects_wall() {
        let mut session = session_with(split_page());
        assert!(!session.dispatch(PointerEvent::Move(Pos2::new(3.5, 3.5))));
        assert!(session.dispatch(PointerEvent::Down(Pos2::new(3.5, 3.5))));
        assert_eq!(color_at(&session, 0, 0), RED);
        assert_eq!(color_at(&session, 9, 9), RED);
        assert_eq!(color_at(&session, 10, 0), CLEAR);
        assert_eq!(color_at(&session, 11, 0), CLEAR);
        assert!(!session.dispatch(PointerEvent::Up(Pos2::new(3.5, 3.5))));

        // Same color again is a no-op.
        assert!(!session.dispatch(PointerEvent::Down(Pos2::new(4.5, 4.5))));
    }

    #[test]
    fn fill_uses_color_at_fill_time() {
        let mut session = session_with(split_page());
        session.set_active_color("#00f");
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        session.set_active_color("#0f0");
        assert_eq!(color_at(&session, 1, 1), Rgba([0, 0, 255, 255]));
        session.dispatch(PointerEvent::Down(Pos2::new(15.0, 1.0)));
        assert_eq!(color_at(&session, 15, 1), Rgba([0, 255, 0, 255]));
        assert_eq!(color_at(&session, 1, 1), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn malformed_color_fills_nothing() {
        let mut session = session_with(split_page());
        session.set_active_color("notacolor");
        assert!(!session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0))));
        assert!(session.layers().unwrap().color().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn base_layer_is_never_mutated() {
        let page = split_page();
        let mut session = session_with(page.clone());
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        session.set_tool(Tool::Erase);
        session.dispatch(PointerEvent::Down(Pos2::new(2.0, 2.0)));
        session.dispatch(PointerEvent::Move(Pos2::new(12.0, 2.0)));
        session.dispatch(PointerEvent::Up(Pos2::new(12.0, 2.0)));
        session.clear_coloring();
        assert_eq!(session.layers().unwrap().base(), &page);
    }

    #[test]
    fn erase_drags_until_release() {
        let mut session = session_with(split_page());
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        session.settings.eraser_radius = 1.0;
        session.set_tool(Tool::Erase);

        // Moving without a press does nothing.
        assert!(!session.dispatch(PointerEvent::Move(Pos2::new(5.0, 5.0))));
        assert_eq!(color_at(&session, 5, 5), RED);

        assert!(session.dispatch(PointerEvent::Down(Pos2::new(2.5, 2.5))));
        assert_eq!(color_at(&session, 2, 2), CLEAR);
        assert!(session.dispatch(PointerEvent::Move(Pos2::new(6.5, 6.5))));
        assert_eq!(color_at(&session, 6, 6), CLEAR);
        assert_eq!(color_at(&session, 4, 4), RED);
        assert!(session.dispatch(PointerEvent::Up(Pos2::new(6.5, 6.5))));

        assert!(!session.dispatch(PointerEvent::Move(Pos2::new(8.5, 8.5))));
        assert_eq!(color_at(&session, 8, 8), RED);
    }

    #[test]
    fn leave_ends_an_erase_stroke() {
        let mut session = session_with(split_page());
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        session.settings.eraser_radius = 0.0;
        session.set_tool(Tool::Erase);
        session.dispatch(PointerEvent::Down(Pos2::new(2.5, 2.5)));
        assert!(session.dispatch(PointerEvent::Leave));
        assert!(!session.dispatch(PointerEvent::Move(Pos2::new(5.5, 5.5))));
        assert_eq!(color_at(&session, 5, 5), RED);
        assert!(!session.dispatch(PointerEvent::Leave));
    }

    #[test]
    fn pan_moves_offset_and_leave_ends_it() {
        let mut session = session_with(split_page());
        session.set_tool(Tool::Pan);
        assert!(!session.dispatch(PointerEvent::Move(Pos2::new(5.0, 5.0))));
        assert!(!session.dispatch(PointerEvent::Down(Pos2::new(5.0, 5.0))));
        assert!(session.dispatch(PointerEvent::Move(Pos2::new(8.0, 4.0))));
        assert_eq!(session.viewport().offset(), Vec2::new(3.0, -1.0));
        session.dispatch(PointerEvent::Leave);
        assert!(!session.viewport().is_panning());
        assert!(!session.dispatch(PointerEvent::Move(Pos2::new(20.0, 20.0))));
        assert_eq!(session.viewport().offset(), Vec2::new(3.0, -1.0));
    }

    #[test]
    fn switching_tools_mid_pan_ends_the_pan() {
        let mut session = session_with(split_page());
        session.set_tool(Tool::Pan);
        session.dispatch(PointerEvent::Down(Pos2::new(5.0, 5.0)));
        session.set_tool(Tool::Fill);
        assert!(!session.viewport().is_panning());
    }

    #[test]
    fn undo_redo_and_clear() {
        let mut session = session_with(split_page());
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        session.dispatch(PointerEvent::Down(Pos2::new(15.0, 1.0)));
        assert!(session.can_undo());

        assert!(session.undo());
        assert_eq!(color_at(&session, 15, 1), CLEAR);
        assert_eq!(color_at(&session, 1, 1), RED);

        assert!(session.redo());
        assert_eq!(color_at(&session, 15, 1), RED);

        assert!(session.clear_coloring());
        assert_eq!(color_at(&session, 1, 1), CLEAR);
        assert!(!session.clear_coloring());
        assert!(session.undo());
        assert_eq!(color_at(&session, 1, 1), RED);
        assert_eq!(color_at(&session, 15, 1), RED);
    }

    #[test]
    fn every_mutation_redraws_the_display() {
        let mut session = session_with(split_page());
        let before = session.compositor().generation();
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        let after_fill = session.compositor().generation();
        assert!(after_fill > before);
        assert_eq!(session.compositor().display().get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(session.compositor().display().get_pixel(10, 1).0, [0, 0, 0, 255]);

        session.zoom(-100.0, Some(Pos2::new(0.0, 0.0)));
        assert!(session.compositor().generation() > after_fill);
    }

    #[test]
    fn composite_overlays_color_on_outline() {
        let mut session = session_with(split_page());
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        let picture = session.composite().unwrap();
        assert_eq!(*picture.get_pixel(1, 1), RED);
        assert_eq!(*picture.get_pixel(10, 1), BLACK);
        assert_eq!(*picture.get_pixel(15, 1), WHITE);
    }

    #[test_log::test]
    fn select_image_loads_and_fits() {
        let mut session = EditorSession::new(Vec2::new(1000.0, 1000.0), ToolSettings::default());
        let page: RgbaImage = ImageBuffer::from_pixel(200, 100, WHITE);
        session.select_image(ImageSource::parse(&png_data_uri(&page)));
        assert!(session.is_loading());
        assert!(!session.dispatch(PointerEvent::Down(Pos2::new(500.0, 500.0))));

        let outcome = session.wait_for_load(Duration::from_secs(10));
        assert_eq!(
            outcome,
            Some(LoadOutcome::Loaded {
                width: 200,
                height: 100
            })
        );
        assert_eq!(session.load_state(), &LoadState::Ready);
        assert!((session.viewport().scale() - 4.75).abs() < 1e-3);
        assert!(session.layers().unwrap().color().pixels().all(|p| p[3] == 0));
    }

    #[test_log::test]
    fn failed_load_clears_previous_image() {
        let mut session = session_with(split_page());
        session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        session.select_image(ImageSource::parse("data:image/png;base64,AAAA"));
        let outcome = session.wait_for_load(Duration::from_secs(10));
        assert!(matches!(outcome, Some(LoadOutcome::Failed(_))));
        assert!(matches!(session.load_state(), LoadState::Failed(_)));
        assert!(session.layers().is_none());
        assert_eq!(session.image_size(), None);
        assert_eq!(session.viewport().state(), ViewportState::default());
        assert!(!session.dispatch(PointerEvent::Down(Pos2::new(1.0, 1.0))));
    }

    #[test_log::test]
    fn newer_selection_wins() {
        let mut session = EditorSession::new(Vec2::new(100.0, 100.0), ToolSettings::default());
        let small: RgbaImage = ImageBuffer::from_pixel(3, 3, WHITE);
        let large: RgbaImage = ImageBuffer::from_pixel(30, 20, WHITE);
        session.select_image(ImageSource::parse(&png_data_uri(&small)));
        session.select_image(ImageSource::parse(&png_data_uri(&large)));
        session.wait_for_load(Duration::from_secs(10));
        std::thread::sleep(Duration::from_millis(50));
        assert!(session.poll_load().is_none());
        assert_eq!(session.image_size(), Some([30, 20]));
    }
}
