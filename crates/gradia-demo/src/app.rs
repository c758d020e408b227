use gradia_engine::coords::{Rect, Vec2};
use gradia_engine::core::{App, AppControl, FrameCtx};
use gradia_engine::input::{InputEvent, Key, MouseButtonState, PointerButtonEvent, PointerMoveEvent};
use gradia_engine::paint::Color;
use gradia_engine::render::{CircleRenderer, GradientRenderer, ImageRenderer, RectRenderer, TextRenderer};
use gradia_engine::scene::{DrawList, ImageData, ZIndex};
use gradia_engine::text::{FontId, FontSystem};

use crate::backend::{EngineCanvas, ReferenceCanvas};
use crate::config::RendererKind;
use crate::controller::{GradientDemoController, PointerEvent};
use crate::mapping;
use crate::panel::{ControlPanel, PanelAction, PanelResponse, PANEL_HEIGHT};
use crate::raster;

/// Last reference raster.
///
/// `base` holds the gradient alone and is reused while `gradient`, `size`
/// and `scale` match; markers are composited onto a copy of it.
struct RasterCache {
    gradient: raster::Gradient,
    size: (u32, u32),
    scale: f32,
    base: ReferenceCanvas,
    markers: Vec<(Vec2, [u8; 3])>,
    image: ImageData,
}

impl RasterCache {
    fn matches_gradient(&self, gradient: &raster::Gradient, size: (u32, u32), scale: f32) -> bool {
        self.size == size && self.scale == scale && self.gradient == *gradient
    }
}

/// The interactive demo: control panel on top, gradient canvas below.
pub struct GradientsApp {
    controller: GradientDemoController,
    panel: ControlPanel,
    fonts: FontSystem,
    font: Option<FontId>,

    draw_list: DrawList,
    gradient_renderer: GradientRenderer,
    image_renderer: ImageRenderer,
    rect_renderer: RectRenderer,
    circle_renderer: CircleRenderer,
    text_renderer: TextRenderer,

    raster: Option<RasterCache>,
    generation: u64,
}

impl GradientsApp {
    pub fn new(controller: GradientDemoController, fonts: FontSystem, font: Option<FontId>) -> Self {
        Self {
            controller,
            panel: ControlPanel::default(),
            fonts,
            font,
            draw_list: DrawList::new(),
            gradient_renderer: GradientRenderer::new(),
            image_renderer: ImageRenderer::new(),
            rect_renderer: RectRenderer::new(),
            circle_renderer: CircleRenderer::new(),
            text_renderer: TextRenderer::new(),
            raster: None,
            generation: 0,
        }
    }

    pub fn controller(&self) -> &GradientDemoController {
        &self.controller
    }

    /// Canvas area for a window of `width × height` logical pixels.
    pub fn canvas_rect(width: f32, height: f32) -> Rect {
        Rect::new(0.0, PANEL_HEIGHT, width, (height - PANEL_HEIGHT).max(0.0))
    }

    /// Applies the window size to the panel and controller.
    fn layout(&mut self, canvas: Rect) {
        self.panel.set_width(canvas.size.x);
        self.controller.set_canvas_size(canvas.size);
    }

    /// Routes one window-space pointer event.
    ///
    /// A slider drag owns the pointer, then a control-point drag; otherwise
    /// the panel sees the event first and the canvas gets what it ignores.
    fn dispatch(&mut self, event: PointerEvent, canvas: Rect) {
        let local = to_canvas(event, canvas);

        if !self.panel.is_capturing() && self.controller.interaction().is_dragging() {
            self.controller.on_pointer_event(local);
            return;
        }

        match self.panel.on_pointer(event, self.controller.config()) {
            PanelResponse::Action(action) => self.apply(action),
            PanelResponse::Consumed => {}
            PanelResponse::Ignored => self.controller.on_pointer_event(local),
        }
    }

    fn apply(&mut self, action: PanelAction) {
        let c = &mut self.controller;
        match action {
            PanelAction::SelectRenderer(r) => c.on_renderer_selected(r),
            PanelAction::SelectGradientKind(k) => c.on_gradient_kind_changed(k),
            PanelAction::SelectExtendMode(m) => c.on_extend_mode_changed(m),
            PanelAction::SetParameter(v) => c.on_parameter_changed(v),
            PanelAction::SetStopChannel { stop, channel, value } => c.on_stop_channel_changed(stop, channel, value),
            PanelAction::SetDither(on) => c.on_dither_toggled(on),
            PanelAction::Randomize => c.on_randomize_control_points(),
        }
    }

    /// Reference raster for the canvas.
    ///
    /// The gradient is rasterized again only when the mapped gradient or the
    /// pixel size changes. Marker changes redraw the markers over a copy of
    /// the cached gradient. A new generation is issued only for new pixels.
    fn reference_image(&mut self, canvas: Rect, scale: f32, repaint: bool) -> Option<ImageData> {
        let size = ((canvas.size.x * scale).round() as u32, (canvas.size.y * scale).round() as u32);
        if size.0 == 0 || size.1 == 0 {
            return None;
        }

        let gradient = mapping::reference_gradient(self.controller.config());
        let cached = self.raster.take().filter(|r| r.matches_gradient(&gradient, size, scale));
        let markers = self.controller.markers();

        if let Some(cache) = cached.as_ref() {
            if !repaint || cache.markers == markers {
                let image = cache.image.clone();
                self.raster = cached;
                return Some(image);
            }
        }

        let base = match cached {
            Some(cache) => cache.base,
            None => {
                let mut base = ReferenceCanvas::new(size.0, size.1, scale);
                self.controller.render_gradient(&mut base);
                log::debug!("reference gradient rasterized at {}x{}", size.0, size.1);
                base
            }
        };

        let mut composed = base.clone();
        self.controller.render_markers(&mut composed);
        self.generation = self.generation.wrapping_add(1);
        let image = composed.into_image_data(self.generation)?;
        log::trace!("reference raster generation {}", self.generation);

        self.raster = Some(RasterCache { gradient, size, scale, base, markers, image: image.clone() });
        Some(image)
    }

    /// Records the panel and the canvas for this frame.
    fn build_scene(&mut self, canvas: Rect, scale: f32) {
        let repaint = self.controller.take_repaint_request();

        self.draw_list.clear();
        self.panel.paint(
            &mut self.draw_list,
            &self.fonts,
            self.font,
            self.controller.config(),
            self.controller.renderer(),
        );

        match self.controller.renderer() {
            RendererKind::Engine => {
                let mut target = EngineCanvas::new(&mut self.draw_list, canvas);
                self.controller.render(&mut target);
            }
            RendererKind::Reference => {
                if let Some(image) = self.reference_image(canvas, scale, repaint) {
                    self.draw_list.push_image(ZIndex::BACKGROUND, canvas, image);
                }
            }
        }
    }
}

impl App for GradientsApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            log::info!("escape pressed, closing");
            return AppControl::Exit;
        }

        let viewport = ctx.window.viewport();
        let scale = ctx.window.scale_factor();
        let canvas = Self::canvas_rect(viewport.width, viewport.height);
        self.layout(canvas);

        for ev in &ctx.input_frame.events {
            if let Some(event) = pointer_event(ev) {
                self.dispatch(event, canvas);
            }
        }

        self.build_scene(canvas, scale);

        let list = &mut self.draw_list;
        let fonts = &self.fonts;
        let r_g = &mut self.gradient_renderer;
        let r_i = &mut self.image_renderer;
        let r_r = &mut self.rect_renderer;
        let r_c = &mut self.circle_renderer;
        let r_t = &mut self.text_renderer;

        ctx.render(Color::from_rgb8(0x18, 0x19, 0x1c), |rctx, target| {
            r_g.render(rctx, target, list);
            r_i.render(rctx, target, list);
            r_r.render(rctx, target, list);
            r_c.render(rctx, target, list);
            r_t.render(rctx, target, list, fonts);
        })
    }
}

fn pointer_event(ev: &InputEvent) -> Option<PointerEvent> {
    match *ev {
        InputEvent::PointerMoved(PointerMoveEvent { x, y }) => Some(PointerEvent::Moved { pos: Vec2::new(x, y) }),
        InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, .. }) => {
            let pos = Vec2::new(x, y);
            Some(match state {
                MouseButtonState::Pressed => PointerEvent::Pressed { pos, button },
                MouseButtonState::Released => PointerEvent::Released { pos, button },
            })
        }
        _ => None,
    }
}

fn to_canvas(event: PointerEvent, canvas: Rect) -> PointerEvent {
    match event {
        PointerEvent::Pressed { pos, button } => PointerEvent::Pressed { pos: canvas.to_local(pos), button },
        PointerEvent::Released { pos, button } => PointerEvent::Released { pos: canvas.to_local(pos), button },
        PointerEvent::Moved { pos } => PointerEvent::Moved { pos: canvas.to_local(pos) },
    }
}
