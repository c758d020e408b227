use gradia_engine::coords::Vec2;
use gradia_engine::input::MouseButton;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::config::{
    Channel, ExtendMode, GradientConfig, GradientKind, RendererKind, HIT_THRESHOLD, MARKER_HIGHLIGHT,
    MARKER_NORMAL,
};
use crate::interaction::{self, InteractionState};
use crate::mapping;

/// Pointer input in canvas-local logical coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Pressed { pos: Vec2, button: MouseButton },
    Released { pos: Vec2, button: MouseButton },
    Moved { pos: Vec2 },
}

/// Owns the gradient configuration and pointer interaction of the demo.
///
/// Every operation that changes what the canvas shows records a repaint
/// request; the application polls it with [`take_repaint_request`].
///
/// [`take_repaint_request`]: GradientDemoController::take_repaint_request
#[derive(Debug)]
pub struct GradientDemoController {
    config: GradientConfig,
    interaction: InteractionState,
    renderer: RendererKind,
    rng: StdRng,
    canvas_size: Vec2,
    repaint: bool,
}

impl GradientDemoController {
    /// `seed` makes [`on_randomize_control_points`] deterministic; `None`
    /// seeds from the OS.
    ///
    /// [`on_randomize_control_points`]: Self::on_randomize_control_points
    pub fn new(config: GradientConfig, renderer: RendererKind, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            interaction: InteractionState::default(),
            renderer,
            rng,
            canvas_size: Vec2::new(700.0, 528.0),
            repaint: true,
        }
    }

    #[inline]
    pub fn config(&self) -> &GradientConfig {
        &self.config
    }

    #[inline]
    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    #[inline]
    pub fn renderer(&self) -> RendererKind {
        self.renderer
    }

    #[inline]
    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    /// Canvas bounds used by randomization.
    pub fn set_canvas_size(&mut self, size: Vec2) {
        if size != self.canvas_size {
            self.canvas_size = size;
            self.repaint = true;
        }
    }

    /// Returns and clears the pending repaint request.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }

    #[inline]
    fn request_repaint(&mut self) {
        self.repaint = true;
    }

    pub fn on_renderer_selected(&mut self, renderer: RendererKind) {
        log::debug!("renderer -> {renderer:?}");
        self.renderer = renderer;
        self.request_repaint();
    }

    pub fn on_gradient_kind_changed(&mut self, kind: GradientKind) {
        log::debug!("gradient kind -> {kind:?}");
        self.config.kind = kind;
        self.interaction.retain_below(kind.control_point_count());
        self.request_repaint();
    }

    pub fn on_extend_mode_changed(&mut self, mode: ExtendMode) {
        log::debug!("extend mode -> {mode:?}");
        self.config.extend_mode = mode;
        self.request_repaint();
    }

    pub fn on_parameter_changed(&mut self, value: u16) {
        self.config.set_parameter(value);
        log::debug!("parameter -> {}", self.config.parameter());
        self.request_repaint();
    }

    /// Sets one RGB channel of stop 0 or 1; other stop indices are ignored.
    pub fn on_stop_channel_changed(&mut self, stop: usize, channel: Channel, value: u8) {
        let Some(rgb) = self.config.stops.get_mut(stop) else {
            log::warn!("ignoring change to missing stop {stop}");
            return;
        };
        rgb[channel.index()] = value;
        log::debug!("stop {stop} {channel:?} -> {value}");
        self.request_repaint();
    }

    pub fn on_dither_toggled(&mut self, enabled: bool) {
        log::debug!("dither -> {enabled}");
        self.config.dither = enabled;
        self.request_repaint();
    }

    /// Moves both stored points to uniform positions inside the canvas.
    pub fn on_randomize_control_points(&mut self) {
        let w = self.canvas_size.x.max(1.0);
        let h = self.canvas_size.y.max(1.0);
        let points = [(); 2].map(|_| Vec2::new(self.random_coord(w), self.random_coord(h)));
        log::debug!("randomized control points -> {points:?}");
        self.config.set_stored_points(points);
        self.request_repaint();
    }

    /// `(u / 65535) * (extent - 1) + 0.5` for a uniform 16-bit `u`.
    fn random_coord(&mut self, extent: f32) -> f32 {
        let u = self.rng.gen_range(0..=u16::MAX);
        (f64::from(u) / f64::from(u16::MAX) * f64::from(extent - 1.0) + 0.5) as f32
    }

    pub fn on_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Pressed { button: MouseButton::Left, .. } => {
                let Some(closest) = self.interaction.closest else { return };
                log::debug!("grabbed control point {closest}");
                self.interaction.grabbed = Some(closest);
                self.request_repaint();
            }
            PointerEvent::Released { button: MouseButton::Left, .. } => {
                let Some(grabbed) = self.interaction.grabbed.take() else { return };
                log::debug!("released control point {grabbed}");
                self.request_repaint();
            }
            PointerEvent::Moved { pos } => {
                match self.interaction.grabbed {
                    Some(index) => {
                        self.config.set_point(index, pos);
                    }
                    None => {
                        self.interaction.closest = self.closest_control_point(pos, HIT_THRESHOLD);
                    }
                }
                self.request_repaint();
            }
            PointerEvent::Pressed { .. } | PointerEvent::Released { .. } => {}
        }
    }

    /// Index of the active control point nearest to `point`, if closer than
    /// `max_distance`.
    pub fn closest_control_point(&self, point: Vec2, max_distance: f32) -> Option<usize> {
        interaction::closest_control_point(self.config.active_points(), point, max_distance)
    }

    /// Active control points with their marker colors.
    pub fn markers(&self) -> Vec<(Vec2, [u8; 3])> {
        self.config
            .active_points()
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let color = if self.interaction.closest == Some(i) { MARKER_HIGHLIGHT } else { MARKER_NORMAL };
                (p, color)
            })
            .collect()
    }

    /// Fills `canvas` with the current gradient and marks the active points.
    pub fn render<C: Canvas>(&self, canvas: &mut C) {
        self.render_gradient(canvas);
        self.render_markers(canvas);
    }

    pub fn render_gradient<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_quality(mapping::engine_quality(&self.config));
        canvas.fill_gradient(&self.config);
    }

    pub fn render_markers<C: Canvas>(&self, canvas: &mut C) {
        for (p, color) in self.markers() {
            canvas.draw_marker(p, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Marker;
    use crate::interaction::PointerPhase;
    use gradia_engine::paint::GradientQuality;

    fn controller() -> GradientDemoController {
        let mut c = GradientDemoController::new(GradientConfig::default(), RendererKind::Engine, Some(7));
        c.take_repaint_request();
        c
    }

    fn press(c: &mut GradientDemoController, pos: Vec2) {
        c.on_pointer_event(PointerEvent::Pressed { pos, button: MouseButton::Left });
    }

    fn release(c: &mut GradientDemoController, pos: Vec2) {
        c.on_pointer_event(PointerEvent::Released { pos, button: MouseButton::Left });
    }

    fn move_to(c: &mut GradientDemoController, pos: Vec2) {
        c.on_pointer_event(PointerEvent::Moved { pos });
    }

    #[test]
    fn hover_press_drag_release() {
        let mut c = controller();
        move_to(&mut c, Vec2::new(352.0, 301.0));
        assert_eq!(c.interaction().phase(), PointerPhase::Hovering(0));
        assert!(c.take_repaint_request());

        press(&mut c, Vec2::new(352.0, 301.0));
        assert_eq!(c.interaction().phase(), PointerPhase::Dragging(0));
        assert!(c.take_repaint_request());

        move_to(&mut c, Vec2::new(10.0, 20.0));
        assert_eq!(c.config().active_points()[0], Vec2::new(10.0, 20.0));
        assert_eq!(c.interaction().phase(), PointerPhase::Dragging(0));
        assert!(c.take_repaint_request());

        release(&mut c, Vec2::new(10.0, 20.0));
        assert!(!c.interaction().is_dragging());
        assert!(c.take_repaint_request());
    }

    #[test]
    fn every_move_records_a_repaint() {
        let mut c = controller();
        // Nothing near this point, so the interaction state does not change.
        move_to(&mut c, Vec2::new(600.0, 20.0));
        assert_eq!(c.interaction(), InteractionState::default());
        assert!(c.take_repaint_request());

        move_to(&mut c, Vec2::new(601.0, 20.0));
        assert!(c.take_repaint_request());
        assert!(!c.take_repaint_request());
    }

    #[test]
    fn markers_follow_hover() {
        let mut c = controller();
        assert_eq!(c.markers(), vec![(Vec2::new(350.0, 300.0), MARKER_NORMAL), (Vec2::new(200.0, 150.0), MARKER_NORMAL)]);
        move_to(&mut c, Vec2::new(349.0, 300.0));
        assert_eq!(c.markers()[0], (Vec2::new(350.0, 300.0), MARKER_HIGHLIGHT));
    }

    #[test]
    fn press_without_closest_point_is_a_no_op() {
        let mut c = controller();
        move_to(&mut c, Vec2::new(0.0, 0.0));
        c.take_repaint_request();

        press(&mut c, Vec2::new(0.0, 0.0));
        assert_eq!(c.interaction(), InteractionState::default());
        assert!(!c.take_repaint_request());

        release(&mut c, Vec2::new(0.0, 0.0));
        assert!(!c.take_repaint_request());
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut c = controller();
        move_to(&mut c, Vec2::new(350.0, 300.0));
        c.on_pointer_event(PointerEvent::Pressed { pos: Vec2::new(350.0, 300.0), button: MouseButton::Right });
        assert!(!c.interaction().is_dragging());
    }

    #[test]
    fn dragging_changes_only_the_grabbed_point() {
        let mut c = controller();
        move_to(&mut c, Vec2::new(200.0, 150.0));
        press(&mut c, Vec2::new(200.0, 150.0));
        let before = c.config().clone();

        move_to(&mut c, Vec2::new(600.0, 10.0));

        let after = c.config();
        assert_eq!(after.active_points()[0], before.active_points()[0]);
        assert_eq!(after.active_points()[1], Vec2::new(600.0, 10.0));
        assert_eq!(after.kind, before.kind);
        assert_eq!(after.extend_mode, before.extend_mode);
        assert_eq!(after.parameter(), before.parameter());
        assert_eq!(after.stops, before.stops);
        assert_eq!(after.dither, before.dither);
    }

    #[test]
    fn moves_while_dragging_do_not_rehover() {
        let mut c = controller();
        move_to(&mut c, Vec2::new(350.0, 300.0));
        press(&mut c, Vec2::new(350.0, 300.0));
        // Dragging across the other point keeps the original grab.
        move_to(&mut c, Vec2::new(200.0, 150.0));
        assert_eq!(c.interaction().grabbed, Some(0));
        assert_eq!(c.interaction().closest, Some(0));
    }

    #[test]
    fn conic_uses_one_point_and_restores_the_other() {
        let mut c = controller();
        move_to(&mut c, Vec2::new(200.0, 150.0));
        assert_eq!(c.interaction().closest, Some(1));

        c.on_gradient_kind_changed(GradientKind::Conic);
        assert_eq!(c.config().active_points().len(), 1);
        assert_eq!(c.interaction().closest, None);
        assert_eq!(c.closest_control_point(Vec2::new(200.0, 150.0), HIT_THRESHOLD), None);

        c.on_gradient_kind_changed(GradientKind::Radial);
        assert_eq!(c.config().active_points(), &[Vec2::new(350.0, 300.0), Vec2::new(200.0, 150.0)]);
    }

    #[test]
    fn randomize_stays_inside_canvas() {
        let mut c = controller();
        c.set_canvas_size(Vec2::new(700.0, 528.0));
        for _ in 0..500 {
            c.on_randomize_control_points();
            for p in c.config().stored_points() {
                assert!((0.0..700.0).contains(&p.x), "x out of range: {}", p.x);
                assert!((0.0..528.0).contains(&p.y), "y out of range: {}", p.y);
            }
        }
    }

    #[test]
    fn randomize_is_deterministic_per_seed() {
        let mut a = GradientDemoController::new(GradientConfig::default(), RendererKind::Engine, Some(42));
        let mut b = GradientDemoController::new(GradientConfig::default(), RendererKind::Engine, Some(42));
        a.on_randomize_control_points();
        b.on_randomize_control_points();
        assert_eq!(a.config().stored_points(), b.config().stored_points());
    }

    #[test]
    fn setters_record_repaints() {
        let mut c = controller();
        c.on_extend_mode_changed(ExtendMode::Repeat);
        assert!(c.take_repaint_request());
        c.on_parameter_changed(1000);
        assert_eq!(c.config().parameter(), 720);
        assert!(c.take_repaint_request());
        c.on_stop_channel_changed(1, Channel::Green, 12);
        assert_eq!(c.config().stops[1], [255, 12, 255]);
        assert!(c.take_repaint_request());
        c.on_stop_channel_changed(2, Channel::Red, 1);
        assert!(!c.take_repaint_request());
        c.on_renderer_selected(RendererKind::Reference);
        assert_eq!(c.renderer(), RendererKind::Reference);
        assert!(c.take_repaint_request());
    }

    #[derive(Default)]
    struct Recorder {
        quality: Option<GradientQuality>,
        fills: usize,
        markers: Vec<(Vec2, f32, [u8; 3])>,
    }

    impl Canvas for Recorder {
        const MARKER: Marker = Marker::Fill(2.0);

        fn set_quality(&mut self, quality: GradientQuality) {
            self.quality = Some(quality);
        }

        fn fill_gradient(&mut self, _config: &GradientConfig) {
            self.fills += 1;
        }

        fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _color: [u8; 3]) {
            unreachable!("fill markers only");
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: [u8; 3]) {
            self.markers.push((center, radius, color));
        }
    }

    #[test]
    fn render_fills_then_marks_points_with_highlight() {
        let mut c = controller();
        c.on_dither_toggled(true);
        move_to(&mut c, Vec2::new(201.0, 151.0));

        let mut canvas = Recorder::default();
        c.render(&mut canvas);

        assert_eq!(canvas.fills, 1);
        assert_eq!(canvas.quality, Some(GradientQuality::Dither));
        assert_eq!(
            canvas.markers,
            vec![
                (Vec2::new(350.0, 300.0), 2.0, MARKER_NORMAL),
                (Vec2::new(200.0, 150.0), 2.0, MARKER_HIGHLIGHT),
            ]
        );
    }
}
