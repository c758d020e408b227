//! Control panel above the canvas.
//!
//! The panel owns no gradient state: it paints from the current
//! [`GradientConfig`] and turns pointer input into [`PanelAction`]s that the
//! application forwards to the controller.

mod widgets;

use gradia_engine::coords::{Rect, Vec2};
use gradia_engine::input::MouseButton;
use gradia_engine::scene::DrawList;
use gradia_engine::text::{FontId, FontSystem};

use crate::config::{Channel, ExtendMode, GradientConfig, GradientKind, RendererKind, PARAMETER_MAX};
use crate::controller::PointerEvent;

use widgets::{Button, Checkbox, PanelPainter, Segments, Slider};

/// Height of the panel in logical pixels.
pub const PANEL_HEIGHT: f32 = 122.0;

const MARGIN: f32 = 8.0;
const GAP: f32 = 10.0;
const ROW_HEIGHT: f32 = 22.0;
const ROW_Y: [f32; 4] = [8.0, 36.0, 64.0, 92.0];
const LABEL_WIDTH: f32 = 72.0;
const VALUE_WIDTH: f32 = 36.0;

const RENDERER_SEGMENT: f32 = 70.0;
const CHOICE_SEGMENT: f32 = 56.0;
const CHECKBOX_WIDTH: f32 = 64.0;
const BUTTON_WIDTH: f32 = 60.0;

const CHANNEL_COLORS: [[u8; 3]; 3] = [[0xe0, 0x40, 0x40], [0x40, 0xc0, 0x40], [0x40, 0x70, 0xe0]];

/// A user request coming out of the panel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PanelAction {
    SelectRenderer(RendererKind),
    SelectGradientKind(GradientKind),
    SelectExtendMode(ExtendMode),
    SetParameter(u16),
    SetStopChannel { stop: usize, channel: Channel, value: u8 },
    SetDither(bool),
    Randomize,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PanelResponse {
    /// The event is not for the panel.
    Ignored,
    /// The panel used the event without changing anything.
    Consumed,
    Action(PanelAction),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SliderId {
    Parameter,
    Stop { stop: usize, channel: Channel },
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Layout {
    bounds: Rect,
    renderers: Segments,
    kinds: Segments,
    extends: Segments,
    dither: Checkbox,
    randomize: Button,
    parameter: Slider,
    parameter_value: Rect,
    stops: [[Slider; 3]; 2],
}

impl Layout {
    fn new(width: f32) -> Self {
        let row = |i: usize, x: f32, w: f32| Rect::new(x, ROW_Y[i], w, ROW_HEIGHT);

        let renderers = Segments::new(Vec2::new(MARGIN, ROW_Y[0]), RENDERER_SEGMENT, ROW_HEIGHT, RendererKind::ALL.len());
        let kinds = Segments::new(
            Vec2::new(renderers.rect.max().x + GAP, ROW_Y[0]),
            CHOICE_SEGMENT,
            ROW_HEIGHT,
            GradientKind::ALL.len(),
        );
        let extends = Segments::new(
            Vec2::new(kinds.rect.max().x + GAP, ROW_Y[0]),
            CHOICE_SEGMENT,
            ROW_HEIGHT,
            ExtendMode::ALL.len(),
        );
        let dither = Checkbox { rect: row(0, extends.rect.max().x + GAP, CHECKBOX_WIDTH) };
        let randomize = Button { rect: row(0, dither.rect.max().x + GAP, BUTTON_WIDTH) };

        let controls_x = MARGIN + LABEL_WIDTH + GAP;
        let controls_w = (width - controls_x - MARGIN).max(0.0);

        let slider_w = (controls_w - VALUE_WIDTH - GAP).max(0.0);
        let parameter = Slider { rect: row(1, controls_x, slider_w), max: PARAMETER_MAX, color: [0x2f, 0x80, 0xed] };
        let parameter_value = row(1, controls_x + slider_w + GAP, VALUE_WIDTH);

        let channel_w = ((controls_w - 2.0 * GAP) / 3.0).max(0.0);
        let stops = [0, 1].map(|stop| {
            [0, 1, 2].map(|c| Slider {
                rect: row(2 + stop, controls_x + c as f32 * (channel_w + GAP), channel_w),
                max: u16::from(u8::MAX),
                color: CHANNEL_COLORS[c],
            })
        });

        Self {
            bounds: Rect::new(0.0, 0.0, width, PANEL_HEIGHT),
            renderers,
            kinds,
            extends,
            dither,
            randomize,
            parameter,
            parameter_value,
            stops,
        }
    }

    fn slider(&self, id: SliderId) -> &Slider {
        match id {
            SliderId::Parameter => &self.parameter,
            SliderId::Stop { stop, channel } => &self.stops[stop][channel.index()],
        }
    }

    fn slider_at(&self, pos: Vec2) -> Option<SliderId> {
        // Grabbing the thumb slightly above or below the track still counts.
        let hit = |s: &Slider| s.rect.inset(-2.0).contains(pos);
        if hit(&self.parameter) {
            return Some(SliderId::Parameter);
        }
        for (stop, sliders) in self.stops.iter().enumerate() {
            for channel in Channel::ALL {
                if hit(&sliders[channel.index()]) {
                    return Some(SliderId::Stop { stop, channel });
                }
            }
        }
        None
    }
}

fn index_of<T: PartialEq>(all: &[T], value: T) -> usize {
    all.iter().position(|x| *x == value).unwrap_or(0)
}

/// Widgets of the control panel plus the slider being dragged, if any.
#[derive(Debug)]
pub struct ControlPanel {
    layout: Layout,
    dragging: Option<SliderId>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(700.0)
    }
}

impl ControlPanel {
    pub fn new(width: f32) -> Self {
        Self { layout: Layout::new(width), dragging: None }
    }

    /// Re-lays out the widgets for a new window width.
    pub fn set_width(&mut self, width: f32) {
        if self.layout.bounds.size.x != width {
            self.layout = Layout::new(width);
        }
    }

    /// True while a slider holds the pointer.
    #[inline]
    pub fn is_capturing(&self) -> bool {
        self.dragging.is_some()
    }

    /// Handles pointer input given in window coordinates.
    pub fn on_pointer(&mut self, event: PointerEvent, config: &GradientConfig) -> PanelResponse {
        match event {
            PointerEvent::Moved { pos } => match self.dragging {
                Some(id) => self.slider_changed(id, pos, config),
                None => PanelResponse::Ignored,
            },
            PointerEvent::Released { button: MouseButton::Left, .. } if self.dragging.is_some() => {
                self.dragging = None;
                PanelResponse::Consumed
            }
            PointerEvent::Pressed { pos, button: MouseButton::Left } if self.layout.bounds.contains(pos) => {
                self.press(pos, config)
            }
            PointerEvent::Pressed { pos, .. } if self.layout.bounds.contains(pos) => PanelResponse::Consumed,
            _ => PanelResponse::Ignored,
        }
    }

    fn press(&mut self, pos: Vec2, config: &GradientConfig) -> PanelResponse {
        let l = &self.layout;
        if let Some(i) = l.renderers.hit(pos) {
            return PanelResponse::Action(PanelAction::SelectRenderer(RendererKind::ALL[i]));
        }
        if let Some(i) = l.kinds.hit(pos) {
            return PanelResponse::Action(PanelAction::SelectGradientKind(GradientKind::ALL[i]));
        }
        if let Some(i) = l.extends.hit(pos) {
            return PanelResponse::Action(PanelAction::SelectExtendMode(ExtendMode::ALL[i]));
        }
        if l.dither.rect.contains(pos) {
            return PanelResponse::Action(PanelAction::SetDither(!config.dither));
        }
        if l.randomize.rect.contains(pos) {
            return PanelResponse::Action(PanelAction::Randomize);
        }
        if let Some(id) = l.slider_at(pos) {
            self.dragging = Some(id);
            return match self.slider_changed(id, pos, config) {
                PanelResponse::Ignored => PanelResponse::Consumed,
                r => r,
            };
        }
        PanelResponse::Consumed
    }

    /// Emits an action only when the value under the pointer differs.
    fn slider_changed(&self, id: SliderId, pos: Vec2, config: &GradientConfig) -> PanelResponse {
        let value = self.layout.slider(id).value_at(pos.x);
        let action = match id {
            SliderId::Parameter if value != config.parameter() => PanelAction::SetParameter(value),
            SliderId::Stop { stop, channel } => {
                let value = u8::try_from(value).unwrap_or(u8::MAX);
                if config.stops[stop][channel.index()] == value {
                    return PanelResponse::Consumed;
                }
                PanelAction::SetStopChannel { stop, channel, value }
            }
            SliderId::Parameter => return PanelResponse::Consumed,
        };
        PanelResponse::Action(action)
    }

    pub fn paint(
        &self,
        list: &mut DrawList,
        fonts: &FontSystem,
        font: Option<FontId>,
        config: &GradientConfig,
        renderer: RendererKind,
    ) {
        let l = &self.layout;
        let mut p = PanelPainter::new(list, fonts, font);
        p.background(l.bounds);

        let labels = RendererKind::ALL.map(RendererKind::label);
        l.renderers.paint(&mut p, &labels, index_of(&RendererKind::ALL, renderer));
        let labels = GradientKind::ALL.map(GradientKind::label);
        l.kinds.paint(&mut p, &labels, index_of(&GradientKind::ALL, config.kind));
        let labels = ExtendMode::ALL.map(ExtendMode::label);
        l.extends.paint(&mut p, &labels, index_of(&ExtendMode::ALL, config.extend_mode));
        l.dither.paint(&mut p, "Dither", config.dither);
        l.randomize.paint(&mut p, "Random");

        p.text(Rect::new(MARGIN, ROW_Y[1], LABEL_WIDTH, ROW_HEIGHT), "Rad/Angle");
        l.parameter.paint(&mut p, config.parameter());
        p.text(l.parameter_value, &config.parameter().to_string());

        for (stop, sliders) in l.stops.iter().enumerate() {
            p.text(Rect::new(MARGIN, ROW_Y[2 + stop], LABEL_WIDTH, ROW_HEIGHT), &format!("Stop {stop}"));
            for (slider, value) in sliders.iter().zip(config.stops[stop]) {
                slider.paint(&mut p, u16::from(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradia_engine::scene::DrawCmd;

    fn press(panel: &mut ControlPanel, x: f32, y: f32) -> PanelResponse {
        let config = GradientConfig::default();
        panel.on_pointer(PointerEvent::Pressed { pos: Vec2::new(x, y), button: MouseButton::Left }, &config)
    }

    #[test]
    fn first_row_fits_minimum_width() {
        let l = Layout::new(700.0);
        assert!(l.randomize.rect.max().x <= 700.0 - MARGIN);
        assert_eq!(l.renderers.rect, Rect::new(8.0, 8.0, 140.0, 22.0));
        assert_eq!(l.kinds.rect.origin.x, 158.0);
    }

    #[test]
    fn selectors_emit_actions() {
        let mut panel = ControlPanel::default();
        assert_eq!(press(&mut panel, 80.0, 15.0), PanelResponse::Action(PanelAction::SelectRenderer(RendererKind::Reference)));
        assert_eq!(press(&mut panel, 158.0 + 2.0 * 56.0 + 1.0, 15.0), PanelResponse::Action(PanelAction::SelectGradientKind(GradientKind::Conic)));
        assert_eq!(press(&mut panel, 336.0 + 56.0 + 1.0, 15.0), PanelResponse::Action(PanelAction::SelectExtendMode(ExtendMode::Repeat)));
    }

    #[test]
    fn dither_and_random() {
        let mut panel = ControlPanel::default();
        let l = panel.layout;
        let c = l.dither.rect.center();
        assert_eq!(press(&mut panel, c.x, c.y), PanelResponse::Action(PanelAction::SetDither(true)));
        let c = l.randomize.rect.center();
        assert_eq!(press(&mut panel, c.x, c.y), PanelResponse::Action(PanelAction::Randomize));
    }

    #[test]
    fn slider_drag_is_captured_until_release() {
        let mut panel = ControlPanel::default();
        let config = GradientConfig::default();
        let s = panel.layout.parameter;
        let y = s.rect.center().y;

        let r = press(&mut panel, s.rect.origin.x, y);
        assert_eq!(r, PanelResponse::Action(PanelAction::SetParameter(0)));
        assert!(panel.is_capturing());

        // Moving far outside the panel still drives the slider.
        let r = panel.on_pointer(PointerEvent::Moved { pos: Vec2::new(s.rect.max().x + 100.0, 500.0) }, &config);
        assert_eq!(r, PanelResponse::Consumed, "720 is already the current value");

        let r = panel.on_pointer(PointerEvent::Released { pos: Vec2::zero(), button: MouseButton::Left }, &config);
        assert_eq!(r, PanelResponse::Consumed);
        assert!(!panel.is_capturing());
    }

    #[test]
    fn stop_slider_sets_channel() {
        let mut panel = ControlPanel::default();
        let s = panel.layout.stops[1][2];
        let r = press(&mut panel, s.rect.origin.x, s.rect.center().y);
        assert_eq!(
            r,
            PanelResponse::Action(PanelAction::SetStopChannel { stop: 1, channel: Channel::Blue, value: 0 })
        );
    }

    #[test]
    fn canvas_presses_are_ignored() {
        let mut panel = ControlPanel::default();
        assert_eq!(press(&mut panel, 300.0, PANEL_HEIGHT + 10.0), PanelResponse::Ignored);
        assert_eq!(press(&mut panel, 4.0, 60.0), PanelResponse::Consumed);
    }

    #[test]
    fn paint_highlights_selection() {
        let panel = ControlPanel::default();
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        panel.paint(&mut list, &fonts, None, &GradientConfig::default(), RendererKind::Engine);

        assert!(!list.is_empty());
        assert!(list.items().iter().all(|i| !matches!(i.cmd, DrawCmd::Text(_))));
    }
}
