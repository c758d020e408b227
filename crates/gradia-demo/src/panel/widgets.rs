use gradia_engine::coords::{Rect, Vec2};
use gradia_engine::paint::Color;
use gradia_engine::scene::{Border, DrawList, ZIndex};
use gradia_engine::text::{FontId, FontSystem};

pub const FONT_SIZE: f32 = 12.0;

const THUMB_RADIUS: f32 = 6.0;
const TRACK_HEIGHT: f32 = 4.0;
const CHECK_BOX: f32 = 14.0;

fn panel_bg() -> Color {
    Color::from_rgb8(0x24, 0x26, 0x2b)
}

fn control_bg() -> Color {
    Color::from_rgb8(0x34, 0x37, 0x3e)
}

fn control_border() -> Color {
    Color::from_rgb8(0x55, 0x5a, 0x66)
}

fn accent() -> Color {
    Color::from_rgb8(0x2f, 0x80, 0xed)
}

fn label_color() -> Color {
    Color::from_rgb8(0xdd, 0xdf, 0xe4)
}

/// Thin drawing helper over a [`DrawList`] for panel widgets.
///
/// Text is skipped when no font is loaded.
pub struct PanelPainter<'a> {
    list: &'a mut DrawList,
    fonts: &'a FontSystem,
    font: Option<FontId>,
}

impl<'a> PanelPainter<'a> {
    pub fn new(list: &'a mut DrawList, fonts: &'a FontSystem, font: Option<FontId>) -> Self {
        Self { list, fonts, font }
    }

    pub fn background(&mut self, rect: Rect) {
        self.list.push_solid_rect(ZIndex::BACKGROUND, rect, panel_bg());
    }

    fn boxed(&mut self, rect: Rect, fill: Color) {
        self.list.push_rect(ZIndex::default(), rect, fill, Some(Border::new(1.0, control_border())));
    }

    /// Text vertically centered in `rect`, left-aligned or centered.
    fn label(&mut self, rect: Rect, text: &str, centered: bool) {
        let Some(font) = self.font else { return };
        let size = self.fonts.measure_text(text, font, FONT_SIZE);
        let x = if centered { rect.center().x - size.x * 0.5 } else { rect.origin.x };
        let origin = Vec2::new(x.round(), (rect.center().y - size.y * 0.5).round());
        self.list.push_text(ZIndex::OVERLAY, text, font, FONT_SIZE, label_color(), origin);
    }

    pub fn text(&mut self, rect: Rect, text: &str) {
        self.label(rect, text, false);
    }
}

/// A row of equally sized, mutually exclusive buttons.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segments {
    pub rect: Rect,
    pub count: usize,
}

impl Segments {
    pub fn new(origin: Vec2, segment_width: f32, height: f32, count: usize) -> Self {
        Self { rect: Rect::new(origin.x, origin.y, segment_width * count as f32, height), count }
    }

    fn segment_width(&self) -> f32 {
        self.rect.size.x / self.count.max(1) as f32
    }

    pub fn segment_rect(&self, i: usize) -> Rect {
        let w = self.segment_width();
        Rect::new(self.rect.origin.x + w * i as f32, self.rect.origin.y, w, self.rect.size.y)
    }

    pub fn hit(&self, pos: Vec2) -> Option<usize> {
        if !self.rect.contains(pos) {
            return None;
        }
        let i = ((pos.x - self.rect.origin.x) / self.segment_width()) as usize;
        Some(i.min(self.count.saturating_sub(1)))
    }

    pub fn paint(&self, painter: &mut PanelPainter<'_>, labels: &[&str], selected: usize) {
        for (i, label) in labels.iter().enumerate().take(self.count) {
            let r = self.segment_rect(i);
            painter.boxed(r, if i == selected { accent() } else { control_bg() });
            painter.label(r, label, true);
        }
    }
}

/// Horizontal slider over the integer range `0..=max`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Slider {
    pub rect: Rect,
    pub max: u16,
    pub color: [u8; 3],
}

impl Slider {
    /// Value under the pointer x coordinate, clamped to the track.
    pub fn value_at(&self, x: f32) -> u16 {
        let w = self.rect.size.x.max(1.0);
        let t = ((x - self.rect.origin.x) / w).clamp(0.0, 1.0);
        (t * f32::from(self.max)).round() as u16
    }

    pub fn thumb_x(&self, value: u16) -> f32 {
        let t = f32::from(value.min(self.max)) / f32::from(self.max.max(1));
        self.rect.origin.x + t * self.rect.size.x
    }

    pub fn paint(&self, painter: &mut PanelPainter<'_>, value: u16) {
        let cy = self.rect.center().y;
        let track = Rect::new(self.rect.origin.x, cy - TRACK_HEIGHT * 0.5, self.rect.size.x, TRACK_HEIGHT);
        painter.list.push_solid_rect(ZIndex::default(), track, control_bg());

        let [r, g, b] = self.color;
        let fill_color = Color::from_rgb8(r, g, b);
        let thumb_x = self.thumb_x(value);
        let fill = Rect::new(track.origin.x, track.origin.y, thumb_x - track.origin.x, TRACK_HEIGHT);
        if !fill.is_empty() {
            painter.list.push_solid_rect(ZIndex::default(), fill, fill_color);
        }
        painter.list.push_circle(
            ZIndex::default(),
            Vec2::new(thumb_x, cy),
            THUMB_RADIUS,
            label_color(),
            Some(Border::new(2.0, fill_color)),
        );
    }
}

/// Checkbox with a trailing label; the whole rect is clickable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Checkbox {
    pub rect: Rect,
}

impl Checkbox {
    pub fn paint(&self, painter: &mut PanelPainter<'_>, label: &str, checked: bool) {
        let o = self.rect.origin;
        let b = Rect::new(o.x, self.rect.center().y - CHECK_BOX * 0.5, CHECK_BOX, CHECK_BOX);
        painter.boxed(b, control_bg());
        if checked {
            painter.list.push_solid_rect(ZIndex::default(), b.inset(3.0), accent());
        }
        let text = Rect::new(o.x + CHECK_BOX + 6.0, o.y, self.rect.size.x - CHECK_BOX - 6.0, self.rect.size.y);
        painter.label(text, label, false);
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Button {
    pub rect: Rect,
}

impl Button {
    pub fn paint(&self, painter: &mut PanelPainter<'_>, label: &str) {
        painter.boxed(self.rect, control_bg());
        painter.label(self.rect, label, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_hit_by_x() {
        let s = Segments::new(Vec2::new(10.0, 0.0), 50.0, 20.0, 3);
        assert_eq!(s.hit(Vec2::new(10.0, 5.0)), Some(0));
        assert_eq!(s.hit(Vec2::new(65.0, 5.0)), Some(1));
        assert_eq!(s.hit(Vec2::new(159.0, 5.0)), Some(2));
        assert_eq!(s.hit(Vec2::new(160.0, 5.0)), None);
        assert_eq!(s.segment_rect(2), Rect::new(110.0, 0.0, 50.0, 20.0));
    }

    #[test]
    fn slider_value_tracks_pointer_and_clamps() {
        let s = Slider { rect: Rect::new(100.0, 0.0, 200.0, 20.0), max: 720, color: [0, 0, 0] };
        assert_eq!(s.value_at(100.0), 0);
        assert_eq!(s.value_at(200.0), 360);
        assert_eq!(s.value_at(1000.0), 720);
        assert_eq!(s.value_at(-5.0), 0);
        assert_eq!(s.thumb_x(360), 200.0);
    }

    #[test]
    fn painting_without_font_skips_text() {
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        let mut painter = PanelPainter::new(&mut list, &fonts, None);
        Button { rect: Rect::new(0.0, 0.0, 60.0, 22.0) }.paint(&mut painter, "Random");
        assert_eq!(list.len(), 1);
    }
}
