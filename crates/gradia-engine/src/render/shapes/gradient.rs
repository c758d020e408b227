use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::paint::{Gradient, GradientQuality, SpreadMode};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{draw_clipped_runs, straight_srgb, QuadPipeline};

const KIND_LINEAR: u32 = 0;
const KIND_RADIAL: u32 = 1;
const KIND_CONIC: u32 = 2;

/// Renderer for `DrawCmd::Gradient`.
///
/// Evaluates linear, focal radial and conic gradients per fragment. Stops are
/// interpolated in sRGB space; `GradientQuality::Dither` adds a 4×4 ordered
/// dither before the 8-bit store. Only the first and last stop are used.
pub struct GradientRenderer {
    quads: QuadPipeline,
    instances: Vec<GradientInstance>,
    clips: Vec<Option<Rect>>,
    warned_multi_stop: bool,
}

impl Default for GradientRenderer {
    fn default() -> Self {
        Self {
            quads: QuadPipeline::new("gradient"),
            instances: Vec::new(),
            clips: Vec::new(),
            warned_multi_stop: false,
        }
    }
}

impl GradientRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.instances.clear();
        self.clips.clear();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Gradient(cmd) = &item.cmd else { continue };
            let rect = cmd.rect.normalized();
            if rect.is_empty() {
                continue;
            }
            if !cmd.gradient.is_valid() {
                log::warn!("skipping invalid gradient: {:?}", cmd.gradient);
                continue;
            }
            if cmd.gradient.stops().len() > 2 && !self.warned_multi_stop {
                log::debug!("only 2-stop gradients supported; using first and last stop");
                self.warned_multi_stop = true;
            }
            let Some(instance) = GradientInstance::build(rect, &cmd.gradient, cmd.quality) else { continue };

            self.instances.push(instance);
            self.clips.push(item.clip_rect);
        }

        if self.instances.is_empty() {
            return;
        }

        self.quads.ensure(ctx, include_str!("shaders/gradient.wgsl"), GradientInstance::layout(), &[]);
        self.quads.upload(ctx, &self.instances);

        let Some(mut rpass) = self.quads.begin_pass(target) else { return };
        draw_clipped_runs(&mut rpass, ctx, &self.clips);
    }
}

fn spread_code(spread: SpreadMode) -> u32 {
    match spread {
        SpreadMode::Pad => 0,
        SpreadMode::Repeat => 1,
        SpreadMode::Reflect => 2,
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (96 bytes):
///
///  offset  0  rect    [f32; 4]   loc 1  (x, y, w, h)
///  offset 16  p0      [f32; 2]   loc 2  (linear start, radial/conic center)
///  offset 24  p1      [f32; 2]   loc 3  (linear end, radial focal)
///  offset 32  params  [f32; 4]   loc 4  (radius, angle, t0, t1)
///  offset 48  mode    [u32; 4]   loc 5  (kind, spread, dither, 0)
///  offset 64  color0  [f32; 4]   loc 6  straight, rgb sRGB-encoded
///  offset 80  color1  [f32; 4]   loc 7
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct GradientInstance {
    rect: [f32; 4],
    p0: [f32; 2],
    p1: [f32; 2],
    params: [f32; 4],
    mode: [u32; 4],
    color0: [f32; 4],
    color1: [f32; 4],
}

impl GradientInstance {
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        1 => Float32x4, // rect
        2 => Float32x2, // p0
        3 => Float32x2, // p1
        4 => Float32x4, // params
        5 => Uint32x4,  // mode
        6 => Float32x4, // color0
        7 => Float32x4  // color1
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GradientInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn build(rect: Rect, gradient: &Gradient, quality: GradientQuality) -> Option<Self> {
        let stops = gradient.stops();
        let first = stops.first()?;
        let last = stops.last()?;

        let (kind, p0, p1, radius, angle) = match gradient {
            Gradient::Linear(g) => (KIND_LINEAR, g.start, g.end, 0.0, 0.0),
            Gradient::Radial(g) => (KIND_RADIAL, g.center, g.effective_focal(), g.radius, 0.0),
            Gradient::Conic(g) => (KIND_CONIC, g.center, g.center, 0.0, g.angle),
        };

        Some(Self {
            rect: [rect.origin.x, rect.origin.y, rect.size.x, rect.size.y],
            p0: [p0.x, p0.y],
            p1: [p1.x, p1.y],
            params: [radius, angle, first.t, last.t],
            mode: [
                kind,
                spread_code(gradient.spread()),
                u32::from(quality == GradientQuality::Dither),
                0,
            ],
            color0: straight_srgb(first.color),
            color1: straight_srgb(last.color),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::{Color, ColorStop, ConicGradient, RadialGradient};

    fn stops() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.0, Color::from_rgb8(0, 0, 0)),
            ColorStop::new(1.0, Color::from_rgb8(255, 255, 255)),
        ]
    }

    #[test]
    fn instance_is_packed() {
        assert_eq!(std::mem::size_of::<GradientInstance>(), 96);
    }

    #[test]
    fn radial_instance_uses_clamped_focal_and_dither_flag() {
        let g: Gradient = RadialGradient::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            10.0,
            stops(),
            SpreadMode::Reflect,
        )
        .into();
        let inst = GradientInstance::build(Rect::new(0.0, 0.0, 5.0, 5.0), &g, GradientQuality::Dither)
            .expect("instance");
        assert_eq!(inst.mode, [KIND_RADIAL, 2, 1, 0]);
        assert!((inst.p1[0] - 9.9).abs() < 1e-4);
        assert_eq!(inst.params[0], 10.0);
    }

    #[test]
    fn conic_instance_carries_angle_and_repeat() {
        let g: Gradient = ConicGradient::new(Vec2::new(3.0, 4.0), std::f32::consts::PI, stops()).into();
        let inst = GradientInstance::build(Rect::new(0.0, 0.0, 5.0, 5.0), &g, GradientQuality::Smooth)
            .expect("instance");
        assert_eq!(inst.mode, [KIND_CONIC, 1, 0, 0]);
        assert_eq!(inst.params[1], std::f32::consts::PI);
        assert!(inst.color1.iter().all(|c| (c - 1.0).abs() < 1e-5));
    }
}
