use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{draw_clipped_runs, QuadPipeline};

/// Renderer for `DrawCmd::Circle`.
///
/// The fill covers the disc inside the border; the border is an AA ring on the
/// inner edge of `radius`. A transparent fill with a border draws an outline.
pub struct CircleRenderer {
    quads: QuadPipeline,
    instances: Vec<CircleInstance>,
    clips: Vec<Option<Rect>>,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self { quads: QuadPipeline::new("circle"), instances: Vec::new(), clips: Vec::new() }
    }
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.instances.clear();
        self.clips.clear();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Circle(cmd) = &item.cmd else { continue };
            if cmd.radius <= 0.0 || !cmd.center.is_finite() {
                continue;
            }

            let (border_width, border_color) = match &cmd.border {
                Some(b) => (b.width.clamp(0.0, cmd.radius), b.color.to_array()),
                None => (0.0, [0.0; 4]),
            };

            self.instances.push(CircleInstance {
                center: [cmd.center.x, cmd.center.y],
                radius_bw: [cmd.radius, border_width],
                fill: cmd.fill.to_array(),
                border_color,
            });
            self.clips.push(item.clip_rect);
        }

        if self.instances.is_empty() {
            return;
        }

        self.quads.ensure(ctx, include_str!("shaders/circle.wgsl"), CircleInstance::layout(), &[]);
        self.quads.upload(ctx, &self.instances);

        let Some(mut rpass) = self.quads.begin_pass(target) else { return };
        draw_clipped_runs(&mut rpass, ctx, &self.clips);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  center       [f32; 2]   loc 1
///  offset  8  radius_bw    [f32; 2]   loc 2  (.x = radius, .y = border width)
///  offset 16  fill         [f32; 4]   loc 3
///  offset 32  border_color [f32; 4]   loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radius_bw: [f32; 2],
    fill: [f32; 4],
    border_color: [f32; 4],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // radius_bw
        3 => Float32x4, // fill
        4 => Float32x4  // border_color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
