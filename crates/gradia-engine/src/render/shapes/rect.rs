use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{draw_clipped_runs, QuadPipeline};

/// Renderer for `DrawCmd::Rect`: solid fill with an optional inner border.
pub struct RectRenderer {
    quads: QuadPipeline,
    instances: Vec<RectInstance>,
    clips: Vec<Option<Rect>>,
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self { quads: QuadPipeline::new("rect"), instances: Vec::new(), clips: Vec::new() }
    }
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.instances.clear();
        self.clips.clear();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Rect(cmd) = &item.cmd else { continue };
            let rect = cmd.rect.normalized();
            if rect.is_empty() {
                continue;
            }

            let half_min = 0.5 * rect.size.x.min(rect.size.y);
            let (border_width, border_color) = match &cmd.border {
                Some(b) => (b.width.clamp(0.0, half_min), b.color.to_array()),
                None => (0.0, [0.0; 4]),
            };

            self.instances.push(RectInstance {
                rect: [rect.origin.x, rect.origin.y, rect.size.x, rect.size.y],
                fill: cmd.fill.to_array(),
                border_color,
                border_width: [border_width, 0.0],
                _pad: [0.0; 2],
            });
            self.clips.push(item.clip_rect);
        }

        if self.instances.is_empty() {
            return;
        }

        self.quads.ensure(ctx, include_str!("shaders/rect.wgsl"), RectInstance::layout(), &[]);
        self.quads.upload(ctx, &self.instances);

        let Some(mut rpass) = self.quads.begin_pass(target) else { return };
        draw_clipped_runs(&mut rpass, ctx, &self.clips);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (64 bytes):
///
///  offset  0  rect          [f32; 4]   loc 1  (x, y, w, h)
///  offset 16  fill          [f32; 4]   loc 2
///  offset 32  border_color  [f32; 4]   loc 3
///  offset 48  border_width  [f32; 2]   loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    rect: [f32; 4],
    fill: [f32; 4],
    border_color: [f32; 4],
    border_width: [f32; 2],
    _pad: [f32; 2],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x4, // rect
        2 => Float32x4, // fill
        3 => Float32x4, // border_color
        4 => Float32x2  // border_width
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
