//! Shared GPU types and utilities used by all shape renderers.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Viewport};
use crate::render::{RenderCtx, RenderTarget};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

/// Bound at group 0 binding 0 by every shape shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    /// Logical size.
    pub viewport: [f32; 2],
    /// Physical pixels per logical pixel.
    pub scale: f32,
    /// 1 when the target encodes to sRGB on store.
    pub srgb_target: u32,
}

impl ViewportUniform {
    fn for_ctx(ctx: &RenderCtx<'_>) -> Self {
        Self {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            scale: ctx.scale_factor.max(0.01),
            srgb_target: u32::from(ctx.surface_format.is_srgb()),
        }
    }

    fn min_binding_size() -> Option<NonZeroU64> {
        NonZeroU64::new(std::mem::size_of::<Self>() as u64)
    }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a logical-pixel clip rect to physical scissor rect arguments for wgpu.
///
/// Returns `None` if the clip rect is zero-area (renderer should skip the draw call).
/// `clip = None` means "no scissor" and yields the full viewport rect.
pub(super) fn logical_clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    let phys_vw = (viewport.width * scale).max(1.0) as u32;
    let phys_vh = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, phys_vw, phys_vh),
        Some(r) => {
            let max = r.max();
            let x = ((r.origin.x * scale).max(0.0) as u32).min(phys_vw);
            let y = ((r.origin.y * scale).max(0.0) as u32).min(phys_vh);
            let x2 = ((max.x * scale).max(0.0) as u32).min(phys_vw);
            let y2 = ((max.y * scale).max(0.0) as u32).min(phys_vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

// ── instanced quad pipeline ───────────────────────────────────────────────

/// GPU state every shape renderer needs: a pipeline keyed by surface format,
/// the viewport uniform (group 0), the unit quad and a growable instance buffer.
///
/// Renderers with textures pass their own layouts as groups 1.. and bind them
/// on the pass returned by [`QuadPipeline::begin_pass`].
pub(super) struct QuadPipeline {
    label: &'static str,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl QuadPipeline {
    pub(super) const fn new(label: &'static str) -> Self {
        Self {
            label,
            pipeline_format: None,
            pipeline: None,
            viewport_bgl: None,
            viewport_ubo: None,
            viewport_bind_group: None,
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
        }
    }

    /// Builds everything that is still missing. The pipeline is rebuilt when
    /// the surface format changes.
    pub(super) fn ensure(
        &mut self,
        ctx: &RenderCtx<'_>,
        shader_src: &str,
        instance_layout: wgpu::VertexBufferLayout<'static>,
        extra_layouts: &[&wgpu::BindGroupLayout],
    ) {
        self.ensure_viewport_bindings(ctx);
        self.ensure_static_buffers(ctx);

        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(viewport_bgl) = self.viewport_bgl.as_ref() else { return };

        let label = self.label;
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("gradia {label} shader")),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let mut layouts: Vec<&wgpu::BindGroupLayout> = Vec::with_capacity(1 + extra_layouts.len());
        layouts.push(viewport_bgl);
        layouts.extend_from_slice(extra_layouts);

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("gradia {label} pipeline layout")),
            bind_group_layouts: &layouts,
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("gradia {label} pipeline")),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), instance_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("{label} pipeline built for {:?}", ctx.surface_format);
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    /// Writes the viewport uniform and the instance data, growing the buffer if needed.
    pub(super) fn upload<I: Pod>(&mut self, ctx: &RenderCtx<'_>, instances: &[I]) {
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::for_ctx(ctx)));
        }

        if instances.len() > self.instance_capacity || self.instance_vbo.is_none() {
            let new_cap = instances.len().next_power_of_two().max(64);
            self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("gradia {} instance vbo", self.label)),
                size: (new_cap * std::mem::size_of::<I>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.instance_capacity = new_cap;
        }

        if let Some(vbo) = self.instance_vbo.as_ref() {
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(instances));
        }
    }

    /// Opens a load/store pass on `target` with the pipeline, group 0 and both
    /// vertex buffers bound. Returns `None` until [`QuadPipeline::ensure`] succeeded.
    pub(super) fn begin_pass<'e>(&self, target: &'e mut RenderTarget<'_>) -> Option<wgpu::RenderPass<'e>> {
        let pipeline = self.pipeline.as_ref()?;
        let bind_group = self.viewport_bind_group.as_ref()?;
        let quad_vbo = self.quad_vbo.as_ref()?;
        let quad_ibo = self.quad_ibo.as_ref()?;
        let instance_vbo = self.instance_vbo.as_ref()?;

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&format!("gradia {} pass", self.label)),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        Some(rpass)
    }

    fn ensure_viewport_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bind_group.is_some() {
            return;
        }
        let label = self.label;

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("gradia {label} viewport bgl")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: ViewportUniform::min_binding_size(),
                },
                count: None,
            }],
        });

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("gradia {label} viewport ubo")),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("gradia {label} viewport bind group")),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() }],
        });

        self.viewport_bgl = Some(bgl);
        self.viewport_ubo = Some(ubo);
        self.viewport_bind_group = Some(bind_group);
        // Pipeline layout references the new bgl.
        self.pipeline = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("gradia {} quad vbo", self.label)),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("gradia {} quad ibo", self.label)),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Draws `clips.len()` instances, one scissored draw call per run of equal clips.
pub(super) fn draw_clipped_runs(rpass: &mut wgpu::RenderPass<'_>, ctx: &RenderCtx<'_>, clips: &[Option<Rect>]) {
    let mut i = 0usize;
    while i < clips.len() {
        let clip = clips[i];
        let mut j = i + 1;
        while j < clips.len() && clips[j] == clip {
            j += 1;
        }
        if let Some((sx, sy, sw, sh)) = logical_clip_to_scissor(clip, ctx.viewport, ctx.scale_factor) {
            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.draw_indexed(0..6, 0, i as u32..j as u32);
        }
        i = j;
    }
}

/// Converts a linear premultiplied color to the straight `[f32; 4]` the shaders expect
/// for sRGB-space interpolation (rgb sRGB-encoded, alpha linear).
pub(super) fn straight_srgb(color: crate::paint::Color) -> [f32; 4] {
    use crate::paint::linear_to_srgb;
    let (r, g, b, a) = color.to_straight();
    [linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b), a]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn no_clip_covers_physical_viewport() {
        let vp = Viewport::new(100.0, 50.0);
        assert_eq!(logical_clip_to_scissor(None, vp, 2.0), Some((0, 0, 200, 100)));
    }

    #[test]
    fn clip_is_scaled_and_clamped() {
        let vp = Viewport::new(100.0, 50.0);
        let clip = Some(Rect::new(90.0, 10.0, 40.0, 10.0));
        assert_eq!(logical_clip_to_scissor(clip, vp, 1.0), Some((90, 10, 10, 10)));
    }

    #[test]
    fn empty_clip_skips_draw() {
        let vp = Viewport::new(100.0, 50.0);
        assert_eq!(logical_clip_to_scissor(Some(Rect::new(0.0, 0.0, 0.0, 0.0)), vp, 1.0), None);
    }

    #[test]
    fn straight_srgb_restores_bytes() {
        let c = straight_srgb(Color::from_rgb8(255, 128, 0));
        assert!((c[0] - 1.0).abs() < 1e-5);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-4);
        assert_eq!(c[2], 0.0);
        assert_eq!(c[3], 1.0);
    }
}
