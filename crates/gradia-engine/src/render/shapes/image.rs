use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, ImageData};

use super::common::{logical_clip_to_scissor, QuadPipeline};

struct CachedTexture {
    size: (u32, u32),
    // Kept alive for the bind group.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    used: bool,
}

/// Renderer for `DrawCmd::Image`.
///
/// Each distinct [`ImageData::generation`] gets its own `Rgba8UnormSrgb`
/// texture. Pixels are uploaded once per generation; textures not drawn
/// during a frame are released at the end of it.
pub struct ImageRenderer {
    quads: QuadPipeline,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    textures: HashMap<u64, CachedTexture>,
    instances: Vec<ImageInstance>,
    draws: Vec<(u64, Option<Rect>)>,
}

impl Default for ImageRenderer {
    fn default() -> Self {
        Self {
            quads: QuadPipeline::new("image"),
            texture_bgl: None,
            sampler: None,
            textures: HashMap::new(),
            instances: Vec::new(),
            draws: Vec::new(),
        }
    }
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.instances.clear();
        self.draws.clear();
        self.ensure_texture_resources(ctx);
        for cached in self.textures.values_mut() {
            cached.used = false;
        }

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Image(cmd) = &item.cmd else { continue };
            let rect = cmd.rect.normalized();
            if rect.is_empty() {
                continue;
            }
            let generation = cmd.image.generation();
            self.upload_if_needed(ctx, &cmd.image);

            self.instances.push(ImageInstance {
                rect: [rect.origin.x, rect.origin.y, rect.size.x, rect.size.y],
            });
            self.draws.push((generation, item.clip_rect));
        }

        self.textures.retain(|_, cached| cached.used);

        if self.instances.is_empty() {
            return;
        }
        let Some(texture_bgl) = self.texture_bgl.as_ref() else { return };

        self.quads.ensure(ctx, include_str!("shaders/image.wgsl"), ImageInstance::layout(), &[texture_bgl]);
        self.quads.upload(ctx, &self.instances);

        let Some(mut rpass) = self.quads.begin_pass(target) else { return };
        for (i, (generation, clip)) in self.draws.iter().enumerate() {
            let Some(cached) = self.textures.get(generation) else { continue };
            let Some((sx, sy, sw, sh)) = logical_clip_to_scissor(*clip, ctx.viewport, ctx.scale_factor) else {
                continue;
            };
            rpass.set_bind_group(1, &cached.bind_group, &[]);
            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.draw_indexed(0..6, 0, i as u32..i as u32 + 1);
        }
    }

    fn upload_if_needed(&mut self, ctx: &RenderCtx<'_>, image: &ImageData) {
        let size = (image.width(), image.height());
        if let Some(cached) = self.textures.get_mut(&image.generation()) {
            if cached.size == size {
                cached.used = true;
                return;
            }
        }
        let (Some(bgl), Some(sampler)) = (self.texture_bgl.as_ref(), self.sampler.as_ref()) else { return };

        let extent = wgpu::Extent3d { width: size.0, height: size.1, depth_or_array_layers: 1 };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gradia image texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.0),
                rows_per_image: Some(size.1),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradia image bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });

        log::trace!("uploaded image generation {} ({}x{})", image.generation(), size.0, size.1);
        self.textures.insert(
            image.generation(),
            CachedTexture { size, _texture: texture, bind_group, used: true },
        );
    }

    fn ensure_texture_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.texture_bgl.is_some() && self.sampler.is_some() {
            return;
        }

        self.texture_bgl = Some(ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gradia image texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        }));

        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gradia image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
        self.textures.clear();
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (16 bytes): destination rect `(x, y, w, h)` at loc 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ImageInstance {
    rect: [f32; 4],
}

impl ImageInstance {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
