use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::common::{draw_clipped_runs, QuadPipeline};

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1;

#[derive(Debug, Copy, Clone)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Shelf packer over the square glyph atlas.
#[derive(Debug)]
struct ShelfPacker {
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl Default for ShelfPacker {
    fn default() -> Self {
        Self { cursor_x: GLYPH_PADDING, cursor_y: GLYPH_PADDING, row_height: 0, full: false }
    }
}

impl ShelfPacker {
    /// Reserves a `w × h` slot and returns its top-left corner.
    fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!("glyph atlas is full ({ATLAS_SIZE}×{ATLAS_SIZE}); some glyphs will not be rendered");
            self.full = true;
            return None;
        }
        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }
}

struct Atlas {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Renderer for `DrawCmd::Text`.
///
/// Glyphs are laid out and rasterized at physical size (`size * scale_factor`)
/// so labels stay crisp on HiDPI displays, then cached in an R8 atlas keyed by
/// `GlyphRasterConfig`.
pub struct TextRenderer {
    quads: QuadPipeline,
    atlas_bgl: Option<wgpu::BindGroupLayout>,
    atlas: Option<Atlas>,
    packer: ShelfPacker,
    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,
    layout: Layout<()>,
    instances: Vec<GlyphInstance>,
    clips: Vec<Option<Rect>>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            quads: QuadPipeline::new("text"),
            atlas_bgl: None,
            atlas: None,
            packer: ShelfPacker::default(),
            glyph_cache: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            instances: Vec::new(),
            clips: Vec::new(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `DrawCmd::Text` entries in `draw_list`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        font_system: &FontSystem,
    ) {
        self.ensure_atlas(ctx);
        self.instances.clear();
        self.clips.clear();

        let scale = ctx.scale_factor.max(0.01);

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Text(cmd) = &item.cmd else { continue };
            let Some(font) = font_system.get(cmd.font) else {
                log::warn!("unknown {:?}, skipping text", cmd.font);
                continue;
            };

            self.layout.reset(&LayoutSettings {
                x: (cmd.origin.x * scale).round(),
                y: (cmd.origin.y * scale).round(),
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

            let color = cmd.color.to_array();
            for g in self.layout.glyphs() {
                if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                    continue;
                }

                let cached = match self.glyph_cache.get(&g.key) {
                    Some(c) => *c,
                    None => {
                        let (metrics, bitmap) = font.rasterize_config(g.key);
                        let Some(c) = place_glyph(
                            ctx,
                            self.atlas.as_ref(),
                            &mut self.packer,
                            &bitmap,
                            metrics.width as u32,
                            metrics.height as u32,
                        ) else {
                            continue;
                        };
                        self.glyph_cache.insert(g.key, c);
                        c
                    }
                };

                self.instances.push(GlyphInstance {
                    dst_min: [g.x / scale, g.y / scale],
                    dst_max: [(g.x + g.width as f32) / scale, (g.y + g.height as f32) / scale],
                    uv_min: cached.uv_min,
                    uv_max: cached.uv_max,
                    color,
                });
                self.clips.push(item.clip_rect);
            }
        }

        if self.instances.is_empty() {
            return;
        }
        let (Some(bgl), Some(atlas)) = (self.atlas_bgl.as_ref(), self.atlas.as_ref()) else { return };

        self.quads.ensure(ctx, include_str!("shaders/text.wgsl"), GlyphInstance::layout(), &[bgl]);
        self.quads.upload(ctx, &self.instances);

        let Some(mut rpass) = self.quads.begin_pass(target) else { return };
        rpass.set_bind_group(1, &atlas.bind_group, &[]);
        draw_clipped_runs(&mut rpass, ctx, &self.clips);
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gradia text atlas bgl"),
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
        });

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gradia text atlas"),
            size: wgpu::Extent3d { width: ATLAS_SIZE, height: ATLAS_SIZE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gradia text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradia text atlas bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        self.atlas_bgl = Some(bgl);
        self.atlas = Some(Atlas { texture, bind_group });
        self.packer = ShelfPacker::default();
        self.glyph_cache.clear();
    }
}

fn place_glyph(
    ctx: &RenderCtx<'_>,
    atlas: Option<&Atlas>,
    packer: &mut ShelfPacker,
    bitmap: &[u8],
    w: u32,
    h: u32,
) -> Option<CachedGlyph> {
    if w == 0 || h == 0 {
        return None;
    }
    let atlas = atlas?;
    let (gx, gy) = packer.allocate(w, h)?;

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &atlas.texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        bitmap,
        wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(w), rows_per_image: Some(h) },
        wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
    );

    let size = ATLAS_SIZE as f32;
    Some(CachedGlyph {
        uv_min: [gx as f32 / size, gy as f32 / size],
        uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
    })
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_wraps_to_next_shelf() {
        let mut packer = ShelfPacker::default();
        let a = packer.allocate(ATLAS_SIZE - 4, 10).expect("first slot");
        let b = packer.allocate(8, 6).expect("second slot");
        assert_eq!(a, (GLYPH_PADDING, GLYPH_PADDING));
        assert_eq!(b, (GLYPH_PADDING, GLYPH_PADDING + 10 + GLYPH_PADDING));
    }

    #[test]
    fn packer_reports_full_atlas() {
        let mut packer = ShelfPacker::default();
        assert!(packer.allocate(8, ATLAS_SIZE).is_none());
        assert!(packer.allocate(1, 1).is_none());
    }
}
