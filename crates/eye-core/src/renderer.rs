use crate::canvas::Palette;
use crate::framebuffer::Framebuffer;

/// Display colors the two palette indices map to, linear RGB in 0..1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayColors {
    pub background: [f32; 3],
    pub foreground: [f32; 3],
}

impl Default for DisplayColors {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            foreground: [0.30, 0.85, 1.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameParams {
    pub background: [f32; 4],
    pub foreground: [f32; 4],
    pub frame_size: [u32; 2],
    pub foreground_index: u32,
    pub _pad: u32,
}

impl FrameParams {
    pub fn new(frame_size: (u32, u32), palette: Palette, colors: &DisplayColors) -> Self {
        let [br, bg, bb] = colors.background;
        let [fr, fg, fb] = colors.foreground;
        Self {
            background: [br, bg, bb, 1.0],
            foreground: [fr, fg, fb, 1.0],
            frame_size: [frame_size.0, frame_size.1],
            foreground_index: u32::from(palette.foreground),
            _pad: 0,
        }
    }
}

/// Presents a [`Framebuffer`] on a wgpu surface.
///
/// The palette indices are uploaded as an `R8Uint` texture and stretched
/// over the whole target; the shader turns them into display colors.
pub struct FrameRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture: wgpu::Texture,
    frame_size: (u32, u32),
}

impl FrameRenderer {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        frame_size: (u32, u32),
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frame_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/frame.wgsl").into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("frame_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Uint,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                ],
            });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniform_buffer"),
            size: std::mem::size_of::<FrameParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame_texture"),
            size: extent(frame_size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Uint,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frame_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("frame_render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            texture,
            frame_size,
        }
    }

    /// Copy the framebuffer and colors to the GPU. Frames of the wrong size
    /// are skipped.
    pub fn upload(
        &self,
        queue: &wgpu::Queue,
        framebuffer: &Framebuffer,
        palette: Palette,
        colors: &DisplayColors,
    ) {
        let size = (framebuffer.width(), framebuffer.height());
        if size != self.frame_size {
            log::warn!(
                "framebuffer is {}x{}, renderer expects {}x{}",
                size.0,
                size.1,
                self.frame_size.0,
                self.frame_size.1
            );
            return;
        }

        let params = FrameParams::new(self.frame_size, palette, colors);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&params));
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            framebuffer.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.frame_size.0),
                rows_per_image: Some(self.frame_size.1),
            },
            extent(self.frame_size),
        );
    }

    /// Draw the last uploaded frame into an already open pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

fn extent((width, height): (u32, u32)) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    }
}
