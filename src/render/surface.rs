//! wgpu surface renderer
//!
//! Owns the device, queue and window surface, and runs one forward pass per
//! frame: clear to the scene background, then draw every visible mesh
//! primitive with Lambert lighting and a depth buffer.
//!
//! Mesh buffers are uploaded on first sight and dropped once a frame no
//! longer draws them.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::errors::{Result, SkyscrollError};
use crate::render::SceneRenderer;
use crate::render::draw::{
    DrawItem, FrameUniforms, MeshVertex, ObjectUniforms, aligned_stride, collect_draws,
    pack_objects, srgb_to_linear,
};
use crate::scene::{Camera, Mesh, Scene};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_OBJECT_CAPACITY: u64 = 128;

struct GpuPrimitive {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct GpuMesh {
    primitives: Vec<GpuPrimitive>,
    last_frame: u64,
}

/// Dynamic-offset uniform buffer holding one [`ObjectUniforms`] per draw.
struct ObjectBuffer {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u64,
}

impl ObjectBuffer {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, stride: u64, capacity: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniforms"),
            size: stride * capacity,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
                }),
            }],
        });
        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }
}

pub struct SurfaceRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    objects: ObjectBuffer,

    meshes: HashMap<u64, GpuMesh>,
    frame_index: u64,
}

impl SurfaceRenderer {
    /// Creates the surface for `window` and configures it at `width` x `height`.
    pub async fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| SkyscrollError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SkyscrollError::Surface(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Skyscroll Device"),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await
            .map_err(|e| SkyscrollError::Surface(e.to_string()))?;

        let config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or_else(|| SkyscrollError::Surface("Surface not supported by adapter".into()))?;
        surface.configure(&device, &config);

        log::info!(
            "Surface configured: {}x{} {:?} on {}",
            config.width,
            config.height,
            config.format,
            adapter.get_info().name
        );

        let frame_layout = uniform_layout(&device, "Frame Layout", false, size_of_u64::<FrameUniforms>());
        let object_layout = uniform_layout(&device, "Object Layout", true, size_of_u64::<ObjectUniforms>());

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: size_of_u64::<FrameUniforms>(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let stride = aligned_stride(
            size_of_u64::<ObjectUniforms>(),
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let objects = ObjectBuffer::new(&device, &object_layout, stride, INITIAL_OBJECT_CAPACITY);

        let pipeline = create_pipeline(&device, config.format, &frame_layout, &object_layout);
        let depth_view = create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            pipeline,
            frame_buffer,
            frame_bind_group,
            object_layout,
            objects,
            meshes: HashMap::new(),
            frame_index: 0,
        })
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Number of meshes with resident GPU buffers.
    #[must_use]
    pub fn resident_meshes(&self) -> usize {
        self.meshes.len()
    }

    fn clear_color(&self, scene: &Scene) -> wgpu::Color {
        let c = if self.config.format.is_srgb() {
            srgb_to_linear(scene.background)
        } else {
            scene.background
        };
        wgpu::Color {
            r: f64::from(c.x),
            g: f64::from(c.y),
            b: f64::from(c.z),
            a: 1.0,
        }
    }

    fn upload_mesh(&mut self, mesh: &Mesh) {
        let frame = self.frame_index;
        if let Some(gpu) = self.meshes.get_mut(&mesh.id()) {
            gpu.last_frame = frame;
            return;
        }

        let primitives = mesh
            .primitives
            .iter()
            .map(|primitive| GpuPrimitive {
                vertices: self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(mesh.name.as_str()),
                    contents: bytemuck::cast_slice(&MeshVertex::interleave(primitive)),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                indices: self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(mesh.name.as_str()),
                    contents: bytemuck::cast_slice(&primitive.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: primitive.indices.len() as u32,
            })
            .collect();

        log::debug!("Uploaded mesh '{}' ({} triangles)", mesh.name, mesh.triangle_count());
        self.meshes.insert(
            mesh.id(),
            GpuMesh {
                primitives,
                last_frame: frame,
            },
        );
    }

    fn write_objects(&mut self, draws: &[DrawItem]) {
        let needed = draws.len() as u64;
        if needed > self.objects.capacity {
            let capacity = needed.next_power_of_two();
            log::info!("Growing object uniforms to {capacity} draws");
            self.objects = ObjectBuffer::new(&self.device, &self.object_layout, self.objects.stride, capacity);
        }
        if !draws.is_empty() {
            self.queue
                .write_buffer(&self.objects.buffer, 0, &pack_objects(draws, self.objects.stride));
        }
    }
}

impl SceneRenderer for SurfaceRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(SkyscrollError::Surface(e.to_string())),
        };

        self.frame_index += 1;
        let draws = collect_draws(scene);
        for draw in &draws {
            self.upload_mesh(&draw.mesh);
        }
        let frame = self.frame_index;
        self.meshes.retain(|_, gpu| gpu.last_frame == frame);

        self.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::new(scene, camera)),
        );
        self.write_objects(&draws);

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color(scene)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for (slot, draw) in draws.iter().enumerate() {
                let Some(primitive) = self
                    .meshes
                    .get(&draw.mesh.id())
                    .and_then(|gpu| gpu.primitives.get(draw.primitive))
                else {
                    continue;
                };
                let offset = (slot as u64 * self.objects.stride) as u32;
                pass.set_bind_group(1, &self.objects.bind_group, &[offset]);
                pass.set_vertex_buffer(0, primitive.vertices.slice(..));
                pass.set_index_buffer(primitive.indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..primitive.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_texture(&self.device, &self.config);
        }
    }
}

fn size_of_u64<T>() -> u64 {
    std::mem::size_of::<T>() as u64
}

fn uniform_layout(device: &wgpu::Device, label: &str, dynamic: bool, size: u64) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        }],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    frame_layout: &wgpu::BindGroupLayout,
    object_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/mesh.wgsl"))),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Mesh Pipeline Layout"),
        bind_group_layouts: &[frame_layout, object_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Mesh Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[MeshVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
