pub mod glyphs;
pub mod pipeline;
pub mod tessellate;

use std::sync::Arc;

use log::{info, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use pipeline::{ShapePipeline, ShapeVertex, create_shape_pipeline};

use crate::camera::CameraUniform;
use crate::engine::FrameSink;
use crate::error::EngineError;
use crate::frame::DrawList;

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    shape_pipeline: ShapePipeline,
    /// Static orthographic projection (no camera) used by the screen pass.
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    /// Viewport projection used by the world pass.
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    /// Reused tessellation scratch space.
    world_verts: Vec<ShapeVertex>,
    screen_verts: Vec<ShapeVertex>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, EngineError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| EngineError::SurfaceUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| EngineError::SurfaceUnavailable(format!("no suitable GPU adapter: {e}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| EngineError::SurfaceUnavailable(format!("failed to create device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = *caps
            .formats
            .first()
            .ok_or_else(|| EngineError::SurfaceUnavailable("surface reports no formats".into()))?;
        let alpha_mode = caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        info!("renderer ready: {}x{} {:?}", config.width, config.height, format);

        let shape_pipeline = create_shape_pipeline(&device, format);

        // ── Static screen projection buffer (no camera transform) ─────────
        let proj = CameraUniform::identity_ortho(config.width as f32, config.height as f32);
        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&[proj]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &shape_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        // ── Viewport projection buffer (world pass) ───────────────────────
        // Starts as the identity ortho; every frame overwrites it.
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::cast_slice(&[proj]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bg"),
            layout: &shape_pipeline.projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            shape_pipeline,
            projection_buffer,
            projection_bind_group,
            camera_buffer,
            camera_bind_group,
            world_verts: Vec::new(),
            screen_verts: Vec::new(),
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let proj = CameraUniform::identity_ortho(new_size.width as f32, new_size.height as f32);
        self.queue
            .write_buffer(&self.projection_buffer, 0, bytemuck::cast_slice(&[proj]));
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Render one frame: world layer through the viewport camera, then the
    /// screen layer on top with the plain projection.
    pub fn render(&mut self, frame_list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let camera = CameraUniform::for_viewport(&frame_list.viewport);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera]));

        self.world_verts.clear();
        self.screen_verts.clear();
        tessellate::tessellate(&frame_list.world, &mut self.world_verts);
        tessellate::tessellate(&frame_list.screen, &mut self.screen_verts);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let [r, g, b, a] = frame_list.clear.0;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            // ── Pass 1: world layer [camera] ─────────────────────────────────
            if !self.world_verts.is_empty() {
                let vbuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("world_vertex_buffer"),
                    contents: bytemuck::cast_slice(&self.world_verts),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                pass.set_pipeline(&self.shape_pipeline.render_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_vertex_buffer(0, vbuf.slice(..));
                pass.draw(0..self.world_verts.len() as u32, 0..1);
            }

            // ── Pass 2: screen layer [screen] ────────────────────────────────
            if !self.screen_verts.is_empty() {
                let vbuf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("screen_vertex_buffer"),
                    contents: bytemuck::cast_slice(&self.screen_verts),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                pass.set_pipeline(&self.shape_pipeline.render_pipeline);
                pass.set_bind_group(0, &self.projection_bind_group, &[]);
                pass.set_vertex_buffer(0, vbuf.slice(..));
                pass.draw(0..self.screen_verts.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl FrameSink for Renderer {
    type Error = wgpu::SurfaceError;

    fn present(&mut self, frame: &DrawList) -> Result<(), Self::Error> {
        match self.render(frame) {
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost; reconfiguring");
                let size = self.window.inner_size();
                self.resize(size);
                Ok(())
            }
            other => other,
        }
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        self.resize(PhysicalSize::new(width, height));
    }
}
