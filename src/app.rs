//! Application state holding the wgpu graphics context
//!
//! Owns the surface, device and queue, the frame-source texture, the
//! two-pass Gaussian blur pipeline, and the egui integration. Each redraw
//! uploads the newest source frame (if one arrived), blurs it by the radius
//! the prescription model computes, and presents the reference and blurred
//! panels side by side.

use std::path::Path;
use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::model::SimParams;
use crate::source::{sample, FrameSource};
use crate::ui::{self, StatusLine};

const DEFAULT_CAMERA_INDEX: u32 = 0;
const REQUESTED_CAMERA_WIDTH: u32 = 1280;
const REQUESTED_CAMERA_HEIGHT: u32 = 720;

/// Below this radius the blur is visually indistinguishable from the
/// original, so the passes are skipped and the frame is copied instead.
/// Keeps the two panels pixel-identical at zero diopters.
const MIN_BLUR_RADIUS: f32 = 0.5;

/// Uniforms for one axis of the separable blur.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BlurParams {
    inv_size: [f32; 2],
    direction: [f32; 2],
    radius: f32,
    _pad: [f32; 3],
}

/// GPU resources that depend on the source frame size. Recreated whenever
/// the source starts delivering a different resolution.
struct PanelTextures {
    source: wgpu::Texture,
    /// Intermediate target between the horizontal and vertical passes.
    ping_view: wgpu::TextureView,
    blurred: wgpu::Texture,
    blurred_view: wgpu::TextureView,
    source_bind_group: wgpu::BindGroup,
    blurred_bind_group: wgpu::BindGroup,
    blur_h_bind_group: wgpu::BindGroup,
    blur_v_bind_group: wgpu::BindGroup,
}

/// Main application state.
pub struct App {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,

    // Frame source (camera or sample clip), chosen once at startup
    source: Option<FrameSource>,
    source_error: Option<String>,
    last_frame_number: u64,
    panels: Option<PanelTextures>,

    // Pipelines
    passthrough_pipeline: wgpu::RenderPipeline,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    blur_pipeline: wgpu::RenderPipeline,
    blur_bind_group_layout: wgpu::BindGroupLayout,
    blur_h_params_buffer: wgpu::Buffer,
    blur_v_params_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,

    // Simulation state driving the blur radius
    params: SimParams,

    // egui integration
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // Frame timing
    fps: f64,
    last_fps_update: Instant,
    frames_since_update: u64,
}

impl App {
    /// Create a new App with an initialized wgpu context and an acquired
    /// frame source.
    pub async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find suitable GPU adapter");

        log::info!("Using GPU: {}", adapter.get_info().name);
        log::info!("Backend: {:?}", adapter.get_info().backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Defocus Sim Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let present_mode = if surface_caps
            .present_modes
            .contains(&wgpu::PresentMode::Mailbox)
        {
            wgpu::PresentMode::Mailbox
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Panel Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Passthrough pipeline (reference panel + presenting the blurred
        // composite).
        let passthrough_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Passthrough Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/passthrough.wgsl").into()),
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
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

        let passthrough_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Passthrough Pipeline Layout"),
                bind_group_layouts: &[&texture_bind_group_layout],
                push_constant_ranges: &[],
            });

        let passthrough_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Passthrough Pipeline"),
            layout: Some(&passthrough_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &passthrough_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &passthrough_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
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

        // Separable blur pipeline; the same pipeline runs both axes with
        // different uniforms.
        let blur_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blur Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blur.wgsl").into()),
        });

        let blur_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Blur Bind Group Layout"),
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
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let blur_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Blur Pipeline Layout"),
                bind_group_layouts: &[&blur_bind_group_layout],
                push_constant_ranges: &[],
            });

        let blur_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blur Pipeline"),
            layout: Some(&blur_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blur_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &blur_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
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

        let blur_h_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Blur H Params Buffer"),
            size: std::mem::size_of::<BlurParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let blur_v_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Blur V Params Buffer"),
            size: std::mem::size_of::<BlurParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let mut style = (*egui_ctx.style()).clone();
        style.visuals.window_shadow = egui::epaint::Shadow::NONE;
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        // Acquire the frame source: camera once, sample clip on any failure.
        let (source, source_error) = match FrameSource::acquire(
            DEFAULT_CAMERA_INDEX,
            REQUESTED_CAMERA_WIDTH,
            REQUESTED_CAMERA_HEIGHT,
            Path::new(sample::DEFAULT_CLIP_PATH),
        ) {
            Ok(source) => {
                log::info!("frame source: {}", source.kind().label());
                (Some(source), None)
            }
            Err(e) => {
                log::error!("no frame source available: {e}");
                (None, Some(e.to_string()))
            }
        };

        let now = Instant::now();

        Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            source,
            source_error,
            last_frame_number: 0,
            panels: None,
            passthrough_pipeline,
            texture_bind_group_layout,
            blur_pipeline,
            blur_bind_group_layout,
            blur_h_params_buffer,
            blur_v_params_buffer,
            sampler,
            params: SimParams::default(),
            egui_ctx,
            egui_state,
            egui_renderer,
            fps: 0.0,
            last_fps_update: now,
            frames_since_update: 0,
        }
    }

    /// Handle a window event, returning true if egui consumed it.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(&self.window, event);
        response.consumed
    }

    /// Resize the surface.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Get current size.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Poll the frame source and upload the newest frame to the GPU. Skips
    /// work when no frame arrived since the last redraw; (re)creates the
    /// panel textures when the frame size changes.
    pub fn update_source(&mut self) {
        let Some(source) = &self.source else { return };
        let Some(frame) = source.latest_frame() else { return };

        if frame.frame_number <= self.last_frame_number {
            return;
        }
        self.last_frame_number = frame.frame_number;

        let needs_new_textures = match &self.panels {
            None => true,
            Some(panels) => {
                let size = panels.source.size();
                size.width != frame.width || size.height != frame.height
            }
        };

        if needs_new_textures {
            log::info!("creating panel textures: {}x{}", frame.width, frame.height);
            self.panels = Some(self.create_panel_textures(frame.width, frame.height));
        }

        if let Some(panels) = &self.panels {
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &panels.source,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &frame.data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(frame.width * 4),
                    rows_per_image: Some(frame.height),
                },
                wgpu::Extent3d {
                    width: frame.width,
                    height: frame.height,
                    depth_or_array_layers: 1,
                },
            );
        }
    }

    fn create_panel_textures(&self, width: u32, height: u32) -> PanelTextures {
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let source = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Source Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let ping = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Blur Ping Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let blurred = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Blurred Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let source_view = source.create_view(&wgpu::TextureViewDescriptor::default());
        let ping_view = ping.create_view(&wgpu::TextureViewDescriptor::default());
        let blurred_view = blurred.create_view(&wgpu::TextureViewDescriptor::default());

        let source_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Source Bind Group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        let blurred_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blurred Bind Group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&blurred_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        let blur_h_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blur H Bind Group"),
            layout: &self.blur_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.blur_h_params_buffer.as_entire_binding(),
                },
            ],
        });
        let blur_v_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blur V Bind Group"),
            layout: &self.blur_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&ping_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.blur_v_params_buffer.as_entire_binding(),
                },
            ],
        });

        PanelTextures {
            source,
            ping_view,
            blurred,
            blurred_view,
            source_bind_group,
            blurred_bind_group,
            blur_h_bind_group,
            blur_v_bind_group,
        }
    }

    /// Render a frame: blur passes, both panels, then the UI.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // The radius is a pure function of the current prescription state;
        // identical inputs on consecutive frames give identical output.
        let radius = self.params.blur_radius();

        if let Some(panels) = &self.panels {
            let frame_size = panels.source.size();

            if radius >= MIN_BLUR_RADIUS {
                let inv_size = [
                    1.0 / frame_size.width as f32,
                    1.0 / frame_size.height as f32,
                ];
                self.queue.write_buffer(
                    &self.blur_h_params_buffer,
                    0,
                    bytemuck::bytes_of(&BlurParams {
                        inv_size,
                        direction: [1.0, 0.0],
                        radius,
                        _pad: [0.0; 3],
                    }),
                );
                self.queue.write_buffer(
                    &self.blur_v_params_buffer,
                    0,
                    bytemuck::bytes_of(&BlurParams {
                        inv_size,
                        direction: [0.0, 1.0],
                        radius,
                        _pad: [0.0; 3],
                    }),
                );

                // Horizontal pass: source -> ping
                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Blur H Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &panels.ping_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });
                    render_pass.set_pipeline(&self.blur_pipeline);
                    render_pass.set_bind_group(0, &panels.blur_h_bind_group, &[]);
                    render_pass.draw(0..3, 0..1);
                }

                // Vertical pass: ping -> blurred
                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Blur V Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &panels.blurred_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });
                    render_pass.set_pipeline(&self.blur_pipeline);
                    render_pass.set_bind_group(0, &panels.blur_v_bind_group, &[]);
                    render_pass.draw(0..3, 0..1);
                }
            } else {
                // Effectively zero blur: straight copy so both panels match
                // exactly.
                encoder.copy_texture_to_texture(
                    panels.source.as_image_copy(),
                    panels.blurred.as_image_copy(),
                    frame_size,
                );
            }
        }

        // Present pass: reference panel on the left half of the surface,
        // blurred composite on the right. If no frame has arrived yet the
        // panels stay black and the loop just keeps rescheduling.
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(panels) = &self.panels {
                let half = (self.config.width / 2).max(1) as f32;
                let right_width = self.config.width as f32 - half;
                let height = self.config.height as f32;

                render_pass.set_pipeline(&self.passthrough_pipeline);

                render_pass.set_viewport(0.0, 0.0, half, height, 0.0, 1.0);
                render_pass.set_bind_group(0, &panels.source_bind_group, &[]);
                render_pass.draw(0..3, 0..1);

                if right_width > 0.0 {
                    render_pass.set_viewport(half, 0.0, right_width, height, 0.0, 1.0);
                    render_pass.set_bind_group(0, &panels.blurred_bind_group, &[]);
                    render_pass.draw(0..3, 0..1);
                }
            }
        }

        self.render_ui(&mut encoder, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.update_fps();

        Ok(())
    }

    fn render_ui(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let raw_input = self.egui_state.take_egui_input(&self.window);

        let status = StatusLine {
            source: self.source.as_ref().map(|s| s.kind()),
            source_error: self.source_error.clone(),
            fps: self.fps,
        };

        // Copy state out so the closure doesn't borrow self.
        let mut params = self.params;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw(ctx, &mut params, &status);
        });
        self.params = params;

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let render_pass_static: &mut wgpu::RenderPass<'static> =
                unsafe { std::mem::transmute(&mut render_pass) };

            self.egui_renderer
                .render(render_pass_static, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }

    fn update_fps(&mut self) {
        self.frames_since_update += 1;

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_update).as_secs_f64();
        if elapsed >= 1.0 {
            self.fps = self.frames_since_update as f64 / elapsed;
            self.frames_since_update = 0;
            self.last_fps_update = now;
        }
    }
}
