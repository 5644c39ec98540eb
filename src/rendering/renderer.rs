use std::sync::Arc;

use anyhow::Context;
use wgpu::{
    CommandEncoderDescriptor, DepthBiasState, Device, MultisampleState,
    PipelineCompilationOptions, RenderPassDescriptor, ShaderSource, StencilState,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    rendering::{
        config::RenderConfig,
        global_uniform::GlobalUniform,
        object_buffer::ObjectBuffer,
        program::{FrameRecorder, ProgramUniforms},
        shader_loader::{PipelineFactory, ShaderDefinition, ShaderLoader},
        shape_meshes::ShapeMeshes,
        shapes::VERTEX_BUFFER_LAYOUT,
        texture::{DepthTexture, GpuTextures},
    },
    scene::{SceneDescription, SceneManager},
};

const SCENE_SHADER_FILE: &str = "scene.wgsl";

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    config: RenderConfig,
    depth_texture: DepthTexture,

    global_uniform: GlobalUniform,
    object_buffer: ObjectBuffer,
    program: ProgramUniforms,

    meshes: ShapeMeshes,
    scene: SceneManager<GpuTextures>,

    shader_loader: ShaderLoader,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        config: RenderConfig,
        description: SceneDescription,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No compatible graphics adapter")?;

        if !adapter.features().contains(GpuTextures::REQUIRED_FEATURES) {
            anyhow::bail!(
                "Adapter {} does not support texture binding arrays",
                adapter.get_info().name
            );
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: GpuTextures::REQUIRED_FEATURES,
                required_limits: adapter.limits(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("Surface has no supported formats")?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_texture = DepthTexture::new(&device, &surface_config, "Depth Texture");

        let mut program = ProgramUniforms::new();
        let global_uniform = GlobalUniform::new(&device, &program.frame);
        let object_buffer = ObjectBuffer::new(&device);

        let mut meshes = ShapeMeshes::new(&device);
        let mut scene = SceneManager::new(
            GpuTextures::new(&device, &queue),
            config.asset_dir.clone(),
            description,
        );
        scene
            .prepare_scene(&mut program, &mut meshes)
            .context("Failed to prepare scene")?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene pipeline layout"),
            bind_group_layouts: &[
                &global_uniform.bind_group_layout,
                object_buffer.bind_group_layout(),
                scene.textures().backend().bind_group_layout(),
            ],
            push_constant_ranges: &[],
        });

        let shader_loader = ShaderLoader::new(
            &device,
            ShaderDefinition {
                name: "Scene shader",
                path: config.shader_dir.join(SCENE_SHADER_FILE),
            },
            config.hot_reload_shaders,
            scene_pipeline_factory(pipeline_layout, surface_format),
        )?;

        Ok(Self {
            window,
            size,
            surface,
            surface_config,
            device,
            queue,
            config,
            depth_texture,
            global_uniform,
            object_buffer,
            program,
            meshes,
            scene,
            shader_loader,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            self.depth_texture
                .resize(&self.device, &self.surface_config);
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        let camera = &self.config.camera;
        self.program.frame.view_proj = camera.get_vp_matrix(self.size.width, self.size.height);
        self.program.frame.view_position = camera.eye;

        let mut recorder = FrameRecorder::new(&mut self.program);
        self.scene.render_scene(&mut recorder);
        let draws = recorder.finish();

        self.global_uniform.update(&self.queue, &self.program.frame);
        let draw_count = self.object_buffer.write(&self.queue, &draws);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let texture_bind_group = self.scene.textures_mut().backend_mut().bind_group();

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth_texture.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(self.shader_loader.pipeline());
            render_pass.set_bind_group(0, &self.global_uniform.bind_group, &[]);
            render_pass.set_bind_group(2, texture_bind_group, &[]);

            for (index, draw) in draws.iter().take(draw_count).enumerate() {
                let Some(primitive) = self.meshes.get(draw.mesh) else {
                    log::trace!("Skipping draw of unloaded {} mesh", draw.mesh);
                    continue;
                };

                render_pass.set_bind_group(
                    1,
                    self.object_buffer.bind_group(),
                    &[self.object_buffer.offset(index)],
                );
                primitive.draw(&mut render_pass);
            }
        }

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }

    /// Releases the scene's GPU textures. Called once when the window closes.
    pub fn destroy_textures(&mut self) {
        self.scene.destroy_textures();
    }
}

fn scene_pipeline_factory(
    pipeline_layout: wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
) -> PipelineFactory {
    Arc::new(
        move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(shader_def.name),
                source: ShaderSource::Wgsl(source.into()),
            });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene render pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[VERTEX_BUFFER_LAYOUT],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Planes are seen from both sides
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTexture::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

            Ok(pipeline)
        },
    )
}
