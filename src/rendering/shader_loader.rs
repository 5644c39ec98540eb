use std::{
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, channel},
        Arc,
    },
    time::Duration,
};

use anyhow::Context;
use notify_debouncer_mini::{
    new_debouncer_opt, notify::*, DebounceEventResult, DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::PollType;

pub type PipelineFactory = Arc<
    dyn Sync
        + Send
        + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
>;

#[derive(Debug, Clone)]
pub struct ShaderDefinition {
    pub name: &'static str,
    pub path: PathBuf,
}

// Compiles the scene shader to a pipeline, recompiling it in the watcher thread
// whenever the file changes.
pub struct ShaderLoader {
    pipeline: wgpu::RenderPipeline,
    receiver: mpsc::Receiver<wgpu::RenderPipeline>,
    _debouncer: Option<Debouncer<RecommendedWatcher>>,
}

impl ShaderLoader {
    pub fn new(
        device: &wgpu::Device,
        shader_def: ShaderDefinition,
        hot_reload: bool,
        factory: PipelineFactory,
    ) -> anyhow::Result<Self> {
        let pipeline = compile_file(device, &shader_def, factory.as_ref())
            .with_context(|| format!("Failed to compile {}", shader_def.name))?;

        let (send_new_pipelines, recv_new_pipelines) = channel();

        let debouncer = if hot_reload {
            match watch_shader(device.clone(), shader_def, factory, send_new_pipelines) {
                Ok(debouncer) => Some(debouncer),
                Err(e) => {
                    log::warn!("Shader hot reloading disabled: {e:#}");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            pipeline,
            receiver: recv_new_pipelines,
            _debouncer: debouncer,
        })
    }

    pub fn load_pending_shaders(&mut self) {
        while let Ok(pipeline) = self.receiver.try_recv() {
            self.pipeline = pipeline;
        }
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

fn watch_shader(
    device: wgpu::Device,
    shader_def: ShaderDefinition,
    factory: PipelineFactory,
    send_new_pipelines: mpsc::Sender<wgpu::RenderPipeline>,
) -> anyhow::Result<Debouncer<RecommendedWatcher>> {
    let absolute_shader_path = shader_def
        .path
        .canonicalize()
        .with_context(|| format!("Shader {} not found", shader_def.path.display()))?;
    let shader_folder = absolute_shader_path
        .parent()
        .context("Shader path has no parent folder")?
        .to_path_buf();
    let shader_file_name = absolute_shader_path.file_name().map(|name| name.to_owned());

    let mut debouncer = new_debouncer_opt(
        notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
        move |res: DebounceEventResult| match res {
            Ok(events) => {
                let changed = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && event.path.file_name() == shader_file_name.as_deref()
                });
                if !changed {
                    return;
                }

                log::info!("Reloading shader: {}", shader_def.name);
                match compile_file(&device, &shader_def, factory.as_ref()) {
                    Ok(pipeline) => {
                        if send_new_pipelines.send(pipeline).is_err() {
                            log::debug!("Shader loader dropped, ignoring reloaded pipeline");
                        }
                    }
                    Err(e) => log::error!("Failed to load shader: {e:#}"),
                }
            }
            Err(e) => log::error!("Error debouncing shader changes: {e}"),
        },
    )
    .context("Failed to create shader watcher")?;

    debouncer
        .watcher()
        .watch(&shader_folder, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", shader_folder.display()))?;

    Ok(debouncer)
}

fn compile_file<F>(
    device: &wgpu::Device,
    shader_def: &ShaderDefinition,
    factory: &F,
) -> anyhow::Result<wgpu::RenderPipeline>
where
    F: ?Sized + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
{
    let shader_code = read_shader(&shader_def.path)?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = factory(device, shader_def, &shader_code);

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation.")?;

    let error = block_on(device.pop_error_scope());

    if let Some(error) = error {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader_def.name,
            error
        ));
    };

    pipeline
}

fn read_shader(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read shader file {}", path.display()))
}
