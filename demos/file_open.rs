//! Minimal file selector program
//! - Opens a file selector in the given directory (home by default)
//! - Logs the outcome and every selected location, then exits

use std::{cell::Cell, num::NonZeroU32, path::PathBuf, rc::Rc, sync::Arc, time::Instant};

use clap::{Parser, ValueEnum};
use dear_file_selector::{FileSelectorExt, FileSelectorState, SelectionMode, StdFileSystem};
use dear_imgui_glow::GlowRenderer;
use dear_imgui_rs::*;
use dear_imgui_winit::WinitPlatform;
use glow::HasContext;
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext},
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface},
};
use raw_window_handle::HasWindowHandle;
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Open,
    Save,
    SaveFiles,
}

impl From<Mode> for SelectionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Open => SelectionMode::OpenFile,
            Mode::Save => SelectionMode::SaveFile,
            Mode::SaveFiles => SelectionMode::SaveFiles,
        }
    }
}

/// Pick a file and print where it is.
#[derive(Debug, Parser)]
#[command(name = "file_open", version)]
struct Args {
    /// Directory to start in (defaults to the home directory)
    #[arg(short = 'D', long)]
    directory: Option<PathBuf>,

    /// Selection mode
    #[arg(long, value_enum, default_value_t = Mode::Open)]
    mode: Mode,

    /// Label of the accept button
    #[arg(long, default_value = "Done")]
    accept_label: String,

    /// File name proposed in save mode
    #[arg(long)]
    filename: Option<String>,

    /// Window title
    #[arg(long, default_value = "Select a File")]
    title: String,
}

struct ImguiState {
    context: Context,
    platform: WinitPlatform,
    renderer: GlowRenderer,
    last_frame: Instant,
}

struct AppWindow {
    window: Arc<Window>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    imgui: ImguiState,
    selector: FileSelectorState,
}

struct App {
    args: Args,
    window: Option<AppWindow>,
    finished: Rc<Cell<bool>>,
}

fn build_selector(args: &Args, finished: Rc<Cell<bool>>) -> FileSelectorState {
    let mut state = FileSelectorState::new(args.mode.into());
    let selector = &mut state.selector;
    if let Some(dir) = args.directory.clone().or_else(dirs::home_dir) {
        selector.set_current_directory(dir);
    }
    selector.set_accept_label(args.accept_label.as_str());
    selector.set_title(args.title.as_str());
    if let Some(name) = &args.filename {
        selector.set_suggested_filename(name.as_str());
    }
    selector.connect_done(move |selector, success| {
        info!(success, "selection finished");
        for location in selector.selected() {
            info!(%location, "selected");
        }
        finished.set(true);
    });
    state
}

impl AppWindow {
    fn new(
        event_loop: &ActiveEventLoop,
        title: &str,
        selector: FileSelectorState,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let window_attributes = winit::window::Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(800.0, 560.0));
        let (window, cfg) = glutin_winit::DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), |mut configs| {
                configs.next().expect("no OpenGL config available")
            })?;
        let window = Arc::new(window.ok_or("window was not created")?);

        let size = window.inner_size();
        let width = NonZeroU32::new(size.width.max(1)).ok_or("zero window width")?;
        let height = NonZeroU32::new(size.height.max(1)).ok_or("zero window height")?;

        let context_attribs =
            ContextAttributesBuilder::new().build(Some(window.window_handle()?.as_raw()));
        let context = unsafe { cfg.display().create_context(&cfg, &context_attribs)? };
        let surface_attribs = SurfaceAttributesBuilder::<WindowSurface>::new()
            .with_srgb(Some(false))
            .build(window.window_handle()?.as_raw(), width, height);
        let surface = unsafe {
            cfg.display()
                .create_window_surface(&cfg, &surface_attribs)?
        };
        let context = context.make_current(&surface)?;

        let mut imgui_context = Context::create();
        imgui_context.set_ini_filename(None::<String>)?;
        let mut platform = WinitPlatform::new(&mut imgui_context);
        platform.attach_window(
            &window,
            dear_imgui_winit::HiDpiMode::Default,
            &mut imgui_context,
        );

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| {
                context.display().get_proc_address(s).cast()
            })
        };
        let mut renderer = GlowRenderer::new(gl, &mut imgui_context)?;
        renderer.set_framebuffer_srgb_enabled(false);
        renderer.new_frame()?;

        Ok(Self {
            window,
            surface,
            context,
            imgui: ImguiState {
                context: imgui_context,
                platform,
                renderer,
                last_frame: Instant::now(),
            },
            selector,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if let (Some(width), Some(height)) = (
            NonZeroU32::new(new_size.width),
            NonZeroU32::new(new_size.height),
        ) {
            self.surface.resize(&self.context, width, height);
        }
    }

    fn render(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let now = Instant::now();
        let delta = now - self.imgui.last_frame;
        self.imgui
            .context
            .io_mut()
            .set_delta_time(delta.as_secs_f32());
        self.imgui.last_frame = now;

        self.imgui
            .platform
            .prepare_frame(&self.window, &mut self.imgui.context);
        let ui = self.imgui.context.frame();

        // The completion handler reports the result; the return value only
        // says the dialog closed this frame.
        let _ = ui.file_selector().show(&mut self.selector, &StdFileSystem);

        if let Some(gl) = self.imgui.renderer.gl_context() {
            unsafe {
                gl.clear_color(0.06, 0.07, 0.09, 1.0);
                gl.clear(glow::COLOR_BUFFER_BIT);
            }
        }
        self.imgui
            .platform
            .prepare_render_with_ui(&ui, &self.window);
        let draw_data = self.imgui.context.render();
        self.imgui.renderer.new_frame()?;
        self.imgui.renderer.render(&draw_data)?;
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let selector = build_selector(&self.args, self.finished.clone());
        match AppWindow::new(event_loop, &self.args.title, selector) {
            Ok(window) => {
                window.window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(w) = &mut self.window else {
            return;
        };
        if w.window.id() != window_id {
            return;
        }
        w.imgui
            .platform
            .handle_window_event(&mut w.imgui.context, &w.window, &event);
        match event {
            WindowEvent::CloseRequested => {
                if w.selector.selector.is_active() {
                    let _ = w.selector.selector.cancel();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => w.resize(size),
            WindowEvent::RedrawRequested => {
                if let Err(e) = w.render() {
                    error!("render error: {e}");
                    event_loop.exit();
                    return;
                }
                if self.finished.get() {
                    event_loop.exit();
                    return;
                }
                w.window.request_redraw();
            }
            _ => {}
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "file_open=info,dear_file_selector=info,warn".into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App {
        args,
        window: None,
        finished: Rc::new(Cell::new(false)),
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
