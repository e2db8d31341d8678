//! MPP Life simulator binary.
//!
//! Runs the 256x256-torus Game of Life demonstration with a winit window
//! and pixels framebuffer, or in headless mode for scripted/CI runs.

mod capture;
mod config;
mod seed;
mod sink;

use std::path::PathBuf;
use std::process;

use config::SimConfig;
use mpp_controller::Controller;
use pixels::{Pixels, SurfaceTexture};
use sink::Framebuffer;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut cfg = SimConfig::default();
    let mut pattern: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--steps" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cfg.steps = s.parse().ok();
                }
            }
            "--headless" => {
                cfg.headless = true;
            }
            "--screenshot" => {
                i += 1;
                cfg.screenshot_path = args.get(i).map(PathBuf::from);
            }
            "--record" => {
                i += 1;
                cfg.record_dir = args.get(i).map(PathBuf::from);
            }
            "--self-test" => {
                cfg.self_test = true;
            }
            "--help" | "-h" => {
                eprintln!("Usage: mpp-sim [OPTIONS] [PATTERN_FILE]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --steps <n>          Run n generations then exit (headless)");
                eprintln!("  --headless           Run without a window");
                eprintln!("  --screenshot <file>  Save the final frame as a PNG (headless)");
                eprintln!("  --record <dir>       Save every frame as a numbered PNG (headless)");
                eprintln!("  --self-test          Run the router self-test and exit");
                eprintln!("  --help               Print this message");
                eprintln!();
                eprintln!("With no PATTERN_FILE, the torus is seeded randomly at 50% density.");
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
            other => {
                pattern = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    cfg.pattern_path = pattern;
    cfg
}

fn make_controller(cfg: &SimConfig) -> Controller {
    let mut controller = Controller::new(cfg.memory_size);
    match &cfg.pattern_path {
        Some(path) => match seed::seed_from_pattern(&mut controller, path) {
            Ok(()) => eprintln!("Loaded pattern: {}", path.display()),
            Err(e) => {
                eprintln!("Failed to load pattern {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => seed::seed_random(&mut controller),
    }
    controller
}

// ---------------------------------------------------------------------------
// Self-test mode
// ---------------------------------------------------------------------------

fn run_self_test() {
    let mut controller = Controller::new(mpp_controller::MIN_MEMORY_SIZE);
    let ok = controller.router().self_test();
    if ok {
        eprintln!("Router self-test: PASS");
    } else {
        eprintln!("Router self-test: FAIL");
        process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Headless mode
// ---------------------------------------------------------------------------

fn run_headless(cfg: &SimConfig) {
    let mut controller = make_controller(cfg);
    let steps = cfg.steps.unwrap_or(200);
    let mut fb = Framebuffer::new();

    if let Some(ref dir) = cfg.record_dir {
        for i in 1..=steps {
            controller.life_step(&mut fb);
            if let Err(e) = capture::save_numbered(&fb, dir, i) {
                eprintln!("Record error: {e}");
                process::exit(1);
            }
        }
        eprintln!("Recorded {steps} frames to {}", dir.display());
        return;
    }

    for _ in 0..steps {
        controller.life_step(&mut fb);
    }

    if let Some(ref path) = cfg.screenshot_path {
        if let Err(e) = capture::save_screenshot(&fb, path) {
            eprintln!("Screenshot error: {e}");
            process::exit(1);
        }
        eprintln!("Screenshot saved to {}", path.display());
    }
}

// ---------------------------------------------------------------------------
// Windowed mode (winit + pixels)
// ---------------------------------------------------------------------------

struct App {
    controller: Controller,
    fb: Framebuffer,
    window: Option<&'static Window>,
    pixels: Option<Pixels<'static>>,
    scale: u32,
}

impl App {
    fn new(controller: Controller, scale: u32) -> Self {
        Self {
            controller,
            fb: Framebuffer::new(),
            window: None,
            pixels: None,
            scale,
        }
    }

    fn blit(&mut self) {
        let Some(pixels) = self.pixels.as_mut() else {
            return;
        };
        pixels.frame_mut().copy_from_slice(self.fb.data());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_size =
            winit::dpi::LogicalSize::new(sink::WIDTH * self.scale, sink::HEIGHT * self.scale);
        let attrs = WindowAttributes::default()
            .with_title("MPP Life")
            .with_inner_size(window_size)
            .with_resizable(false);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                // Leaked for the process lifetime; reclaimed by the OS on exit.
                let window: &'static Window = Box::leak(Box::new(window));
                let inner = window.inner_size();
                let surface = SurfaceTexture::new(inner.width, inner.height, window);
                match Pixels::new(sink::WIDTH, sink::HEIGHT, surface) {
                    Ok(pixels) => self.pixels = Some(pixels),
                    Err(e) => {
                        eprintln!("Failed to create pixels: {e}");
                        event_loop.exit();
                        return;
                    }
                }
                self.window = Some(window);
            }
            Err(e) => {
                eprintln!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.controller.life_step(&mut self.fb);
                self.blit();

                if let Some(pixels) = self.pixels.as_ref() {
                    if let Err(e) = pixels.render() {
                        eprintln!("Render error: {e}");
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cfg = parse_args();

    if cfg.self_test {
        run_self_test();
        return;
    }

    if cfg.headless {
        run_headless(&cfg);
        return;
    }

    let controller = make_controller(&cfg);
    let mut app = App::new(controller, cfg.window_scale);

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            eprintln!("Failed to create event loop: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Event loop error: {e}");
        process::exit(1);
    }
}
