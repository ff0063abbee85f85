use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use cast_cube::config::RENDERER_CONFIG;
use cast_cube::render::{Backend, Frame, NativeRenderer, Pass, Presentation};
use cast_cube::scene::Viewport;
use cast_cube::targets::RemoteTarget;

const DEFAULT_FRAMES: usize = 120;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const LOCAL_SIZE: (u32, u32) = (1080, 1920);
const REMOTE_SIZE: (u32, u32) = (1280, 720);

/// Stands in for the GL context: hands out ids, logs draws
struct LoggingBackend {
    next_id: u32,
    draws: usize,
}

impl Backend for LoggingBackend {
    fn create_target(&mut self, viewport: Viewport) -> cast_cube::Result<RemoteTarget> {
        self.next_id += 1;

        log::debug!(
            "Create {} x {} target with id {}",
            viewport.width,
            viewport.height,
            self.next_id,
        );

        Ok(RemoteTarget::new(self.next_id, self.next_id))
    }

    fn delete_target(&mut self, target: RemoteTarget) {
        log::debug!("Delete target {}", target.texture);
    }

    fn draw(&mut self, pass: &Pass) -> cast_cube::Result<()> {
        self.draws += 1;

        log::trace!(
            "Draw {:?} palette to {:?}:\n{}",
            pass.palette,
            pass.target.map(|target| target.framebuffer),
            pass.mvp,
        );

        Ok(())
    }
}

/// Hands shown textures to the remote display thread
struct ChannelPresentation {
    frames: Sender<u32>,
}

impl Presentation for ChannelPresentation {
    fn render_frame_to_texture(&mut self, texture: u32) {
        if self.frames.send(texture).is_err() {
            log::warn!("Remote display is gone; dropped texture {}", texture);
        }
    }

    fn on_error(&mut self, source: &str, error: &cast_cube::Error) {
        log::error!("Remote display saw {} fail: {}", source, error);
    }
}

type SharedRenderer = Arc<Mutex<NativeRenderer<LoggingBackend>>>;

fn main() {
    env_logger::init();

    let frames = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let backend = LoggingBackend { next_id: 0, draws: 0 };
    let renderer = Arc::new(Mutex::new(
        NativeRenderer::new(backend, *RENDERER_CONFIG)
    ));

    let (sender, receiver) = mpsc::channel();

    let display = {
        let renderer = Arc::clone(&renderer);
        thread::spawn(move || remote_display(&renderer, receiver))
    };

    let result = run(&renderer, ChannelPresentation { frames: sender }, frames);

    // Dropping the session closes the channel, which ends the display thread
    let draws = {
        let mut renderer = lock(&renderer);
        renderer.cast_session_ended();
        renderer.backend().draws
    };

    if display.join().is_err() {
        log::error!("Remote display thread panicked");
    }

    match result {
        Ok(Some(frame)) => {
            println!(
                "Rendered {} frames ({} draws), final angle {}",
                frames,
                draws,
                frame.angle,
            );

            println!("Local MVP:\n{}", frame.local);

            if let Some(remote) = frame.remote {
                println!("Remote MVP (texture {}):\n{}", remote.texture, remote.mvp);
            }
        },

        Ok(None) => println!("Rendered no frames"),

        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        },
    }
}

fn lock(renderer: &SharedRenderer) -> MutexGuard<NativeRenderer<LoggingBackend>> {
    renderer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reports every shown texture back to the renderer as soon as it arrives
fn remote_display(renderer: &SharedRenderer, frames: Receiver<u32>) {
    for texture in frames {
        lock(renderer).notify_remote_frame_done(texture);
    }

    log::debug!("Remote display closed");
}

fn run(
    renderer: &SharedRenderer,
    presentation: ChannelPresentation,
    frames: usize,
) -> cast_cube::Result<Option<Frame>> {
    {
        let mut renderer = lock(renderer);

        renderer.init(LOCAL_SIZE.0, LOCAL_SIZE.1)?;
        renderer.cast_session_started(
            Box::new(presentation),
            REMOTE_SIZE.0,
            REMOTE_SIZE.1,
        )?;
    }

    let mut last = None;

    for _ in 0..frames {
        last = Some(lock(renderer).render_frame()?);

        // Let the display thread catch up between frames
        thread::sleep(FRAME_INTERVAL);
    }

    Ok(last)
}
