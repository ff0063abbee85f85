use crate::alg;
use crate::config::RendererConfig;
use crate::error::{Error, Result};
use crate::graphics::{Color, Palette};
use crate::scene::{self, Scene, Viewport};
use crate::targets::{RemoteTarget, TargetPool};

/// One draw of the cube
pub struct Pass<'a> {
    pub viewport: Viewport,
    pub target: Option<&'a RemoteTarget>, // None draws to the local surface
    pub mvp: alg::Mat4,
    pub palette: Palette,
    pub clear_color: Color,
}

/// Graphics API seam: owns textures, framebuffers and draw calls
pub trait Backend {
    fn create_target(&mut self, viewport: Viewport) -> Result<RemoteTarget>;
    fn delete_target(&mut self, target: RemoteTarget);
    fn draw(&mut self, pass: &Pass) -> Result<()>;
}

/// Consumer of remote frames (the cast display)
pub trait Presentation {
    fn render_frame_to_texture(&mut self, texture: u32);

    /// A graphics operation failed while this presentation was live.
    /// `source` names the failing step.
    fn on_error(&mut self, _source: &str, _error: &Error) {}
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RemoteFrame {
    pub texture: u32,
    pub mvp: alg::Mat4,
}

/// Transforms used for a rendered frame
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Frame {
    pub angle: f32,
    pub local: alg::Mat4,
    pub remote: Option<RemoteFrame>,
}

struct CastSession {
    presentation: Box<dyn Presentation + Send>,
    viewport: Viewport,
}

pub struct NativeRenderer<B: Backend> {
    backend: B,
    config: RendererConfig,
    scene: Scene,
    local: Option<Viewport>,
    session: Option<CastSession>,
    targets: TargetPool,
}

impl<B: Backend> NativeRenderer<B> {
    pub fn new(backend: B, config: RendererConfig) -> NativeRenderer<B> {
        NativeRenderer {
            backend,
            scene: Scene::new(&config),
            local: None,
            session: None,
            targets: TargetPool::new(config.target_count),
            config,
        }
    }

    pub fn init(&mut self, width: u32, height: u32) -> Result<()> {
        let viewport = Viewport::new(width, height).validate()?;
        log::info!("Initialize native renderer ({} x {})", width, height);

        self.local = Some(viewport);
        Ok(())
    }

    pub fn cast_session_started(
        &mut self,
        presentation: Box<dyn Presentation + Send>,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let viewport = Viewport::new(width, height).validate()?;
        log::info!("Cast session started ({} x {})", width, height);

        // A new session replaces any stale one
        if self.session.is_some() {
            self.release_targets();
        }

        self.session = Some(CastSession {
            presentation,
            viewport,
        });

        Ok(())
    }

    pub fn cast_session_ended(&mut self) {
        log::info!("Cast session ended");

        self.session = None;
        self.release_targets();
    }

    /// The presentation finished showing the frame in `texture`
    pub fn notify_remote_frame_done(&mut self, texture: u32) -> bool {
        let released = self.targets.release(texture);

        if !released {
            log::warn!("Frame done for unknown texture {}", texture);
        }

        released
    }

    pub fn render_frame(&mut self) -> Result<Frame> {
        let local = self.local.ok_or(Error::NotInitialized)?;

        let projection = scene::projection(local, self.scene.camera())?;
        let mvp = self.scene.transform(&projection)?;

        let drawn = self.backend.draw(&Pass {
            viewport: local,
            target: None,
            mvp,
            palette: Palette::Local,
            clear_color: self.config.clear_color,
        });

        if let Err(e) = drawn {
            self.report_error("local_draw", &e);
            return Err(e);
        }

        // Without a full pool the remote pass waits for the next frame
        let remote = if self.fill_targets() {
            self.render_remote_frame()?
        } else {
            None
        };

        let frame = Frame {
            angle: self.scene.angle(),
            local: mvp,
            remote,
        };

        log::debug!(
            "Rendered frame at {} degrees (remote: {})",
            frame.angle,
            frame.remote.is_some(),
        );

        self.scene.advance();
        Ok(frame)
    }

    fn render_remote_frame(&mut self) -> Result<Option<RemoteFrame>> {
        let viewport = match self.session {
            Some(ref session) => session.viewport,
            None => return Ok(None),
        };

        let target = match self.targets.acquire() {
            Some(target) => target,
            None => {
                log::warn!("No free remote display target");
                return Ok(None);
            },
        };

        let drawn = scene::projection(viewport, self.scene.camera())
            .and_then(|projection| self.scene.transform(&projection))
            .and_then(|mvp| {
                self.backend.draw(&Pass {
                    viewport,
                    target: Some(&target),
                    mvp,
                    palette: Palette::Remote,
                    clear_color: self.config.clear_color,
                })?;

                Ok(mvp)
            });

        let mvp = match drawn {
            Ok(mvp) => mvp,
            Err(e) => {
                // Nothing will report this frame done
                self.targets.release(target.texture);
                self.report_error("remote_draw", &e);
                return Err(e);
            },
        };

        if let Some(ref mut session) = self.session {
            session.presentation.render_frame_to_texture(target.texture);
        }

        Ok(Some(RemoteFrame {
            texture: target.texture,
            mvp,
        }))
    }

    /// Top the pool up to the configured size. On failure every target is
    /// deleted so the next frame starts over; returns whether the pool is full.
    fn fill_targets(&mut self) -> bool {
        let viewport = match self.session {
            Some(ref session) => session.viewport,
            None => return false,
        };

        while self.targets.len() < self.config.target_count {
            if let Err(e) = self.allocate_target(viewport) {
                log::warn!("Failed to allocate remote target: {}", e);

                self.release_targets();
                self.report_error("create_target", &e);

                return false;
            }
        }

        true
    }

    fn allocate_target(&mut self, viewport: Viewport) -> Result<()> {
        let target = self.backend.create_target(viewport)?;

        if let Err(e) = self.targets.insert(target) {
            self.backend.delete_target(target);
            return Err(e);
        }

        log::info!(
            "Allocated remote target (texture {}, framebuffer {})",
            target.texture,
            target.framebuffer,
        );

        Ok(())
    }

    fn report_error(&mut self, source: &str, error: &Error) {
        if let Some(ref mut session) = self.session {
            session.presentation.on_error(source, error);
        }
    }

    fn release_targets(&mut self) {
        for target in self.targets.drain() {
            self.backend.delete_target(target);
        }
    }

    pub fn is_casting(&self) -> bool {
        self.session.is_some()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn targets(&self) -> &TargetPool {
        &self.targets
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Sender};
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[derive(Debug)]
    struct Draw {
        viewport: Viewport,
        framebuffer: Option<u32>,
        mvp: alg::Mat4,
        palette: Palette,
    }

    #[derive(Default)]
    struct MockBackend {
        next_id: u32,
        live: Vec<u32>,
        draws: Vec<Draw>,
        creates: u32,
        fail_create: Option<u32>, // Call number that fails
        fail_local: bool,
        fail_remote: bool,
    }

    impl Backend for MockBackend {
        fn create_target(&mut self, _viewport: Viewport) -> Result<RemoteTarget> {
            self.creates += 1;

            if self.fail_create == Some(self.creates) {
                return Err(Error::Backend("out of memory".to_string()));
            }

            self.next_id += 1;
            self.live.push(self.next_id);

            Ok(RemoteTarget::new(self.next_id, 100 + self.next_id))
        }

        fn delete_target(&mut self, target: RemoteTarget) {
            self.live.retain(|&texture| texture != target.texture);
        }

        fn draw(&mut self, pass: &Pass) -> Result<()> {
            if self.fail_remote && pass.target.is_some() {
                return Err(Error::Backend("framebuffer incomplete".to_string()));
            }

            if self.fail_local && pass.target.is_none() {
                return Err(Error::Backend("context lost".to_string()));
            }

            self.draws.push(Draw {
                viewport: pass.viewport,
                framebuffer: pass.target.map(|target| target.framebuffer),
                mvp: pass.mvp,
                palette: pass.palette,
            });

            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct Shown {
        textures: Arc<Mutex<Vec<u32>>>,
        errors: Arc<Mutex<Vec<String>>>,
    }

    impl Presentation for Shown {
        fn render_frame_to_texture(&mut self, texture: u32) {
            self.textures.lock().unwrap().push(texture);
        }

        fn on_error(&mut self, source: &str, error: &Error) {
            self.errors.lock().unwrap().push(format!("{}: {}", source, error));
        }
    }

    struct Forward(Sender<u32>);

    impl Presentation for Forward {
        fn render_frame_to_texture(&mut self, texture: u32) {
            self.0.send(texture).unwrap();
        }
    }

    fn renderer() -> NativeRenderer<MockBackend> {
        let mut renderer = NativeRenderer::new(
            MockBackend::default(),
            RendererConfig::default(),
        );

        renderer.init(800, 600).unwrap();
        renderer
    }

    #[test]
    fn requires_init() {
        let mut renderer = NativeRenderer::new(
            MockBackend::default(),
            RendererConfig::default(),
        );

        assert!(matches!(renderer.render_frame(), Err(Error::NotInitialized)));
        assert!(matches!(renderer.init(0, 600), Err(Error::InvalidViewport(_))));
    }

    #[test]
    fn local_only() {
        let mut renderer = renderer();
        let frame = renderer.render_frame().unwrap();

        assert!(frame.remote.is_none());
        assert_eq!(frame.angle, 0.);
        assert!(renderer.targets().is_empty());

        let draws = &renderer.backend().draws;
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].framebuffer, None);
        assert_eq!(draws[0].palette, Palette::Local);
        assert!(draws[0].viewport == Viewport::new(800, 600));
        assert!(draws[0].mvp == frame.local);
    }

    #[test]
    fn angle_advances_per_frame() {
        let mut renderer = renderer();
        let increment = RendererConfig::default().angle_increment;

        let first = renderer.render_frame().unwrap();
        let second = renderer.render_frame().unwrap();

        assert_eq!(second.angle - first.angle, increment);
        assert!(first.local != second.local);
    }

    #[test]
    fn mirrors_to_remote() {
        let mut renderer = renderer();
        let shown = Shown::default();

        renderer.cast_session_started(Box::new(shown.clone()), 1920, 1080)
            .unwrap();

        let frame = renderer.render_frame().unwrap();
        let remote = frame.remote.unwrap();

        assert_eq!(renderer.targets().len(), 2);
        assert_eq!(*shown.textures.lock().unwrap(), vec![remote.texture]);

        let draws = &renderer.backend().draws;
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[1].palette, Palette::Remote);
        assert_eq!(draws[1].framebuffer, Some(100 + remote.texture));
        assert!(draws[1].viewport == Viewport::new(1920, 1080));

        // Same pose, different aspect ratio
        assert!(remote.mvp != frame.local);
        assert_eq!(remote.mvp.get(1, 1), frame.local.get(1, 1));
    }

    #[test]
    fn targets_rotate_until_released() {
        let mut renderer = renderer();
        let shown = Shown::default();

        renderer.cast_session_started(Box::new(shown.clone()), 640, 480)
            .unwrap();

        let first = renderer.render_frame().unwrap().remote.unwrap();
        let second = renderer.render_frame().unwrap().remote.unwrap();
        assert!(first.texture != second.texture);

        // Both targets in flight: the remote pass is skipped
        assert!(renderer.render_frame().unwrap().remote.is_none());

        assert!(renderer.notify_remote_frame_done(first.texture));
        let third = renderer.render_frame().unwrap().remote.unwrap();
        assert_eq!(third.texture, first.texture);

        assert!(!renderer.notify_remote_frame_done(9999));
        assert_eq!(shown.textures.lock().unwrap().len(), 3);
    }

    #[test]
    fn session_end_frees_targets() {
        let mut renderer = renderer();

        renderer.cast_session_started(Box::new(Shown::default()), 640, 480)
            .unwrap();

        renderer.render_frame().unwrap();
        assert_eq!(renderer.backend().live.len(), 2);

        renderer.cast_session_ended();
        assert!(!renderer.is_casting());
        assert!(renderer.targets().is_empty());
        assert!(renderer.backend().live.is_empty());

        let frame = renderer.render_frame().unwrap();
        assert!(frame.remote.is_none());
    }

    #[test]
    fn restarted_session_reallocates() {
        let mut renderer = renderer();

        renderer.cast_session_started(Box::new(Shown::default()), 640, 480)
            .unwrap();
        renderer.render_frame().unwrap();

        renderer.cast_session_started(Box::new(Shown::default()), 1280, 720)
            .unwrap();
        assert!(renderer.targets().is_empty());

        renderer.render_frame().unwrap();
        assert_eq!(renderer.backend().live, vec![3, 4]);
    }

    #[test]
    fn failed_remote_draw_unlocks() {
        let mut renderer = renderer();

        renderer.cast_session_started(Box::new(Shown::default()), 640, 480)
            .unwrap();
        renderer.backend_mut().fail_remote = true;

        assert!(matches!(renderer.render_frame(), Err(Error::Backend(_))));
        assert_eq!(renderer.targets().locked_count(), 0);
    }

    #[test]
    fn failed_allocation_keeps_local_frame() {
        let mut renderer = renderer();
        let shown = Shown::default();

        renderer.backend_mut().fail_create = Some(2);
        renderer.cast_session_started(Box::new(shown.clone()), 640, 480)
            .unwrap();

        // The local pass still draws; the half-built pool is thrown away
        let frame = renderer.render_frame().unwrap();
        assert!(frame.remote.is_none());
        assert!(renderer.targets().is_empty());
        assert!(renderer.backend().live.is_empty());

        let draws = &renderer.backend().draws;
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].palette, Palette::Local);

        // Next frame allocates the whole pool
        let frame = renderer.render_frame().unwrap();
        assert!(frame.remote.is_some());
        assert_eq!(renderer.targets().len(), 2);

        for _ in 0..5 {
            renderer.render_frame().unwrap();
        }

        assert_eq!(renderer.targets().len(), 2);
        assert_eq!(renderer.backend().live.len(), 2);
    }

    #[test]
    fn errors_reach_presentation() {
        let mut renderer = renderer();
        let shown = Shown::default();

        renderer.backend_mut().fail_create = Some(1);
        renderer.cast_session_started(Box::new(shown.clone()), 640, 480)
            .unwrap();

        renderer.render_frame().unwrap();

        renderer.backend_mut().fail_remote = true;
        assert!(renderer.render_frame().is_err());

        renderer.backend_mut().fail_remote = false;
        renderer.backend_mut().fail_local = true;
        assert!(renderer.render_frame().is_err());

        let errors = shown.errors.lock().unwrap();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("create_target: "));
        assert!(errors[0].contains("out of memory"));
        assert!(errors[1].starts_with("remote_draw: "));
        assert!(errors[2].starts_with("local_draw: "));
    }

    #[test]
    fn errors_without_session_are_returned() {
        let mut renderer = renderer();
        renderer.backend_mut().fail_local = true;

        assert!(matches!(renderer.render_frame(), Err(Error::Backend(_))));
        assert!(renderer.backend().draws.is_empty());
    }

    #[test]
    fn frame_done_from_another_thread() {
        let renderer = Arc::new(Mutex::new(renderer()));
        let (frames, shown) = mpsc::channel();
        let (acks, done) = mpsc::channel();

        renderer.lock().unwrap()
            .cast_session_started(Box::new(Forward(frames)), 640, 480)
            .unwrap();

        let display = {
            let renderer = Arc::clone(&renderer);

            thread::spawn(move || {
                for texture in shown {
                    assert!(renderer.lock().unwrap().notify_remote_frame_done(texture));
                    acks.send(texture).unwrap();
                }
            })
        };

        // With every frame reported done the pool never runs dry
        for _ in 0..4 {
            let frame = renderer.lock().unwrap().render_frame().unwrap();
            let texture = frame.remote.unwrap().texture;

            assert_eq!(done.recv().unwrap(), texture);
        }

        // Ending the session drops the sender and closes the display loop
        renderer.lock().unwrap().cast_session_ended();
        display.join().unwrap();

        assert!(renderer.lock().unwrap().targets().is_empty());
    }
}
