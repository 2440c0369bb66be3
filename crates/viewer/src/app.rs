use glam::Vec3;
use modelview_assets::ModelData;
use modelview_common::{ObjectId, Viewport};
use modelview_input::Action;
use modelview_render::{RenderError, Renderer};
use modelview_scene::{
    CameraDefaults, NodeKind, PerspectiveCamera, Scene, SceneNode, TrackballControls,
};

use crate::config::ViewerConfig;
use crate::content::{ContentEvent, ContentLoader, LoadReport};
use crate::error::ViewerError;
use crate::feedback::Feedback;
use crate::frame_loop::{FrameLoop, LoopHandle};

/// Where the viewer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Renderer, scene, camera and lights exist; nothing requested yet.
    Initialized,
    /// Load pipelines are in flight.
    Loading,
    /// Every pipeline has reported and the [`LoadReport`] is published.
    Ready,
}

/// The viewer: renderer, scene, camera and controls, plus content loading
/// and the frame loop.
///
/// Everything here is owned by the thread driving the event loop. Loaded
/// models are inserted on that thread by [`ViewerApp::poll_content`].
pub struct ViewerApp<R: Renderer> {
    config: ViewerConfig,
    renderer: R,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: TrackballControls,
    frame_loop: FrameLoop,
    feedback: Feedback,
    phase: Phase,
    loader: Option<ContentLoader>,
    pending: LoadReport,
    report: Option<LoadReport>,
}

impl<R: Renderer> ViewerApp<R> {
    /// Set up the renderer, scene, camera, controls, lights and grid.
    pub fn init_gl(config: ViewerConfig, mut renderer: R) -> Result<Self, ViewerError> {
        config.validate()?;

        renderer.set_clear_color(config.window.clear_color);
        renderer.set_auto_clear(config.window.auto_clear);

        let viewport = renderer.viewport();
        let camera = PerspectiveCamera::from_defaults(&config.camera, viewport.aspect_ratio());
        let controls = TrackballControls::new(config.controls, viewport);

        let mut scene = Scene::new();
        for light in &config.lights {
            scene.add(
                SceneNode::new(light.name.clone(), NodeKind::Light(light.light))
                    .with_position(light.position),
            );
        }
        if let Some(grid) = config.grid {
            scene.add(SceneNode::new("grid", NodeKind::Grid(grid)));
        }

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            nodes = scene.child_count(),
            "viewer initialized"
        );

        Ok(Self {
            config,
            renderer,
            scene,
            camera,
            controls,
            frame_loop: FrameLoop::default(),
            feedback: Feedback::new(),
            phase: Phase::Initialized,
            loader: None,
            pending: LoadReport::default(),
            report: None,
        })
    }

    /// Start one load pipeline per configured model. Returns immediately;
    /// models arrive through [`ViewerApp::poll_content`].
    pub fn init_content(&mut self) {
        if self.phase == Phase::Loading {
            tracing::warn!("content is already loading");
            return;
        }

        let requests = self.config.requests();
        for request in &requests {
            self.feedback.report(format!("Loading {}...", request.name));
        }

        self.pending = LoadReport::default();
        self.report = None;
        self.phase = Phase::Loading;
        self.loader = Some(ContentLoader::spawn(requests));
    }

    /// Insert models whose pipelines finished since the last call. Returns
    /// how many were added to the scene.
    pub fn poll_content(&mut self) -> usize {
        let events = match self.loader.as_mut() {
            Some(loader) => loader.poll(),
            None => return 0,
        };
        let mut added = 0;
        for event in events {
            if self.handle_event(event).is_some() {
                added += 1;
            }
        }
        added
    }

    /// Run every pipeline to completion on the calling thread's behalf and
    /// return the report.
    pub fn load_content(&mut self) -> Option<&LoadReport> {
        self.init_content();
        self.wait_for_content()
    }

    /// Block until the current batch, if any, has fully reported.
    pub fn wait_for_content(&mut self) -> Option<&LoadReport> {
        while let Some(event) = self.loader.as_mut().and_then(ContentLoader::recv) {
            self.handle_event(event);
        }
        self.report.as_ref()
    }

    fn handle_event(&mut self, event: ContentEvent) -> Option<ObjectId> {
        match event {
            ContentEvent::Outcome(Ok(model)) => {
                self.pending.loaded.push(model.name.clone());
                Some(self.add_model(model))
            }
            ContentEvent::Outcome(Err(failure)) => {
                tracing::warn!(
                    model = %failure.request,
                    stage = %failure.stage,
                    error = %failure.error,
                    "load pipeline failed"
                );
                self.pending.failures.push(failure);
                None
            }
            ContentEvent::Finished { elapsed } => {
                self.finish_loading(elapsed);
                None
            }
        }
    }

    fn add_model(&mut self, model: ModelData) -> ObjectId {
        let name = model.name.clone();
        let triangles = model.triangle_count();
        let id = self.scene.add(SceneNode::new(name.clone(), NodeKind::Model(model)));
        tracing::debug!(model = %name, id = %id.short(), triangles, "model added to scene");
        id
    }

    fn finish_loading(&mut self, elapsed: std::time::Duration) {
        let mut report = std::mem::take(&mut self.pending);
        report.elapsed = elapsed;
        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "scene ready"
        );
        self.feedback.clear();
        self.report = Some(report);
        self.loader = None;
        self.phase = Phase::Ready;
    }

    /// Follow a new surface size: controls, renderer and camera projection.
    pub fn resize_display_gl(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        self.controls.handle_resize(viewport);
        self.renderer.set_size(width, height);
        self.update_camera();
        tracing::debug!(width, height, aspect = self.camera.aspect, "display resized");
    }

    /// Put the camera back at its configured position and target.
    pub fn reset_camera(&mut self) {
        let defaults = self.config.camera;
        self.camera.position = defaults.position;
        self.camera.target = defaults.target;
        self.camera.up = Vec3::Y;
        self.controls.stop();
        self.update_camera();
    }

    /// Recompute aspect, orientation and projection.
    pub fn update_camera(&mut self) {
        self.camera.aspect = self.renderer.viewport().aspect_ratio();
        let target = self.camera.target;
        self.camera.look_at(target);
        self.camera.update_projection_matrix();
    }

    /// Draw one frame. See [`ViewerApp::render_with`].
    pub fn render(&mut self) -> Result<bool, RenderError> {
        self.render_with(|_, _| {})
    }

    /// Draw one frame, letting `overlay` record into it after the scene.
    ///
    /// Returns `Ok(false)` when the renderer skipped the frame.
    pub fn render_with<F>(&mut self, overlay: F) -> Result<bool, RenderError>
    where
        F: FnOnce(&mut R, &mut R::Frame),
    {
        let aspect = self.renderer.viewport().aspect_ratio();
        if self.camera.aspect != aspect {
            self.update_camera();
        }

        let Some(mut frame) = self.renderer.begin_frame()? else {
            return Ok(false);
        };
        if !self.renderer.auto_clear() {
            self.renderer.clear(&mut frame);
        }
        self.controls.update(&mut self.camera);
        self.renderer.draw(&mut frame, &self.scene, &self.camera);
        overlay(&mut self.renderer, &mut frame);
        self.renderer.end_frame(frame);
        Ok(true)
    }

    /// One loop iteration: take in loaded content, then draw. Returns
    /// whether the loop keeps running.
    ///
    /// Only presented frames count toward the frame cap.
    pub fn frame_with<F>(&mut self, overlay: F) -> Result<bool, RenderError>
    where
        F: FnOnce(&mut R, &mut R::Frame),
    {
        if !self.frame_loop.is_running() {
            return Ok(false);
        }
        self.poll_content();
        if self.render_with(overlay)? {
            Ok(self.frame_loop.tick())
        } else {
            Ok(self.frame_loop.is_running())
        }
    }

    /// Run the frame loop on this thread until it is stopped or hits its
    /// frame cap. Returns the number of frames run.
    ///
    /// An empty viewport never presents, so nothing runs.
    pub fn run(&mut self) -> Result<u64, RenderError> {
        if self.renderer.viewport().is_empty() {
            tracing::warn!("empty viewport, frame loop not started");
            return Ok(0);
        }
        let start = self.frame_loop.frames();
        self.frame_loop.start();
        while self.frame_with(|_, _| {})? {}
        Ok(self.frame_loop.frames() - start)
    }

    /// Route a host action to the controls, the camera or the frame loop.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::RotateStart(p) => self.controls.pointer_down(p.x, p.y),
            Action::RotateMove(p) => self.controls.pointer_move(p.x, p.y),
            Action::RotateEnd => self.controls.pointer_up(),
            Action::ResetCamera => self.reset_camera(),
            Action::Stop => self.frame_loop.stop(),
            Action::Noop => {}
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn camera_defaults(&self) -> &CameraDefaults {
        &self.config.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &TrackballControls {
        &self.controls
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Published once every pipeline of the last batch has reported.
    pub fn report(&self) -> Option<&LoadReport> {
        self.report.as_ref()
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }

    pub fn frame_loop_mut(&mut self) -> &mut FrameLoop {
        &mut self.frame_loop
    }

    pub fn loop_handle(&self) -> LoopHandle {
        self.frame_loop.handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use glam::Vec2;
    use modelview_assets::LoadStage;
    use modelview_render::DebugTextRenderer;
    use std::path::Path;

    const PLATE_MTL: &str = "newmtl plate\nKd 0.6 0.6 0.6\n";
    const PLATE_OBJ: &str = "\
mtllib plate.mtl
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
usemtl plate
f 1 4 3 2
";

    fn write_model(dir: &Path, stem: &str) {
        std::fs::write(dir.join(format!("{stem}.mtl")), PLATE_MTL).unwrap();
        std::fs::write(dir.join(format!("{stem}.obj")), PLATE_OBJ).unwrap();
    }

    /// Default config with its three models written into `dir/models`.
    fn config_with_models(dir: &Path) -> ViewerConfig {
        let models = dir.join("models");
        std::fs::create_dir_all(&models).unwrap();
        for stem in ["02", "base", "03"] {
            write_model(&models, stem);
        }
        ViewerConfig {
            base_dir: dir.to_path_buf(),
            ..ViewerConfig::default()
        }
    }

    fn app(width: u32, height: u32) -> ViewerApp<DebugTextRenderer> {
        ViewerApp::init_gl(ViewerConfig::default(), DebugTextRenderer::new(width, height)).unwrap()
    }

    #[test]
    fn init_gl_builds_lighting_rig_and_grid() {
        let app = app(800, 600);
        assert_eq!(app.scene().child_count(), 4);
        assert_eq!(app.scene().directional_lights().count(), 2);
        assert_eq!(app.scene().grids().count(), 1);
        assert_eq!(app.renderer().clear_color().to_hex(), 0x050505);
        assert_eq!(app.phase(), Phase::Initialized);
        assert_eq!(app.camera().position, Vec3::new(1000.0, 1000.0, 2000.0));
    }

    #[test]
    fn init_gl_aspect_matches_surface() {
        assert_eq!(app(800, 400).camera().aspect, 2.0);
        assert_eq!(app(800, 0).camera().aspect, 1.0);
    }

    #[test]
    fn init_gl_rejects_invalid_config() {
        let mut config = ViewerConfig::default();
        config.camera.far = 0.01;
        let result = ViewerApp::init_gl(config, DebugTextRenderer::default());
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }

    #[test]
    fn resize_recomputes_aspect() {
        let mut app = app(800, 600);
        app.resize_display_gl(800, 400);
        assert_eq!(app.camera().aspect, 2.0);
        assert_eq!(app.renderer().viewport(), Viewport::new(800, 400));
        assert_eq!(app.controls().screen().width, 800.0);

        app.resize_display_gl(640, 0);
        assert_eq!(app.camera().aspect, 1.0);
    }

    #[test]
    fn render_follows_renderer_resized_elsewhere() {
        let mut app = app(800, 600);
        app.renderer_mut().set_size(800, 200);
        assert!(app.render().unwrap());
        assert_eq!(app.camera().aspect, 4.0);
        assert!(app.renderer().last_frame().contains("aspect=4.000"));
    }

    #[test]
    fn reset_camera_restores_defaults() {
        let mut app = app(800, 400);
        app.apply(Action::RotateStart(Vec2::new(400.0, 200.0)));
        app.apply(Action::RotateMove(Vec2::new(600.0, 100.0)));
        app.render().unwrap();
        app.apply(Action::RotateEnd);
        assert_ne!(app.camera().position, Vec3::new(1000.0, 1000.0, 2000.0));

        app.apply(Action::ResetCamera);
        let defaults = *app.camera_defaults();
        assert_eq!(app.camera().position, defaults.position);
        assert_eq!(app.camera().target, defaults.target);
        assert_eq!(app.camera().up, Vec3::Y);

        // No damping tail survives the reset.
        app.render().unwrap();
        assert_eq!(app.camera().position, defaults.position);
    }

    #[test]
    fn render_with_no_models() {
        let mut app = app(800, 400);
        assert!(app.render().unwrap());
        assert_eq!(app.renderer().frames_presented(), 1);
        assert!(app.renderer().last_frame().contains("Children: 4"));
        assert_eq!(app.renderer().explicit_clears(), 0);
    }

    #[test]
    fn explicit_clear_when_auto_clear_off() {
        let mut config = ViewerConfig::default();
        config.window.auto_clear = false;
        let mut app = ViewerApp::init_gl(config, DebugTextRenderer::default()).unwrap();
        app.render().unwrap();
        app.render().unwrap();
        assert_eq!(app.renderer().explicit_clears(), 2);
    }

    #[test]
    fn overlay_runs_after_draw() {
        let mut app = app(800, 400);
        app.render_with(|_, frame| frame.text.push_str("overlay\n"))
            .unwrap();
        assert!(app.renderer().last_frame().ends_with("overlay\n"));
    }

    #[test]
    fn three_loads_add_three_children() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_models(dir.path());
        let mut app = ViewerApp::init_gl(config, DebugTextRenderer::default()).unwrap();
        let before = app.scene().child_count();

        let report = app.load_content().unwrap();
        assert!(report.is_success(), "{report}");
        assert_eq!(report.loaded.len(), 3);

        assert_eq!(app.scene().child_count(), before + 3);
        assert_eq!(app.phase(), Phase::Ready);
        assert!(app.feedback().is_empty());

        let mut names: Vec<_> = app.scene().models().map(|(_, n, _)| n.name.clone()).collect();
        names.sort();
        assert_eq!(names, ["02", "03", "base"]);
    }

    #[test]
    fn failed_pipeline_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_models(dir.path());
        config.models.push(ModelConfig::new("ghost", "models/ghost.obj"));
        std::fs::write(dir.path().join("models/ghost.mtl"), PLATE_MTL).unwrap();
        let mut app = ViewerApp::init_gl(config, DebugTextRenderer::default()).unwrap();
        let before = app.scene().child_count();

        let report = app.load_content().unwrap();
        assert_eq!(report.loaded.len(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].request, "ghost");
        assert_eq!(report.failures[0].stage, LoadStage::Geometry);
        assert_eq!(app.scene().child_count(), before + 3);
    }

    #[test]
    fn polling_streams_models_in() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_models(dir.path());
        let mut app = ViewerApp::init_gl(config, DebugTextRenderer::default()).unwrap();
        let before = app.scene().child_count();

        app.init_content();
        assert_eq!(app.phase(), Phase::Loading);
        assert!(app.feedback().text().starts_with("Loading "));

        let mut added = 0;
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while app.phase() != Phase::Ready && std::time::Instant::now() < deadline {
            added += app.poll_content();
            app.render().unwrap();
            std::thread::yield_now();
        }
        assert_eq!(app.phase(), Phase::Ready);
        assert_eq!(added, 3);
        assert_eq!(app.scene().child_count(), before + 3);
        assert_eq!(app.report().map(LoadReport::total), Some(3));
    }

    #[test]
    fn empty_model_list_is_ready_with_empty_report() {
        let config = ViewerConfig {
            models: Vec::new(),
            ..ViewerConfig::default()
        };
        let mut app = ViewerApp::init_gl(config, DebugTextRenderer::default()).unwrap();
        let report = app.load_content().unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(app.phase(), Phase::Ready);
    }

    #[test]
    fn run_honors_frame_cap() {
        let mut app = app(320, 240);
        app.frame_loop_mut().set_max_frames(Some(5));
        assert_eq!(app.run().unwrap(), 5);
        assert_eq!(app.renderer().frames_presented(), 5);
        assert!(!app.frame_loop().is_running());
    }

    #[test]
    fn skipped_frames_do_not_count_toward_cap() {
        let mut app = app(800, 0);
        app.frame_loop_mut().set_max_frames(Some(2));
        app.frame_loop_mut().start();
        for _ in 0..3 {
            assert!(app.frame_with(|_, _| {}).unwrap());
        }
        assert_eq!(app.frame_loop().frames(), 0);
        assert_eq!(app.renderer().frames_presented(), 0);

        app.resize_display_gl(800, 400);
        assert!(app.frame_with(|_, _| {}).unwrap());
        assert!(!app.frame_with(|_, _| {}).unwrap());
        assert_eq!(app.renderer().frames_presented(), 2);
    }

    #[test]
    fn run_with_empty_viewport_presents_nothing() {
        let mut app = app(800, 0);
        app.frame_loop_mut().set_max_frames(Some(3));
        assert_eq!(app.run().unwrap(), 0);
        assert_eq!(app.renderer().frames_presented(), 0);
    }

    #[test]
    fn stop_action_ends_loop() {
        let mut app = app(320, 240);
        app.frame_loop_mut().start();
        assert!(app.frame_with(|_, _| {}).unwrap());
        app.apply(Action::Stop);
        assert!(!app.frame_with(|_, _| {}).unwrap());
        assert_eq!(app.renderer().frames_presented(), 1);
    }
}
