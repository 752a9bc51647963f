//! Scene lifecycle: mount, spawn, redraw, resize, teardown.
//!
//! The manager never schedules work on its own. It registers timers, frame
//! requests and a resize listener on the host [`Scheduler`], and the host
//! calls back into it with the ids that fired. Every callback first checks
//! that the scene is still live and that the id is the one it is waiting
//! for; anything else is a no-op.

use rand::{Rng, RngCore};

use crate::camera::PerspectiveCamera;
use crate::config::BackdropConfig;
use crate::mount::{MountPoint, OutputElement};
use crate::schedule::{FrameRequestId, ListenerId, Scheduler, TimerId};
use crate::starfield::Starfield;
use crate::streak::{Streak, StreakField};
use crate::surface::{RenderSurface, SceneFrame, SurfaceDescriptor, SurfaceFactory};
use crate::viewport::ViewportSize;

/// State that exists only between a successful mount and teardown.
struct Scene {
    config: BackdropConfig,
    rng: Box<dyn RngCore>,

    camera: PerspectiveCamera,
    surface: Box<dyn RenderSurface>,
    starfield: Starfield,
    streaks: StreakField,

    spawn_timer: TimerId,
    resize_listener: ListenerId,
    /// The one outstanding frame request. `None` while a frame is being serviced.
    pending_frame: Option<FrameRequestId>,

    /// Set after the first failed render so the warning is not repeated every frame.
    render_failed: bool,
}

/// Owns one animated backdrop scene.
#[derive(Default)]
pub struct SceneManager {
    scene: Option<Scene>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the scene inside `mount` and starts its timer and redraw loop.
    ///
    /// Returns `false` (and leaves nothing registered) when there is no mount
    /// point, the viewport is empty, the config is invalid, the surface
    /// cannot be created, or a scene is already live.
    pub fn mount(
        &mut self,
        mount: Option<&mut dyn MountPoint>,
        viewport: ViewportSize,
        scheduler: &mut Scheduler,
        surfaces: &mut dyn SurfaceFactory,
        mut rng: Box<dyn RngCore>,
        config: BackdropConfig,
    ) -> bool {
        if self.scene.is_some() {
            log::warn!("backdrop already mounted; ignoring second mount");
            return false;
        }
        let Some(mount) = mount else {
            log::warn!("no mount point for the backdrop; skipping scene setup");
            return false;
        };
        if !viewport.is_valid() {
            log::warn!(
                "viewport {}x{} is empty; skipping scene setup",
                viewport.width,
                viewport.height
            );
            return false;
        }
        if let Err(err) = config.validate() {
            log::warn!("invalid backdrop config: {err:#}; skipping scene setup");
            return false;
        }

        let camera = PerspectiveCamera::new(&config.camera, viewport);

        let desc =
            SurfaceDescriptor::new(viewport, config.clear_color, &config.starfield, &config.streaks);
        let surface = match surfaces.create(&desc) {
            Ok(surface) => surface,
            Err(err) => {
                log::warn!("render surface unavailable: {err:#}; skipping scene setup");
                return false;
            }
        };
        mount.attach(surface.output().clone());

        let starfield = Starfield::generate(&mut *rng, &config.starfield);

        let spawn_timer = scheduler.set_interval(config.streaks.spawn_interval);
        let resize_listener = scheduler.add_resize_listener();
        let pending_frame = Some(scheduler.request_frame());

        log::info!(
            "backdrop mounted: {}x{}, {} stars",
            viewport.width,
            viewport.height,
            starfield.len()
        );

        self.scene = Some(Scene {
            config,
            rng,
            camera,
            surface,
            starfield,
            streaks: StreakField::new(),
            spawn_timer,
            resize_listener,
            pending_frame,
            render_failed: false,
        });
        true
    }

    /// Handles one tick of a timer. Spawns a streak with the configured probability.
    pub fn on_timer(&mut self, id: TimerId) {
        let Some(scene) = self.scene.as_mut() else { return };
        if id != scene.spawn_timer {
            return;
        }

        let p = scene.config.streaks.spawn_probability;
        if scene.rng.random_bool(p) {
            let streak = Streak::spawn(&mut *scene.rng, &scene.config.streaks);
            log::debug!("streak spawned at {}", streak.origin());
            scene.streaks.push(streak);
        }
    }

    /// Services one frame request: rotate, update streaks, render, then ask
    /// for the next frame.
    ///
    /// Returns `false` if the request was stale (scene gone or not the
    /// outstanding request), in which case nothing happens.
    pub fn on_frame(&mut self, id: FrameRequestId, scheduler: &mut Scheduler) -> bool {
        let Some(scene) = self.scene.as_mut() else { return false };
        if scene.pending_frame != Some(id) {
            return false;
        }
        scene.pending_frame = None;

        scene.starfield.advance();
        let removed = scene.streaks.update();
        if removed > 0 {
            log::debug!("{removed} streak(s) faded out");
        }

        let frame = SceneFrame {
            view_projection: scene.camera.view_projection(),
            starfield: &scene.starfield,
            streaks: scene.streaks.as_slice(),
        };
        match scene.surface.render(&frame) {
            Ok(()) => scene.render_failed = false,
            Err(err) if !scene.render_failed => {
                log::warn!("backdrop render failed: {err:#}");
                scene.render_failed = true;
            }
            Err(_) => {}
        }

        scene.pending_frame = Some(scheduler.request_frame());
        true
    }

    /// Rebinds the camera and surface to a new viewport. No-op without a scene.
    pub fn on_resize(&mut self, viewport: ViewportSize) {
        let Some(scene) = self.scene.as_mut() else { return };
        if !viewport.is_valid() {
            log::debug!("ignoring resize to {}x{}", viewport.width, viewport.height);
            return;
        }

        scene.camera.set_viewport(viewport);
        scene.surface.resize(viewport);
        log::debug!(
            "backdrop resized to {}x{} (aspect {:.3})",
            viewport.width,
            viewport.height,
            scene.camera.aspect()
        );
    }

    /// Stops the scene and frees everything it holds.
    ///
    /// Deregisters the resize listener, cancels the spawn timer and the
    /// outstanding frame, detaches the output element and releases the
    /// surface, in that order. Each step failing only logs. Calling it again,
    /// or without a mounted scene, does nothing.
    pub fn teardown(&mut self, mount: Option<&mut dyn MountPoint>, scheduler: &mut Scheduler) {
        let Some(mut scene) = self.scene.take() else { return };

        if !scheduler.remove_resize_listener(scene.resize_listener) {
            log::warn!("backdrop teardown: resize listener was not registered");
        }
        if !scheduler.clear_interval(scene.spawn_timer) {
            log::warn!("backdrop teardown: spawn timer was not active");
        }
        if let Some(frame) = scene.pending_frame.take() {
            scheduler.cancel_frame(frame);
        }

        let element = scene.surface.output().id();
        match mount {
            Some(mount) if mount.contains(element) => {
                mount.detach(element);
            }
            Some(_) => log::debug!("backdrop teardown: output element already detached"),
            None => log::warn!("backdrop teardown: mount point is gone; element not detached"),
        }

        if let Err(err) = scene.surface.release() {
            log::warn!("backdrop teardown: releasing render surface failed: {err:#}");
        }
        scene.streaks.clear();

        log::info!("backdrop torn down");
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// True between a successful mount and teardown.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.scene.is_some()
    }

    pub fn starfield(&self) -> Option<&Starfield> {
        self.scene.as_ref().map(|s| &s.starfield)
    }

    /// Live streaks; empty without a scene.
    pub fn streaks(&self) -> &[Streak] {
        self.scene
            .as_ref()
            .map(|s| s.streaks.as_slice())
            .unwrap_or(&[])
    }

    pub fn aspect(&self) -> Option<f32> {
        self.scene.as_ref().map(|s| s.camera.aspect())
    }

    pub fn output(&self) -> Option<&OutputElement> {
        self.scene.as_ref().map(|s| s.surface.output())
    }

    pub fn surface_size(&self) -> Option<ViewportSize> {
        self.scene.as_ref().map(|s| s.surface.size())
    }

    /// The scene's resize registration, if it currently holds one.
    pub fn resize_listener(&self) -> Option<ListenerId> {
        self.scene.as_ref().map(|s| s.resize_listener)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::mount::MountLayer;
    use crate::surface::HeadlessSurfaceFactory;

    struct Host {
        layer: MountLayer,
        scheduler: Scheduler,
        surfaces: HeadlessSurfaceFactory,
        manager: SceneManager,
    }

    impl Host {
        fn new() -> Self {
            Self {
                layer: MountLayer::new(),
                scheduler: Scheduler::new(),
                surfaces: HeadlessSurfaceFactory::new(),
                manager: SceneManager::new(),
            }
        }

        fn mount_with(&mut self, w: u32, h: u32, seed: u64, config: BackdropConfig) -> bool {
            self.manager.mount(
                Some(&mut self.layer),
                ViewportSize::new(w, h),
                &mut self.scheduler,
                &mut self.surfaces,
                Box::new(StdRng::seed_from_u64(seed)),
                config,
            )
        }

        fn mount(&mut self, w: u32, h: u32) -> bool {
            self.mount_with(w, h, 7, BackdropConfig::default())
        }

        fn advance(&mut self, dt: Duration) {
            for timer in self.scheduler.advance(dt) {
                self.manager.on_timer(timer);
            }
        }

        fn frame(&mut self) -> usize {
            let mut serviced = 0;
            for id in self.scheduler.begin_frame() {
                if self.manager.on_frame(id, &mut self.scheduler) {
                    serviced += 1;
                }
            }
            serviced
        }

        fn teardown(&mut self) {
            self.manager.teardown(Some(&mut self.layer), &mut self.scheduler);
        }
    }

    fn always_spawn() -> BackdropConfig {
        let mut cfg = BackdropConfig::default();
        cfg.streaks.spawn_probability = 1.0;
        cfg
    }

    // ── mount ─────────────────────────────────────────────────────────────

    #[test]
    fn mount_builds_one_element_and_full_starfield() {
        let mut host = Host::new();
        assert!(host.mount(800, 600));

        assert!(host.manager.is_loaded());
        assert_eq!(host.layer.child_count(), 1);
        let field = host.manager.starfield().unwrap();
        assert_eq!(field.len(), 1000);
        assert!(
            field
                .points()
                .iter()
                .all(|p| p.abs().max_element() <= 1000.0)
        );
        assert!((host.manager.aspect().unwrap() - 1.3333334).abs() < 1e-5);
        assert_eq!(host.manager.surface_size(), Some(ViewportSize::new(800, 600)));
    }

    #[test]
    fn mount_starts_timer_listener_and_loop() {
        let mut host = Host::new();
        host.mount(800, 600);
        assert_eq!(host.scheduler.active_intervals(), 1);
        assert_eq!(host.scheduler.resize_listeners().len(), 1);
        assert_eq!(host.scheduler.pending_frames(), 1);
    }

    #[test]
    fn missing_mount_point_skips_setup() {
        let mut host = Host::new();
        let ok = host.manager.mount(
            None,
            ViewportSize::new(800, 600),
            &mut host.scheduler,
            &mut host.surfaces,
            Box::new(StdRng::seed_from_u64(1)),
            BackdropConfig::default(),
        );
        assert!(!ok);
        assert!(!host.manager.is_loaded());
        assert!(host.surfaces.created().is_empty());
        assert!(host.scheduler.is_idle());
    }

    #[test]
    fn surface_failure_leaves_page_untouched() {
        let mut host = Host::new();
        host.surfaces = HeadlessSurfaceFactory::failing("no graphics context");
        assert!(!host.mount(800, 600));
        assert_eq!(host.layer.child_count(), 0);
        assert!(host.scheduler.is_idle());

        // Later lifecycle calls are harmless.
        host.manager.on_resize(ViewportSize::new(1024, 768));
        host.teardown();
        assert!(!host.manager.is_loaded());
    }

    #[test]
    fn empty_viewport_or_bad_config_skips_setup() {
        let mut host = Host::new();
        assert!(!host.mount(800, 0));

        let mut cfg = BackdropConfig::default();
        cfg.streaks.spawn_probability = -0.5;
        assert!(!host.mount_with(800, 600, 1, cfg));

        assert!(host.scheduler.is_idle());
        assert!(host.surfaces.created().is_empty());
    }

    #[test]
    fn second_mount_is_rejected_while_live() {
        let mut host = Host::new();
        assert!(host.mount(800, 600));
        assert!(!host.mount(800, 600));
        assert_eq!(host.layer.child_count(), 1);
        assert_eq!(host.surfaces.created().len(), 1);
    }

    #[test]
    fn remount_generates_a_new_field() {
        let mut host = Host::new();
        host.mount_with(800, 600, 1, BackdropConfig::default());
        let first = host.manager.starfield().unwrap().points()[0];
        host.teardown();

        assert!(host.mount_with(800, 600, 2, BackdropConfig::default()));
        assert_ne!(host.manager.starfield().unwrap().points()[0], first);
        assert_eq!(host.layer.child_count(), 1);
    }

    // ── spawning ──────────────────────────────────────────────────────────

    #[test]
    fn tick_with_certain_spawn_adds_one_streak() {
        let mut host = Host::new();
        host.mount_with(800, 600, 3, always_spawn());

        host.advance(Duration::from_millis(1999));
        assert!(host.manager.streaks().is_empty());
        host.advance(Duration::from_millis(1));

        let [streak] = host.manager.streaks() else { panic!("expected one streak") };
        assert_eq!(streak.opacity(), 0.8);
        let o = streak.origin();
        assert!((-500.0..=500.0).contains(&o.x));
        assert!((200.0..=700.0).contains(&o.y));
        assert!((-250.0..=250.0).contains(&o.z));
    }

    #[test]
    fn zero_probability_never_spawns() {
        let mut host = Host::new();
        let mut cfg = BackdropConfig::default();
        cfg.streaks.spawn_probability = 0.0;
        host.mount_with(800, 600, 3, cfg);
        host.advance(Duration::from_secs(60));
        assert!(host.manager.streaks().is_empty());
    }

    #[test]
    fn default_probability_spawns_some_but_not_all_ticks() {
        let mut host = Host::new();
        host.mount_with(800, 600, 21, BackdropConfig::default());
        // 1000 ticks, no frames: streaks accumulate.
        host.advance(Duration::from_secs(2000));
        let n = host.manager.streaks().len();
        assert!((40..=180).contains(&n), "spawned {n} of 1000 ticks");
    }

    #[test]
    fn foreign_timer_is_ignored() {
        let mut host = Host::new();
        host.mount_with(800, 600, 3, always_spawn());
        let other = host.scheduler.set_interval(Duration::from_millis(10));
        for _ in 0..5 {
            host.manager.on_timer(other);
        }
        assert!(host.manager.streaks().is_empty());
    }

    // ── frames ────────────────────────────────────────────────────────────

    #[test]
    fn frame_rotates_then_renders_and_reschedules() {
        let mut host = Host::new();
        host.mount(800, 600);
        assert_eq!(host.frame(), 1);
        assert_eq!(host.frame(), 1);

        let rot = host.manager.starfield().unwrap().rotation();
        assert!((rot - Vec2::splat(0.001)).abs().max_element() < 1e-7);

        let stats = host.surfaces.created()[0].borrow().clone();
        assert_eq!(stats.renders, 2);
        assert_eq!(stats.last_star_count, 1000);
        assert_eq!(host.scheduler.pending_frames(), 1);
    }

    #[test]
    fn only_the_outstanding_request_is_serviced() {
        let mut host = Host::new();
        host.mount(800, 600);
        let stray = host.scheduler.request_frame();
        assert_eq!(host.frame(), 1);
        assert!(!host.manager.on_frame(stray, &mut host.scheduler));
        assert_eq!(host.surfaces.created()[0].borrow().renders, 1);
    }

    #[test]
    fn streak_fades_out_over_forty_frames() {
        let mut host = Host::new();
        host.mount_with(800, 600, 5, always_spawn());
        host.advance(Duration::from_millis(2000));
        assert_eq!(host.manager.streaks().len(), 1);

        for i in 1..40 {
            host.frame();
            assert_eq!(host.manager.streaks().len(), 1, "gone early at frame {i}");
        }
        host.frame();
        assert!(host.manager.streaks().is_empty());
        let stats = host.surfaces.created()[0].borrow().clone();
        assert_eq!(stats.last_streak_count, 0);
    }

    #[test]
    fn renders_pass_streak_opacity() {
        let mut host = Host::new();
        host.mount_with(800, 600, 5, always_spawn());
        host.advance(Duration::from_millis(2000));
        host.frame();
        let stats = host.surfaces.created()[0].borrow().clone();
        assert_eq!(stats.last_streak_count, 1);
        assert!((stats.last_streak_opacities[0] - 0.78).abs() < 1e-6);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_updates_aspect_and_surface() {
        let mut host = Host::new();
        host.mount(800, 600);
        host.manager.on_resize(ViewportSize::new(1000, 500));
        assert!((host.manager.aspect().unwrap() - 2.0).abs() < 1e-6);
        assert_eq!(host.manager.surface_size(), Some(ViewportSize::new(1000, 500)));
    }

    #[test]
    fn repeated_resize_is_idempotent() {
        let mut host = Host::new();
        host.mount(800, 600);
        host.manager.on_resize(ViewportSize::new(1024, 768));
        let aspect = host.manager.aspect();
        let size = host.manager.surface_size();

        host.manager.on_resize(ViewportSize::new(1024, 768));
        assert_eq!(host.manager.aspect(), aspect);
        assert_eq!(host.manager.surface_size(), size);
        assert_eq!(host.surfaces.created()[0].borrow().resizes, 1);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut host = Host::new();
        host.mount(800, 600);
        host.manager.on_resize(ViewportSize::new(0, 600));
        assert_eq!(host.manager.surface_size(), Some(ViewportSize::new(800, 600)));
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn teardown_releases_everything() {
        let mut host = Host::new();
        host.mount(800, 600);
        host.frame();
        host.teardown();

        assert!(!host.manager.is_loaded());
        assert_eq!(host.layer.child_count(), 0);
        assert!(host.scheduler.is_idle());
        let stats = host.surfaces.created()[0].borrow().clone();
        assert_eq!(stats.releases, 1);
    }

    #[test]
    fn teardown_twice_is_harmless() {
        let mut host = Host::new();
        host.mount(800, 600);
        host.teardown();
        host.teardown();
        assert!(host.scheduler.is_idle());
        assert_eq!(host.surfaces.created()[0].borrow().releases, 1);
    }

    #[test]
    fn no_frame_runs_after_teardown() {
        let mut host = Host::new();
        host.mount(800, 600);
        let queued = host.scheduler.request_frame();
        host.teardown();

        assert!(!host.manager.on_frame(queued, &mut host.scheduler));
        assert_eq!(host.frame(), 0);
        assert_eq!(host.surfaces.created()[0].borrow().renders, 0);
        assert_eq!(host.scheduler.pending_frames(), 0);
    }

    #[test]
    fn teardown_with_element_already_detached() {
        let mut host = Host::new();
        host.mount(800, 600);
        let id = host.manager.output().unwrap().id();
        host.layer.detach(id);
        host.teardown();
        assert!(host.scheduler.is_idle());
        assert_eq!(host.surfaces.created()[0].borrow().releases, 1);
    }

    #[test]
    fn teardown_without_mount_point_still_stops_the_scene() {
        let mut host = Host::new();
        host.mount(800, 600);
        host.manager.teardown(None, &mut host.scheduler);
        assert!(host.scheduler.is_idle());
        assert!(!host.manager.is_loaded());
    }

    #[test]
    fn managers_do_not_share_state() {
        let mut a = Host::new();
        let mut b = Host::new();
        a.mount_with(800, 600, 1, always_spawn());
        b.mount_with(800, 600, 1, always_spawn());

        a.advance(Duration::from_millis(2000));
        a.frame();
        assert_eq!(a.manager.streaks().len(), 1);
        assert!(b.manager.streaks().is_empty());
        assert_eq!(b.manager.starfield().unwrap().rotation(), Vec2::ZERO);
    }

    // ── scenario ──────────────────────────────────────────────────────────

    #[test]
    fn full_lifecycle_at_800_by_600() {
        let mut host = Host::new();
        assert!(host.mount_with(800, 600, 42, always_spawn()));
        assert_eq!(host.layer.child_count(), 1);
        assert_eq!(host.manager.starfield().unwrap().len(), 1000);
        assert!((host.manager.aspect().unwrap() - 1.333).abs() < 1e-3);

        host.advance(Duration::from_millis(2000));
        let [streak] = host.manager.streaks() else { panic!("expected one streak") };
        assert_eq!(streak.opacity(), 0.8);

        for _ in 0..40 {
            host.frame();
        }
        assert!(host.manager.streaks().is_empty());

        host.teardown();
        assert_eq!(host.layer.child_count(), 0);
        assert!(host.scheduler.is_idle());
    }
}
