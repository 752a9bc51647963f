//! The page: content, skill cards and the backdrop mount.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use winit::dpi::PhysicalSize;

use starfolio_backdrop::gpu::GpuSurfaceFactory;
use starfolio_backdrop::surface::SurfaceFactory;
use starfolio_backdrop::{BackdropConfig, MountLayer, SceneManager, Scheduler, ViewportSize};
use starfolio_engine::core::{App, AppControl, FrameCtx, StartCtx};
use starfolio_engine::input::{InputEvent, Key, KeyState};
use starfolio_engine::paint::Color;
use starfolio_engine::render::{GradientFill, LayerCompositor, VerticalGradient};

use crate::content::SKILLS;
use crate::skills::SkillDeck;

// gray-900 → blue-900 → black
const PAGE_TOP: u32 = 0x111827;
const PAGE_MIDDLE: u32 = 0x1e3a8a;
const PAGE_BOTTOM: u32 = 0x000000;

/// Page background behind the starfield.
pub fn page_background() -> VerticalGradient {
    VerticalGradient::new(
        Color::from_hex(PAGE_TOP),
        Color::from_hex(PAGE_MIDDLE),
        Color::from_hex(PAGE_BOTTOM),
    )
}

pub struct PageShell {
    config: BackdropConfig,
    seed: Option<u64>,

    background: MountLayer,
    scheduler: Scheduler,
    scene: SceneManager,
    deck: SkillDeck,

    backdrop_fill: GradientFill,
    compositor: LayerCompositor,

    closed: bool,
}

impl PageShell {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            config,
            seed: None,
            background: MountLayer::new(),
            scheduler: Scheduler::new(),
            scene: SceneManager::new(),
            deck: SkillDeck::new(SKILLS),
            backdrop_fill: GradientFill::new(),
            compositor: LayerCompositor::new(),
            closed: false,
        }
    }

    /// Fixes the backdrop's random seed so every run draws the same sky.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// True once the backdrop scene is up.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.scene.is_loaded()
    }

    pub fn deck(&self) -> &SkillDeck {
        &self.deck
    }

    pub fn background(&self) -> &MountLayer {
        &self.background
    }

    pub fn scene(&self) -> &SceneManager {
        &self.scene
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Mounts the backdrop into the page background.
    pub fn mount_backdrop(&mut self, viewport: ViewportSize, surfaces: &mut dyn SurfaceFactory) {
        let rng: Box<dyn RngCore> = match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_os_rng()),
        };

        let loaded = self.scene.mount(
            Some(&mut self.background),
            viewport,
            &mut self.scheduler,
            surfaces,
            rng,
            self.config.clone(),
        );
        if !loaded {
            log::warn!("page running without its animated backdrop");
        }
    }

    /// Advances page time: fires due timers, then services queued frames.
    ///
    /// Returns the number of scene frames drawn.
    pub fn tick(&mut self, dt: Duration) -> usize {
        for timer in self.scheduler.advance(dt) {
            self.scene.on_timer(timer);
        }

        let mut drawn = 0;
        for id in self.scheduler.begin_frame() {
            if self.scene.on_frame(id, &mut self.scheduler) {
                drawn += 1;
            }
        }
        drawn
    }

    /// Forwards a window resize to the scene while it is listening for one.
    pub fn resize(&mut self, viewport: ViewportSize) {
        let listening = self
            .scene
            .resize_listener()
            .is_some_and(|id| self.scheduler.resize_listeners().contains(&id));
        if listening {
            self.scene.on_resize(viewport);
        }
    }

    /// Handles a key press. Digits flip the matching skill card; Escape closes the page.
    pub fn press(&mut self, key: Key) -> AppControl {
        if key == Key::Escape {
            return AppControl::Exit;
        }

        let Some(n) = key.digit() else { return AppControl::Continue };
        let Some(flipped) = self.deck.toggle(n - 1) else { return AppControl::Continue };
        if let Some(card) = self.deck.category(n - 1) {
            if flipped {
                log::info!("{}: {}", card.name, card.skills.join(", "));
            } else {
                log::info!("{}: flipped back", card.name);
            }
        }
        AppControl::Continue
    }

    /// Tears the backdrop down. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.scene.teardown(Some(&mut self.background), &mut self.scheduler);
        self.compositor.forget_layer();
    }
}

impl App for PageShell {
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) {
        let size = ctx.window.physical_size();
        let mut surfaces = GpuSurfaceFactory::new(
            ctx.gpu.device().clone(),
            ctx.gpu.queue().clone(),
            ctx.gpu.surface_format(),
        );
        self.mount_backdrop(ViewportSize::new(size.width, size.height), &mut surfaces);
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        self.resize(ViewportSize::new(size.width, size.height));
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        for ev in &ctx.input_frame.events {
            if let InputEvent::Key {
                key,
                state: KeyState::Pressed,
                repeat: false,
                ..
            } = ev
            {
                if self.press(*key) == AppControl::Exit {
                    return AppControl::Exit;
                }
            }
        }

        self.tick(ctx.time.dt);

        let layers = &self.background;
        let fill = &mut self.backdrop_fill;
        let compositor = &mut self.compositor;
        let gradient = page_background();
        ctx.render(gradient.top, |rctx, target| {
            fill.draw(rctx, target, gradient);
            for element in layers.children() {
                if let Some(view) = element.view() {
                    compositor.draw(rctx, target, &view);
                }
            }
        })
    }

    fn on_stop(&mut self) {
        self.closed = true;
        self.unmount();
    }

    /// The page keeps drawing until it closes, with or without its backdrop.
    fn wants_redraw(&self) -> bool {
        !self.closed
    }
}

#[cfg(test)]
mod tests {
    use starfolio_backdrop::MountPoint;
    use starfolio_backdrop::surface::HeadlessSurfaceFactory;

    use super::*;

    fn mounted() -> (PageShell, HeadlessSurfaceFactory) {
        let mut shell = PageShell::new(BackdropConfig::default()).with_seed(9);
        let mut surfaces = HeadlessSurfaceFactory::new();
        shell.mount_backdrop(ViewportSize::new(800, 600), &mut surfaces);
        (shell, surfaces)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn mount_loads_the_backdrop() {
        let (shell, _) = mounted();
        assert!(shell.is_loaded());
        assert!(shell.wants_redraw());
        assert_eq!(shell.background().child_count(), 1);
    }

    #[test]
    fn page_survives_without_graphics() {
        let mut shell = PageShell::new(BackdropConfig::default());
        let mut surfaces = HeadlessSurfaceFactory::failing("no adapter");
        shell.mount_backdrop(ViewportSize::new(800, 600), &mut surfaces);

        assert!(!shell.is_loaded());
        assert!(shell.wants_redraw());
        assert_eq!(shell.tick(Duration::from_millis(16)), 0);
        assert_eq!(shell.press(Key::Digit1), AppControl::Continue);
        assert!(shell.deck().is_flipped(0));
    }

    #[test]
    fn stop_ends_redraws() {
        let (mut shell, surfaces) = mounted();
        shell.on_stop();
        assert!(!shell.wants_redraw());
        assert!(!shell.is_loaded());
        assert_eq!(surfaces.created()[0].borrow().releases, 1);
    }

    #[test]
    fn background_runs_gray_to_blue_to_black() {
        let g = page_background();
        assert_eq!(g.top, Color::from_hex(0x111827));
        assert_eq!(g.color_at(0.5), Color::from_hex(0x1e3a8a));
        assert_eq!(g.bottom, Color::BLACK);
    }

    #[test]
    fn tick_draws_one_frame_per_refresh() {
        let (mut shell, surfaces) = mounted();
        assert_eq!(shell.tick(Duration::from_millis(16)), 1);
        assert_eq!(shell.tick(Duration::from_millis(16)), 1);
        assert_eq!(surfaces.created()[0].borrow().renders, 2);
    }

    #[test]
    fn unmount_clears_background_and_schedule() {
        let (mut shell, surfaces) = mounted();
        shell.tick(Duration::from_millis(16));
        shell.unmount();
        shell.unmount();

        assert!(!shell.is_loaded());
        assert_eq!(shell.background().child_count(), 0);
        assert!(shell.scheduler().is_idle());
        assert_eq!(shell.tick(Duration::from_secs(5)), 0);
        assert_eq!(surfaces.created()[0].borrow().releases, 1);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_reaches_the_scene_while_mounted() {
        let (mut shell, _) = mounted();
        shell.resize(ViewportSize::new(1000, 500));
        assert_eq!(shell.scene().surface_size(), Some(ViewportSize::new(1000, 500)));
        assert!((shell.scene().aspect().unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn resize_after_unmount_is_ignored() {
        let (mut shell, _) = mounted();
        shell.unmount();
        shell.resize(ViewportSize::new(1000, 500));
        assert_eq!(shell.scene().aspect(), None);
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn digit_keys_flip_matching_card() {
        let (mut shell, _) = mounted();
        shell.press(Key::Digit3);
        assert!(shell.deck().is_flipped(2));
        assert!(!shell.deck().is_flipped(0));

        shell.press(Key::Digit3);
        assert!(!shell.deck().is_flipped(2));
    }

    #[test]
    fn digits_without_a_card_do_nothing() {
        let (mut shell, _) = mounted();
        assert_eq!(shell.press(Key::Digit9), AppControl::Continue);
        assert_eq!(shell.deck().flipped().count(), 0);
    }

    #[test]
    fn escape_closes_the_page() {
        let (mut shell, _) = mounted();
        assert_eq!(shell.press(Key::Escape), AppControl::Exit);
    }
}
