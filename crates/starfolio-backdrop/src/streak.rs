use glam::Vec3;
use rand::Rng;

use crate::config::StreakConfig;

/// Lifecycle of a streak. Transitions only forward, once.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StreakState {
    Alive,
    Removed,
}

/// A shooting star: a fixed polyline that drifts and fades out.
#[derive(Debug, Clone)]
pub struct Streak {
    /// Polyline in object space; never recomputed after spawn.
    points: Box<[Vec3]>,
    /// Accumulated translation.
    offset: Vec3,
    velocity: Vec3,

    initial_opacity: f32,
    decay: f32,
    /// Updates applied so far.
    ticks: u32,
    /// Number of updates after which opacity has reached zero.
    lifetime: u32,

    state: StreakState,
}

impl Streak {
    /// Spawns a streak at a random origin inside the configured ranges.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &StreakConfig) -> Self {
        let origin = Vec3::new(
            rng.random_range(config.origin_x.clone()),
            rng.random_range(config.origin_y.clone()),
            rng.random_range(config.origin_z.clone()),
        );
        Self::from_origin(origin, config)
    }

    /// Builds the streak polyline: point `i` sits at `origin + i * segment_step`.
    pub fn from_origin(origin: Vec3, config: &StreakConfig) -> Self {
        let points = (0..config.segment_count)
            .map(|i| origin + config.segment_step * i as f32)
            .collect();

        Self {
            points,
            offset: Vec3::ZERO,
            velocity: config.velocity,
            initial_opacity: config.initial_opacity,
            decay: config.opacity_decay,
            ticks: 0,
            lifetime: fade_ticks(config.initial_opacity, config.opacity_decay),
            state: StreakState::Alive,
        }
    }

    /// Applies one frame of motion and fading.
    ///
    /// Returns the state after the update. A removed streak ignores further updates.
    pub fn update(&mut self) -> StreakState {
        if self.state == StreakState::Removed {
            return StreakState::Removed;
        }

        self.offset += self.velocity;
        self.ticks += 1;

        if self.ticks >= self.lifetime {
            self.state = StreakState::Removed;
        }
        self.state
    }

    #[inline]
    pub fn state(&self) -> StreakState {
        self.state
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == StreakState::Alive
    }

    /// Current opacity; zero once removed.
    pub fn opacity(&self) -> f32 {
        match self.state {
            StreakState::Alive => (self.initial_opacity - self.decay * self.ticks as f32).max(0.0),
            StreakState::Removed => 0.0,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.points[0]
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Polyline points with the current offset applied.
    pub fn world_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().map(move |p| *p + self.offset)
    }
}

/// Number of decay steps needed to take `initial` down to zero.
///
/// Computed once so accumulated float error cannot add or drop a frame:
/// 0.8 / 0.02 is exactly 40 updates.
fn fade_ticks(initial: f32, decay: f32) -> u32 {
    ((initial / decay) - 1e-4).ceil().max(1.0) as u32
}

/// The live streaks of one scene.
#[derive(Debug, Default)]
pub struct StreakField {
    streaks: Vec<Streak>,
}

impl StreakField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, streak: Streak) {
        self.streaks.push(streak);
    }

    /// Updates every streak once and drops those that finished fading.
    ///
    /// Returns how many were removed.
    pub fn update(&mut self) -> usize {
        let before = self.streaks.len();
        self.streaks.retain_mut(|s| s.update() == StreakState::Alive);
        before - self.streaks.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Streak] {
        &self.streaks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.streaks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.streaks.is_empty()
    }

    pub fn clear(&mut self) {
        self.streaks.clear();
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn cfg() -> StreakConfig {
        StreakConfig::default()
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn polyline_descends_diagonally() {
        let s = Streak::from_origin(Vec3::new(100.0, 300.0, 0.0), &cfg());
        assert_eq!(s.points().len(), 10);
        assert_eq!(s.points()[0], Vec3::new(100.0, 300.0, 0.0));
        assert_eq!(s.points()[1], Vec3::new(80.0, 285.0, -10.0));
        assert_eq!(s.points()[9], Vec3::new(-80.0, 165.0, -90.0));
    }

    #[test]
    fn spawn_origin_within_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let o = Streak::spawn(&mut rng, &cfg()).origin();
            assert!((-500.0..=500.0).contains(&o.x));
            assert!((200.0..=700.0).contains(&o.y));
            assert!((-250.0..=250.0).contains(&o.z));
        }
    }

    #[test]
    fn fresh_streak_is_alive_at_initial_opacity() {
        let s = Streak::from_origin(Vec3::ZERO, &cfg());
        assert!(s.is_alive());
        assert_eq!(s.opacity(), 0.8);
        assert_eq!(s.offset(), Vec3::ZERO);
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn update_moves_and_fades() {
        let mut s = Streak::from_origin(Vec3::ZERO, &cfg());
        s.update();
        assert_eq!(s.offset(), Vec3::new(-5.0, -3.0, 0.0));
        assert!((s.opacity() - 0.78).abs() < 1e-6);
        assert_eq!(s.points()[0], Vec3::ZERO, "geometry is fixed after spawn");
        assert_eq!(s.world_points().next(), Some(Vec3::new(-5.0, -3.0, 0.0)));
    }

    #[test]
    fn removed_after_exactly_forty_updates() {
        let mut s = Streak::from_origin(Vec3::ZERO, &cfg());
        for i in 1..40 {
            assert_eq!(s.update(), StreakState::Alive, "removed early at update {i}");
            assert!(s.opacity() > 0.0);
        }
        assert_eq!(s.update(), StreakState::Removed);
        assert_eq!(s.opacity(), 0.0);
    }

    #[test]
    fn removed_streak_ignores_updates() {
        let mut s = Streak::from_origin(Vec3::ZERO, &cfg());
        for _ in 0..40 {
            s.update();
        }
        let offset = s.offset();
        assert_eq!(s.update(), StreakState::Removed);
        assert_eq!(s.offset(), offset);
        assert_eq!(s.ticks(), 40);
    }

    #[test]
    fn fade_ticks_rounds_up_partial_steps() {
        assert_eq!(fade_ticks(0.8, 0.02), 40);
        assert_eq!(fade_ticks(0.8, 0.03), 27);
        assert_eq!(fade_ticks(1.0, 0.25), 4);
    }

    // ── field ─────────────────────────────────────────────────────────────

    #[test]
    fn field_drops_finished_streaks() {
        let mut field = StreakField::new();
        field.push(Streak::from_origin(Vec3::ZERO, &cfg()));
        for _ in 0..20 {
            assert_eq!(field.update(), 0);
        }
        field.push(Streak::from_origin(Vec3::ONE, &cfg()));
        for _ in 0..19 {
            assert_eq!(field.update(), 0);
        }
        assert_eq!(field.update(), 1, "first streak ends at its 40th update");
        assert_eq!(field.len(), 1);
        assert_eq!(field.as_slice()[0].origin(), Vec3::ONE);
    }

    #[test]
    fn streaks_are_independent() {
        let mut field = StreakField::new();
        field.push(Streak::from_origin(Vec3::ZERO, &cfg()));
        field.update();
        field.push(Streak::from_origin(Vec3::ZERO, &cfg()));
        let [a, b] = field.as_slice() else { panic!("expected two streaks") };
        assert_eq!(a.ticks(), 1);
        assert_eq!(b.ticks(), 0);
        assert_eq!(b.opacity(), 0.8);
    }
}
