//! Per-frame bookkeeping that happens before a frame is submitted.

use std::time::Instant;

use crate::camera::OrbitControls;
use crate::params::ParameterSet;
use crate::scene::{GeometryBackend, SceneHost};
use crate::time::Time;

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Rotation applied to the displayed cloud, `None` when nothing is installed.
    pub rotation: Option<f32>,
    /// Current throttled FPS readout.
    pub fps: Option<u32>,
}

/// Drives time, rotation, and camera damping once per frame.
///
/// Rotation is a function of total elapsed time (`elapsed * rotation_speed`),
/// never accumulated, so a speed change takes effect immediately and there is
/// no drift.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    time: Time,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self { time: Time::new() }
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            time: Time::starting_at(start),
        }
    }

    /// Start counting elapsed time from `now`.
    pub fn restart_at(&mut self, now: Instant) {
        self.time = Time::starting_at(now);
    }

    pub fn tick<B: GeometryBackend>(
        &mut self,
        now: Instant,
        params: &ParameterSet,
        scene: &mut SceneHost<B>,
        controls: &mut OrbitControls,
    ) -> FrameStats {
        let (elapsed, _) = self.time.update_at(now);

        let rotation = scene.current().map(|_| elapsed * params.rotation_speed);
        if let Some(angle) = rotation {
            scene.set_rotation(angle);
        }

        controls.update();

        FrameStats {
            elapsed,
            rotation,
            fps: self.time.fps(),
        }
    }

    pub fn time(&self) -> &Time {
        &self.time
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_cloud::PointCloud;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::time::Duration;

    struct NullBackend;

    impl GeometryBackend for NullBackend {
        type Handle = ();
        fn upload(&mut self, _cloud: &PointCloud) -> Self::Handle {}
        fn release(&mut self, _handle: ()) {}
    }

    fn small_params(rotation_speed: f32) -> ParameterSet {
        ParameterSet {
            count: 16,
            rotation_speed,
            ..Default::default()
        }
    }

    #[test]
    fn test_rotation_after_two_seconds() {
        let start = Instant::now();
        let mut render_loop = RenderLoop::starting_at(start);
        let mut scene = SceneHost::new();
        let mut controls = OrbitControls::default();
        let params = small_params(1.0);
        scene.regenerate(&mut NullBackend, &params, &mut SmallRng::seed_from_u64(0));

        let stats = render_loop.tick(start + Duration::from_secs(2), &params, &mut scene, &mut controls);
        assert_eq!(stats.rotation, Some(2.0));
        assert_eq!(scene.rotation(), 2.0);
    }

    #[test]
    fn test_speed_change_applies_to_total_time() {
        let start = Instant::now();
        let mut render_loop = RenderLoop::starting_at(start);
        let mut scene = SceneHost::new();
        let mut controls = OrbitControls::default();
        let slow = small_params(0.25);
        scene.regenerate(&mut NullBackend, &slow, &mut SmallRng::seed_from_u64(0));

        render_loop.tick(start + Duration::from_secs(1), &slow, &mut scene, &mut controls);
        assert_eq!(scene.rotation(), 0.25);

        let fast = small_params(0.5);
        render_loop.tick(start + Duration::from_secs(4), &fast, &mut scene, &mut controls);
        assert_eq!(scene.rotation(), 2.0);
    }

    #[test]
    fn test_restart_discards_setup_time() {
        let created = Instant::now();
        let mut render_loop = RenderLoop::starting_at(created);
        let mut scene = SceneHost::new();
        let mut controls = OrbitControls::default();
        let params = small_params(1.0);
        scene.regenerate(&mut NullBackend, &params, &mut SmallRng::seed_from_u64(0));

        // Three seconds of window and GPU setup before the first frame.
        let first_frame = created + Duration::from_secs(3);
        render_loop.restart_at(first_frame);

        let stats = render_loop.tick(first_frame + Duration::from_millis(500), &params, &mut scene, &mut controls);
        assert_eq!(stats.elapsed, 0.5);
        assert_eq!(scene.rotation(), 0.5);
        assert_eq!(render_loop.time().frame(), 1);
    }

    #[test]
    fn test_tick_without_cloud_skips_rotation() {
        let start = Instant::now();
        let mut render_loop = RenderLoop::starting_at(start);
        let mut scene: SceneHost<NullBackend> = SceneHost::new();
        let mut controls = OrbitControls::default();

        let stats = render_loop.tick(start + Duration::from_secs(1), &small_params(1.0), &mut scene, &mut controls);
        assert_eq!(stats.rotation, None);
        assert_eq!(stats.elapsed, 1.0);
    }
}
