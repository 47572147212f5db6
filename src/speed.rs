// src/speed.rs

use crate::config::SpeedSettings;
use std::time::Duration;

/// Turns wheel input into the signed speed multiplier shared by the
/// orbital advance and the orbit-frame tumble.
///
/// An accepted wheel event sets the speed outright and arms a single decay
/// deadline; when the deadline passes the speed snaps back to the base speed.
/// Re-arming replaces the deadline, so at most one decay is ever pending.
#[derive(Debug, Clone)]
pub struct SpeedController {
    settings: SpeedSettings,
    speed: f32,
    last_accepted: Option<Duration>,
    decay_deadline: Option<Duration>,
}

impl SpeedController {
    pub fn new(settings: SpeedSettings) -> Self {
        Self {
            speed: settings.base_speed,
            settings,
            last_accepted: None,
            decay_deadline: None,
        }
    }

    /// Feeds one wheel event with vertical delta `delta_y` (positive spins
    /// forward). Returns whether the event was accepted by the rate limit.
    pub fn on_wheel(&mut self, delta_y: f32, now: Duration) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_sub(last) < self.settings.rate_limit {
                return false;
            }
        }
        let magnitude = (delta_y.abs() / self.settings.wheel_divisor)
            .min(self.settings.max_amplification);
        let sign = if delta_y > 0.0 { 1.0 } else { -1.0 };
        self.speed = self.settings.base_speed * sign * (1.0 + magnitude);
        self.last_accepted = Some(now);
        self.decay_deadline = Some(now + self.settings.decay_delay);
        true
    }

    /// Applies the decay deadline if it has passed by `now`.
    pub fn update(&mut self, now: Duration) {
        if self.decay_deadline.is_some_and(|deadline| now >= deadline) {
            self.decay_deadline = None;
            self.speed = self.settings.base_speed;
        }
    }

    pub fn current_speed(&self) -> f32 {
        self.speed
    }

    pub fn base_speed(&self) -> f32 {
        self.settings.base_speed
    }

    pub fn decay_pending(&self) -> bool {
        self.decay_deadline.is_some()
    }

    /// Drops any pending decay and returns to the base speed.
    pub fn cancel(&mut self) {
        self.decay_deadline = None;
        self.last_accepted = None;
        self.speed = self.settings.base_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SpeedController {
        SpeedController::new(SpeedSettings::default())
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn starts_at_base_speed() {
        let speed = controller();
        assert_eq!(speed.current_speed(), 0.3);
        assert!(!speed.decay_pending());
    }

    #[test]
    fn wheel_spins_up_then_settles() {
        let mut speed = controller();
        assert!(speed.on_wheel(40.0, ms(0)));
        assert!((speed.current_speed() - 0.9).abs() < 1e-6);

        speed.update(ms(799));
        assert!((speed.current_speed() - 0.9).abs() < 1e-6);

        speed.update(ms(800));
        assert_eq!(speed.current_speed(), 0.3);
        speed.update(ms(5_000));
        assert_eq!(speed.current_speed(), 0.3);
    }

    #[test]
    fn negative_delta_reverses_direction() {
        let mut speed = controller();
        speed.on_wheel(-20.0, ms(0));
        assert!((speed.current_speed() + 0.6).abs() < 1e-6);
    }

    #[test]
    fn amplification_is_capped() {
        let mut speed = controller();
        speed.on_wheel(10_000.0, ms(0));
        assert!((speed.current_speed() - 0.3 * 11.0).abs() < 1e-5);
    }

    #[test]
    fn events_inside_the_window_are_dropped() {
        let mut speed = controller();
        assert!(speed.on_wheel(40.0, ms(0)));
        assert!(!speed.on_wheel(200.0, ms(10)));
        assert!((speed.current_speed() - 0.9).abs() < 1e-6);

        assert!(speed.on_wheel(200.0, ms(50)));
        assert!((speed.current_speed() - 0.3 * 11.0).abs() < 1e-5);
    }

    #[test]
    fn latest_event_rearms_the_deadline() {
        let mut speed = controller();
        speed.on_wheel(40.0, ms(0));
        speed.on_wheel(40.0, ms(600));
        speed.update(ms(900));
        assert!((speed.current_speed() - 0.9).abs() < 1e-6);
        speed.update(ms(1_400));
        assert_eq!(speed.current_speed(), 0.3);
    }

    #[test]
    fn cancel_clears_pending_decay() {
        let mut speed = controller();
        speed.on_wheel(40.0, ms(0));
        speed.cancel();
        assert!(!speed.decay_pending());
        assert_eq!(speed.current_speed(), 0.3);
        assert!(speed.on_wheel(40.0, ms(1)));
    }
}
