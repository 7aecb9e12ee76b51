//! Spring easing for the disclosure widget's width transition.
//!
//! The browser only understands timing functions, so the spring is sampled
//! into a CSS `linear()` easing and paired with its settle time.

pub const MIN_TRANSITION_MS: f64 = 150.0;
pub const MAX_TRANSITION_MS: f64 = 400.0;
const SETTLE_TOLERANCE: f64 = 0.01;
const EASING_SAMPLES: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

pub const WIDTH_SPRING: Spring = Spring {
    stiffness: 320.0,
    damping: 30.0,
    mass: 1.0,
};

impl Spring {
    fn natural_frequency(self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    fn damping_ratio(self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Normalised position at `t` seconds for a unit step starting at rest.
    pub fn position(self, t: f64) -> f64 {
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio();

        if zeta < 1.0 {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega * t).exp();
            1.0 - envelope * ((damped * t).cos() + (zeta * omega / damped) * (damped * t).sin())
        } else if (zeta - 1.0).abs() < f64::EPSILON {
            1.0 - (-omega * t).exp() * (1.0 + omega * t)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let fast = -omega * (zeta + root);
            let slow = -omega * (zeta - root);
            1.0 - (fast * (slow * t).exp() - slow * (fast * t).exp()) / (fast - slow)
        }
    }

    /// Seconds until the response stays within tolerance of its target.
    pub fn settle_seconds(self) -> f64 {
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio();
        let decay = if zeta <= 1.0 {
            zeta * omega
        } else {
            omega * (zeta - (zeta * zeta - 1.0).sqrt())
        };

        if decay <= 0.0 {
            return MAX_TRANSITION_MS / 1_000.0;
        }

        (1.0 / SETTLE_TOLERANCE).ln() / decay
    }

    pub fn transition_ms(self) -> f64 {
        (self.settle_seconds() * 1_000.0).clamp(MIN_TRANSITION_MS, MAX_TRANSITION_MS)
    }

    pub fn css_easing(self) -> String {
        let duration = self.transition_ms() / 1_000.0;
        let mut stops = Vec::with_capacity(EASING_SAMPLES + 1);

        for index in 0..EASING_SAMPLES {
            let t = duration * index as f64 / EASING_SAMPLES as f64;
            stops.push(format!("{:.4}", self.position(t)));
        }
        stops.push("1".to_string());

        format!("linear({})", stops.join(", "))
    }

    pub fn css_transition(self, property: &str) -> String {
        format!(
            "{property} {:.0}ms {}",
            self.transition_ms(),
            self.css_easing()
        )
    }
}
