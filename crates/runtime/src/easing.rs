/// Easing curves, named after the GSAP presets the page was tuned with.
///
/// `power1` is quadratic, `power2` cubic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    Power1InOut,
    Power2Out,
    Power2InOut,
    SineInOut,
}

impl Ease {
    /// Maps `t` in `[0, 1]` to eased progress; input is clamped.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::SineInOut => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}
