//! Galaxy generation parameters.
//!
//! A [`ParameterSet`] fully describes one galaxy. The viewer owns a single
//! instance and replaces it wholesale whenever the control panel commits an
//! edit, so there is never a half-updated parameter set.
//!
//! Each tunable field has a [`Control`] with the bounds the control panel
//! enforces. Values loaded from a config file go through
//! [`ParameterSet::sanitized`] so they land inside the same bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An RGB color with channels in `0.0..=1.0`.
///
/// Serialized as a `#rrggbb` hex string. Channels are taken as `byte / 255`
/// with no color-space conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let packed = u32::from_str_radix(digits, 16).map_err(|_| ParseColorError(s.to_string()))?;
        Ok(Self::from_u32(packed))
    }

    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Linear interpolation in RGB space. `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    pub fn lerp(&self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A string that is not a `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}', expected #rrggbb", self.0)
    }
}

impl std::error::Error for ParseColorError {}

/// Everything needed to generate a galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Number of points generated.
    pub count: u32,
    /// Rendered point size in world units (attenuated by distance).
    pub point_size: f32,
    /// Maximum galaxy radius.
    pub radius: f32,
    /// Number of spiral arms.
    pub branches: u32,
    /// Radians of twist per unit radius.
    pub spin: f32,
    /// Jitter magnitude as a fraction of `radius`.
    pub randomness: f32,
    /// Exponent pulling jitter toward the arm center line.
    pub randomness_pow: f32,
    /// Color at the galaxy center.
    pub inside_color: Rgb,
    /// Color at `radius`.
    pub outside_color: Rgb,
    /// Whole-cloud rotation in radians per second.
    pub rotation_speed: f32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            count: 240_000,
            point_size: 0.025,
            radius: 6.75,
            branches: 3,
            spin: 2.5,
            randomness: 0.25,
            randomness_pow: 4.5,
            inside_color: Rgb::from_u32(0xff3c30),
            outside_color: Rgb::from_u32(0x1b7184),
            rotation_speed: 0.0,
        }
    }
}

impl ParameterSet {
    /// Branch count used for arm assignment, never zero.
    #[inline]
    pub fn arm_count(&self) -> u32 {
        self.branches.max(1)
    }

    /// Read a numeric control's current value.
    pub fn get(&self, control: Control) -> f64 {
        match control {
            Control::Count => self.count as f64,
            Control::PointSize => self.point_size as f64,
            Control::Radius => self.radius as f64,
            Control::Branches => self.branches as f64,
            Control::Spin => self.spin as f64,
            Control::Randomness => self.randomness as f64,
            Control::RandomnessPow => self.randomness_pow as f64,
            Control::RotationSpeed => self.rotation_speed as f64,
        }
    }

    /// Set a numeric control, clamped to its bounds and snapped to its step.
    pub fn set(&mut self, control: Control, value: f64) {
        let v = control.bounds().constrain(value);
        match control {
            Control::Count => self.count = v as u32,
            Control::PointSize => self.point_size = v as f32,
            Control::Radius => self.radius = v as f32,
            Control::Branches => self.branches = v as u32,
            Control::Spin => self.spin = v as f32,
            Control::Randomness => self.randomness = v as f32,
            Control::RandomnessPow => self.randomness_pow = v as f32,
            Control::RotationSpeed => self.rotation_speed = v as f32,
        }
    }

    /// Copy with every numeric field pulled into its control bounds and
    /// colors clamped to `0..=1`.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        for control in Control::ALL {
            let bounds = control.bounds();
            let value = self.get(control);
            let clamped = if value.is_finite() {
                value.clamp(bounds.min, bounds.max)
            } else {
                ParameterSet::default().get(control)
            };
            out.set_unsnapped(control, clamped);
        }
        for c in [&mut out.inside_color, &mut out.outside_color] {
            c.r = c.r.clamp(0.0, 1.0);
            c.g = c.g.clamp(0.0, 1.0);
            c.b = c.b.clamp(0.0, 1.0);
        }
        out
    }

    fn set_unsnapped(&mut self, control: Control, v: f64) {
        match control {
            Control::Count => self.count = v.round() as u32,
            Control::PointSize => self.point_size = v as f32,
            Control::Radius => self.radius = v as f32,
            Control::Branches => self.branches = v.round() as u32,
            Control::Spin => self.spin = v as f32,
            Control::Randomness => self.randomness = v as f32,
            Control::RandomnessPow => self.randomness_pow = v as f32,
            Control::RotationSpeed => self.rotation_speed = v as f32,
        }
    }
}

/// Numeric slider bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Bounds {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Snap to the nearest multiple of `step`, then clamp into `min..=max`.
    ///
    /// Multiples are absolute, not counted from `min`, so a count slider
    /// with `min = 1` and `step = 100` lands on 100, 200, ...
    pub fn constrain(&self, value: f64) -> f64 {
        let snapped = if self.step > 0.0 {
            (value / self.step).round() * self.step
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }
}

/// The numeric fields the control panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Count,
    PointSize,
    Radius,
    Branches,
    Spin,
    Randomness,
    RandomnessPow,
    RotationSpeed,
}

impl Control {
    /// Panel order.
    pub const ALL: [Control; 8] = [
        Control::Count,
        Control::PointSize,
        Control::Radius,
        Control::Branches,
        Control::Spin,
        Control::Randomness,
        Control::RandomnessPow,
        Control::RotationSpeed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Control::Count => "count",
            Control::PointSize => "size",
            Control::Radius => "radius",
            Control::Branches => "branches",
            Control::Spin => "spin",
            Control::Randomness => "randomness",
            Control::RandomnessPow => "randomnessPow",
            Control::RotationSpeed => "speed",
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Control::Count => Bounds::new(1.0, 500_000.0, 100.0),
            Control::PointSize => Bounds::new(0.001, 0.1, 0.001),
            Control::Radius => Bounds::new(0.01, 20.0, 0.01),
            Control::Branches => Bounds::new(1.0, 20.0, 1.0),
            Control::Spin => Bounds::new(-5.0, 5.0, 0.001),
            Control::Randomness => Bounds::new(0.0, 1.0, 0.01),
            Control::RandomnessPow => Bounds::new(0.0, 10.0, 0.01),
            Control::RotationSpeed => Bounds::new(0.0, 1.0, 0.01),
        }
    }

    /// Whether the field is integral (drawn as an integer slider).
    pub fn is_integer(&self) -> bool {
        matches!(self, Control::Count | Control::Branches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_control_bounds() {
        let params = ParameterSet::default();
        assert_eq!(params.sanitized(), params);
    }

    #[test]
    fn test_hex_round_trip() {
        let c = Rgb::from_hex("#ff3c30").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 60.0 / 255.0);
        assert_eq!(c.b, 48.0 / 255.0);
        assert_eq!(c.to_hex(), "#ff3c30");
        assert_eq!("1b7184".parse::<Rgb>().unwrap(), Rgb::from_u32(0x1b7184));
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("+10203").is_err());
        assert!(Rgb::from_hex("#+fffff").is_err());
        assert!(Rgb::from_hex("-00000").is_err());
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(1.0, 0.0, 0.0);
        let b = Rgb::new(0.0, 0.0, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_set_clamps_and_snaps() {
        let mut params = ParameterSet::default();
        params.set(Control::Count, 1_000_000.0);
        assert_eq!(params.count, 500_000);

        params.set(Control::Count, 12_345.0);
        assert_eq!(params.count, 12_300);

        params.set(Control::Branches, 0.0);
        assert_eq!(params.branches, 1);

        params.set(Control::Spin, -9.0);
        assert_eq!(params.spin, -5.0);
    }

    #[test]
    fn test_count_snaps_to_absolute_multiples() {
        let mut params = ParameterSet::default();
        params.set(Control::Count, 240_000.0);
        assert_eq!(params.count, 240_000);

        params.set(Control::Count, 100.0);
        assert_eq!(params.count, 100);

        params.set(Control::Count, 149.0);
        assert_eq!(params.count, 100);

        // Below the first multiple the minimum wins.
        params.set(Control::Count, 1.0);
        assert_eq!(params.count, 1);
    }

    #[test]
    fn test_default_values_survive_set() {
        let defaults = ParameterSet::default();
        for control in Control::ALL {
            let mut params = defaults.clone();
            params.set(control, defaults.get(control));
            assert!(
                (params.get(control) - defaults.get(control)).abs() < 1e-6,
                "{} moved off its default",
                control.label()
            );
        }
    }

    #[test]
    fn test_sanitized_pulls_values_into_bounds() {
        let params = ParameterSet {
            radius: -3.0,
            randomness: 4.0,
            rotation_speed: f32::NAN,
            inside_color: Rgb::new(2.0, -1.0, 0.5),
            ..Default::default()
        };
        let clean = params.sanitized();
        assert_eq!(clean.radius, 0.01);
        assert_eq!(clean.randomness, 1.0);
        assert_eq!(clean.rotation_speed, 0.0);
        assert_eq!(clean.inside_color, Rgb::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_arm_count_never_zero() {
        let params = ParameterSet {
            branches: 0,
            ..Default::default()
        };
        assert_eq!(params.arm_count(), 1);
    }

    #[test]
    fn test_serde_uses_hex_colors() {
        let json = serde_json::to_string(&ParameterSet::default()).unwrap();
        assert!(json.contains("\"inside_color\":\"#ff3c30\""));
        let back: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.inside_color.to_hex(), "#ff3c30");
    }
}
