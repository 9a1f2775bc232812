use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::error::ShotError;
use crate::foundation::math::mul_div255_u8;
use crate::render::pixels::premul_over_px;

/// How grain pixels combine with the composited frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NoiseMode {
    /// Grain is alpha-composited over the frame.
    #[default]
    Blend,
    /// Every pixel is replaced by a gray grain value at the noise alpha.
    LegacyReplace,
}

impl FromStr for NoiseMode {
    type Err = ShotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blend" => Ok(Self::Blend),
            "legacy" | "legacy_replace" | "replace" => Ok(Self::LegacyReplace),
            other => Err(ShotError::validation(format!(
                "unknown noise mode '{other}' (expected blend or legacy)"
            ))),
        }
    }
}

/// Grain alpha for a noise opacity in `[0, 1]`.
pub fn noise_alpha(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Apply film grain to premultiplied RGBA8 bytes in place.
pub(crate) fn apply_noise(data: &mut [u8], opacity: f64, mode: NoiseMode, seed: u64) {
    let alpha = noise_alpha(opacity);
    let mut rng = StdRng::seed_from_u64(seed);
    for px in data.chunks_exact_mut(4) {
        let v = rng.random::<u8>();
        let gray = mul_div255_u8(u16::from(v), u16::from(alpha));
        let grain = [gray, gray, gray, alpha];
        let out = match mode {
            NoiseMode::LegacyReplace => grain,
            NoiseMode::Blend => premul_over_px([px[0], px[1], px[2], px[3]], grain),
        };
        px.copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/noise.rs"]
mod tests;
