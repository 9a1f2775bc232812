use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ShotError, ShotResult};

/// Named App Store device profile, or an explicit size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputResolution {
    /// iPhone 6.9" (1320×2868).
    IPhone69,
    /// iPhone 6.7" (1290×2796).
    IPhone67,
    /// iPhone 6.5" (1284×2778).
    IPhone65,
    /// iPhone 6.1" (1179×2556).
    IPhone61,
    /// iPhone 5.5" (1242×2208).
    IPhone55,
    /// iPad 13" (2064×2752).
    IPad13,
    /// iPad Pro 12.9" (2048×2732).
    IPad129,
    /// iPad 11" (1668×2388).
    IPad11,
    /// Arbitrary size.
    Custom {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

const PROFILES: &[(&str, OutputResolution, u32, u32)] = &[
    ("iphone-6.9", OutputResolution::IPhone69, 1320, 2868),
    ("iphone-6.7", OutputResolution::IPhone67, 1290, 2796),
    ("iphone-6.5", OutputResolution::IPhone65, 1284, 2778),
    ("iphone-6.1", OutputResolution::IPhone61, 1179, 2556),
    ("iphone-5.5", OutputResolution::IPhone55, 1242, 2208),
    ("ipad-13", OutputResolution::IPad13, 2064, 2752),
    ("ipad-12.9", OutputResolution::IPad129, 2048, 2732),
    ("ipad-11", OutputResolution::IPad11, 1668, 2388),
];

impl OutputResolution {
    /// All named profiles with their keys.
    pub fn named() -> impl Iterator<Item = (&'static str, OutputResolution)> {
        PROFILES.iter().map(|(k, r, _, _)| (*k, *r))
    }

    /// Pixel size of this profile.
    pub fn size(self) -> (u32, u32) {
        if let Self::Custom { width, height } = self {
            return (width, height);
        }
        PROFILES
            .iter()
            .find(|(_, r, _, _)| *r == self)
            .map(|(_, _, w, h)| (*w, *h))
            .unwrap_or((0, 0))
    }

    /// Validated canvas for this profile.
    pub fn canvas(self) -> ShotResult<Canvas> {
        let (w, h) = self.size();
        Canvas::new(w, h)
    }
}

impl FromStr for OutputResolution {
    type Err = ShotError;

    /// Accepts a profile key (`iphone-6.7`) or `WIDTHxHEIGHT`.
    fn from_str(s: &str) -> ShotResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        if let Some((_, r, _, _)) = PROFILES.iter().find(|(k, _, _, _)| *k == key) {
            return Ok(*r);
        }
        if let Some((w, h)) = key.split_once('x')
            && let (Ok(width), Ok(height)) = (w.parse::<u32>(), h.parse::<u32>())
        {
            Canvas::new(width, height)?;
            return Ok(Self::Custom { width, height });
        }
        Err(ShotError::validation(format!("unknown device profile '{s}'")))
    }
}

impl fmt::Display for OutputResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match PROFILES.iter().find(|(_, r, _, _)| r == self) {
            Some((k, _, _, _)) => f.write_str(k),
            None => {
                let (w, h) = self.size();
                write!(f, "{w}x{h}")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/resolution.rs"]
mod tests;
