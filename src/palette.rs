//! Color stops: parsing, the preset catalog, the priority resolver, and the
//! 6-stop ramp the shader maps luminance through.

/// RGB triple in [0, 1] per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB` (also accepts short `#RGB`).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        let (r, g, b) = match hex.len() {
            6 => (
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            ),
            3 => {
                let d = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                (d(0)?, d(1)?, d(2)?)
            }
            _ => return None,
        };
        Some(Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ))
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }
}

/// Built-in fallback when no configured source yields at least two stops.
pub const DEFAULT_STOPS: [Rgb; 2] = [
    Rgb::new(0.792_156_9, 0.862_745_1, 0.988_235_3), // #CADCFC
    Rgb::new(0.627_451, 0.725_490_2, 0.819_607_8),   // #A0B9D1
];

/// Named preset catalog. Entries always carry 2..=6 stops.
pub const PRESET_NAMES: [&str; 3] = ["ice", "ice-rich", "og6"];

pub fn preset_stops(name: &str) -> Option<Vec<Rgb>> {
    let hex: &[&str] = match name {
        "ice" => &["#A3E4FF", "#F6A9FF"],
        "ice-rich" => &["#A3E4FF", "#F6A9FF", "#D1F4FF", "#FFFFFF"],
        "og6" => &["#e6c9bf", "#d2b5aa", "#cbaea3", "#d4b5ab", "#e5c3bd", "#d9bcb1"],
        _ => return None,
    };
    Some(hex.iter().filter_map(|h| Rgb::from_hex(h)).collect())
}

/// Parse a comma-separated hex list. Unparsable tokens are dropped rather
/// than surfaced; callers treat a result with fewer than two stops as an
/// absent source.
pub fn parse_stop_list(csv: &str) -> Vec<Rgb> {
    csv.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(Rgb::from_hex)
        .collect()
}

fn usable(stops: Option<&[Rgb]>) -> Option<&[Rgb]> {
    stops.filter(|s| s.len() >= 2)
}

/// Select the active stop list. Priority: explicit configuration, then the
/// externally-owned live list, then a named preset, then the built-in
/// default. A source only counts when it has at least two stops; the
/// resolver never inspects the color values themselves.
pub fn resolve_stops(
    explicit: Option<&[Rgb]>,
    live: Option<&[Rgb]>,
    preset: Option<&str>,
) -> Vec<Rgb> {
    if let Some(s) = usable(explicit) {
        return s.to_vec();
    }
    if let Some(s) = usable(live) {
        return s.to_vec();
    }
    if let Some(stops) = preset.and_then(preset_stops) {
        if stops.len() >= 2 {
            return stops;
        }
    }
    DEFAULT_STOPS.to_vec()
}

/// Map a grayscale value through six color stops. The first four segments
/// are each 1/6 wide; the last spans the remaining third.
pub fn ramp6(g: f32, c: &[Rgb; 6]) -> Rgb {
    const SEG: f32 = 1.0 / 6.0;
    let g = g.clamp(0.0, 1.0);
    if g < SEG {
        c[0].lerp(c[1], g / SEG)
    } else if g < 2.0 * SEG {
        c[1].lerp(c[2], (g - SEG) / SEG)
    } else if g < 3.0 * SEG {
        c[2].lerp(c[3], (g - 2.0 * SEG) / SEG)
    } else if g < 4.0 * SEG {
        c[3].lerp(c[4], (g - 3.0 * SEG) / SEG)
    } else {
        c[4].lerp(c[5], (g - 4.0 * SEG) / (1.0 / 3.0))
    }
}
