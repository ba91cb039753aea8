//! Per-pixel orb compositor: polar lobes, dual noise rings, and the 6-stop
//! color ramp. Pure functions of a uniform snapshot and a screen
//! coordinate; all temporal behavior lives in the frame driver.

use super::noise::{NoiseField, mix, noise2};
use crate::palette::{Rgb, ramp6};
use std::f32::consts::{PI, TAU};

/// Complete set of parameters for one frame of shading.
pub struct Snapshot<'a> {
    pub time: f32,
    pub phase: f32,
    pub input_level: f32,
    pub output_level: f32,
    pub opacity: f32,
    pub inverted: bool,
    pub colors: [Rgb; 6],
    pub offsets: [f32; 7],
    pub noise: &'a NoiseField,
}

/// GLSL-style smoothstep; edges may be reversed.
#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Angle split into three channels so noise lookups have no seam at the
/// angular wrap boundary: the plain turn fraction, a half-turn-offset
/// copy, and a blend weight that favors whichever copy is far from its
/// own seam.
#[inline]
fn decompose_angle(theta: f32) -> (f32, f32, f32) {
    let turn = theta / TAU;
    (turn, (turn + 0.5).rem_euclid(1.0) + 1.0, (theta / PI - 1.0).abs())
}

/// Flow-warp noise: two half-turn-offset lookups into the tileable field,
/// blended by the seam weight.
fn flow(noise: &NoiseField, dec: (f32, f32, f32), time: f32) -> f32 {
    mix(
        noise.sample(time, dec.0 / 2.0),
        noise.sample(time, dec.1 / 2.0),
        dec.2,
    )
}

fn sharp_ring(dec: (f32, f32, f32), time: f32) -> f32 {
    let ring_start = 1.0;
    let ring_width = 0.3;
    let noise_scale = 5.0;

    let n = mix(
        noise2(dec.0 * noise_scale, time * noise_scale),
        noise2(dec.1 * noise_scale, time * noise_scale),
        dec.2,
    );
    let n = (n - 0.5) * 2.5;
    ring_start + n * ring_width * 1.5
}

fn smooth_ring(dec: (f32, f32, f32), time: f32) -> f32 {
    let ring_start = 0.9;
    let ring_width = 0.2;
    let noise_scale = 6.0;

    let n = mix(
        noise2(dec.0 * noise_scale, time * noise_scale),
        noise2(dec.1 * noise_scale, time * noise_scale),
        dec.2,
    );
    let n = (n - 0.5) * 5.0;
    ring_start + n * ring_width
}

/// Soft-edged ellipse in angular/radial space. Returns the lobe's
/// grayscale value and alpha when the point is inside the soft edge.
fn draw_oval(
    p: (f32, f32),
    a: f32,
    b: f32,
    reverse_gradient: bool,
    softness: f32,
) -> Option<(f32, f32)> {
    let a = a.max(1e-6);
    let b = b.max(1e-6);
    let oval = (p.0 * p.0) / (a * a) + (p.1 * p.1) / (b * b);
    let edge = smoothstep(1.0, 1.0 - softness, oval);
    if edge <= 0.0 {
        return None;
    }
    let gradient = if reverse_gradient {
        1.0 - (p.0 / a + 1.0) / 2.0
    } else {
        (p.0 / a + 1.0) / 2.0
    };
    // Flatten toward mid-gray for a more uniform surface.
    let gradient = mix(0.5, gradient, 0.1);
    Some((gradient, 0.85 * edge))
}

/// Shade one point. `nx`/`ny` are centered coordinates in [-1, 1] (the
/// orb's bounding square); returns straight-alpha RGBA in [0, 1].
pub fn shade(s: &Snapshot<'_>, nx: f32, ny: f32) -> [f32; 4] {
    let radius = (nx * nx + ny * ny).sqrt();
    // The orb occupies the unit disc; everything outside it is
    // transparent surface, not orb.
    if radius > 1.0 {
        return [0.0, 0.0, 0.0, 0.0];
    }
    let mut theta = ny.atan2(nx);
    if theta < 0.0 {
        theta += TAU;
    }

    let dec = decompose_angle(theta);

    // Flow-like distortion of the angle.
    let warp = flow(s.noise, dec, radius * 0.03 - s.phase * 0.2) - 0.5;
    let theta = theta + warp * mix(0.08, 0.25, s.output_level);

    // Grayscale accumulator, starting at white.
    let mut gray = 1.0f32;
    let mut alpha = 1.0f32;

    // Seven lobes, quarter-turn apart, each wobbled by its fixed offset.
    for i in 0..7 {
        let center = i as f32 * 0.5 * PI + 0.5 * (s.time / 20.0 + s.offsets[i]).sin();

        let n = s
            .noise
            .sample((center + s.time * 0.05).rem_euclid(1.0), 0.5);
        let a = 0.5 + n * 0.3;
        let b = n * mix(3.5, 2.5, s.input_level);
        let reverse = i % 2 == 1;

        // Nearest angular distance across the wrap.
        let dist_theta = (theta - center)
            .abs()
            .min((theta + TAU - center).abs())
            .min((theta - TAU - center).abs());

        if let Some((lobe_gray, lobe_alpha)) = draw_oval((dist_theta, radius), a, b, reverse, 0.6)
        {
            gray = mix(gray, lobe_gray, lobe_alpha);
            alpha = alpha.max(lobe_alpha);
        }
    }

    // Two noisy concentric rings, inflated by the input level.
    let ring_radius1 = sharp_ring(dec, s.time * 0.1);
    let ring_radius2 = smooth_ring(dec, s.time * 0.1);

    let input_radius1 = radius + s.input_level * 0.2;
    let input_radius2 = radius + s.input_level * 0.15;
    let opacity1 = mix(0.2, 0.6, s.input_level);
    let opacity2 = mix(0.15, 0.45, s.input_level);

    let ring_alpha1 = if input_radius2 >= ring_radius1 { opacity1 } else { 0.0 };
    let ring_alpha2 =
        smoothstep(ring_radius2 - 0.05, ring_radius2 + 0.05, input_radius1) * opacity2;
    let total_ring_alpha = ring_alpha1.max(ring_alpha2);

    // Screen blend with the white ring color.
    gray = 1.0 - (1.0 - gray) * (1.0 - total_ring_alpha);

    let luminance = if s.inverted { 1.0 - gray } else { gray };
    let rgb = ramp6(luminance, &s.colors);

    [rgb.r, rgb.g, rgb.b, alpha * s.opacity]
}

/// Fill a straight-alpha RGBA8 buffer. Pixels map onto a centered square
/// spanning the smaller target dimension so the orb stays round on
/// non-square surfaces.
pub fn render_frame(s: &Snapshot<'_>, w: usize, h: usize, out: &mut [u8]) {
    let need = w.saturating_mul(h).saturating_mul(4);
    if w == 0 || h == 0 || out.len() < need {
        return;
    }

    let half = (w.min(h) as f32) / 2.0;
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;

    for y in 0..h {
        // Flip vertically: buffer rows run top-down, shader space bottom-up.
        let ny = (cy - (y as f32 + 0.5)) / half;
        for x in 0..w {
            let nx = (x as f32 + 0.5 - cx) / half;
            let c = shade(s, nx, ny);
            let i = (y * w + x) * 4;
            out[i] = (c[0].clamp(0.0, 1.0) * 255.0) as u8;
            out[i + 1] = (c[1].clamp(0.0, 1.0) * 255.0) as u8;
            out[i + 2] = (c[2].clamp(0.0, 1.0) * 255.0) as u8;
            out[i + 3] = (c[3].clamp(0.0, 1.0) * 255.0) as u8;
        }
    }
}
