//! Noise sources for the orb shader: one precomputed tileable field used
//! for flow warping and lobe extents, and an analytic gradient noise used
//! by the two rings.

use crate::rng::SeededRng;

const FIELD_SIZE: usize = 256;
// The field is an internal asset, not part of the per-orb seed; a fixed
// seed keeps renders identical across instances and runs.
const FIELD_SEED: u32 = 0x0B5E_55ED;

/// Tileable value-noise field, sampled with repeat wrapping and bilinear
/// filtering. Built once at startup in place of an image asset.
pub struct NoiseField {
    data: Vec<f32>,
}

impl NoiseField {
    pub fn new() -> Self {
        let mut rng = SeededRng::new(FIELD_SEED);

        // Wrapped lattices at three octaves; summing them gives the smooth
        // low-frequency character the flow warp needs.
        let octaves: [(usize, f32); 3] = [(8, 0.5), (16, 0.3), (32, 0.2)];
        let lattices: Vec<(usize, f32, Vec<f32>)> = octaves
            .iter()
            .map(|&(n, w)| {
                let vals = (0..n * n).map(|_| rng.next_f32()).collect();
                (n, w, vals)
            })
            .collect();

        let mut data = vec![0.0f32; FIELD_SIZE * FIELD_SIZE];
        for y in 0..FIELD_SIZE {
            for x in 0..FIELD_SIZE {
                let u = x as f32 / FIELD_SIZE as f32;
                let v = y as f32 / FIELD_SIZE as f32;
                let mut sum = 0.0;
                for (n, w, vals) in &lattices {
                    sum += w * lattice_sample(vals, *n, u, v);
                }
                data[y * FIELD_SIZE + x] = sum;
            }
        }
        Self { data }
    }

    /// Sample the red channel at (u, v) with repeat wrapping.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let fu = wrap01(u) * FIELD_SIZE as f32;
        let fv = wrap01(v) * FIELD_SIZE as f32;
        let x0 = fu as usize % FIELD_SIZE;
        let y0 = fv as usize % FIELD_SIZE;
        let x1 = (x0 + 1) % FIELD_SIZE;
        let y1 = (y0 + 1) % FIELD_SIZE;
        let tx = fu.fract();
        let ty = fv.fract();

        let at = |x: usize, y: usize| self.data[y * FIELD_SIZE + x];
        let top = at(x0, y0) + (at(x1, y0) - at(x0, y0)) * tx;
        let bot = at(x0, y1) + (at(x1, y1) - at(x0, y1)) * tx;
        top + (bot - top) * ty
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap01(x: f32) -> f32 {
    let f = x.fract();
    if f < 0.0 { f + 1.0 } else { f }
}

fn lattice_sample(vals: &[f32], n: usize, u: f32, v: f32) -> f32 {
    let fu = u * n as f32;
    let fv = v * n as f32;
    let x0 = fu as usize % n;
    let y0 = fv as usize % n;
    let x1 = (x0 + 1) % n;
    let y1 = (y0 + 1) % n;
    let tx = smoothstep01(fu.fract());
    let ty = smoothstep01(fv.fract());

    let at = |x: usize, y: usize| vals[y * n + x];
    let top = at(x0, y0) + (at(x1, y0) - at(x0, y0)) * tx;
    let bot = at(x0, y1) + (at(x1, y1) - at(x0, y1)) * tx;
    top + (bot - top) * ty
}

#[inline]
fn smoothstep01(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn hash2(px: f32, py: f32) -> (f32, f32) {
    let a = px * 127.1 + py * 311.7;
    let b = px * 269.5 + py * 183.3;
    (fract(a.sin() * 43758.547), fract(b.sin() * 43758.547))
}

/// Analytic gradient noise used by the ring radii. The hash keeps its
/// gradient components in [0, 1); the ring displacement constants assume
/// that biased form, so it must not be recentered.
pub fn noise2(px: f32, py: f32) -> f32 {
    let ix = px.floor();
    let iy = py.floor();
    let fx = px - ix;
    let fy = py - iy;

    let ux = fx * fx * (3.0 - 2.0 * fx);
    let uy = fy * fy * (3.0 - 2.0 * fy);

    let dot_at = |cx: f32, cy: f32| {
        let (gx, gy) = hash2(ix + cx, iy + cy);
        gx * (fx - cx) + gy * (fy - cy)
    };

    let n = mix(
        mix(dot_at(0.0, 0.0), dot_at(1.0, 0.0), ux),
        mix(dot_at(0.0, 1.0), dot_at(1.0, 1.0), ux),
        uy,
    );
    0.5 + 0.5 * n
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
