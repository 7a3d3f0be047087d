//! Built-in point-cloud generators.
//!
//! Every generator has the signature `fn(count, rng) -> Vec<Point3>` and
//! returns exactly `count` points centred roughly on the origin, within a
//! radius of about 3 world units.  Deterministic shapes ignore `rng`.
//!
//! | Name        | Construction                                              |
//! |-------------|-----------------------------------------------------------|
//! | `sphere`    | golden-spiral shell, r = 2                                |
//! | `heart`     | parametric heart curve with random depth                  |
//! | `flower`    | sphere with 5-fold petal modulation                       |
//! | `sun`       | 70 % core shell, 30 % long rays                           |
//! | `saturn`    | spiral planet plus a ring tilted 0.4 rad about x          |
//! | `torus`     | R = 1.5, r = 0.5                                          |
//! | `helix`     | five turns, y ∈ [-2, 2)                                   |
//! | `dna`       | two interleaved helices with rungs every 50 points        |
//! | `galaxy`    | three flat spiral arms                                    |
//! | `cube`      | uniform volume, side 3                                    |
//! | `ring`      | thin band, r = 2                                          |
//! | `wave`      | sheet y = ½·sin(2x + z)                                   |
//! | `vortex`    | widening funnel                                           |
//! | `star`      | five-pointed planar star                                  |
//! | `lamp`      | base disc, stem, conical shade                            |
//! | `fireworks` | five random bursts                                        |

use std::f32::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::Rng;

use crate::point::Point3;

fn centered(rng: &mut StdRng) -> f32 {
    rng.gen::<f32>() - 0.5
}

fn angle(rng: &mut StdRng) -> f32 {
    rng.gen::<f32>() * TAU
}

/// Uniform direction on the unit sphere.
fn random_direction(rng: &mut StdRng) -> Point3 {
    let theta = angle(rng);
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Point3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Point `i` of an `n`-point golden-spiral shell of radius `r`.
fn spiral_point(i: usize, n: usize, r: f32) -> Point3 {
    let phi = (-1.0 + 2.0 * i as f32 / n as f32).clamp(-1.0, 1.0).acos();
    let theta = (n as f32 * PI).sqrt() * phi;
    Point3::new(r * theta.cos() * phi.sin(), r * theta.sin() * phi.sin(), r * phi.cos())
}

// ════════════════════════════════════════════════════════════════════════════
// Generators
// ════════════════════════════════════════════════════════════════════════════

pub fn sphere(count: usize, _rng: &mut StdRng) -> Vec<Point3> {
    (0..count).map(|i| spiral_point(i, count, 2.0)).collect()
}

pub fn heart(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    const SCALE: f32 = 0.15;
    (0..count)
        .map(|_| {
            let t = angle(rng);
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            let z = centered(rng) * 5.0;
            Point3::new(x, y, z) * SCALE
        })
        .collect()
}

pub fn flower(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    (0..count)
        .map(|_| {
            let u = angle(rng);
            let v = rng.gen::<f32>() * PI;
            let r = 2.0 + (5.0 * u).sin() * (5.0 * v).sin();
            Point3::new(r * v.sin() * u.cos(), r * v.sin() * u.sin(), r * v.cos())
        })
        .collect()
}

pub fn sun(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    let core = count * 7 / 10;
    (0..count)
        .map(|i| {
            let dir = random_direction(rng);
            let r = if i < core {
                0.8 + rng.gen::<f32>() * 0.4
            } else {
                1.5 + rng.gen::<f32>() * 2.0
            };
            dir * r
        })
        .collect()
}

pub fn saturn(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    const TILT: f32 = 0.4;
    // 40 % of the points form the ring.
    let planet = count * 3 / 5;
    let (s, c) = TILT.sin_cos();
    (0..count)
        .map(|i| {
            if i < planet {
                return spiral_point(i, planet, 1.2);
            }
            let a = angle(rng);
            let dist = 2.0 + rng.gen::<f32>() * 1.5;
            let (x, y, z) = (dist * a.cos(), centered(rng) * 0.1, dist * a.sin());
            Point3::new(x, y * c - z * s, z)
        })
        .collect()
}

pub fn torus(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    const MAJOR: f32 = 1.5;
    const MINOR: f32 = 0.5;
    (0..count)
        .map(|_| {
            let (u, v) = (angle(rng), angle(rng));
            let ring = MAJOR + MINOR * v.cos();
            Point3::new(ring * u.cos(), ring * u.sin(), MINOR * v.sin())
        })
        .collect()
}

pub fn helix(count: usize, _rng: &mut StdRng) -> Vec<Point3> {
    (0..count)
        .map(|i| {
            let f = i as f32 / count as f32;
            let t = f * PI * 10.0;
            Point3::new(t.cos(), f * 4.0 - 2.0, t.sin())
        })
        .collect()
}

pub fn dna(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    (0..count)
        .map(|i| {
            let f = i as f32 / count as f32;
            let t = f * PI * 10.0 + if i % 2 == 0 { 0.0 } else { PI };
            let mut p = Point3::new(t.cos(), f * 4.0 - 2.0, t.sin());
            // Rungs: pull a few strand points inwards.
            if i % 50 < 10 {
                p.x *= rng.gen::<f32>();
                p.z *= rng.gen::<f32>();
            }
            p
        })
        .collect()
}

pub fn galaxy(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    const ARMS: usize = 3;
    const FUZZ: f32 = 0.2;
    (0..count)
        .map(|i| {
            let arm = (i % ARMS) as f32;
            let dist = rng.gen::<f32>();
            let theta = dist * TAU * 2.0 + arm * (TAU / ARMS as f32);
            let r = dist * 2.5;
            Point3::new(
                r * theta.cos() + centered(rng) * FUZZ,
                centered(rng) * 0.1,
                r * theta.sin() + centered(rng) * FUZZ,
            )
        })
        .collect()
}

pub fn cube(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    (0..count)
        .map(|_| Point3::new(centered(rng), centered(rng), centered(rng)) * 3.0)
        .collect()
}

pub fn ring(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    (0..count)
        .map(|_| {
            let a = angle(rng);
            Point3::new(2.0 * a.cos(), centered(rng) * 0.2, 2.0 * a.sin())
        })
        .collect()
}

pub fn wave(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    (0..count)
        .map(|_| {
            let x = centered(rng) * 4.0;
            let z = centered(rng) * 4.0;
            Point3::new(x, (x * 2.0 + z).sin() * 0.5, z)
        })
        .collect()
}

pub fn vortex(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    (0..count)
        .map(|_| {
            let t = rng.gen::<f32>() * PI * 4.0;
            let y = t / (PI * 4.0) * 3.0 - 2.0;
            let r = y.abs() + 0.1;
            Point3::new(r * (t * 3.0).cos(), y, r * (t * 3.0).sin())
        })
        .collect()
}

pub fn star(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    const TIP: f32 = 1.5;
    const INNER: f32 = 0.5;
    (0..count)
        .map(|_| {
            let a = angle(rng);
            let r = INNER + (TIP - INNER) * (a * 2.5).cos().powi(2);
            Point3::new(r * a.cos(), r * a.sin(), centered(rng) * 0.5)
        })
        .collect()
}

pub fn lamp(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    (0..count)
        .map(|i| {
            let p = i as f32 / count as f32;
            let a = angle(rng);
            if p < 0.2 {
                // base disc
                let r = rng.gen::<f32>().sqrt() * 0.8;
                Point3::new(r * a.cos(), -1.5, r * a.sin())
            } else if p < 0.4 {
                // stem
                let h = rng.gen::<f32>() * 2.0;
                Point3::new(0.1 * a.cos(), -1.5 + h, 0.1 * a.sin())
            } else {
                // shade, widening upwards
                let h = rng.gen::<f32>();
                let r = 0.4 + 0.8 * h;
                Point3::new(r * a.cos(), 0.5 + h, r * a.sin())
            }
        })
        .collect()
}

pub fn fireworks(count: usize, rng: &mut StdRng) -> Vec<Point3> {
    const BURSTS: usize = 5;
    let centers: Vec<Point3> = (0..BURSTS)
        .map(|_| Point3::new(centered(rng), centered(rng), centered(rng)) * 4.0)
        .collect();
    (0..count)
        .map(|_| {
            let c = centers[rng.gen_range(0..BURSTS)];
            let r = rng.gen::<f32>() * 0.8;
            c + random_direction(rng) * r
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
