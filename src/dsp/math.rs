//! Pure helpers shared by every stage: interpolation, clamping, crossfades,
//! curves, pitch conversion and uniform random draws. None of these hold
//! state; the random helpers borrow the caller's generator.

/*
Crossfade
=========

    output = (A × (1 - t)) + (B × t)

    t = 0.0  →  100% A
    t = 0.5  →  50% A, 50% B
    t = 1.0  →  100% B

The weights always sum to 1.0, so two full-scale signals never sum past
full scale. The loudness dips slightly around t = 0.5 for uncorrelated
signals; an equal-power law fixes that but is not needed for wet/dry blends.


Quadratic Bezier
================

`bezier` draws a curve from `p1` to `p2` whose bend is set by one
`curvature` value in [-1, 1]:

     y                                y
   p2┤        ●                     p2┤    ●───●
     │      ╱                         │   ╱
     │    ╱        curvature = 0      │  │        curvature = 1
     │  ╱          (straight line)    │ ╱         (control at (p1.x, p2.y))
   p1┤●                             p1┤●
     └──────────→ x                   └──────────→ x

The control point slides from the midpoint of the segment (0) toward the
corner (p1.x, p2.y) for positive values, or toward (p2.x, p1.y) for negative.
*/

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn clamp(min: f32, max: f32, x: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Linear crossfade between two samples.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Evaluate the curve from `p1` to `p2` at `t` in `[0, 1]`.
pub fn bezier(p1: Point, p2: Point, curvature: f32, t: f32) -> Point {
    let curvature = clamp(-1.0, 1.0, curvature);
    let mid = Point::new(lerp(p1.x, p2.x, 0.5), lerp(p1.y, p2.y, 0.5));
    let corner = if curvature >= 0.0 {
        Point::new(p1.x, p2.y)
    } else {
        Point::new(p2.x, p1.y)
    };
    let amount = curvature.abs();
    let control = Point::new(lerp(mid.x, corner.x, amount), lerp(mid.y, corner.y, amount));

    let u = 1.0 - t;
    Point::new(
        u * u * p1.x + 2.0 * u * t * control.x + t * t * p2.x,
        u * u * p1.y + 2.0 * u * t * control.y + t * t * p2.y,
    )
}

/// Convert a MIDI note number to Hz. A4 = 69 = 440 Hz.
#[inline]
pub fn mtof(note: i32) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Uniform float in `[min, max)`. Returns `min` for an empty range.
///
/// Takes the generator explicitly: seed a `SmallRng` at setup and keep it
/// with the voice or effect that needs noise.
#[inline]
pub fn rand_float<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    let x = lerp(min, max, rng.random::<f32>());
    // rounding can land exactly on max
    if x < max {
        x
    } else {
        min
    }
}

/// Uniform integer in `[min, max]`. Returns `min` when `max < min`.
#[inline]
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}
