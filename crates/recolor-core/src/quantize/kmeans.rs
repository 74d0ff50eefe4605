//! Weighted Lloyd's k-means in RGB space.
//!
//! Points are the unique colors of the image, weighted by pixel count.
//! Initialization is greedy k-means++ driven by a fixed-seed RNG, and the
//! best of [`KMEANS_RUNS`] independent runs (lowest inertia) wins. Every
//! run stops after [`MAX_ITERATIONS`] at the latest, so uniform or
//! pathological input still terminates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "threads")]
use rayon::prelude::*;

use super::histogram::ColorHistogram;

/// Seed for the k-means++ initialization RNG.
pub const KMEANS_SEED: u64 = 42;

/// Number of independent initializations; the lowest-inertia run is kept.
pub const KMEANS_RUNS: usize = 10;

/// Hard cap on Lloyd iterations per run.
pub const MAX_ITERATIONS: usize = 300;

/// Convergence threshold on total squared centroid shift, relative to the
/// mean per-channel variance of the data.
const TOLERANCE: f64 = 1e-4;

type Point = [f64; 3];

struct Clustering {
    centroids: Vec<Point>,
    labels: Vec<usize>,
    inertia: f64,
}

/// Replace every pixel with its rounded cluster centroid.
///
/// Images with at most `k` unique colors are returned unchanged: each
/// unique color is already its own optimal centroid.
pub(crate) fn kmeans(rgb: &[u8], k: usize) -> Vec<u8> {
    let histogram = ColorHistogram::from_rgb(rgb);
    if histogram.len() <= k {
        return rgb.to_vec();
    }

    let points: Vec<Point> = histogram
        .colors()
        .iter()
        .map(|c| [c[0] as f64, c[1] as f64, c[2] as f64])
        .collect();
    let weights: Vec<f64> = histogram.counts().iter().map(|&c| c as f64).collect();
    let tolerance = TOLERANCE * mean_variance(&points, &weights);

    let mut rng = StdRng::seed_from_u64(KMEANS_SEED);
    let mut best = run_once(&points, &weights, k, tolerance, &mut rng);
    for _ in 1..KMEANS_RUNS {
        let run = run_once(&points, &weights, k, tolerance, &mut rng);
        if run.inertia < best.inertia {
            best = run;
        }
    }

    let palette: Vec<[u8; 3]> = best.centroids.iter().map(round_point).collect();
    let replacement: Vec<[u8; 3]> = best.labels.iter().map(|&l| palette[l]).collect();
    histogram.remap(&replacement)
}

fn run_once(
    points: &[Point],
    weights: &[f64],
    k: usize,
    tolerance: f64,
    rng: &mut StdRng,
) -> Clustering {
    let init = kmeans_plus_plus(points, weights, k, rng);
    lloyd(points, weights, init, tolerance)
}

fn lloyd(points: &[Point], weights: &[f64], mut centroids: Vec<Point>, tolerance: f64) -> Clustering {
    let mut labels = vec![0usize; points.len()];

    for _ in 0..MAX_ITERATIONS {
        assign(points, weights, &centroids, &mut labels);
        let updated = update_centroids(points, weights, &labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(a, b)| dist_sq(a, b))
            .sum();
        centroids = updated;
        if shift <= tolerance {
            break;
        }
    }

    // Final assignment so labels agree with the returned centroids
    let inertia = assign(points, weights, &centroids, &mut labels);

    Clustering {
        centroids,
        labels,
        inertia,
    }
}

/// Assign every point to its nearest centroid; returns the weighted inertia.
fn assign(points: &[Point], weights: &[f64], centroids: &[Point], labels: &mut [usize]) -> f64 {
    #[cfg(feature = "threads")]
    let nearest_all: Vec<(usize, f64)> = points.par_iter().map(|p| nearest(p, centroids)).collect();
    #[cfg(not(feature = "threads"))]
    let nearest_all: Vec<(usize, f64)> = points.iter().map(|p| nearest(p, centroids)).collect();

    // Sequential sum keeps the inertia bit-identical between runs.
    let mut inertia = 0.0;
    for ((label, (idx, dist)), &w) in labels.iter_mut().zip(nearest_all).zip(weights) {
        *label = idx;
        inertia += w * dist;
    }
    inertia
}

fn update_centroids(
    points: &[Point],
    weights: &[f64],
    labels: &[usize],
    previous: &[Point],
) -> Vec<Point> {
    let k = previous.len();
    let mut sums = vec![[0.0f64; 3]; k];
    let mut totals = vec![0.0f64; k];

    for ((p, &w), &label) in points.iter().zip(weights).zip(labels) {
        sums[label][0] += p[0] * w;
        sums[label][1] += p[1] * w;
        sums[label][2] += p[2] * w;
        totals[label] += w;
    }

    sums.iter()
        .zip(&totals)
        .zip(previous)
        .map(|((sum, &total), &prev)| {
            if total > 0.0 {
                [sum[0] / total, sum[1] / total, sum[2] / total]
            } else {
                // Empty cluster keeps its position
                prev
            }
        })
        .collect()
}

/// Greedy k-means++: each new center is the best of several D²-weighted
/// candidates, judged by the resulting potential.
fn kmeans_plus_plus(points: &[Point], weights: &[f64], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let trials = 2 + (k as f64).ln() as usize;
    let mut centers = Vec::with_capacity(k);

    let total_weight: f64 = weights.iter().sum();
    let first = sample_index(weights, total_weight, rng);
    centers.push(points[first]);

    let mut closest: Vec<f64> = points.iter().map(|p| dist_sq(p, &points[first])).collect();
    let mut potential = weighted_sum(weights, &closest);

    while centers.len() < k {
        let scores: Vec<f64> = weights.iter().zip(&closest).map(|(w, d)| w * d).collect();

        let mut best = candidate(points, weights, &closest, &scores, potential, rng);
        for _ in 1..trials {
            let next = candidate(points, weights, &closest, &scores, potential, rng);
            if next.1 < best.1 {
                best = next;
            }
        }

        let (idx, next_potential, next_closest) = best;
        centers.push(points[idx]);
        closest = next_closest;
        potential = next_potential;
    }

    centers
}

/// Draw one candidate center; returns (index, potential, closest distances).
fn candidate(
    points: &[Point],
    weights: &[f64],
    closest: &[f64],
    scores: &[f64],
    potential: f64,
    rng: &mut StdRng,
) -> (usize, f64, Vec<f64>) {
    let idx = sample_index(scores, potential, rng);
    let updated: Vec<f64> = closest
        .iter()
        .zip(points)
        .map(|(&d, p)| d.min(dist_sq(p, &points[idx])))
        .collect();
    let candidate_potential = weighted_sum(weights, &updated);
    (idx, candidate_potential, updated)
}

/// Sample an index with probability proportional to `scores`.
fn sample_index(scores: &[f64], total: f64, rng: &mut StdRng) -> usize {
    if total <= 0.0 {
        return rng.gen_range(0..scores.len());
    }
    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > 0.0 {
            cumulative += s;
            last_positive = i;
            if cumulative > target {
                return i;
            }
        }
    }
    // Rounding can leave the target just past the final cumulative sum
    last_positive
}

fn nearest(point: &Point, centroids: &[Point]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = dist_sq(point, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn mean_variance(points: &[Point], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    let mut mean = [0.0f64; 3];
    for (p, &w) in points.iter().zip(weights) {
        for axis in 0..3 {
            mean[axis] += p[axis] * w;
        }
    }
    for m in &mut mean {
        *m /= total;
    }

    let mut variance = 0.0;
    for (p, &w) in points.iter().zip(weights) {
        for axis in 0..3 {
            let d = p[axis] - mean[axis];
            variance += d * d * w;
        }
    }
    variance / total / 3.0
}

#[inline]
fn dist_sq(a: &Point, b: &Point) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[inline]
fn weighted_sum(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}

fn round_point(p: &Point) -> [u8; 3] {
    [
        p[0].round().clamp(0.0, 255.0) as u8,
        p[1].round().clamp(0.0, 255.0) as u8,
        p[2].round().clamp(0.0, 255.0) as u8,
    ]
}
