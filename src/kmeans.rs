use crate::{
    pixel_set::Pixel,
    seeding::{distance_squared, Seeding},
    swatch::Swatch,
};
use log::trace;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Lloyd's k-means over RGB pixels.
pub struct KMeansQuantizer<'a> {
    pixels: &'a [Pixel],
    k: usize,
    max_iterations: usize,
    convergence_threshold: Option<f32>,
    seeding: Seeding,
}

/// Per-cluster running sums for the update step.
#[derive(Default, Clone, Copy)]
struct ClusterSums {
    red: u64,
    green: u64,
    blue: u64,
    count: u64,
}

impl<'a> KMeansQuantizer<'a> {
    pub fn new(
        pixels: &'a [Pixel],
        k: usize,
        max_iterations: usize,
        convergence_threshold: Option<f32>,
        seeding: Seeding,
    ) -> Self {
        Self {
            pixels,
            k,
            max_iterations,
            convergence_threshold,
            seeding,
        }
    }

    /// Clusters the pixels and returns one swatch per cluster in cluster index order, along with
    /// the number of iterations that ran.
    pub fn get_clustered_colors(self) -> (Vec<Swatch>, usize) {
        let mut centroids = self.seeding.initial_centroids(self.pixels, self.k);
        let mut assignments = vec![0usize; self.pixels.len()];
        let mut populations = vec![0u64; centroids.len()];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            self.assign(&centroids, &mut assignments);
            let (updated, counts) = self.update(&centroids, &assignments);

            let displacement = total_displacement(&centroids, &updated);
            trace!("iteration {}: centroid displacement {:.3}", iterations, displacement);

            centroids = updated;
            populations = counts;

            if let Some(threshold) = self.convergence_threshold {
                if displacement <= threshold {
                    break;
                }
            }
        }

        let swatches = centroids
            .into_iter()
            .zip(populations)
            .map(|(centroid, population)| Swatch::new(centroid, population.min(u32::MAX as u64) as u32))
            .collect();

        (swatches, iterations)
    }

    #[cfg(not(feature = "rayon"))]
    fn assign(&self, centroids: &[Pixel], assignments: &mut [usize]) {
        for (assignment, &pixel) in assignments.iter_mut().zip(self.pixels) {
            *assignment = nearest_centroid(pixel, centroids);
        }
    }

    #[cfg(feature = "rayon")]
    fn assign(&self, centroids: &[Pixel], assignments: &mut [usize]) {
        assignments
            .par_iter_mut()
            .zip(self.pixels.par_iter())
            .for_each(|(assignment, &pixel)| *assignment = nearest_centroid(pixel, centroids));
    }

    fn update(&self, centroids: &[Pixel], assignments: &[usize]) -> (Vec<Pixel>, Vec<u64>) {
        let mut sums = vec![ClusterSums::default(); centroids.len()];

        for (&cluster, &(r, g, b)) in assignments.iter().zip(self.pixels) {
            let sum = &mut sums[cluster];
            sum.red += r as u64;
            sum.green += g as u64;
            sum.blue += b as u64;
            sum.count += 1;
        }

        let updated = centroids
            .iter()
            .zip(&sums)
            .map(|(&previous, sum)| {
                if sum.count == 0 {
                    // an empty cluster keeps its previous centroid
                    previous
                } else {
                    (
                        rounded_mean(sum.red, sum.count),
                        rounded_mean(sum.green, sum.count),
                        rounded_mean(sum.blue, sum.count),
                    )
                }
            })
            .collect();

        (updated, sums.iter().map(|sum| sum.count).collect())
    }
}

/// Index of the closest centroid; on equal distances the lowest index wins.
fn nearest_centroid(pixel: Pixel, centroids: &[Pixel]) -> usize {
    let mut best = 0;
    let mut best_distance = u32::MAX;

    for (index, &centroid) in centroids.iter().enumerate() {
        let distance = distance_squared(pixel, centroid);

        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }

    best
}

/// Mean of `count` channel values, rounded half up.
fn rounded_mean(sum: u64, count: u64) -> u8 {
    let mean = (2 * sum + count) / (2 * count);
    debug_assert!(mean <= u8::MAX as u64, "channel mean {} out of range", mean);

    mean.min(u8::MAX as u64) as u8
}

fn total_displacement(before: &[Pixel], after: &[Pixel]) -> f32 {
    before
        .iter()
        .zip(after)
        .map(|(&a, &b)| (distance_squared(a, b) as f32).sqrt())
        .sum()
}
