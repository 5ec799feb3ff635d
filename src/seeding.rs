use crate::pixel_set::Pixel;
use rand::{distributions::WeightedIndex, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};

pub const DEFAULT_SEED: u64 = 0;

/// How the initial centroids are picked before the first assignment step.
///
/// Every variant is deterministic: the same pixels, palette size and seed always give the same
/// centroids. All variants return exactly as many centroids as requested; when there are fewer
/// pixels than centroids the seeds repeat, and the duplicates end up as empty clusters that keep
/// their seed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "strategy"))]
pub enum Seeding {
    /// The first `k` pixels in scan order.
    #[default]
    FirstK,
    /// `k` distinct pixel positions sampled uniformly.
    RandomSample { seed: u64 },
    /// k-means++: each further seed is sampled with probability proportional to its squared
    /// distance from the closest seed picked so far.
    KMeansPlusPlus { seed: u64 },
}

impl Seeding {
    pub fn random_sample() -> Self {
        Seeding::RandomSample { seed: DEFAULT_SEED }
    }

    pub fn kmeans_plus_plus() -> Self {
        Seeding::KMeansPlusPlus { seed: DEFAULT_SEED }
    }

    pub fn initial_centroids(self, pixels: &[Pixel], k: usize) -> Vec<Pixel> {
        if pixels.is_empty() || k == 0 {
            return Vec::new();
        }

        match self {
            Seeding::FirstK => pixels.iter().copied().cycle().take(k).collect(),
            Seeding::RandomSample { seed } => random_sample(pixels, k, seed),
            Seeding::KMeansPlusPlus { seed } => kmeans_plus_plus(pixels, k, seed),
        }
    }
}

fn random_sample(pixels: &[Pixel], k: usize, seed: u64) -> Vec<Pixel> {
    let mut rng = StdRng::seed_from_u64(seed);
    let picked = rand::seq::index::sample(&mut rng, pixels.len(), k.min(pixels.len()));

    let seeds = picked.iter().map(|i| pixels[i]).collect::<Vec<_>>();
    seeds.iter().copied().cycle().take(k).collect()
}

fn kmeans_plus_plus(pixels: &[Pixel], k: usize, seed: u64) -> Vec<Pixel> {
    let mut rng = StdRng::seed_from_u64(seed);
    let first = pixels[rng.gen_range(0..pixels.len())];

    let mut centroids = Vec::with_capacity(k);
    centroids.push(first);

    // squared distance from every pixel to its closest centroid so far
    let mut weights = pixels
        .iter()
        .map(|&p| distance_squared(p, first) as u64)
        .collect::<Vec<_>>();

    while centroids.len() < k {
        let next = match WeightedIndex::new(&weights) {
            Ok(dist) => pixels[dist.sample(&mut rng)],
            // every pixel already coincides with a centroid
            Err(_) => first,
        };

        for (weight, &p) in weights.iter_mut().zip(pixels) {
            *weight = (*weight).min(distance_squared(p, next) as u64);
        }

        centroids.push(next);
    }

    centroids
}

pub(crate) fn distance_squared(a: Pixel, b: Pixel) -> u32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;

    (dr * dr + dg * dg + db * db) as u32
}
