use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dominance::{config::ExtractorConfig, ImageSource, Seeding, DEFAULT_SEED};
use log::info;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeedingArg {
    FirstK,
    Random,
    KmeansPlusPlus,
}

/// Print the dominant colors of images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image paths or URLs
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Number of colors to extract
    #[arg(short = 'k', long)]
    colors: Option<usize>,

    /// Upper bound on k-means iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Stop early once total centroid movement drops to this value
    #[arg(long)]
    threshold: Option<f32>,

    /// How the initial centroids are picked
    #[arg(long, value_enum)]
    seeding: Option<SeedingArg>,

    /// Seed for the random seeding strategies, whether picked here or in the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Scale images down to at most this many pixels before clustering
    #[arg(long)]
    resize_area: Option<u32>,

    /// Ignore near-black and near-white pixels
    #[arg(long)]
    filter_extremes: bool,

    /// JSON configuration file; command line options take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn extractor_config(&self) -> Result<ExtractorConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractorConfig::from_json_file(path)
                .with_context(|| format!("could not load configuration from {}", path.display()))?,
            None => ExtractorConfig::default(),
        };

        if let Some(colors) = self.colors {
            config.palette_size = colors;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if let Some(threshold) = self.threshold {
            config.convergence_threshold = Some(threshold);
        }
        if let Some(seeding) = self.seeding {
            let seed = self.seed.unwrap_or(DEFAULT_SEED);
            config.seeding = match seeding {
                SeedingArg::FirstK => Seeding::FirstK,
                SeedingArg::Random => Seeding::RandomSample { seed },
                SeedingArg::KmeansPlusPlus => Seeding::KMeansPlusPlus { seed },
            };
        } else if let Some(seed) = self.seed {
            config.seeding = match config.seeding {
                Seeding::FirstK => Seeding::FirstK,
                Seeding::RandomSample { .. } => Seeding::RandomSample { seed },
                Seeding::KMeansPlusPlus { .. } => Seeding::KMeansPlusPlus { seed },
            };
        }
        if let Some(resize_area) = self.resize_area {
            config.resize_area = resize_area;
        }
        config.filter_extremes |= self.filter_extremes;

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.extractor_config()?;
    let builder = config.palette_builder();
    let decoder = config.decoder();

    builder.validate().context("invalid extraction settings")?;

    let mut results = serde_json::Map::new();

    for input in &args.inputs {
        let palette = builder
            .extract(&decoder, ImageSource::from(input.as_str()))
            .with_context(|| format!("could not extract colors from {}", input))?;

        info!("{}: settled after {} iterations", input, palette.iterations());

        if args.json {
            results.insert(input.clone(), serde_json::to_value(palette.hex_colors())?);
        } else {
            println!("{}: {}", input, palette.hex_colors().join(" "));
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}
