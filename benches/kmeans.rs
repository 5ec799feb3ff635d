use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dominance::{PaletteBuilder, PixelSet, Seeding};

fn noisy_pixels(width: u32, height: u32) -> PixelSet {
    let pixels = (0..width * height)
        .map(|i| {
            let v = i.wrapping_mul(2654435761);
            ((v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8)
        })
        .collect();

    PixelSet::new(width, height, pixels).expect("non-empty benchmark image")
}

fn benchmark_extraction(c: &mut Criterion) {
    let pixels = noisy_pixels(256, 256);

    for (name, seeding) in [
        ("first_k", Seeding::FirstK),
        ("kmeans_plus_plus", Seeding::kmeans_plus_plus()),
    ] {
        let builder = PaletteBuilder::new().palette_size(5).seeding(seeding);

        c.bench_function(&format!("extract_256x256_k5_{}", name), |b| {
            b.iter(|| builder.generate(black_box(&pixels)))
        });
    }
}

criterion_group!(benches, benchmark_extraction);
criterion_main!(benches);
