use dominance::{ExtremeLightnessFilter, ImageDecoder, PaletteBuilder};

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "outfit.jpg".to_string());

    let decoder = ImageDecoder::new().resize_image_area(112 * 112);
    let palette = PaletteBuilder::new()
        .palette_size(5)
        .add_filter(ExtremeLightnessFilter::default())
        .extract(&decoder, path.as_str())
        .unwrap();

    for swatch in palette.sorted_by_population().swatches() {
        println!("{} ({} px)", swatch.hex(), swatch.population());
    }
}
