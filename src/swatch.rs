use crate::pixel_set::Pixel;

/// One palette entry: a cluster's final centroid and the number of pixels assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    red: u8,
    green: u8,
    blue: u8,
    population: u32,
}

impl Swatch {
    pub fn new((red, green, blue): Pixel, population: u32) -> Swatch {
        Self {
            red,
            green,
            blue,
            population,
        }
    }

    pub fn rgb(self) -> Pixel {
        (self.red, self.green, self.blue)
    }

    pub fn hsl(self) -> (f32, f32, f32) {
        crate::rgb_to_hsl(self.rgb())
    }

    /// Number of pixels in this cluster after the last assignment step. Zero for a cluster that
    /// never received any pixel.
    pub fn population(self) -> u32 {
        self.population
    }

    /// Lowercase `#rrggbb`, each channel zero padded to two digits.
    pub fn hex(self) -> String {
        to_hex(self.rgb())
    }
}

pub fn to_hex((r, g, b): Pixel) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
