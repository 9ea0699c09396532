/// Selects which color palette to use for field rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorMap {
    /// Tokyo Night: navy -> blue -> purple -> pink -> orange (for density).
    TokyoNight,
    /// Arctic Ice: deep void -> teal -> cyan -> white -> bright mint (for speed).
    ArcticIce,
}

/// Tokyo Night-inspired color stops for field mapping.
/// Deep navy -> blue -> purple -> pink -> orange
pub(crate) const COLOR_STOPS: [(f64, f64, f64); 5] = [
    (26.0, 27.0, 38.0),    // #1a1b26 navy         (0.00)
    (122.0, 162.0, 247.0), // #7aa2f7 blue         (0.25)
    (187.0, 154.0, 247.0), // #bb9af7 purple       (0.50)
    (247.0, 118.0, 142.0), // #f7768e pink         (0.75)
    (255.0, 158.0, 100.0), // #ff9e64 orange       (1.00)
];

/// Arctic Ice color stops: void -> teal -> cyan -> white -> bright mint.
pub(crate) const ARCTIC_ICE_STOPS: [(f64, f64, f64); 5] = [
    (8.0, 10.0, 25.0),     // deep void              (0.00)
    (10.0, 60.0, 90.0),    // dark teal              (0.25)
    (30.0, 180.0, 200.0),  // bright cyan            (0.50)
    (200.0, 240.0, 250.0), // near white             (0.75)
    (120.0, 255.0, 200.0), // bright mint            (1.00)
];

/// Pixels outside the annulus.
pub(crate) const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Convert a [0.0, 1.0] value to RGBA using the specified color map.
/// Out-of-range and NaN inputs clamp to the ends of the palette.
pub fn map_to_rgba(t: f64, colormap: ColorMap) -> [u8; 4] {
    let stops = match colormap {
        ColorMap::TokyoNight => &COLOR_STOPS,
        ColorMap::ArcticIce => &ARCTIC_ICE_STOPS,
    };

    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let seg = t * 4.0;
    let i = (seg as usize).min(3);
    let s = seg - i as f64;

    let (r0, g0, b0) = stops[i];
    let (r1, g1, b1) = stops[i + 1];

    [
        (r0 + s * (r1 - r0)) as u8,
        (g0 + s * (g1 - g0)) as u8,
        (b0 + s * (b1 - b0)) as u8,
        255,
    ]
}
