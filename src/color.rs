use smart_leds::RGB8;

pub type Rgb = RGB8;

/// Order in which a strip expects the color components on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb,
    #[default]
    Grb,
    Brg,
    Rbg,
    Gbr,
    Bgr,
}

impl ColorOrder {
    pub const COMPONENTS: usize = 3;

    /// Components of `color` in wire order
    pub const fn components(self, color: Rgb) -> [u8; Self::COMPONENTS] {
        let Rgb { r, g, b } = color;
        match self {
            Self::Rgb => [r, g, b],
            Self::Grb => [g, r, b],
            Self::Brg => [b, r, g],
            Self::Rbg => [r, b, g],
            Self::Gbr => [g, b, r],
            Self::Bgr => [b, g, r],
        }
    }
}
