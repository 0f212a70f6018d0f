//! Intensity data sources.
//!
//! The encoder pulls values one at a time through [`DataSource`]. With the
//! interrupt-driven driver these calls happen from the refill handler, so
//! implementations must not block or allocate.

use crate::color::{ColorOrder, Rgb};

/// Pull contract for the pixel data producer
pub trait DataSource {
    /// Check if another intensity value can be pulled in this frame
    fn more_data_available(&self) -> bool;

    /// Pull the next intensity value.
    ///
    /// Returns `None` once the frame data is exhausted.
    fn next_intensity_value(&mut self) -> Option<u32>;

    /// Called once at the start of every frame, before any value is pulled
    fn on_frame_start(&mut self) {}
}

impl<S: DataSource + ?Sized> DataSource for &mut S {
    fn more_data_available(&self) -> bool {
        (**self).more_data_available()
    }

    fn next_intensity_value(&mut self) -> Option<u32> {
        (**self).next_intensity_value()
    }

    fn on_frame_start(&mut self) {
        (**self).on_frame_start();
    }
}

/// Raw intensity bytes, one value per byte.
///
/// Rewinds on every frame start, so the same data is sent each frame until
/// replaced with [`SliceSource::set_data`].
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn set_data(&mut self, data: &'a [u8]) {
        self.data = data;
        self.position = 0;
    }

    /// Number of values already pulled in this frame
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl DataSource for SliceSource<'_> {
    fn more_data_available(&self) -> bool {
        self.position < self.data.len()
    }

    fn next_intensity_value(&mut self) -> Option<u32> {
        let value = *self.data.get(self.position)?;
        self.position += 1;
        Some(u32::from(value))
    }

    fn on_frame_start(&mut self) {
        self.position = 0;
    }
}

/// Pixel frame expanded into one intensity per color component, in the
/// wire order of the strip.
#[derive(Debug, Clone)]
pub struct RgbSource<'a> {
    pixels: &'a [Rgb],
    order: ColorOrder,
    cursor: usize,
}

impl<'a> RgbSource<'a> {
    pub const fn new(pixels: &'a [Rgb], order: ColorOrder) -> Self {
        Self {
            pixels,
            order,
            cursor: 0,
        }
    }

    pub fn set_pixels(&mut self, pixels: &'a [Rgb]) {
        self.pixels = pixels;
        self.cursor = 0;
    }

    const fn total_values(&self) -> usize {
        self.pixels.len() * ColorOrder::COMPONENTS
    }
}

impl DataSource for RgbSource<'_> {
    fn more_data_available(&self) -> bool {
        self.cursor < self.total_values()
    }

    fn next_intensity_value(&mut self) -> Option<u32> {
        let pixel = *self.pixels.get(self.cursor / ColorOrder::COMPONENTS)?;
        let component = self.order.components(pixel)[self.cursor % ColorOrder::COMPONENTS];
        self.cursor += 1;
        Some(u32::from(component))
    }

    fn on_frame_start(&mut self) {
        self.cursor = 0;
    }
}
