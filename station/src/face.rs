//! Drawing routines for a small LED-matrix style air quality panel.

use std::{convert::Infallible, fmt::Display, io::Write};

use aqi::{Category, Snapshot, SurfaceError};
use embedded_graphics::Drawable;
use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::{ascii::FONT_4X6, MonoTextStyle},
    primitives::{Primitive, PrimitiveStyleBuilder, Rectangle},
    text::Text,
};
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::OriginDimensions,
    pixelcolor::{Rgb888, RgbColor},
    Pixel,
};

use crate::surface::Surface;

/// Size of the panel, in pixels.
pub const FACE_SIZE: Size = Size::new(32, 16);

/// Color used for a category, following the usual AQI color scale.
pub fn category_color(category: Category) -> Rgb888 {
    match category {
        Category::Good => Rgb888::new(0, 176, 80),
        Category::Satisfactory => Rgb888::new(146, 208, 80),
        Category::Moderate => Rgb888::new(255, 255, 0),
        Category::Poor => Rgb888::new(255, 153, 0),
        Category::VeryPoor => Rgb888::new(255, 0, 0),
        Category::Severe => Rgb888::new(192, 0, 0),
        Category::Unknown => Rgb888::new(128, 128, 128),
    }
}

/// Category label short enough for the panel: at most 8 characters of FONT_4X6.
fn short_label(category: Category) -> &'static str {
    match category {
        Category::Good => "GOOD",
        Category::Satisfactory => "SATISFY",
        Category::Moderate => "MODERATE",
        Category::Poor => "POOR",
        Category::VeryPoor => "V.POOR",
        Category::Severe => "SEVERE",
        Category::Unknown => "NO DATA",
    }
}

/// Render a snapshot onto the panel.
/// With no snapshot, the panel shows dashes.
pub fn draw_face<D>(snapshot: Option<&Snapshot>, canvas: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Rectangle::new(Point::new(0, 0), FACE_SIZE)
        .into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(Rgb888::BLACK)
                .build(),
        )
        .draw(canvas)?;

    let (index, category) = match snapshot {
        Some(s) => (s.overall_index(), s.category()),
        None => (None, Category::Unknown),
    };
    let index = match index {
        Some(v) => format!("AQI {:.0}", v),
        None => "AQI --".to_owned(),
    };
    let color = category_color(category);
    let style = MonoTextStyle::new(&FONT_4X6, color);
    // Baselines for two rows of 6px text in 16px.
    Text::new(&index, Point::new(1, 6), style).draw(canvas)?;
    Text::new(short_label(category), Point::new(1, 13), style).draw(canvas)?;
    Ok(())
}

/// An in-memory panel that renders as ASCII art: `#` for lit pixels.
#[derive(Debug, Clone)]
pub struct TextCanvas {
    pixels: Vec<Rgb888>,
}

impl TextCanvas {
    pub fn new() -> Self {
        TextCanvas {
            pixels: vec![Rgb888::BLACK; (FACE_SIZE.width * FACE_SIZE.height) as usize],
        }
    }

    /// Color of the pixel at the point, if it is on the panel.
    pub fn get(&self, p: Point) -> Option<Rgb888> {
        let (w, h) = (FACE_SIZE.width as i32, FACE_SIZE.height as i32);
        if (0..w).contains(&p.x) && (0..h).contains(&p.y) {
            Some(self.pixels[(p.y * w + p.x) as usize])
        } else {
            None
        }
    }

    /// Number of lit pixels of the given color.
    pub fn count(&self, color: Rgb888) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }
}

impl Default for TextCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for TextCanvas {
    fn size(&self) -> Size {
        FACE_SIZE
    }
}

impl DrawTarget for TextCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = FACE_SIZE.width as i32;
        for Pixel(p, color) in pixels {
            // Out-of-bounds writes are dropped.
            if self.get(p).is_some() {
                self.pixels[(p.y * w + p.x) as usize] = color;
            }
        }
        Ok(())
    }
}

impl Display for TextCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.pixels.chunks(FACE_SIZE.width as usize) {
            for px in row {
                let c = if *px == Rgb888::BLACK { '.' } else { '#' };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A surface that draws each snapshot onto a [`TextCanvas`] and writes it out.
pub struct AsciiFace<W> {
    canvas: TextCanvas,
    out: W,
}

impl<W> AsciiFace<W> {
    pub fn new(out: W) -> Self {
        AsciiFace {
            canvas: TextCanvas::new(),
            out,
        }
    }

    pub fn canvas(&self) -> &TextCanvas {
        &self.canvas
    }
}

impl<W: Write + Send + 'static> Surface for AsciiFace<W> {
    fn show(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        draw_face(Some(snapshot), &mut self.canvas).unwrap_or_else(|e| match e {});
        write!(self.out, "{}", self.canvas)?;
        self.out.flush()?;
        Ok(())
    }
}
