//! embedded-graphics support
//!
//! An acquired [`PortGuard`] is a `DrawTarget`, so embedded-graphics
//! primitives, fonts and images draw through the same locked port as the
//! native primitives. Colours are converted to the panel's channel layout on
//! the way out.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::color::Color;
use crate::geometry::span_end;
use crate::port::{Board, PortGuard};

/// Bottom-right corner of a non-empty rectangle, saturating
fn far_corner(area: &Rectangle) -> (i32, i32) {
    let len = |n: u32| i32::try_from(n).unwrap_or(i32::MAX);
    (
        span_end(area.top_left.x, len(area.size.width)),
        span_end(area.top_left.y, len(area.size.height)),
    )
}

impl<M: RawMutex, H: Board> PortGuard<'_, M, H> {
    fn native(&self, color: Rgb565) -> Color {
        self.revision.layout.pack(color.r(), color.g(), color.b())
    }
}

impl<M: RawMutex, H: Board> OriginDimensions for PortGuard<'_, M, H> {
    fn size(&self) -> Size {
        Size::new(self.revision.width as u32, self.revision.height as u32)
    }
}

impl<M: RawMutex, H: Board> DrawTarget for PortGuard<'_, M, H> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let color = self.native(color);
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let rev = self.revision;
        let visible = area.intersection(&self.bounding_box());

        // Streaming straight through only works when the controller fills in
        // the same order as the iterator and nothing is clipped away
        if visible != *area || area.is_zero_sized() || rev.swap_axes || rev.mirror_y {
            return self.draw_iter(area.points().zip(colors).map(|(p, c)| Pixel(p, c)));
        }

        let (x2, y2) = far_corner(area);
        let n = self.set_output_rect(area.top_left.x, area.top_left.y, x2, y2);
        for color in colors.into_iter().take(n as usize) {
            let color = self.native(color);
            self.write_pixel(color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        if area.is_zero_sized() {
            return Ok(());
        }
        let (x2, y2) = far_corner(area);
        let color = self.native(color);
        self.fill_rect(area.top_left.x, area.top_left.y, x2, y2, color);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let color = self.native(color);
        PortGuard::clear(self, color);
        Ok(())
    }
}
