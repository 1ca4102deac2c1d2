//! Startup test card
//!
//! Shown from video start until the first sensor frame arrives: a gray
//! step wedge, a centre circle with crosshair, a castellated border and
//! the camera name with the active video standard.

use embedded_graphics::mono_font::iso_8859_1::FONT_9X15_BOLD;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};

use thermavid_core::traits::VideoStandard;

use crate::canvas::{BLACK, DISPLAY_HEIGHT, DISPLAY_WIDTH, WHITE};

/// Steps in the gray wedge
const WEDGE_STEPS: u32 = 8;

/// Border castellation size
const BORDER_BLOCK: u32 = 16;

/// Background gray
const BACKGROUND: Gray8 = Gray8::new(96);

/// Draw the test card
pub fn draw_test_pattern<D>(target: &mut D, standard: VideoStandard) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let width = DISPLAY_WIDTH as u32;
    let height = DISPLAY_HEIGHT as u32;

    target.clear(BACKGROUND)?;

    // Castellated border
    for (i, x) in (0..width).step_by(BORDER_BLOCK as usize).enumerate() {
        let color = if i % 2 == 0 { WHITE } else { BLACK };
        let block = Size::new(BORDER_BLOCK, BORDER_BLOCK / 2);
        target.fill_solid(&Rectangle::new(Point::new(x as i32, 0), block), color)?;
        let bottom = Point::new(x as i32, (height - BORDER_BLOCK / 2) as i32);
        target.fill_solid(&Rectangle::new(bottom, block), invert(color))?;
    }

    // Gray step wedge across the middle band
    let step_width = width / WEDGE_STEPS;
    let band_top = (height / 2 + BORDER_BLOCK) as i32;
    for step in 0..WEDGE_STEPS {
        let luma = (step * 255 / (WEDGE_STEPS - 1)) as u8;
        let area = Rectangle::new(
            Point::new((step * step_width) as i32, band_top),
            Size::new(step_width, BORDER_BLOCK * 2),
        );
        target.fill_solid(&area, Gray8::new(luma))?;
    }

    // Centre circle and crosshair
    let center = Point::new(width as i32 / 2, height as i32 / 2);
    let radius = height / 3;
    Circle::with_center(center, radius * 2)
        .into_styled(PrimitiveStyle::with_stroke(WHITE, 2))
        .draw(target)?;
    let line = PrimitiveStyle::with_stroke(WHITE, 1);
    Line::new(center - Point::new(radius as i32, 0), center + Point::new(radius as i32, 0))
        .into_styled(line)
        .draw(target)?;
    Line::new(center - Point::new(0, radius as i32), center + Point::new(0, radius as i32))
        .into_styled(line)
        .draw(target)?;

    // Identification
    let style = MonoTextStyle::new(&FONT_9X15_BOLD, WHITE);
    let title_y = (height / 4) as i32;
    Text::with_alignment("THERMAVID", Point::new(center.x, title_y), style, Alignment::Center).draw(target)?;
    let standard = match standard {
        VideoStandard::Ntsc => "NTSC",
        VideoStandard::Pal => "PAL",
    };
    Text::with_alignment(standard, Point::new(center.x, title_y + 18), style, Alignment::Center).draw(target)?;

    Ok(())
}

fn invert(color: Gray8) -> Gray8 {
    Gray8::new(255 - color.luma())
}
