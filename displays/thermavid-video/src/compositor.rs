//! Full render pipeline for one frame

use thermavid_core::frame::{RawFrame, SENSOR_PIXELS};

use crate::canvas::DisplayFrame;
use crate::gui::GuiState;
use crate::overlay;
use crate::temperature;
use crate::upscale::{self, NormalizedFrame};

/// Renders raw frames into display frames
///
/// Owns the 8-bit scratch image between normalization and upscaling.
pub struct Compositor {
    scratch: NormalizedFrame,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub const fn new() -> Self {
        Self {
            scratch: [0; SENSOR_PIXELS],
        }
    }

    /// Composite `frame` into `out`
    ///
    /// `label` is the menu text when a parameter is being edited.
    pub fn render(&mut self, frame: &RawFrame, gui: &GuiState, label: Option<&str>, out: &mut DisplayFrame) {
        upscale::normalize(frame, gui.agc_enabled, &mut self.scratch);
        if gui.interpolate {
            upscale::interpolate(&self.scratch, out, gui.black_hot);
        } else {
            upscale::duplicate(&self.scratch, out, gui.black_hot);
        }

        let telemetry = &frame.telemetry;

        // DisplayFrame drawing is infallible
        if gui.show_spotmeter() {
            let reading = temperature::format_reading(telemetry.spot_mean, gui.high_res, gui.metric);
            let _ = overlay::draw_spotmeter(out, &telemetry.spot, &reading);
        }

        if gui.min_max_enable {
            let _ = overlay::draw_extrema_markers(out, &telemetry.min, &telemetry.max);
        }

        if let Some(text) = label {
            let _ = overlay::draw_parameter_label(out, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{TEXT_BACKGROUND, TEXT_COLOR};
    use embedded_graphics::pixelcolor::GrayColor;
    use thermavid_core::frame::{Extremum, SpotRegion};

    fn gradient_frame() -> Box<RawFrame> {
        let mut frame = Box::new(RawFrame::new());
        for (i, p) in frame.pixels_mut().iter_mut().enumerate() {
            *p = 1000 + (i % 160) as u16;
        }
        frame.update_extrema();
        frame.telemetry.spot = SpotRegion::new(79, 59, 80, 60);
        frame.telemetry.spot_mean = 30_000;
        frame.telemetry.tlinear_high_res = true;
        frame.telemetry.radiometric = true;
        frame
    }

    fn plain_gui() -> GuiState {
        GuiState {
            interpolate: true,
            ..GuiState::default()
        }
    }

    #[test]
    fn test_plain_render_has_no_overlay() {
        let frame = gradient_frame();
        let mut out = Box::new(DisplayFrame::new());
        let mut compositor = Box::new(Compositor::new());
        compositor.render(&frame, &plain_gui(), None, &mut out);

        assert_eq!(out.get(0, 0), 0);
        assert_eq!(out.get(319, 0), 255);
        let text = out.as_bytes().iter().filter(|&&p| p == TEXT_BACKGROUND.luma()).count();
        // Gradient passes 120 in at most a few columns per row
        assert!(text <= 6 * 240);
    }

    #[test]
    fn test_black_hot_inverts_image() {
        let frame = gradient_frame();
        let mut out = Box::new(DisplayFrame::new());
        let mut compositor = Box::new(Compositor::new());
        let gui = GuiState {
            black_hot: true,
            ..plain_gui()
        };
        compositor.render(&frame, &gui, None, &mut out);

        assert_eq!(out.get(0, 0), 255);
        assert_eq!(out.get(319, 0), 0);
    }

    #[test]
    fn test_spotmeter_requires_radiometry() {
        let mut frame = gradient_frame();
        frame.pixels_mut().fill(1000);
        frame.telemetry.min = Extremum::new(1000, 0, 0);
        frame.telemetry.max = Extremum::new(1000, 0, 0);
        let mut out = Box::new(DisplayFrame::new());
        let mut compositor = Box::new(Compositor::new());

        let gui = GuiState {
            spotmeter_enable: true,
            radiometric: false,
            ..plain_gui()
        };
        compositor.render(&frame, &gui, None, &mut out);
        assert!(out.as_bytes().iter().all(|&p| p == 0));

        let gui = GuiState {
            radiometric: true,
            ..gui
        };
        compositor.render(&frame, &gui, None, &mut out);
        assert_eq!(out.get(155, 115), 255);
    }

    #[test]
    fn test_label_drawn_when_editing() {
        let mut frame = gradient_frame();
        frame.pixels_mut().fill(1000);
        frame.update_extrema();
        let mut out = Box::new(DisplayFrame::new());
        let mut compositor = Box::new(Compositor::new());

        compositor.render(&frame, &plain_gui(), Some("Units: Metric"), &mut out);
        assert!(out.as_bytes().iter().any(|&p| p == TEXT_COLOR.luma()));
        assert!(out.as_bytes().iter().any(|&p| p == TEXT_BACKGROUND.luma()));
    }

    #[test]
    fn test_duplicate_mode() {
        let frame = gradient_frame();
        let mut out = Box::new(DisplayFrame::new());
        let mut compositor = Box::new(Compositor::new());
        compositor.render(&frame, &GuiState::default(), None, &mut out);

        assert_eq!(out.get(0, 0), out.get(1, 1));
        assert_eq!(out.get(318, 0), out.get(319, 1));
    }
}
