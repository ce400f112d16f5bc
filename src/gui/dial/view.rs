use super::INDICATOR_RADIUS_DIVISOR;
use super::geometry::Point;
use super::model::{Dial, LabelSource};
use super::speed::FanSpeed;
use crate::gui::theme::DialColors;
use cairo::Context;
use palette::Srgba;
use std::f64::consts::PI;

pub struct DialStyle<'a, L: LabelSource> {
    pub colors: &'a DialColors,
    pub labels: &'a L,
    pub font_size: f64,
}

struct DialRenderer<'a, L: LabelSource> {
    dial: &'a Dial,
    style: &'a DialStyle<'a, L>,
}

impl<'a, L: LabelSource> DialRenderer<'a, L> {
    fn new(dial: &'a Dial, style: &'a DialStyle<'a, L>) -> Self {
        Self { dial, style }
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        self.draw_disc(cr)?;
        self.draw_indicator(cr)?;
        self.draw_labels(cr)
    }

    fn draw_disc(&self, cr: &Context) -> Result<(), cairo::Error> {
        let center = self.dial.center();
        set_color(cr, self.style.colors.for_speed(self.dial.speed));
        cr.arc(center.x, center.y, self.dial.radius, 0.0, 2.0 * PI);
        cr.fill()
    }

    fn draw_indicator(&self, cr: &Context) -> Result<(), cairo::Error> {
        let pos = self.dial.indicator_position();
        set_color(cr, self.style.colors.indicator);
        cr.arc(
            pos.x,
            pos.y,
            self.dial.radius / INDICATOR_RADIUS_DIVISOR,
            0.0,
            2.0 * PI,
        );
        cr.fill()
    }

    fn draw_labels(&self, cr: &Context) -> Result<(), cairo::Error> {
        set_color(cr, self.style.colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(self.style.font_size);

        for (speed, pos) in self.dial.label_positions() {
            self.draw_label(cr, speed, pos)?;
        }
        Ok(())
    }

    // centered horizontally, baseline on the label point
    fn draw_label(&self, cr: &Context, speed: FanSpeed, pos: Point) -> Result<(), cairo::Error> {
        let text = self.style.labels.label_for(speed);
        let ext = cr.text_extents(text)?;
        cr.move_to(pos.x - ext.x_advance() / 2.0, pos.y);
        cr.show_text(text)
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

pub fn draw<L: LabelSource>(
    cr: &Context,
    dial: &Dial,
    style: &DialStyle<'_, L>,
) -> Result<(), cairo::Error> {
    DialRenderer::new(dial, style).draw(cr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelConfig;
    use cairo::{Format, ImageSurface};

    fn render_center_pixel(speed: FanSpeed, colors: &DialColors) -> [u8; 4] {
        let mut surface = ImageSurface::create(Format::ARgb32, 200, 200).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            let mut dial = Dial::new();
            dial.resize(200, 200);
            dial.speed = speed;

            let labels = LabelConfig::default();
            let style = DialStyle {
                colors,
                labels: &labels,
                font_size: 20.0,
            };
            draw(&cr, &dial, &style).unwrap();
        }
        surface.flush();

        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = 100 * stride + 100 * 4;
        [
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]
    }

    // ARGB32 is stored native-endian, so compare against the packed pixel value
    fn packed(pixel: [u8; 4]) -> u32 {
        u32::from_ne_bytes(pixel)
    }

    #[test]
    fn test_disc_uses_speed_color() {
        let colors = DialColors::default();

        assert_eq!(
            packed(render_center_pixel(FanSpeed::Off, &colors)),
            0xFF88_8888
        );
        assert_eq!(
            packed(render_center_pixel(FanSpeed::Low, &colors)),
            0xFFFF_EB3B
        );
        assert_eq!(
            packed(render_center_pixel(FanSpeed::Medium, &colors)),
            0xFFCD_DC39
        );
        assert_eq!(
            packed(render_center_pixel(FanSpeed::High, &colors)),
            0xFF00_9688
        );
    }

    #[test]
    fn test_draw_with_zero_radius() {
        let surface = ImageSurface::create(Format::ARgb32, 10, 10).unwrap();
        let cr = Context::new(&surface).unwrap();
        let dial = Dial::new();
        let labels = LabelConfig::default();
        let style = DialStyle {
            colors: &DialColors::default(),
            labels: &labels,
            font_size: 12.0,
        };
        assert!(draw(&cr, &dial, &style).is_ok());
    }
}
