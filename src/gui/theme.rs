use crate::config::ColorConfig;
use crate::gui::dial::FanSpeed;
use gtk::gdk;
use gtk4 as gtk;
use palette::Srgba;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialColors {
    pub off: Srgba<f64>,
    pub low: Srgba<f64>,
    pub medium: Srgba<f64>,
    pub high: Srgba<f64>,
    pub indicator: Srgba<f64>,
    pub label: Srgba<f64>,
}

impl DialColors {
    pub const OFF_GRAY: Srgba<f64> = Srgba::new(136.0 / 255.0, 136.0 / 255.0, 136.0 / 255.0, 1.0);
    pub const BLACK: Srgba<f64> = Srgba::new(0.0, 0.0, 0.0, 1.0);

    pub fn from_config(cfg: &ColorConfig) -> Self {
        Self {
            off: Self::OFF_GRAY,
            low: cfg.low.to_srgba(),
            medium: cfg.medium.to_srgba(),
            high: cfg.high.to_srgba(),
            indicator: Self::BLACK,
            label: Self::BLACK,
        }
    }

    pub fn for_speed(&self, speed: FanSpeed) -> Srgba<f64> {
        match speed {
            FanSpeed::Off => self.off,
            FanSpeed::Low => self.low,
            FanSpeed::Medium => self.medium,
            FanSpeed::High => self.high,
        }
    }
}

impl Default for DialColors {
    fn default() -> Self {
        Self::from_config(&ColorConfig::default())
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.fandial-dial {
    background: none;
    background-color: transparent;
}
.fandial-dial:focus-visible {
    outline: 2px dashed alpha(currentColor, 0.4);
    outline-offset: -4px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
