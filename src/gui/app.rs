use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::dial::{self, Dial, DialStyle, Point};
use crate::gui::theme::{self, DialColors};
use crate::sys::state::{self, WindowState};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub struct AppInit {
    pub dial: Dial,
    pub config: Config,
    pub config_path: PathBuf,
    pub config_required: bool,
    pub state_path: Option<PathBuf>,
    pub window: WindowState,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    pub dial: Rc<RefCell<Dial>>,
    pub config: Rc<RefCell<Config>>,
    pub config_path: PathBuf,
    pub config_required: bool,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Resize(i32, i32),
    TouchDown(Point),
    Activate,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn is_activate_key(key: gtk::gdk::Key) -> bool {
    key == gtk::gdk::Key::Return || key == gtk::gdk::Key::KP_Enter || key == gtk::gdk::Key::space
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Fan Control"),
            set_default_size: (window_size.width, window_size.height),

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_focusable: true,
                add_css_class: "fandial-dial",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureClick {
                    connect_pressed[sender] => move |gesture, _, x, y| {
                        if let Some(widget) = gesture.widget() {
                            widget.grab_focus();
                        }
                        sender.input(AppMsg::TouchDown(Point::new(x, y)));
                    }
                },

                add_controller = gtk::EventControllerKey {
                    connect_key_pressed[sender] => move |_, key, _, _| {
                        if is_activate_key(key) {
                            sender.input(AppMsg::Activate);
                            return glib::Propagation::Stop;
                        }
                        glib::Propagation::Proceed
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            dial,
            config,
            config_path,
            config_required,
            state_path,
            window: window_size,
            events,
        } = init;

        theme::load_css();

        let model = AppModel {
            dial: Rc::new(RefCell::new(dial)),
            config: Rc::new(RefCell::new(config)),
            config_path,
            config_required,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.sync_accessibility();

        let dial_draw = model.dial.clone();
        let config_draw = model.config.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                // resize messages arrive after the frame that needs them
                dial_draw.borrow_mut().sync_size(width, height);

                let config = config_draw.borrow();
                let colors = DialColors::from_config(&config.colors);
                let style = DialStyle {
                    colors: &colors,
                    labels: &config.labels,
                    font_size: config.dial.label_font_size,
                };
                if let Err(e) = dial::draw(cr, &dial_draw.borrow(), &style) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let dial_save = model.dial.clone();
        root.connect_close_request(move |window| {
            if let Some(path) = &state_path {
                save_state(path, &dial_save.borrow(), window);
            }
            glib::Propagation::Proceed
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Resize(width, height) => {
                if self.dial.borrow_mut().sync_size(width, height) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::TouchDown(point) => {
                let action = self.dial.borrow_mut().touch_down(point);
                self.sync_accessibility();
                if action.should_redraw {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Activate => {
                self.dial.borrow_mut().advance();
                self.sync_accessibility();
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => {
                match config::load_config(&self.config_path, self.config_required) {
                    Ok(new_config) => {
                        *self.config.borrow_mut() = new_config;
                        self.sync_accessibility();
                        self.drawing_area.queue_draw();
                        log::info!("Configuration reloaded");
                    }
                    Err(e) => log::error!("Failed to reload config: {}", e),
                }
            }
        }
    }
}

impl AppModel {
    /// Mirrors the current speed label and next action into the accessibility tree.
    fn sync_accessibility(&self) {
        let dial = self.dial.borrow();
        let config = self.config.borrow();
        let label = dial.description(&config.labels);
        let action = dial.action_description(&config.labels);

        self.drawing_area.update_property(&[
            gtk::accessible::Property::Label(label),
            gtk::accessible::Property::Description(action),
        ]);
        self.drawing_area
            .set_tooltip_text(Some(&format!("{} ({})", label, action)));
    }
}

fn save_state(path: &std::path::Path, dial: &Dial, window: &gtk::ApplicationWindow) {
    let host_state = serde_json::to_value(WindowState {
        width: window.default_width(),
        height: window.default_height(),
    })
    .ok();

    match state::write_snapshot(path, &dial.save(host_state)) {
        Ok(()) => log::debug!("Saved dial state to {}", path.display()),
        Err(e) => log::error!("Failed to save dial state: {}", e),
    }
}
