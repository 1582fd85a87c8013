use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use web_sys::{Document, Element, HtmlElement};

use crate::dom::{self, SetupError};

const TOGGLE: &str = ".before-after-toggle";
const BUTTON: &str = ".toggle-button";
const BEFORE: &str = ".before-content";
const AFTER: &str = ".after-content";
const SHOWING_AFTER: &str = "showing-after";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Before,
    After,
}

impl Mode {
    pub fn flip(self) -> Self {
        match self {
            Mode::Before => Mode::After,
            Mode::After => Mode::Before,
        }
    }

    /// Button text describes what the next click will do.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Before => "Show After",
            Mode::After => "Show Before",
        }
    }

    /// Whether the button carries the `showing-after` class.
    pub fn marks_after(self) -> bool {
        self == Mode::After
    }

    /// `display` values for the before and after regions.
    pub fn display(self) -> (&'static str, &'static str) {
        match self {
            Mode::Before => ("block", "none"),
            Mode::After => ("none", "block"),
        }
    }
}

struct Toggle {
    button: HtmlElement,
    before: Option<HtmlElement>,
    after: Option<HtmlElement>,
    mode: Cell<Mode>,
}

impl Toggle {
    fn new(root: &Element) -> Result<Self, SetupError> {
        Ok(Self {
            button: dom::require(root, BUTTON)?,
            before: dom::optional(root, BEFORE),
            after: dom::optional(root, AFTER),
            mode: Cell::new(Mode::Before),
        })
    }

    fn flip(&self) {
        let mode = self.mode.get().flip();
        self.mode.set(mode);
        self.render(mode);
        self.button.set_text_content(Some(mode.label()));
    }

    fn render(&self, mode: Mode) {
        let (before, after) = mode.display();
        dom::set_class(&self.button, SHOWING_AFTER, mode.marks_after());
        if let Some(el) = &self.before {
            dom::set_style(el, "display", before);
        }
        if let Some(el) = &self.after {
            dom::set_style(el, "display", after);
        }
    }
}

pub fn attach(document: &Document) -> usize {
    let mut attached = 0;
    for root in dom::elements(document.query_selector_all(TOGGLE)) {
        // After-content starts hidden whatever the markup says.
        if let Some(after) = dom::optional(&root, AFTER) {
            dom::set_style(&after, "display", Mode::default().display().1);
        }

        let toggle = match Toggle::new(&root) {
            Ok(toggle) => Rc::new(toggle),
            Err(e) => {
                debug!("Skipping before/after toggle: {}", e);
                continue;
            }
        };
        // Markup may ship `showing-after`; the state starts at before.
        dom::set_class(&toggle.button, SHOWING_AFTER, Mode::default().marks_after());

        let button = toggle.button.clone();
        match dom::listen(&button, "click", move |_| toggle.flip()) {
            Ok(()) => attached += 1,
            Err(e) => debug!("Skipping before/after toggle: {}", e),
        }
    }
    attached
}
