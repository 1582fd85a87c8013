use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use web_sys::{Document, Element, HtmlElement};

use crate::dom::{self, SetupError};

const CARD: &str = ".expandable-card";
const HEADER: &str = ".card-header";
const CONTENT: &str = ".card-content";
const ICON: &str = ".expand-icon";
const EXPANDED: &str = "expanded";
const SCOPE: &str = "section";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Collapsed,
    Expanded,
}

/// What a card state looks like on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardProjection {
    pub expanded_class: bool,
    pub max_height: String,
    pub icon_transform: &'static str,
}

impl CardState {
    /// `content_height` is the content's natural height in pixels; an open
    /// card is pinned to it so the height transition has a concrete target.
    pub fn project(self, content_height: i32) -> CardProjection {
        match self {
            CardState::Expanded => CardProjection {
                expanded_class: true,
                max_height: format!("{}px", content_height),
                icon_transform: "rotate(180deg)",
            },
            CardState::Collapsed => CardProjection {
                expanded_class: false,
                max_height: "0".to_string(),
                icon_transform: "rotate(0deg)",
            },
        }
    }
}

/// Open/closed bookkeeping for the cards of one section. Holding a single
/// index means two cards can never be open together.
#[derive(Debug, Default)]
pub struct Accordion {
    expanded: Option<usize>,
}

impl Accordion {
    pub fn state(&self, card: usize) -> CardState {
        if self.expanded == Some(card) {
            CardState::Expanded
        } else {
            CardState::Collapsed
        }
    }

    /// Flips `card` and returns every card whose state changed.
    pub fn toggle(&mut self, card: usize) -> Vec<(usize, CardState)> {
        match self.expanded {
            Some(open) if open == card => {
                self.expanded = None;
                vec![(card, CardState::Collapsed)]
            }
            Some(open) => {
                self.expanded = Some(card);
                vec![(open, CardState::Collapsed), (card, CardState::Expanded)]
            }
            None => {
                self.expanded = Some(card);
                vec![(card, CardState::Expanded)]
            }
        }
    }
}

struct Card {
    root: Element,
    header: HtmlElement,
    content: HtmlElement,
    icon: HtmlElement,
}

impl Card {
    fn new(root: Element) -> Result<Self, SetupError> {
        Ok(Self {
            header: dom::require(&root, HEADER)?,
            content: dom::require(&root, CONTENT)?,
            icon: dom::require(&root, ICON)?,
            root,
        })
    }

    fn render(&self, state: CardState) {
        let projection = state.project(self.content.scroll_height());
        dom::set_class(&self.root, EXPANDED, projection.expanded_class);
        dom::set_style(&self.content, "max-height", &projection.max_height);
        dom::set_style(&self.icon, "transform", projection.icon_transform);
    }
}

struct Section {
    scope: Option<Element>,
    cards: Vec<Card>,
    accordion: Accordion,
}

impl Section {
    fn holds(&self, scope: &Option<Element>) -> bool {
        match (&self.scope, scope) {
            (Some(a), Some(b)) => dom::same(a, b),
            _ => false,
        }
    }
}

// Collapsed by height so the transition has something to animate. Applied to
// every card content, inert cards included.
pub const CONTENT_BASE_STYLE: [(&str, &str); 3] = [
    ("max-height", "0"),
    ("overflow", "hidden"),
    ("transition", "max-height 0.3s ease"),
];

fn prepare_content(content: &HtmlElement) {
    for (property, value) in CONTENT_BASE_STYLE {
        dom::set_style(content, property, value);
    }
}

pub fn attach(document: &Document) -> usize {
    let mut sections: Vec<Section> = Vec::new();

    for root in dom::elements(document.query_selector_all(CARD)) {
        if let Some(content) = dom::optional(&root, CONTENT) {
            prepare_content(&content);
        }

        let card = match Card::new(root) {
            Ok(card) => card,
            Err(e) => {
                debug!("Skipping expandable card: {}", e);
                continue;
            }
        };
        card.render(CardState::Collapsed);

        // Cards outside any section only ever close themselves.
        let scope = card.root.closest(SCOPE).ok().flatten();
        match sections.iter_mut().find(|s| s.holds(&scope)) {
            Some(section) => section.cards.push(card),
            None => sections.push(Section {
                scope,
                cards: vec![card],
                accordion: Accordion::default(),
            }),
        }
    }

    let mut attached = 0;
    for section in sections {
        let headers: Vec<HtmlElement> = section.cards.iter().map(|c| c.header.clone()).collect();
        let section = Rc::new(RefCell::new(section));

        for (index, header) in headers.into_iter().enumerate() {
            let section = section.clone();
            let result = dom::listen(&header, "click", move |_| {
                let mut guard = section.borrow_mut();
                let section = &mut *guard;
                for (card, state) in section.accordion.toggle(index) {
                    section.cards[card].render(state);
                }
            });
            match result {
                Ok(()) => attached += 1,
                Err(e) => debug!("Skipping expandable card: {}", e),
            }
        }
    }
    attached
}
