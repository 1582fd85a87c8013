use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use web_sys::{Document, Element};

use crate::dom::{self, SetupError};

const ALL: &str = "all";
const ACTIVE: &str = "active";
const HIDDEN: &str = "hidden";

/// Which controls drive which items.
#[derive(Debug, Clone, Copy)]
pub struct FilterKind {
    pub name: &'static str,
    pub controls: &'static str,
    pub items: &'static str,
}

pub const VIDEO: FilterKind = FilterKind {
    name: "video",
    controls: ".filter-btn",
    items: ".video-item",
};

pub const QUOTE: FilterKind = FilterKind {
    name: "quote",
    controls: ".quote-filter",
    items: ".quote-item",
};

pub fn shows(filter: Option<&str>, category: Option<&str>) -> bool {
    filter == Some(ALL) || filter == category
}

/// Selection state of one filter group. `None` until the first click unless
/// the markup marks a control active.
#[derive(Debug, Clone)]
pub struct Selection {
    filters: Vec<Option<String>>,
    active: Option<usize>,
}

impl Selection {
    pub fn new(filters: Vec<Option<String>>, active: Option<usize>) -> Self {
        Self { filters, active }
    }

    pub fn activate(&mut self, control: usize) {
        self.active = Some(control);
    }

    pub fn is_active(&self, control: usize) -> bool {
        self.active == Some(control)
    }

    /// Visibility of an item with `category` under the current selection.
    pub fn shows(&self, category: Option<&str>) -> bool {
        match self.active {
            Some(i) => shows(self.filters[i].as_deref(), category),
            None => true,
        }
    }
}

struct FilterGroup {
    controls: Vec<Element>,
    items: Vec<(Element, Option<String>)>,
    selection: Selection,
}

impl FilterGroup {
    fn new(document: &Document, kind: FilterKind) -> Result<Self, SetupError> {
        let controls = dom::elements(document.query_selector_all(kind.controls));
        if controls.is_empty() {
            return Err(SetupError::Missing(kind.controls));
        }
        let filters = controls.iter().map(|c| c.get_attribute("data-filter")).collect();
        let active = controls
            .iter()
            .position(|c| c.class_list().contains(ACTIVE));
        let items = dom::elements(document.query_selector_all(kind.items))
            .into_iter()
            .map(|item| {
                let category = item.get_attribute("data-category");
                (item, category)
            })
            .collect();

        Ok(Self {
            controls,
            items,
            selection: Selection::new(filters, active),
        })
    }

    fn select(&mut self, control: usize) {
        self.selection.activate(control);
        for (i, el) in self.controls.iter().enumerate() {
            dom::set_class(el, ACTIVE, self.selection.is_active(i));
        }
        for (item, category) in &self.items {
            dom::set_class(item, HIDDEN, !self.selection.shows(category.as_deref()));
        }
    }
}

pub fn attach(document: &Document, kind: FilterKind) -> Result<usize, SetupError> {
    let group = FilterGroup::new(document, kind)?;
    let controls = group.controls.clone();
    let group = Rc::new(RefCell::new(group));

    let mut attached = 0;
    for (index, control) in controls.iter().enumerate() {
        let group = group.clone();
        match dom::listen(control, "click", move |_| group.borrow_mut().select(index)) {
            Ok(()) => attached += 1,
            Err(e) => debug!("{} filter control not wired: {}", kind.name, e),
        }
    }
    Ok(attached)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORIES: [Option<&str>; 6] = [
        Some("sales"),
        Some("cs"),
        Some("sales"),
        Some("leadership"),
        None,
        Some("cs"),
    ];

    fn selection() -> Selection {
        Selection::new(
            vec![
                Some("all".to_string()),
                Some("sales".to_string()),
                Some("cs".to_string()),
                Some("leadership".to_string()),
            ],
            None,
        )
    }

    fn visible(selection: &Selection) -> Vec<usize> {
        CATEGORIES
            .iter()
            .enumerate()
            .filter(|(_, c)| selection.shows(**c))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn nothing_filtered_before_first_click() {
        let selection = selection();
        assert!((0..4).all(|i| !selection.is_active(i)));
        assert_eq!(visible(&selection), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn all_shows_every_item() {
        let mut selection = selection();
        selection.activate(1);
        selection.activate(0);
        assert_eq!(visible(&selection), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn category_shows_exactly_matching_items() {
        let mut selection = selection();
        selection.activate(2);
        assert_eq!(visible(&selection), vec![1, 5]);
        selection.activate(1);
        assert_eq!(visible(&selection), vec![0, 2]);
        selection.activate(3);
        assert_eq!(visible(&selection), vec![3]);
    }

    #[test]
    fn repeat_activation_is_idempotent() {
        let mut selection = selection();
        selection.activate(1);
        let once = visible(&selection);
        selection.activate(1);
        assert_eq!(visible(&selection), once);
    }

    #[test]
    fn exactly_one_control_active() {
        let mut selection = selection();
        for clicked in [2, 0, 3, 3, 1] {
            selection.activate(clicked);
            let active: Vec<usize> = (0..4).filter(|&i| selection.is_active(i)).collect();
            assert_eq!(active, vec![clicked]);
        }
    }

    #[test]
    fn markup_active_control_is_kept() {
        let selection = Selection::new(vec![Some("all".into()), Some("cs".into())], Some(1));
        assert!(selection.is_active(1));
        assert_eq!(visible(&selection), vec![1, 5]);
    }

    #[test]
    fn match_rule() {
        assert!(shows(Some("all"), Some("sales")));
        assert!(shows(Some("all"), None));
        assert!(shows(Some("sales"), Some("sales")));
        assert!(!shows(Some("sales"), Some("cs")));
        assert!(!shows(Some("sales"), None));
    }
}
