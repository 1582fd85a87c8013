use log::debug;
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, EventTarget, HtmlElement, NodeList};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("missing required `{0}` element")]
    Missing(&'static str),
    #[error("`{0}` is not an HTML element")]
    NotHtml(&'static str),
    #[error("`{0}` is not an <input> element")]
    NotInput(&'static str),
    #[error("browser rejected {what}: {reason}")]
    Js { what: &'static str, reason: String },
}

impl SetupError {
    pub fn js(what: &'static str, value: JsValue) -> Self {
        SetupError::Js {
            what,
            reason: format!("{:?}", value),
        }
    }
}

pub fn elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn find(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Required part of a component: present and an HTML element.
pub fn require(root: &Element, selector: &'static str) -> Result<HtmlElement, SetupError> {
    find(root, selector)
        .ok_or(SetupError::Missing(selector))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| SetupError::NotHtml(selector))
}

pub fn optional(root: &Element, selector: &str) -> Option<HtmlElement> {
    find(root, selector).and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if el.style().set_property(property, value).is_err() {
        debug!("Could not set {} on element", property);
    }
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    if el.class_list().toggle_with_force(class, on).is_err() {
        debug!("Could not toggle class {} on element", class);
    }
}

pub fn same(a: &Element, b: &Element) -> bool {
    a.is_same_node(Some(b))
}

/// Registers `handler` for the rest of the page's life.
pub fn listen<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<(), SetupError>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|e| SetupError::js(event, e))?;
    callback.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_input_slider_is_reported_as_such() {
        let e = SetupError::NotInput(".slider");
        assert_eq!(e.to_string(), "`.slider` is not an <input> element");
        assert_eq!(
            SetupError::NotHtml(".card-header").to_string(),
            "`.card-header` is not an HTML element"
        );
    }

    #[test]
    fn missing_part_names_selector() {
        assert_eq!(
            SetupError::Missing(".expand-icon").to_string(),
            "missing required `.expand-icon` element"
        );
    }
}
