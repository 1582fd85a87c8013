use log::debug;
use web_sys::{Document, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::dom;

const IN_PAGE_LINK: &str = r##"a[href^="#"]"##;

/// Fragment id a same-page link points at, without the `#`.
pub fn target_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub fn attach(document: &Document) -> usize {
    let mut attached = 0;
    for link in dom::elements(document.query_selector_all(IN_PAGE_LINK)) {
        let doc = document.clone();
        let href_source = link.clone();
        let result = dom::listen(&link, "click", move |event| {
            event.prevent_default();
            let href = href_source.get_attribute("href").unwrap_or_default();
            let Some(target) = target_id(&href).and_then(|id| doc.get_element_by_id(id)) else {
                return;
            };
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        });
        match result {
            Ok(()) => attached += 1,
            Err(e) => debug!("In-page link not wired: {}", e),
        }
    }
    attached
}
