use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    Window,
};

use crate::config::RevealConfig;
use crate::dom::{self, SetupError};

// Observers report crossings with rounding; a crossing just under the line
// still counts.
const RATIO_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealPolicy {
    pub threshold: f64,
    pub bottom_margin: f64,
}

impl From<&RevealConfig> for RevealPolicy {
    fn from(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            bottom_margin: config.bottom_margin_px,
        }
    }
}

impl RevealPolicy {
    /// Share of `rect` inside the viewport once its bottom edge is pulled in
    /// by the margin.
    pub fn visible_ratio(&self, rect: Rect, viewport_width: f64, viewport_height: f64) -> f64 {
        let bottom = (viewport_height - self.bottom_margin).max(0.0);
        let left = rect.left.max(0.0);
        let right = rect.right().min(viewport_width);
        let top = rect.top.max(0.0);
        let lower = rect.bottom().min(bottom);

        let area = rect.width * rect.height;
        if area <= 0.0 {
            return 0.0;
        }
        (right - left).max(0.0) * (lower - top).max(0.0) / area
    }

    /// `None` is an element without a layout box (`display: none` or inside
    /// one), which is never visible.
    pub fn layout_ratio(&self, rect: Option<Rect>, viewport_width: f64, viewport_height: f64) -> f64 {
        rect.map_or(0.0, |rect| self.visible_ratio(rect, viewport_width, viewport_height))
    }

    pub fn qualifies(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }

    /// Same rule for ratios the browser reports, which may land just under
    /// the threshold on the crossing that fires the callback.
    pub fn qualifies_reported(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio + RATIO_TOLERANCE >= self.threshold
    }
}

/// One-way record of which watched elements have been revealed.
#[derive(Debug, Default)]
pub struct RevealLog {
    revealed: Vec<bool>,
}

impl RevealLog {
    pub fn track(&mut self) -> usize {
        self.revealed.push(false);
        self.revealed.len() - 1
    }

    /// True the first time only.
    pub fn reveal(&mut self, index: usize) -> bool {
        match self.revealed.get_mut(index) {
            Some(seen) if !*seen => {
                *seen = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn pending(&self) -> Vec<usize> {
        (0..self.revealed.len())
            .filter(|&i| !self.revealed[i])
            .collect()
    }
}

/// Source of one-shot "became visible" notifications. Implementations add the
/// reveal class and stop watching the element.
pub trait VisibilityObserver {
    fn watch(&self, element: Element);
}

pub struct NativeObserver {
    observer: IntersectionObserver,
}

impl NativeObserver {
    pub fn new(config: &RevealConfig) -> Result<Self, SetupError> {
        let policy = RevealPolicy::from(config);
        let class = config.class.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() && policy.qualifies_reported(entry.intersection_ratio()) {
                        let target = entry.target();
                        dom::set_class(&target, &class, true);
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.threshold));
        options.set_root_margin(&config.root_margin());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .map_err(|e| SetupError::js("IntersectionObserver", e))?;
        callback.forget();
        Ok(Self { observer })
    }
}

impl VisibilityObserver for NativeObserver {
    fn watch(&self, element: Element) {
        self.observer.observe(&element);
    }
}

struct Watched {
    elements: Vec<Element>,
    log: RevealLog,
}

/// Scroll-position fallback for browsers without `IntersectionObserver`.
pub struct PolledObserver {
    watched: Rc<RefCell<Watched>>,
}

impl PolledObserver {
    pub fn new(window: &Window, config: &RevealConfig) -> Result<Self, SetupError> {
        let watched = Rc::new(RefCell::new(Watched {
            elements: Vec::new(),
            log: RevealLog::default(),
        }));
        let check = {
            let watched = watched.clone();
            let window = window.clone();
            let policy = RevealPolicy::from(config);
            let class = config.class.clone();
            Rc::new(move || poll(&window, &watched, policy, &class))
        };

        for event in ["scroll", "resize"] {
            let check = check.clone();
            dom::listen(window, event, move |_| check())?;
        }
        // Elements are watched after construction; look once layout settles.
        Timeout::new(0, move || check()).forget();

        Ok(Self { watched })
    }
}

fn layout_rect(el: &Element) -> Option<Rect> {
    if el.get_client_rects().length() == 0 {
        return None;
    }
    let r = el.get_bounding_client_rect();
    Some(Rect {
        left: r.left(),
        top: r.top(),
        width: r.width(),
        height: r.height(),
    })
}

fn poll(window: &Window, watched: &RefCell<Watched>, policy: RevealPolicy, class: &str) {
    let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let width = size(window.inner_width());
    let height = size(window.inner_height());

    let mut guard = watched.borrow_mut();
    let watched = &mut *guard;
    for index in watched.log.pending() {
        let el = &watched.elements[index];
        let ratio = policy.layout_ratio(layout_rect(el), width, height);
        if policy.qualifies(ratio) && watched.log.reveal(index) {
            dom::set_class(el, class, true);
        }
    }
}

impl VisibilityObserver for PolledObserver {
    fn watch(&self, element: Element) {
        let mut watched = self.watched.borrow_mut();
        watched.log.track();
        watched.elements.push(element);
    }
}

fn has_intersection_observer(window: &Window) -> bool {
    Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

pub fn attach(window: &Window, document: &Document, config: &RevealConfig) -> Result<usize, SetupError> {
    let observer: Box<dyn VisibilityObserver> = if has_intersection_observer(window) {
        Box::new(NativeObserver::new(config)?)
    } else {
        info!("IntersectionObserver unavailable, polling scroll position");
        Box::new(PolledObserver::new(window, config)?)
    };

    let targets = dom::elements(document.query_selector_all(&config.selector));
    let count = targets.len();
    for el in targets {
        observer.watch(el);
    }
    debug!("Watching {} elements for reveal", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VW: f64 = 1000.0;
    const VH: f64 = 800.0;

    fn policy() -> RevealPolicy {
        RevealPolicy::from(&RevealConfig::default())
    }

    fn rect(top: f64, height: f64) -> Rect {
        Rect {
            left: 100.0,
            top,
            width: 200.0,
            height,
        }
    }

    #[test]
    fn fully_inside_is_whole() {
        assert_eq!(policy().visible_ratio(rect(100.0, 200.0), VW, VH), 1.0);
    }

    #[test]
    fn below_the_fold_is_hidden() {
        let p = policy();
        let ratio = p.visible_ratio(rect(900.0, 200.0), VW, VH);
        assert_eq!(ratio, 0.0);
        assert!(!p.qualifies(ratio));
    }

    #[test]
    fn bottom_margin_is_excluded() {
        let p = policy();
        // Top edge sits inside the 50px strip: nothing counts yet.
        let ratio = p.visible_ratio(rect(760.0, 200.0), VW, VH);
        assert_eq!(ratio, 0.0);
        assert!(!p.qualifies(ratio));
    }

    #[test]
    fn needs_ten_percent_past_the_margin() {
        let p = policy();
        // 10px of 200px above the inset edge: 5%.
        let ratio = p.visible_ratio(rect(740.0, 200.0), VW, VH);
        assert!((ratio - 0.05).abs() < 1e-9);
        assert!(!p.qualifies(ratio));
        // 30px of 200px: 15%.
        let ratio = p.visible_ratio(rect(720.0, 200.0), VW, VH);
        assert!((ratio - 0.15).abs() < 1e-9);
        assert!(p.qualifies(ratio));
    }

    #[test]
    fn scrolled_past_top_counts_remaining_part() {
        let ratio = policy().visible_ratio(rect(-150.0, 200.0), VW, VH);
        assert!((ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn just_under_ten_percent_does_not_count() {
        let p = policy();
        // 19px of 200px above the inset edge: 9.5%.
        let ratio = p.visible_ratio(rect(731.0, 200.0), VW, VH);
        assert!((ratio - 0.095).abs() < 1e-9);
        assert!(!p.qualifies(ratio));
        // 20px is exactly the threshold.
        assert!(p.qualifies(p.visible_ratio(rect(730.0, 200.0), VW, VH)));
    }

    #[test]
    fn reported_ratio_gets_rounding_slack() {
        let p = policy();
        assert!(p.qualifies_reported(0.0999));
        assert!(!p.qualifies_reported(0.05));
        assert!(!p.qualifies_reported(0.0));
    }

    #[test]
    fn element_without_layout_box_never_counts() {
        let p = policy();
        let collapsed = Rect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        };
        assert!(!p.qualifies(p.visible_ratio(collapsed, VW, VH)));
        assert!(!p.qualifies(p.layout_ratio(None, VW, VH)));
        assert!(!p.qualifies(p.visible_ratio(rect(300.0, 0.0), VW, VH)));
        assert!(p.qualifies(p.layout_ratio(Some(rect(100.0, 200.0)), VW, VH)));
    }

    #[test]
    fn reveal_is_one_shot_and_never_reverts() {
        let mut log = RevealLog::default();
        let a = log.track();
        let b = log.track();
        assert_eq!(log.pending(), vec![a, b]);

        assert!(log.reveal(a));
        assert!(!log.reveal(a));
        assert!(log.is_revealed(a));
        assert_eq!(log.pending(), vec![b]);

        // Nothing un-reveals; later scroll positions only add.
        assert!(log.reveal(b));
        assert!(log.is_revealed(a) && log.is_revealed(b));
        assert!(log.pending().is_empty());
    }

    #[test]
    fn unknown_index_is_ignored() {
        let mut log = RevealLog::default();
        assert!(!log.reveal(3));
        assert!(!log.is_revealed(3));
    }
}
