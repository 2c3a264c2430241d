use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::errors::{Result, SkyscrollError};
use crate::sequencer::ScrollRegion;

/// Tracks the scroll progress of a pinned page element.
///
/// The browser's scroll listener only records the newest progress; the frame
/// loop takes it once per redraw, so bursts of scroll events collapse into a
/// single camera update.
pub struct PageScroll {
    window: web_sys::Window,
    element: web_sys::Element,
    latest: Rc<Cell<Option<f32>>>,
    listener: Closure<dyn FnMut(web_sys::Event)>,
}

impl PageScroll {
    /// Attaches to the first element matching `selector`.
    pub fn attach(selector: &str) -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| SkyscrollError::MissingContainer("no browser window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SkyscrollError::MissingContainer("no document".into()))?;
        let element = document
            .query_selector(selector)
            .map_err(|e| SkyscrollError::Wasm(format!("{e:?}")))?
            .ok_or_else(|| {
                SkyscrollError::MissingContainer(format!("no element matches '{selector}'"))
            })?;

        let latest = Rc::new(Cell::new(Some(measure(&window, &element))));

        let listener = {
            let window = window.clone();
            let element = element.clone();
            let latest = latest.clone();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
                latest.set(Some(measure(&window, &element)));
            })
        };
        window
            .add_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref())
            .map_err(|e| SkyscrollError::Wasm(format!("{e:?}")))?;

        Ok(Self {
            window,
            element,
            latest,
            listener,
        })
    }

    /// Newest progress since the last call, if the page scrolled.
    pub fn take_progress(&self) -> Option<f32> {
        self.latest.take()
    }

    /// Re-measures after a layout change such as a resize.
    pub fn refresh(&self) {
        self.latest.set(Some(measure(&self.window, &self.element)));
    }
}

impl Drop for PageScroll {
    fn drop(&mut self) {
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback("scroll", self.listener.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove scroll listener: {err:?}");
        }
    }
}

fn measure(window: &web_sys::Window, element: &web_sys::Element) -> f32 {
    let rect = element.get_bounding_client_rect();
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    ScrollRegion::progress_from_rect(rect.top() as f32, rect.height() as f32, viewport as f32)
}

/// URL of the hosting page.
#[must_use]
pub fn page_href() -> Option<String> {
    web_sys::window()?.location().href().ok()
}
