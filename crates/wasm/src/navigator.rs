//! `DocsNavigator`: the JavaScript-facing handle of one navigation session.

use crate::clock::BrowserClock;
use crate::document::{BrowserDocument, transition_css};
use crate::error::WasmError;
use crate::fetch::FetchContentSource;
use crate::hooks::JsHooks;
use docs_nav_core::{LinkClick, Modifiers, NavigationConfig, NavigationOutcome, NavigationRequest, NavigationSession};
use docs_nav_types::{HistoryState, PageId};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Element, Event, EventTarget, MouseEvent, PopStateEvent};

type Session = NavigationSession<FetchContentSource, BrowserDocument, BrowserClock, JsHooks>;

/// Global the theme uses to pass its settings to the page.
const SETTINGS_GLOBAL: &str = "docsThemeAsync";

/// An event listener that detaches itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
            .ok();
    }
}

fn outcome_name(outcome: NavigationOutcome) -> &'static str {
    match outcome {
        NavigationOutcome::Completed { from_cache: true } => "cached",
        NavigationOutcome::Completed { from_cache: false } => "completed",
        NavigationOutcome::Ignored => "ignored",
        NavigationOutcome::Cancelled => "cancelled",
        NavigationOutcome::FellBack => "fell-back",
    }
}

/// Reads `NavigationConfig` from an explicit settings object, or from the
/// `docsThemeAsync` global when none is given.
fn read_settings(window: &web_sys::Window, settings: JsValue) -> Result<NavigationConfig, WasmError> {
    let settings = if settings.is_undefined() || settings.is_null() {
        js_sys::Reflect::get(window, &JsValue::from_str(SETTINGS_GLOBAL)).unwrap_or(JsValue::UNDEFINED)
    } else {
        settings
    };
    if settings.is_undefined() || settings.is_null() {
        return Ok(NavigationConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(settings)?)
}

/// The link a click landed in, if any.
fn clicked_link(event: &Event) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest("a")
        .ok()
        .flatten()
}

/// Absolute URL of a link, as resolved by the browser.
fn resolved_href(link: &Element) -> Option<String> {
    js_sys::Reflect::get(link, &JsValue::from_str("href"))
        .ok()?
        .as_string()
}

#[wasm_bindgen]
pub struct DocsNavigator {
    session: Rc<Session>,
    listeners: RefCell<Vec<Listener>>,
}

#[wasm_bindgen]
impl DocsNavigator {
    /// Creates a navigator for the current page.
    ///
    /// `settings` takes the shape of the `docsThemeAsync` global (`restUrl`,
    /// `nonce`, `loadingText`, ...). `hooks` may carry the theme's feature
    /// functions (`initHighlightJS`, `initCopyCodeButtons`, ...); without it they
    /// are looked up on `window`.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue, hooks: Option<js_sys::Object>) -> Result<DocsNavigator, JsValue> {
        let document = BrowserDocument::new()?;
        let config = read_settings(document.window(), settings)?;
        let source = FetchContentSource::new(config.clone());
        let session = NavigationSession::new(source, Rc::new(document), Rc::new(BrowserClock), config)
            .with_hooks(JsHooks::new(hooks));
        Ok(Self {
            session: Rc::new(session),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Builds the table of contents and installs the event listeners.
    ///
    /// The table of contents works at every width. Link interception and history
    /// handling are only installed on wide viewports; the return value tells which.
    pub fn start(&self) -> bool {
        self.stop();
        let doc = self.session.document().clone();
        let config = self.session.config();
        doc.install_styles(&transition_css(config.fade_ms, config.breadcrumb_stagger_ms));

        let toc = self.session.toc().clone();
        toc.rebuild();

        let window: EventTarget = doc.window().clone().into();
        let document: EventTarget = doc.document().clone().into();
        let mut listeners = Vec::new();

        let on_scroll = toc.clone();
        listeners.extend(Listener::attach(&window, "scroll", move |_| {
            let toc = on_scroll.clone();
            spawn_local(async move { toc.on_scroll().await });
        }));
        let on_resize = toc.clone();
        listeners.extend(Listener::attach(&window, "resize", move |_| {
            let toc = on_resize.clone();
            spawn_local(async move { toc.on_resize().await });
        }));

        let enabled = self.session.init();
        let session = self.session.clone();
        listeners.extend(Listener::attach(&document, "click", move |event| {
            handle_click(&session, &event, enabled);
        }));

        if enabled {
            let session = self.session.clone();
            listeners.extend(Listener::attach(&window, "popstate", move |event| {
                let state = event
                    .dyn_ref::<PopStateEvent>()
                    .map(PopStateEvent::state)
                    .and_then(|state| serde_wasm_bindgen::from_value::<HistoryState>(state).ok());
                if let Some(request) = session.request_for_history(state.as_ref()) {
                    let session = session.clone();
                    spawn_local(async move {
                        session.navigate_to(request).await;
                    });
                }
            }));
        }

        info!("docs navigation started (async navigation: {enabled})");
        *self.listeners.borrow_mut() = listeners;
        enabled
    }

    /// Detaches every listener installed by [`DocsNavigator::start`].
    pub fn stop(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Navigates to a page. Resolves to `"completed"`, `"cached"`, `"ignored"`,
    /// `"cancelled"` or `"fell-back"`; rejects with `INVALID_PAGE` for a blank id.
    pub fn navigate(&self, page_id: String, url: String, push_history: Option<bool>) -> js_sys::Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            let id = PageId::parse(&page_id).ok_or_else(|| WasmError::invalid_page(&page_id))?;
            let mut request = NavigationRequest::new(id, url);
            if push_history == Some(false) {
                request = request.without_history();
            }
            let outcome = session.navigate_to(request).await;
            Ok(JsValue::from_str(outcome_name(outcome)))
        })
    }

    /// Abandons the running navigation. Returns false when none was running.
    pub fn cancel(&self) -> bool {
        self.session.cancel()
    }

    #[wasm_bindgen(getter, js_name = isNavigating)]
    pub fn is_navigating(&self) -> bool {
        self.session.is_navigating()
    }

    /// Re-indexes the headings and re-renders the table of contents.
    #[wasm_bindgen(js_name = refreshToc)]
    pub fn refresh_toc(&self) -> usize {
        self.session.toc().rebuild().len()
    }

    #[wasm_bindgen(js_name = scrollToAnchor)]
    pub fn scroll_to_anchor(&self, anchor: String) -> js_sys::Promise {
        let toc = self.session.toc().clone();
        future_to_promise(async move {
            let found = toc.scroll_to_anchor(&anchor).await;
            Ok(JsValue::from_bool(found))
        })
    }

    #[wasm_bindgen(getter, js_name = activeAnchor)]
    pub fn active_anchor(&self) -> Option<String> {
        self.session.toc().active_anchor()
    }

    #[wasm_bindgen(getter, js_name = cachedPages)]
    pub fn cached_pages(&self) -> usize {
        self.session.cache().len()
    }
}

fn handle_click(session: &Rc<Session>, event: &Event, intercept_links: bool) {
    let Some(link) = clicked_link(event) else {
        return;
    };
    let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
        return;
    };
    let mut click = LinkClick {
        button: mouse.button(),
        modifiers: Modifiers {
            meta: mouse.meta_key(),
            ctrl: mouse.ctrl_key(),
            shift: mouse.shift_key(),
            alt: mouse.alt_key(),
        },
        ..LinkClick::default()
    };
    // Modified and non-primary clicks open tabs or windows; leave them to the browser.
    if !click.is_plain() {
        return;
    }

    // Table-of-contents links scroll within the page.
    if let Ok(Some(_)) = link.closest("#table-of-contents")
        && let Some(anchor) = link
            .get_attribute("href")
            .and_then(|href| href.strip_prefix('#').map(str::to_string))
    {
        event.prevent_default();
        let toc = session.toc().clone();
        spawn_local(async move {
            toc.scroll_to_anchor(&anchor).await;
        });
        return;
    }

    if !intercept_links {
        return;
    }
    click.href = resolved_href(&link).unwrap_or_default();
    click.page_id = link.get_attribute("data-page-id");
    click.breadcrumbs = link.get_attribute("data-breadcrumbs");
    let Some(request) = session.request_for_click(click) else {
        return;
    };

    event.prevent_default();
    debug!("intercepted link to page {}", request.page_id);
    let session = session.clone();
    spawn_local(async move {
        session.navigate_to(request).await;
    });
}
