//! WebAssembly integration tests.
//!
//! These tests run in a headless browser using wasm-bindgen-test.
//!
//! Run with: wasm-pack test --headless --chrome crates/wasm

use docs_nav_core::tag_content_links;
use docs_nav_traits::{BreadcrumbView, Clock, CrumbItem, PageView, Region, TocView};
use docs_nav_types::{PageId, SidebarLayout};
use docs_nav_wasm::{BrowserClock, BrowserDocument, DocsNavigator};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use std::time::Duration;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const FIXTURE: &str = r#"
<div class="site-main">
  <article>
    <div class="docs-breadcrumbs-wrapper">
      <nav class="docs-breadcrumbs" aria-label="Breadcrumb"><ul class="docs-breadcrumbs__list">
        <li class="docs-breadcrumbs__item"><a class="docs-breadcrumbs__link" href="/">Home</a></li>
        <li class="docs-breadcrumbs__item"><a class="docs-breadcrumbs__link" href="/guides/">Guides</a></li>
        <li class="docs-breadcrumbs__item"><span class="docs-breadcrumbs__current" aria-current="page">Setup</span></li>
      </ul></nav>
    </div>
    <h1 class="entry-title">Setup</h1>
    <div class="entry-content"><h2>Install</h2><a href="/guides">Guides</a></div>
  </article>
</div>
<ul class="page-tree">
  <li class="page-item"><div><a class="page-link" href="/guides/" data-page-id="7">Guides</a><button class="toggle-children" aria-expanded="false"></button></div>
    <ul class="children" style="display:none">
      <li class="page-item current-page"><a class="page-link" href="/guides/setup/" data-page-id="8">Setup</a></li>
      <li class="page-item"><a class="page-link" href="/guides/install/" data-page-id="9">Install</a></li>
    </ul>
  </li>
</ul>
"#;

fn fixture() -> BrowserDocument {
    let doc = BrowserDocument::new().expect("browser document");
    doc.document()
        .body()
        .expect("body")
        .set_inner_html(FIXTURE);
    doc
}

#[wasm_bindgen_test]
fn test_init() {
    let version = docs_nav_wasm::get_version();
    assert!(!version.is_empty());
}

#[wasm_bindgen_test]
fn test_title_gets_page_title_id() {
    let doc = fixture();
    doc.set_title("Install");
    assert_eq!(doc.page_title(), "Install");
    let title = doc.document().get_element_by_id("page-title");
    assert!(title.is_some());
}

#[wasm_bindgen_test]
fn test_reads_and_extends_breadcrumbs() {
    let doc = fixture();
    assert_eq!(
        doc.crumb_labels(),
        Some(vec!["Home".to_string(), "Guides".to_string(), "Setup".to_string()])
    );

    doc.truncate_crumbs(2);
    doc.push_crumb(&CrumbItem {
        label: "Install".to_string(),
        href: None,
        current: true,
    });
    doc.fade_in_crumb(2);
    assert_eq!(
        doc.crumb_labels(),
        Some(vec!["Home".to_string(), "Guides".to_string(), "Install".to_string()])
    );

    let current = doc
        .document()
        .query_selector(".docs-breadcrumbs__current")
        .unwrap()
        .unwrap();
    assert_eq!(current.text_content().as_deref(), Some("Install"));
}

#[wasm_bindgen_test]
fn test_current_page_expands_ancestors() {
    let doc = fixture();
    assert_eq!(doc.current_page_id(), Some(PageId::from("8")));

    doc.mark_current_page(&PageId::from("9"));
    assert_eq!(doc.current_page_id(), Some(PageId::from("9")));
    let toggle = doc
        .document()
        .query_selector(".toggle-children")
        .unwrap()
        .unwrap();
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("true"));
    assert!(doc.document().query_selector(".active-parent").unwrap().is_some());
}

#[wasm_bindgen_test]
fn test_sidebar_is_created_with_toc_section() {
    let doc = fixture();
    assert!(!doc.region_exists(Region::RightSidebar));
    doc.apply_sidebar(SidebarLayout::Visible { toc: true, buttons: false }, None);
    assert!(doc.region_exists(Region::RightSidebar));
    assert!(doc.has_toc_container());

    doc.render_toc(&[]);
    let placeholder = doc.document().query_selector(".no-headings").unwrap();
    assert!(placeholder.is_some());
}

#[wasm_bindgen_test]
fn test_content_links_are_tagged() {
    let doc = fixture();
    assert_eq!(tag_content_links(&doc), 1);
    let link = doc
        .document()
        .query_selector(".entry-content a")
        .unwrap()
        .unwrap();
    assert_eq!(link.get_attribute("data-page-id").as_deref(), Some("7"));
}

#[wasm_bindgen_test]
async fn test_clock_resolves() {
    BrowserClock.sleep(Duration::from_millis(5)).await;
    BrowserClock.next_frame().await;
}

#[wasm_bindgen_test]
async fn test_navigate_rejects_blank_page_id() {
    fixture();
    let navigator = DocsNavigator::new(JsValue::UNDEFINED, None).expect("navigator");

    let err = JsFuture::from(navigator.navigate("  ".into(), "/guides/".into(), None))
        .await
        .expect_err("blank id");
    let code = js_sys::Reflect::get(&err, &"code".into()).expect("code");
    assert_eq!(code.as_string().as_deref(), Some("INVALID_PAGE"));
    assert!(!navigator.is_navigating());
}
