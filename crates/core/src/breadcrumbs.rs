//! Breadcrumb trail transitions.
//!
//! Crumbs before the divergence index stay in the DOM untouched. Crumbs after it
//! fade out one by one from the end and are removed; new crumbs are then appended
//! and faded in one by one with the same stagger.

use docs_nav_traits::markup::scan_crumbs;
use docs_nav_traits::{BreadcrumbView, Clock, CrumbItem};
use docs_nav_types::{Crumb, PageContent};
use log::debug;
use std::time::Duration;

/// First index at which two trails differ; the shorter length when one is a
/// prefix of the other.
pub fn divergence_index<A: AsRef<str>, B: AsRef<str>>(old: &[A], new: &[B]) -> usize {
    old.iter()
        .zip(new)
        .position(|(a, b)| a.as_ref().trim() != b.as_ref().trim())
        .unwrap_or_else(|| old.len().min(new.len()))
}

/// Target trail for a link whose breadcrumbs were announced up front.
///
/// Link URLs come from the announced crumbs, or from the fetched page's own trail
/// when the labels line up. The last crumb is the current page.
pub fn target_items(target: &[Crumb], page: &PageContent) -> Vec<CrumbItem> {
    let last = target.len().saturating_sub(1);
    target
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            let current = i == last;
            let href = if current {
                None
            } else {
                crumb
                    .url
                    .clone()
                    .or_else(|| {
                        page.breadcrumb_trail
                            .get(i)
                            .filter(|known| known.title.trim() == crumb.title.trim())
                            .and_then(|known| known.url.clone())
                    })
                    .or_else(|| Some("#".to_string()))
            };
            CrumbItem {
                label: crumb.title.clone(),
                href,
                current,
            }
        })
        .collect()
}

/// The trail a fetched page brings along: its structured crumbs, or the items of
/// its rendered trail.
pub fn page_items(page: &PageContent) -> Vec<CrumbItem> {
    if page.breadcrumb_trail.is_empty() {
        return page
            .breadcrumbs_html
            .as_deref()
            .map(scan_crumbs)
            .unwrap_or_default();
    }
    let last = page.breadcrumb_trail.len() - 1;
    page.breadcrumb_trail
        .iter()
        .enumerate()
        .map(|(i, crumb)| CrumbItem {
            label: crumb.title.clone(),
            href: if i == last { None } else { crumb.url.clone() },
            current: i == last,
        })
        .collect()
}

pub struct BreadcrumbAnimator<'a, V: ?Sized, C> {
    view: &'a V,
    clock: &'a C,
    stagger: Duration,
    live: Option<&'a dyn Fn() -> bool>,
}

impl<'a, V: BreadcrumbView + ?Sized, C: Clock> BreadcrumbAnimator<'a, V, C> {
    pub fn new(view: &'a V, clock: &'a C, stagger: Duration) -> Self {
        Self {
            view,
            clock,
            stagger,
            live: None,
        }
    }

    /// Ties the animation to its owner: once `live` returns false, no further
    /// crumb is faded, removed, added or re-marked.
    pub fn with_guard(mut self, live: &'a dyn Fn() -> bool) -> Self {
        self.live = Some(live);
        self
    }

    fn is_live(&self) -> bool {
        self.live.is_none_or(|live| live())
    }

    /// Fades out and removes the crumbs that are not a prefix of `target`.
    ///
    /// Returns the divergence index, or `None` when no trail is rendered or the
    /// animation was abandoned before the removal.
    pub async fn remove_diverging<T: AsRef<str>>(&self, target: &[T]) -> Option<usize> {
        let current = self.view.crumb_labels()?;
        let diverge = divergence_index(&current, target);
        self.fade_out_from(diverge, current.len()).await;
        if !self.is_live() {
            return None;
        }
        self.view.truncate_crumbs(diverge);
        Some(diverge)
    }

    /// Appends the crumbs of `target` beyond the ones already rendered, then makes
    /// sure exactly the last crumb renders as the current page.
    pub async fn append_missing(&self, target: &[CrumbItem]) {
        if !self.view.has_breadcrumb_wrapper() {
            return;
        }
        let existing = self.view.crumb_labels().map_or(0, |labels| labels.len());
        self.fade_in_from(existing, target).await;
        self.sync_current(target);
    }

    /// Diff-based transition from the rendered trail to `next`.
    ///
    /// Without a rendered trail the new one is inserted at once, without animation.
    pub async fn animate_change(&self, next: &[CrumbItem], html: Option<&str>) {
        let Some(current) = self.view.crumb_labels() else {
            self.insert_immediately(next, html);
            return;
        };
        let next_labels: Vec<&str> = next.iter().map(|c| c.label.as_str()).collect();
        let diverge = divergence_index(&current, &next_labels);
        debug!(
            "breadcrumbs diverge at {diverge} ({} -> {} crumbs)",
            current.len(),
            next.len()
        );

        self.fade_out_from(diverge, current.len()).await;
        if diverge < current.len() {
            self.clock.sleep(self.stagger).await;
        }
        if !self.is_live() {
            return;
        }
        self.view.truncate_crumbs(diverge);
        self.fade_in_from(diverge, next).await;
        self.sync_current(next);
    }

    /// Puts a trail into an empty wrapper without any transition.
    pub fn insert_immediately(&self, next: &[CrumbItem], html: Option<&str>) {
        if !self.is_live() {
            return;
        }
        if let Some(html) = html {
            self.view.insert_trail_html(html);
            return;
        }
        for (i, item) in next.iter().enumerate() {
            self.view.push_crumb(item);
            self.view.fade_in_crumb(i);
        }
    }

    async fn fade_out_from(&self, diverge: usize, len: usize) {
        for i in (diverge..len).rev() {
            if !self.is_live() {
                return;
            }
            self.view.fade_out_crumb(i);
            self.clock.sleep(self.stagger).await;
        }
    }

    async fn fade_in_from(&self, start: usize, items: &[CrumbItem]) {
        for (i, item) in items.iter().enumerate().skip(start) {
            if !self.is_live() {
                return;
            }
            self.view.push_crumb(item);
            self.view.fade_in_crumb(i);
            self.clock.sleep(self.stagger).await;
        }
    }

    fn sync_current(&self, items: &[CrumbItem]) {
        if !self.is_live() {
            return;
        }
        for (i, item) in items.iter().enumerate() {
            self.view.set_crumb_current(i, item);
        }
    }
}
