use docs_nav_types::{PageContent, PageId};
use log::debug;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded page store with strict first-in, first-out eviction.
///
/// Reads never change eviction order. Entries live for the page session; there is
/// no expiry.
#[derive(Debug)]
pub struct PageCache {
    capacity: usize,
    entries: HashMap<PageId, Rc<PageContent>>,
    order: VecDeque<PageId>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PageCache {
    /// Creates a cache holding at most `capacity` pages (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn has(&self, id: &PageId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &PageId) -> Option<Rc<PageContent>> {
        self.entries.get(id).cloned()
    }

    /// Stores a page, evicting the oldest entry when full. Returns the evicted id.
    ///
    /// Re-inserting a cached id replaces its content but keeps its original
    /// position in the eviction order.
    pub fn put(&mut self, id: PageId, content: impl Into<Rc<PageContent>>) -> Option<PageId> {
        let content = content.into();
        if let Some(slot) = self.entries.get_mut(&id) {
            *slot = content;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.order.pop_front().inspect(|oldest| {
                self.entries.remove(oldest);
                debug!("page cache full, evicted page {oldest}");
            })
        } else {
            None
        };

        self.order.push_back(id.clone());
        self.entries.insert(id, content);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached ids, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &PageId> {
        self.order.iter()
    }
}
