/// Feature modules re-initialised after new content is attached.
///
/// Every method defaults to a no-op, so an implementation only overrides the
/// modules it actually has.
pub trait ContentHooks {
    fn highlight_code(&self) {}

    fn init_copy_buttons(&self) {}

    fn init_smooth_anchors(&self) {}

    fn init_parent_page_handlers(&self) {}

    fn reinit_menu_handlers(&self) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl ContentHooks for NoopHooks {}
