//! Mount points and the output elements placed into them.
//!
//! A mount point is a rectangular region of the page that can hold rendered
//! layers. The page composites every attached element; detaching an element
//! removes it from the page without touching its owner.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::viewport::ViewportSize;

/// Identity of an output element, unique within the process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Default)]
struct OutputSlot {
    size: ViewportSize,
    view: Option<wgpu::TextureView>,
}

/// The visible product of a render surface.
///
/// Cheap to clone: clones share the same slot, so the owning surface can swap
/// its texture on resize and the mount point sees the new one.
#[derive(Debug, Clone)]
pub struct OutputElement {
    id: ElementId,
    slot: Rc<RefCell<OutputSlot>>,
}

impl OutputElement {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            id: ElementId::next(),
            slot: Rc::new(RefCell::new(OutputSlot { size, view: None })),
        }
    }

    #[inline]
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn size(&self) -> ViewportSize {
        self.slot.borrow().size
    }

    /// The texture to composite, if the element currently has one.
    pub fn view(&self) -> Option<wgpu::TextureView> {
        self.slot.borrow().view.clone()
    }

    pub(crate) fn set_size(&self, size: ViewportSize) {
        self.slot.borrow_mut().size = size;
    }

    pub(crate) fn set_view(&self, view: Option<wgpu::TextureView>) {
        self.slot.borrow_mut().view = view;
    }
}

/// A region of the page that accepts output elements.
pub trait MountPoint {
    fn attach(&mut self, element: OutputElement);

    /// Removes the element. Returns it if it was attached.
    fn detach(&mut self, id: ElementId) -> Option<OutputElement>;

    fn contains(&self, id: ElementId) -> bool;

    /// Number of attached elements.
    fn child_count(&self) -> usize;
}

/// A mount point that stacks its elements in attach order.
#[derive(Debug, Default)]
pub struct MountLayer {
    children: Vec<OutputElement>,
}

impl MountLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached elements, bottom first.
    pub fn children(&self) -> &[OutputElement] {
        &self.children
    }
}

impl MountPoint for MountLayer {
    fn attach(&mut self, element: OutputElement) {
        if self.contains(element.id()) {
            return;
        }
        self.children.push(element);
    }

    fn detach(&mut self, id: ElementId) -> Option<OutputElement> {
        let idx = self.children.iter().position(|c| c.id() == id)?;
        Some(self.children.remove(idx))
    }

    fn contains(&self, id: ElementId) -> bool {
        self.children.iter().any(|c| c.id() == id)
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_then_detach() {
        let mut layer = MountLayer::new();
        let el = OutputElement::new(ViewportSize::new(800, 600));
        layer.attach(el.clone());
        assert!(layer.contains(el.id()));
        assert_eq!(layer.child_count(), 1);

        assert!(layer.detach(el.id()).is_some());
        assert_eq!(layer.child_count(), 0);
        assert!(layer.detach(el.id()).is_none());
    }

    #[test]
    fn attaching_twice_keeps_one_child() {
        let mut layer = MountLayer::new();
        let el = OutputElement::new(ViewportSize::new(10, 10));
        layer.attach(el.clone());
        layer.attach(el);
        assert_eq!(layer.child_count(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let a = OutputElement::new(ViewportSize::new(1, 1));
        let b = OutputElement::new(ViewportSize::new(1, 1));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn clones_share_the_slot() {
        let el = OutputElement::new(ViewportSize::new(800, 600));
        let seen_by_page = el.clone();
        el.set_size(ViewportSize::new(1024, 768));
        assert_eq!(seen_by_page.size(), ViewportSize::new(1024, 768));
        assert!(seen_by_page.view().is_none());
    }
}
