//! Mount points for terminal surfaces
//!
//! A container is whatever the host gives a surface to draw into. The core
//! only ever clears it, mounts into it and asks for its pixel size.

use crate::geometry::{Geometry, PixelSize};

/// A host-provided mount point
pub trait Container {
    /// Remove any existing content
    fn clear(&mut self);

    /// Mount a surface of the given geometry
    fn mount(&mut self, geometry: Geometry);

    /// Current size in pixels
    fn pixel_size(&self) -> PixelSize;
}

/// In-memory container for headless hosts and tests
#[derive(Debug, Clone, Default)]
pub struct HeadlessContainer {
    size: PixelSize,
    mounted: Option<Geometry>,
    clears: usize,
}

impl HeadlessContainer {
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            mounted: None,
            clears: 0,
        }
    }

    /// Simulate the host page resizing the container
    pub fn set_pixel_size(&mut self, size: PixelSize) {
        self.size = size;
    }

    /// Geometry of the mounted surface, if any
    pub fn mounted(&self) -> Option<Geometry> {
        self.mounted
    }

    /// Number of times the container has been cleared
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl Container for HeadlessContainer {
    fn clear(&mut self) {
        self.mounted = None;
        self.clears += 1;
    }

    fn mount(&mut self, geometry: Geometry) {
        self.mounted = Some(geometry);
    }

    fn pixel_size(&self) -> PixelSize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_container_lifecycle() {
        let mut container = HeadlessContainer::new(PixelSize::new(640, 480));
        container.mount(Geometry::new(80, 24));
        assert_eq!(container.mounted(), Some(Geometry::new(80, 24)));
        container.clear();
        assert_eq!(container.mounted(), None);
        assert_eq!(container.clear_count(), 1);
        container.set_pixel_size(PixelSize::new(1, 1));
        assert_eq!(container.pixel_size(), PixelSize::new(1, 1));
    }
}
