//! Display surface collaborator.
//!
//! The engine never composites pixels itself. It creates a surface, tells it
//! how the frame buffer is laid out, and asks for a redraw once the buffer
//! holds a complete frame.

use std::collections::HashMap;

use super::{BufferDescriptor, FrameGeometry, SurfaceError};

/// Display subsystem that owns the actual surfaces.
pub trait Display {
    /// Handle to one surface. Destroyed by value, so it cannot be used afterwards.
    type Surface;

    /// Create a surface of the given size.
    fn create_surface(&mut self, geometry: FrameGeometry) -> Result<Self::Surface, SurfaceError>;

    /// Describe the pixel buffer the surface reads from.
    fn bind(&mut self, surface: &Self::Surface, descriptor: BufferDescriptor);

    /// Request a redraw from `pixels`, which hold exactly one complete frame.
    fn invalidate(&mut self, surface: &Self::Surface, pixels: &[u8]);

    /// Release a surface.
    fn destroy_surface(&mut self, surface: Self::Surface);
}

/// Handle issued by [`HeadlessDisplay`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(u32);

impl SurfaceId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// State of one headless surface.
#[derive(Debug, Clone)]
pub struct SurfaceState {
    pub geometry: FrameGeometry,
    pub descriptor: Option<BufferDescriptor>,
    /// Last composited frame; empty until the first redraw.
    pub contents: Vec<u8>,
    pub presents: u64,
}

/// Off-screen display that keeps the last composited frame of every surface.
///
/// Used by the host binary, the tests and the benches.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    surfaces: HashMap<u32, SurfaceState>,
    next_id: u32,
    surface_limit: Option<usize>,
    destroyed: usize,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail surface creation once `limit` surfaces are alive.
    pub fn with_surface_limit(mut self, limit: usize) -> Self {
        self.surface_limit = Some(limit);
        self
    }

    pub fn surface(&self, id: &SurfaceId) -> Option<&SurfaceState> {
        self.surfaces.get(&id.0)
    }

    /// Number of live surfaces.
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of surfaces destroyed so far.
    pub fn destroyed_surfaces(&self) -> usize {
        self.destroyed
    }

    /// The only live surface, if exactly one exists.
    pub fn sole_surface(&self) -> Option<&SurfaceState> {
        match self.surfaces.len() {
            1 => self.surfaces.values().next(),
            _ => None,
        }
    }
}

impl Display for HeadlessDisplay {
    type Surface = SurfaceId;

    fn create_surface(&mut self, geometry: FrameGeometry) -> Result<SurfaceId, SurfaceError> {
        if let Some(limit) = self.surface_limit
            && self.surfaces.len() >= limit
        {
            return Err(SurfaceError::Exhausted { limit });
        }
        if geometry.width == 0 || geometry.height == 0 {
            return Err(SurfaceError::Rejected {
                width: geometry.width,
                height: geometry.height,
            });
        }

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.surfaces.insert(
            id,
            SurfaceState {
                geometry,
                descriptor: None,
                contents: Vec::new(),
                presents: 0,
            },
        );
        Ok(SurfaceId(id))
    }

    fn bind(&mut self, surface: &SurfaceId, descriptor: BufferDescriptor) {
        if let Some(state) = self.surfaces.get_mut(&surface.0) {
            state.descriptor = Some(descriptor);
        }
    }

    fn invalidate(&mut self, surface: &SurfaceId, pixels: &[u8]) {
        let Some(state) = self.surfaces.get_mut(&surface.0) else {
            return;
        };
        // Unbound surfaces have nothing to read from.
        if state.descriptor.is_none() {
            return;
        }
        state.contents.clear();
        state.contents.extend_from_slice(pixels);
        state.presents += 1;
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        if self.surfaces.remove(&surface.0).is_some() {
            self.destroyed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PixelFormat;

    fn descriptor(geometry: FrameGeometry) -> BufferDescriptor {
        BufferDescriptor {
            geometry,
            format: PixelFormat::Rgb565,
            stride: geometry.stride(PixelFormat::Rgb565),
            byte_len: geometry.frame_size(PixelFormat::Rgb565),
        }
    }

    #[test]
    fn test_surface_lifecycle() {
        let mut display = HeadlessDisplay::new();
        let geometry = FrameGeometry::new(2, 2);
        let surface = display.create_surface(geometry).unwrap();
        assert_eq!(display.live_surfaces(), 1);

        // Redraw before bind is ignored
        display.invalidate(&surface, &[1; 8]);
        assert_eq!(display.surface(&surface).unwrap().presents, 0);

        display.bind(&surface, descriptor(geometry));
        display.invalidate(&surface, &[7; 8]);
        let state = display.surface(&surface).unwrap();
        assert_eq!(state.presents, 1);
        assert_eq!(state.contents, vec![7; 8]);

        display.destroy_surface(surface);
        assert_eq!(display.live_surfaces(), 0);
        assert_eq!(display.destroyed_surfaces(), 1);
    }

    #[test]
    fn test_surface_limit() {
        let mut display = HeadlessDisplay::new().with_surface_limit(1);
        let geometry = FrameGeometry::new(2, 2);
        let first = display.create_surface(geometry).unwrap();
        assert!(matches!(
            display.create_surface(geometry),
            Err(SurfaceError::Exhausted { limit: 1 })
        ));
        display.destroy_surface(first);
        assert!(display.create_surface(geometry).is_ok());
    }

    #[test]
    fn test_zero_geometry_rejected() {
        let mut display = HeadlessDisplay::new();
        assert!(matches!(
            display.create_surface(FrameGeometry::new(0, 10)),
            Err(SurfaceError::Rejected { .. })
        ));
    }
}
