//! Annotation flag bits (PDF 32000-1, table 165)

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnnotationFlags: u32 {
        const INVISIBLE = 1;
        const HIDDEN = 1 << 1;
        const PRINT = 1 << 2;
        const NO_ZOOM = 1 << 3;
        const NO_ROTATE = 1 << 4;
        const NO_VIEW = 1 << 5;
        const READ_ONLY = 1 << 6;
        const LOCKED = 1 << 7;
        const TOGGLE_NO_VIEW = 1 << 8;
    }
}

impl Default for AnnotationFlags {
    fn default() -> Self {
        AnnotationFlags::empty()
    }
}
