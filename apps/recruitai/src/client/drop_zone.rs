//! Drag-and-drop target shared by the single-file and multi-file zones.

use crate::client::files::{FileInput, SelectedFile};

#[derive(Debug, Clone)]
pub enum DragEvent {
    DragOver,
    DragLeave,
    Drop(Vec<SelectedFile>),
}

/// What a drop hands to the zone's handler.
#[derive(Debug, Clone)]
pub enum Dropped {
    Single(SelectedFile),
    Many(Vec<SelectedFile>),
}

/// A drop target bound to a file input.
///
/// Every event passed to `handle` is consumed; the browser never gets to open
/// a dropped file itself.
#[derive(Debug, Clone)]
pub struct DropZone {
    multiple: bool,
    drag_over: bool,
}

impl DropZone {
    pub fn new(multiple: bool) -> Self {
        Self {
            multiple,
            drag_over: false,
        }
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Whether the `drag-over` highlight is showing.
    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    /// Applies one drag event. Returns the dropped file(s) for the handler, if any.
    ///
    /// In single mode only the first file is passed on and `input` is replaced
    /// with it, so a later submission reads the dropped file from the input.
    pub fn handle(&mut self, event: DragEvent, input: &mut FileInput) -> Option<Dropped> {
        match event {
            DragEvent::DragOver => {
                self.drag_over = true;
                None
            }
            DragEvent::DragLeave => {
                self.drag_over = false;
                None
            }
            DragEvent::Drop(files) => {
                self.drag_over = false;
                if self.multiple {
                    return (!files.is_empty()).then_some(Dropped::Many(files));
                }
                let first = files.into_iter().next()?;
                input.set(vec![first.clone()]);
                Some(Dropped::Single(first))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, "data")
    }

    #[test]
    fn test_drag_over_and_leave_toggle_highlight() {
        let mut zone = DropZone::new(true);
        let mut input = FileInput::default();
        assert!(zone.handle(DragEvent::DragOver, &mut input).is_none());
        assert!(zone.is_drag_over());
        assert!(zone.handle(DragEvent::DragLeave, &mut input).is_none());
        assert!(!zone.is_drag_over());
    }

    #[test]
    fn test_drop_clears_highlight() {
        let mut zone = DropZone::new(false);
        let mut input = FileInput::default();
        zone.handle(DragEvent::DragOver, &mut input);
        zone.handle(DragEvent::Drop(vec![file("jd.txt")]), &mut input);
        assert!(!zone.is_drag_over());
    }

    #[test]
    fn test_empty_drop_yields_nothing() {
        let mut input = FileInput::default();
        assert!(DropZone::new(true)
            .handle(DragEvent::Drop(vec![]), &mut input)
            .is_none());
        assert!(DropZone::new(false)
            .handle(DragEvent::Drop(vec![]), &mut input)
            .is_none());
        assert!(input.files.is_empty());
    }

    #[test]
    fn test_single_mode_passes_first_file_and_syncs_input() {
        let mut zone = DropZone::new(false);
        let mut input = FileInput::default();
        input.set(vec![file("old.pdf")]);

        let dropped = zone.handle(
            DragEvent::Drop(vec![file("jd.docx"), file("extra.pdf")]),
            &mut input,
        );
        match dropped {
            Some(Dropped::Single(f)) => assert_eq!(f.name, "jd.docx"),
            other => panic!("expected single drop, got {other:?}"),
        }
        assert_eq!(input.files.len(), 1);
        assert_eq!(input.first().unwrap().name, "jd.docx");
    }

    #[test]
    fn test_multiple_mode_passes_all_and_leaves_input_alone() {
        let mut zone = DropZone::new(true);
        let mut input = FileInput::default();
        let dropped = zone.handle(DragEvent::Drop(vec![file("a.pdf"), file("b.txt")]), &mut input);
        match dropped {
            Some(Dropped::Many(files)) => assert_eq!(files.len(), 2),
            other => panic!("expected multi drop, got {other:?}"),
        }
        assert!(input.files.is_empty());
    }
}
