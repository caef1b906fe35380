/// What the host found under a click, resolved with `closest()` on its side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickTarget {
    /// The target is, or sits inside, a button or a link.
    pub interactive: bool,
    /// The target sits inside the secret affordance (`.secret-box`).
    pub secret: bool,
    /// The target sits inside the accept affordance (`.accept-btn`).
    pub accept: bool,
}

impl ClickTarget {
    pub const PLAIN: ClickTarget = ClickTarget { interactive: false, secret: false, accept: false };
    pub const BUTTON: ClickTarget = ClickTarget { interactive: true, secret: false, accept: false };
}

/// Input events the effects understand.
/// Pointer coordinates are client pixels; the viewport size is given separately.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor or first touch moved.
    PointerMove { x: f32, y: f32, touch: bool },
    /// Click or tap at a position (spawns a burst).
    PointerDown { x: f32, y: f32, touch: bool },
    /// A click was delivered to the document, with its resolved target.
    Click { target: ClickTarget },
    /// A form field changed.
    Input,
    /// Keyboard or scroll activity (only refreshes the activity timestamp).
    Activity,
    /// A link was activated. `has_target` is true when the anchor names a target frame.
    LinkClicked { href: String, has_target: bool },
    /// The viewport was resized to `width` × `height` pixels.
    Resize { width: f32, height: f32 },
    /// The page is about to unload.
    Unload,
}

impl InputEvent {
    /// Events that count as user activity for active-time accounting
    /// (mousedown, mousemove, keydown, scroll, touchstart).
    pub fn is_activity(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerMove { .. } | InputEvent::PointerDown { .. } | InputEvent::Activity
        )
    }
}

/// A queue of input events.
/// The host pushes events as they happen; the app drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0, touch: false });
        q.push(InputEvent::Input);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn activity_classification() {
        assert!(InputEvent::Activity.is_activity());
        assert!(InputEvent::PointerMove { x: 0.0, y: 0.0, touch: true }.is_activity());
        assert!(!InputEvent::Input.is_activity());
        assert!(!InputEvent::Click { target: ClickTarget::BUTTON }.is_activity());
    }
}
