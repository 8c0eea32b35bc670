// src/picker/frame.rs
//! Frame scheduling seam. The browser implementation lives in `canvas.rs`;
//! tests drive frames by hand.

use super::swatch::SwatchId;

/// Schedules "run the pending work for this swatch on the next frame".
///
/// Dropping a handle must cancel the request. Holding at most one handle per
/// swatch is how moves get coalesced: replacing the handle cancels the
/// previous request before the new one can run.
pub trait FrameScheduler {
    type Handle;

    fn request_frame(&mut self, swatch: SwatchId) -> Self::Handle;
}

/// The single outstanding frame request of a swatch.
pub struct FrameToken<H> {
    handle: Option<H>,
}

impl<H> Default for FrameToken<H> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<H> FrameToken<H> {
    /// Cancels any previous request, then schedules a new one.
    pub fn replace<S>(&mut self, scheduler: &mut S, swatch: SwatchId)
    where
        S: FrameScheduler<Handle = H>,
    {
        self.handle = None;
        self.handle = Some(scheduler.request_frame(swatch));
    }

    /// Marks the request as fired without cancelling anything.
    pub fn fired(&mut self) {
        self.handle = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    /// Queue of requested frames; `fire` plays one frame.
    #[derive(Clone, Default)]
    pub struct ManualFrames {
        queue: Rc<RefCell<Vec<(SwatchId, Rc<Cell<bool>>)>>>,
        requested: Rc<Cell<u32>>,
    }

    pub struct ManualHandle(Rc<Cell<bool>>);

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    impl ManualFrames {
        /// Swatches whose request survived until this frame.
        pub fn fire(&self) -> Vec<SwatchId> {
            self.queue
                .borrow_mut()
                .drain(..)
                .filter(|(_, cancelled)| !cancelled.get())
                .map(|(id, _)| id)
                .collect()
        }

        pub fn live(&self) -> usize {
            self.queue
                .borrow()
                .iter()
                .filter(|(_, cancelled)| !cancelled.get())
                .count()
        }

        pub fn requested(&self) -> u32 {
            self.requested.get()
        }
    }

    impl FrameScheduler for ManualFrames {
        type Handle = ManualHandle;

        fn request_frame(&mut self, swatch: SwatchId) -> ManualHandle {
            let cancelled = Rc::new(Cell::new(false));
            self.requested.set(self.requested.get() + 1);
            self.queue.borrow_mut().push((swatch, Rc::clone(&cancelled)));
            ManualHandle(cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualFrames;
    use super::*;
    use crate::picker::swatch::SwatchSet;
    use crate::picker::{color::Rgb, geometry::Point};

    #[test]
    fn replacing_a_token_cancels_the_previous_request() {
        let mut frames = ManualFrames::default();
        let id = SwatchSet::new().insert(Point::default(), Rgb::BLACK);
        let mut token = FrameToken::default();
        for _ in 0..10 {
            token.replace(&mut frames, id);
        }
        assert_eq!(frames.requested(), 10);
        assert_eq!(frames.live(), 1);
        assert_eq!(frames.fire(), vec![id]);
    }

    #[test]
    fn dropping_the_token_drops_the_request() {
        let mut frames = ManualFrames::default();
        let id = SwatchSet::new().insert(Point::default(), Rgb::BLACK);
        let mut token = FrameToken::default();
        token.replace(&mut frames, id);
        assert!(token.is_pending());
        drop(token);
        assert!(frames.fire().is_empty());
    }
}
