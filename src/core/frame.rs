use crate::core::geo::ScrollOffset;

/// Work due at the start of the next render tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameUpdate {
    /// Scroll write-back scheduled by a zoom change
    DeferredWrite(ScrollOffset),
    /// Latest native scroll position reported by the hosting surface
    ScrollSample(ScrollOffset),
}

/// One-shot tasks for the next render tick.
///
/// Holds at most one deferred write and one scroll sample. Scheduling again
/// before the tick replaces the earlier value, so bursts coalesce and the
/// latest write wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameScheduler {
    deferred_write: Option<ScrollOffset>,
    scroll_sample: Option<ScrollOffset>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_write(&mut self, offset: ScrollOffset) {
        self.deferred_write = Some(offset);
    }

    /// Records a native scroll position. Returns `true` when this sample
    /// requested a new tick, `false` when it was folded into a pending one.
    pub fn schedule_scroll_sample(&mut self, offset: ScrollOffset) -> bool {
        self.scroll_sample.replace(offset).is_none()
    }

    pub fn pending_write(&self) -> Option<ScrollOffset> {
        self.deferred_write
    }

    pub fn has_pending(&self) -> bool {
        self.deferred_write.is_some() || self.scroll_sample.is_some()
    }

    /// Drops everything scheduled; the caller has written the scroll offset directly.
    pub fn clear(&mut self) {
        self.deferred_write = None;
        self.scroll_sample = None;
    }

    /// Takes the work for this tick. A deferred write supersedes any scroll
    /// sample taken before it landed.
    pub fn take_frame(&mut self) -> Option<FrameUpdate> {
        let sample = self.scroll_sample.take();
        match self.deferred_write.take() {
            Some(offset) => Some(FrameUpdate::DeferredWrite(offset)),
            None => sample.map(FrameUpdate::ScrollSample),
        }
    }
}
