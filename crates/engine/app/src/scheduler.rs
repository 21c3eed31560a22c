/// Host hook for requesting the next display frame
///
/// A browser-style host maps this onto its animation-frame callback; the
/// headless testbed simply counts requests. The frame loop calls it exactly
/// once at the end of every frame, after drawing.
pub trait FrameScheduler {
    fn request_next_frame(&mut self);
}

