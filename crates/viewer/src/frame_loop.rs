//! Start/stop lifecycle for the redraw loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Counts frames and decides whether another one should run.
///
/// The loop is stopped through [`FrameLoop::stop`] or any [`LoopHandle`],
/// which may live on another thread.
#[derive(Debug)]
pub struct FrameLoop {
    running: Arc<AtomicBool>,
    frames: u64,
    max_frames: Option<u64>,
}

/// Cloneable stop switch for a [`FrameLoop`].
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl FrameLoop {
    /// A stopped loop. `max_frames` stops it after that many frames.
    pub fn new(max_frames: Option<u64>) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            frames: 0,
            max_frames,
        }
    }

    pub fn start(&mut self) {
        if self.max_frames == Some(0) {
            return;
        }
        self.running.store(true, Ordering::Release);
        tracing::debug!(max_frames = ?self.max_frames, "frame loop started");
    }

    pub fn stop(&mut self) {
        if self.running.swap(false, Ordering::AcqRel) {
            tracing::debug!(frames = self.frames, "frame loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Frames completed since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn max_frames(&self) -> Option<u64> {
        self.max_frames
    }

    pub fn set_max_frames(&mut self, max_frames: Option<u64>) {
        self.max_frames = max_frames;
    }

    /// Record a finished frame. Returns whether the loop keeps running.
    pub fn tick(&mut self) -> bool {
        self.frames += 1;
        if self.max_frames.is_some_and(|max| self.frames >= max) {
            self.stop();
        }
        self.is_running()
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped() {
        let frame_loop = FrameLoop::default();
        assert!(!frame_loop.is_running());
        assert_eq!(frame_loop.frames(), 0);
    }

    #[test]
    fn max_frames_stops_after_exactly_n() {
        let mut frame_loop = FrameLoop::new(Some(3));
        frame_loop.start();
        let mut ran = 0;
        while frame_loop.is_running() {
            ran += 1;
            frame_loop.tick();
        }
        assert_eq!(ran, 3);
        assert_eq!(frame_loop.frames(), 3);
    }

    #[test]
    fn zero_max_frames_never_starts() {
        let mut frame_loop = FrameLoop::new(Some(0));
        frame_loop.start();
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn handle_stops_loop_from_another_thread() {
        let mut frame_loop = FrameLoop::default();
        frame_loop.start();
        let handle = frame_loop.handle();
        std::thread::spawn(move || handle.stop()).join().unwrap();
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.tick());
    }

    #[test]
    fn cloned_handles_share_state() {
        let mut frame_loop = FrameLoop::default();
        let a = frame_loop.handle();
        let b = a.clone();
        frame_loop.start();
        assert!(b.is_running());
        a.stop();
        assert!(!b.is_running());
    }

    #[test]
    fn restart_after_stop() {
        let mut frame_loop = FrameLoop::default();
        frame_loop.start();
        frame_loop.stop();
        frame_loop.start();
        assert!(frame_loop.is_running());
    }
}
