use super::frame::FrameRgb;

/// Pool configuration for recycled output frames.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FramePoolOpts {
    /// Maximum number of idle frames kept for reuse.
    pub(crate) max_retained: usize,
}

impl Default for FramePoolOpts {
    fn default() -> Self {
        Self { max_retained: 8 }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct FramePoolStats {
    pub(crate) retained: usize,
    pub(crate) allocations: u64,
    pub(crate) dropped_on_release: u64,
}

/// Bounded allocator for canvas-sized frames.
///
/// Frames travel to the encoder thread and come back through a recycle channel, so the steady
/// state allocates nothing.
pub(crate) struct FramePool {
    width: u32,
    height: u32,
    opts: FramePoolOpts,
    stats: FramePoolStats,
    free: Vec<FrameRgb>,
}

impl FramePool {
    pub(crate) fn new(width: u32, height: u32, opts: FramePoolOpts) -> Self {
        Self {
            width,
            height,
            opts,
            stats: FramePoolStats::default(),
            free: Vec::new(),
        }
    }

    pub(crate) fn stats(&self) -> FramePoolStats {
        self.stats.clone()
    }

    pub(crate) fn borrow(&mut self) -> FrameRgb {
        if let Some(f) = self.free.pop() {
            self.stats.retained = self.stats.retained.saturating_sub(1);
            return f;
        }
        self.stats.allocations = self.stats.allocations.saturating_add(1);
        FrameRgb::new(self.width, self.height)
    }

    pub(crate) fn release(&mut self, frame: FrameRgb) {
        if frame.width != self.width
            || frame.height != self.height
            || self.free.len() >= self.opts.max_retained
        {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        self.free.push(frame);
        self.stats.retained = self.stats.retained.saturating_add(1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
