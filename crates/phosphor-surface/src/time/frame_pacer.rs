use std::thread;
use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken when the frame started.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame cadence for a render loop.
///
/// With a target rate, `wait` sleeps until the next frame slot. Slots are laid
/// out on a fixed grid from the first frame; a loop that falls behind resyncs
/// instead of bursting to catch up.
///
/// Delta time is clamped so a stalled worker (debugger, hidden window, a long
/// compose on the UI side) does not hand the draw code a huge step.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    last: Option<Instant>,
    next_slot: Option<Instant>,
    frame_index: u64,
    dt_max: Duration,
}

impl FramePacer {
    /// Paces to `target_fps` frames per second; `None` or `Some(0)` runs unpaced.
    pub fn new(target_fps: Option<u32>) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));

        Self {
            interval,
            last: None,
            next_slot: None,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    /// A pacer that never sleeps.
    pub fn unpaced() -> Self {
        Self::new(None)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Sleeps until the next frame slot, then returns the frame's timing.
    pub fn wait(&mut self) -> FrameTime {
        if let (Some(interval), Some(slot)) = (self.interval, self.next_slot) {
            let now = Instant::now();
            if slot > now {
                thread::sleep(slot - now);
            }
            let after = Instant::now();
            let next = slot + interval;
            self.next_slot = Some(if after > next { after + interval } else { next });
        } else if let Some(interval) = self.interval {
            self.next_slot = Some(Instant::now() + interval);
        }

        self.tick()
    }

    /// Advances the frame counter without sleeping.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).min(self.dt_max),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::unpaced()
    }
}
