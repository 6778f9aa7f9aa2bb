use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of samples kept for the sparkline.
pub const PANEL_HISTORY: usize = 74;

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Which panel the overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsMode {
    /// Frames per second, sampled once a second.
    #[default]
    Fps,
    /// Milliseconds per frame, sampled every frame.
    Ms,
}

impl StatsMode {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Fps),
            1 => Some(Self::Ms),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Fps => Self::Ms,
            Self::Ms => Self::Fps,
        }
    }
}

/// One counter: latest value, extremes and recent history.
#[derive(Debug, Clone)]
pub struct Panel {
    pub name: &'static str,
    /// Upper bound used to scale the sparkline.
    pub graph_max: f32,
    value: f32,
    min: f32,
    max: f32,
    history: VecDeque<f32>,
}

impl Panel {
    fn new(name: &'static str, graph_max: f32) -> Self {
        Self {
            name,
            graph_max,
            value: 0.0,
            min: f32::INFINITY,
            max: 0.0,
            history: VecDeque::with_capacity(PANEL_HISTORY),
        }
    }

    fn record(&mut self, value: f32) {
        self.value = value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        if self.history.len() == PANEL_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(value);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Smallest recorded value, or `None` before the first sample.
    pub fn min(&self) -> Option<f32> {
        (!self.history.is_empty()).then_some(self.min)
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Oldest sample first.
    pub fn history(&self) -> impl Iterator<Item = f32> + '_ {
        self.history.iter().copied()
    }

    pub fn sample_count(&self) -> usize {
        self.history.len()
    }

    /// Overlay text, e.g. `60 FPS (58-61)`.
    pub fn label(&self) -> String {
        match self.min() {
            Some(min) => format!(
                "{} {} ({}-{})",
                self.value.round(),
                self.name,
                min.round(),
                self.max.round()
            ),
            None => format!("-- {}", self.name),
        }
    }
}

/// Frame-rate counter driven once per rendered frame.
#[derive(Debug, Clone)]
pub struct FrameStats {
    mode: StatsMode,
    fps: Panel,
    ms: Panel,
    frames: u32,
    begin: Instant,
    window_start: Instant,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            mode: StatsMode::Fps,
            fps: Panel::new("FPS", 100.0),
            ms: Panel::new("MS", 200.0),
            frames: 0,
            begin: now,
            window_start: now,
        }
    }

    pub fn mode(&self) -> StatsMode {
        self.mode
    }

    /// Select a panel by index: 0 = FPS, 1 = MS. Other values are ignored.
    pub fn set_mode(&mut self, index: u32) {
        match StatsMode::from_index(index) {
            Some(mode) => self.mode = mode,
            None => tracing::warn!("unknown stats mode {index}, keeping {:?}", self.mode),
        }
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    /// Close the frame that started at the previous update.
    pub fn update(&mut self, now: Instant) {
        self.frames += 1;
        let frame_time = now.saturating_duration_since(self.begin);
        self.ms.record(frame_time.as_secs_f32() * 1000.0);

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= FPS_WINDOW {
            let fps = self.frames as f32 * 1000.0 / (elapsed.as_secs_f32() * 1000.0);
            self.fps.record(fps);
            self.window_start = now;
            self.frames = 0;
        }
        self.begin = now;
    }

    /// The panel for the current mode.
    pub fn panel(&self) -> &Panel {
        match self.mode {
            StatsMode::Fps => &self.fps,
            StatsMode::Ms => &self.ms,
        }
    }

    pub fn fps_panel(&self) -> &Panel {
        &self.fps
    }

    pub fn ms_panel(&self) -> &Panel {
        &self.ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stats: &mut FrameStats, start: Instant, frames: u32, dt: Duration) -> Instant {
        let mut now = start;
        for _ in 0..frames {
            now += dt;
            stats.update(now);
        }
        now
    }

    #[test]
    fn starts_in_fps_mode_without_samples() {
        let stats = FrameStats::new(Instant::now());
        assert_eq!(stats.mode(), StatsMode::Fps);
        assert_eq!(stats.panel().sample_count(), 0);
        assert_eq!(stats.panel().label(), "-- FPS");
    }

    #[test]
    fn sixty_frames_at_sixty_hz() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        run(&mut stats, start, 60, Duration::from_nanos(16_666_667));
        assert_eq!(stats.fps_panel().sample_count(), 1);
        assert!((stats.fps_panel().value() - 60.0).abs() < 0.01);
        assert_eq!(stats.ms_panel().sample_count(), 60);
        assert!((stats.ms_panel().value() - 16.67).abs() < 0.01);
    }

    #[test]
    fn fps_samples_once_per_second() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        let t = run(&mut stats, start, 59, Duration::from_nanos(16_666_667));
        assert_eq!(stats.fps_panel().sample_count(), 0);
        run(&mut stats, t, 300, Duration::from_millis(10));
        assert!(stats.fps_panel().sample_count() >= 2);
    }

    #[test]
    fn min_max_track_extremes() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        let t = run(&mut stats, start, 30, Duration::from_millis(33));
        run(&mut stats, t, 400, Duration::from_millis(5));
        let fps = stats.fps_panel();
        assert!(fps.min().unwrap() < 35.0);
        assert!(fps.max() > 150.0);
        assert!(stats.ms_panel().max() > 32.9);
    }

    #[test]
    fn history_is_bounded() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        run(&mut stats, start, 500, Duration::from_millis(2));
        assert_eq!(stats.ms_panel().sample_count(), PANEL_HISTORY);
        assert_eq!(stats.ms_panel().history().count(), PANEL_HISTORY);
    }

    #[test]
    fn set_mode_selects_panel() {
        let mut stats = FrameStats::new(Instant::now());
        stats.set_mode(1);
        assert_eq!(stats.mode(), StatsMode::Ms);
        assert_eq!(stats.panel().name, "MS");
        stats.set_mode(7);
        assert_eq!(stats.mode(), StatsMode::Ms);
        stats.set_mode(0);
        assert_eq!(stats.mode(), StatsMode::Fps);
        stats.cycle_mode();
        assert_eq!(stats.mode(), StatsMode::Ms);
    }

    #[test]
    fn label_rounds_values() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        run(&mut stats, start, 60, Duration::from_nanos(16_666_667));
        assert_eq!(stats.panel().label(), "60 FPS (60-60)");
    }
}
