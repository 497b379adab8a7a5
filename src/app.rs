use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::event::{self, AppEvent};
use crate::launch::{self, Launch};
use crate::metrics::history::HistoryStore;
use crate::metrics::{now_micros, SampleSource};
use crate::settings::{clamp_size, Settings};
use crate::ui::palette::Palette;
use crate::ui::waterfall::ScrollingRenderer;
use crate::update::{TickOutcome, UpdateCycle, UpdateRate};

const SIZE_STEP: i64 = 10;

pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub hostname: String,
    pub core_count: usize,
    pub size: u32,
    pub palette: Palette,
    pub history: HistoryStore,
    pub renderer: ScrollingRenderer,
    pub cycle: UpdateCycle,
    pub load_avg: Option<[f64; 3]>,
    pub command: String,
    pub command_in_terminal: bool,
    /// Set by the launch key, run by the event loop once the frame is done.
    pub pending_launch: Option<Launch>,
    source: Box<dyn SampleSource>,
    settings_path: Option<PathBuf>,
}

impl App {
    pub fn new(
        settings: Settings,
        source: Box<dyn SampleSource>,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let core_count = source.core_count();
        // aggregate pseudo-core plus one buffer per real core
        let tracked = if core_count == 0 { 0 } else { core_count + 1 };

        let mut app = Self {
            running: true,
            show_help: false,
            hostname,
            core_count,
            size: settings.size,
            palette: settings.palette(),
            history: HistoryStore::new(tracked),
            renderer: ScrollingRenderer::new(settings.has_average, settings.band_edges),
            cycle: UpdateCycle::new(settings.update_interval, settings.mode),
            load_avg: None,
            command: settings.command,
            command_in_terminal: settings.command_in_terminal,
            pending_launch: None,
            source,
            settings_path,
        };
        app.resize_history();
        app
    }

    pub fn settings(&self) -> Settings {
        Settings {
            update_interval: self.cycle.rate,
            size: self.size,
            mode: self.cycle.mode,
            background: self.palette.background,
            foreground1: self.palette.foreground1,
            foreground2: self.palette.foreground2,
            has_average: self.renderer.show_average(),
            band_edges: self.renderer.band_edges(),
            ramp: self.palette.ramp,
            command: self.command.clone(),
            command_in_terminal: self.command_in_terminal,
        }
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        let idle_timeout = Duration::from_millis(250);

        while self.running {
            let size = terminal.size()?;
            self.sync_surface(Rect::new(0, 0, size.width, size.height));

            let now = Instant::now();
            if self.cycle.is_due(now) {
                self.tick(now);
                if let Some(d) = self.renderer.take_damage() {
                    log::trace!("repainted {}x{} at ({}, {})", d.width, d.height, d.x, d.y);
                }
            }

            terminal.draw(|frame| crate::ui::render(frame, self))?;

            let timeout = self
                .cycle
                .time_until_due(Instant::now())
                .min(idle_timeout);
            match event::poll_event(timeout)? {
                AppEvent::Key(key) => self.handle_key(key),
                AppEvent::Resize(w, h) => {
                    log::debug!("terminal resized to {w}x{h}");
                    self.sync_surface(Rect::new(0, 0, w, h));
                }
                AppEvent::Tick => {}
            }

            if let Some(launch) = self.pending_launch.take() {
                self.dispatch_launch(terminal, &launch);
            }
        }

        self.save_settings();
        Ok(())
    }

    /// Runs a launch command. A foreground command gets the terminal: the UI
    /// is torn down around it and brought back afterwards.
    fn dispatch_launch(&mut self, terminal: &mut ratatui::DefaultTerminal, launch: &Launch) {
        if !launch.in_terminal {
            match launch::spawn_detached(launch) {
                Ok(()) => log::info!("started `{}` in the background", launch.command),
                Err(e) => log::warn!("{e}"),
            }
            return;
        }

        ratatui::restore();
        match launch::run_foreground(launch) {
            Ok(status) => log::info!("`{}` exited with {status}", launch.command),
            Err(e) => log::warn!("{e}"),
        }
        *terminal = ratatui::init();
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let outcome = self.cycle.tick(
            now,
            now_micros(),
            self.source.as_mut(),
            &mut self.history,
            &mut self.renderer,
            &self.palette,
        );
        self.load_avg = self.source.load_average();
        outcome
    }

    /// Matches the surface to the waterfall panel inside `area`, replaying
    /// history into it when it had to be rebuilt.
    pub fn sync_surface(&mut self, area: Rect) {
        let view = crate::ui::waterfall_view_area(area, self.size);
        let width = view.width as usize;
        // two pixel rows per terminal cell
        let height = view.height as usize * 2;
        if self.renderer.ensure_surface(width, height, &self.palette) {
            self.renderer.backfill(&self.history, &self.palette);
        }
    }

    fn resize_history(&mut self) {
        self.history.resize(
            self.size as usize,
            UpdateRate::FASTEST.interval_ms(),
            UpdateRate::SLOWEST.interval_ms(),
        );
    }

    /// Latest aggregate load, as the plugin tooltip showed it.
    pub fn usage_percent(&self) -> Option<u32> {
        if self.history.filled() == 0 {
            return None;
        }
        let sample = self.history.latest(0).ok()?;
        Some((sample.value * 100.0).round() as u32)
    }

    fn set_size(&mut self, size: i64) {
        let size = clamp_size(size);
        if size != self.size {
            self.size = size;
            self.resize_history();
        }
    }

    fn set_rate(&mut self, rate: UpdateRate) {
        if rate != self.cycle.rate {
            log::info!("update interval now {}ms", rate.interval_ms());
            self.cycle.rate = rate;
            self.resize_history();
        }
    }

    /// Forces a full rebuild from history on the next sync, for changes that
    /// alter columns already on screen.
    fn repaint_all(&mut self) {
        self.renderer.invalidate();
    }

    fn save_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        match self.settings().save(path) {
            Ok(()) => log::info!("settings saved to {}", path.display()),
            Err(e) => log::warn!("could not save settings to {}: {e}", path.display()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Enter => {
                let launch = launch::resolve(&self.command, self.command_in_terminal);
                log::debug!("launch requested: {launch:?}");
                self.pending_launch = Some(launch);
            }

            // Cadence
            KeyCode::Char('+') | KeyCode::Char('=') => self.set_rate(self.cycle.rate.faster()),
            KeyCode::Char('-') => self.set_rate(self.cycle.rate.slower()),

            // History length
            KeyCode::Char('[') => self.set_size(i64::from(self.size) - SIZE_STEP),
            KeyCode::Char(']') => self.set_size(i64::from(self.size) + SIZE_STEP),

            KeyCode::Char('a') => {
                let show = !self.renderer.show_average();
                self.renderer.set_show_average(show);
                self.repaint_all();
            }
            KeyCode::Char('e') => {
                let edges = !self.renderer.band_edges();
                self.renderer.set_band_edges(edges);
                self.repaint_all();
            }
            KeyCode::Char('r') => {
                self.palette.ramp = self.palette.ramp.toggle();
                self.repaint_all();
            }
            KeyCode::Char('m') => {
                self.cycle.mode = self.cycle.mode.toggle();
                log::info!("mode now {:?}", self.cycle.mode);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::SampleError;
    use crate::update::Mode;

    struct Constant(usize, f32);

    impl SampleSource for Constant {
        fn core_count(&self) -> usize {
            self.0
        }

        fn sample_all_cores(&mut self, _now_us: i64) -> Result<Vec<f32>, SampleError> {
            Ok(vec![self.1; self.0 + 1])
        }
    }

    fn app(cores: usize) -> App {
        App::new(Settings::default(), Box::new(Constant(cores, 0.75)), None)
    }

    fn press(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    #[test]
    fn history_is_sized_for_the_slowest_cadence() {
        let app = app(4);
        assert_eq!(app.history.core_count(), 5);
        assert!(app.history.capacity().is_power_of_two());
        assert!(app.history.capacity() >= 256 * 20);
        assert_eq!(app.history.visible_len(), 120);
    }

    #[test]
    fn zero_cores_disables_history() {
        let mut app = app(0);
        assert!(!app.history.is_enabled());
        app.sync_surface(Rect::new(0, 0, 80, 24));
        assert_eq!(app.tick(Instant::now()), TickOutcome::NoCores);
        assert_eq!(app.renderer.cursor_x(), 0);
        assert_eq!(app.usage_percent(), None);
    }

    #[test]
    fn tick_feeds_history_and_renderer() {
        let mut app = app(2);
        app.sync_surface(Rect::new(0, 0, 80, 24));
        assert!(app.renderer.size().is_some());
        assert_eq!(app.tick(Instant::now()), TickOutcome::Painted);
        assert_eq!(app.history.filled(), 1);
        assert_eq!(app.renderer.cursor_x(), 1);
        assert_eq!(app.usage_percent(), Some(75));
    }

    #[test]
    fn keys_adjust_settings() {
        let mut app = app(2);
        press(&mut app, '-');
        assert_eq!(app.cycle.rate, UpdateRate::Rate500ms);
        press(&mut app, '+');
        press(&mut app, '+');
        press(&mut app, '+');
        assert_eq!(app.cycle.rate, UpdateRate::Rate100ms);

        press(&mut app, ']');
        assert_eq!(app.size, 130);
        assert_eq!(app.history.visible_len(), 130);
        for _ in 0..30 {
            press(&mut app, '[');
        }
        assert_eq!(app.size, 10);

        press(&mut app, 'm');
        assert_eq!(app.cycle.mode, Mode::Disabled);
        press(&mut app, 'q');
        assert!(!app.running);
    }

    #[test]
    fn layout_toggles_rebuild_from_history() {
        let mut app = app(2);
        let area = Rect::new(0, 0, 80, 24);
        app.sync_surface(area);
        for _ in 0..3 {
            app.tick(Instant::now());
        }
        assert_eq!(app.renderer.cursor_x(), 3);

        press(&mut app, 'a');
        assert!(!app.settings().has_average);
        assert_eq!(app.renderer.size(), None);
        app.sync_surface(area);
        // the three retained ticks are replayed
        assert_eq!(app.renderer.cursor_x(), 3);
    }

    #[test]
    fn enter_queues_the_configured_command() {
        let settings = Settings {
            command: "btop".to_string(),
            command_in_terminal: false,
            ..Settings::default()
        };
        let mut app = App::new(settings, Box::new(Constant(2, 0.5)), None);
        assert_eq!(app.pending_launch, None);

        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(
            app.pending_launch,
            Some(Launch {
                command: "btop".to_string(),
                in_terminal: false
            })
        );
        assert!(app.running);
        assert_eq!(app.settings().command, "btop");
    }

    #[test]
    fn enter_without_a_command_queues_a_task_manager() {
        let mut app = app(2);
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        let launch = app.pending_launch.take().unwrap();
        assert!(launch.command == "htop" || launch.command == "top");
        assert!(launch.in_terminal);
    }

    #[test]
    fn help_swallows_the_next_key() {
        let mut app = app(1);
        press(&mut app, '?');
        assert!(app.show_help);
        press(&mut app, 'q');
        assert!(!app.show_help);
        assert!(app.running);
    }
}
