use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::WrapErr;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glyphfall_config::Settings;
use glyphfall_core::ConfigError;
use glyphfall_engine::{AnimationDriver, BufferSurface, GlyphSet};
use ratatui::{DefaultTerminal, Frame, layout::Rect};
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

mod logging;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let log_path = logging::init();

    let settings_path = Settings::default_path()?;
    let settings = Settings::load_from(&settings_path).wrap_err("failed to load settings")?;
    let app = App::new(settings, settings_path).wrap_err("invalid settings")?;
    info!(log = ?log_path, "starting glyphfall");

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    info!("glyphfall stopped");
    result
}

/// Build a driver from the current settings.
fn build_driver(settings: &Settings) -> Result<AnimationDriver, ConfigError> {
    let config = settings.to_render_config()?;
    match settings.seed {
        Some(seed) => AnimationDriver::seeded(config, seed),
        None => AnimationDriver::from_entropy(config),
    }
}

/// Terminal cells taken by the widest glyph of the set.
fn glyph_cell_width(glyphs: &GlyphSet) -> u16 {
    glyphs
        .iter()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(1)
        .clamp(1, u16::MAX as usize) as u16
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Current settings; the driver is rebuilt whenever they change.
    settings: Settings,
    /// Where changed settings are saved on exit.
    settings_path: PathBuf,
    /// Settings differ from what is on disk.
    settings_dirty: bool,
    /// The rain.
    driver: AnimationDriver,
    /// Terminal cells per glyph column.
    cell_width: u16,
    /// Area the grid was last sized for.
    last_area: Option<Rect>,
    /// When the previous tick ran.
    last_tick: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(settings: Settings, settings_path: PathBuf) -> Result<Self, ConfigError> {
        let driver = build_driver(&settings)?;
        let cell_width = glyph_cell_width(driver.glyphs().set());
        Ok(Self {
            running: false,
            settings,
            settings_path,
            settings_dirty: false,
            driver,
            cell_width,
            last_area: None,
            last_tick: Instant::now(),
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            let interval = self.driver.config().tick_interval;
            let since_tick = self.last_tick.elapsed();
            if since_tick >= interval {
                self.last_tick = Instant::now();
                terminal.draw(|frame| self.render(frame, since_tick))?;
            }
            let timeout = interval.saturating_sub(self.last_tick.elapsed());
            self.handle_crossterm_events(timeout)?;
        }
        self.save_settings();
        Ok(())
    }

    /// Advance the rain one tick and draw it.
    fn render(&mut self, frame: &mut Frame, elapsed: Duration) {
        let area = frame.area();
        if self.last_area != Some(area) {
            self.resize(area);
        }
        let mut surface = BufferSurface::new(frame.buffer_mut(), area, self.cell_width);
        self.driver.tick(elapsed, &mut surface);
    }

    /// Size the grid for `area`. Each terminal row is one glyph tall.
    fn resize(&mut self, area: Rect) {
        if let Err(err) = self.driver.resize(
            f64::from(area.width),
            f64::from(area.height),
            f64::from(self.cell_width),
            1.0,
        ) {
            warn!(%err, "resize failed");
        }
        self.last_area = Some(area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most `timeout` so the next tick is not delayed.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key)?,
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized");
                    self.last_area = None;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('r')) => self.driver.reset_columns(),
            (_, KeyCode::Char('c')) => self.cycle_color_theme()?,
            (_, KeyCode::Char('s')) => self.cycle_speed()?,
            _ => {}
        }
        Ok(())
    }

    /// Cycle through available color themes.
    fn cycle_color_theme(&mut self) -> Result<(), ConfigError> {
        self.settings.theme = self.settings.theme.next();
        debug!(theme = self.settings.theme.name(), "theme changed");
        self.rebuild()
    }

    /// Cycle through animation speeds.
    fn cycle_speed(&mut self) -> Result<(), ConfigError> {
        self.settings.speed = self.settings.speed.next();
        debug!(speed = self.settings.speed.name(), "speed changed");
        self.rebuild()
    }

    /// The render config is immutable, so a settings change means a new driver.
    fn rebuild(&mut self) -> Result<(), ConfigError> {
        self.driver = build_driver(&self.settings)?;
        self.settings_dirty = true;
        self.last_area = None;
        Ok(())
    }

    /// Persist changed settings; failures are logged, not fatal.
    fn save_settings(&mut self) {
        if !self.settings_dirty {
            return;
        }
        match self.settings.save_to(&self.settings_path) {
            Ok(()) => {
                self.settings_dirty = false;
                debug!(path = %self.settings_path.display(), "settings saved");
            }
            Err(err) => warn!(%err, "failed to save settings"),
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfall_core::{AnimationSpeed, ColorTheme};
    use glyphfall_engine::Charset;
    use ratatui::buffer::Buffer;

    fn app() -> App {
        let settings = Settings {
            seed: Some(9),
            ..Default::default()
        };
        App::new(settings, std::env::temp_dir().join("glyphfall-test.toml")).unwrap()
    }

    #[test]
    fn test_cell_width_follows_glyphs() {
        assert_eq!(glyph_cell_width(&Charset::Katakana.glyph_set()), 2);
        assert_eq!(glyph_cell_width(&Charset::Binary.glyph_set()), 1);
    }

    #[test]
    fn test_keys_cycle_settings() {
        let mut app = app();
        app.on_key_event(KeyEvent::from(KeyCode::Char('c'))).unwrap();
        assert_eq!(app.settings.theme, ColorTheme::Cyan);
        assert_eq!(app.driver.config().head_color, ColorTheme::Cyan.head_color());
        app.on_key_event(KeyEvent::from(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.settings.speed, AnimationSpeed::Fast);
        assert_eq!(
            app.driver.config().tick_interval,
            AnimationSpeed::Fast.tick_interval()
        );
        assert!(app.settings_dirty);
        assert_eq!(app.last_area, None);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.running = true;
        app.on_key_event(KeyEvent::from(KeyCode::Char('q'))).unwrap();
        assert!(!app.running);

        app.running = true;
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_resize_sizes_grid_in_glyph_cells() {
        let mut app = app();
        app.resize(Rect::new(0, 0, 81, 20));
        assert_eq!(app.driver.columns().len(), 40);
        assert_eq!(app.driver.rows(), 20);
    }

    #[test]
    fn test_ticks_draw_into_buffer() {
        let mut app = app();
        let area = Rect::new(0, 0, 20, 6);
        app.resize(area);
        let mut buffer = Buffer::empty(area);
        for _ in 0..40 {
            let mut surface = BufferSurface::new(&mut buffer, area, app.cell_width);
            app.driver.tick(Duration::from_millis(50), &mut surface);
        }
        assert!(buffer.content().iter().any(|cell| cell.symbol() != " "));
    }
}
