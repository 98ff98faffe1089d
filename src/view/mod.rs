//! Terminal shell: event loop, key input and terminal setup (impure).
//!
//! The loop is generic over its renderer, key source and provider so it can
//! be driven entirely from tests.

pub mod constants;
pub mod frame;
pub mod render;
pub mod styles;

pub use frame::{project, FrameDescription, Pane, Row, RowStyle};
pub use render::{render_frame, Renderer, TerminalRenderer};
pub use styles::{ColorConfig, Palette};

use crate::config::KeyBindings;
use crate::model::{NavKey, ProviderError};
use crate::provider::{Catalog, ContentProvider};
use crate::state::{page_size_for, Dispatch, Navigator, PagerTone, ResizeAdapter};
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that end the navigator.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Provider failure outside any view (initial listing)
    #[error("Catalog error: {0}")]
    Provider(#[from] ProviderError),
}

/// Input side of the event loop.
pub trait KeySource {
    /// Next navigator key, or `None` when nothing arrived this tick.
    fn poll_key(&mut self) -> Result<Option<NavKey>, TuiError>;

    /// Block until any key is pressed.
    fn wait_for_any_key(&mut self) -> Result<(), TuiError>;
}

/// Keys read from the real terminal.
#[derive(Debug, Clone)]
pub struct CrosstermKeys {
    bindings: KeyBindings,
    timeout: Duration,
}

impl CrosstermKeys {
    /// `timeout` bounds how long one poll waits for input.
    pub fn new(bindings: KeyBindings, timeout: Duration) -> Self {
        Self { bindings, timeout }
    }
}

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self) -> Result<Option<NavKey>, TuiError> {
        if !event::poll(self.timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => {
                let resolved = self.bindings.resolve(&key);
                if resolved.is_none() {
                    debug!(?key, "unbound key ignored");
                }
                Ok(resolved)
            }
            // Resize is picked up from the viewport on the next iteration
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn wait_for_any_key(&mut self) -> Result<(), TuiError> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }
}

/// Startup settings for one navigator session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Filter passed to the catalog for the top-level listing.
    pub filter: Option<String>,
    /// Collapse module families while the filter is empty.
    pub group_families: bool,
    /// Longest wait for a key before the loop redraws.
    pub poll_interval: Duration,
    /// Colour setting for the palette.
    pub colors: ColorConfig,
    /// Key table for the terminal.
    pub bindings: KeyBindings,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            filter: None,
            group_families: false,
            poll_interval: Duration::from_millis(30),
            colors: ColorConfig::default(),
            bindings: KeyBindings::default(),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user quit.
    Finished,
    /// The catalog had nothing matching; no UI was shown.
    NotFound,
}

/// Main navigator application.
pub struct TuiApp<R, K, P>
where
    R: Renderer,
    K: KeySource,
    P: Catalog + ContentProvider,
{
    renderer: R,
    keys: K,
    provider: P,
    navigator: Navigator,
    resize: ResizeAdapter,
    filter: Option<String>,
}

impl<R, K, P> TuiApp<R, K, P>
where
    R: Renderer,
    K: KeySource,
    P: Catalog + ContentProvider,
{
    /// Build the app over an already fetched entry list.
    pub fn new(
        mut renderer: R,
        keys: K,
        provider: P,
        entries: Vec<crate::model::Entry>,
        options: &SessionOptions,
    ) -> Result<Self, TuiError> {
        let rows = renderer.viewport_rows()?;
        let mut navigator = Navigator::new(entries, page_size_for(rows), options.group_families);
        let mut resize = ResizeAdapter::new();
        resize.apply(rows, &mut navigator);
        Ok(Self {
            renderer,
            keys,
            provider,
            navigator,
            resize,
            filter: options.filter.clone(),
        })
    }

    /// Navigator state.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The key source.
    pub fn keys(&self) -> &K {
        &self.keys
    }

    /// The catalog provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run until the user quits.
    ///
    /// On an unexpected error a fault frame is shown and one key press is
    /// awaited before the error is returned.
    pub fn run(&mut self) -> Result<(), TuiError> {
        let result = self.event_loop();
        if let Err(err) = &result {
            error!(error = %err, "navigator stopped");
            match self.renderer.draw(&FrameDescription::fault(err.to_string())) {
                Ok(()) => {
                    if let Err(ack) = self.keys.wait_for_any_key() {
                        warn!(error = %ack, "could not wait for acknowledgment");
                    }
                }
                Err(draw) => warn!(error = %draw, "could not draw fault screen"),
            }
        }
        result
    }

    fn event_loop(&mut self) -> Result<(), TuiError> {
        loop {
            let rows = self.renderer.viewport_rows()?;
            if self.resize.apply(rows, &mut self.navigator) {
                debug!(rows, page_size = self.navigator.page_size(), "page size changed");
            }

            self.renderer.draw(&project(&self.navigator))?;

            // The placeholder frame is on screen; now do the slow fetch
            if self.navigator.has_pending_fetch() {
                self.navigator.resolve_pending(&self.provider);
                continue;
            }

            let Some(key) = self.keys.poll_key()? else {
                continue;
            };
            match self.navigator.handle_key(key, &self.provider) {
                Dispatch::Continue => {}
                Dispatch::Refresh => self.refresh(),
                Dispatch::Quit => {
                    info!("navigator closed by user");
                    return Ok(());
                }
            }
        }
    }

    /// Re-list top-level entries with the startup filter.
    fn refresh(&mut self) {
        match self.provider.list_entries(self.filter.as_deref()) {
            Ok(entries) => {
                let count = entries.len();
                self.navigator.reload_entries(entries);
                self.navigator
                    .set_status(format!("Refreshed: {count} modules"), PagerTone::Notice);
            }
            Err(err) => {
                warn!(error = %err, "refresh failed");
                self.navigator
                    .set_status(format!("Refresh failed: {err}"), PagerTone::Error);
            }
        }
    }
}

/// List the catalog and run the navigator in the real terminal.
///
/// Returns [`RunOutcome::NotFound`] without touching the terminal when the
/// listing is empty.
pub fn run<P>(provider: P, options: SessionOptions) -> Result<RunOutcome, TuiError>
where
    P: Catalog + ContentProvider,
{
    let entries = provider.list_entries(options.filter.as_deref())?;
    if entries.is_empty() {
        info!(filter = ?options.filter, "no modules found");
        return Ok(RunOutcome::NotFound);
    }
    info!(count = entries.len(), "starting navigator");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = stdout.execute(EnterAlternateScreen) {
        restore_terminal()?;
        return Err(err.into());
    }

    let result = (|| -> Result<(), TuiError> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let renderer = TerminalRenderer::new(terminal, Palette::new(options.colors));
        let keys = CrosstermKeys::new(options.bindings.clone(), options.poll_interval);
        let mut app = TuiApp::new(renderer, keys, provider, entries, &options)?;
        app.run()
    })();

    // Always restore terminal state
    restore_terminal()?;

    result.map(|()| RunOutcome::Finished)
}

/// Leave raw mode and the alternate screen.
pub fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
