//! Application module
//!
//! Contains the main application loop, key handling, and the worker threads
//! that talk to the external APIs.
//!
//! # Module Structure
//! - `state` - Application state types (AppState)
//! - Main module - App struct and event loop

mod state;

pub use state::{pending_checks, AppState};

use crate::api::{ApiResult, BandStatistics, VisualizationApi};
use crate::components::keybindings::KeybindingContext;
use crate::config_file::WizardConfig;
use crate::error::{Result, WizardError};
use crate::input::InputResult;
use crate::logic::recommend_from_report;
use crate::stats::fetch_preview_statistics;
use crate::ui::UiRenderer;
use crate::validation::{ValidationEvent, ValidationReport, ValidationRunner};
use crate::wizard::WizardStep;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Messages sent from worker threads to the main UI thread.
///
/// Each carries the generation it was started under; results from an older
/// generation are dropped.
#[derive(Debug)]
pub enum WorkerMessage {
    /// A check started or finished
    Progress { generation: u64, event: ValidationEvent },
    /// The validation run completed
    ValidationFinished { generation: u64, report: ValidationReport },
    /// The statistics preview request completed
    Statistics {
        generation: u64,
        result: ApiResult<Option<BandStatistics>>,
    },
}

/// Main application struct
pub struct App {
    state: Arc<Mutex<AppState>>,
    config: WizardConfig,
    api: Arc<dyn VisualizationApi>,
    ui_renderer: UiRenderer,
    /// Keybinding context for navigation hints
    keybinding_context: KeybindingContext,
    /// Channel sender for worker output (cloned to threads)
    worker_tx: Sender<WorkerMessage>,
    /// Channel receiver for worker output (polled in main loop)
    worker_rx: Receiver<WorkerMessage>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: WizardConfig, api: Arc<dyn VisualizationApi>) -> Self {
        info!("Creating new App instance");
        let (worker_tx, worker_rx) = mpsc::channel();

        Self {
            state: Arc::new(Mutex::new(AppState::default())),
            config,
            api,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
            worker_tx,
            worker_rx,
        }
    }

    /// Create an instance with the input field pre-filled
    pub fn with_input(config: WizardConfig, api: Arc<dyn VisualizationApi>, input: &str) -> Self {
        let app = Self::new(config, api);
        if let Ok(mut state) = app.lock_state() {
            state.input.set_value(input);
        }
        app
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, AppState>> {
        self.state
            .lock()
            .map_err(|e| WizardError::state(format!("Mutex poisoned: {}", e)))
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Result<AppState> {
        Ok(self.lock_state()?.clone())
    }

    pub fn keybinding_context(&self) -> &KeybindingContext {
        &self.keybinding_context
    }

    /// Whether a worker thread is still running
    pub fn is_busy(&self) -> Result<bool> {
        let state = self.lock_state()?;
        Ok(state.validating || state.loading_statistics)
    }

    /// Toggle help overlay visibility
    pub fn toggle_help(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        state.help_visible = !state.help_visible;
        Ok(())
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            self.poll_worker_messages()?;

            if crossterm::event::poll(Duration::from_millis(50))? {
                match crossterm::event::read()? {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        if self.handle_key_event(key_event)? {
                            break;
                        }
                    }
                    Event::Paste(text) => self.handle_paste(&text)?,
                    _ => {}
                }
            }

            let state = self.lock_state()?;
            terminal
                .draw(|f| {
                    self.ui_renderer
                        .render_with_context(f, &state, &self.keybinding_context)
                })
                .map_err(|e| WizardError::terminal(e.to_string()))?;
        }

        info!("Main loop finished");
        Ok(())
    }

    /// Drain pending worker messages without blocking
    pub fn poll_worker_messages(&mut self) -> Result<()> {
        while let Ok(msg) = self.worker_rx.try_recv() {
            let mut state = self.lock_state()?;

            match msg {
                WorkerMessage::Progress { generation, event } => {
                    if generation == state.generation {
                        state.apply_event(&event);
                    }
                }
                WorkerMessage::ValidationFinished { generation, report } => {
                    if generation != state.generation {
                        debug!("Dropping stale validation report (generation {})", generation);
                        continue;
                    }
                    state.validating = false;
                    state.checks = report.results.clone();
                    state.status_message = match report.fatal_failure() {
                        Some(failure) => format!(
                            "Validation failed at '{}'. Press b to edit the input or r to retry",
                            failure.check.title()
                        ),
                        None => {
                            let summary = report.summary();
                            format!(
                                "Validation complete: {} passed, {} warnings. Press Enter to continue",
                                summary.passed, summary.warnings
                            )
                        }
                    };
                    if let Err(e) = state.session.set_report(report) {
                        warn!("Could not store validation report: {}", e);
                    }
                }
                WorkerMessage::Statistics { generation, result } => {
                    if generation != state.generation {
                        continue;
                    }
                    state.loading_statistics = false;
                    match result {
                        Ok(Some(stats)) => {
                            if let Err(e) = state.session.set_statistics(stats) {
                                warn!("Could not store statistics: {}", e);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Statistics preview failed: {}", e);
                            state.statistics_error = Some(e.to_string());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Handle keyboard input events. Returns `true` when the app should exit.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            info!("Quit requested (Ctrl+C)");
            return Ok(true);
        }

        let (step, help_visible, typing) = {
            let state = self.lock_state()?;
            (state.step(), state.help_visible, state.is_typing())
        };

        // Help overlay - ? or Esc dismisses it
        if help_visible {
            if matches!(key_event.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::F(1)) {
                self.toggle_help()?;
            }
            return Ok(false);
        }

        if key_event.code == KeyCode::F(1) || (!typing && key_event.code == KeyCode::Char('?')) {
            self.toggle_help()?;
            return Ok(false);
        }

        if !typing && matches!(key_event.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
            info!("Quit requested");
            return Ok(true);
        }

        match step {
            WizardStep::Input => self.handle_input_key(key_event)?,
            WizardStep::Validate => self.handle_validate_key(key_event)?,
            WizardStep::Recommend => self.handle_recommend_key(key_event)?,
            WizardStep::Done => self.handle_done_key(key_event)?,
        }
        Ok(false)
    }

    fn handle_paste(&mut self, text: &str) -> Result<()> {
        let mut state = self.lock_state()?;
        if state.is_typing() {
            let line = text.lines().next().unwrap_or_default().trim();
            state.input.insert_str(line);
        }
        Ok(())
    }

    fn handle_input_key(&mut self, key_event: KeyEvent) -> Result<()> {
        let result = self.lock_state()?.input.handle_key(key_event);
        match result {
            InputResult::Confirm(value) => self.submit_input(value),
            InputResult::Cancel => {
                let mut state = self.lock_state()?;
                state.input.clear();
                state.status_message = "Input cleared".to_string();
                Ok(())
            }
            InputResult::Continue | InputResult::Ignored => Ok(()),
        }
    }

    /// Input -> Validate, then start the validation worker
    fn submit_input(&mut self, value: String) -> Result<()> {
        {
            let mut state = self.lock_state()?;
            state.session.input = value;
            if let Err(e) = state.session.submit_input() {
                debug!("Input rejected: {}", e);
                state.status_message = e.to_string();
                return Ok(());
            }
        }
        self.start_validation()
    }

    /// Spawn a validation worker for the session's input
    pub fn start_validation(&mut self) -> Result<()> {
        let (input, generation) = {
            let mut state = self.lock_state()?;
            state.reset_progress();
            state.session.clear_report();
            state.validating = true;
            state.status_message = "Validating...".to_string();
            (state.session.input.clone(), state.generation)
        };

        info!("Spawning validation worker (generation {})", generation);
        let api = Arc::clone(&self.api);
        let tx = self.worker_tx.clone();

        thread::spawn(move || {
            let runner = ValidationRunner::new(api.as_ref());
            let report = runner.run(&input, &mut |event| {
                let _ = tx.send(WorkerMessage::Progress { generation, event });
            });
            let _ = tx.send(WorkerMessage::ValidationFinished { generation, report });
        });
        Ok(())
    }

    fn handle_validate_key(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Enter => self.accept_validation(),
            KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Esc => self.go_back(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.lock_state()?.validating {
                    return Ok(());
                }
                info!("Re-running validation");
                self.start_validation()
            }
            _ => Ok(()),
        }
    }

    /// Validate -> Recommend, then fetch the statistics preview if it applies
    fn accept_validation(&mut self) -> Result<()> {
        let props = {
            let mut state = self.lock_state()?;
            if state.validating {
                state.status_message = "Validation is still running".to_string();
                return Ok(());
            }
            let recommendation = match state.session.ensure_report_ok() {
                Ok(report) => recommend_from_report(report, &self.config),
                Err(e) => {
                    state.status_message = e.to_string();
                    return Ok(());
                }
            };
            let recommendation = match recommendation {
                Ok(rec) => rec,
                Err(e) => {
                    state.status_message = e.to_string();
                    return Ok(());
                }
            };
            info!("Recommending {}", recommendation.primary);
            state.session.accept_report(recommendation)?;
            state.status_message = "Press Enter to finish or b to start over".to_string();
            state
                .session
                .report()
                .map(|r| r.properties.clone())
                .unwrap_or_default()
        };

        if !props.is_cog || props.is_cmr {
            return Ok(());
        }

        let generation = {
            let mut state = self.lock_state()?;
            state.loading_statistics = true;
            state.generation
        };
        let api = Arc::clone(&self.api);
        let tx = self.worker_tx.clone();
        thread::spawn(move || {
            let result = fetch_preview_statistics(api.as_ref(), &props);
            let _ = tx.send(WorkerMessage::Statistics { generation, result });
        });
        Ok(())
    }

    fn go_back(&mut self) -> Result<()> {
        let mut state = self.lock_state()?;
        match state.session.back() {
            Ok(step) => {
                state.reset_progress();
                state.status_message = format!("Back to {}", step);
            }
            Err(e) => state.status_message = e.to_string(),
        }
        Ok(())
    }

    fn handle_recommend_key(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Enter => {
                let mut state = self.lock_state()?;
                state.session.finish()?;
                state.status_message = "Press Enter for a new file or q to quit".to_string();
                Ok(())
            }
            KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Esc => self.go_back(),
            KeyCode::Up => {
                let mut state = self.lock_state()?;
                state.recommend_scroll = state.recommend_scroll.saturating_sub(1);
                Ok(())
            }
            KeyCode::Down => {
                let mut state = self.lock_state()?;
                state.recommend_scroll = state.recommend_scroll.saturating_add(1);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_done_key(&mut self, key_event: KeyEvent) -> Result<()> {
        if matches!(
            key_event.code,
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N')
        ) {
            let mut state = self.lock_state()?;
            state.session.reset();
            state.reset_progress();
            state.status_message = "New session: edit the reference and press Enter".to_string();
        }
        Ok(())
    }
}
