//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks
//!   (terminal input, probes, the poller, add/control requests).
//! - The event loop draws each frame, then awaits the next message or timer.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Network calls never run on the loop itself: they are spawned and report
//!   back through the channel, tagged with the dashboard generation they were
//!   started under so results from a torn-down dashboard are ignored.

use std::io;
use std::time::Duration;

use chrono::Local;
use ratatui::crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use deck_core::api::{self, ApiClient};
use deck_core::config::Config;
use deck_core::dashboard::{self, AddReport, ControlReport, ViewMode};
use deck_core::poller::{PollResult, Poller};
use deck_core::session::Session;

use crate::{
    action::{Action, ComponentId, Screen},
    app_state::AppState,
    component::Component,
    components::{
        add_panel::AddPanel,
        connect_screen::{ConnectScreen, CONNECT_FAILED},
        header::Header,
        help_overlay::HelpOverlay,
        torrent_list::TorrentList,
    },
    focus::FocusRing,
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Probed { url: String, reachable: bool },
    /// Scheduled poll result, tagged with the dashboard generation.
    Polled(u64, PollResult),
    Added(u64, AddReport),
    Controlled(u64, ControlReport),
    /// Manual refresh result.
    Refreshed(u64, PollResult),
}

/// Width below which the dashboard stacks its panes vertically.
const NARROW_WIDTH: u16 = 100;

pub struct App {
    state: AppState,
    config: Config,
    focus: FocusRing,

    connect_screen: ConnectScreen,
    header: Header,
    torrent_list: TorrentList,
    add_panel: AddPanel,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    show_keys_bar: bool,
    should_quit: bool,
    /// URL to probe as soon as the loop starts.
    initial_url: Option<String>,

    // ── Dashboard lifetime ────────────────────────────────────────────────────
    /// Bumped on every dashboard entry; stale task results carry an older one.
    generation: u64,
    api: Option<ApiClient>,
    poller: Option<Poller>,
    clock: Option<Interval>,

    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,
}

impl App {
    pub fn new(session: Session, config: Config, initial_url: Option<String>) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(256);
        let max_batch_links = config.polling.max_batch_links;
        let mut connect_screen = ConnectScreen::new();
        connect_screen.prefill(initial_url.as_deref().or(session.url()));
        let initial_url = initial_url.or_else(|| session.url().map(str::to_string));

        Self {
            state: AppState::new(session, max_batch_links),
            show_keys_bar: config.ui.show_keys_bar,
            config,
            focus: FocusRing::new(vec![ComponentId::ConnectScreen]),
            connect_screen,
            header: Header::new(),
            torrent_list: TorrentList::new(),
            add_panel: AddPanel::new(max_batch_links),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            should_quit: false,
            initial_url,
            generation: 0,
            api: None,
            poller: None,
            clock: None,
            tx,
            rx: Some(rx),
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        self.leave_dashboard();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;
        info!("magnetdeck exiting");

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let Some(mut rx) = self.rx.take() else {
            anyhow::bail!("event loop already ran");
        };

        // ── Background task: keyboard/paste/resize events ─────────────────────
        // Polls with a timeout so the thread notices the loop has gone away.
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(250)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });

        self.state.push_log("magnetdeck started");
        if let Some(url) = self.initial_url.take() {
            info!("auto-connecting to {}", url);
            self.dispatch(Action::Connect(url)).await;
        }

        // Spinner animation + toast expiry.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg).await;
                    // Drain whatever else is queued before redrawing.
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next).await;
                    }
                }

                _ = ui_tick.tick() => {
                    self.state.tick = self.state.tick.wrapping_add(1);
                    self.toast.tick();
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.connect_screen.tick(s));
                        all.extend(self.torrent_list.tick(s));
                        all.extend(self.add_panel.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action).await;
                    }
                }

                _ = next_tick(&mut self.clock) => {
                    self.state.now = Local::now();
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    // ── Message handling ──────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action).await;
                }
            }
            AppMessage::Event(Event::Paste(text)) => {
                for action in self.handle_paste(&text) {
                    self.dispatch(action).await;
                }
            }
            AppMessage::Event(_) => {}
            AppMessage::Probed { url, reachable } => self.on_probed(url, reachable),
            AppMessage::Polled(gen, result) => {
                if gen == self.generation && self.state.screen == Screen::Dashboard {
                    self.apply_list(result);
                }
            }
            AppMessage::Refreshed(gen, result) => {
                if gen == self.generation && self.state.screen == Screen::Dashboard {
                    if let Err(e) = &result {
                        self.toast.error(format!("refresh failed: {}", e));
                    }
                    self.apply_list(result);
                }
            }
            AppMessage::Added(gen, report) => self.on_added(gen, report),
            AppMessage::Controlled(gen, report) => self.on_controlled(gen, report),
        }
    }

    fn on_probed(&mut self, url: String, reachable: bool) {
        self.state.session.finish_connect(&url, reachable);
        if self.state.probing.as_deref() == Some(url.as_str()) {
            self.state.probing = None;
        }
        if self.state.screen != Screen::Connect {
            return;
        }
        if reachable {
            self.state.connect_error = None;
            self.state.push_log(format!("connected to {}", url));
            self.enter_dashboard();
        } else {
            self.state.connect_error = Some(CONNECT_FAILED.to_string());
            self.state.push_log(format!("cannot reach {}", url));
        }
    }

    /// Fold a list fetch into the board and the list view.
    fn apply_list(&mut self, result: PollResult) {
        let was_failing = self.state.board.last_error().is_some();
        let failed = result.as_ref().err().map(|e| e.to_string());
        self.state.board.apply(result);
        match failed {
            Some(e) if !was_failing => self.state.push_log(format!("poll failed: {}", e)),
            None if was_failing => self.state.push_log("backend answering again"),
            _ => {}
        }
        self.torrent_list.sync(&self.state);
    }

    fn on_added(&mut self, gen: u64, report: AddReport) {
        if gen != self.generation {
            return;
        }
        self.state.adding = false;
        self.add_panel.clear();

        let added = report.added.len();
        if report.failed.is_empty() {
            self.toast.success(format!("added {} of {} links", added, report.attempted()));
        } else {
            self.toast.warning(format!(
                "added {}, {} failed",
                added,
                report.failed.len()
            ));
        }
        if report.dropped > 0 {
            self.toast.warning(format!(
                "{} links over the limit of {} were dropped",
                report.dropped, self.state.max_batch_links
            ));
        }
        self.state.push_log(format!(
            "add batch: {} added, {} failed, {} dropped",
            added,
            report.failed.len(),
            report.dropped
        ));

        if let Some(list) = report.refreshed {
            if self.state.screen == Screen::Dashboard {
                self.apply_list(Ok(list));
            }
        }
    }

    fn on_controlled(&mut self, gen: u64, report: ControlReport) {
        if gen != self.generation || self.state.screen != Screen::Dashboard {
            return;
        }
        match &report.error {
            Some(e) => self
                .toast
                .error(format!("{} failed: {}", report.action.label(), e)),
            None => self.toast.info(format!("{} sent", report.action.label())),
        }
        self.apply_list(report.refreshed);
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let normal = self.state.input_mode == InputMode::Normal;

        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q') if normal && key.modifiers == KeyModifiers::NONE => {
                if !self.help_overlay.visible {
                    return vec![Action::Quit];
                }
            }
            KeyCode::Char('?') if normal => return vec![Action::ToggleHelp],
            _ => {}
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            return vec![Action::ToggleHelp];
        }

        if normal {
            match key.code {
                KeyCode::Tab => return vec![Action::FocusNext],
                KeyCode::BackTab => return vec![Action::FocusPrev],
                KeyCode::Char('K') => return vec![Action::ToggleKeys],
                _ => {}
            }
        }

        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::ConnectScreen) => self.connect_screen.handle_key(key, s),
            Some(ComponentId::TorrentList) => self.torrent_list.handle_key(key, s),
            Some(ComponentId::AddPanel) => self.add_panel.handle_key(key, s),
            Some(ComponentId::HelpOverlay) => self.help_overlay.handle_key(key, s),
            None => vec![],
        }
    }

    /// Pasted text goes to whatever can take it: the URL field on the connect
    /// screen, the link box on the dashboard.
    fn handle_paste(&mut self, text: &str) -> Vec<Action> {
        let s = &self.state;
        match s.screen {
            Screen::Connect => self.connect_screen.handle_paste(text, s),
            Screen::Dashboard => {
                let mut actions = Vec::new();
                if !self.focus.is_focused(ComponentId::AddPanel) {
                    actions.push(Action::FocusPane(ComponentId::AddPanel));
                }
                actions.extend(self.add_panel.handle_paste(text, s));
                actions
            }
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        // Broadcast to components first so they can react (selection, prefill).
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.connect_screen.on_action(&action, s));
            out.extend(self.torrent_list.on_action(&action, s));
            out.extend(self.add_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action).await;

        // Secondary actions are applied one level deep only.
        for a in secondary {
            self.apply_action(a).await;
        }
    }

    async fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Connection ────────────────────────────────────────────────────
            Action::Connect(url) => self.start_probe(url),
            Action::ChangeBackend => {
                self.leave_dashboard();
                self.state.push_log("switched to connect screen");
            }

            // ── Torrents ──────────────────────────────────────────────────────
            Action::AddLinks(raw) => self.start_add(raw),
            Action::Control { info_hash, action } => {
                let Some(api) = self.api.clone() else { return };
                let Some(hash) = info_hash.filter(|h| !h.is_empty()) else {
                    self.toast.warning("torrent has no info hash yet");
                    return;
                };
                let tx = self.tx.clone();
                let gen = self.generation;
                tokio::spawn(async move {
                    if let Some(report) =
                        dashboard::control_action(&api, Some(&hash), action).await
                    {
                        let _ = tx.send(AppMessage::Controlled(gen, report)).await;
                    }
                });
            }
            Action::Refresh => {
                let Some(api) = self.api.clone() else { return };
                let tx = self.tx.clone();
                let gen = self.generation;
                tokio::spawn(async move {
                    let result = api.torrents().await;
                    let _ = tx.send(AppMessage::Refreshed(gen, result)).await;
                });
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
                self.sync_input_mode();
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.sync_input_mode();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
                self.sync_input_mode();
            }
            // Handled by the torrent list in on_action
            Action::SelectUp(_) | Action::SelectDown(_) | Action::SelectFirst | Action::SelectLast => {}

            // ── UI toggles ────────────────────────────────────────────────────
            Action::StartEditing => {
                if matches!(
                    self.focus.current(),
                    Some(ComponentId::ConnectScreen) | Some(ComponentId::AddPanel)
                ) {
                    self.state.input_mode = InputMode::Editing;
                }
            }
            Action::StopEditing => self.state.input_mode = InputMode::Normal,
            // Visibility lives in the overlay itself
            Action::ToggleHelp => {}
            Action::ToggleKeys => self.show_keys_bar = !self.show_keys_bar,
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => self.should_quit = true,
        }
    }

    /// Only the text fields may stay in editing mode.
    fn sync_input_mode(&mut self) {
        if !matches!(
            self.focus.current(),
            Some(ComponentId::ConnectScreen) | Some(ComponentId::AddPanel)
        ) {
            self.state.input_mode = InputMode::Normal;
        }
    }

    fn start_probe(&mut self, url: String) {
        let url = url.trim().to_string();
        if url.is_empty() || self.state.probing.is_some() {
            return;
        }
        self.state.probing = Some(url.clone());
        self.state.connect_error = None;

        let http = self.state.session.http().clone();
        let timeout = self.state.session.probe_timeout();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let reachable = api::probe(&http, &url, timeout).await;
            let _ = tx.send(AppMessage::Probed { url, reachable }).await;
        });
    }

    fn start_add(&mut self, raw: String) {
        if self.state.adding {
            return;
        }
        let Some(api) = self.api.clone() else { return };
        if dashboard::split_links(&raw, 1).is_empty() {
            return;
        }
        self.state.adding = true;
        let limit = self.state.max_batch_links;
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let report = dashboard::add_links(&api, &raw, limit).await;
            let _ = tx.send(AppMessage::Added(gen, report)).await;
        });
    }

    // ── Screen lifecycle ──────────────────────────────────────────────────────

    /// Start polling and the clock. Without a URL there is nothing to show,
    /// so stay on the connect screen.
    fn enter_dashboard(&mut self) {
        let Some(api) = self
            .state
            .session
            .api_client(self.config.api.request_timeout())
        else {
            warn!("dashboard requested without a backend url");
            self.leave_dashboard();
            return;
        };

        self.generation += 1;
        self.state.board.reset();
        self.state.adding = false;
        self.torrent_list.clear();
        self.state.screen = Screen::Dashboard;
        self.state.input_mode = InputMode::Normal;
        self.focus
            .reset(vec![ComponentId::TorrentList, ComponentId::AddPanel]);

        let gen = self.generation;
        self.poller = Some(Poller::spawn(
            api.clone(),
            self.config.polling.poll_interval(),
            self.tx.clone(),
            move |result| AppMessage::Polled(gen, result),
        ));
        self.api = Some(api);

        let mut clock = tokio::time::interval(Duration::from_millis(
            self.config.ui.clock_interval_ms.max(1),
        ));
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.clock = Some(clock);
        self.state.now = Local::now();
        info!("dashboard open (generation {})", gen);
    }

    /// Tear down polling and the clock and show the connect screen. The saved
    /// URL is kept.
    fn leave_dashboard(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.clock = None;
        self.api = None;
        self.generation += 1;
        self.state.board.reset();
        self.state.adding = false;
        self.torrent_list.clear();
        self.state.screen = Screen::Connect;
        self.state.input_mode = InputMode::Editing;
        self.focus.reset(vec![ComponentId::ConnectScreen]);
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let keys_h = if self.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(keys_h),
            ])
            .split(area);

        match self.state.screen {
            Screen::Connect => {
                let focused = self.focus.is_focused(ComponentId::ConnectScreen);
                self.connect_screen
                    .draw(frame, outer[0], focused, &self.state);
            }
            Screen::Dashboard => self.draw_dashboard(frame, outer[0]),
        }

        status_bar::draw_log_bar(
            frame,
            outer[1],
            self.state.last_log(),
            self.state.session.is_connected(),
        );
        if self.show_keys_bar {
            status_bar::draw_keys_bar(frame, outer[2], self.state.input_mode, self.state.screen);
        }

        if self.help_overlay.visible {
            self.help_overlay.draw(frame, area, false, &self.state);
        }
        self.toast.draw(frame, area);
    }

    fn draw_dashboard(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        if self.state.view_mode() == ViewMode::Unauthenticated {
            return;
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);
        self.header.draw(frame, rows[0], &self.state);

        let (add_area, list_area) = if area.width < NARROW_WIDTH {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(14), Constraint::Min(0)])
                .split(rows[1]);
            (parts[0], parts[1])
        } else {
            let parts = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
                .split(rows[1]);
            (parts[0], parts[1])
        };

        let add_focused = self.focus.is_focused(ComponentId::AddPanel);
        let list_focused = self.focus.is_focused(ComponentId::TorrentList);
        self.add_panel
            .draw(frame, add_area, add_focused, &self.state);
        self.torrent_list
            .draw(frame, list_area, list_focused, &self.state);
    }
}

/// Tick of an optional timer; pends forever while the timer is off.
async fn next_tick(timer: &mut Option<Interval>) -> Instant {
    match timer {
        Some(t) => t.tick().await,
        None => std::future::pending().await,
    }
}
