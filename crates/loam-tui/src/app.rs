//! App: terminal setup, the event loop and the effect dispatcher.
//!
//! Architecture:
//! - A `tokio::mpsc` channel carries `AppMessage`s in from the keyboard
//!   reader and from background tasks.
//! - The loop draws when something changed, then awaits the next message or
//!   the spinner tick.
//! - The `Controller` turns messages into `Effect`s; the `Dispatcher` runs
//!   each effect on a task that posts exactly one completion back.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use loam_proto::chat::{ChatRequest, ChatService};
use loam_proto::fetch::Fetcher;
use loam_proto::platform;
use ratatui::crossterm::{
    cursor,
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::action::Effect;
use crate::controller::Controller;

#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
    Fetched {
        request_id: u64,
        result: Result<Vec<u8>, String>,
    },
    ChatReply(Result<String, String>),
    Opened(Result<(), String>),
    Copied(Result<(), String>),
}

// ── Terminal input ────────────────────────────────────────────────────────────

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Raw mode, alternate screen and bracketed paste for as long as it lives.
/// Dropping it restores the terminal on every exit path.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableBracketedPaste,
            cursor::Show
        );
    }
}

fn read_terminal_event() -> io::Result<Option<Event>> {
    if event::poll(INPUT_POLL)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Forward input events to `tx` until `stop` is set, the receiver is gone or
/// `next` fails. `next` returns `Ok(None)` when nothing arrived in time.
fn pump_events<F>(mut next: F, tx: mpsc::Sender<AppMessage>, stop: Arc<AtomicBool>)
where
    F: FnMut() -> io::Result<Option<Event>>,
{
    while !stop.load(Ordering::Relaxed) {
        match next() {
            Ok(Some(ev)) => {
                if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                    break;
                }
            }
            Ok(None) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(e) => {
                warn!("terminal input failed: {}", e);
                break;
            }
        }
    }
    debug!("input reader stopped");
}

// ── Effect dispatcher ─────────────────────────────────────────────────────────

/// Runs controller effects off the event loop. Every spawned task sends one
/// completion message on `tx`.
#[derive(Clone)]
pub struct Dispatcher {
    fetcher: Fetcher,
    chat: Arc<dyn ChatService>,
    tx: mpsc::Sender<AppMessage>,
}

impl Dispatcher {
    pub fn new(fetcher: Fetcher, chat: Arc<dyn ChatService>, tx: mpsc::Sender<AppMessage>) -> Self {
        Self { fetcher, chat, tx }
    }

    /// Start `effect`. Returns `false` when the effect asks the app to quit.
    pub fn run(&self, effect: Effect) -> bool {
        match effect {
            Effect::Fetch { request_id, url } => self.fetch(request_id, url),
            Effect::Chat(request) => self.chat(request),
            Effect::OpenUrl(url) => self.open_url(url),
            Effect::CopyToClipboard(text) => self.copy(text),
            Effect::Quit => return false,
        }
        true
    }

    fn fetch(&self, request_id: u64, url: String) {
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&url).await.map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::Fetched { request_id, result }).await;
        });
    }

    fn chat(&self, request: ChatRequest) {
        let chat = Arc::clone(&self.chat);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = chat.send(request).await.map_err(|e| {
                warn!("chat request failed: {}", e);
                e.to_string()
            });
            let _ = tx.send(AppMessage::ChatReply(result)).await;
        });
    }

    fn open_url(&self, url: String) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = platform::open_url(&url).map_err(|e| e.to_string());
            let _ = tx.blocking_send(AppMessage::Opened(result));
        });
    }

    fn copy(&self, text: String) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = arboard::Clipboard::new()
                .and_then(|mut cb| cb.set_text(text))
                .map_err(|e| {
                    warn!("Clipboard error: {}", e);
                    e.to_string()
                });
            let _ = tx.blocking_send(AppMessage::Copied(result));
        });
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    controller: Controller,
    fetcher: Fetcher,
    chat: Arc<dyn ChatService>,
    should_quit: bool,
}

impl App {
    pub fn new(controller: Controller, fetcher: Fetcher, chat: Arc<dyn ChatService>) -> Self {
        Self {
            controller,
            fetcher,
            chat,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        let _guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        let dispatcher = Dispatcher::new(self.fetcher.clone(), Arc::clone(&self.chat), tx.clone());

        // ── Background task: keyboard/paste/resize events ─────────────────────
        let stop_input = Arc::new(AtomicBool::new(false));
        let reader = {
            let stop = Arc::clone(&stop_input);
            let event_tx = tx.clone();
            tokio::task::spawn_blocking(move || pump_events(read_terminal_event, event_tx, stop))
        };

        let result = self.event_loop(&mut terminal, &mut rx, &dispatcher).await;

        // The reader must be gone before the runtime shuts down.
        stop_input.store(true, Ordering::Relaxed);
        let _ = reader.await;
        info!("browser stopped");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        rx: &mut mpsc::Receiver<AppMessage>,
        dispatcher: &Dispatcher,
    ) -> anyhow::Result<()> {
        if let Ok(size) = terminal.size() {
            self.controller.handle_resize(size.width, size.height);
        }
        for effect in self.controller.start() {
            self.run_effect(dispatcher, effect);
        }
        info!("browser started");

        let mut spinner_tick = tokio::time::interval(Duration::from_millis(100));
        spinner_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.controller.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                return Ok(());
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg, dispatcher);
                }
                _ = spinner_tick.tick() => {
                    if self.controller.is_animating() {
                        self.controller.tick();
                        needs_redraw = true;
                    }
                }
            }
        }
    }

    fn run_effect(&mut self, dispatcher: &Dispatcher, effect: Effect) {
        if !dispatcher.run(effect) {
            self.should_quit = true;
        }
    }

    /// Returns `true` if the message requires a redraw.
    fn handle_message(&mut self, msg: AppMessage, dispatcher: &Dispatcher) -> bool {
        let effects = match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    self.controller.handle_key(key)
                }
                Event::Paste(text) => self.controller.handle_paste(&text),
                Event::Resize(w, h) => {
                    self.controller.handle_resize(w, h);
                    Vec::new()
                }
                _ => return false,
            },
            AppMessage::Fetched { request_id, result } => {
                self.controller.on_fetched(request_id, result);
                Vec::new()
            }
            AppMessage::ChatReply(result) => {
                self.controller.on_chat_reply(result);
                Vec::new()
            }
            AppMessage::Opened(result) => {
                self.controller.on_opened(result);
                Vec::new()
            }
            AppMessage::Copied(result) => {
                self.controller.on_copied(result);
                Vec::new()
            }
        };
        for effect in effects {
            self.run_effect(dispatcher, effect);
        }
        true
    }
}
