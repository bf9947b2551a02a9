use std::path::PathBuf;
use std::time::{Duration, Instant};

use calltime_core::carousel::{Carousel, CarouselInput, TapZone};
use calltime_core::gifts::{SendGiftRequest, SendGiftResponse};
use calltime_core::share::{self, ShareTarget};
use calltime_core::{RecapError, RecapSnapshot, SlideKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use tokio_util::sync::CancellationToken;

use super::capture::CELL_WIDTH;
use super::dialog::{DialogAction, GiftDialog};
use super::platform::Delivery;
use super::tasks::{Completion, Job, Outcome, TaskKind, TaskSlots, Ticket};
use super::ui;

/// Time the active progress segment takes to fill.
pub const SEGMENT_FILL: Duration = Duration::from_secs(5);
pub const TOAST_TTL: Duration = Duration::from_secs(4);
/// Pixels per terminal column for gesture distances.
pub const CELL_PX: f32 = CELL_WIDTH as f32;

/// Identity and destinations for one slideshow session.
#[derive(Debug, Clone)]
pub struct Settings {
    pub user_id: String,
    pub year: i32,
    pub share_base_url: String,
    pub download_dir: PathBuf,
}

#[derive(Debug)]
pub enum Page {
    Loading,
    Failed(RecapError),
    Ready(RecapSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Gifts,
    Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub detail: Option<String>,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPurpose {
    ShareRecap,
    Compose,
}

/// Side effects for the event loop to perform.
#[derive(Debug)]
pub enum Effect {
    Spawn(Job),
    OpenLink { url: String, purpose: LinkPurpose },
}

#[derive(Debug, Clone, Copy)]
struct Pointer {
    moved: bool,
}

#[derive(Debug)]
struct PendingCapture {
    ticket: Ticket,
    token: CancellationToken,
    path: PathBuf,
}

/// Application state for the slideshow.
pub struct App {
    pub settings: Settings,
    pub should_quit: bool,
    pub page: Page,
    pub carousel: Carousel,
    pub overlay: Overlay,
    pub gifts: GiftDialog,
    pub share_cursor: usize,
    pub toasts: Vec<Toast>,
    pub tasks: TaskSlots,
    pub slide_started: Instant,
    /// Last drawn terminal area.
    pub viewport: Rect,
    pointer: Option<Pointer>,
    pending_capture: Option<PendingCapture>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            should_quit: false,
            page: Page::Loading,
            carousel: Carousel::new(0),
            overlay: Overlay::None,
            gifts: GiftDialog::new(Vec::new()),
            share_cursor: 0,
            toasts: Vec::new(),
            tasks: TaskSlots::default(),
            slide_started: Instant::now(),
            viewport: Rect::default(),
            pointer: None,
            pending_capture: None,
        }
    }

    pub fn snapshot(&self) -> Option<&RecapSnapshot> {
        match &self.page {
            Page::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn current_slide(&self) -> Option<SlideKind> {
        self.snapshot()?;
        SlideKind::SEQUENCE.get(self.carousel.index()).copied()
    }

    pub fn is_sending(&self) -> bool {
        self.tasks.in_flight(TaskKind::SendGifts)
    }

    pub fn is_capturing(&self) -> bool {
        self.tasks.in_flight(TaskKind::Capture)
    }

    /// True while the next frame is due to be captured; chrome such as toasts stays hidden.
    pub fn capture_pending(&self) -> bool {
        self.pending_capture.is_some()
    }

    /// Fill ratio of the active progress segment.
    pub fn active_fill(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.slide_started);
        (elapsed.as_secs_f64() / SEGMENT_FILL.as_secs_f64()).min(1.0)
    }

    // ── Loading ──

    /// Kick off the recap fetch.
    pub fn start(&mut self) -> Vec<Effect> {
        self.page = Page::Loading;
        let (ticket, token) = self.tasks.begin(TaskKind::Fetch);
        tracing::info!(user_id = %self.settings.user_id, year = self.settings.year, "loading recap");
        vec![Effect::Spawn(Job::Fetch {
            ticket,
            token,
            user_id: self.settings.user_id.clone(),
            year: self.settings.year,
        })]
    }

    fn retry(&mut self) -> Vec<Effect> {
        if matches!(self.page, Page::Failed(_)) && !self.tasks.in_flight(TaskKind::Fetch) {
            tracing::info!("retrying recap fetch");
            return self.start();
        }
        Vec::new()
    }

    fn on_fetched(&mut self, result: Result<RecapSnapshot, RecapError>) {
        match result {
            Ok(snapshot) => {
                self.carousel = Carousel::new(SlideKind::SEQUENCE.len());
                self.gifts = GiftDialog::new(snapshot.top_collaborators().to_vec());
                self.slide_started = Instant::now();
                self.page = Page::Ready(snapshot);
            }
            Err(e) => {
                tracing::warn!(error = %e, "recap fetch failed");
                self.page = Page::Failed(e);
            }
        }
    }

    // ── Carousel ──

    /// Feed one input to the carousel and restart the progress fill on a change.
    pub fn navigate(&mut self, input: CarouselInput) {
        if let Some(nav) = self.carousel.apply(input) {
            tracing::debug!(from = nav.from, to = nav.to, "slide changed");
            self.slide_started = Instant::now();
        }
    }

    // ── Toasts ──

    pub fn toast(&mut self, level: ToastLevel, title: impl Into<String>, detail: Option<String>) {
        self.toasts.push(Toast {
            level,
            title: title.into(),
            detail,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn toast_error(&mut self, err: &RecapError) {
        self.toast(ToastLevel::Error, err.headline(), Some(err.detail()));
    }

    /// Drop expired toasts.
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    // ── Gifts ──

    fn submit_gifts(&mut self) -> Vec<Effect> {
        if self.is_sending() {
            return Vec::new();
        }
        let recipients = match self.gifts.selection.to_request_items() {
            Ok(items) => items,
            Err(e) => {
                self.toast_error(&e);
                return Vec::new();
            }
        };
        let (ticket, token) = self.tasks.begin(TaskKind::SendGifts);
        tracing::info!(recipients = recipients.len(), "sending gifts");
        let request = SendGiftRequest {
            sender_user_id: self.settings.user_id.clone(),
            recipients,
            year: self.settings.year,
            message: None,
        };
        vec![Effect::Spawn(Job::SendGifts {
            ticket,
            token,
            request,
        })]
    }

    fn on_gifts_sent(&mut self, result: Result<SendGiftResponse, RecapError>) {
        match result.and_then(SendGiftResponse::into_result) {
            Ok(sent) => {
                let plural = if sent == 1 { "" } else { "s" };
                self.toast(
                    ToastLevel::Success,
                    "Gifts sent!",
                    Some(format!("Sent {sent} gift{plural} to your collaborators.")),
                );
                self.gifts.clear();
                if self.overlay == Overlay::Gifts {
                    self.overlay = Overlay::None;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "gift send failed");
                self.toast_error(&e);
            }
        }
    }

    // ── Share ──

    fn start_capture(&mut self) {
        if self.is_capturing() || self.pending_capture.is_some() {
            return;
        }
        let (ticket, token) = self.tasks.begin(TaskKind::Capture);
        let now_ms = (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let path = self
            .settings
            .download_dir
            .join(share::download_filename(self.settings.year, now_ms));
        self.toast(ToastLevel::Info, "Generating image...", None);
        self.pending_capture = Some(PendingCapture {
            ticket,
            token,
            path,
        });
    }

    /// Hand over the frame that was just drawn if a capture is waiting for it.
    pub fn take_capture(&mut self, frame: &Buffer) -> Option<Job> {
        let pending = self.pending_capture.take()?;
        Some(Job::Capture {
            ticket: pending.ticket,
            token: pending.token,
            frame: frame.clone(),
            path: pending.path,
        })
    }

    fn share(&mut self, target: ShareTarget) -> Vec<Effect> {
        self.overlay = Overlay::None;
        let year = self.settings.year;
        match target {
            ShareTarget::Download => {
                self.start_capture();
                Vec::new()
            }
            ShareTarget::Instagram => {
                self.toast(
                    ToastLevel::Info,
                    "Download the slide and share it to your Instagram story!",
                    None,
                );
                self.start_capture();
                Vec::new()
            }
            ShareTarget::Link => {
                let url =
                    share::recap_url(&self.settings.share_base_url, &self.settings.user_id, year);
                let payload = share::share_payload(year, &url);
                tracing::info!(title = %payload.title, url = %payload.url, "sharing recap link");
                vec![Effect::OpenLink {
                    url: payload.url,
                    purpose: LinkPurpose::ShareRecap,
                }]
            }
            ShareTarget::Twitter => vec![Effect::OpenLink {
                url: share::compose_url(year),
                purpose: LinkPurpose::Compose,
            }],
        }
    }

    /// Report how a link effect went.
    pub fn link_delivered(&mut self, purpose: LinkPurpose, result: Result<Delivery, String>) {
        match (purpose, result) {
            (_, Ok(Delivery::Opened)) => {}
            (LinkPurpose::ShareRecap, Ok(Delivery::Copied)) => {
                self.toast(ToastLevel::Success, "Link copied to clipboard!", None)
            }
            (LinkPurpose::Compose, Ok(Delivery::Copied)) => self.toast(
                ToastLevel::Info,
                "No browser available",
                Some("The Twitter link was copied to your clipboard.".into()),
            ),
            (_, Err(e)) => {
                tracing::warn!(error = %e, "share failed");
                self.toast(ToastLevel::Error, "Failed to share", Some(e));
            }
        }
    }

    fn on_captured(&mut self, result: Result<PathBuf, RecapError>) {
        match result {
            Ok(path) => self.toast(
                ToastLevel::Success,
                "Slide downloaded!",
                Some(path.display().to_string()),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "capture failed");
                self.toast_error(&e);
            }
        }
    }

    // ── Completions ──

    /// Apply a finished job, unless its ticket is no longer live.
    pub fn complete(&mut self, done: Completion) {
        if !self.tasks.accept(done.ticket) {
            tracing::debug!(ticket = ?done.ticket, "stale result dropped");
            return;
        }
        match done.outcome {
            Outcome::Fetched(result) => self.on_fetched(result),
            Outcome::GiftsSent(result) => self.on_gifts_sent(result),
            Outcome::Captured(result) => self.on_captured(result),
        }
    }

    /// Cancel everything still running.
    pub fn shutdown(&mut self) {
        self.pending_capture = None;
        self.tasks.cancel_all();
    }

    // ── Input ──

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        match self.page {
            Page::Loading => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.should_quit = true;
                }
                return Vec::new();
            }
            Page::Failed(_) => {
                return match key.code {
                    KeyCode::Char('r') | KeyCode::Enter => self.retry(),
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.should_quit = true;
                        Vec::new()
                    }
                    _ => Vec::new(),
                };
            }
            Page::Ready(_) => {}
        }

        match self.overlay {
            // The selection is frozen while it is being sent; only closing is allowed.
            Overlay::Gifts
                if self.is_sending()
                    && !matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) =>
            {
                Vec::new()
            }
            Overlay::Gifts => match self.gifts.handle_key(key) {
                DialogAction::Close => {
                    self.overlay = Overlay::None;
                    Vec::new()
                }
                DialogAction::Submit => self.submit_gifts(),
                DialogAction::None => Vec::new(),
            },
            Overlay::Share => self.handle_share_key(key),
            Overlay::None => self.handle_slide_key(key),
        }
    }

    fn handle_share_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let count = ShareTarget::ALL.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
                self.overlay = Overlay::None;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.share_cursor = self.share_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.share_cursor = (self.share_cursor + 1).min(count - 1);
            }
            KeyCode::Enter => return self.share(ShareTarget::ALL[self.share_cursor]),
            KeyCode::Char(c @ '1'..='4') => {
                return self.share(ShareTarget::ALL[usize::from(c as u8 - b'1')]);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_slide_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let last = self.carousel.slide_count().saturating_sub(1);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Char('l') => self.navigate(CarouselInput::Next),
            KeyCode::Left | KeyCode::Char('h') => self.navigate(CarouselInput::Prev),
            KeyCode::Home => self.navigate(CarouselInput::DotClick(0)),
            KeyCode::End => self.navigate(CarouselInput::DotClick(last)),
            KeyCode::Char(c @ '1'..='9') => {
                self.navigate(CarouselInput::DotClick(usize::from(c as u8 - b'1')));
            }
            KeyCode::Char('g') if self.current_slide() == Some(SlideKind::Collaborators) => {
                self.open_overlay(Overlay::Gifts);
            }
            KeyCode::Char('s') => {
                self.share_cursor = 0;
                self.open_overlay(Overlay::Share);
            }
            _ => {}
        }
        Vec::new()
    }

    /// Overlays swallow mouse input, so a gesture still in progress is cancelled here.
    fn open_overlay(&mut self, overlay: Overlay) {
        if self.pointer.take().is_some() || self.carousel.is_dragging() {
            self.navigate(CarouselInput::TouchCancel);
        }
        self.overlay = overlay;
    }

    /// Handle a mouse event. Presses on the navigation row are clicks; presses on the
    /// slides start a drag, and a release without movement is a tap.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.snapshot().is_none() || self.overlay != Overlay::None {
            return;
        }
        let layout = ui::screen_layout(self.viewport);
        let x = f32::from(mouse.column.saturating_sub(layout.strip.x)) * CELL_PX;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = ui::nav_hit(
                    layout.nav,
                    self.carousel.slide_count(),
                    mouse.column,
                    mouse.row,
                );
                if let Some(input) = hit {
                    self.navigate(input);
                } else if layout.strip.contains((mouse.column, mouse.row).into()) {
                    self.pointer = Some(Pointer { moved: false });
                    self.navigate(CarouselInput::TouchStart { x });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(pointer) = self.pointer.as_mut() {
                    pointer.moved = true;
                    self.navigate(CarouselInput::TouchMove { x });
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(pointer) = self.pointer.take() {
                    self.navigate(CarouselInput::TouchEnd);
                    if !pointer.moved {
                        let width = f32::from(layout.strip.width) * CELL_PX;
                        self.navigate(CarouselInput::Tap(TapZone::locate(x, width)));
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltime_client::mock::sample_snapshot;
    use calltime_core::carousel::Segment;
    use calltime_core::gifts::GiftId;
    use std::sync::Arc;

    use calltime_client::{MockGiftSender, MockRecapSource};
    use tokio::sync::mpsc;

    use crate::tui::tasks::{self, Services};

    fn settings() -> Settings {
        Settings {
            user_id: "u1".into(),
            year: 2025,
            share_base_url: "https://calltime.app/wrapped".into(),
            download_dir: PathBuf::from("/tmp/calltime-test"),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// Start the fetch and feed back a result under the live ticket.
    fn loaded(result: Result<RecapSnapshot, RecapError>) -> App {
        let mut app = App::new(settings());
        app.viewport = Rect::new(0, 0, 80, 24);
        let effects = app.start();
        let Some(Effect::Spawn(Job::Fetch { ticket, .. })) = effects.into_iter().next() else {
            panic!("expected fetch job");
        };
        app.complete(Completion {
            ticket,
            outcome: Outcome::Fetched(result),
        });
        app
    }

    fn ready() -> App {
        loaded(Ok(sample_snapshot("u1", 2025)))
    }

    fn send_ticket(effects: Vec<Effect>) -> Ticket {
        match effects.into_iter().next() {
            Some(Effect::Spawn(Job::SendGifts { ticket, .. })) => ticket,
            other => panic!("expected gift send, got {other:?}"),
        }
    }

    #[test]
    fn new_app_is_loading() {
        let app = App::new(settings());
        assert!(matches!(app.page, Page::Loading));
        assert!(!app.should_quit);
        assert!(app.snapshot().is_none());
    }

    #[test]
    fn fetch_success_shows_slides() {
        let app = ready();
        assert!(app.snapshot().is_some());
        assert_eq!(app.carousel.slide_count(), 6);
        assert_eq!(app.carousel.index(), 0);
        assert_eq!(app.gifts.collaborators.len(), 5);
    }

    #[test]
    fn three_collaborators_are_not_padded() {
        let mut snap = sample_snapshot("u1", 2025);
        snap.collaborators.truncate(3);
        let app = loaded(Ok(snap));
        assert_eq!(app.gifts.collaborators.len(), 3);
    }

    #[test]
    fn fetch_failure_then_retry_refetches() {
        let mut app = loaded(Err(RecapError::Fetch("offline".into())));
        assert!(matches!(app.page, Page::Failed(_)));
        let effects = app.handle_key(key(KeyCode::Char('r')));
        assert!(matches!(effects.as_slice(), [Effect::Spawn(Job::Fetch { .. })]));
        assert!(matches!(app.page, Page::Loading));
        // A second retry while the first is pending does nothing.
        assert!(app.handle_key(key(KeyCode::Char('r'))).is_empty());
    }

    #[test]
    fn stale_fetch_result_is_ignored() {
        let mut app = App::new(settings());
        let Some(Effect::Spawn(Job::Fetch { ticket: old, .. })) = app.start().into_iter().next()
        else {
            panic!("expected fetch job");
        };
        app.start();
        app.complete(Completion {
            ticket: old,
            outcome: Outcome::Fetched(Ok(sample_snapshot("u1", 2025))),
        });
        assert!(matches!(app.page, Page::Loading));
    }

    #[test]
    fn arrow_keys_navigate_and_clamp() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.carousel.index(), 0);
        for _ in 0..10 {
            app.handle_key(key(KeyCode::Right));
        }
        assert_eq!(app.carousel.index(), 5);
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.carousel.index(), 4);
        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.carousel.index(), 0);
    }

    #[test]
    fn digit_keys_jump_to_slide() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.carousel.index(), 3);
        assert_eq!(app.carousel.segments()[3], Segment::Active);
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.carousel.index(), 3);
    }

    #[test]
    fn q_quits() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn gift_dialog_only_opens_on_collaborator_slide() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.overlay, Overlay::None);
        app.handle_key(key(KeyCode::Char('4')));
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.overlay, Overlay::Gifts);
        // Keys now go to the dialog, not the carousel.
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.carousel.index(), 3);
    }

    #[test]
    fn empty_submit_is_a_validation_toast() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('4')));
        app.handle_key(key(KeyCode::Char('g')));
        let effects = app.handle_key(key(KeyCode::Enter));
        assert!(effects.is_empty());
        assert!(!app.is_sending());
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].title, "No collaborators selected");
    }

    #[test]
    fn successful_send_clears_selection_and_closes() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('4')));
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('2')));
        let ticket = send_ticket(app.handle_key(key(KeyCode::Enter)));
        assert!(app.is_sending());
        // Busy: a second submit is refused.
        assert!(app.handle_key(key(KeyCode::Enter)).is_empty());
        app.complete(Completion {
            ticket,
            outcome: Outcome::GiftsSent(Ok(SendGiftResponse {
                success: true,
                sent_count: 1,
                failed_recipients: None,
                error: None,
            })),
        });
        assert!(!app.is_sending());
        assert!(app.gifts.selection.is_empty());
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.toasts.last().unwrap().title, "Gifts sent!");
    }

    #[test]
    fn failed_send_keeps_selection() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('4')));
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('3')));
        let ticket = send_ticket(app.handle_key(key(KeyCode::Enter)));
        app.complete(Completion {
            ticket,
            outcome: Outcome::GiftsSent(Err(RecapError::Send("503".into()))),
        });
        assert_eq!(app.gifts.selection.get("Sarah Chen"), Some(GiftId::WrapBox));
        assert_eq!(app.overlay, Overlay::Gifts);
        assert_eq!(app.toasts.last().unwrap().level, ToastLevel::Error);
    }

    #[test]
    fn selection_is_frozen_while_sending() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('4')));
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('2')));
        let ticket = send_ticket(app.handle_key(key(KeyCode::Enter)));
        // Edits made during the send would be dropped by the clear on success.
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.gifts.cursor, 0);
        assert_eq!(app.gifts.selected(), 1);
        assert_eq!(app.gifts.selection.get("Sarah Chen"), Some(GiftId::Hat));
        // Closing is still allowed, and the send completes in the background.
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
        app.complete(Completion {
            ticket,
            outcome: Outcome::GiftsSent(Ok(SendGiftResponse {
                success: true,
                sent_count: 1,
                failed_recipients: None,
                error: None,
            })),
        });
        assert!(app.gifts.selection.is_empty());
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.gifts.selected(), 1);
    }

    #[tokio::test]
    async fn unreachable_recipient_keeps_selection() {
        let services = Services {
            source: Arc::new(MockRecapSource::new().with_latency(Duration::ZERO)),
            sender: Arc::new(
                MockGiftSender::new()
                    .with_latency(Duration::ZERO)
                    .with_unreachable(&["Sarah Chen"]),
            ),
        };
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('4')));
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('2')));
        let job = match app.handle_key(key(KeyCode::Enter)).into_iter().next() {
            Some(Effect::Spawn(job @ Job::SendGifts { .. })) => job,
            other => panic!("expected gift send, got {other:?}"),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        tasks::spawn(&tokio::runtime::Handle::current(), &services, job, tx);
        let done = rx.recv().await.unwrap();
        assert!(matches!(done.outcome, Outcome::GiftsSent(Ok(ref r)) if !r.success));
        app.complete(done);

        assert!(!app.is_sending());
        assert_eq!(app.overlay, Overlay::Gifts);
        assert_eq!(app.gifts.selection.get("Sarah Chen"), Some(GiftId::WrapBox));
        assert_eq!(app.gifts.selection.get("Marcus Johnson"), Some(GiftId::Hat));
        let toast = app.toasts.last().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.title, "Failed to send gifts");
    }

    #[test]
    fn download_captures_next_frame_once() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.overlay, Overlay::Share);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.capture_pending());
        // A second request while one is pending is ignored.
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('1')));
        let frame = Buffer::empty(Rect::new(0, 0, 80, 24));
        let Some(Job::Capture { ticket, path, .. }) = app.take_capture(&frame) else {
            panic!("expected capture job");
        };
        assert!(app.take_capture(&frame).is_none());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("calltime-wrapped-2025-"));
        assert!(name.ends_with(".png"));
        app.complete(Completion {
            ticket,
            outcome: Outcome::Captured(Ok(path)),
        });
        assert_eq!(app.toasts.last().unwrap().title, "Slide downloaded!");
    }

    #[test]
    fn capture_failure_is_a_toast() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('2')));
        assert!(app.toasts.iter().any(|t| t.title.contains("Instagram")));
        let frame = Buffer::empty(Rect::new(0, 0, 80, 24));
        let Some(Job::Capture { ticket, .. }) = app.take_capture(&frame) else {
            panic!("expected capture job");
        };
        app.complete(Completion {
            ticket,
            outcome: Outcome::Captured(Err(RecapError::Capture("disk full".into()))),
        });
        assert_eq!(app.toasts.last().unwrap().title, "Failed to download slide");
        assert!(app.snapshot().is_some());
    }

    #[test]
    fn share_link_and_twitter_emit_links() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('s')));
        let effects = app.handle_key(key(KeyCode::Char('3')));
        match effects.as_slice() {
            [Effect::OpenLink { url, purpose }] => {
                assert_eq!(url, "https://calltime.app/wrapped/u1/2025");
                assert_eq!(*purpose, LinkPurpose::ShareRecap);
            }
            other => panic!("unexpected effects {other:?}"),
        }
        app.link_delivered(LinkPurpose::ShareRecap, Ok(Delivery::Copied));
        assert_eq!(app.toasts.last().unwrap().title, "Link copied to clipboard!");

        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        let effects = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            effects.as_slice(),
            [Effect::OpenLink { purpose: LinkPurpose::Compose, .. }]
        ));
    }

    #[test]
    fn toasts_expire() {
        let mut app = ready();
        app.toast(ToastLevel::Info, "hello", None);
        app.tick(Instant::now());
        assert_eq!(app.toasts.len(), 1);
        app.tick(Instant::now() + TOAST_TTL + Duration::from_millis(1));
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn mouse_drag_past_threshold_swipes() {
        let mut app = ready();
        let strip = ui::screen_layout(app.viewport).strip;
        let row = strip.y + 2;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, row));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, row));
        assert!(app.carousel.is_dragging());
        assert_eq!(app.carousel.drag_offset(), 80.0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, row));
        assert_eq!(app.carousel.index(), 1);
        assert_eq!(app.carousel.drag_offset(), 0.0);
    }

    #[test]
    fn short_mouse_drag_does_not_swipe() {
        let mut app = ready();
        let row = ui::screen_layout(app.viewport).strip.y + 2;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, row));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 36, row));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 36, row));
        assert_eq!(app.carousel.index(), 0);
    }

    #[test]
    fn click_in_right_third_advances() {
        let mut app = ready();
        let row = ui::screen_layout(app.viewport).strip.y + 2;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 75, row));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 75, row));
        assert_eq!(app.carousel.index(), 1);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, row));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, row));
        assert_eq!(app.carousel.index(), 1);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2, row));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 2, row));
        assert_eq!(app.carousel.index(), 0);
    }

    #[test]
    fn mouse_is_ignored_under_overlay() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('s')));
        let row = ui::screen_layout(app.viewport).strip.y + 2;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 75, row));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 75, row));
        assert_eq!(app.carousel.index(), 0);
    }

    #[test]
    fn opening_overlay_mid_drag_cancels_gesture() {
        let mut app = ready();
        let row = ui::screen_layout(app.viewport).strip.y + 2;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, row));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, row));
        assert!(app.carousel.is_dragging());
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.overlay, Overlay::Share);
        assert!(!app.carousel.is_dragging());
        assert_eq!(app.carousel.drag_offset(), 0.0);
        assert_eq!(app.carousel.index(), 0);
        // The release lands under the overlay and is ignored.
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, row));
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.carousel.index(), 1);
    }

    #[test]
    fn gift_dialog_mid_drag_cancels_gesture() {
        let mut app = ready();
        app.handle_key(key(KeyCode::Char('4')));
        let row = ui::screen_layout(app.viewport).strip.y + 2;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, row));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40, row));
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.overlay, Overlay::Gifts);
        assert_eq!(app.carousel.drag_offset(), 0.0);
        app.handle_key(key(KeyCode::Esc));
        // The release of the cancelled drag does nothing.
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, row));
        assert_eq!(app.carousel.index(), 3);
        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.carousel.index(), 0);
    }

    #[test]
    fn shutdown_cancels_in_flight_work() {
        let mut app = App::new(settings());
        let Some(Effect::Spawn(Job::Fetch { token, .. })) = app.start().into_iter().next() else {
            panic!("expected fetch job");
        };
        app.shutdown();
        assert!(token.is_cancelled());
    }

    #[test]
    fn active_fill_grows_to_one() {
        let app = ready();
        let start = app.slide_started;
        assert_eq!(app.active_fill(start), 0.0);
        assert!((app.active_fill(start + SEGMENT_FILL / 2) - 0.5).abs() < 1e-9);
        assert_eq!(app.active_fill(start + SEGMENT_FILL * 2), 1.0);
    }
}
