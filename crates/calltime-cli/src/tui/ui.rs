use std::time::Instant;

use calltime_core::carousel::{CarouselInput, Segment};
use calltime_core::gifts::{GiftId, GIFT_OPTIONS};
use calltime_core::share::ShareTarget;
use calltime_core::{RecapSnapshot, SlideKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;

use super::app::{App, Overlay, Page, ToastLevel, CELL_PX};
use super::slides::{self, BLACK, YELLOW};

const ARROW_WIDTH: u16 = 3;
const TOAST_WIDTH: u16 = 46;

/// Screen regions of the slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub progress: Rect,
    pub strip: Rect,
    pub nav: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // progress segments
            Constraint::Min(3),    // slides
            Constraint::Length(1), // arrows + dots
            Constraint::Length(1), // status bar
        ])
        .split(area);
    ScreenLayout {
        progress: chunks[0],
        strip: chunks[1],
        nav: chunks[2],
        status: chunks[3],
    }
}

fn prev_arrow(nav: Rect) -> Rect {
    Rect::new(nav.x, nav.y, ARROW_WIDTH.min(nav.width), 1)
}

fn next_arrow(nav: Rect) -> Rect {
    let width = ARROW_WIDTH.min(nav.width);
    Rect::new(nav.right().saturating_sub(width), nav.y, width, 1)
}

/// Left column of each progress dot. Every dot owns two columns.
pub fn dot_columns(nav: Rect, count: usize) -> Vec<u16> {
    let span = (count as u16).saturating_mul(2);
    let start = nav.x + nav.width.saturating_sub(span) / 2;
    (0..count as u16).map(|i| start + i * 2).collect()
}

/// Map a click on the navigation row to a carousel input.
pub fn nav_hit(nav: Rect, count: usize, column: u16, row: u16) -> Option<CarouselInput> {
    if count == 0 || nav.is_empty() || row != nav.y {
        return None;
    }
    let pos = Position::new(column, row);
    if prev_arrow(nav).contains(pos) {
        return Some(CarouselInput::Prev);
    }
    if next_arrow(nav).contains(pos) {
        return Some(CarouselInput::Next);
    }
    dot_columns(nav, count)
        .iter()
        .position(|&c| column == c || column == c + 1)
        .map(CarouselInput::DotClick)
}

/// Render the full TUI frame.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    match &app.page {
        Page::Loading => render_loading(f, app, area),
        Page::Failed(err) => render_failed(f, &err.detail(), area),
        Page::Ready(snapshot) => {
            let layout = screen_layout(area);
            render_progress(f, app, layout.progress);
            render_strip(f.buffer_mut(), app, snapshot, layout.strip);
            if app.carousel.show_swipe_hint() {
                render_swipe_hint(f, layout.strip);
            }
            render_nav(f, app, layout.nav);
            render_status_bar(f, app, layout.status);
            match app.overlay {
                Overlay::Gifts => render_gift_dialog(f, app, area),
                Overlay::Share => render_share_menu(f, app, area),
                Overlay::None => {}
            }
        }
    }
    if !app.capture_pending() {
        render_toasts(f, app, area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    let ticks = Instant::now()
        .saturating_duration_since(app.slide_started)
        .as_millis()
        / 400;
    let dots = ".".repeat((ticks % 4) as usize);
    let lines = vec![
        Line::from("🎬"),
        Line::default(),
        Line::from(Span::styled(
            "Generating Your Wrapped...",
            Style::default().fg(BLACK).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(dots, Style::default().fg(BLACK))),
    ];
    let base = Style::default().bg(YELLOW).fg(BLACK);
    f.render_widget(Block::default().style(base), area);
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).style(base),
        centered(area, area.width, 4),
    );
}

fn render_failed(f: &mut Frame, detail: &str, area: Rect) {
    let lines = vec![
        Line::from("😕"),
        Line::default(),
        Line::from(Span::styled(
            "Oops! Something Went Wrong",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
        Line::from(Span::styled(
            " [r] Try Again ",
            Style::default().fg(BLACK).bg(YELLOW),
        )),
        Line::from(Span::styled("[q] Quit", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(area, area.width, 7),
    );
}

fn render_progress(f: &mut Frame, app: &App, area: Rect) {
    let segments = app.carousel.segments();
    let n = segments.len() as u16;
    if n == 0 || area.width < n * 2 {
        return;
    }
    let width = (area.width - (n - 1)) / n;
    let fill = app.active_fill(Instant::now());
    let done = Style::default().fg(YELLOW);
    let todo = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let filled = match seg {
            Segment::Filled => width,
            Segment::Active => (f64::from(width) * fill).round() as u16,
            Segment::Empty => 0,
        };
        spans.push(Span::styled("━".repeat(filled as usize), done));
        spans.push(Span::styled("━".repeat((width - filled) as usize), todo));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Lay the slides side by side and copy the columns that fall inside the viewport.
fn render_strip(buf: &mut Buffer, app: &App, snapshot: &RecapSnapshot, area: Rect) {
    if area.is_empty() {
        return;
    }
    let width = i32::from(area.width);
    let viewport_px = f32::from(area.width) * CELL_PX;
    let origin = (-app.carousel.translate_x(viewport_px) / CELL_PX).round() as i32;

    for (i, kind) in SlideKind::SEQUENCE.iter().enumerate() {
        let left = i as i32 * width;
        let lo = origin.max(left);
        let hi = (origin + width).min(left + width);
        if lo >= hi {
            continue;
        }
        let mut scratch = Buffer::empty(Rect::new(0, 0, area.width, area.height));
        slides::render(*kind, snapshot, scratch.area, &mut scratch);
        for sx in lo..hi {
            let src_x = (sx - left) as u16;
            let dst_x = area.x + (sx - origin) as u16;
            for y in 0..area.height {
                if let (Some(src), Some(dst)) =
                    (scratch.cell((src_x, y)), buf.cell_mut((dst_x, area.y + y)))
                {
                    *dst = src.clone();
                }
            }
        }
    }
}

fn render_swipe_hint(f: &mut Frame, strip: Rect) {
    if strip.height < 2 {
        return;
    }
    let row = Rect::new(strip.x, strip.bottom() - 1, strip.width, 1);
    let hint = Paragraph::new(Line::from(Span::styled(
        "‹ Swipe or use ← → to explore ›",
        Style::default().fg(BLACK).add_modifier(Modifier::DIM),
    )))
    .alignment(Alignment::Center);
    f.render_widget(hint, row);
}

fn render_nav(f: &mut Frame, app: &App, area: Rect) {
    let enabled = Style::default().fg(YELLOW).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);
    let prev_style = if app.carousel.can_go_prev() { enabled } else { disabled };
    let next_style = if app.carousel.can_go_next() { enabled } else { disabled };
    f.render_widget(
        Paragraph::new(Span::styled(" ◀ ", prev_style)),
        prev_arrow(area),
    );
    f.render_widget(
        Paragraph::new(Span::styled(" ▶ ", next_style)),
        next_arrow(area),
    );

    let count = app.carousel.slide_count();
    let buf = f.buffer_mut();
    for (i, col) in dot_columns(area, count).into_iter().enumerate() {
        let (symbol, style) = if i == app.carousel.index() {
            ("●", Style::default().fg(YELLOW))
        } else {
            ("•", Style::default().fg(Color::DarkGray))
        };
        if let Some(cell) = buf.cell_mut((col, area.y)) {
            cell.set_symbol(symbol).set_style(style);
        }
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let year = app.settings.year;
    let slide = app.current_slide().map(SlideKind::title).unwrap_or_default();
    let position = format!("{}/{}", app.carousel.index() + 1, app.carousel.slide_count());
    let gifts_hint = if app.current_slide() == Some(SlideKind::Collaborators) {
        "  g:gifts"
    } else {
        ""
    };
    let text = format!(
        " Calltime Wrapped {year} | {position} {slide} | ←/→:navigate  1-6:jump{gifts_hint}  s:share  q:quit"
    );
    let bar = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    )));
    f.render_widget(bar, area);
}

fn tier_label(id: GiftId) -> String {
    let option = id.option();
    format!("{} {}", option.name, option.price_label)
}

fn render_gift_dialog(f: &mut Frame, app: &App, area: Rect) {
    let dialog = &app.gifts;
    let height = dialog.collaborators.len() as u16 + 10;
    let popup = centered(area, 72, height);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .title(" Send Thank You Gifts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(YELLOW));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // intro + tiers
            Constraint::Min(1),    // collaborators
            Constraint::Length(3), // totals + actions
        ])
        .split(inner);

    let mut tiers = vec![Span::raw(" ")];
    for (i, option) in GIFT_OPTIONS.iter().enumerate() {
        let style = if option.id == dialog.tier {
            Style::default().fg(BLACK).bg(YELLOW)
        } else {
            Style::default().fg(Color::Gray)
        };
        tiers.push(Span::styled(
            format!(" [{}] {} ", i + 1, tier_label(option.id)),
            style,
        ));
        tiers.push(Span::raw(" "));
    }
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                " Show your appreciation to your top collaborators",
                Style::default().fg(Color::Gray),
            )),
            Line::from(tiers),
        ]),
        chunks[0],
    );

    let items: Vec<ListItem> = dialog
        .collaborators
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let marker = if i == dialog.cursor { "›" } else { " " };
            let choice = dialog
                .selection
                .get(&c.name)
                .map(tier_label)
                .unwrap_or_else(|| "—".to_string());
            let style = if i == dialog.cursor {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {marker} {:<20}", c.name), style),
                Span::styled(format!("{:<24}", c.role), Style::default().fg(Color::Gray)),
                Span::styled(choice, Style::default().fg(YELLOW)),
            ]))
        })
        .collect();
    f.render_widget(List::new(items), chunks[1]);

    let action = if app.is_sending() {
        Span::styled(" Sending... ", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            format!(" [Enter] {} ", dialog.send_label()),
            Style::default().fg(BLACK).bg(YELLOW),
        )
    };
    let footer = vec![
        Line::from(format!(
            " {}    Total: {}",
            dialog.counter_label(),
            dialog.total_label()
        )),
        Line::from(Span::styled(
            format!(
                " a:all ({})  c:clear  1-3:pick  0:remove  ←/→:tier  Esc:close",
                dialog.tier.option().name
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![Span::raw(" "), action]),
    ];
    f.render_widget(Paragraph::new(footer), chunks[2]);
}

fn render_share_menu(f: &mut Frame, app: &App, area: Rect) {
    let popup = centered(area, 34, ShareTarget::ALL.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let items: Vec<ListItem> = ShareTarget::ALL
        .iter()
        .enumerate()
        .map(|(i, target)| {
            let style = if i == app.share_cursor {
                Style::default().fg(BLACK).bg(YELLOW)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {} {}", i + 1, target.label()),
                style,
            )))
        })
        .collect();
    let title = if app.is_capturing() {
        " Share (capturing…) "
    } else {
        " Share "
    };
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(YELLOW)),
    );
    f.render_widget(list, popup);
}

fn render_toasts(f: &mut Frame, app: &App, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y + 1;
    for toast in app.toasts.iter().rev().take(3) {
        let height = if toast.detail.is_some() { 4 } else { 3 };
        if y + height > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, height);
        let color = match toast.level {
            ToastLevel::Info => Color::Cyan,
            ToastLevel::Success => Color::Green,
            ToastLevel::Error => Color::Red,
        };
        let mut lines = vec![Line::from(Span::styled(
            toast.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if let Some(detail) = &toast.detail {
            lines.push(Line::from(Span::styled(
                detail.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            rect,
        );
        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use calltime_client::mock::sample_snapshot;
    use calltime_core::RecapError;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::tui::app::{Effect, Settings};
    use crate::tui::tasks::{Completion, Job, Outcome};

    fn app_with(result: Result<RecapSnapshot, RecapError>) -> App {
        let mut app = App::new(Settings {
            user_id: "u1".into(),
            year: 2025,
            share_base_url: "https://calltime.app/wrapped".into(),
            download_dir: PathBuf::from("/tmp"),
        });
        app.viewport = Rect::new(0, 0, 100, 30);
        let Some(Effect::Spawn(Job::Fetch { ticket, .. })) = app.start().into_iter().next() else {
            panic!("expected fetch job");
        };
        app.complete(Completion {
            ticket,
            outcome: Outcome::Fetched(result),
        });
        app
    }

    fn ready() -> App {
        app_with(Ok(sample_snapshot("u1", 2025)))
    }

    fn draw(app: &App) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            out.push('\n');
        }
        out
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::empty()));
    }

    #[test]
    fn nav_hit_maps_arrows_and_dots() {
        let nav = Rect::new(0, 20, 80, 1);
        assert_eq!(nav_hit(nav, 6, 1, 20), Some(CarouselInput::Prev));
        assert_eq!(nav_hit(nav, 6, 78, 20), Some(CarouselInput::Next));
        let dots = dot_columns(nav, 6);
        assert_eq!(dots.len(), 6);
        assert_eq!(nav_hit(nav, 6, dots[3], 20), Some(CarouselInput::DotClick(3)));
        assert_eq!(nav_hit(nav, 6, dots[3], 19), None);
        assert_eq!(nav_hit(nav, 6, 20, 20), None);
        assert_eq!(nav_hit(nav, 0, 1, 20), None);
    }

    #[test]
    fn loading_page_shows_placeholder() {
        let mut app = App::new(Settings {
            user_id: "u1".into(),
            year: 2025,
            share_base_url: String::new(),
            download_dir: PathBuf::from("/tmp"),
        });
        app.start();
        assert!(text(&draw(&app)).contains("Generating Your Wrapped..."));
    }

    #[test]
    fn failed_page_offers_retry() {
        let app = app_with(Err(RecapError::Fetch("offline".into())));
        let t = text(&draw(&app));
        assert!(t.contains("Oops! Something Went Wrong"));
        assert!(t.contains("Try Again"));
    }

    #[test]
    fn first_slide_shows_swipe_hint_and_disabled_prev() {
        let app = ready();
        let buf = draw(&app);
        let t = text(&buf);
        assert!(t.contains("Swipe"));
        assert!(t.contains("1/6"));
        let nav = screen_layout(buf.area).nav;
        assert_eq!(buf.cell((nav.x + 1, nav.y)).unwrap().fg, Color::DarkGray);
        assert_eq!(buf.cell((nav.right() - 2, nav.y)).unwrap().fg, YELLOW);
    }

    #[test]
    fn later_slides_hide_swipe_hint() {
        let mut app = ready();
        press(&mut app, KeyCode::Right);
        let t = text(&draw(&app));
        assert!(!t.contains("Swipe"));
        assert!(t.contains("Your Year in Numbers"));
        assert!(t.contains("2/6"));
    }

    #[test]
    fn last_slide_disables_next_arrow() {
        let mut app = ready();
        press(&mut app, KeyCode::End);
        let buf = draw(&app);
        let nav = screen_layout(buf.area).nav;
        assert_eq!(buf.cell((nav.right() - 2, nav.y)).unwrap().fg, Color::DarkGray);
        assert!(text(&buf).contains("That's a Wrap on 2025!"));
    }

    #[test]
    fn progress_segments_follow_index() {
        let mut app = ready();
        press(&mut app, KeyCode::Char('3'));
        let buf = draw(&app);
        let progress = screen_layout(buf.area).progress;
        let width = (progress.width - 5) / 6;
        let last = progress.x + 5 * (width + 1);
        // First segment is filled, last is empty.
        assert_eq!(buf.cell((progress.x, progress.y)).unwrap().fg, YELLOW);
        assert_eq!(buf.cell((last, progress.y)).unwrap().fg, Color::DarkGray);
    }

    #[test]
    fn drag_shows_neighbouring_slide() {
        let mut app = ready();
        app.navigate(CarouselInput::TouchStart { x: 400.0 });
        app.navigate(CarouselInput::TouchMove { x: 0.0 });
        let buf = draw(&app);
        let strip = screen_layout(buf.area).strip;
        // Welcome (yellow) on the left, stats (cream) pulled in from the right.
        assert_eq!(buf.cell((strip.x, strip.y)).unwrap().bg, YELLOW);
        assert_eq!(buf.cell((strip.right() - 1, strip.y)).unwrap().bg, slides::CREAM);
    }

    #[test]
    fn gift_dialog_shows_counter_and_send_label() {
        let mut app = ready();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('2'));
        let t = text(&draw(&app));
        assert!(t.contains("Send Thank You Gifts"));
        assert!(t.contains("1 of 5 selected"));
        assert!(t.contains("Send 1 Gift"));
        assert!(t.contains("Total: $19"));
    }

    #[test]
    fn share_menu_lists_targets() {
        let mut app = ready();
        press(&mut app, KeyCode::Char('s'));
        let t = text(&draw(&app));
        for target in ShareTarget::ALL {
            assert!(t.contains(target.label()));
        }
    }

    #[test]
    fn toasts_hidden_while_capture_pending() {
        let mut app = ready();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('1'));
        assert!(!text(&draw(&app)).contains("Generating image"));
        app.take_capture(&Buffer::empty(Rect::new(0, 0, 1, 1)));
        assert!(text(&draw(&app)).contains("Generating image"));
    }
}
