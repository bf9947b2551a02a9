//! Slide bodies. Each slide paints a full panel into the buffer it is given.

use calltime_core::{RecapSnapshot, SlideKind, SlideVariant};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::present;

pub const YELLOW: Color = Color::Rgb(255, 214, 0);
pub const BLACK: Color = Color::Rgb(17, 17, 17);
pub const CREAM: Color = Color::Rgb(250, 248, 240);
pub const WHITE: Color = Color::Rgb(245, 245, 245);

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
}

pub fn palette(variant: SlideVariant) -> Palette {
    match variant {
        SlideVariant::Default => Palette {
            bg: CREAM,
            fg: BLACK,
            accent: BLACK,
            muted: Color::Rgb(110, 110, 110),
        },
        SlideVariant::Gradient => Palette {
            bg: YELLOW,
            fg: BLACK,
            accent: BLACK,
            muted: Color::Rgb(90, 75, 0),
        },
        SlideVariant::Dark => Palette {
            bg: BLACK,
            fg: WHITE,
            accent: YELLOW,
            muted: Color::Rgb(150, 150, 150),
        },
    }
}

struct Ink {
    p: Palette,
}

impl Ink {
    fn title(&self, text: impl Into<String>) -> Line<'static> {
        Line::from(Span::styled(
            text.into(),
            Style::default().fg(self.p.fg).add_modifier(Modifier::BOLD),
        ))
    }

    fn accent(&self, text: impl Into<String>) -> Line<'static> {
        Line::from(Span::styled(
            text.into(),
            Style::default().fg(self.p.accent).add_modifier(Modifier::BOLD),
        ))
    }

    fn muted(&self, text: impl Into<String>) -> Line<'static> {
        Line::from(Span::styled(text.into(), Style::default().fg(self.p.muted)))
    }

    fn plain(&self, text: impl Into<String>) -> Line<'static> {
        Line::from(Span::styled(text.into(), Style::default().fg(self.p.fg)))
    }

    /// A row of big numbers over a row of labels, one column per tile.
    fn tiles<V: AsRef<str>, L: AsRef<str>>(&self, tiles: &[(V, L)], width: usize) -> [Line<'static>; 2] {
        let values: String = tiles
            .iter()
            .map(|(v, _)| format!("{:^width$}", v.as_ref()))
            .collect();
        let labels: String = tiles
            .iter()
            .map(|(_, l)| format!("{:^width$}", l.as_ref()))
            .collect();
        [self.accent(values), self.muted(labels)]
    }
}

fn blank() -> Line<'static> {
    Line::default()
}

fn lines_for(kind: SlideKind, snapshot: &RecapSnapshot, ink: &Ink) -> Vec<Line<'static>> {
    let year = snapshot.year;
    match kind {
        SlideKind::Welcome => vec![
            ink.plain("🎬"),
            blank(),
            ink.title(format!("Your {year}")),
            ink.title(calltime_core::share::share_title(year).to_uppercase()),
            blank(),
            ink.muted("Let's look back at your year on set"),
        ],
        SlideKind::Stats => {
            let stats = &snapshot.stats;
            let tiles = present::stat_tiles(stats);
            let mut lines = vec![ink.title(kind.title()), blank()];
            lines.extend(ink.tiles(&tiles[..2], 20));
            lines.push(blank());
            lines.extend(ink.tiles(&tiles[2..], 20));
            lines.push(blank());
            lines.extend(present::stat_footnotes(stats).into_iter().map(|l| ink.muted(l)));
            lines
        }
        SlideKind::Archetype => {
            let a = &snapshot.archetype;
            let highlights: Vec<(String, String)> = a
                .stats
                .iter()
                .map(|h| (h.value.to_string(), h.label.clone()))
                .collect();
            let mut lines = vec![
                ink.muted("You are a..."),
                blank(),
                ink.plain(a.kind.badge()),
                ink.accent(a.title.clone()),
                blank(),
                ink.plain(a.description.clone()),
                blank(),
            ];
            lines.extend(ink.tiles(&highlights, 18));
            lines
        }
        SlideKind::Collaborators => {
            let top = snapshot.top_collaborators();
            let mut lines = vec![
                ink.title(kind.title()),
                ink.muted("The people who made your year"),
                blank(),
            ];
            if top.is_empty() {
                lines.push(ink.muted("No collaborators recorded this year."));
            }
            for (i, c) in top.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:>2}  ", i + 1),
                        Style::default().fg(ink.p.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("{:<20}", c.name),
                        Style::default().fg(ink.p.fg).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("{:<26}", c.role), Style::default().fg(ink.p.muted)),
                    Span::styled(
                        format!("{:>8}", present::days(c.days_worked_together)),
                        Style::default().fg(ink.p.fg),
                    ),
                ]));
            }
            lines.push(blank());
            lines.push(ink.accent("🎁 [g] Send Thank You Gifts"));
            lines
        }
        SlideKind::HotSpots => {
            let loc = &snapshot.locations;
            let mut lines = vec![
                ink.title(kind.title()),
                blank(),
                ink.accent(format!("📍 {}", present::primary_location_line(loc))),
                ink.plain(format!("{}% of your shoots", loc.primary_location.percentage)),
                blank(),
            ];
            lines.extend(ink.tiles(&present::hot_spot_tiles(loc), 18));
            lines.push(blank());
            let others: Vec<String> = loc
                .secondary_locations
                .iter()
                .map(|s| format!("{}, {} · {}", s.city, s.state, present::days(s.days_worked)))
                .collect();
            if !others.is_empty() {
                lines.push(ink.muted(others.join("   ")));
            }
            lines.push(ink.muted(format!("{} unique locations", loc.total_unique_locations)));
            lines
        }
        SlideKind::Share => vec![
            ink.plain("🎬"),
            blank(),
            ink.title(format!("That's a Wrap on {year}!")),
            ink.plain("Share your year with the crew"),
            blank(),
            ink.accent("[s] Share"),
            blank(),
            ink.muted(calltime_core::share::hashtag(year)),
        ],
    }
}

/// Paint slide `kind` over the whole of `area`.
pub fn render(kind: SlideKind, snapshot: &RecapSnapshot, area: Rect, buf: &mut Buffer) {
    let p = palette(kind.variant());
    let base = Style::default().bg(p.bg).fg(p.fg);
    Block::default().style(base).render(area, buf);

    let lines = lines_for(kind, snapshot, &Ink { p });
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(base)
        .render(Rect::new(area.x, top, area.width, height), buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltime_client::mock::sample_snapshot;

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            out.push('\n');
        }
        out
    }

    fn rendered(kind: SlideKind) -> (Buffer, String) {
        let snap = sample_snapshot("u1", 2025);
        let mut buf = Buffer::empty(Rect::new(0, 0, 100, 24));
        render(kind, &snap, buf.area, &mut buf);
        let t = text(&buf);
        (buf, t)
    }

    #[test]
    fn stats_slide_shows_formatted_numbers() {
        let (_, t) = rendered(SlideKind::Stats);
        assert!(t.contains("1,524"));
        assert!(t.contains("Days on Set"));
    }

    #[test]
    fn collaborator_slide_lists_names_and_gift_hint() {
        let (_, t) = rendered(SlideKind::Collaborators);
        assert!(t.contains("Sarah Chen"));
        assert!(t.contains("Jordan Matthews"));
        assert!(t.contains("Send Thank You Gifts"));
    }

    #[test]
    fn hot_spots_slide_names_primary_city() {
        let (_, t) = rendered(SlideKind::HotSpots);
        assert!(t.contains("Los Angeles, CA"));
        assert!(t.contains("67% of your shoots"));
    }

    #[test]
    fn dark_slides_fill_background() {
        let (buf, _) = rendered(SlideKind::Archetype);
        assert_eq!(buf.cell((0, 0)).unwrap().bg, BLACK);
        let (buf, _) = rendered(SlideKind::Welcome);
        assert_eq!(buf.cell((0, 0)).unwrap().bg, YELLOW);
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let snap = sample_snapshot("u1", 2025);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        for kind in SlideKind::SEQUENCE {
            render(kind, &snap, buf.area, &mut buf);
        }
    }
}
