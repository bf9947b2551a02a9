//! Display strings shared by the plain-text output and the interactive slides.

use calltime_core::{CareerStats, LocationData, RecapSnapshot, SlideKind};

/// `1524` -> `1,524`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

/// The four headline numbers of the stats slide as `(value, label)`.
pub fn stat_tiles(stats: &CareerStats) -> [(String, &'static str); 4] {
    [
        (thousands(stats.days_on_set.into()), "Days on Set"),
        (thousands(stats.total_hours.into()), "Total Hours"),
        (thousands(stats.project_count.into()), "Projects"),
        (thousands(stats.water_bottles_consumed.into()), "Water Bottles"),
    ]
}

/// Secondary facts under the stats grid.
pub fn stat_footnotes(stats: &CareerStats) -> Vec<String> {
    vec![
        format!("Average call time {}", stats.avg_call_time),
        format!(
            "Earliest call {} · Latest wrap {}",
            stats.earliest_call, stats.latest_wrap
        ),
        format!(
            "{} steps on set · {} power distro runs",
            thousands(stats.steps_on_set),
            thousands(stats.power_distro_runs.into())
        ),
    ]
}

/// Day counts under the hot-spot map as `(value, label)`.
pub fn hot_spot_tiles(locations: &LocationData) -> Vec<(String, String)> {
    let mut tiles = vec![(
        locations.primary_location.days_worked.to_string(),
        format!("Days in {}", locations.primary_location.city),
    )];
    if let Some(second) = locations.secondary_locations.first() {
        tiles.push((second.days_worked.to_string(), format!("Days in {}", second.city)));
    }
    tiles.push((locations.on_location_days.to_string(), "On Location".to_string()));
    tiles
}

pub fn primary_location_line(locations: &LocationData) -> String {
    let p = &locations.primary_location;
    format!("{}, {}", p.city, p.state)
}

/// Plain-text rendering of one slide.
pub fn slide_lines(kind: SlideKind, snapshot: &RecapSnapshot) -> Vec<String> {
    let year = snapshot.year;
    let mut lines = vec![format!("── {} ──", kind.title())];
    match kind {
        SlideKind::Welcome => {
            lines.push(format!("Your {year}"));
            lines.push(calltime_core::share::share_title(year));
            lines.push("Let's look back at your year on set.".to_string());
        }
        SlideKind::Stats => {
            for (value, label) in stat_tiles(&snapshot.stats) {
                lines.push(format!("{value:>8}  {label}"));
            }
            lines.extend(stat_footnotes(&snapshot.stats));
        }
        SlideKind::Archetype => {
            let a = &snapshot.archetype;
            lines.push(format!("{} {}", a.kind.badge(), a.title));
            lines.push(a.description.clone());
            for h in &a.stats {
                lines.push(format!("{:>8}  {}", h.value, h.label));
            }
        }
        SlideKind::Collaborators => {
            let top = snapshot.top_collaborators();
            if top.is_empty() {
                lines.push("No collaborators recorded this year.".to_string());
            }
            for (i, c) in top.iter().enumerate() {
                lines.push(format!(
                    "{}. {} ({}) · {} together",
                    i + 1,
                    c.name,
                    c.role,
                    days(c.days_worked_together)
                ));
            }
        }
        SlideKind::HotSpots => {
            let p = &snapshot.locations.primary_location;
            lines.push(format!(
                "📍 {} · {}% of your shoots",
                primary_location_line(&snapshot.locations),
                p.percentage
            ));
            for (value, label) in hot_spot_tiles(&snapshot.locations) {
                lines.push(format!("{value:>8}  {label}"));
            }
            lines.push(format!(
                "{} unique locations",
                snapshot.locations.total_unique_locations
            ));
        }
        SlideKind::Share => {
            lines.push(format!("That's a Wrap on {year}!"));
            lines.push("Share your year with the crew.".to_string());
            lines.push(calltime_core::share::hashtag(year));
        }
    }
    lines
}
