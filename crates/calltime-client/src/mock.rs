//! Bundled sample recap used until the backend is connected.

use calltime_core::archetype::classify_archetype;
use calltime_core::{
    CareerStats, Collaborator, HabitData, LocationData, PrimaryLocation, RecapSnapshot,
    SecondaryLocation,
};

pub fn sample_collaborators() -> Vec<Collaborator> {
    [
        ("Sarah Chen", "Director of Photography", 42),
        ("Marcus Johnson", "1st AD", 38),
        ("Elena Rodriguez", "Gaffer", 34),
        ("Alex Kim", "Production Designer", 28),
        ("Jordan Matthews", "Sound Mixer", 25),
    ]
    .into_iter()
    .map(|(name, role, days)| Collaborator {
        name: name.to_string(),
        role: role.to_string(),
        days_worked_together: days,
        avatar_url: None,
    })
    .collect()
}

pub fn sample_snapshot(user_id: &str, year: i32) -> RecapSnapshot {
    let stats = CareerStats {
        days_on_set: 127,
        total_hours: 1524,
        project_count: 12,
        water_bottles_consumed: 381,
        steps_on_set: 892_450,
        power_distro_runs: 67,
        avg_call_time: "7:30 AM".into(),
        earliest_call: "4:15 AM".into(),
        latest_wrap: "11:45 PM".into(),
    };
    RecapSnapshot {
        user_id: user_id.to_string(),
        year,
        archetype: classify_archetype(&stats),
        stats,
        collaborators: sample_collaborators(),
        locations: LocationData {
            primary_location: PrimaryLocation {
                city: "Los Angeles".into(),
                state: "CA".into(),
                percentage: 67,
                days_worked: 85,
            },
            secondary_locations: vec![
                SecondaryLocation {
                    city: "New York".into(),
                    state: "NY".into(),
                    days_worked: 28,
                },
                SecondaryLocation {
                    city: "Atlanta".into(),
                    state: "GA".into(),
                    days_worked: 14,
                },
            ],
            on_location_days: 14,
            total_unique_locations: 8,
        },
        habits: HabitData {
            avg_sleep_hours: 7.2,
            avg_morning_routine: 1.5,
            avg_arrival_early: 0.75,
            most_common_call_time: "7:00 AM".into(),
            no_peel_streak: 8,
        },
    }
}
