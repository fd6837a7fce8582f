use crate::components::google_calendar::models::CalendarEvent;
use tracing::{debug, warn};

/// Half-width and full-width (U+3000) spaces
const SPACES: [char; 2] = [' ', '\u{3000}'];

/// Strip every half-width and full-width space from a name
pub fn normalize_name(name: &str) -> String {
    name.chars().filter(|c| !SPACES.contains(c)).collect()
}

/// Find the event whose title contains `user_name`, ignoring spaces.
///
/// Containment, not equality: "Yamada" also matches "Yamada Taro[deleted]".
/// When several events match, the last one in list order wins.
pub fn find_own_shift<'a>(events: &'a [CalendarEvent], user_name: &str) -> Option<&'a CalendarEvent> {
    let needle = normalize_name(user_name);
    if needle.is_empty() {
        return None;
    }

    let matches: Vec<&CalendarEvent> = events
        .iter()
        .filter(|event| normalize_name(event.title()).contains(&needle))
        .collect();

    if matches.len() > 1 {
        warn!(
            "{} events match {:?} today, using the last one ({:?})",
            matches.len(),
            user_name,
            matches.last().map(|e| e.title())
        );
    }

    let found = matches.last().copied();
    debug!("Own shift for {:?}: {:?}", user_name, found.map(|e| e.title()));
    found
}

/// Titles of every event starting exactly at `start`, in list order.
///
/// Only precise timestamps are compared, as strings; all-day events and an
/// empty `start` never match.
pub fn same_shift_members(events: &[CalendarEvent], start: &str) -> Vec<String> {
    if start.is_empty() {
        return Vec::new();
    }

    events
        .iter()
        .filter(|event| event.precise_start() == Some(start))
        .map(|event| event.title().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(title: &str, start: &str) -> CalendarEvent {
        CalendarEvent {
            summary: Some(title.to_string()),
            start_date_time: Some(start.to_string()),
            ..Default::default()
        }
    }

    fn all_day(title: &str, date: &str) -> CalendarEvent {
        CalendarEvent {
            summary: Some(title.to_string()),
            start_date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn day() -> Vec<CalendarEvent> {
        vec![
            timed("Yamada Taro", "2024-01-09T13:00:00+09:00"),
            timed("Sato Jiro", "2024-01-09T13:00:00+09:00"),
            timed("Suzuki", "2024-01-09T15:00:00+09:00"),
        ]
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("山田 太郎"), "山田太郎");
        assert_eq!(normalize_name("山田\u{3000}太郎"), "山田太郎");
        assert_eq!(normalize_name(" Yamada  Taro "), "YamadaTaro");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_normalize_name_is_idempotent() {
        for name in ["山田 太郎", "山田\u{3000}太郎", "山田太郎[削除]", "  "] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn test_find_own_shift() {
        let events = day();
        let found = find_own_shift(&events, "Yamada").unwrap();
        assert_eq!(found.title(), "Yamada Taro");
    }

    #[test]
    fn test_find_own_shift_ignores_spaces() {
        let events = vec![timed("山田\u{3000}太郎", "2024-01-09T13:00:00+09:00")];
        assert!(find_own_shift(&events, "山田 太郎").is_some());
        assert!(find_own_shift(&events, "山田太郎").is_some());
    }

    #[test]
    fn test_find_own_shift_is_substring_match() {
        let events = vec![timed("Yamada Taro[deleted]", "2024-01-09T13:00:00+09:00")];
        assert!(find_own_shift(&events, "Yamada").is_some());
    }

    #[test]
    fn test_find_own_shift_last_match_wins() {
        let events = vec![
            timed("Yamada Taro", "2024-01-09T09:00:00+09:00"),
            timed("Suzuki", "2024-01-09T11:00:00+09:00"),
            timed("Yamada Taro", "2024-01-09T17:00:00+09:00"),
        ];
        let found = find_own_shift(&events, "Yamada").unwrap();
        assert_eq!(found.start_date_time.as_deref(), Some("2024-01-09T17:00:00+09:00"));
    }

    #[test]
    fn test_find_own_shift_no_match() {
        assert!(find_own_shift(&[], "Yamada").is_none());
        assert!(find_own_shift(&day(), "Tanaka").is_none());
        assert!(find_own_shift(&day(), " \u{3000} ").is_none());
    }

    #[test]
    fn test_same_shift_members() {
        let members = same_shift_members(&day(), "2024-01-09T13:00:00+09:00");
        assert_eq!(members, vec!["Yamada Taro", "Sato Jiro"]);
    }

    #[test]
    fn test_same_shift_members_keeps_original_titles() {
        let events = vec![
            timed("山田\u{3000}太郎", "2024-01-09T13:00:00+09:00"),
            timed("佐藤 次郎[削除]", "2024-01-09T13:00:00+09:00"),
        ];
        let members = same_shift_members(&events, "2024-01-09T13:00:00+09:00");
        assert_eq!(members, vec!["山田\u{3000}太郎", "佐藤 次郎[削除]"]);
    }

    #[test]
    fn test_same_shift_members_is_string_equality() {
        // Same instant, different offset spelling
        let events = vec![timed("Sato", "2024-01-09T04:00:00Z")];
        assert!(same_shift_members(&events, "2024-01-09T13:00:00+09:00").is_empty());
    }

    #[test]
    fn test_same_shift_members_excludes_all_day_events() {
        let events = vec![
            all_day("Holiday", "2024-01-09"),
            timed("Sato", "2024-01-09T13:00:00+09:00"),
            CalendarEvent {
                summary: Some("Blank".to_string()),
                start_date_time: Some(String::new()),
                ..Default::default()
            },
        ];
        assert_eq!(
            same_shift_members(&events, "2024-01-09T13:00:00+09:00"),
            vec!["Sato"]
        );
        assert!(same_shift_members(&events, "2024-01-09").is_empty());
        assert!(same_shift_members(&events, "").is_empty());
    }
}
