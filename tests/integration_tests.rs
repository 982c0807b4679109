// Integration tests for nearby-events

use chrono::{NaiveDate, TimeZone, Utc};
use nearby_events::core::{rank_nearby, NearbyDefaults, NearbyFinder, NearbyQuery};
use nearby_events::models::{Candidate, EventRecord, GeoPoint};

fn create_test_event(id: &str, lat: Option<f64>, lng: Option<f64>, day: u32) -> EventRecord {
    EventRecord {
        id: id.to_string(),
        title: Some(format!("Event {}", id)),
        description: None,
        owner_name: None,
        location_name: Some("Salon".to_string()),
        city: None,
        address: None,
        images: None,
        start_date: Some(Utc.with_ymd_and_hms(2025, 7, day, 16, 0, 0).unwrap()),
        end_date: None,
        start_time: Some("19:00".to_string()),
        end_time: None,
        price_type: Some("paid".to_string()),
        lat,
        lng,
        is_visible: true,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
}

const ISTANBUL: GeoPoint = GeoPoint { latitude: 41.0082, longitude: 28.9784 };

/// Deterministic spread of points around Istanbul
fn scattered(count: usize) -> Vec<EventRecord> {
    (0..count)
        .map(|i| {
            let lat = 41.0082 + ((i * 37) % 200) as f64 * 0.01 - 1.0;
            let lng = 28.9784 + ((i * 53) % 200) as f64 * 0.01 - 1.0;
            create_test_event(&i.to_string(), Some(lat), Some(lng), 10)
        })
        .collect()
}

#[test]
fn test_integration_end_to_end_nearby() {
    let finder = NearbyFinder::with_default_settings();

    let events = vec![
        create_test_event("kadikoy", Some(40.9917), Some(29.0270), 5),
        create_test_event("besiktas", Some(41.0422), Some(29.0083), 6),
        create_test_event("ankara", Some(39.9334), Some(32.8597), 6),
        create_test_event("no-coords", None, None, 6),
        create_test_event("string-coords", None, Some(29.0), 6),
    ];

    let result = finder
        .find_nearby(ISTANBUL, &events, NearbyQuery::default(), today())
        .unwrap();

    let ids: Vec<_> = result.events.iter().map(|e| e.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["kadikoy", "besiktas"]);

    for pair in result.events.windows(2) {
        assert!(pair[0].distance_km <= pair[1].distance_km, "Results not sorted by distance");
    }
}

#[test]
fn test_istanbul_ankara_scenario() {
    let ankara = vec![create_test_event("ankara", Some(39.9334), Some(32.8597), 6)];

    let near = rank_nearby(ISTANBUL, &ankara, 50.0, 5).unwrap();
    assert!(near.is_empty());

    let far = rank_nearby(ISTANBUL, &ankara, 400.0, 5).unwrap();
    assert_eq!(far.len(), 1);
    assert!((far[0].distance_km - 349.0).abs() < 2.0, "got {}", far[0].distance_km);
}

#[test]
fn test_radius_growth_is_monotonic() {
    let events = scattered(200);
    let mut previous: Vec<String> = Vec::new();

    for radius in [5.0, 20.0, 50.0, 100.0, 150.0, 400.0] {
        let current: Vec<String> = rank_nearby(ISTANBUL, &events, radius, usize::MAX)
            .unwrap()
            .into_iter()
            .map(|r| r.candidate.id.clone())
            .collect();

        for id in &previous {
            assert!(current.contains(id), "{} dropped when radius grew to {}", id, radius);
        }
        previous = current;
    }
}

#[test]
fn test_limit_and_ordering_properties() {
    let events = scattered(150);
    let qualifying = rank_nearby(ISTANBUL, &events, 80.0, usize::MAX).unwrap().len();

    for limit in [0, 1, 3, 10, 500] {
        let result = rank_nearby(ISTANBUL, &events, 80.0, limit).unwrap();

        assert!(result.len() <= limit);
        assert!(result.len() <= qualifying);
        for pair in result.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }
}

#[test]
fn test_nan_coordinates_never_ranked() {
    let mut events = scattered(20);
    events.push(create_test_event("nan", Some(f64::NAN), Some(28.9784), 10));
    events.push(create_test_event("missing", Some(41.0082), None, 10));

    let result = rank_nearby(ISTANBUL, &events, f64::INFINITY, usize::MAX).unwrap();

    assert_eq!(result.len(), 20);
    assert!(result.iter().all(|r| r.candidate.geo_point().is_some()));
}

#[test]
fn test_symmetry_across_scatter() {
    let events = scattered(50);
    for event in &events {
        let point = event.geo_point().unwrap();
        let forward = ISTANBUL.distance_km(&point);
        let backward = point.distance_km(&ISTANBUL);
        assert!((forward - backward).abs() <= forward.max(1.0) * 1e-9);
    }
}

#[test]
fn test_max_limit_enforcement() {
    let finder = NearbyFinder::new(NearbyDefaults {
        max_limit: 10,
        ..NearbyDefaults::default()
    });

    let query = NearbyQuery {
        radius_km: Some(500.0),
        limit: Some(1000),
    };
    let result = finder.find_nearby(ISTANBUL, &scattered(50), query, today()).unwrap();

    assert_eq!(result.events.len(), 10, "Should not exceed limit of 10");
}
