//! End-to-end controller scenarios against in-memory surfaces.

mod common;

use std::time::Duration;

use common::{controller_for, north_of, sample_dataset, write_dataset, Denied, NeverAnswers};
use shelterfinder_lib::{
    walking_minutes, AppConfig, AppController, DatasetSource, Error, FixedLocation, GeoPoint,
    LocationError, LocationProvider, MemoryList, MemoryMap, MemoryStatus, NoLocation,
    PositionSource, StatusKind, DEFAULT_POSITION,
};
use tempfile::tempdir;

const USER: GeoPoint = GeoPoint::new(39.7000, 141.1500);

#[tokio::test]
async fn three_shelters_are_ranked_by_distance() {
    let dir = tempdir().unwrap();
    let at = |km: f64| north_of(USER, km);
    let rows = [
        format!("one km,addr 1,{},{},,", at(1.0).lat, at(1.0).lng),
        format!("five km,addr 5,{},{},,", at(5.0).lat, at(5.0).lng),
        format!("two km,addr 2,{},{},,", at(1.9999).lat, at(1.9999).lng),
    ];
    let path = write_dataset(dir.path(), &rows);
    let mut app = controller_for(DatasetSource::file(path));

    let report = app.start(&FixedLocation(USER)).await.expect("startup");
    assert_eq!(report.rendered, 3);
    assert!(!report.is_degraded());

    let cards = app.list().cards();
    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["one km", "two km", "five km"]);
    assert!((cards[1].distance_km - 2.0).abs() < 1e-3);
    assert_eq!(cards[1].walking_minutes, 30);
    assert_eq!(cards[1].walking_label, "about 30 min walk");
    assert_eq!(cards[1].distance_label, "2.00 km");
    assert_eq!(walking_minutes(2.0), 30);
}

#[tokio::test]
async fn device_fix_centers_map_and_reports_count() {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    let report = app.start(&FixedLocation(USER)).await.expect("startup");

    assert_eq!(report.shelters_loaded, 6);
    assert_eq!(report.position.source, PositionSource::Device);
    assert_eq!(app.map().center(), Some(USER));
    assert_eq!(app.map().zoom(), Some(14));

    let user_markers = app.map().user_markers();
    assert_eq!(user_markers.len(), 1);
    assert_eq!(app.map().open_popup_marker(), Some(user_markers[0]));
    assert_eq!(app.map().popup(user_markers[0]), Some("<b>Current location</b>"));

    let status = app.status().current().expect("status shown");
    assert_eq!(status.kind, StatusKind::Info);
    assert_eq!(status.text, "Showing the 6 shelters nearest to your location");
}

#[tokio::test(start_paused = true)]
async fn location_timeout_falls_back_to_default_position() {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    let report = app.start(&NeverAnswers).await.expect("startup still succeeds");

    assert!(report.is_degraded());
    assert_eq!(report.position.point, DEFAULT_POSITION);
    assert_eq!(
        report.location_error,
        Some(LocationError::Timeout {
            timeout: Duration::from_secs(10)
        })
    );
    assert_eq!(report.rendered, 6);
    assert_eq!(app.list().cards().len(), 6);

    let status = app.status().current().unwrap();
    assert_eq!(status.kind, StatusKind::Degraded);
    assert_eq!(
        status.text,
        "Your location could not be determined. Showing shelters around the Iwate Prefectural Office."
    );
    // overview zoom is kept when the fix failed
    assert_eq!(app.map().zoom(), Some(10));
}

#[tokio::test]
async fn every_location_failure_takes_the_degraded_path() {
    for outcome in [
        app_with_provider_result(&NoLocation).await,
        app_with_provider_result(&Denied).await,
    ] {
        let (error, kind, source) = outcome;
        assert!(error.is_some());
        assert_eq!(kind, StatusKind::Degraded);
        assert_eq!(source, PositionSource::Fallback);
    }
}

async fn app_with_provider_result<P: LocationProvider>(
    provider: &P,
) -> (Option<LocationError>, StatusKind, PositionSource) {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    let report = app.start(provider).await.expect("startup");
    let kind = app.status().current().unwrap().kind;
    (report.location_error, kind, report.position.source)
}

#[tokio::test]
async fn missing_dataset_halts_before_map_is_created() {
    let mut app = controller_for(DatasetSource::file("/nonexistent/03000_1.csv"));
    let err = app
        .start(&FixedLocation(USER))
        .await
        .expect_err("dataset is required");

    assert!(matches!(err, Error::DataFetch { .. }));
    assert!(!app.map().is_created());
    assert_eq!(app.map().markers().count(), 0);
    assert!(app.list().cards().is_empty());
    let status = app.status().current().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.starts_with("An error occurred: "));
    assert!(app.position().is_none());
}

#[tokio::test]
async fn dataset_without_usable_rows_is_fatal() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), &["broken,addr,,,,".to_string()]);
    let mut app = controller_for(DatasetSource::file(path));

    let err = app.start(&FixedLocation(USER)).await.expect_err("no rows");
    assert!(matches!(err, Error::DataParse { .. }));
    assert_eq!(app.status().current().unwrap().kind, StatusKind::Error);
    assert!(!app.map().is_created());
}

#[test]
fn recenter_without_position_leaves_map_alone() {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    let err = app.recenter().expect_err("no position yet");

    assert!(matches!(err, Error::NoPosition));
    assert_eq!(
        app.status().notices(),
        &["Your current location has not been determined yet.".to_string()]
    );
    assert_eq!(app.map().center(), None);
}

#[tokio::test]
async fn recenter_returns_to_user_and_reopens_popup() {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    app.start(&FixedLocation(USER)).await.unwrap();
    app.select_list_entry(3).expect("entry exists");
    assert_eq!(app.map().zoom(), Some(16));

    assert_eq!(app.recenter().unwrap(), USER);
    assert_eq!(app.map().center(), Some(USER));
    assert_eq!(app.map().zoom(), Some(14));
    assert_eq!(app.map().open_popup_marker(), Some(app.map().user_markers()[0]));
}

#[tokio::test]
async fn relocating_reranks_without_leaking_markers() {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    app.start(&FixedLocation(USER)).await.unwrap();
    let first_nearest = app.list().cards()[0].name.clone();

    // far south, near 見前
    let south = GeoPoint::new(39.6300, 141.1530);
    let rendered = app.relocate(south).unwrap();

    assert_eq!(rendered, 6);
    assert_eq!(app.map().shelter_markers().len(), 6);
    assert_eq!(app.map().user_markers().len(), 1);
    assert_eq!(app.list().cards()[0].name, "盛岡市立見前小学校");
    assert_ne!(app.list().cards()[0].name, first_nearest);

    let expected = south.distance_km(&app.shelters()[0].position());
    assert_eq!(app.shelters()[0].distance_km, Some(expected));
    let distances: Vec<f64> = app.list().cards().iter().map(|c| c.distance_km).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn reloading_dataset_reranks_rendered_entries() {
    let dir = tempdir().unwrap();
    let near = north_of(USER, 0.5);
    let far = north_of(USER, 3.0);
    let rows = [
        format!("old far,addr,{},{},,", far.lat, far.lng),
        format!("old near,addr,{},{},,", near.lat, near.lng),
        format!("old mid,addr,{},{},,", USER.lat, USER.lng + 0.02),
    ];
    let path = write_dataset(dir.path(), &rows);
    let mut app = controller_for(DatasetSource::file(path));
    app.start(&FixedLocation(USER)).await.unwrap();
    assert_eq!(app.map().shelter_markers().len(), 3);

    let rows = [
        format!("new far,addr,{},{},,", far.lat, far.lng),
        format!("new near,addr,{},{},,", near.lat, near.lng),
    ];
    write_dataset(dir.path(), &rows);
    assert_eq!(app.load_dataset().await.unwrap(), 2);

    assert_eq!(app.map().shelter_markers().len(), 2);
    assert_eq!(app.map().user_markers().len(), 1);
    let cards = app.list().cards();
    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["new near", "new far"]);

    let snapshot = app.snapshot();
    assert_eq!(snapshot.shelters.len(), 2);
    assert_eq!(snapshot.shelters[0].name, "new near");
    assert!((snapshot.shelters[0].distance_km - 0.5).abs() < 1e-3);
    assert!((snapshot.shelters[1].distance_km - 3.0).abs() < 1e-3);
}

#[tokio::test]
async fn loading_dataset_before_start_renders_nothing() {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    assert_eq!(app.load_dataset().await.unwrap(), 6);

    assert_eq!(app.map().markers().count(), 0);
    assert!(app.list().cards().is_empty());
    assert!(app.snapshot().shelters.is_empty());
}

#[tokio::test]
async fn selection_is_synchronized_both_ways() {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    app.start(&FixedLocation(USER)).await.unwrap();

    let marker = app.select_list_entry(2).expect("entry 2");
    assert_eq!(app.list().highlighted(), Some(2));
    assert_eq!(app.map().open_popup_marker(), Some(marker));

    let first = app.presentation().marker_at(0).unwrap();
    assert_eq!(app.select_marker(first), Some(0));
    assert_eq!(app.list().highlighted(), Some(0));
    assert_eq!(app.list().scrolled_to(), Some(0));
    assert_eq!(app.snapshot().selected, Some(0));
}

#[tokio::test]
async fn limit_truncates_rendered_entries() {
    let mut config = AppConfig::new(DatasetSource::file(sample_dataset()));
    config.max_shelters = 2;
    let mut app = AppController::new(
        config,
        MemoryMap::default(),
        MemoryList::default(),
        MemoryStatus::default(),
    );

    let report = app.start(&FixedLocation(USER)).await.unwrap();
    assert_eq!(report.rendered, 2);
    assert_eq!(report.shelters_loaded, 6);
    assert_eq!(app.map().shelter_markers().len(), 2);
    assert_eq!(
        app.status().current().unwrap().text,
        "Showing the 2 shelters nearest to your location"
    );
}

#[tokio::test]
async fn snapshot_serializes_session() {
    let mut app = controller_for(DatasetSource::file(sample_dataset()));
    app.start(&FixedLocation(USER)).await.unwrap();

    let json = serde_json::to_value(app.snapshot()).expect("serialize");
    assert_eq!(json["locale"], "en");
    assert_eq!(json["status"]["kind"], "info");
    assert_eq!(json["position"]["source"], "device");
    assert_eq!(json["position"]["lat"], 39.7);
    assert_eq!(json["shelters_loaded"], 6);
    assert_eq!(json["shelters"].as_array().unwrap().len(), 6);
    assert_eq!(json["shelters"][0]["rank"], 1);
}
