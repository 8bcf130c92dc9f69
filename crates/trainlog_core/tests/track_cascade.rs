use trainlog_core::{
    open_store_in_memory, DataRepository, LocationData, NullObserver, Record, RecordType,
    RepoError, Track,
};

fn repo() -> DataRepository {
    DataRepository::new(open_store_in_memory().unwrap(), Box::new(NullObserver))
}

fn track_with(name: &str, locations: Vec<LocationData>) -> Track {
    let mut track = Track::new(name);
    track.locations = locations;
    track
}

#[test]
fn insert_persists_track_and_children_in_order() {
    let repo = repo();
    let first = LocationData::new(1_700_000_000_000, 50.10, 8.60);
    let second = LocationData::new(1_700_000_015_000, 50.11, 8.61);
    let track = track_with("morning loop", vec![first.clone(), second.clone()]);

    repo.add(&Record::from(track.clone())).unwrap();

    let loaded = match repo.find_by_uuid(RecordType::Track, &track.uuid) {
        Some(Record::Track(loaded)) => loaded,
        other => panic!("expected a track, got {other:?}"),
    };
    assert_eq!(loaded.name, "morning loop");
    assert_eq!(loaded.locations.len(), 2);
    assert_eq!(loaded.locations[0], first);
    assert_eq!(loaded.locations[1], second);
}

#[test]
fn insert_with_already_stored_location_rolls_back_completely() {
    let repo = repo();
    let owned = LocationData::new(1_700_000_000_000, 50.10, 8.60);
    let first_track = track_with("first", vec![owned.clone()]);
    repo.add(&Record::from(first_track.clone())).unwrap();

    // second track claims a fresh sample plus one that is already stored
    let fresh = LocationData::new(1_700_000_030_000, 50.12, 8.62);
    let second_track = track_with("second", vec![fresh.clone(), owned.clone()]);

    let err = repo.add(&Record::from(second_track.clone())).unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateChildRecord { record_type: RecordType::LocationData, identity } if identity == owned.uuid
    ));

    // the fresh sample inserted before the duplicate was hit is gone again
    assert!(repo
        .find_by_uuid(RecordType::LocationData, &fresh.uuid)
        .is_none());
    assert!(repo
        .find_by_uuid(RecordType::Track, &second_track.uuid)
        .is_none());

    // the first track and its sample are untouched
    assert!(repo
        .find_by_uuid(RecordType::Track, &first_track.uuid)
        .is_some());
    assert!(repo
        .find_by_uuid(RecordType::LocationData, &owned.uuid)
        .is_some());
}

#[test]
fn update_upserts_changed_and_new_locations() {
    let repo = repo();
    let mut location = LocationData::new(1_700_000_000_000, 50.10, 8.60);
    let mut track = track_with("loop", vec![location.clone()]);
    repo.add(&Record::from(track.clone())).unwrap();

    location.latitude = 50.20;
    let appended = LocationData::new(1_700_000_045_000, 50.13, 8.63);
    track.locations = vec![location.clone(), appended.clone()];
    track.name = "extended loop".to_string();

    repo.update(&Record::from(track.clone())).unwrap();

    let loaded = match repo.find_by_uuid(RecordType::Track, &track.uuid) {
        Some(Record::Track(loaded)) => loaded,
        other => panic!("expected a track, got {other:?}"),
    };
    assert_eq!(loaded.name, "extended loop");
    assert_eq!(loaded.locations.len(), 2);
    assert_eq!(loaded.locations[0].latitude, 50.20);
    assert_eq!(loaded.locations[1], appended);
}

#[test]
fn delete_removes_track_and_remaining_children() {
    let repo = repo();
    let location = LocationData::new(1_700_000_000_000, 50.10, 8.60);
    let track = track_with("loop", vec![location.clone()]);
    repo.add(&Record::from(track.clone())).unwrap();

    repo.delete(&Record::from(track.clone())).unwrap();

    assert!(repo.find_by_uuid(RecordType::Track, &track.uuid).is_none());
    assert!(repo
        .find_by_uuid(RecordType::LocationData, &location.uuid)
        .is_none());
}

#[test]
fn delete_skips_locations_that_are_already_missing() {
    let repo = repo();
    let stored = LocationData::new(1_700_000_000_000, 50.10, 8.60);
    let track = track_with("loop", vec![stored]);
    repo.add(&Record::from(track.clone())).unwrap();

    // the in-memory record carries an extra sample that was never stored
    let mut stale = track.clone();
    stale
        .locations
        .push(LocationData::new(1_700_000_060_000, 50.14, 8.64));

    repo.delete(&Record::from(stale)).unwrap();
    assert!(repo.find_by_uuid(RecordType::Track, &track.uuid).is_none());
}
