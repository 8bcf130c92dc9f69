use trainlog_core::{
    open_store_in_memory, DataRepository, MovementType, NullObserver, Record, RecordType,
    RepoError, RunningPlan, RunningPlanEntry, RunningUnit,
};

fn repo() -> DataRepository {
    DataRepository::new(open_store_in_memory().unwrap(), Box::new(NullObserver))
}

fn plan_with(name: &str, entries: Vec<RunningPlanEntry>) -> RunningPlan {
    let mut plan = RunningPlan::new(name);
    plan.entries = entries;
    plan
}

#[test]
fn insert_persists_the_whole_nested_graph() {
    let repo = repo();
    let slow = MovementType::new("LG", "slow going");
    let run = MovementType::new("L", "running");
    let entry_one = RunningPlanEntry::new(
        1,
        1,
        vec![
            RunningUnit::new(2, run.clone()),
            RunningUnit::new(3, slow.clone()),
        ],
    );
    let entry_two = RunningPlanEntry::new(1, 3, vec![RunningUnit::new(5, run.clone())]);
    let plan = plan_with("starter", vec![entry_one.clone(), entry_two.clone()]);

    repo.add(&Record::from(plan.clone())).unwrap();

    let loaded = match repo.find_by_uuid(RecordType::RunningPlan, &plan.uuid) {
        Some(Record::RunningPlan(loaded)) => loaded,
        other => panic!("expected a running plan, got {other:?}"),
    };
    assert_eq!(loaded.entries.len(), 2);
    assert_eq!(loaded.entries[0].units.len(), 2);
    assert_eq!(loaded.entries[0].units[0].movement_type.key, "L");
    assert_eq!(loaded.entries[0].units[1].movement_type.key, "LG");
    assert_eq!(loaded.entries[1].week, 1);
    assert_eq!(loaded.entries[1].day, 3);

    // movement types were auto-inserted as shared reference data
    assert!(repo.find_by_uuid(RecordType::MovementType, "L").is_some());
    assert!(repo.find_by_uuid(RecordType::MovementType, "LG").is_some());
}

#[test]
fn duplicate_unit_in_second_entry_rolls_back_the_whole_insert() {
    let repo = repo();
    let run = MovementType::new("L", "running");
    let first_unit = RunningUnit::new(2, run.clone());
    let entry_one = RunningPlanEntry::new(1, 1, vec![first_unit.clone()]);

    // the second entry's only unit reuses the first unit's identity
    let mut duplicate_unit = RunningUnit::new(4, MovementType::new("ZG", "speedy going"));
    duplicate_unit.uuid = first_unit.uuid.clone();
    let entry_two = RunningPlanEntry::new(1, 3, vec![duplicate_unit]);

    let plan = plan_with("broken", vec![entry_one.clone(), entry_two.clone()]);
    let err = repo.add(&Record::from(plan.clone())).unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateChildRecord { record_type: RecordType::RunningUnit, identity } if identity == first_unit.uuid
    ));

    // plan-scoped records are back to the pre-call state
    assert!(repo
        .find_by_uuid(RecordType::RunningPlan, &plan.uuid)
        .is_none());
    assert!(repo
        .find_by_uuid(RecordType::RunningPlanEntry, &entry_one.uuid)
        .is_none());
    assert!(repo
        .find_by_uuid(RecordType::RunningUnit, &first_unit.uuid)
        .is_none());
    // the movement type inserted solely for this plan is gone again
    assert!(repo.find_by_uuid(RecordType::MovementType, "L").is_none());
}

#[test]
fn rollback_leaves_previously_seeded_movement_types_alone() {
    let repo = repo();
    let run = MovementType::new("L", "running");
    repo.add(&Record::from(run.clone())).unwrap();

    let first_unit = RunningUnit::new(2, run.clone());
    let entry_one = RunningPlanEntry::new(1, 1, vec![first_unit.clone()]);
    let mut duplicate_unit = RunningUnit::new(4, run.clone());
    duplicate_unit.uuid = first_unit.uuid.clone();
    let entry_two = RunningPlanEntry::new(1, 3, vec![duplicate_unit]);

    let plan = plan_with("broken", vec![entry_one, entry_two]);
    repo.add(&Record::from(plan)).unwrap_err();

    // seeded before the plan, so the rollback must not remove it
    assert!(repo.find_by_uuid(RecordType::MovementType, "L").is_some());
}

#[test]
fn duplicate_entry_identity_aborts_and_rolls_back() {
    let repo = repo();
    let run = MovementType::new("L", "running");
    let stored_entry = RunningPlanEntry::new(1, 1, vec![RunningUnit::new(2, run.clone())]);
    let stored_plan = plan_with("first", vec![stored_entry.clone()]);
    repo.add(&Record::from(stored_plan)).unwrap();

    let mut clashing_entry =
        RunningPlanEntry::new(2, 2, vec![RunningUnit::new(3, run.clone())]);
    clashing_entry.uuid = stored_entry.uuid.clone();
    let fresh_entry = RunningPlanEntry::new(2, 4, vec![RunningUnit::new(1, run.clone())]);
    let second_plan = plan_with("second", vec![fresh_entry.clone(), clashing_entry]);

    let err = repo.add(&Record::from(second_plan.clone())).unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateChildRecord { record_type: RecordType::RunningPlanEntry, identity } if identity == stored_entry.uuid
    ));

    // the second plan's fresh entry and unit were rolled back
    assert!(repo
        .find_by_uuid(RecordType::RunningPlanEntry, &fresh_entry.uuid)
        .is_none());
    assert!(repo
        .find_by_uuid(RecordType::RunningUnit, &fresh_entry.units[0].uuid)
        .is_none());
    assert!(repo
        .find_by_uuid(RecordType::RunningPlan, &second_plan.uuid)
        .is_none());

    // the stored plan's graph is untouched
    assert!(repo
        .find_by_uuid(RecordType::RunningPlanEntry, &stored_entry.uuid)
        .is_some());
}

#[test]
fn update_inserts_new_entries_and_updates_existing_units() {
    let repo = repo();
    let run = MovementType::new("L", "running");
    let mut unit = RunningUnit::new(2, run.clone());
    let entry = RunningPlanEntry::new(1, 1, vec![unit.clone()]);
    let mut plan = plan_with("starter", vec![entry.clone()]);
    repo.add(&Record::from(plan.clone())).unwrap();

    unit.duration_minutes = 10;
    unit.completed = true;
    let mut updated_entry = entry.clone();
    updated_entry.units = vec![unit.clone()];
    let appended_entry =
        RunningPlanEntry::new(2, 1, vec![RunningUnit::new(4, MovementType::new("P", "pause"))]);
    plan.entries = vec![updated_entry, appended_entry.clone()];
    plan.remarks = Some("week two added".to_string());

    repo.update(&Record::from(plan.clone())).unwrap();

    let loaded = match repo.find_by_uuid(RecordType::RunningPlan, &plan.uuid) {
        Some(Record::RunningPlan(loaded)) => loaded,
        other => panic!("expected a running plan, got {other:?}"),
    };
    assert_eq!(loaded.remarks.as_deref(), Some("week two added"));
    assert_eq!(loaded.entries.len(), 2);
    assert_eq!(loaded.entries[0].units[0].duration_minutes, 10);
    assert!(loaded.entries[0].units[0].completed);
    assert_eq!(loaded.entries[1].uuid, appended_entry.uuid);
    // the new entry's movement type was auto-inserted
    assert!(repo.find_by_uuid(RecordType::MovementType, "P").is_some());
}

#[test]
fn delete_removes_the_graph_but_keeps_movement_types() {
    let repo = repo();
    let run = MovementType::new("L", "running");
    let unit = RunningUnit::new(2, run.clone());
    let entry = RunningPlanEntry::new(1, 1, vec![unit.clone()]);
    let plan = plan_with("starter", vec![entry.clone()]);
    repo.add(&Record::from(plan.clone())).unwrap();

    repo.delete(&Record::from(plan.clone())).unwrap();

    assert!(repo
        .find_by_uuid(RecordType::RunningPlan, &plan.uuid)
        .is_none());
    assert!(repo
        .find_by_uuid(RecordType::RunningPlanEntry, &entry.uuid)
        .is_none());
    assert!(repo
        .find_by_uuid(RecordType::RunningUnit, &unit.uuid)
        .is_none());
    // shared reference data survives the cascade delete
    assert!(repo.find_by_uuid(RecordType::MovementType, "L").is_some());
}
