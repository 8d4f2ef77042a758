use std::fs;
use std::path::Path;

use tempfile::TempDir;

use timegrid::{
    Campus, Course, PreferenceSet, RowKey, Scheduler, ScheduleError, Slot, Stores, TimetableRow,
    ABSENT_LABEL,
};

fn scheduler_in(dir: &Path) -> Scheduler {
    Scheduler::new(Campus::default(), Stores::in_dir(dir))
}

fn write_catalog(dir: &Path, lines: &[&str]) {
    fs::write(dir.join("data.txt"), lines.join("\n") + "\n").unwrap();
}

fn write_timetable(dir: &Path, lines: &[&str]) {
    fs::write(dir.join("timetable_output.txt"), lines.join("\n") + "\n").unwrap();
}

fn slot(s: &str) -> Slot {
    s.parse().unwrap()
}

fn key(wire: &str, subject: &str, room: &str, teacher: &str, target: &str) -> RowKey {
    RowKey {
        slot: slot(wire),
        subject: subject.to_string(),
        room: room.to_string(),
        teacher: teacher.to_string(),
        target: target.to_string(),
    }
}

fn row(wire: &str, subject: &str, room: &str, teacher: &str, target: &str) -> TimetableRow {
    TimetableRow {
        slot: slot(wire),
        subject: subject.to_string(),
        room: room.to_string(),
        teacher: teacher.to_string(),
        target: target.to_string(),
        label: String::new(),
    }
}

#[test]
fn delete_removes_row_and_its_preference() {
    let tmp = TempDir::new().unwrap();
    write_catalog(tmp.path(), &["Math,T1,30,ALL,Mon:S1,Tue:S2,-:-"]);
    write_timetable(
        tmp.path(),
        &["Mon,S1,Math,R1,T1,ALL", "Tue,S2,Math,R1,T1,ALL"],
    );

    let scheduler = scheduler_in(tmp.path());
    scheduler
        .synchronizer()
        .delete_entry(&key("Mon:S1", "Math", "R1", "T1", "ALL"), "admin")
        .unwrap();

    let rows = scheduler.stores().timetable.load().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slot, slot("Tue:S2"));

    let courses = scheduler.stores().catalog.load().unwrap();
    let prefs = &courses[0].prefs;
    assert!(!prefs.contains(slot("Mon:S1")));
    assert!(prefs.contains(slot("Tue:S2")));
    assert_eq!(prefs.real_count(), 1);
}

#[test]
fn delete_of_missing_key_leaves_store_bytes_untouched() {
    let tmp = TempDir::new().unwrap();
    write_timetable(tmp.path(), &["Mon,S1,Math,R1,T1,ALL,Teacher Absent"]);
    let before = fs::read(tmp.path().join("timetable_output.txt")).unwrap();

    let scheduler = scheduler_in(tmp.path());
    let err = scheduler
        .synchronizer()
        .delete_entry(&key("Fri:S4", "Math", "R1", "T1", "ALL"), "admin")
        .unwrap_err();
    assert!(matches!(err, ScheduleError::RowNotFound));

    let after = fs::read(tmp.path().join("timetable_output.txt")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn delete_with_duplicate_keys_only_touches_the_first_row() {
    let tmp = TempDir::new().unwrap();
    write_timetable(
        tmp.path(),
        &["Mon,S1,Math,R1,T1,ALL", "Mon,S1,Math,R1,T1,ALL"],
    );

    let scheduler = scheduler_in(tmp.path());
    scheduler
        .synchronizer()
        .delete_entry(&key("Mon:S1", "Math", "R1", "T1", "ALL"), "admin")
        .unwrap();

    let rows = scheduler.stores().timetable.load().unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn update_moves_the_row_and_reconciles_preferences() {
    let tmp = TempDir::new().unwrap();
    write_catalog(tmp.path(), &["Math,T1,30,ALL,Mon:S1,Wed:S3,-:-"]);
    write_timetable(tmp.path(), &["Mon,S1,Math,R1,T1,ALL"]);

    let scheduler = scheduler_in(tmp.path());
    scheduler
        .synchronizer()
        .update_entry(
            &key("Mon:S1", "Math", "R1", "T1", "ALL"),
            row("Tue:S2", "Math", "R2", "T1", "ALL"),
            "admin",
        )
        .unwrap();

    let rows = scheduler.stores().timetable.load().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slot, slot("Tue:S2"));
    assert_eq!(rows[0].room, "R2");

    let courses = scheduler.stores().catalog.load().unwrap();
    let prefs = &courses[0].prefs;
    assert!(!prefs.contains(slot("Mon:S1")));
    assert!(prefs.contains(slot("Tue:S2")));
    assert!(prefs.contains(slot("Wed:S3")));
    assert_eq!(prefs.real_count(), 2);
}

#[test]
fn update_into_a_full_preference_set_evicts_the_third_entry() {
    let tmp = TempDir::new().unwrap();
    write_catalog(tmp.path(), &["Math,T1,30,ALL,Mon:S1,Tue:S2,Wed:S3"]);
    // The edited row sits in a slot that is not in the preference set, so
    // nothing is removed and the new slot must overwrite the third entry.
    write_timetable(tmp.path(), &["Thu,S1,Math,R1,T1,ALL"]);

    let scheduler = scheduler_in(tmp.path());
    scheduler
        .synchronizer()
        .update_entry(
            &key("Thu:S1", "Math", "R1", "T1", "ALL"),
            row("Fri:S2", "Math", "R1", "T1", "ALL"),
            "admin",
        )
        .unwrap();

    let courses = scheduler.stores().catalog.load().unwrap();
    let entries = courses[0].prefs.entries();
    assert_eq!(entries[0], Some(slot("Mon:S1")));
    assert_eq!(entries[1], Some(slot("Tue:S2")));
    assert_eq!(entries[2], Some(slot("Fri:S2")));
}

#[test]
fn update_not_found_fails_without_writing() {
    let tmp = TempDir::new().unwrap();
    write_timetable(tmp.path(), &["Mon,S1,Math,R1,T1,ALL"]);
    let before = fs::read(tmp.path().join("timetable_output.txt")).unwrap();

    let scheduler = scheduler_in(tmp.path());
    let err = scheduler
        .synchronizer()
        .update_entry(
            &key("Mon:S2", "Math", "R1", "T1", "ALL"),
            row("Tue:S2", "Math", "R1", "T1", "ALL"),
            "admin",
        )
        .unwrap_err();
    assert!(matches!(err, ScheduleError::RowNotFound));
    assert_eq!(fs::read(tmp.path().join("timetable_output.txt")).unwrap(), before);
}

#[test]
fn update_keeps_the_new_label_wholesale() {
    let tmp = TempDir::new().unwrap();
    write_timetable(tmp.path(), &["Mon,S1,Math,R1,T1,ALL,Teacher Absent"]);

    let scheduler = scheduler_in(tmp.path());
    let mut new_row = row("Mon:S1", "Math", "R1", "T1", "ALL");
    new_row.label = "room changed".to_string();
    scheduler
        .synchronizer()
        .update_entry(&key("Mon:S1", "Math", "R1", "T1", "ALL"), new_row, "admin")
        .unwrap();

    let rows = scheduler.stores().timetable.load().unwrap();
    assert_eq!(rows[0].label, "room changed");
}

#[test]
fn teacher_absence_toggle_counts_changed_rows() {
    let tmp = TempDir::new().unwrap();
    write_timetable(
        tmp.path(),
        &[
            "Mon,S1,Math,R1,T1,ALL",
            "Tue,S2,Algebra,R2,T1,CSE",
            "Wed,S3,Physics,R1,T2,ALL",
        ],
    );

    let scheduler = scheduler_in(tmp.path());
    let sync = scheduler.synchronizer();

    assert_eq!(sync.set_teacher_absence("T1", true, "admin").unwrap(), 2);
    // Already labelled: nothing left to change.
    assert_eq!(sync.set_teacher_absence("T1", true, "admin").unwrap(), 0);

    let rows = scheduler.stores().timetable.load().unwrap();
    assert!(rows
        .iter()
        .filter(|r| r.teacher == "T1")
        .all(|r| r.label == ABSENT_LABEL));
    assert!(rows.iter().filter(|r| r.teacher == "T2").all(|r| r.label.is_empty()));

    assert_eq!(sync.set_teacher_absence("T1", false, "admin").unwrap(), 2);
    let rows = scheduler.stores().timetable.load().unwrap();
    assert!(rows.iter().all(|r| r.label.is_empty()));
}

#[test]
fn entry_label_targets_the_first_match_only() {
    let tmp = TempDir::new().unwrap();
    write_timetable(
        tmp.path(),
        &["Mon,S1,Math,R1,T1,ALL", "Mon,S1,Math,R1,T1,ALL"],
    );

    let scheduler = scheduler_in(tmp.path());
    scheduler
        .synchronizer()
        .set_entry_label(&key("Mon:S1", "Math", "R1", "T1", "ALL"), ABSENT_LABEL, "admin")
        .unwrap();

    let rows = scheduler.stores().timetable.load().unwrap();
    assert_eq!(rows[0].label, ABSENT_LABEL);
    assert!(rows[1].label.is_empty());

    let err = scheduler
        .synchronizer()
        .set_entry_label(&key("Fri:S4", "Math", "R1", "T1", "ALL"), ABSENT_LABEL, "admin")
        .unwrap_err();
    assert!(matches!(err, ScheduleError::RowNotFound));
}

#[test]
fn upsert_course_rejects_sizes_no_room_can_hold() {
    let tmp = TempDir::new().unwrap();
    let scheduler = scheduler_in(tmp.path());

    let course = Course {
        subject: "Crowd".to_string(),
        teacher: "T1".to_string(),
        students: 60,
        target: "ALL".to_string(),
        prefs: PreferenceSet::normalize(vec![Some(slot("Mon:S1"))]),
    };
    let err = scheduler.upsert_course(course).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::CapacityExceeded {
            students: 60,
            max_capacity: 50
        }
    ));
    // Nothing reached the catalog.
    assert!(!tmp.path().join("data.txt").exists());
}

#[test]
fn upsert_course_replaces_by_identity() {
    let tmp = TempDir::new().unwrap();
    write_catalog(tmp.path(), &["Math,T1,30,ALL,Mon:S1,-:-,-:-"]);

    let scheduler = scheduler_in(tmp.path());
    let course = Course {
        subject: "Math".to_string(),
        teacher: "T1".to_string(),
        students: 40,
        target: "ALL".to_string(),
        prefs: PreferenceSet::normalize(vec![Some(slot("Tue:S2")), Some(slot("Wed:S3"))]),
    };
    scheduler.upsert_course(course).unwrap();

    let courses = scheduler.stores().catalog.load().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].students, 40);
    assert!(courses[0].prefs.contains(slot("Tue:S2")));
}
