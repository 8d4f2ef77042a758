use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use timegrid::{Campus, Scheduler, ScheduleError, Slot, Stores};

fn scheduler_in(dir: &Path) -> Scheduler {
    Scheduler::new(Campus::default(), Stores::in_dir(dir))
}

fn write_catalog(dir: &Path, lines: &[&str]) {
    fs::write(dir.join("data.txt"), lines.join("\n") + "\n").unwrap();
}

fn write_timetable(dir: &Path, lines: &[&str]) {
    fs::write(dir.join("timetable_output.txt"), lines.join("\n") + "\n").unwrap();
}

fn read_timetable(dir: &Path) -> String {
    fs::read_to_string(dir.join("timetable_output.txt")).unwrap()
}

fn slot(s: &str) -> Slot {
    s.parse().unwrap()
}

#[test]
fn generate_satisfies_lone_course_preferences() {
    let tmp = TempDir::new().unwrap();
    write_catalog(tmp.path(), &["Math,T1,30,ALL,Mon:S1,Tue:S2,-:-"]);

    let scheduler = scheduler_in(tmp.path());
    let report = scheduler.generate("admin", Some("test".into())).unwrap();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.subjects, vec!["Math".to_string()]);

    let rows = scheduler.stores().timetable.load().unwrap();
    assert_eq!(rows.len(), 2);
    let slots: HashSet<Slot> = rows.iter().map(|r| r.slot).collect();
    // Nothing competes with this course, so both preferred slots are free
    // and the optimum must take them.
    assert_eq!(slots, HashSet::from([slot("Mon:S1"), slot("Tue:S2")]));
    assert!(report.violations.is_empty());

    // Every assigned room holds the class.
    let capacities: HashMap<&str, u32> =
        [("R1", 50), ("R2", 40), ("R3", 35)].into_iter().collect();
    for row in &rows {
        assert!(capacities[row.room.as_str()] >= 30);
        assert_eq!(row.teacher, "T1");
        assert_eq!(row.target, "ALL");
        assert!(row.label.is_empty());
    }
}

#[test]
fn generate_holds_hard_invariants_on_a_busier_catalog() {
    let tmp = TempDir::new().unwrap();
    write_catalog(
        tmp.path(),
        &[
            "Math,T1,45,ALL,Mon:S1,Tue:S2,Wed:S3",
            "Algebra,T1,30,CSE,Mon:S1,Thu:S1,-:-",
            "Physics,T2,38,EEE,Mon:S1,Mon:S2,Fri:S4",
            "Chemistry,T3,35,ALL,Mon:S1,-:-,-:-",
        ],
    );

    let scheduler = scheduler_in(tmp.path());
    let report = scheduler.generate("admin", Some("test".into())).unwrap();
    assert_eq!(report.total_rows, 9);

    let rows = scheduler.stores().timetable.load().unwrap();

    // Session counts match non-placeholder preference counts.
    let mut per_subject: HashMap<&str, usize> = HashMap::new();
    for row in &rows {
        *per_subject.entry(row.subject.as_str()).or_default() += 1;
    }
    assert_eq!(per_subject["Math"], 3);
    assert_eq!(per_subject["Algebra"], 2);
    assert_eq!(per_subject["Physics"], 3);
    assert_eq!(per_subject["Chemistry"], 1);

    // No shared (slot, room) and no shared (teacher, slot).
    let mut seen_room = HashSet::new();
    let mut seen_teacher = HashSet::new();
    for row in &rows {
        assert!(seen_room.insert((row.slot, row.room.clone())));
        assert!(seen_teacher.insert((row.teacher.clone(), row.slot)));
    }

    // Capacity: the 45-head and 38-head courses fit their rooms.
    let capacities: HashMap<&str, u32> =
        [("R1", 50), ("R2", 40), ("R3", 35)].into_iter().collect();
    let sizes: HashMap<&str, u32> = [
        ("Math", 45),
        ("Algebra", 30),
        ("Physics", 38),
        ("Chemistry", 35),
    ]
    .into_iter()
    .collect();
    for row in &rows {
        assert!(capacities[row.room.as_str()] >= sizes[row.subject.as_str()]);
    }
}

#[test]
fn infeasible_catalog_fails_and_truncates_the_store() {
    let tmp = TempDir::new().unwrap();
    write_catalog(tmp.path(), &["Big,T1,60,ALL,Mon:S1,-:-,-:-"]);
    write_timetable(tmp.path(), &["Mon,S1,Stale,R1,T9,ALL"]);

    let scheduler = scheduler_in(tmp.path());
    let err = scheduler.generate("admin", None).unwrap_err();
    assert!(matches!(err, ScheduleError::Infeasible));
    assert_eq!(read_timetable(tmp.path()), "");
}

#[test]
fn missing_catalog_fails_distinctly_and_truncates_the_store() {
    let tmp = TempDir::new().unwrap();
    write_timetable(tmp.path(), &["Mon,S1,Stale,R1,T9,ALL"]);

    let scheduler = scheduler_in(tmp.path());
    let err = scheduler.generate("admin", None).unwrap_err();
    assert!(matches!(err, ScheduleError::CatalogUnavailable { .. }));
    assert_ne!(err.to_string(), ScheduleError::Infeasible.to_string());
    assert_eq!(read_timetable(tmp.path()), "");
}

#[test]
fn generation_appends_history_newest_first() {
    let tmp = TempDir::new().unwrap();
    write_catalog(tmp.path(), &["Math,T1,30,ALL,Mon:S1,-:-,-:-"]);

    let scheduler = scheduler_in(tmp.path());
    scheduler.generate("alice", Some("2026 Jan-Apr Semester".into())).unwrap();
    scheduler.generate("bob", Some("2026 Jan-Apr Semester".into())).unwrap();
    scheduler.generate("alice", Some("2026 Aug-Nov Semester".into())).unwrap();

    let records = scheduler.stores().history.load().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.windows(2).all(|w| w[0].generated_at >= w[1].generated_at));
    assert_eq!(records[0].total_rows, 1);
    assert_eq!(records[0].subjects, vec!["Math".to_string()]);

    let groups = scheduler.stores().history.grouped_by_semester().unwrap();
    assert_eq!(groups.len(), 2);
    let spring = groups
        .iter()
        .find(|g| g.semester == "2026 Jan-Apr Semester")
        .unwrap();
    assert_eq!(spring.total_runs(), 2);
}
