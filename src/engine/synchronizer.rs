//! Consistency synchronizer: keeps course preference sets truthful to what
//! actually exists in the timetable store after manual edits, so the next
//! generation run follows human corrections instead of reverting them.

use tracing::info;

use crate::domain::{normalize_target, Course, Result, RowKey, ScheduleError, TimetableRow};
use crate::store::Stores;

/// Row annotation used by the absence toggles.
pub const ABSENT_LABEL: &str = "Teacher Absent";

pub struct Synchronizer<'a> {
    stores: &'a Stores,
}

impl<'a> Synchronizer<'a> {
    pub fn new(stores: &'a Stores) -> Self {
        Self { stores }
    }

    /// Delete the first row matching the key, then drop that slot from the
    /// matching course's preferences. If duplicate rows share the key only
    /// the first is removed (known limitation of the keying scheme).
    pub fn delete_entry(&self, key: &RowKey, actor: &str) -> Result<()> {
        let mut rows = self.stores.timetable.load()?;
        let position = rows
            .iter()
            .position(|row| key.matches(row))
            .ok_or(ScheduleError::RowNotFound)?;
        let removed = rows.remove(position);
        self.stores.timetable.save(&rows)?;

        let mut courses = self.stores.catalog.load_or_default()?;
        if let Some(course) = find_course(&mut courses, &key.subject, &key.teacher, &key.target) {
            if course.prefs.remove(key.slot) {
                self.stores.catalog.save(&courses)?;
            }
        }

        info!(
            actor,
            subject = %removed.subject,
            slot = %removed.slot,
            room = %removed.room,
            "timetable entry deleted"
        );
        Ok(())
    }

    /// Replace the first row matching `old_key` wholesale with `new_row`
    /// (label included), then reconcile both affected courses: the old one
    /// loses the old slot, the new one gains the new slot. The new slot is
    /// appended while under 3 real preferences, otherwise it overwrites the
    /// third entry.
    pub fn update_entry(&self, old_key: &RowKey, new_row: TimetableRow, actor: &str) -> Result<()> {
        let mut rows = self.stores.timetable.load()?;
        let position = rows
            .iter()
            .position(|row| old_key.matches(row))
            .ok_or(ScheduleError::RowNotFound)?;
        rows[position] = new_row.clone();
        self.stores.timetable.save(&rows)?;

        let mut courses = self.stores.catalog.load_or_default()?;
        let mut changed = false;

        if let Some(course) =
            find_course(&mut courses, &old_key.subject, &old_key.teacher, &old_key.target)
        {
            changed |= course.prefs.remove(old_key.slot);
        }
        if let Some(course) =
            find_course(&mut courses, &new_row.subject, &new_row.teacher, &new_row.target)
        {
            changed |= course.prefs.add_or_evict_last(new_row.slot);
        }
        if changed {
            self.stores.catalog.save(&courses)?;
        }

        info!(
            actor,
            subject = %new_row.subject,
            from = %old_key.slot,
            to = %new_row.slot,
            "timetable entry updated"
        );
        Ok(())
    }

    /// Set or clear the label of the first row matching the key. Labels are
    /// metadata only; the catalog is not touched.
    pub fn set_entry_label(&self, key: &RowKey, label: &str, actor: &str) -> Result<()> {
        let mut rows = self.stores.timetable.load()?;
        let row = rows
            .iter_mut()
            .find(|row| key.matches(row))
            .ok_or(ScheduleError::RowNotFound)?;
        row.label = label.to_string();
        self.stores.timetable.save(&rows)?;

        info!(actor, slot = %key.slot, subject = %key.subject, label, "entry label set");
        Ok(())
    }

    /// Set or clear the absence label on every row of one teacher. Returns
    /// how many rows changed.
    pub fn set_teacher_absence(&self, teacher: &str, absent: bool, actor: &str) -> Result<usize> {
        let mut rows = self.stores.timetable.load()?;
        let mut updated = 0;

        for row in rows.iter_mut().filter(|row| row.teacher == teacher) {
            if absent && row.label != ABSENT_LABEL {
                row.label = ABSENT_LABEL.to_string();
                updated += 1;
            } else if !absent && row.label == ABSENT_LABEL {
                row.label.clear();
                updated += 1;
            }
        }
        self.stores.timetable.save(&rows)?;

        info!(actor, teacher, absent, updated, "teacher absence toggled");
        Ok(updated)
    }
}

/// Course lookup by identity; an empty target tag matches the wildcard.
fn find_course<'c>(
    courses: &'c mut [Course],
    subject: &str,
    teacher: &str,
    target: &str,
) -> Option<&'c mut Course> {
    let target = normalize_target(target);
    courses
        .iter_mut()
        .find(|c| c.matches_identity(subject, teacher, &target))
}
