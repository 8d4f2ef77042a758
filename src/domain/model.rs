use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Weekday of the teaching week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mon" => Ok(Day::Mon),
            "Tue" => Ok(Day::Tue),
            "Wed" => Ok(Day::Wed),
            "Thu" => Ok(Day::Thu),
            "Fri" => Ok(Day::Fri),
            _ => Err(ParseSlotError),
        }
    }
}

/// Teaching period within a day. Periods are totally ordered; `S4` is the
/// late slot that carries the late-scheduling penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    S1,
    S2,
    S3,
    S4,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::S1, Period::S2, Period::S3, Period::S4];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::S1 => "S1",
            Period::S2 => "S2",
            Period::S3 => "S3",
            Period::S4 => "S4",
        }
    }

    /// The last period of the day.
    pub fn is_late(&self) -> bool {
        *self == Period::S4
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S1" => Ok(Period::S1),
            "S2" => Ok(Period::S2),
            "S3" => Ok(Period::S3),
            "S4" => Ok(Period::S4),
            _ => Err(ParseSlotError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSlotError;

impl fmt::Display for ParseSlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid day or period name")
    }
}

impl std::error::Error for ParseSlotError {}

/// A (day, period) cell in the weekly grid. Wire form is `Mon:S1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub day: Day,
    pub period: Period,
}

impl Slot {
    pub fn new(day: Day, period: Period) -> Self {
        Self { day, period }
    }

    /// All 20 slots of the teaching week, day-major.
    pub fn week() -> Vec<Slot> {
        let mut slots = Vec::with_capacity(Day::ALL.len() * Period::ALL.len());
        for day in Day::ALL {
            for period in Period::ALL {
                slots.push(Slot::new(day, period));
            }
        }
        slots
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.day, self.period)
    }
}

impl FromStr for Slot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, period) = s.split_once(':').ok_or(ParseSlotError)?;
        Ok(Slot::new(day.parse()?, period.parse()?))
    }
}

/// A course's requested slots: exactly 3 entries, order-preserving,
/// deduplicated. `None` is the explicit "no preference" placeholder and
/// never reaches the solver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSet {
    entries: [Option<Slot>; 3],
}

impl PreferenceSet {
    /// Normalize an arbitrary list of entries: drop placeholders, drop
    /// duplicates keeping first occurrence, pad back to 3.
    pub fn normalize<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Option<Slot>>,
    {
        let mut set = PreferenceSet::default();
        let mut n = 0;
        for slot in entries.into_iter().flatten() {
            if n == 3 {
                break;
            }
            if !set.contains(slot) {
                set.entries[n] = Some(slot);
                n += 1;
            }
        }
        set
    }

    pub fn entries(&self) -> &[Option<Slot>; 3] {
        &self.entries
    }

    /// Non-placeholder slots, in preference order.
    pub fn real(&self) -> impl Iterator<Item = Slot> + '_ {
        self.entries.iter().flatten().copied()
    }

    pub fn real_count(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.entries.contains(&Some(slot))
    }

    /// Remove a slot if present; the set re-compacts and re-pads itself.
    /// Returns whether anything changed.
    pub fn remove(&mut self, slot: Slot) -> bool {
        if !self.contains(slot) {
            return false;
        }
        *self = PreferenceSet::normalize(self.real().filter(|s| *s != slot).map(Some));
        true
    }

    /// Add a slot unless already present: append while fewer than 3 real
    /// entries exist, otherwise overwrite the third (last) entry. Returns
    /// whether anything changed.
    pub fn add_or_evict_last(&mut self, slot: Slot) -> bool {
        if self.contains(slot) {
            return false;
        }
        match self.real_count() {
            n @ 0..=2 => self.entries[n] = Some(slot),
            _ => self.entries[2] = Some(slot),
        }
        true
    }
}

/// A recurring course. Identity is (subject, teacher, target); everything
/// else is an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub subject: String,
    pub teacher: String,
    pub students: u32,
    /// Department tag the course is visible to; `ALL` is the wildcard.
    pub target: String,
    pub prefs: PreferenceSet,
}

impl Course {
    pub fn matches_identity(&self, subject: &str, teacher: &str, target: &str) -> bool {
        self.subject == subject && self.teacher == teacher && self.target == target
    }
}

/// An empty target tag reads as the wildcard.
pub fn normalize_target(target: &str) -> String {
    if target.trim().is_empty() {
        "ALL".to_string()
    } else {
        target.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Room {
    pub name: String,
    pub capacity: u32,
}

/// One scheduled session in the timetable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableRow {
    pub slot: Slot,
    pub subject: String,
    pub room: String,
    pub teacher: String,
    pub target: String,
    /// Free-text annotation (e.g. the absence marker). Mutable metadata,
    /// excluded from identity matching.
    pub label: String,
}

/// Identity key for row lookups and mutations: the full row minus the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowKey {
    pub slot: Slot,
    pub subject: String,
    pub room: String,
    pub teacher: String,
    pub target: String,
}

impl RowKey {
    pub fn matches(&self, row: &TimetableRow) -> bool {
        self.slot == row.slot
            && self.subject == row.subject
            && self.room == row.room
            && self.teacher == row.teacher
            && self.target == row.target
    }
}

impl From<&TimetableRow> for RowKey {
    fn from(row: &TimetableRow) -> Self {
        Self {
            slot: row.slot,
            subject: row.subject.clone(),
            room: row.room.clone(),
            teacher: row.teacher.clone(),
            target: row.target.clone(),
        }
    }
}

/// Static institutional data the model builder works against: rooms,
/// per-teacher seniority costs and the soft-constraint weights.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Campus {
    pub rooms: Vec<Room>,
    pub seniority: BTreeMap<String, f64>,
    pub default_seniority: f64,
    pub preference_weight: f64,
    pub late_weight: f64,
}

impl Campus {
    pub fn seniority_cost(&self, teacher: &str) -> f64 {
        self.seniority
            .get(teacher)
            .copied()
            .unwrap_or(self.default_seniority)
    }

    pub fn max_capacity(&self) -> u32 {
        self.rooms.iter().map(|r| r.capacity).max().unwrap_or(0)
    }
}

impl Default for Campus {
    fn default() -> Self {
        let rooms = vec![
            Room { name: "R1".to_string(), capacity: 50 },
            Room { name: "R2".to_string(), capacity: 40 },
            Room { name: "R3".to_string(), capacity: 35 },
        ];
        let seniority = BTreeMap::from([
            ("T1".to_string(), 5.0),
            ("T2".to_string(), 15.0),
            ("T3".to_string(), 25.0),
        ]);
        Self {
            rooms,
            seniority,
            default_seniority: 20.0,
            preference_weight: 50.0,
            late_weight: 10.0,
        }
    }
}
