use crate::models::{AttendanceRecord, AttendanceStatus, Student};

/// Marks a student for `date`.
///
/// An existing entry flips between present and not present (`late` counts as not present, so it becomes
/// `present`). A date with no entry gets a new `present` entry at the front. The input is left untouched.
pub fn toggle_attendance(records: &[AttendanceRecord], date: &str) -> Vec<AttendanceRecord> {
    if !records.iter().any(|record| record.date == date) {
        let mut next = Vec::with_capacity(records.len() + 1);
        next.push(AttendanceRecord::new(date, AttendanceStatus::Present));
        next.extend(records.iter().cloned());
        return next;
    }

    records
        .iter()
        .map(|record| {
            if record.date != date {
                return record.clone();
            }
            let status = match record.status {
                AttendanceStatus::Present => AttendanceStatus::Absent,
                AttendanceStatus::Absent | AttendanceStatus::Late => AttendanceStatus::Present,
            };
            AttendanceRecord::new(date, status)
        })
        .collect()
}

pub fn status_on(student: &Student, date: &str) -> Option<AttendanceStatus> {
    student
        .attendance
        .iter()
        .find(|record| record.date == date)
        .map(|record| record.status)
}

/// Each student next to their status for `date`, or `None` if they haven't been marked.
pub fn attendance_on<'a>(
    students: impl IntoIterator<Item = &'a Student>,
    date: &str,
) -> Vec<(&'a Student, Option<AttendanceStatus>)> {
    students
        .into_iter()
        .map(|student| (student, status_on(student, date)))
        .collect()
}
