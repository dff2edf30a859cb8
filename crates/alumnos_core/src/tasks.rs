//! crates/alumnos_core/src/tasks.rs
//!
//! Task submission rules.
//!
//! Status moves `pendiente -> entregado -> (calificado | fuera de plazo)`. The
//! client only causes the first step, by uploading a file; grading and lateness
//! are decided by the server and only show up after a re-fetch.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::domain::{Role, Task, UserProfile};

impl Task {
    /// The uploaded file's URL, if a submission with a non-empty URL exists.
    pub fn submitted_file_url(&self) -> Option<&str> {
        self.submission
            .as_ref()
            .and_then(|s| s.file_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Uploading is only possible while no file has been submitted, whatever the status.
    pub fn upload_enabled(&self) -> bool {
        self.submitted_file_url().is_none()
    }

    /// Display name of the submitted file: the last segment of its URL.
    pub fn submitted_file_name(&self) -> Option<&str> {
        self.submitted_file_url()
            .and_then(|url| url.rsplit('/').next())
    }
}

/// Teachers see every task of a class; anyone else only their own.
pub fn visible_tasks(tasks: Vec<Task>, viewer: &UserProfile) -> Vec<Task> {
    if viewer.is_teacher() {
        return tasks;
    }
    tasks
        .into_iter()
        .filter(|t| t.student_email == viewer.email)
        .collect()
}

/// Students may only open their own tasks.
pub fn can_open(task: &Task, viewer: &UserProfile) -> bool {
    viewer.role != Some(Role::Student) || task.student_email == viewer.email
}

/// The last millisecond of `date` in `tz`, as UTC.
pub fn due_at_end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    let local = date.and_time(last_ms);
    match tz.from_local_datetime(&local).latest() {
        Some(at) => at.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&local),
    }
}
