//! # ojt-schedule
//!
//! Schedule computations for trainees in an on-the-job-training program.
//!
//! The schedule form assigns a trainee to a sequence of departments. Two pieces
//! of data are computed client-side and live here as pure functions: the
//! inclusive end date of a training period, and the check that no two
//! department assignments overlap before the schedule is submitted.
//!
//! ## Modules
//!
//! - [`period`] — Training periods and inclusive end-date calculation
//! - [`rollover`] — Month rollover policies (browser overflow vs. clamp)
//! - [`overlap`] — Sort schedule entries and detect overlapping assignments
//! - [`dates`] — Calendar-date parsing, short date locales, clocks
//! - [`draft`] — Editable form state tying the two together
//! - [`error`] — Error types

pub mod dates;
pub mod draft;
pub mod error;
pub mod overlap;
pub mod period;
pub mod rollover;

pub use dates::{parse_calendar_date, Clock, DateLocale, FixedClock, SystemClock};
pub use draft::ScheduleDraft;
pub use error::ScheduleError;
pub use overlap::{
    find_overlaps, parse_schedules, validate, DepartmentId, ScheduleConflict, ScheduleEntry,
    ValidationResult,
};
pub use period::{compute_end_date, compute_end_date_with, Period};
pub use rollover::MonthRollover;
