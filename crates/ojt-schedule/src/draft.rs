//! In-progress schedule rows for one trainee, as edited in the schedule form.
//!
//! The draft owns the row list and re-derives a row's end date whenever its
//! start date or period changes. Nothing here is persisted: `submit` hands the
//! validated, sorted entries to the caller and leaves the draft untouched.

use chrono::NaiveDate;

use crate::dates::DateLocale;
use crate::error::{Result, ScheduleError};
use crate::overlap::{self, DepartmentId, ScheduleEntry};
use crate::period::{compute_end_date_with, Period};
use crate::rollover::MonthRollover;

/// Form-level message shown when an end date cannot be derived.
pub const INVALID_PERIOD_MESSAGE: &str = "Invalid period or start date";

/// One editable row of the schedule form.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRow {
    pub department_id: DepartmentId,
    pub period_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Set while the row's period/start date pair cannot produce an end date.
    pub period_error: bool,
}

#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    periods: Vec<Period>,
    rollover: MonthRollover,
    rows: Vec<DraftRow>,
}

impl ScheduleDraft {
    pub fn new(periods: Vec<Period>) -> Self {
        Self::with_rollover(periods, MonthRollover::default())
    }

    pub fn with_rollover(periods: Vec<Period>, rollover: MonthRollover) -> Self {
        Self {
            periods,
            rollover,
            rows: Vec::new(),
        }
    }

    /// Seed a draft from entries already stored on the trainee record.
    pub fn from_entries(periods: Vec<Period>, entries: &[ScheduleEntry]) -> Self {
        let mut draft = Self::new(periods);
        draft.rows = entries
            .iter()
            .map(|e| DraftRow {
                department_id: e.department_id.clone(),
                period_id: None,
                start_date: Some(e.start_date),
                end_date: Some(e.end_date),
                period_error: false,
            })
            .collect();
        draft
    }

    pub fn rows(&self) -> &[DraftRow] {
        &self.rows
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Form-level error, present while any row failed to derive its end date.
    pub fn form_error(&self) -> Option<&str> {
        self.rows
            .iter()
            .any(|row| row.period_error)
            .then_some(INVALID_PERIOD_MESSAGE)
    }

    /// Append an empty row and return its index.
    pub fn add_row(&mut self, department_id: impl Into<DepartmentId>) -> usize {
        self.rows.push(DraftRow {
            department_id: department_id.into(),
            period_id: None,
            start_date: None,
            end_date: None,
            period_error: false,
        });
        self.rows.len() - 1
    }

    pub fn remove_row(&mut self, index: usize) -> Result<DraftRow> {
        self.row_mut(index)?;
        Ok(self.rows.remove(index))
    }

    pub fn set_department(
        &mut self,
        index: usize,
        department_id: impl Into<DepartmentId>,
    ) -> Result<()> {
        self.row_mut(index)?.department_id = department_id.into();
        Ok(())
    }

    pub fn set_start_date(&mut self, index: usize, start_date: NaiveDate) -> Result<()> {
        self.row_mut(index)?.start_date = Some(start_date);
        self.recompute_end_date(index);
        Ok(())
    }

    pub fn set_period(&mut self, index: usize, period_id: i64) -> Result<()> {
        self.row_mut(index)?.period_id = Some(period_id);
        self.recompute_end_date(index);
        Ok(())
    }

    /// Override the derived end date by hand.
    pub fn set_end_date(&mut self, index: usize, end_date: NaiveDate) -> Result<()> {
        let row = self.row_mut(index)?;
        row.end_date = Some(end_date);
        row.period_error = false;
        Ok(())
    }

    /// Validate every row and return the entries in start-date order.
    ///
    /// # Errors
    /// - `IncompleteRow` for the first row lacking a start or end date
    /// - `ScheduleOverlap` carrying the validator's message when rows collide
    pub fn submit(&self, locale: DateLocale) -> Result<Vec<ScheduleEntry>> {
        let entries = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| match (row.start_date, row.end_date) {
                (Some(start), Some(end)) => {
                    Ok(ScheduleEntry::new(row.department_id.clone(), start, end))
                }
                _ => Err(ScheduleError::IncompleteRow(index)),
            })
            .collect::<Result<Vec<_>>>()?;

        let result = overlap::validate(&entries, locale);
        if result.is_valid {
            Ok(result.sorted_schedules)
        } else {
            Err(ScheduleError::ScheduleOverlap {
                message: result.message,
            })
        }
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut DraftRow> {
        self.rows
            .get_mut(index)
            .ok_or(ScheduleError::RowOutOfRange(index))
    }

    /// Derive the row's end date once both a start date and a period are set.
    fn recompute_end_date(&mut self, index: usize) {
        let Some(row) = self.rows.get(index) else {
            return;
        };
        let (Some(start), Some(period_id)) = (row.start_date, row.period_id) else {
            return;
        };

        let derived = compute_end_date_with(&self.periods, period_id, start, self.rollover);
        let row = &mut self.rows[index];
        match derived {
            Ok(end) => {
                row.end_date = Some(end);
                row.period_error = false;
            }
            Err(e) => {
                tracing::debug!(row = index, error = %e, "could not derive end date");
                row.end_date = None;
                row.period_error = true;
            }
        }
    }
}
