//! Appointment duration resolution for the day view.
//!
//! The effective duration of an appointment is never stored: it is the base
//! duration copied from the service at booking time plus the *current*
//! extra minutes of the assigned staff member. Everything here is pure and
//! synchronous, so it can be called from any handler without coordination.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    appointment::Appointment,
    schedule::{DaySchedule, ScheduledAppointment, StaffColumn},
    staff::Staff,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid start time '{0}', expected HH:MM")]
    InvalidStartTime(String),
}

/// Parses a zero-padded 24-hour `HH:MM` string.
///
/// The strict width matters: day columns are ordered by comparing the raw
/// strings, which only matches chronological order for padded values.
pub fn parse_start_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());
    if !well_formed {
        return Err(ScheduleError::InvalidStartTime(value.to_string()));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ScheduleError::InvalidStartTime(value.to_string()))
}

/// Extra minutes of the referenced staff member, or 0 when unassigned or unknown.
pub fn extra_minutes_for(staff_id: Option<Uuid>, roster: &[Staff]) -> i32 {
    staff_id
        .and_then(|id| roster.iter().find(|s| s.id == id))
        .map_or(0, |s| s.extra_minutes)
}

pub fn effective_duration(appointment: &Appointment, roster: &[Staff]) -> i64 {
    i64::from(appointment.duration_minutes) + i64::from(extra_minutes_for(appointment.staff_id, roster))
}

/// Clock time the appointment ends at, and whether it crosses midnight.
///
/// Only the time of day is advanced, so no calendar date can overflow.
pub fn end_of(appointment: &Appointment, roster: &[Staff]) -> Result<(NaiveTime, bool), ScheduleError> {
    advance(&appointment.start_time, effective_duration(appointment, roster))
}

/// `start_time` moved forward by `minutes` on a 24-hour clock.
pub fn advance(start_time: &str, minutes: i64) -> Result<(NaiveTime, bool), ScheduleError> {
    let start = parse_start_time(start_time)?;
    let (end, wrapped_secs) = start.overflowing_add_signed(Duration::minutes(minutes));
    Ok((end, wrapped_secs != 0))
}

/// End time as `HH:MM`. An end past midnight wraps into the next day's clock
/// time with no date marker (`23:50` + 30 min is `00:20`), so the viewed date
/// does not affect the result.
pub fn compute_end_time(
    appointment: &Appointment,
    roster: &[Staff],
    _viewed_date: NaiveDate,
) -> Result<String, ScheduleError> {
    let (end, _) = end_of(appointment, roster)?;
    Ok(end.format("%H:%M").to_string())
}

/// Partitions appointments by assigned staff. `None` collects the unassigned ones.
/// Each group is sorted by start time.
pub fn group_by_staff(appointments: Vec<Appointment>) -> HashMap<Option<Uuid>, Vec<Appointment>> {
    let mut groups: HashMap<Option<Uuid>, Vec<Appointment>> = HashMap::new();
    for appointment in appointments {
        groups.entry(appointment.staff_id).or_default().push(appointment);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    }
    groups
}

/// Builds the day view: one column per staff member in roster order, then
/// columns for staff ids no longer on the roster, then the unassigned column.
/// Appointments dated on another day are ignored.
pub fn day_schedule(
    date: NaiveDate,
    appointments: Vec<Appointment>,
    roster: &[Staff],
) -> Result<DaySchedule, ScheduleError> {
    let mut groups = group_by_staff(appointments.into_iter().filter(|a| a.date == date).collect());

    let mut columns = Vec::with_capacity(groups.len());
    for staff in roster {
        if let Some(group) = groups.remove(&Some(staff.id)) {
            columns.push(column(Some(staff.id), Some(staff.name.clone()), group, roster)?);
        }
    }

    let unassigned = groups.remove(&None);
    let mut orphans: Vec<_> = groups.into_iter().collect();
    orphans.sort_by_key(|(id, _)| *id);
    for (staff_id, group) in orphans {
        columns.push(column(staff_id, None, group, roster)?);
    }
    if let Some(group) = unassigned {
        columns.push(column(None, None, group, roster)?);
    }

    Ok(DaySchedule { date, columns })
}

fn column(
    staff_id: Option<Uuid>,
    staff_name: Option<String>,
    group: Vec<Appointment>,
    roster: &[Staff],
) -> Result<StaffColumn, ScheduleError> {
    let appointments = group
        .into_iter()
        .map(|appointment| {
            let (end, rolls_over) = end_of(&appointment, roster)?;
            Ok(ScheduledAppointment {
                end_time: end.format("%H:%M").to_string(),
                effective_duration: effective_duration(&appointment, roster),
                rolls_over,
                appointment,
            })
        })
        .collect::<Result<Vec<_>, ScheduleError>>()?;

    Ok(StaffColumn { staff_id, staff_name, appointments })
}
