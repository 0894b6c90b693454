//! Weekly schedule grid
//!
//! Rows are hourly slots from 07:00 to 21:00, columns are Monday to Sunday.
//! A shift occupies the cell of its start slot, which carries its length in
//! hours; the slots strictly inside the shift are marked covered so a
//! renderer can let the start cell span them.

use crate::models::employee::{find_in, Employee, EmployeeRole};
use crate::models::shift::{Shift, Weekday};
use crate::store::Record;
use chrono::NaiveTime;
use serde::Serialize;

pub const FIRST_SLOT_HOUR: u32 = 7;
pub const SLOT_COUNT: u32 = 15;

/// Slot start times, 07:00 through 21:00
pub fn time_slots() -> Vec<NaiveTime> {
    (FIRST_SLOT_HOUR..FIRST_SLOT_HOUR + SLOT_COUNT)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScheduleCell {
    #[serde(rename_all = "camelCase")]
    Start {
        shift_id: String,
        employee_id: String,
        employee_name: Option<String>,
        role: EmployeeRole,
        color: String,
        duration_hours: u32,
    },
    Covered,
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRow {
    /// "HH:MM"
    pub time: String,

    /// One cell per day, Monday first
    pub cells: Vec<ScheduleCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleGrid {
    pub days: Vec<Weekday>,
    pub rows: Vec<ScheduleRow>,
}

fn cell_for(shifts: &[Shift], employees: &[Record<Employee>], day: Weekday, slot: NaiveTime) -> ScheduleCell {
    if let Some(shift) = shifts
        .iter()
        .find(|s| s.day == day && s.start() == Some(slot))
    {
        return ScheduleCell::Start {
            shift_id: shift.id.clone(),
            employee_id: shift.employee_id.clone(),
            employee_name: find_in(employees, &shift.employee_id).map(|e| e.data.name.clone()),
            role: shift.role,
            color: shift.color.clone(),
            duration_hours: shift.duration_hours(),
        };
    }

    if shifts.iter().any(|s| s.day == day && s.covers(slot)) {
        ScheduleCell::Covered
    } else {
        ScheduleCell::Empty
    }
}

impl ScheduleGrid {
    pub fn build(shifts: &[Shift], employees: &[Record<Employee>]) -> Self {
        let rows = time_slots()
            .into_iter()
            .map(|slot| ScheduleRow {
                time: slot.format("%H:%M").to_string(),
                cells: Weekday::ALL
                    .iter()
                    .map(|day| cell_for(shifts, employees, *day, slot))
                    .collect(),
            })
            .collect();

        Self {
            days: Weekday::ALL.to_vec(),
            rows,
        }
    }

    pub fn cell(&self, day: Weekday, time: &str) -> Option<&ScheduleCell> {
        let column = Weekday::ALL.iter().position(|d| *d == day)?;
        self.rows
            .iter()
            .find(|row| row.time == time)
            .and_then(|row| row.cells.get(column))
    }
}

/// Scheduled hours for one employee
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamHours {
    pub employee_id: String,
    pub employee_name: Option<String>,
    pub hours: u32,
}

/// Hours per employee, in order of first appearance in `shifts`
pub fn team_hours(shifts: &[Shift], employees: &[Record<Employee>]) -> Vec<TeamHours> {
    let mut totals: Vec<TeamHours> = Vec::new();

    for shift in shifts {
        match totals.iter_mut().find(|t| t.employee_id == shift.employee_id) {
            Some(total) => total.hours += shift.duration_hours(),
            None => totals.push(TeamHours {
                employee_id: shift.employee_id.clone(),
                employee_name: find_in(employees, &shift.employee_id).map(|e| e.data.name.clone()),
                hours: shift.duration_hours(),
            }),
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    fn roster() -> Vec<Record<Employee>> {
        vec![Record {
            id: "1".to_string(),
            data: Employee {
                name: "Sarah Miller".to_string(),
                email: "sarah@example.com".to_string(),
                role: EmployeeRole::Manager,
                avatar_url: String::new(),
            },
        }]
    }

    #[test]
    fn test_slots() {
        let slots = time_slots();
        assert_eq!(slots.len(), 15);
        assert_eq!(slots[0].format("%H:%M").to_string(), "07:00");
        assert_eq!(slots[14].format("%H:%M").to_string(), "21:00");
    }

    #[test]
    fn test_start_and_covered_cells() {
        let grid = ScheduleGrid::build(&sample::shifts(), &roster());
        assert_eq!(grid.rows.len(), 15);
        assert!(grid.rows.iter().all(|r| r.cells.len() == 7));

        match grid.cell(Weekday::Mon, "09:00").unwrap() {
            ScheduleCell::Start {
                employee_name,
                duration_hours,
                ..
            } => {
                assert_eq!(employee_name.as_deref(), Some("Sarah Miller"));
                assert_eq!(*duration_hours, 8);
            }
            other => panic!("expected start cell, got {:?}", other),
        }

        // s2 starts 07:00 on Monday, s1 starts 09:00; 10:00 is inside both
        assert_eq!(grid.cell(Weekday::Mon, "10:00"), Some(&ScheduleCell::Covered));
        // 17:00 is s1's end, which is not covered
        assert_eq!(grid.cell(Weekday::Mon, "17:00"), Some(&ScheduleCell::Empty));
        assert_eq!(grid.cell(Weekday::Sun, "07:00"), Some(&ScheduleCell::Empty));
    }

    #[test]
    fn test_unknown_employee_has_no_name() {
        let grid = ScheduleGrid::build(&sample::shifts(), &[]);
        match grid.cell(Weekday::Mon, "07:00").unwrap() {
            ScheduleCell::Start { employee_name, .. } => assert!(employee_name.is_none()),
            other => panic!("expected start cell, got {:?}", other),
        }
    }

    #[test]
    fn test_team_hours() {
        let hours = team_hours(&sample::shifts(), &roster());
        let by_id: Vec<(&str, u32)> = hours.iter().map(|h| (h.employee_id.as_str(), h.hours)).collect();

        assert_eq!(by_id, vec![("1", 8), ("2", 16), ("3", 16), ("4", 16), ("5", 16)]);
        assert_eq!(hours[0].employee_name.as_deref(), Some("Sarah Miller"));
    }
}
