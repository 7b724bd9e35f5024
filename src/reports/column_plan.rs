use crate::models::{time_records::Period, weekly::Week};
use chrono::NaiveDate;
use rust_xlsxwriter::ColNum;

/// What a single column under a day header holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    MorningProject,
    MorningHours,
    AfternoonProject,
    AfternoonHours,
}

impl ColumnRole {
    /// The layout used under every day of the weekly grid.
    pub const DAY_LAYOUT: [ColumnRole; 4] = [
        ColumnRole::MorningProject,
        ColumnRole::MorningHours,
        ColumnRole::AfternoonProject,
        ColumnRole::AfternoonHours,
    ];

    pub fn period(self) -> Period {
        match self {
            ColumnRole::MorningProject | ColumnRole::MorningHours => Period::Morning,
            ColumnRole::AfternoonProject | ColumnRole::AfternoonHours => Period::Afternoon,
        }
    }

    pub fn is_hours(self) -> bool {
        matches!(self, ColumnRole::MorningHours | ColumnRole::AfternoonHours)
    }

    /// Sub-column label in the third header row.
    pub fn label(self) -> &'static str {
        if self.is_hours() {
            "工时"
        } else {
            self.period().sheet_label()
        }
    }

    pub fn width(self) -> f64 {
        if self.is_hours() { 8.0 } else { 15.0 }
    }
}

/// The consecutive columns assigned to one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumns {
    pub date: NaiveDate,
    pub first_col: ColNum,
    pub roles: Vec<ColumnRole>,
}

impl DayColumns {
    pub fn last_col(&self) -> ColNum {
        self.first_col + self.roles.len().saturating_sub(1) as ColNum
    }

    /// Column holding `role`, if this day has one.
    pub fn col(&self, role: ColumnRole) -> Option<ColNum> {
        self.roles
            .iter()
            .position(|r| *r == role)
            .map(|offset| self.first_col + offset as ColNum)
    }

    /// `(column, role)` pairs left to right.
    pub fn columns(&self) -> impl Iterator<Item = (ColNum, ColumnRole)> + '_ {
        self.roles
            .iter()
            .enumerate()
            .map(|(offset, role)| (self.first_col + offset as ColNum, *role))
    }
}

/// Where each day's columns sit in the weekly grid. Column 0 holds the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub name_col: ColNum,
    days: Vec<DayColumns>,
}

impl ColumnPlan {
    pub fn for_week(week: &Week) -> Self {
        Self::with_layout(&week.dates(), &ColumnRole::DAY_LAYOUT)
    }

    pub fn with_layout(dates: &[NaiveDate], layout: &[ColumnRole]) -> Self {
        let name_col: ColNum = 0;
        let mut next_col = name_col + 1;
        let days = dates
            .iter()
            .map(|date| {
                let day = DayColumns {
                    date: *date,
                    first_col: next_col,
                    roles: layout.to_vec(),
                };
                next_col += layout.len() as ColNum;
                day
            })
            .collect();

        Self { name_col, days }
    }

    pub fn days(&self) -> &[DayColumns] {
        &self.days
    }

    pub fn last_col(&self) -> ColNum {
        self.days
            .iter()
            .map(DayColumns::last_col)
            .max()
            .unwrap_or(self.name_col)
    }
}
