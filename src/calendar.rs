//! Month grid for the todos calendar.
//!
//! A todo lands in the bucket of its due date and, independently, in the
//! bucket of the UTC date it was created on. When those differ it shows up
//! in two cells.

use chrono::{Datelike, Months, NaiveDate};

use crate::Todo;

/// A calendar month, navigable one month at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    pub todos: Vec<&'a Todo>,
}

impl CalendarMonth {
    /// Returns `None` when `month` is not in 1..=12 or the year is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| CalendarMonth { year, month })
    }

    /// The month `date` falls in; `containing(today)` is "jump to current month".
    pub fn containing(date: NaiveDate) -> Self {
        CalendarMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn prev(&self) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(1))
            .map(Self::containing)
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map(Self::containing)
            .unwrap_or(*self)
    }

    /// Moves `offset` months forward (or back when negative). `None` when the
    /// target month is outside the representable date range.
    pub fn shift(&self, offset: i64) -> Option<Self> {
        let months = Months::new(u32::try_from(offset.unsigned_abs()).ok()?);
        let first = self.first_day();
        let moved = if offset < 0 {
            first.checked_sub_months(months)
        } else {
            first.checked_add_months(months)
        }?;
        Some(Self::containing(moved))
    }

    pub fn days_in_month(&self) -> u32 {
        let next_first = self.next().first_day();
        if next_first == self.first_day() {
            // Last representable month.
            return 31;
        }
        (next_first - self.first_day()).num_days() as u32
    }

    /// Empty cells before day 1 in a Sunday-first week grid
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// e.g. "November 2025"
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days_in_month()).filter_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
    }

    /// One bucket per day of the month, in order. Pass the filtered view to
    /// narrow the grid.
    pub fn buckets<'a>(&self, todos: &[&'a Todo], today: NaiveDate) -> Vec<DayBucket<'a>> {
        self.days()
            .map(|date| DayBucket {
                date,
                is_today: date == today,
                todos: todos_for_date(todos, date),
            })
            .collect()
    }
}

/// Todos due on `date` or created on `date`, in collection order.
pub fn todos_for_date<'a>(todos: &[&'a Todo], date: NaiveDate) -> Vec<&'a Todo> {
    todos
        .iter()
        .copied()
        .filter(|todo| todo.due_date == Some(date) || todo.created_at.date_naive() == date)
        .collect()
}
