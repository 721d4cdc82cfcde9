use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn width(self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            DatePart::Year => "[YYYY]",
            DatePart::Month => "[MM]",
            DatePart::Day => "[DD]",
        }
    }
}

/// Digit-by-digit editor for one calendar date
#[derive(Debug, Clone)]
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub current_date_input: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            current_date_input: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            self.date_part = DatePart::Year;
        }
        self.current_date_input.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.current_date_input.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.current_date_input.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.current_date_input.push(c);
                if self.current_date_input.len() == self.date_part.width() {
                    self.apply_current_input();
                    self.current_date_input.clear();
                }
            }
            KeyCode::Backspace => {
                self.current_date_input.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    // Out-of-range values (month 13, Feb 30, year 0042) leave the date as it was
    fn apply_current_input(&mut self) {
        let Ok(value) = self.current_date_input.parse::<u32>() else {
            return;
        };

        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());
        let candidate = match self.date_part {
            DatePart::Year if (1900..=2100).contains(&value) => {
                // Feb 29 moved to a non-leap year clamps to the 28th
                NaiveDate::from_ymd_opt(value as i32, month, day)
                    .or_else(|| NaiveDate::from_ymd_opt(value as i32, month, day.min(28)))
            }
            DatePart::Month if (1..=12).contains(&value) => {
                NaiveDate::from_ymd_opt(year, value, day.min(days_in_month(year, value)))
            }
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
            _ => None,
        };

        if let Some(date) = candidate {
            self.date = date;
        }
    }

    pub fn get_display_string(&self) -> String {
        if !self.editing {
            return self.date.format("%Y-%m-%d").to_string();
        }

        let current_input = if self.current_date_input.is_empty() {
            self.date_part.placeholder().to_string()
        } else {
            format!("[{}]", self.current_date_input)
        };

        let year = format!("{:04}", self.date.year());
        let month = format!("{:02}", self.date.month());
        let day = format!("{:02}", self.date.day());

        match self.date_part {
            DatePart::Year => format!("{year}{current_input}-{month}-{day}"),
            DatePart::Month => format!("{year}-{month}{current_input}-{day}"),
            DatePart::Day => format!("{year}-{month}-{day}{current_input}"),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
