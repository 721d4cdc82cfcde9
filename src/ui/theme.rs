use tui::style::{Color, Modifier, Style};

use crate::models::{TaskPriority, TaskStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light Mode",
            Theme::Dark => "Dark Mode",
        }
    }

    /// Foreground and background of every screen
    pub fn base(self) -> Style {
        match self {
            Theme::Light => Style::default().fg(Color::Black).bg(Color::White),
            Theme::Dark => Style::default().fg(Color::White).bg(Color::Black),
        }
    }

    pub fn accent(self) -> Color {
        match self {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::Cyan,
        }
    }

    pub fn title(self) -> Style {
        self.base().fg(self.accent()).add_modifier(Modifier::BOLD)
    }

    pub fn muted(self) -> Style {
        match self {
            Theme::Light => self.base().fg(Color::DarkGray),
            Theme::Dark => self.base().fg(Color::Gray),
        }
    }

    pub fn highlight(self) -> Style {
        Style::default()
            .bg(self.accent())
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn focused_field(self) -> Style {
        self.base().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }

    pub fn error(self) -> Style {
        self.base().fg(Color::Red)
    }

    pub fn border(self, focused: bool) -> Style {
        if focused {
            self.base().fg(self.accent())
        } else {
            self.muted()
        }
    }

    pub fn status(self, status: TaskStatus) -> Style {
        let color = match status {
            TaskStatus::Pending => Color::Gray,
            TaskStatus::InProgress => Color::Magenta,
            TaskStatus::Completed => Color::Green,
        };
        self.base().fg(color)
    }

    pub fn priority(self, priority: TaskPriority) -> Style {
        let color = match priority {
            TaskPriority::Low => Color::Blue,
            TaskPriority::Medium => Color::Yellow,
            TaskPriority::High => Color::Red,
        };
        self.base().fg(color)
    }
}
