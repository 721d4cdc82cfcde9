use std::fmt;

/// Screens addressed by path segment, as in `/companies`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Overview,
    Companies,
    Contacts,
    Tasks,
    Settings,
    NotFound(String),
}

impl Route {
    /// Entries shown in the sidebar, in order
    pub const NAV: [Route; 4] = [Route::Companies, Route::Contacts, Route::Tasks, Route::Settings];

    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match normalized {
            "" | "/" => Route::Overview,
            "/companies" => Route::Companies,
            "/contacts" => Route::Contacts,
            "/tasks" => Route::Tasks,
            "/settings" => Route::Settings,
            other => Route::NotFound(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Overview => "/",
            Route::Companies => "/companies",
            Route::Contacts => "/contacts",
            Route::Tasks => "/tasks",
            Route::Settings => "/settings",
            Route::NotFound(path) => path,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Overview => "Overview",
            Route::Companies => "Companies",
            Route::Contacts => "Contacts",
            Route::Tasks => "Tasks",
            Route::Settings => "Settings",
            Route::NotFound(_) => "Not Found",
        }
    }

    /// Jump key: `0` for the overview, `1`-`4` for the sidebar entries
    pub fn from_shortcut(c: char) -> Option<Self> {
        match c {
            '0' => Some(Route::Overview),
            '1'..='4' => c
                .to_digit(10)
                .and_then(|n| Self::NAV.get(n as usize - 1).cloned()),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Route::Overview => Route::Companies,
            Route::Companies => Route::Contacts,
            Route::Contacts => Route::Tasks,
            Route::Tasks => Route::Settings,
            Route::Settings | Route::NotFound(_) => Route::Overview,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Route::Overview | Route::NotFound(_) => Route::Settings,
            Route::Companies => Route::Overview,
            Route::Contacts => Route::Companies,
            Route::Tasks => Route::Contacts,
            Route::Settings => Route::Tasks,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
