//! UI state for the dashboard and the small derivations the views need.

use axum::http::{header, HeaderMap};
use chrono::NaiveDateTime;
use cookie::Cookie;
use tracing::warn;

pub const PINNED_COOKIE: &str = "pinned_gyms";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Heatmap(String),
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    TogglePin(String),
    ShowDashboard,
    ShowHeatmap(String),
    ShowSettings,
    ReloadRequested,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub pinned: Vec<String>,
    pub view: View,
    pub loading: bool,
}

impl ViewState {
    pub fn new(pinned: Vec<String>) -> Self {
        Self {
            pinned,
            view: View::Dashboard,
            loading: false,
        }
    }

    pub fn apply(self, event: Event) -> Self {
        match event {
            Event::TogglePin(name) => {
                let mut pinned = self.pinned;
                if let Some(index) = pinned.iter().position(|gym| *gym == name) {
                    pinned.remove(index);
                } else {
                    pinned.push(name);
                }
                Self { pinned, ..self }
            }
            Event::ShowDashboard => Self {
                view: View::Dashboard,
                ..self
            },
            Event::ShowHeatmap(name) => Self {
                view: View::Heatmap(name),
                ..self
            },
            Event::ShowSettings => Self {
                view: View::Settings,
                ..self
            },
            Event::ReloadRequested => Self {
                loading: true,
                ..self
            },
            Event::Loaded => Self {
                loading: false,
                ..self
            },
        }
    }

    pub fn is_pinned(&self, name: &str) -> bool {
        self.pinned.iter().any(|gym| gym == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Good,
    Moderate,
    Busy,
}

impl Tier {
    pub fn of(percentage: f64) -> Self {
        if percentage < 30.0 {
            Tier::Good
        } else if percentage < 70.0 {
            Tier::Moderate
        } else {
            Tier::Busy
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Tier::Good => "🟢",
            Tier::Moderate => "🟡",
            Tier::Busy => "🔴",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Good => "Good to go!",
            Tier::Moderate => "Moderate crowd",
            Tier::Busy => "Pretty busy",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Moderate => "moderate",
            Tier::Busy => "busy",
        }
    }
}

/// Drops the operator branding from a location name.
pub fn display_name(name: &str) -> String {
    name.replacen("ActiveSG Gym @ ", "", 1)
        .replacen(" ActiveSG Gym", "", 1)
}

pub fn last_updated_label(latest: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let Some(latest) = latest else {
        return "No data".to_string();
    };
    let minutes = (now - latest).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if minutes < 1440 {
        format!("{} hr ago", minutes / 60)
    } else {
        format!("{} days ago", minutes / 1440)
    }
}

/// Pinned locations stored in the request cookie, if the browser has any.
pub fn pinned_from_headers(headers: &HeaderMap) -> Option<Vec<String>> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse_encoded)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == PINNED_COOKIE)
        .and_then(|cookie| match serde_json::from_str(cookie.value()) {
            Ok(pinned) => Some(pinned),
            Err(err) => {
                warn!("ignoring unreadable pinned cookie: {err}");
                None
            }
        })
}

/// `Set-Cookie` value persisting the pinned list in the browser.
pub fn pinned_cookie(pinned: &[String]) -> Result<String, serde_json::Error> {
    let value = serde_json::to_string(pinned)?;
    Ok(Cookie::build(PINNED_COOKIE, value)
        .path("/")
        .permanent()
        .finish()
        .encoded()
        .to_string())
}
