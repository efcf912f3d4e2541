//! Boolean derived from environment state.
//!
//! `Environment` is the signal boundary: the platform feeds it viewport
//! size and color-scheme changes, and each `MediaWatch` re-evaluates its
//! query on every change. Watches own their subscription and release it on
//! drop, so no ambient listener outlives its owner.

use std::cell::Cell;
use std::str::FromStr;

use rewire_core::{Signal, SubId, signal};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Environment attributes queries are evaluated against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvState {
    /// Viewport size in px.
    pub viewport: (f32, f32),
    pub color_scheme: ColorScheme,
}

impl Default for EnvState {
    fn default() -> Self {
        Self {
            viewport: (1280.0, 800.0),
            color_scheme: ColorScheme::Light,
        }
    }
}

/// Shared handle to the environment signal. The platform runner mutates it;
/// watches subscribe to it.
#[derive(Clone)]
pub struct Environment {
    state: Signal<EnvState>,
}

impl Environment {
    pub fn new(initial: EnvState) -> Self {
        Self {
            state: signal(initial),
        }
    }

    pub fn get(&self) -> EnvState {
        self.state.get()
    }

    pub fn set_viewport(&self, width: f32, height: f32) {
        self.state.update(|st| st.viewport = (width, height));
    }

    pub fn set_color_scheme(&self, scheme: ColorScheme) {
        self.state.update(|st| st.color_scheme = scheme);
    }

    pub fn signal(&self) -> &Signal<EnvState> {
        &self.state
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(EnvState::default())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("malformed media query {0:?}")]
    Malformed(String),
    #[error("unsupported media feature {0:?}")]
    Unsupported(String),
}

/// Condition over `EnvState`, parsed from the conventional string form:
/// `(min-width: 600px)`, `(max-width: 768px)`,
/// `(prefers-color-scheme: dark)`.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaQuery {
    MinWidth(f32),
    MaxWidth(f32),
    PrefersColorScheme(ColorScheme),
}

impl MediaQuery {
    pub fn evaluate(&self, env: &EnvState) -> bool {
        match self {
            MediaQuery::MinWidth(px) => env.viewport.0 >= *px,
            MediaQuery::MaxWidth(px) => env.viewport.0 <= *px,
            MediaQuery::PrefersColorScheme(scheme) => env.color_scheme == *scheme,
        }
    }
}

impl FromStr for MediaQuery {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let (feature, value) = inner
            .split_once(':')
            .ok_or_else(|| QueryError::Malformed(s.to_owned()))?;
        let (feature, value) = (feature.trim(), value.trim());

        match feature {
            "min-width" | "max-width" => {
                let px = value
                    .strip_suffix("px")
                    .and_then(|n| n.trim().parse::<f32>().ok())
                    .ok_or_else(|| QueryError::Malformed(s.to_owned()))?;
                if feature == "min-width" {
                    Ok(MediaQuery::MinWidth(px))
                } else {
                    Ok(MediaQuery::MaxWidth(px))
                }
            }
            "prefers-color-scheme" => match value {
                "dark" => Ok(MediaQuery::PrefersColorScheme(ColorScheme::Dark)),
                "light" => Ok(MediaQuery::PrefersColorScheme(ColorScheme::Light)),
                other => Err(QueryError::Malformed(other.to_owned())),
            },
            other => Err(QueryError::Unsupported(other.to_owned())),
        }
    }
}

/// Live boolean result of a query against an `Environment`.
pub struct MediaWatch {
    env: Environment,
    matches: Signal<bool>,
    sub: Cell<Option<SubId>>,
}

impl MediaWatch {
    pub fn new(env: &Environment, query: MediaQuery) -> Self {
        let matches = signal(query.evaluate(&env.get()));
        let sub = env.state.subscribe({
            let matches = matches.clone();
            move |st| {
                let next = query.evaluate(st);
                if next != matches.get() {
                    matches.set(next);
                }
            }
        });
        Self {
            env: env.clone(),
            matches,
            sub: Cell::new(Some(sub)),
        }
    }

    pub fn matches(&self) -> bool {
        self.matches.get()
    }

    pub fn signal(&self) -> &Signal<bool> {
        &self.matches
    }
}

impl Drop for MediaWatch {
    fn drop(&mut self) {
        if let Some(id) = self.sub.take() {
            self.env.state.unsubscribe(id);
        }
    }
}

/// Parses `query` and starts watching it.
pub fn use_media_query(env: &Environment, query: &str) -> Result<MediaWatch, QueryError> {
    Ok(MediaWatch::new(env, query.parse()?))
}
