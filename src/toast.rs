//! Ephemeral feedback messages.
//!
//! A small toast queue with auto-dismiss. Editors push a message after each
//! action; front ends poll `active()` and call `prune_expired()` on their
//! own clock. Nothing here is persisted.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Default auto-dismiss duration in milliseconds
pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Maximum toasts kept at once; the oldest is dropped first
const MAX_TOASTS: usize = 50;

/// Toast level (determines styling)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }

    /// Get icon/prefix for this level
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
            ToastKind::Info => "ℹ",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
    /// How long before auto-dismiss (None = manual dismiss only)
    pub duration: Option<Duration>,
}

impl Toast {
    /// Check if this toast has outlived its duration at `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.duration {
            Some(duration) => now.saturating_duration_since(self.created_at) >= duration,
            None => false,
        }
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}

/// Queue of live toasts, oldest first.
#[derive(Debug)]
pub struct Toasts {
    toasts: VecDeque<Toast>,
    default_duration: Option<Duration>,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

impl Toasts {
    pub fn new() -> Self {
        Self::with_default_duration_ms(DEFAULT_DURATION_MS)
    }

    /// Use `ms` as the lifetime of toasts added through the shortcuts.
    /// Zero makes them sticky.
    pub fn with_default_duration_ms(ms: u64) -> Self {
        Self {
            toasts: VecDeque::new(),
            default_duration: duration_from_ms(ms),
        }
    }

    /// Add a toast and return its id. A zero duration never expires.
    pub fn add(&mut self, message: impl Into<String>, kind: ToastKind, duration: Duration) -> String {
        let duration = (!duration.is_zero()).then_some(duration);
        self.push(message.into(), kind, duration)
    }

    pub fn success(&mut self, message: impl Into<String>) -> String {
        self.push(message.into(), ToastKind::Success, self.default_duration)
    }

    pub fn error(&mut self, message: impl Into<String>) -> String {
        self.push(message.into(), ToastKind::Error, self.default_duration)
    }

    pub fn info(&mut self, message: impl Into<String>) -> String {
        self.push(message.into(), ToastKind::Info, self.default_duration)
    }

    /// Dismiss a toast. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) {
        self.toasts.retain(|t| t.id != id);
    }

    /// Drop every toast that has expired at `now`; returns how many went.
    pub fn prune_expired(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|t| !t.is_expired_at(now));
        before - self.toasts.len()
    }

    pub fn active(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Remove and return every toast, oldest first.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    fn push(&mut self, message: String, kind: ToastKind, duration: Option<Duration>) -> String {
        let toast = Toast {
            id: crate::models::generate_id(),
            kind,
            message,
            created_at: Instant::now(),
            duration,
        };
        let id = toast.id.clone();

        self.toasts.push_back(toast);
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
        id
    }
}

fn duration_from_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
