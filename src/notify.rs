//! Toast notifications.
//!
//! The core only talks to a [`Notifier`]; the frontend's toast host
//! implements it on top of a signal.

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    /// Stays until dismissed.
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Loading,
            message: message.into(),
        }
    }

    /// Non-loading toasts disappear on their own.
    pub fn auto_dismiss(&self) -> bool {
        self.kind != ToastKind::Loading
    }
}

pub trait Notifier {
    fn notify(&self, toast: Toast) -> ToastId;
    fn dismiss(&self, id: ToastId);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, toast: Toast) -> ToastId {
        (**self).notify(toast)
    }

    fn dismiss(&self, id: ToastId) {
        (**self).dismiss(id)
    }
}

// =========================================================
// 测试工具: RecordingNotifier
// =========================================================

/// Keeps every toast ever shown and the ones still on screen.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub shown: std::cell::RefCell<Vec<(ToastId, Toast)>>,
    pub dismissed: std::cell::RefCell<Vec<ToastId>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts not yet dismissed.
    pub fn active(&self) -> Vec<Toast> {
        let dismissed = self.dismissed.borrow();
        self.shown
            .borrow()
            .iter()
            .filter(|(id, _)| !dismissed.contains(id))
            .map(|(_, t)| t.clone())
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.shown
            .borrow()
            .iter()
            .map(|(_, t)| t.message.clone())
            .collect()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) -> ToastId {
        let id = ToastId::new();
        self.shown.borrow_mut().push((id, toast));
        id
    }

    fn dismiss(&self, id: ToastId) {
        self.dismissed.borrow_mut().push(id);
    }
}
