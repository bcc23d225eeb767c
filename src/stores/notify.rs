use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: Uuid,
    pub variant: ToastVariant,
    pub title: Option<String>,
    pub message: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ToastOptions {
    pub variant: Option<ToastVariant>,
    pub title: Option<String>,
    pub duration_ms: Option<u64>,
}

/// Shared toast queue, handed to consumers explicitly instead of living as
/// an ambient global.
#[derive(Debug, Clone, Default)]
pub struct ToastStore {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    pub fn show(&self, message: &str, options: ToastOptions) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            variant: options.variant.unwrap_or(ToastVariant::Info),
            title: options.title,
            message: message.to_string(),
            duration_ms: options.duration_ms.unwrap_or(DEFAULT_DURATION_MS),
        };
        let id = toast.id;
        self.lock().push(toast);
        id
    }

    pub fn success(&self, message: &str, title: Option<&str>) -> Uuid {
        self.com_variante(message, title, ToastVariant::Success)
    }

    pub fn error(&self, message: &str, title: Option<&str>) -> Uuid {
        self.com_variante(message, title, ToastVariant::Error)
    }

    pub fn warning(&self, message: &str, title: Option<&str>) -> Uuid {
        self.com_variante(message, title, ToastVariant::Warning)
    }

    pub fn info(&self, message: &str, title: Option<&str>) -> Uuid {
        self.com_variante(message, title, ToastVariant::Info)
    }

    pub fn remove(&self, id: Uuid) {
        self.lock().retain(|t| t.id != id);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn com_variante(&self, message: &str, title: Option<&str>, variant: ToastVariant) -> Uuid {
        self.show(
            message,
            ToastOptions {
                variant: Some(variant),
                title: title.map(str::to_string),
                duration_ms: None,
            },
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sidebar collapsed flag shared across the layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    collapsed: Arc<AtomicBool>,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sidebar_collapsed(&self) -> bool {
        self.collapsed.load(Ordering::Relaxed)
    }

    pub fn toggle_sidebar(&self) {
        self.collapsed.fetch_xor(true, Ordering::Relaxed);
    }
}
