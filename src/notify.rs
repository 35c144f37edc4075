use std::sync::Mutex;

use crate::logging::{self, obj, v_str, Domain, Level};

/// User-facing notification surface. The page toast system in the original
/// deployment; injected so the controller never reaches for globals.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Routes notifications through the structured logger.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&self, message: &str) {
        logging::log(Level::Info, Domain::System, "notify", obj(&[("msg", v_str(message))]));
    }

    fn success(&self, message: &str) {
        logging::log(Level::Info, Domain::System, "notify_success", obj(&[("msg", v_str(message))]));
    }

    fn warning(&self, message: &str) {
        logging::log(Level::Warn, Domain::System, "notify_warning", obj(&[("msg", v_str(message))]));
    }

    fn error(&self, message: &str) {
        logging::log(Level::Error, Domain::System, "notify_error", obj(&[("msg", v_str(message))]));
    }
}

/// Captures notifications in memory. Test double.
#[derive(Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last_of(&self, kind: &str) -> Option<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| k == kind)
            .map(|(_, m)| m.clone())
    }

    fn push(&self, kind: &str, message: &str) {
        self.messages.lock().unwrap().push((kind.to_string(), message.to_string()));
    }
}

impl Notifier for MemoryNotifier {
    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn success(&self, message: &str) {
        self.push("success", message);
    }

    fn warning(&self, message: &str) {
        self.push("warning", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}
