#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use furns_admin::prelude::*;
use wiremock::MockServer;

pub const SECRET: &str = "test-secret";

pub fn options(server: &MockServer) -> ClientOptions {
    ClientOptions::default()
        .with_backend_url(&server.uri())
        .with_api_secret(SECRET)
}

pub fn client(server: &MockServer) -> AdminClient {
    AdminClient::new(options(server)).unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {}", SECRET)
}

/// Keeps every notice so tests can assert on what the operator saw.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(bool, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn successes(&self) -> Vec<String> {
        self.filtered(true)
    }

    pub fn errors(&self) -> Vec<String> {
        self.filtered(false)
    }

    fn filtered(&self, ok: bool) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(success, _)| *success == ok)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices.lock().unwrap().push((true, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices.lock().unwrap().push((false, message.to_string()));
    }
}
