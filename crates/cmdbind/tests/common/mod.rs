#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use serde_json::Value;

use cmdbind::{ActionResponse, CliError, Presenter};

pub fn cmdbind_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cmdbind"));
    for var in ["CMDBIND_LOG", "CMDBIND_LOG_LEVEL", "CMDBIND_OUTPUT", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presented {
    Response(Value),
    Error(String),
    Help(String),
}

/// Presenter that keeps everything it is given.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    seen: Rc<RefCell<Vec<Presented>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn Presenter> {
        Box::new(self.clone())
    }

    pub fn seen(&self) -> Vec<Presented> {
        self.seen.borrow().clone()
    }

    pub fn help(&self) -> Option<String> {
        self.seen.borrow().iter().rev().find_map(|p| match p {
            Presented::Help(text) => Some(text.clone()),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn present_response(&self, response: &ActionResponse) {
        self.seen
            .borrow_mut()
            .push(Presented::Response(response.data.clone()));
    }

    fn present_error(&self, error: &CliError) {
        self.seen
            .borrow_mut()
            .push(Presented::Error(error.to_string()));
    }

    fn present_help(&self, help: &str) {
        self.seen.borrow_mut().push(Presented::Help(help.to_string()));
    }
}

/// In-memory sink for log lines emitted on the current thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Installs a subscriber for the current thread; logs are captured until
    /// the guard is dropped.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains("ERROR"))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
