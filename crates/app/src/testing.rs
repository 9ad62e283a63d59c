//! In-memory port implementations shared by the unit tests of this crate.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use pironman_domain::config::{ConfigDocument, merge_value};
use pironman_domain::error::PironmanError;
use pironman_domain::log_level::LogLevel;
use pironman_domain::status::Status;

use crate::ports::{
    Automation, ConfigListener, ConfigStore, Dashboard, LogLevelControl, Oled, StatusListener,
};

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Ordered record of collaborator calls, shared between stubs.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, call: &str) {
        self.0.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    document: Arc<Mutex<Option<Value>>>,
    fail_loads: Arc<AtomicBool>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn with(document: Value) -> Self {
        let store = Self::default();
        *store.document.lock().unwrap() = Some(document);
        store
    }

    pub fn persisted(&self) -> Option<Value> {
        self.document.lock().unwrap().clone()
    }

    pub fn fail_loads(&self) {
        self.fail_loads.store(true, Ordering::SeqCst);
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<Value>, PironmanError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(PironmanError::Storage("unreadable".into()));
        }
        Ok(self.persisted())
    }

    fn save(&self, document: &ConfigDocument) -> Result<(), PironmanError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PironmanError::Storage("read-only".into()));
        }
        *self.document.lock().unwrap() = Some(document.clone().into_value());
        Ok(())
    }
}

pub struct RecordingAutomation {
    log: CallLog,
    config: Mutex<Value>,
    level: Mutex<Option<LogLevel>>,
    listener: Mutex<Option<Arc<dyn StatusListener>>>,
    fail_start: AtomicBool,
    reject_updates: AtomicBool,
}

impl RecordingAutomation {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            config: Mutex::new(Value::Object(Map::new())),
            level: Mutex::new(None),
            listener: Mutex::new(None),
            fail_start: AtomicBool::new(false),
            reject_updates: AtomicBool::new(false),
        }
    }

    pub fn fail_start(&self) {
        self.fail_start.store(true, Ordering::SeqCst);
    }

    pub fn reject_updates(&self) {
        self.reject_updates.store(true, Ordering::SeqCst);
    }

    pub fn config(&self) -> Value {
        self.config.lock().unwrap().clone()
    }

    pub fn level(&self) -> Option<LogLevel> {
        *self.level.lock().unwrap()
    }

    pub fn listener(&self) -> Option<Arc<dyn StatusListener>> {
        self.listener.lock().unwrap().clone()
    }
}

impl Automation for RecordingAutomation {
    fn version(&self) -> &str {
        "test"
    }

    async fn start(&self) -> Result<(), PironmanError> {
        self.log.record("automation.start");
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(PironmanError::component("automation", "no fan"));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), PironmanError> {
        self.log.record("automation.stop");
        Ok(())
    }

    fn set_debug_level(&self, level: LogLevel) {
        self.log.record("automation.set_debug_level");
        *self.level.lock().unwrap() = Some(level);
    }

    fn update_config(&self, system: &Map<String, Value>) -> Result<(), PironmanError> {
        if self.reject_updates.load(Ordering::SeqCst) {
            return Err(PironmanError::component("automation", "rejected"));
        }
        self.log.record("automation.update_config");
        merge_value(&mut self.config.lock().unwrap(), &Value::Object(system.clone()));
        Ok(())
    }

    fn set_on_state_changed(&self, listener: Arc<dyn StatusListener>) {
        *self.listener.lock().unwrap() = Some(listener);
    }
}

pub struct RecordingDashboard {
    log: CallLog,
    statuses: Mutex<Vec<Status>>,
    config: Mutex<Option<ConfigDocument>>,
    listener: Mutex<Option<Arc<dyn ConfigListener>>>,
}

impl RecordingDashboard {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            statuses: Mutex::new(Vec::new()),
            config: Mutex::new(None),
            listener: Mutex::new(None),
        }
    }

    pub fn config(&self) -> Option<ConfigDocument> {
        self.config.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn listener(&self) -> Option<Arc<dyn ConfigListener>> {
        self.listener.lock().unwrap().clone()
    }
}

impl Dashboard for RecordingDashboard {
    fn version(&self) -> &str {
        "test"
    }

    async fn start(&self) -> Result<(), PironmanError> {
        self.log.record("dashboard.start");
        Ok(())
    }

    async fn stop(&self) -> Result<(), PironmanError> {
        self.log.record("dashboard.stop");
        Ok(())
    }

    fn set_debug_level(&self, _level: LogLevel) {
        self.log.record("dashboard.set_debug_level");
    }

    fn update_status(&self, status: &Status) {
        self.statuses.lock().unwrap().push(status.clone());
    }

    fn update_config(&self, config: &ConfigDocument) {
        self.log.record("dashboard.update_config");
        *self.config.lock().unwrap() = Some(config.clone());
    }

    fn set_on_config_changed(&self, listener: Arc<dyn ConfigListener>) {
        *self.listener.lock().unwrap() = Some(listener);
    }
}

pub struct RecordingOled {
    log: CallLog,
    ready: bool,
    fail_display: AtomicBool,
    displayed: Mutex<Vec<PathBuf>>,
}

impl RecordingOled {
    pub fn ready(log: CallLog) -> Self {
        Self::build(log, true)
    }

    pub fn not_ready(log: CallLog) -> Self {
        Self::build(log, false)
    }

    fn build(log: CallLog, ready: bool) -> Self {
        Self {
            log,
            ready,
            fail_display: AtomicBool::new(false),
            displayed: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_display(&self) {
        self.fail_display.store(true, Ordering::SeqCst);
    }

    pub fn displayed(&self) -> Vec<PathBuf> {
        self.displayed.lock().unwrap().clone()
    }
}

impl Oled for RecordingOled {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn display_gif(&self, path: &Path) -> Result<(), PironmanError> {
        self.log.record("oled.display_gif");
        if self.fail_display.load(Ordering::SeqCst) {
            return Err(PironmanError::component("oled", "i2c write failed"));
        }
        self.displayed.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub struct RecordingLogControl {
    log: CallLog,
    fail: AtomicBool,
}

impl RecordingLogControl {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl LogLevelControl for RecordingLogControl {
    fn set_level(&self, _level: LogLevel) -> Result<(), PironmanError> {
        self.log.record("log_control.set_level");
        if self.fail.load(Ordering::SeqCst) {
            return Err(PironmanError::component("logging", "subscriber gone"));
        }
        Ok(())
    }
}
