//! Virtual automation controller.
//!
//! Reads the SoC temperature from a thermal-zone file (or a fixed fallback
//! when the file is unavailable), decides the fan state from
//! `gpio_fan_mode`, and publishes the result as a status snapshot.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::{Instrument, Span};

use pironman_app::ports::{Automation, StatusListener};
use pironman_domain::config::merge_value;
use pironman_domain::error::PironmanError;
use pironman_domain::log_level::LogLevel;
use pironman_domain::status::Status;
use pironman_domain::variant::Peripheral;

use crate::error::VirtualError;
use crate::fan::FanMode;

/// Kernel thermal zone of the Raspberry Pi SoC (millidegrees Celsius).
pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

const FALLBACK_CELSIUS: f64 = 45.0;

/// Bounds of `data_interval`, in seconds.
pub const MIN_DATA_INTERVAL: f64 = 1.0;
pub const MAX_DATA_INTERVAL: f64 = 3600.0;

/// Simulated automation controller.
pub struct VirtualAutomation {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    span: Span,
    peripherals: Vec<Peripheral>,
    thermal_zone: PathBuf,
    config: Mutex<Map<String, Value>>,
    listener: Mutex<Option<Arc<dyn StatusListener>>>,
    level: Mutex<LogLevel>,
}

impl VirtualAutomation {
    /// Create a controller for the given `system` section and peripherals.
    ///
    /// Settings the controller cannot use are dropped with a warning, so the
    /// built-in default applies instead. `span` scopes every log line the
    /// controller emits.
    pub fn new(mut system: Map<String, Value>, peripherals: &[Peripheral], span: Span) -> Self {
        system.retain(|key, value| match check(key, value) {
            Ok(()) => true,
            Err(err) => {
                span.in_scope(|| tracing::warn!(error = %err, "ignoring setting"));
                false
            }
        });
        Self {
            inner: Arc::new(Inner {
                span,
                peripherals: peripherals.to_vec(),
                thermal_zone: PathBuf::from(DEFAULT_THERMAL_ZONE),
                config: Mutex::new(system),
                listener: Mutex::new(None),
                level: Mutex::new(LogLevel::Info),
            }),
            task: Mutex::new(None),
        }
    }

    /// Read temperatures from `path` instead of [`DEFAULT_THERMAL_ZONE`].
    ///
    /// Only takes effect before [`start`](Automation::start); a running
    /// control loop keeps the zone it was started with.
    #[must_use]
    pub fn with_thermal_zone(mut self, path: impl Into<PathBuf>) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.thermal_zone = path.into();
        }
        self
    }

    /// Snapshot of the live `system` settings.
    #[must_use]
    pub fn config(&self) -> Map<String, Value> {
        lock(&self.inner.config).clone()
    }

    /// Verbosity of this controller's own log lines, [`LogLevel::Info`]
    /// until changed through [`set_debug_level`](Automation::set_debug_level).
    #[must_use]
    pub fn debug_level(&self) -> LogLevel {
        *lock(&self.inner.level)
    }

    /// Whether a line at `level` passes this controller's verbosity.
    #[must_use]
    pub fn logs_at(&self, level: LogLevel) -> bool {
        self.inner.logs_at(level)
    }

    /// Build a status snapshot from the current settings and temperature.
    #[must_use]
    pub fn snapshot(&self) -> Status {
        self.inner.snapshot()
    }

    /// Whether the control loop is alive: started, not stopped, and not
    /// ended by a panic.
    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.task)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Automation for VirtualAutomation {
    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    async fn start(&self) -> Result<(), PironmanError> {
        let mut task = lock(&self.task);
        if task.is_some() {
            return Ok(());
        }

        let inner = Arc::clone(&self.inner);
        let span = self.inner.span.clone();
        *task = Some(tokio::spawn(
            async move {
                if inner.logs_at(LogLevel::Info) {
                    tracing::info!("control loop running");
                }
                loop {
                    inner.publish();
                    tokio::time::sleep(inner.interval()).await;
                }
            }
            .instrument(span),
        ));
        Ok(())
    }

    async fn stop(&self) -> Result<(), PironmanError> {
        let handle = lock(&self.task).take();
        if let Some(handle) = handle {
            handle.abort();
            // Cancellation is the expected outcome; anything else is a panic
            // inside the loop, which has already been reported.
            let _ = handle.await;
            if self.inner.logs_at(LogLevel::Info) {
                self.inner
                    .span
                    .in_scope(|| tracing::info!("control loop stopped"));
            }
        }
        Ok(())
    }

    fn set_debug_level(&self, level: LogLevel) {
        *lock(&self.inner.level) = level;
        if self.inner.logs_at(LogLevel::Info) {
            self.inner
                .span
                .in_scope(|| tracing::info!(%level, "debug level changed"));
        }
    }

    fn update_config(&self, system: &Map<String, Value>) -> Result<(), PironmanError> {
        validate(system)?;
        {
            let mut config = lock(&self.inner.config);
            for (key, value) in system {
                match config.get_mut(key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        config.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        self.inner.span.in_scope(|| {
            if self.inner.logs_at(LogLevel::Info) {
                tracing::info!(keys = system.len(), "config updated");
            }
            self.inner.publish();
        });
        Ok(())
    }

    fn set_on_state_changed(&self, listener: Arc<dyn StatusListener>) {
        *lock(&self.inner.listener) = Some(listener);
    }
}

impl Inner {
    fn interval(&self) -> Duration {
        interval(&lock(&self.config))
    }

    fn logs_at(&self, level: LogLevel) -> bool {
        level <= *lock(&self.level)
    }

    fn snapshot(&self) -> Status {
        let config = lock(&self.config).clone();
        let celsius = read_celsius(&self.thermal_zone);
        let mode = FanMode::from_index(
            config
                .get("gpio_fan_mode")
                .and_then(Value::as_i64)
                .unwrap_or(1),
        );

        let mut values = Map::new();
        values.insert("cpu_temperature".to_string(), Value::from(celsius));
        values.insert(
            "temperature_unit".to_string(),
            config
                .get("temperature_unit")
                .cloned()
                .unwrap_or_else(|| Value::from("C")),
        );
        values.insert(
            "gpio_fan_mode".to_string(),
            config.get("gpio_fan_mode").cloned().unwrap_or(Value::Null),
        );
        values.insert(
            "gpio_fan_state".to_string(),
            Value::from(mode.should_run(celsius)),
        );
        values.insert(
            "rgb_enable".to_string(),
            config.get("rgb_enable").cloned().unwrap_or(Value::Null),
        );
        values.insert(
            "peripherals".to_string(),
            Value::from(
                self.peripherals
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>(),
            ),
        );
        Status::new(values)
    }

    fn publish(&self) {
        let status = self.snapshot();
        if self.logs_at(LogLevel::Debug) {
            tracing::debug!(values = ?status.values, "status");
        }
        let listener = lock(&self.listener).clone();
        if let Some(listener) = listener {
            listener.on_status_changed(&status);
        }
    }
}

/// Sleep between two snapshots, clamped to the accepted bounds.
fn interval(config: &Map<String, Value>) -> Duration {
    let secs = config
        .get("data_interval")
        .and_then(Value::as_f64)
        .unwrap_or(MIN_DATA_INTERVAL)
        .clamp(MIN_DATA_INTERVAL, MAX_DATA_INTERVAL);
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::from_secs(1))
}

fn validate(system: &Map<String, Value>) -> Result<(), VirtualError> {
    system.iter().try_for_each(|(key, value)| check(key, value))
}

fn check(key: &str, value: &Value) -> Result<(), VirtualError> {
    match key {
        "data_interval"
            if !value
                .as_f64()
                .is_some_and(|secs| secs > 0.0 && secs <= MAX_DATA_INTERVAL) =>
        {
            Err(VirtualError::InvalidSetting {
                key: "data_interval",
                expected: "a number of seconds between 0 and 3600",
            })
        }
        "gpio_fan_mode" if !value.is_i64() => Err(VirtualError::InvalidSetting {
            key: "gpio_fan_mode",
            expected: "an integer fan mode",
        }),
        _ => Ok(()),
    }
}

fn read_celsius(path: &Path) -> f64 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .map_or(FALLBACK_CELSIUS, |milli| milli / 1000.0)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    struct ChannelListener(mpsc::UnboundedSender<Status>);

    impl StatusListener for ChannelListener {
        fn on_status_changed(&self, status: &Status) {
            let _ = self.0.send(status.clone());
        }
    }

    fn system(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    fn thermal_zone(millidegrees: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), millidegrees).unwrap();
        file
    }

    fn automation(config: Value, zone: &Path) -> VirtualAutomation {
        VirtualAutomation::new(system(config), &[Peripheral::GpioFan], Span::none())
            .with_thermal_zone(zone)
    }

    #[test]
    fn should_read_temperature_from_thermal_zone() {
        let zone = thermal_zone("52375\n");
        let automation = automation(json!({"gpio_fan_mode": 1}), zone.path());

        let status = automation.snapshot();

        assert_eq!(status.get("cpu_temperature"), Some(&json!(52.375)));
        assert_eq!(status.get("gpio_fan_state"), Some(&json!(true)));
        assert_eq!(status.get("peripherals"), Some(&json!(["gpio_fan"])));
    }

    #[test]
    fn should_fall_back_when_thermal_zone_missing() {
        let automation = automation(json!({"gpio_fan_mode": 4}), Path::new("/nonexistent/temp"));

        let status = automation.snapshot();

        assert_eq!(status.get("cpu_temperature"), Some(&json!(45.0)));
        assert_eq!(status.get("gpio_fan_state"), Some(&json!(false)));
    }

    #[test]
    fn should_merge_config_update_and_publish() {
        let zone = thermal_zone("61000");
        let automation = automation(json!({"gpio_fan_mode": 4, "rgb_enable": true}), zone.path());
        let (tx, mut rx) = mpsc::unbounded_channel();
        automation.set_on_state_changed(Arc::new(ChannelListener(tx)));

        automation
            .update_config(&system(json!({"gpio_fan_mode": 2})))
            .unwrap();

        assert_eq!(automation.config()["gpio_fan_mode"], json!(2));
        assert_eq!(automation.config()["rgb_enable"], json!(true));
        let status = rx.try_recv().unwrap();
        assert_eq!(status.get("gpio_fan_state"), Some(&json!(true)));
    }

    #[test]
    fn should_reject_invalid_interval() {
        let zone = thermal_zone("40000");
        let automation = automation(json!({"data_interval": 1}), zone.path());

        let result = automation.update_config(&system(json!({"data_interval": 0})));

        assert!(matches!(
            result,
            Err(PironmanError::Component {
                component: "automation",
                ..
            })
        ));
        assert_eq!(automation.config()["data_interval"], json!(1));
    }

    #[test]
    fn should_reject_oversized_interval() {
        let zone = thermal_zone("40000");
        let automation = automation(json!({"data_interval": 1}), zone.path());

        let result = automation.update_config(&system(json!({"data_interval": 1e20})));

        assert!(result.is_err());
        assert_eq!(automation.config()["data_interval"], json!(1));
    }

    #[test]
    fn should_drop_invalid_initial_settings() {
        let zone = thermal_zone("40000");
        let automation = automation(
            json!({"data_interval": 1e20, "gpio_fan_mode": "quiet", "rgb_enable": true}),
            zone.path(),
        );

        let config = automation.config();

        assert!(!config.contains_key("data_interval"));
        assert!(!config.contains_key("gpio_fan_mode"));
        assert_eq!(config["rgb_enable"], json!(true));
        assert_eq!(automation.inner.interval(), Duration::from_secs(1));
    }

    #[test]
    fn should_clamp_interval_to_bounds() {
        assert_eq!(
            interval(&system(json!({"data_interval": 1e20}))),
            Duration::from_secs(3600)
        );
        assert_eq!(
            interval(&system(json!({"data_interval": 0.1}))),
            Duration::from_secs(1)
        );
        assert_eq!(
            interval(&system(json!({"data_interval": 2.5}))),
            Duration::from_millis(2500)
        );
        assert_eq!(interval(&Map::new()), Duration::from_secs(1));
    }

    #[test]
    fn should_reject_non_integer_fan_mode() {
        let zone = thermal_zone("40000");
        let automation = automation(json!({}), zone.path());
        assert!(
            automation
                .update_config(&system(json!({"gpio_fan_mode": "quiet"})))
                .is_err()
        );
    }

    #[test]
    fn should_remember_debug_level() {
        let zone = thermal_zone("40000");
        let automation = automation(json!({}), zone.path());
        automation.set_debug_level(LogLevel::Debug);
        assert_eq!(automation.debug_level(), LogLevel::Debug);
    }

    #[test]
    fn should_filter_own_logs_by_debug_level() {
        let zone = thermal_zone("40000");
        let automation = automation(json!({}), zone.path());
        assert!(automation.logs_at(LogLevel::Info));
        assert!(!automation.logs_at(LogLevel::Debug));

        automation.set_debug_level(LogLevel::Trace);
        assert!(automation.logs_at(LogLevel::Debug));

        automation.set_debug_level(LogLevel::Error);
        assert!(automation.logs_at(LogLevel::Error));
        assert!(!automation.logs_at(LogLevel::Info));
    }

    #[tokio::test]
    async fn should_publish_immediately_after_start() {
        let zone = thermal_zone("48000");
        let automation = automation(json!({"data_interval": 60}), zone.path());
        let (tx, mut rx) = mpsc::unbounded_channel();
        automation.set_on_state_changed(Arc::new(ChannelListener(tx)));

        automation.start().await.unwrap();
        let status = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        automation.stop().await.unwrap();

        assert_eq!(status.get("cpu_temperature"), Some(&json!(48.0)));
        assert!(!automation.is_running());
    }

    #[tokio::test]
    async fn should_keep_running_after_oversized_interval_is_rejected() {
        let zone = thermal_zone("48000");
        let automation = automation(json!({"data_interval": 1}), zone.path());
        let (tx, mut rx) = mpsc::unbounded_channel();
        automation.set_on_state_changed(Arc::new(ChannelListener(tx)));

        automation.start().await.unwrap();
        assert!(
            automation
                .update_config(&system(json!({"data_interval": 1e20})))
                .is_err()
        );
        for _ in 0..2 {
            tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
        }

        assert!(automation.is_running());
        automation.stop().await.unwrap();
    }

    #[tokio::test]
    async fn should_tolerate_repeated_start_and_stop() {
        let zone = thermal_zone("48000");
        let automation = automation(json!({}), zone.path());

        automation.start().await.unwrap();
        automation.start().await.unwrap();
        assert!(automation.is_running());

        automation.stop().await.unwrap();
        automation.stop().await.unwrap();
        assert!(!automation.is_running());
    }
}
