// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use pi_updater::config::{load_and_validate, resolve};
use pi_updater::errors::UpdaterError;

#[test]
fn empty_file_yields_defaults() {
    let file = NamedTempFile::new().unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.probe_url(), "https://google.com");
    assert_eq!(
        cfg.probe_timeouts(),
        [1, 5, 10, 15].map(Duration::from_secs).to_vec()
    );
    let schedule = cfg.backoff_schedule();
    assert_eq!(schedule.initial_delay_secs(), 30);
    assert_eq!(
        schedule.entries().collect::<Vec<_>>(),
        vec![(1, 30), (2, 60), (4, 120), (6, 300), (10, 900)]
    );
}

#[test]
fn sections_override_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[probe]
url = "https://deb.debian.org"
timeouts_secs = [2, 4]

[backoff]
initial_delay_secs = 10
schedule = [
  {{ attempt = 1, delay_secs = 10 }},
  {{ attempt = 3, delay_secs = 45 }},
]
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.probe_url(), "https://deb.debian.org");
    assert_eq!(
        cfg.probe_timeouts(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
    let schedule = cfg.backoff_schedule();
    assert_eq!(schedule.next_delay(1, 0), 10);
    assert_eq!(schedule.next_delay(2, 10), 10);
    assert_eq!(schedule.next_delay(3, 10), 45);
    assert_eq!(schedule.initial_delay_secs(), 10);
}

#[test]
fn empty_timeout_list_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[probe]
timeouts_secs = []
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(UpdaterError::ConfigError(msg)) => assert!(msg.contains("timeouts_secs")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_toml_returns_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[probe\nurl = ").unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(UpdaterError::TomlError(_))
    ));
}

#[test]
fn explicit_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    assert!(matches!(
        resolve(Some(missing.as_path())),
        Err(UpdaterError::IoError(_))
    ));
}

#[test]
fn zero_backoff_delay_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[backoff]
schedule = [
  {{ attempt = 1, delay_secs = 30 }},
  {{ attempt = 2, delay_secs = 0 }},
]
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(UpdaterError::ConfigError(msg)) => assert!(msg.contains("attempt 2")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
