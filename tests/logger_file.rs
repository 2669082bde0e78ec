use proscenium::logger::*;
use tempfile::tempdir;

// Lives in its own test binary: installing the global subscriber is a
// once-per-process affair.
#[test]
fn file_layer_mirrors_events_into_a_daily_log() {
    let dir = tempdir().unwrap();
    let logger = Logger::new_bootstrap_with_file(dir.path()).unwrap();

    info!("hello from the file layer");
    debug!("invisible at the bootstrap filter");

    logger
        .reload_from_config(&LogConfig {
            filter: "debug".to_string(),
        })
        .unwrap();
    debug!("visible after reload");

    let entry = std::fs::read_dir(dir.path())
        .unwrap()
        .next()
        .expect("a log file was created")
        .unwrap();
    assert!(entry.path().extension().is_some_and(|e| e == "log"));

    let content = std::fs::read_to_string(entry.path()).unwrap();
    assert!(content.contains("hello from the file layer"));
    assert!(!content.contains("invisible at the bootstrap filter"));
    assert!(content.contains("visible after reload"));
}
