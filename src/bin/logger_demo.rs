use proscenium::logger::*;

// Demonstrates the reloadable filter and the per-day log file the test
// runner writes alongside console output:
// $ cargo run --bin logger_demo
fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap_with_file("logs")?;

    // Bootstrap filter is "info": the first two lines stay off the console
    // and out of the file.
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!("bootstrap info log");

    let config = LogConfig {
        filter: "debug".to_string(),
    };
    logger.reload_from_config(&config)?;
    debug!("debug log visible after filter reload");

    let name = format!("logs/{}.log", chrono::Local::now().format("%Y-%m-%d"));
    println!("console output above is mirrored into {name}");

    Ok(())
}
