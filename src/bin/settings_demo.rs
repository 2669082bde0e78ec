use proscenium::settings::*;

// Prints the resolved test-run configuration:
// $ cargo run --bin settings_demo
// $ cargo run --bin settings_demo -- --settings=settings/release.toml
// Any field can be overridden from the environment:
// $ PROSCENIUM__BASE_URL=https://staging.local cargo run --bin settings_demo
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = parse_settings(cli.settings.as_deref())?;

    println!("environment: {}", settings.environment);
    println!("base url:    {}", settings.base_url);
    println!(
        "auth states: {} (ttl {}h)",
        settings.auth.dir, settings.auth.ttl_hours
    );
    println!("test data:   {}", settings.data.dir);
    println!(
        "log filter:  {} (file dir: {})",
        settings.log.filter,
        settings.log.dir.as_deref().unwrap_or("none")
    );

    // The Debug impls redact the signing secret and DSN passwords, so these
    // are safe to echo.
    match &settings.notify {
        Some(notify) => println!("notify:      {notify:?}"),
        None => println!("notify:      disabled"),
    }
    match &settings.mysql {
        Some(mysql) => println!("mysql:       {mysql:?}"),
        None => println!("mysql:       disabled"),
    }
    match &settings.redis {
        Some(redis) => println!("redis:       {redis:?}"),
        None => println!("redis:       disabled"),
    }

    // A bad path fails loudly instead of falling back to defaults.
    let is_err = parse_settings(Some("settings/absent.toml")).is_err();
    println!("error on bad path: {is_err}");

    Ok(())
}
