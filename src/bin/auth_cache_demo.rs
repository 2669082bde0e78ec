use proscenium::application_impl::*;
use proscenium::auth_cache::*;
use proscenium::domain_port::BrowserSession;
use proscenium::logger::*;

// Walks the whole cache lifecycle against the fake driver:
// $ cargo run --bin auth_cache_demo
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    logger.reload_from_config(&LogConfig {
        filter: "debug".to_string(),
    })?;

    let base_url = "https://demo.local";
    let dir = std::env::temp_dir().join(format!(
        "proscenium-auth-demo-{}",
        std::process::id()
    ));
    let cache = AuthStateCache::new(&dir)?;
    let browser = FakeBrowserSession::new();

    info!(valid = cache.is_valid("admin")?, "before login");

    browser.login(base_url, "admin");
    cache.save(&browser, "admin").await?;
    info!(valid = cache.is_valid("admin")?, "after save");

    browser.logout();
    cache.load(&browser, "admin", base_url).await?;
    info!(url = %browser.current_url().await?, "after load");

    for state in cache.list()? {
        info!(?state, "cached record");
    }

    cache.clear_all()?;
    info!(valid = cache.is_valid("admin")?, "after clear_all");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
