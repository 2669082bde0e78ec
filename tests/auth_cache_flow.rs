use proscenium::application_impl::*;
use proscenium::auth_cache::*;
use proscenium::domain_port::BrowserSession;
use tempfile::tempdir;

const BASE: &str = "https://demo.local";

// The end-to-end path a test suite takes: interactive login once, then
// cache hits until the state is cleared or goes stale.
#[tokio::test]
async fn login_once_then_reuse_session_across_runs() {
    let dir = tempdir().unwrap();
    let browser = FakeBrowserSession::new();

    // First run: cache miss forces an interactive login, then saves state.
    {
        let cache = AuthStateCache::new(dir.path()).unwrap();
        assert!(!cache.is_valid("admin").unwrap());

        browser.login(BASE, "admin");
        cache.save(&browser, "admin").await.unwrap();
        browser.logout();
    }

    // Second run: a fresh cache over the same directory restores the
    // session and lands on an authenticated page.
    {
        let cache = AuthStateCache::new(dir.path()).unwrap();
        assert!(cache.is_valid("admin").unwrap());

        cache.load(&browser, "admin", BASE).await.unwrap();
        let url = browser.current_url().await.unwrap();
        assert!(url.ends_with("/dashboard"), "landed on {url}");
        assert!(!url.contains("/login"));
    }
}

#[tokio::test]
async fn revoked_session_falls_back_to_interactive_login() {
    let dir = tempdir().unwrap();
    let cache = AuthStateCache::new(dir.path()).unwrap();
    let browser = FakeBrowserSession::new();

    browser.login(BASE, "teacher");
    cache.save(&browser, "teacher").await.unwrap();

    // The application invalidates every session server-side.
    browser.revoke_all();
    let err = cache.load(&browser, "teacher", BASE).await.unwrap_err();
    assert!(matches!(err, AuthCacheError::Rejected(_)));

    // The caller's fallback path: fresh login, save, and the cache works
    // again.
    browser.login(BASE, "teacher");
    cache.save(&browser, "teacher").await.unwrap();
    browser.logout();
    cache.load(&browser, "teacher", BASE).await.unwrap();
    assert!(
        browser
            .current_url()
            .await
            .unwrap()
            .ends_with("/dashboard")
    );
}
