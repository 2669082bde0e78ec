use proscenium::auth_cache::*;
use proscenium::logger::*;
use proscenium::notify::*;
use proscenium::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Settings first: they decide whether log output also goes to a file.
    let settings = parse_settings(cli.settings.as_deref())?;
    let logger = match &settings.log.dir {
        Some(dir) => Logger::new_bootstrap_with_file(dir)?,
        None => Logger::new_bootstrap(),
    };
    info!(?settings);
    let logger_config = LogConfig {
        filter: settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let cache = AuthStateCache::from_settings(&settings)?;

    match cli.command.unwrap_or(Command::AuthList) {
        Command::AuthList => {
            let infos = cache.list()?;
            if infos.is_empty() {
                println!("no cached auth states under {}", cache.dir().display());
            }
            for info in infos {
                println!(
                    "{}  saved {}  expires {}  cookies {}  {}",
                    info.key,
                    info.saved_at.format("%Y-%m-%d %H:%M:%S"),
                    info.expires_at.format("%Y-%m-%d %H:%M:%S"),
                    info.cookie_count,
                    if info.expired { "EXPIRED" } else { "valid" },
                );
            }
        }
        Command::AuthClear { key } => {
            cache.clear(&key)?;
            println!("cleared auth state for {key:?}");
        }
        Command::AuthClearAll => {
            cache.clear_all()?;
            println!("cleared all auth states under {}", cache.dir().display());
        }
        Command::NotifyTest { message } => {
            let notify = settings
                .notify
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("no [notify] section in settings"))?;
            let notifier = DingTalkNotifier::from_settings(notify);
            if notifier.send_text(&message, false).await {
                println!("notification delivered");
            } else {
                println!("notification was not delivered, see log");
            }
        }
    }

    Ok(())
}
