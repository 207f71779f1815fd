//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::Generator;
use crate::Wabisabi;

/// Generate the static site from the stored posts
pub fn run(app: &Wabisabi) -> Result<()> {
    let start = std::time::Instant::now();

    let session = app.session();
    let posts = session.posts();
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(app)?;
    let written = generator.generate(posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated {} pages in {:.2}s", written, duration.as_secs_f64());

    Ok(())
}

/// Watch the post store and config, regenerating on change
pub async fn watch(app: &Wabisabi) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    std::fs::create_dir_all(&app.store_dir)?;
    watcher.watch(&app.store_dir, notify::RecursiveMode::NonRecursive)?;

    let config_path = app.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("Change detected, regenerating...");
                    let result = Wabisabi::new(&app.base_dir).and_then(|fresh| run(&fresh));
                    if let Err(e) = result {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_seeds_and_generates() {
        let dir = TempDir::new().unwrap();
        let app = Wabisabi::new(dir.path()).unwrap();
        run(&app).unwrap();
        assert!(dir.path().join("store/wabisabi_posts.json").exists());
        assert!(dir.path().join("public/index.html").exists());
        assert!(dir
            .path()
            .join("public/blog/silence-on-the-chart/index.html")
            .exists());

        crate::commands::clean::run(&app).unwrap();
        assert!(!dir.path().join("public").exists());
        assert!(dir.path().join("store/wabisabi_posts.json").exists());
    }
}
