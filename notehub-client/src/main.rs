use dotenv::dotenv;

use notehub_client::app::NotesSession;
use notehub_client::config::Config;

/// Thin demo frontend: lists the first page of notes, optionally filtered by
/// a search term passed as the first argument.
#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            std::process::exit(1);
        }
    };
    let session = NotesSession::new(&config);

    if let Some(term) = std::env::args().nth(1) {
        log::info!("[MAIN] searching for {:?}", term);
        session.set_search(&term);
        // Wait out the debounce window so the term becomes effective.
        tokio::time::sleep(std::time::Duration::from_millis(config.debounce_ms + 50)).await;
    }

    match session.refresh().await {
        Ok(page) => {
            println!(
                "page {} of {} ({} notes)",
                session.view().page(),
                page.total_pages,
                page.notes.len()
            );
            for note in &page.notes {
                println!("  [{}] {} (id {})", note.tag.as_ref(), note.title, note.id);
            }
        }
        Err(err) => {
            eprintln!("failed to list notes: {}", err);
            std::process::exit(1);
        }
    }
}
