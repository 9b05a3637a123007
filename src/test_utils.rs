#[cfg(test)]
pub mod test_helpers {
    use std::time::{Duration, Instant};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::app::App;
    use crate::config::Config;
    use crate::document::{Block, BlockKind, Document};

    /// App over a single paragraph with the caret at its end, suggestions off
    pub fn test_app(text: &str) -> App {
        let mut config = Config::default();
        config.suggest.enabled = false;
        app_with_config(text, &config)
    }

    pub fn app_with_config(text: &str, config: &Config) -> App {
        let doc = Document::from_blocks(vec![Block::with_text(1, BlockKind::Paragraph, text)]);
        App::new(doc, config, None)
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    pub fn key_with_mods(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    /// Type each char of `text` as a key press
    pub fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c)), now);
        }
    }

    /// Tick until `done` holds or `timeout` passes
    pub fn tick_until(app: &mut App, timeout: Duration, done: impl Fn(&App) -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            app.tick(Instant::now());
            if done(app) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }
}
