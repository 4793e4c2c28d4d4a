//! UI state for the watcher

use polymarket_feed::PriceSnapshot;

/// State shared between feed events and the renderer. A failed fetch keeps
/// the last good snapshot on screen; only the footer changes.
pub struct App {
    pub snapshot: Option<PriceSnapshot>,
    pub last_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self { snapshot: None, last_error: None, should_quit: false }
    }

    pub fn on_snapshot(&mut self, snapshot: PriceSnapshot) {
        self.snapshot = Some(snapshot);
        self.last_error = None;
    }

    pub fn on_error(&mut self, message: String) {
        self.last_error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polymarket_feed::MarketOutcome;

    fn snapshot() -> PriceSnapshot {
        PriceSnapshot::new(vec![MarketOutcome {
            name: "Alice".to_string(),
            probability: 0.7,
        }])
    }

    #[test]
    fn test_error_keeps_snapshot() {
        let mut app = App::new();
        app.on_snapshot(snapshot());
        app.on_error("fetch cycle failed".to_string());

        assert!(app.snapshot.is_some());
        assert_eq!(app.last_error.as_deref(), Some("fetch cycle failed"));
    }

    #[test]
    fn test_snapshot_clears_error() {
        let mut app = App::new();
        app.on_error("fetch cycle failed".to_string());
        app.on_snapshot(snapshot());

        assert_eq!(app.last_error, None);
    }
}
