use std::sync::atomic::*;

/// Counters describing what a storage load pass saw and what it had to skip
#[derive(Debug, Default)]
pub struct LoadStats {
    // Tree walk
    pub players_visited: AtomicU64,
    pub worlds_visited: AtomicU64,
    pub documents_read: AtomicU64,
    // Skips, by reason
    pub malformed_tokens: AtomicU64,
    pub unresolved_worlds: AtomicU64,
    pub unreadable_documents: AtomicU64,
    pub invalid_records: AtomicU64,
    pub invalid_viewers: AtomicU64,
    // Results
    pub elevators_loaded: AtomicU64,
    pub columns_linked: AtomicU64,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LoadStatsSnapshot {
    pub players_visited: u64,
    pub worlds_visited: u64,
    pub documents_read: u64,
    pub malformed_tokens: u64,
    pub unresolved_worlds: u64,
    pub unreadable_documents: u64,
    pub invalid_records: u64,
    pub invalid_viewers: u64,
    pub elevators_loaded: u64,
    pub columns_linked: u64,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add(counter: &AtomicU64, amount: usize) {
        counter.fetch_add(amount as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LoadStatsSnapshot {
        LoadStatsSnapshot {
            players_visited: self.players_visited.load(Ordering::Acquire),
            worlds_visited: self.worlds_visited.load(Ordering::Acquire),
            documents_read: self.documents_read.load(Ordering::Acquire),
            malformed_tokens: self.malformed_tokens.load(Ordering::Acquire),
            unresolved_worlds: self.unresolved_worlds.load(Ordering::Acquire),
            unreadable_documents: self.unreadable_documents.load(Ordering::Acquire),
            invalid_records: self.invalid_records.load(Ordering::Acquire),
            invalid_viewers: self.invalid_viewers.load(Ordering::Acquire),
            elevators_loaded: self.elevators_loaded.load(Ordering::Acquire),
            columns_linked: self.columns_linked.load(Ordering::Acquire),
        }
    }
}

impl LoadStatsSnapshot {
    pub fn skipped(&self) -> u64 {
        self.malformed_tokens
            + self.unresolved_worlds
            + self.unreadable_documents
            + self.invalid_records
    }

    pub fn summary_format(&self) -> String {
        format!(
            r#"Players: {players}, worlds: {worlds}, documents: {docs}
Elevators: {elevators} in {columns} columns
Skipped: {skipped} (tokens {tokens}, unresolved worlds {worlds_unres}, unreadable documents {unreadable}, records {records}); dropped viewers: {viewers}"#,
            players = self.players_visited,
            worlds = self.worlds_visited,
            docs = self.documents_read,
            elevators = self.elevators_loaded,
            columns = self.columns_linked,
            skipped = self.skipped(),
            tokens = self.malformed_tokens,
            worlds_unres = self.unresolved_worlds,
            unreadable = self.unreadable_documents,
            records = self.invalid_records,
            viewers = self.invalid_viewers,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let stats = LoadStats::new();
        LoadStats::bump(&stats.players_visited);
        LoadStats::add(&stats.elevators_loaded, 3);
        LoadStats::bump(&stats.invalid_records);
        LoadStats::bump(&stats.malformed_tokens);
        let snap = stats.snapshot();
        assert_eq!(snap.players_visited, 1);
        assert_eq!(snap.elevators_loaded, 3);
        assert_eq!(snap.skipped(), 2);
        assert!(snap.summary_format().contains("Elevators: 3"));
    }
}
