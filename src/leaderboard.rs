use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::BankError;
use crate::question::DATA_DIR;

/// Number of entries kept on the board.
pub const CAPACITY: usize = 10;

const SEED_FILE: &str = "leaderboard.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(username: impl Into<String>, score: u32) -> Self {
        Self {
            username: username.into(),
            score,
        }
    }
}

/// Adds `new_entry` to the board, returning the re-ranked top [`CAPACITY`].
///
/// Ranking is by descending score. The sort is stable, so on equal scores
/// earlier entries stay ahead of the newcomer.
pub fn insert(entries: &[LeaderboardEntry], new_entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
    insert_ranked(entries, new_entry).0
}

/// Like [`insert`], also returning the zero-based rank the new entry landed
/// at, or `None` when it did not make the cut.
pub fn insert_ranked(
    entries: &[LeaderboardEntry],
    new_entry: LeaderboardEntry,
) -> (Vec<LeaderboardEntry>, Option<usize>) {
    let newcomer = entries.len();
    let ranked: Vec<(usize, LeaderboardEntry)> = entries
        .iter()
        .cloned()
        .chain(std::iter::once(new_entry))
        .enumerate()
        .sorted_by(|(_, a), (_, b)| b.score.cmp(&a.score))
        .take(CAPACITY)
        .collect();

    let rank = ranked.iter().position(|(i, _)| *i == newcomer);
    (ranked.into_iter().map(|(_, e)| e).collect(), rank)
}

/// Sorts and truncates an arbitrary list into board order.
pub fn normalize(entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries
        .into_iter()
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .take(CAPACITY)
        .collect()
}

/// The initial board compiled into the binary.
pub fn seed() -> Result<Vec<LeaderboardEntry>, BankError> {
    let contents = DATA_DIR
        .get_file(SEED_FILE)
        .and_then(|f| f.contents_utf8())
        .ok_or(BankError::MissingData(SEED_FILE))?;
    let entries: Vec<LeaderboardEntry> = serde_json::from_str(contents)?;
    Ok(normalize(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry::new(name, score)
    }

    fn is_sorted_desc(entries: &[LeaderboardEntry]) -> bool {
        entries.windows(2).all(|w| w[0].score >= w[1].score)
    }

    #[test]
    fn insert_into_empty() {
        assert_eq!(insert(&[], entry("bob", 0)), vec![entry("bob", 0)]);
    }

    #[test]
    fn insert_ranks_above_lower_scores() {
        let board = insert(&[entry("a", 780)], entry("bob", 800));
        assert_eq!(board, vec![entry("bob", 800), entry("a", 780)]);
    }

    #[test]
    fn ties_keep_existing_entries_first() {
        let board = vec![entry("a", 500), entry("b", 500)];
        let (next, rank) = insert_ranked(&board, entry("c", 500));

        assert_eq!(next, vec![entry("a", 500), entry("b", 500), entry("c", 500)]);
        assert_eq!(rank, Some(2));
    }

    #[test]
    fn truncates_to_capacity() {
        let board: Vec<_> = (0..CAPACITY as u32)
            .map(|i| entry(&format!("p{i}"), 1_000 - i * 10))
            .collect();

        let (next, rank) = insert_ranked(&board, entry("low", 5));
        assert_eq!(next.len(), CAPACITY);
        assert_eq!(rank, None);
        assert_eq!(next, board);

        let (next, rank) = insert_ranked(&board, entry("high", 2_000));
        assert_eq!(next.len(), CAPACITY);
        assert_eq!(rank, Some(0));
        assert_eq!(next.last().unwrap().username, "p8");
        assert!(is_sorted_desc(&next));
    }

    #[test]
    fn same_username_may_appear_twice() {
        let board = insert(&[entry("alice", 300)], entry("alice", 400));
        assert_eq!(board, vec![entry("alice", 400), entry("alice", 300)]);
    }

    #[test]
    fn reinserting_sorted_board_only_appends() {
        let mut board = vec![];
        for score in [900, 800, 700, 600] {
            board = insert(&board, entry("x", score));
        }
        assert_eq!(
            board.iter().map(|e| e.score).collect::<Vec<_>>(),
            vec![900, 800, 700, 600]
        );
    }

    #[test]
    fn seed_is_sorted_board() {
        let board = seed().unwrap();
        assert_eq!(board.len(), 8);
        assert_eq!(board[0], entry("quizMaster", 780));
        assert!(is_sorted_desc(&board));
    }

    #[test]
    fn normalize_sorts_and_truncates() {
        let raw: Vec<_> = (0..12).map(|i| entry("n", i)).collect();
        let board = normalize(raw);
        assert_eq!(board.len(), CAPACITY);
        assert_eq!(board[0].score, 11);
        assert!(is_sorted_desc(&board));
    }
}
