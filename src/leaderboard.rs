/*!
Shaping ranked exam results for display.

The API serves the entries already ordered by rank; nothing here re-sorts
or otherwise second-guesses them.
*/
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Exam name -> ordered entries, in the order the server supplied the
/// keys. The first key is the initially selected exam.
pub type Leaderboard = IndexMap<String, Vec<LeaderboardEntry>>;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: i64,
    pub student_name: String,
    pub rank: u32,
    pub score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: u32) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Medal::Gold   => "gold",
            Medal::Silver => "silver",
            Medal::Bronze => "bronze",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Medal::Gold   => "\u{1f947}",
            Medal::Silver => "\u{1f948}",
            Medal::Bronze => "\u{1f949}",
        }
    }
}

/// One rendered table row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRow {
    pub student_name: String,
    /// Medal emoji for ranks 1-3, the literal numeral otherwise.
    pub rank_label: String,
    pub row_class: &'static str,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableData {
    pub exam_name: String,
    pub participant_count: usize,
    pub rows: Vec<TableRow>,
}

/// Shape one exam's entries into display rows. `None` means "render the
/// empty-state", never an empty table shell.
pub fn table_data(exam_name: &str, entries: &[LeaderboardEntry]) -> Option<TableData> {
    if entries.is_empty() {
        return None;
    }

    let rows = entries.iter()
        .map(|entry| {
            let (rank_label, row_class) = match Medal::for_rank(entry.rank) {
                Some(medal) => (medal.emoji().to_owned(), medal.class()),
                None => (entry.rank.to_string(), ""),
            };
            TableRow {
                student_name: entry.student_name.clone(),
                rank_label,
                row_class,
                score: entry.score,
            }
        })
        .collect();

    Some(TableData {
        exam_name: exam_name.to_owned(),
        participant_count: entries.len(),
        rows,
    })
}
