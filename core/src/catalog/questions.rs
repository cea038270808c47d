//! Seeker question categories
//!
//! Asking a question costs the seekers information and pays the hider in
//! cards: each category fixes how many cards the hider draws, how many
//! they keep, and how long the hider has to answer.

use phf::phf_map;
use quarry_types::SizeMap;

/// Static definition of a question category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionCategory {
    pub id: &'static str,
    pub name: &'static str,
    /// Cards the hider draws after answering
    pub draw_count: usize,
    /// Cards the hider may keep from the draw
    pub keep_count: usize,
    /// How long the hider has to answer (minutes)
    pub response_time_minutes: SizeMap<u32>,
}

pub static QUESTIONS: &[QuestionCategory] = &[
    QuestionCategory {
        id: "matching",
        name: "Matching",
        draw_count: 3,
        keep_count: 1,
        response_time_minutes: SizeMap::new(5, 5, 10),
    },
    QuestionCategory {
        id: "measuring",
        name: "Measuring",
        draw_count: 3,
        keep_count: 1,
        response_time_minutes: SizeMap::new(5, 5, 10),
    },
    QuestionCategory {
        id: "thermometer",
        name: "Thermometer",
        draw_count: 2,
        keep_count: 1,
        response_time_minutes: SizeMap::new(5, 5, 10),
    },
    QuestionCategory {
        id: "radar",
        name: "Radar",
        draw_count: 2,
        keep_count: 1,
        response_time_minutes: SizeMap::new(5, 5, 10),
    },
    QuestionCategory {
        id: "photo",
        name: "Photo",
        draw_count: 1,
        keep_count: 1,
        response_time_minutes: SizeMap::new(10, 10, 20),
    },
    QuestionCategory {
        id: "tentacles",
        name: "Tentacles",
        draw_count: 4,
        keep_count: 2,
        response_time_minutes: SizeMap::new(15, 15, 30),
    },
];

/// Question id → index into [`QUESTIONS`].
static QUESTION_INDEX: phf::Map<&'static str, usize> = phf_map! {
    "matching" => 0,
    "measuring" => 1,
    "thermometer" => 2,
    "radar" => 3,
    "photo" => 4,
    "tentacles" => 5,
};

/// Look up a question category by id.
pub fn question(id: &str) -> Option<&'static QuestionCategory> {
    QUESTION_INDEX.get(id).map(|&idx| &QUESTIONS[idx])
}
