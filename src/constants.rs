//! Column names, categorical values and defaults shared across the pipeline.

// Columns
pub const NOTE_ID: &str = "noteId";
pub const TWEET_ID: &str = "tweetId";
pub const CREATED_AT_MILLIS: &str = "createdAtMillis";
pub const CLASSIFICATION: &str = "classification";
pub const NOTE_AUTHOR_PARTICIPANT_ID: &str = "noteAuthorParticipantId";
pub const RATER_PARTICIPANT_ID: &str = "raterParticipantId";
pub const PARTICIPANT_ID: &str = "participantId";
pub const HELPFUL: &str = "helpful";
pub const NOT_HELPFUL: &str = "notHelpful";
pub const HELPFULNESS_LEVEL: &str = "helpfulnessLevel";
pub const HELPFUL_NUM: &str = "helpfulNum";
pub const MODELING_POPULATION: &str = "modelingPopulation";
pub const NUM_RATINGS: &str = "numRatings";
pub const MEAN_HELPFUL_NUM: &str = "meanHelpfulNum";

// helpfulnessLevel values
pub const NOT_HELPFUL_VALUE: &str = "NOT_HELPFUL";
pub const SOMEWHAT_HELPFUL_VALUE: &str = "SOMEWHAT_HELPFUL";
pub const HELPFUL_VALUE: &str = "HELPFUL";

// classification values
pub const NOTE_SAYS_TWEET_IS_MISLEADING: &str = "MISINFORMED_OR_POTENTIALLY_MISLEADING";
pub const NOTE_SAYS_TWEET_IS_NOT_MISLEADING: &str = "NOT_MISLEADING";

// modelingPopulation assigned to legacy enrollment rows
pub const CORE_POPULATION: &str = "CORE";

/// When the "not misleading" option became available to raters (2022-10-03 00:00 UTC)
pub const NOT_MISLEADING_UI_LAUNCH_MILLIS: i64 = 1_664_755_200_000;

pub const MIN_RATINGS_PER_NOTE: usize = 5;
pub const MIN_RATINGS_PER_RATER: usize = 10;

// Default file locations
pub const ENROLLMENT_INPUT_PATH: &str = "userEnrollment-00000.tsv";
pub const NOTES_INPUT_PATH: &str = "notes-00000.tsv";
pub const RATINGS_INPUT_PATH: &str = "ratings-00000.tsv";
pub const NOTE_STATUS_HISTORY_INPUT_PATH: &str = "noteStatusHistory-00000.tsv";
pub const SCORED_NOTES_OUTPUT_PATH: &str = "scored_notes.tsv";
