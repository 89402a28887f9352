//! Field -> type schemas for each input file.

use crate::constants::*;
use crate::table::{FieldType, Schema};

const NOTE_TAG_FIELDS: [&str; 13] = [
    "misleadingOther",
    "misleadingFactualError",
    "misleadingManipulatedMedia",
    "misleadingOutdatedInformation",
    "misleadingMissingImportantContext",
    "misleadingUnverifiedClaimAsFact",
    "misleadingSatire",
    "notMisleadingOther",
    "notMisleadingFactuallyCorrect",
    "notMisleadingOutdatedButNotWhenWritten",
    "notMisleadingClearlySatire",
    "notMisleadingPersonalOpinion",
    "trustworthySources",
];

const RATING_TAG_FIELDS: [&str; 21] = [
    "helpfulOther",
    "helpfulInformative",
    "helpfulClear",
    "helpfulEmpathetic",
    "helpfulGoodSources",
    "helpfulUniqueContext",
    "helpfulAddressesClaim",
    "helpfulImportantContext",
    "helpfulUnbiasedLanguage",
    "notHelpfulOther",
    "notHelpfulIncorrect",
    "notHelpfulSourcesMissingOrUnreliable",
    "notHelpfulOpinionSpeculationOrBias",
    "notHelpfulMissingKeyPoints",
    "notHelpfulOutdated",
    "notHelpfulHardToUnderstand",
    "notHelpfulArgumentativeOrBiased",
    "notHelpfulOffTopic",
    "notHelpfulSpamHarassmentOrAbuse",
    "notHelpfulIrrelevantSources",
    "notHelpfulOpinionSpeculation",
];

pub fn notes() -> Schema {
    let mut fields = vec![
        (NOTE_ID, FieldType::Int),
        (NOTE_AUTHOR_PARTICIPANT_ID, FieldType::Str),
        (CREATED_AT_MILLIS, FieldType::Int),
        (TWEET_ID, FieldType::Int),
        (CLASSIFICATION, FieldType::Str),
        ("believable", FieldType::Str),
        ("harmful", FieldType::Str),
        ("validationDifficulty", FieldType::Str),
    ];
    fields.extend(NOTE_TAG_FIELDS.iter().map(|&name| (name, FieldType::Int)));
    fields.push(("summary", FieldType::Str));
    Schema::new(fields)
}

pub fn ratings() -> Schema {
    let mut fields = vec![
        (NOTE_ID, FieldType::Int),
        (RATER_PARTICIPANT_ID, FieldType::Str),
        (CREATED_AT_MILLIS, FieldType::Int),
        ("version", FieldType::Int),
        ("agree", FieldType::Int),
        ("disagree", FieldType::Int),
        (HELPFUL, FieldType::Int),
        (NOT_HELPFUL, FieldType::Int),
        (HELPFULNESS_LEVEL, FieldType::Str),
    ];
    fields.extend(RATING_TAG_FIELDS.iter().map(|&name| (name, FieldType::Int)));
    Schema::new(fields)
}

pub fn note_status_history() -> Schema {
    Schema::new([
        (NOTE_ID, FieldType::Int),
        (NOTE_AUTHOR_PARTICIPANT_ID, FieldType::Str),
        (CREATED_AT_MILLIS, FieldType::Int),
        ("timestampMillisOfFirstNonNMRStatus", FieldType::Int),
        ("firstNonNMRStatus", FieldType::Str),
        ("timestampMillisOfCurrentStatus", FieldType::Int),
        ("currentStatus", FieldType::Str),
        ("timestampMillisOfLatestNonNMRStatus", FieldType::Int),
        ("mostRecentNonNMRStatus", FieldType::Str),
    ])
}

/// Enrollment files written before modeling populations existed
pub fn user_enrollment_legacy() -> Schema {
    Schema::new([
        (PARTICIPANT_ID, FieldType::Str),
        ("enrollmentState", FieldType::Str),
        ("successfulRatingNeededToEarnIn", FieldType::Int),
        ("timestampOfLastStateChange", FieldType::Int),
        ("timestampOfLastEarnOut", FieldType::Int),
    ])
}

pub fn user_enrollment() -> Schema {
    user_enrollment_legacy().with_field(MODELING_POPULATION, FieldType::Str)
}
