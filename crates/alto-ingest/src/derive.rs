//! Columns derived from other columns
//!
//! Dates are `YYYY-MM-DD`. Plain-text file references look like
//! `ABC_issueXYZ0001_art0007.txt`: a publication code, a tagged issue
//! identifier and, as the last token, a tagged article number. A tag is the
//! leading run of lowercase ASCII letters of a token.
//!
//! Derivation is lenient. A missing source value or a missing token yields an
//! absent cell, never an error.

use crate::corpus::TEXT_SUFFIX;
use crate::metadata::{MetadataField, MetadataRecord};

/// Calendar parts of an issue date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateParts {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

/// Parts of a plain-text file reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFileParts {
    /// Normalized publication code
    pub nlp: Option<String>,
    /// Issue identifier without its tag
    pub issue: Option<String>,
    /// Article item identifier without its tag
    pub art_num: Option<String>,
}

/// All derived values of one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFields {
    pub date: DateParts,
    pub text_file: TextFileParts,
}

impl DerivedFields {
    pub fn from_metadata(metadata: &MetadataRecord) -> Self {
        Self {
            date: metadata
                .get(MetadataField::IssueDate)
                .map(split_date)
                .unwrap_or_default(),
            text_file: metadata
                .get(MetadataField::PlainTextFile)
                .map(split_text_file)
                .unwrap_or_default(),
        }
    }
}

/// Split a `YYYY-MM-DD` date on `-`
pub fn split_date(date: &str) -> DateParts {
    let mut tokens = date.split('-').map(str::to_string);
    DateParts {
        year: tokens.next(),
        month: tokens.next(),
        day: tokens.next(),
    }
}

/// Split a plain-text file reference on `_`
pub fn split_text_file(file: &str) -> TextFileParts {
    let tokens: Vec<&str> = file.split('_').collect();

    let art_num = tokens
        .last()
        .and_then(|last| last.split(TEXT_SUFFIX).next())
        .map(|token| strip_tag(token).to_string());

    TextFileParts {
        nlp: tokens.first().map(|t| t.to_string()),
        issue: tokens.get(1).map(|t| strip_tag(t).to_string()),
        art_num,
    }
}

/// Remove the lowercase tag in front of an identifier (`art0007` -> `0007`)
pub fn strip_tag(token: &str) -> &str {
    token.trim_start_matches(|c: char| c.is_ascii_lowercase())
}
