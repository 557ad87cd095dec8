//! # Error Handling
//!
//! This module defines the centralized error type of the `git-sort` library.
//! It uses the `thiserror` library to create an `Error` enum that covers the
//! failure modes of classifying, sorting and merging a patch series.
//!
//! ## Error Kinds
//!
//! Most variants are operator-actionable: they name the offending patch and
//! the specific inconsistency (bad or ambiguous tags, a patch in the wrong
//! section, an unsorted series, a missing reference head) so that metadata
//! can be fixed by hand. Nothing in the library tries to repair them.
//!
//! `Error::NotFound` is different. It is a control-flow signal between
//! sub-steps (a section marker or a tag that is absent) and callers are
//! expected to either handle it or convert it with
//! [`Error::into_structural`] before it reaches the user.

use thiserror::Error;

/// Main error type for git-sort operations
#[derive(Error, Debug)]
pub enum Error {
    /// Something the caller looked for is absent (section marker, section
    /// header, patch tag).
    #[error("{message}")]
    NotFound { message: String },

    /// The series file itself is malformed or not in the expected state.
    #[error("{message}")]
    Structural { message: String },

    /// A patch named in the series does not exist in the patch directory.
    #[error("Could not find patch \"{name}\"")]
    MissingPatch { name: String },

    /// A patch carries a tag whose value does not have the expected format.
    #[error("{tag} tag \"{value}\" in patch \"{name}\" is not a valid revision.")]
    TagFormat {
        name: String,
        tag: String,
        value: String,
    },

    /// A tag the patch must carry is absent.
    #[error("Patch \"{name}\" has no {tag} tag.")]
    MissingTag { name: String, tag: String },

    /// A tag that must be unique appears more than once.
    #[error("Multiple {tag} tags found. Patch \"{name}\" is tagged improperly.")]
    MultipleTags { name: String, tag: String },

    /// A patch without `Git-commit` has a `Patch-mainline` value that says
    /// the commit is upstream.
    #[error(
        "There is a problem with patch \"{name}\". The Patch-mainline tag \"{status}\" \
         requires Git-commit."
    )]
    CommitRequired { name: String, status: String },

    /// A patch without `Git-commit` has a `Patch-mainline` value outside the
    /// accepted vocabulary.
    #[error(
        "There is a problem with patch \"{name}\". The Patch-mainline tag \"{status}\" \
         is not supported in sorted section. Please add the patches without a commit \
         id that are neither 'Submitted' nor 'Not yet' submitted to the manually \
         maintained section below sorted section."
    )]
    UnsupportedStatus { name: String, status: String },

    /// It cannot be decided whether the `Git-repo` tag or the section of the
    /// patch is wrong.
    #[error(
        "There is a problem with patch \"{name}\". The Git-repo tag \"{repo}\" is \
         incorrect or the patch is in the wrong section of series.conf (section \
         \"{current}\"{}). Manual intervention is required.",
        found.as_ref().map(|h| format!(", commit found in \"{}\"", h)).unwrap_or_default()
    )]
    AmbiguousTag {
        name: String,
        repo: String,
        current: String,
        found: Option<String>,
    },

    /// The commit should be in a locally available head but the index does
    /// not know it.
    #[error(
        "There is a problem with patch \"{name}\". Commit \"{rev}\" not found in \
         git-sort index. The remote fetching from \"{repo}\" needs to be fetched or \
         the Git-commit tag is incorrect or the patch is in the wrong section of \
         series.conf. Manual intervention is required."
    )]
    CommitNotIndexed {
        name: String,
        rev: String,
        repo: String,
    },

    /// The patch sits in a section its commit cannot belong to.
    #[error(
        "There is a problem with patch \"{name}\". The patch is in the wrong section \
         of series.conf (section \"{current}\"{}) or the remote fetching from \
         \"{repo}\" needs to be fetched{}. Manual intervention is required.",
        found.as_ref().map(|h| format!(", commit found in \"{}\"", h)).unwrap_or_default(),
        if *remote_order {
            format!(" or the relative order of \"{}\" and \"{}\" in the remotes list is incorrect",
                found.as_deref().unwrap_or_default(), current)
        } else {
            String::new()
        }
    )]
    WrongSection {
        name: String,
        repo: String,
        current: String,
        found: Option<String>,
        remote_order: bool,
    },

    /// The index and the remotes list contradict each other.
    #[error("Head \"{head}\" is not available locally but commit \"{rev}\" found in patch \"{name}\" was found in that head.")]
    Consistency {
        name: String,
        rev: String,
        head: String,
    },

    /// The mainline head is not part of the index.
    #[error(
        "Did not find mainline information (head \"{head}\") in the git-sort index \
         at \"{source_path}\". The index must contain the first entry of the remotes list."
    )]
    MissingMainline { head: String, source_path: String },

    /// A revision could not be resolved to a commit.
    #[error("Revision \"{rev}\" could not be resolved: {message}")]
    Revision { rev: String, message: String },

    /// The remotes configuration is invalid.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The index file is invalid or cannot answer a query.
    #[error("Index error: {message}")]
    Index { message: String },

    /// One or more patches could not be retagged.
    #[error("{}", failures.join("\n"))]
    TagUpdate { failures: Vec<String> },

    /// An error occurred while executing a Git command.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// The external three-way merge tool could not be run.
    #[error("Merge tool error: {command} - {message}")]
    MergeTool { command: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Error::Structural {
            message: message.into(),
        }
    }

    /// Whether this is the internal `NotFound` signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Turn an internal `NotFound` into an operator-facing structural error.
    ///
    /// Every other variant is returned unchanged.
    pub fn into_structural(self) -> Self {
        match self {
            Error::NotFound { message } => Error::Structural { message },
            other => other,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
