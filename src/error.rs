// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for media selection and uploads.

use thiserror::Error;

/// Message shown when a request never produced a response.
pub const NETWORK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Message shown when the service replied with something we cannot use.
pub const MALFORMED_RESPONSE_MESSAGE: &str = "The server returned a malformed response";

/// User actions rejected before any state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A file pick completed without a file
    #[error("No file was chosen")]
    NoFileGiven,

    /// Upload was requested with nothing selected
    #[error("Please select a file first!")]
    NoMediaSelected,

    /// Upload was requested while one is already running
    #[error("An upload is already in progress")]
    UploadInProgress,
}

/// Terminal failures of an upload attempt.
///
/// The `Display` text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// No response was received
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network {
        /// Underlying transport failure, for the log only
        detail: String,
    },

    /// The service reported an error; shown verbatim
    #[error("{0}")]
    Server(String),

    /// The reply was neither a valid success nor an error
    #[error("{}", MALFORMED_RESPONSE_MESSAGE)]
    MalformedResponse {
        /// What was wrong with the reply, for the log only
        detail: String,
    },
}
