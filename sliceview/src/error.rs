// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by collection access and view mutations.

use thiserror::Error;

/// Errors raised by collection access and [`SliceView`](crate::SliceView) mutations.
///
/// None of these are fatal: interactive entry points (keys, menus, drops) log
/// them and leave the view unchanged.
#[derive(Debug, Error)]
pub enum SliceError {
    /// A logical index outside `0..len`.
    #[error("index {index} out of range for collection of {len} elements")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Collection size at the time of the call.
        len: usize,
    },
    /// Insert or delete requested on a fixed-size collection.
    #[error("collection has a fixed size")]
    FixedSize,
    /// No collection is attached, or the owner dropped it.
    #[error("no collection attached")]
    Detached,
    /// A clipboard record could not be decoded into an element.
    #[error("failed to decode element")]
    Decode(#[source] serde_json::Error),
    /// An element could not be encoded for the clipboard.
    #[error("failed to encode element")]
    Encode(#[source] serde_json::Error),
    /// A clipboard record carried a format the collection does not accept.
    #[error("unsupported clipboard format `{0}`")]
    UnsupportedFormat(String),
    /// A value of the wrong type was handed to the collection.
    #[error("value is not a `{expected}`")]
    TypeMismatch {
        /// Element type the collection holds.
        expected: &'static str,
    },
    /// No value adapter is registered for an element kind.
    #[error("no value adapter registered for `{0}`")]
    NoAdapter(&'static str),
    /// A paste or drop payload held no usable element.
    #[error("payload contains no decodable element")]
    EmptyPayload,
    /// The operation needs a selection and there is none.
    #[error("nothing selected")]
    NothingSelected,
}
