// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipboard bridge.

use crate::Payload;

/// Host clipboard, exchanging payloads of tagged records.
pub trait Clipboard {
    /// Replaces the clipboard contents.
    fn write(&mut self, payload: Payload);

    /// Returns the records whose format is listed in `accepted`.
    fn read(&self, accepted: &[&str]) -> Payload;
}

/// In-process clipboard.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: Payload,
}

impl MemoryClipboard {
    /// Creates an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Everything currently on the clipboard.
    #[must_use]
    pub fn contents(&self) -> &Payload {
        &self.contents
    }
}

impl Clipboard for MemoryClipboard {
    fn write(&mut self, payload: Payload) {
        self.contents = payload;
    }

    fn read(&self, accepted: &[&str]) -> Payload {
        self.contents
            .iter()
            .filter(|record| accepted.contains(&record.mime.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clipboard, MemoryClipboard};
    use crate::{MIME_JSON, MimeData};

    #[test]
    fn read_filters_by_format() {
        let mut clip = MemoryClipboard::new();
        assert!(clip.is_empty());
        clip.write(vec![
            MimeData::json(b"1".to_vec()),
            MimeData {
                mime: String::from("text/plain"),
                data: b"one".to_vec(),
            },
        ]);
        assert_eq!(clip.read(&[MIME_JSON]).len(), 1);
        assert_eq!(clip.read(&[]).len(), 0);
        assert_eq!(clip.contents().len(), 2);
    }
}
