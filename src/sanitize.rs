// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTML sanitization for user-authored blog bodies and comments.

/// Strips markup that could run in a reader's browser.
pub trait Sanitizer: Send + Sync {
    fn sanitize_html(&self, raw: &str) -> String;
}

/// Sanitizer backed by ammonia's default allow-list.
///
/// Formatting tags and safe links survive; scripts, event handlers,
/// `javascript:` URLs and styles are removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaSanitizer;

impl Sanitizer for AmmoniaSanitizer {
    fn sanitize_html(&self, raw: &str) -> String {
        ammonia::clean(raw)
    }
}
