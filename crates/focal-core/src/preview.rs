//! Preview link rewriting and the preview request registry.
//!
//! A widget may have a companion preview link whose href ends in the
//! current focal point (e.g. `/focal-point/preview/thumbnail/30%2C70`).
//! Every time the value changes, the final path segment is replaced and
//! the matching entry in the page's [`RequestRegistry`] is retargeted so
//! that the next preview refresh fetches the new crop.

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::store;
use crate::sync::Effect;
use crate::types::FocalPoint;

/// Bytes escaped in a URI component: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, matching `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` for use as a single URL path segment.
#[must_use]
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Replace the final `/`-separated segment of `href` with `segment`,
/// percent-encoded.
///
/// An href without any `/` is replaced entirely.
#[must_use]
pub fn replace_last_segment(href: &str, segment: &str) -> String {
    let encoded = encode_segment(segment);
    match href.rsplit_once('/') {
        Some((base, _)) => format!("{base}/{encoded}"),
        None => encoded,
    }
}

/// The preview link of one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLink {
    href: String,
    request_key: String,
}

impl PreviewLink {
    /// Track a link currently pointing at `href` whose request is
    /// registered under `request_key`.
    #[must_use]
    pub fn new(href: impl Into<String>, request_key: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            request_key: request_key.into(),
        }
    }

    /// The link's current target.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Registry key of the link's preview request.
    #[must_use]
    pub fn request_key(&self) -> &str {
        &self.request_key
    }

    /// Point the link at `point`.
    ///
    /// Returns the new href, or `None` if the link already targets it.
    pub fn retarget(&mut self, point: FocalPoint) -> Option<String> {
        let href = replace_last_segment(&self.href, &store::format(point));
        if href == self.href {
            return None;
        }
        self.href.clone_from(&href);
        Some(href)
    }
}

/// An asynchronous preview request the page can (re)issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// URL the request is sent to.
    pub url: String,
    /// URL recorded in the request's options; kept equal to `url`.
    pub options_url: String,
}

impl RequestDescriptor {
    /// Describe a request to `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            options_url: url.clone(),
            url,
        }
    }

    /// Point both URLs at `url`.
    pub fn retarget(&mut self, url: &str) {
        url.clone_into(&mut self.url);
        url.clone_into(&mut self.options_url);
    }
}

/// Preview requests of a page, keyed by request key.
///
/// Owned by the page controller and handed to each widget, rather than
/// looked up through global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestRegistry {
    requests: HashMap<String, RequestDescriptor>,
}

impl RequestRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request, returning the one it replaced.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        request: RequestDescriptor,
    ) -> Option<RequestDescriptor> {
        self.requests.insert(key.into(), request)
    }

    /// Look up a request.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RequestDescriptor> {
        self.requests.get(key)
    }

    /// Remove a request.
    pub fn remove(&mut self, key: &str) -> Option<RequestDescriptor> {
        self.requests.remove(key)
    }

    /// Number of registered requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` if no requests are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Point the request under `key` at `url`.
    ///
    /// Returns `false` (and logs a warning) if no such request exists.
    pub fn retarget(&mut self, key: &str, url: &str) -> bool {
        let Some(request) = self.requests.get_mut(key) else {
            log::warn!("no preview request registered under {key:?}");
            return false;
        };
        request.retarget(url);
        true
    }

    /// Apply every [`Effect::RetargetPreview`] in `effects`.
    ///
    /// Returns how many requests were retargeted.
    pub fn apply(&mut self, effects: &[Effect]) -> usize {
        let mut applied = 0;
        for effect in effects {
            if let Effect::RetargetPreview { request_key, href } = effect
                && self.retarget(request_key, href)
            {
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_is_encoded() {
        assert_eq!(encode_segment("30,70"), "30%2C70");
    }

    #[test]
    fn unreserved_marks_pass_through() {
        assert_eq!(encode_segment("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn last_segment_is_replaced() {
        assert_eq!(
            replace_last_segment("/focal-point/preview/thumbnail/50%2C50", "30,70"),
            "/focal-point/preview/thumbnail/30%2C70"
        );
    }

    #[test]
    fn href_without_slash_is_replaced_entirely() {
        assert_eq!(replace_last_segment("preview", "1,2"), "1%2C2");
        assert_eq!(replace_last_segment("", "1,2"), "1%2C2");
    }

    #[test]
    fn trailing_slash_gains_segment() {
        assert_eq!(replace_last_segment("/preview/", "1,2"), "/preview/1%2C2");
    }

    #[test]
    fn link_retarget_reports_only_changes() {
        let mut link = PreviewLink::new("/preview/style/50%2C50", "fp-preview-link");
        assert_eq!(link.retarget(FocalPoint::CENTER), None);
        assert_eq!(
            link.retarget(FocalPoint::new(30, 70)).as_deref(),
            Some("/preview/style/30%2C70")
        );
        assert_eq!(link.href(), "/preview/style/30%2C70");
    }

    #[test]
    fn registry_retargets_both_urls() {
        let mut registry = RequestRegistry::new();
        registry.register("fp-preview-link", RequestDescriptor::new("/preview/a"));
        assert!(registry.retarget("fp-preview-link", "/preview/b"));
        let request = registry.get("fp-preview-link");
        assert_eq!(
            request,
            Some(&RequestDescriptor {
                url: "/preview/b".into(),
                options_url: "/preview/b".into(),
            })
        );
    }

    #[test]
    fn registry_ignores_unknown_keys() {
        let mut registry = RequestRegistry::new();
        assert!(!registry.retarget("missing", "/preview/b"));
        assert!(registry.is_empty());
    }

    #[test]
    fn apply_only_uses_retarget_effects() {
        let mut registry = RequestRegistry::new();
        registry.register("fp-preview-link", RequestDescriptor::new("/preview/a"));
        let effects = [
            Effect::SetFieldValue("30,70".into()),
            Effect::RetargetPreview {
                request_key: "fp-preview-link".into(),
                href: "/preview/30%2C70".into(),
            },
            Effect::RetargetPreview {
                request_key: "other".into(),
                href: "/preview/x".into(),
            },
        ];
        assert_eq!(registry.apply(&effects), 1);
        assert_eq!(
            registry.get("fp-preview-link").map(|r| r.url.as_str()),
            Some("/preview/30%2C70")
        );
    }
}
