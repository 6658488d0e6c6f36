//! Context snapshots.
//!
//! A surface reports what the user clicked on as a loosely typed
//! [`RawContextParams`] record. [`ContextSnapshot::capture`] turns that into
//! the immutable snapshot every renderer reads; the snapshot is shared behind
//! an `Arc` for the rest of the invocation and never changes.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::host::AccountAssociation;

/// Which edit operations the focused element currently supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditFlags {
    pub can_undo: bool,
    pub can_redo: bool,
    pub can_cut: bool,
    pub can_copy: bool,
    pub can_paste: bool,
    pub can_select_all: bool,
}

/// The kind of input field under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputFieldKind {
    #[default]
    None,
    PlainText,
    Password,
    Other,
}

/// The kind of media under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    #[default]
    None,
    Image,
    Video,
    Audio,
    Canvas,
    File,
    Plugin,
}

/// Context facts as reported by a surface.
///
/// Field names follow the surface manager's wire format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawContextParams {
    pub x: i32,
    pub y: i32,
    pub selection_text: String,
    pub link_url: String,
    pub src_url: String,
    pub frame_url: String,
    pub page_url: String,
    pub media_type: MediaKind,
    pub is_editable: bool,
    pub edit_flags: EditFlags,
    pub misspelled_word: String,
    pub input_field_type: InputFieldKind,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// Immutable per-invocation view of what the user clicked on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextSnapshot {
    /// Pointer position in surface coordinates.
    pub position: (i32, i32),
    /// Selected text, untrimmed.
    pub selection_text: String,
    pub link_url: Option<String>,
    /// Source URL of the media under the pointer.
    pub src_url: Option<String>,
    pub frame_url: Option<String>,
    pub page_url: Option<String>,
    pub media_kind: MediaKind,
    pub is_editable: bool,
    pub edit_flags: EditFlags,
    /// The flagged misspelling, if the click landed on one.
    pub misspelled_word: Option<String>,
    pub input_field_kind: InputFieldKind,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// Whether the surface hosts an internal application page.
    pub is_internal_surface: bool,
    pub account: AccountAssociation,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl ContextSnapshot {
    /// Capture a snapshot from raw surface params plus host-resolved facts.
    pub fn capture(
        params: RawContextParams,
        account: AccountAssociation,
        is_internal_surface: bool,
    ) -> Self {
        Self {
            position: (params.x, params.y),
            selection_text: params.selection_text,
            link_url: non_empty(params.link_url),
            src_url: non_empty(params.src_url),
            frame_url: non_empty(params.frame_url),
            page_url: non_empty(params.page_url),
            media_kind: params.media_type,
            is_editable: params.is_editable,
            edit_flags: params.edit_flags,
            misspelled_word: non_empty(params.misspelled_word),
            input_field_kind: params.input_field_type,
            can_go_back: params.can_go_back,
            can_go_forward: params.can_go_forward,
            is_internal_surface,
            account,
        }
    }

    /// Whether there is a non-blank text selection.
    pub fn has_selection(&self) -> bool {
        !self.selection_text.trim().is_empty()
    }

    /// The misspelled word, only while editing.
    pub fn editable_misspelling(&self) -> Option<&str> {
        if self.is_editable {
            self.misspelled_word.as_deref()
        } else {
            None
        }
    }

    /// Whether the click target is an image with a source URL.
    pub fn is_image(&self) -> bool {
        self.media_kind == MediaKind::Image && self.src_url.is_some()
    }

    /// Whether the link under the pointer is http(s).
    pub fn is_http_link(&self) -> bool {
        self.link_url.as_deref().is_some_and(is_http_url)
    }

    /// Whether the current page is http(s).
    pub fn is_http_page(&self) -> bool {
        self.page_url.as_deref().is_some_and(is_http_url)
    }

    /// Whether the current page was loaded over a secure scheme.
    pub fn is_secure_page(&self) -> bool {
        self.page_url
            .as_deref()
            .and_then(|url| Url::parse(url).ok())
            .is_some_and(|url| url.scheme() == "https")
    }

    /// Whether this is a plain page context: nothing selected, edited, linked or media.
    pub fn is_page_context(&self) -> bool {
        !self.has_selection()
            && !self.is_editable
            && self.link_url.is_none()
            && self.media_kind == MediaKind::None
    }
}

/// Whether a URL string parses with an http or https scheme.
pub fn is_http_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawContextParams {
        RawContextParams {
            page_url: "https://mail.example.com/inbox".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_capture_maps_empty_strings_to_none() {
        let snapshot = ContextSnapshot::capture(raw(), AccountAssociation::None, false);
        assert_eq!(snapshot.link_url, None);
        assert_eq!(snapshot.misspelled_word, None);
        assert_eq!(
            snapshot.page_url.as_deref(),
            Some("https://mail.example.com/inbox")
        );
        assert!(snapshot.is_page_context());
    }

    #[test]
    fn test_deserializes_surface_wire_format() {
        let json = r#"{
            "x": 10, "y": 20,
            "selectionText": "hello",
            "linkUrl": "mailto:user@x.com",
            "isEditable": true,
            "editFlags": { "canCut": true, "canPaste": true },
            "misspelledWord": "helo",
            "inputFieldType": "password",
            "mediaType": "image"
        }"#;
        let params: RawContextParams = serde_json::from_str(json).unwrap();
        let snapshot = ContextSnapshot::capture(params, AccountAssociation::None, false);

        assert_eq!(snapshot.position, (10, 20));
        assert!(snapshot.edit_flags.can_cut);
        assert!(!snapshot.edit_flags.can_copy);
        assert_eq!(snapshot.input_field_kind, InputFieldKind::Password);
        assert_eq!(snapshot.media_kind, MediaKind::Image);
        assert_eq!(snapshot.editable_misspelling(), Some("helo"));
        assert!(!snapshot.is_http_link());
        // Image without a source URL is not treated as image content.
        assert!(!snapshot.is_image());
    }

    #[test]
    fn test_misspelling_requires_editable() {
        let params = RawContextParams {
            misspelled_word: "teh".to_string(),
            is_editable: false,
            ..raw()
        };
        let snapshot = ContextSnapshot::capture(params, AccountAssociation::None, false);
        assert_eq!(snapshot.editable_misspelling(), None);
    }

    #[test]
    fn test_scheme_checks() {
        assert!(is_http_url("http://example.com"));
        assert!(is_http_url("https://example.com/a?b=c"));
        assert!(!is_http_url("mailto:user@x.com"));
        assert!(!is_http_url("not a url"));

        let insecure = RawContextParams {
            page_url: "http://example.com/login".to_string(),
            ..Default::default()
        };
        let snapshot = ContextSnapshot::capture(insecure, AccountAssociation::None, false);
        assert!(snapshot.is_http_page());
        assert!(!snapshot.is_secure_page());
    }

    #[test]
    fn test_blank_selection_is_not_a_selection() {
        let params = RawContextParams {
            selection_text: "  \n".to_string(),
            ..raw()
        };
        let snapshot = ContextSnapshot::capture(params, AccountAssociation::None, false);
        assert!(!snapshot.has_selection());
    }
}
