//! Input field state and field-option allow-list

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};
use unicode_width::UnicodeWidthChar;

use super::error::PromptError;
use super::request::InputKind;

/// Mask character for password fields
pub const MASK_CHAR: char = '•';

/// Attributes that may be applied to an input field
///
/// Only these attributes are supported; anything else is rejected by
/// [`FieldOptions::from_map`] instead of being set blindly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FieldOptions {
    /// Hint text shown while the field is empty
    pub placeholder: Option<String>,
    /// Maximum number of characters the user may type
    pub max_length: Option<usize>,
    /// Initial content
    pub value: Option<String>,
    /// Field cannot be edited (its initial value can still be submitted)
    pub read_only: bool,
}

impl FieldOptions {
    /// Build from a free-form key/value map
    ///
    /// Keys are matched case-insensitively and ignoring `-`/`_`, so
    /// `maxLength`, `max-length` and `max_length` are the same attribute.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, PromptError> {
        debug!(keys = ?map.keys().collect::<Vec<_>>(), "FieldOptions::from_map: called");
        let mut options = Self::default();
        for (key, value) in map {
            options.set(key, value)?;
        }
        Ok(options)
    }

    /// Set one attribute by name
    pub fn set(&mut self, key: &str, value: &Value) -> Result<(), PromptError> {
        debug!(%key, ?value, "FieldOptions::set: called");
        match normalize_key(key).as_str() {
            "placeholder" => self.placeholder = Some(as_text(key, value)?),
            "value" => self.value = Some(as_text(key, value)?),
            "maxlength" => self.max_length = Some(as_length(key, value)?),
            "readonly" => {
                self.read_only = value.as_bool().ok_or_else(|| PromptError::InvalidFieldOption {
                    name: key.to_string(),
                    expected: "boolean",
                })?
            }
            _ => return Err(PromptError::UnsupportedFieldOption(key.to_string())),
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn as_text(key: &str, value: &Value) -> Result<String, PromptError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(PromptError::InvalidFieldOption {
            name: key.to_string(),
            expected: "string",
        }),
    }
}

fn as_length(key: &str, value: &Value) -> Result<usize, PromptError> {
    let invalid = || PromptError::InvalidFieldOption {
        name: key.to_string(),
        expected: "non-negative integer",
    };
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize).ok_or_else(invalid),
        Value::String(s) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Single-line editable text with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    text: String,
    /// Cursor position in chars
    cursor: usize,
    kind: InputKind,
    placeholder: Option<String>,
    max_length: Option<usize>,
    read_only: bool,
}

impl InputField {
    pub fn new(kind: InputKind, options: &FieldOptions) -> Self {
        debug!(%kind, ?options, "InputField::new: called");
        let text = options.value.clone().unwrap_or_default();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            kind,
            placeholder: options.placeholder.clone(),
            max_length: options.max_length,
            read_only: options.read_only,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &InputKind {
        &self.kind
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert a character at the cursor; returns false if it was refused
    pub fn insert(&mut self, c: char) -> bool {
        trace!(%c, cursor = self.cursor, "InputField::insert: called");
        if self.read_only || !self.kind.accepts(c) {
            return false;
        }
        if let Some(max) = self.max_length
            && self.len() >= max
        {
            debug!(max, "InputField::insert: max length reached");
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Insert a string, stopping at the first refused character
    pub fn insert_str(&mut self, s: &str) -> usize {
        s.chars().take_while(|c| self.insert(*c)).count()
    }

    pub fn backspace(&mut self) -> bool {
        if self.read_only || self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.read_only || self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    /// Text as it should appear on screen (masked for passwords)
    pub fn display_text(&self) -> String {
        if self.kind.is_masked() {
            std::iter::repeat_n(MASK_CHAR, self.len()).collect()
        } else {
            self.text.clone()
        }
    }

    /// Slice of the display text that fits in `width` columns with the
    /// cursor visible, plus the cursor's column within that slice
    pub fn visible(&self, width: u16) -> (String, u16) {
        trace!(width, cursor = self.cursor, "InputField::visible: called");
        let width = usize::from(width);
        if width == 0 {
            return (String::new(), 0);
        }

        let chars: Vec<char> = self.display_text().chars().collect();
        let char_width = |c: &char| c.width().unwrap_or(0);

        // Scroll so the cursor cell itself still fits
        let mut start = 0;
        while start < self.cursor && chars[start..self.cursor].iter().map(char_width).sum::<usize>() >= width {
            start += 1;
        }

        let mut used = 0;
        let mut shown = String::new();
        for c in &chars[start..] {
            let w = char_width(c);
            if used + w > width {
                break;
            }
            used += w;
            shown.push(*c);
        }

        let cursor_col = chars[start..self.cursor].iter().map(char_width).sum::<usize>();
        (shown, cursor_col as u16)
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_field() -> InputField {
        InputField::new(InputKind::Text, &FieldOptions::default())
    }

    #[test]
    fn test_from_map_allow_list() {
        let map = json!({
            "placeholder": "Your name",
            "maxLength": 8,
            "value": "Al",
            "read_only": false,
        });
        let options = FieldOptions::from_map(map.as_object().unwrap()).unwrap();
        assert_eq!(options.placeholder.as_deref(), Some("Your name"));
        assert_eq!(options.max_length, Some(8));
        assert_eq!(options.value.as_deref(), Some("Al"));
        assert!(!options.read_only);
    }

    #[test]
    fn test_from_map_rejects_unknown_key() {
        let map = json!({ "onclick": "alert(1)" });
        let err = FieldOptions::from_map(map.as_object().unwrap()).unwrap_err();
        assert_eq!(err, PromptError::UnsupportedFieldOption("onclick".to_string()));
    }

    #[test]
    fn test_from_map_rejects_wrong_types() {
        let map = json!({ "max-length": -3 });
        assert!(matches!(
            FieldOptions::from_map(map.as_object().unwrap()),
            Err(PromptError::InvalidFieldOption { .. })
        ));

        let map = json!({ "readOnly": "yes" });
        assert!(matches!(
            FieldOptions::from_map(map.as_object().unwrap()),
            Err(PromptError::InvalidFieldOption { expected: "boolean", .. })
        ));

        let map = json!({ "placeholder": ["a"] });
        assert!(FieldOptions::from_map(map.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_from_map_numeric_strings() {
        let map = json!({ "maxlength": "4", "value": 42 });
        let options = FieldOptions::from_map(map.as_object().unwrap()).unwrap();
        assert_eq!(options.max_length, Some(4));
        assert_eq!(options.value.as_deref(), Some("42"));
    }

    #[test]
    fn test_field_options_yaml_denies_unknown() {
        let parsed: Result<FieldOptions, _> = serde_yaml::from_str("style: red");
        assert!(parsed.is_err());

        let parsed: FieldOptions = serde_yaml::from_str("max-length: 3\nread-only: true").unwrap();
        assert_eq!(parsed.max_length, Some(3));
        assert!(parsed.read_only);
    }

    #[test]
    fn test_editing() {
        let mut field = text_field();
        assert_eq!(field.insert_str("Alce"), 4);
        field.move_left();
        field.move_left();
        assert!(field.insert('i'));
        assert_eq!(field.value(), "Alice");
        assert_eq!(field.cursor(), 3);

        field.move_end();
        assert!(field.backspace());
        assert_eq!(field.value(), "Alic");

        field.move_home();
        assert!(field.delete());
        assert_eq!(field.value(), "lic");
        assert!(!field.backspace());
    }

    #[test]
    fn test_initial_value_and_max_length() {
        let options = FieldOptions {
            value: Some("ab".to_string()),
            max_length: Some(3),
            ..Default::default()
        };
        let mut field = InputField::new(InputKind::Text, &options);
        assert_eq!(field.cursor(), 2);
        assert!(field.insert('c'));
        assert!(!field.insert('d'));
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn test_read_only() {
        let options = FieldOptions {
            value: Some("fixed".to_string()),
            read_only: true,
            ..Default::default()
        };
        let mut field = InputField::new(InputKind::Text, &options);
        assert!(!field.insert('x'));
        assert!(!field.backspace());
        assert_eq!(field.value(), "fixed");
    }

    #[test]
    fn test_number_kind_filters() {
        let mut field = InputField::new(InputKind::Number, &FieldOptions::default());
        assert_eq!(field.insert_str("12a3"), 2);
        assert_eq!(field.value(), "12");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut field = text_field();
        field.insert_str("héllo");
        field.move_left();
        field.backspace();
        assert_eq!(field.value(), "hélo");
        assert_eq!(field.len(), 4);
    }

    #[test]
    fn test_password_masking() {
        let mut field = InputField::new(InputKind::Password, &FieldOptions::default());
        field.insert_str("hunter2");
        assert_eq!(field.display_text(), "•••••••");
        assert_eq!(field.value(), "hunter2");
    }

    #[test]
    fn test_visible_window_scrolls_with_cursor() {
        let mut field = text_field();
        field.insert_str("abcdefghij");

        let (shown, col) = field.visible(4);
        assert_eq!(shown, "hij");
        assert_eq!(col, 3);

        field.move_home();
        let (shown, col) = field.visible(4);
        assert_eq!(shown, "abcd");
        assert_eq!(col, 0);

        let (shown, col) = field.visible(20);
        assert_eq!(shown, "abcdefghij");
        assert_eq!(col, 0);
    }
}
