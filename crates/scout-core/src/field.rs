//! # Field Model
//!
//! A `Field` is one input of a form schema. Its behavior is determined by
//! `FieldKind`, a closed variant carrying the typed configuration of each
//! kind. Default values and the required-field validity rule are exhaustive
//! matches over this variant.
//!
//! ## Wire Form
//!
//! Fields serialize as
//! `{"id": 3, "name": "Auto Score", "type": "counter", "required": true, "props": {...}}`.
//! The `type`/`props` pair is resolved into a `FieldKind` at load time; an
//! unknown `type` is a deserialization error rather than a runtime fallback.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::FieldId;

// ─── Field values ────────────────────────────────────────────────────

/// The runtime value of one field in a match record.
///
/// Booleans come from checkboxes, integers from counters, and strings from
/// text, dropdown, timer, and grid inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state.
    Bool(bool),
    /// Counter value.
    Int(i64),
    /// Free text, selected option, formatted timer, or grid cell.
    Text(String),
}

impl FieldValue {
    /// Whether this is the empty string.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// The integer value, if this is a counter value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// ─── Per-kind configuration ──────────────────────────────────────────

/// Counter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterProps {
    /// Starting value. A required counter still at this value is unanswered.
    pub default: i64,
    /// Lower bound, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    /// Upper bound, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl CounterProps {
    /// Step up by one, clamped to `max`.
    pub fn increment(&self, value: i64) -> i64 {
        let next = value.saturating_add(1);
        self.max.map_or(next, |max| next.min(max))
    }

    /// Step down by one, clamped to `min`.
    pub fn decrement(&self, value: i64) -> i64 {
        let next = value.saturating_sub(1);
        self.min.map_or(next, |min| next.max(min))
    }
}

/// Checkbox configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckboxProps {
    /// Initial checked state shown in the form.
    pub default: bool,
}

/// Dropdown configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownProps {
    /// Ordered, unique options.
    pub options: Vec<String>,
    /// Preselected option shown in the form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Input label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Text input configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProps {
    /// Render as a multi-line input.
    pub multiline: bool,
    /// Placeholder default shown in the form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Input label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Timer configuration. Timers carry no options today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerProps {}

/// Grid (heatmap) configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridProps {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
}

impl Default for GridProps {
    fn default() -> Self {
        Self { rows: 3, cols: 3 }
    }
}

// ─── Field kinds ─────────────────────────────────────────────────────

/// The tag of a field kind, as written in schema documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Counter,
    Checkbox,
    Dropdown,
    Text,
    Timer,
    Grid,
}

impl FieldType {
    /// The identifier used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Checkbox => "checkbox",
            Self::Dropdown => "dropdown",
            Self::Text => "text",
            Self::Timer => "timer",
            Self::Grid => "grid",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field kind with its typed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Counter(CounterProps),
    Checkbox(CheckboxProps),
    Dropdown(DropdownProps),
    Text(TextProps),
    Timer(TimerProps),
    Grid(GridProps),
}

impl FieldKind {
    /// The tag of this kind.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Counter(_) => FieldType::Counter,
            Self::Checkbox(_) => FieldType::Checkbox,
            Self::Dropdown(_) => FieldType::Dropdown,
            Self::Text(_) => FieldType::Text,
            Self::Timer(_) => FieldType::Timer,
            Self::Grid(_) => FieldType::Grid,
        }
    }

    /// The value a field starts with when no stored value exists.
    ///
    /// Checkboxes start unchecked, counters at their configured default, and
    /// every string-valued kind at `""`. Configured text and dropdown
    /// defaults are presentation hints only; a required text field starts
    /// unanswered regardless of its placeholder.
    pub fn initial_value(&self) -> FieldValue {
        match self {
            Self::Checkbox(_) => FieldValue::Bool(false),
            Self::Counter(props) => FieldValue::Int(props.default),
            Self::Dropdown(_) | Self::Text(_) | Self::Timer(_) | Self::Grid(_) => {
                FieldValue::Text(String::new())
            }
        }
    }

    /// Whether `value` has the type this kind stores.
    ///
    /// Checkboxes hold booleans, counters hold integers, and every other
    /// kind holds text.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            Self::Checkbox(_) => matches!(value, FieldValue::Bool(_)),
            Self::Counter(_) => matches!(value, FieldValue::Int(_)),
            Self::Dropdown(_) | Self::Text(_) | Self::Timer(_) | Self::Grid(_) => {
                matches!(value, FieldValue::Text(_))
            }
        }
    }

    /// This kind with display labels removed.
    pub fn without_labels(&self) -> Self {
        match self {
            Self::Dropdown(props) => Self::Dropdown(DropdownProps {
                label: None,
                ..props.clone()
            }),
            Self::Text(props) => Self::Text(TextProps {
                label: None,
                ..props.clone()
            }),
            other => other.clone(),
        }
    }

    fn props_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Counter(p) => serde_json::to_value(p),
            Self::Checkbox(p) => serde_json::to_value(p),
            Self::Dropdown(p) => serde_json::to_value(p),
            Self::Text(p) => serde_json::to_value(p),
            Self::Timer(p) => serde_json::to_value(p),
            Self::Grid(p) => serde_json::to_value(p),
        }
    }

    fn from_parts(field_type: FieldType, props: Value) -> Result<Self, serde_json::Error> {
        let props = if props.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            props
        };
        Ok(match field_type {
            FieldType::Counter => Self::Counter(serde_json::from_value(props)?),
            FieldType::Checkbox => Self::Checkbox(serde_json::from_value(props)?),
            FieldType::Dropdown => Self::Dropdown(serde_json::from_value(props)?),
            FieldType::Text => Self::Text(serde_json::from_value(props)?),
            // Timers ignore whatever props a document carries.
            FieldType::Timer => Self::Timer(TimerProps {}),
            FieldType::Grid => Self::Grid(serde_json::from_value(props)?),
        })
    }
}

// ─── Field ───────────────────────────────────────────────────────────

/// One input of a form schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawField", into = "RawField")]
pub struct Field {
    /// Identifier, unique across the schema.
    pub id: FieldId,
    /// Display name, also used for name-based lookup and axis labels.
    pub name: String,
    /// Whether the field must be answered before a record can be completed.
    pub required: bool,
    /// Kind and kind-specific configuration.
    pub kind: FieldKind,
}

impl Field {
    /// Construct a field.
    pub fn new(id: u32, name: impl Into<String>, required: bool, kind: FieldKind) -> Self {
        Self {
            id: FieldId(id),
            name: name.into(),
            required,
            kind,
        }
    }

    /// The tag of this field's kind.
    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Whether `value` leaves this field unanswered.
    ///
    /// A field is invalid iff it is required and the value is the empty
    /// string, an unchecked checkbox, or a counter still at its configured
    /// default. A field that is not required is always valid. A required
    /// field holding a value of the wrong type is unanswered.
    pub fn is_invalid(&self, value: &FieldValue) -> bool {
        if !self.required {
            return false;
        }
        if value.is_empty_text() || !self.kind.accepts(value) {
            return true;
        }
        match &self.kind {
            FieldKind::Checkbox(_) => *value == FieldValue::Bool(false),
            FieldKind::Counter(props) => *value == FieldValue::Int(props.default),
            FieldKind::Dropdown(_)
            | FieldKind::Text(_)
            | FieldKind::Timer(_)
            | FieldKind::Grid(_) => false,
        }
    }
}

/// Document representation of a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawField {
    id: FieldId,
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    props: Value,
}

impl TryFrom<RawField> for Field {
    type Error = String;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let kind = FieldKind::from_parts(raw.field_type, raw.props)
            .map_err(|e| format!("field {} ({:?}): invalid props: {e}", raw.id, raw.name))?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            required: raw.required,
            kind,
        })
    }
}

impl From<Field> for RawField {
    fn from(field: Field) -> Self {
        // Props are plain structs of strings, integers, and booleans, which
        // always convert to a JSON value.
        let props = field
            .kind
            .props_value()
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self {
            id: field.id,
            name: field.name,
            field_type: field.kind.field_type(),
            required: field.required,
            props,
        }
    }
}
