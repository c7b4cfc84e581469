//! Shared field attributes and descriptor vocabulary

use crate::application::Application;
use crate::resolve::{Condition, FormText};
use serde_json::Value;

/// Discriminant of a field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Date,
    Select,
    Radio,
    Checkbox,
    Description,
    Divider,
    KeyValue,
    Custom,
    Submit,
    Repeater,
}

/// Render hint: which widget the component layer should map a field to.
///
/// Custom fields carry a free-form component name registered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldComponent {
    TextFormField,
    DateFormField,
    SelectFormField,
    RadioFormField,
    CheckboxFormField,
    DescriptionFormField,
    DividerFormField,
    KeyValueFormField,
    SubmitFormField,
    FieldsRepeaterFormField,
    Custom(String),
}

/// Horizontal span of a rendered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
}

/// Theme color token. Concrete colors are the render layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeColor {
    #[default]
    Blue,
    White,
    Purple,
    Red,
    Yellow,
    Mint,
}

/// Heading level for titled display fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleVariant {
    H1,
    #[default]
    H2,
    H3,
    H4,
    H5,
}

/// One choice in a select, radio, or checkbox field.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub label: FormText,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<FormText>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Visual weight of a submit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionKind {
    #[default]
    Primary,
    Subtle,
    Reject,
}

/// One action a submit field offers; `event` feeds the host's workflow
/// transition.
#[derive(Debug, Clone, PartialEq)]
pub struct CallToAction {
    pub event: String,
    pub title: FormText,
    pub kind: ActionKind,
}

impl CallToAction {
    pub fn new(event: impl Into<String>, title: impl Into<FormText>, kind: ActionKind) -> Self {
        Self {
            event: event.into(),
            title: title.into(),
            kind,
        }
    }
}

/// Attributes every field kind shares.
///
/// Built exclusively by the builder layer's common-extraction step so all
/// kinds get identical defaulting semantics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BaseField {
    /// Unique within the form; doubles as the answer path. Empty only for
    /// pseudo-fields that never hold an answer.
    pub id: String,
    pub title: FormText,
    pub description: Option<FormText>,
    pub width: FieldWidth,
    pub disabled: bool,
    /// True for display-only fields excluded from answer validation.
    pub does_not_require_answer: bool,
    pub condition: Option<Condition>,
    pub default_value: Option<Value>,
}

impl BaseField {
    /// Evaluate the visibility condition against current state.
    pub fn is_visible(&self, application: &Application) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.evaluate(application))
    }
}
