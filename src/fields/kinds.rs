//! The closed set of field descriptor variants
//!
//! Each kind is its own struct embedding [`BaseField`]; the [`Field`] enum
//! is the tagged union handed to the composition tree and the render
//! layer. Descriptors are immutable once built.

use crate::application::Application;
use crate::fields::base::{
    BaseField, CallToAction, FieldComponent, FieldType, SelectOption, ThemeColor, TitleVariant,
};
use crate::resolve::{DynFlag, DynValue, FormText};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Input variant of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVariant {
    #[default]
    Text,
    Number,
    Email,
    Tel,
    Textarea,
}

/// Single-line or multi-line text input.
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub base: BaseField,
    pub placeholder: Option<FormText>,
    pub variant: TextVariant,
    pub background_color: ThemeColor,
    pub required: Option<DynFlag>,
    pub max_length: Option<usize>,
    pub read_only: bool,
}

/// Date picker with optional dynamic bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DateField {
    pub base: BaseField,
    pub placeholder: Option<FormText>,
    pub min_date: Option<DynValue<NaiveDate>>,
    pub max_date: Option<DynValue<NaiveDate>>,
    pub exclude_dates: Option<DynValue<Vec<NaiveDate>>>,
    pub background_color: ThemeColor,
    pub required: Option<DynFlag>,
}

/// Dropdown select; options may be a literal list or an option loader.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectField {
    pub base: BaseField,
    pub options: DynValue<Vec<SelectOption>>,
    pub placeholder: Option<FormText>,
    pub is_multi: bool,
    pub background_color: ThemeColor,
    pub required: Option<DynFlag>,
}

/// Radio button group.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioField {
    pub base: BaseField,
    pub options: DynValue<Vec<SelectOption>>,
    pub large_buttons: bool,
    pub background_color: Option<ThemeColor>,
    pub required: Option<DynFlag>,
}

/// Checkbox group.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxField {
    pub base: BaseField,
    pub options: DynValue<Vec<SelectOption>>,
    pub large: bool,
    pub strong: bool,
    pub background_color: ThemeColor,
    pub required: Option<DynFlag>,
}

/// Display-only block of text.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionField {
    pub base: BaseField,
    pub title_variant: TitleVariant,
    pub tooltip: Option<FormText>,
}

/// Horizontal rule pseudo-field; never holds an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct DividerField {
    pub base: BaseField,
    pub color: Option<ThemeColor>,
}

/// Label/value display pair pseudo-field.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueField {
    pub base: BaseField,
    pub label: FormText,
    pub value: FormText,
    pub divider: bool,
}

/// Host-registered component with free-form props.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomField {
    pub base: BaseField,
    /// Component name the render layer maps to a registered widget.
    pub component_name: String,
    /// Answer paths the component writes besides its own id.
    pub child_input_ids: Vec<String>,
    pub props: Map<String, Value>,
}

/// Where a submit field renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPlacement {
    #[default]
    Footer,
    Screen,
}

/// Workflow submission field.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitField {
    pub base: BaseField,
    pub placement: SubmitPlacement,
    pub actions: Vec<CallToAction>,
    pub refetch_application_after_submit: bool,
}

/// Numbering style for repeated row titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowTitleNumbering {
    #[default]
    Suffix,
    Prefix,
    None,
}

/// Variable-cardinality group of child fields bound to an array-valued
/// answer path.
///
/// Child ids are relative; they become concrete paths of the form
/// `{id}[{index}].{child}` when a row is instantiated.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeaterField {
    pub base: BaseField,
    pub fields: Vec<Field>,
    pub row_title: Option<FormText>,
    pub row_title_numbering: RowTitleNumbering,
    pub add_item_button_text: FormText,
    pub remove_item_button_text: FormText,
    pub min_rows: usize,
    pub max_rows: Option<usize>,
}

/// A field descriptor: one input or display unit of a form.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(TextField),
    Date(DateField),
    Select(SelectField),
    Radio(RadioField),
    Checkbox(CheckboxField),
    Description(DescriptionField),
    Divider(DividerField),
    KeyValue(KeyValueField),
    Custom(CustomField),
    Submit(SubmitField),
    Repeater(RepeaterField),
}

impl Field {
    /// Shared base attributes.
    pub fn base(&self) -> &BaseField {
        match self {
            Field::Text(f) => &f.base,
            Field::Date(f) => &f.base,
            Field::Select(f) => &f.base,
            Field::Radio(f) => &f.base,
            Field::Checkbox(f) => &f.base,
            Field::Description(f) => &f.base,
            Field::Divider(f) => &f.base,
            Field::KeyValue(f) => &f.base,
            Field::Custom(f) => &f.base,
            Field::Submit(f) => &f.base,
            Field::Repeater(f) => &f.base,
        }
    }

    pub(crate) fn base_mut(&mut self) -> &mut BaseField {
        match self {
            Field::Text(f) => &mut f.base,
            Field::Date(f) => &mut f.base,
            Field::Select(f) => &mut f.base,
            Field::Radio(f) => &mut f.base,
            Field::Checkbox(f) => &mut f.base,
            Field::Description(f) => &mut f.base,
            Field::Divider(f) => &mut f.base,
            Field::KeyValue(f) => &mut f.base,
            Field::Custom(f) => &mut f.base,
            Field::Submit(f) => &mut f.base,
            Field::Repeater(f) => &mut f.base,
        }
    }

    /// The field id; doubles as the answer path.
    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn title(&self) -> &FormText {
        &self.base().title
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Text(_) => FieldType::Text,
            Field::Date(_) => FieldType::Date,
            Field::Select(_) => FieldType::Select,
            Field::Radio(_) => FieldType::Radio,
            Field::Checkbox(_) => FieldType::Checkbox,
            Field::Description(_) => FieldType::Description,
            Field::Divider(_) => FieldType::Divider,
            Field::KeyValue(_) => FieldType::KeyValue,
            Field::Custom(_) => FieldType::Custom,
            Field::Submit(_) => FieldType::Submit,
            Field::Repeater(_) => FieldType::Repeater,
        }
    }

    /// Render hint for the component layer.
    pub fn component(&self) -> FieldComponent {
        match self {
            Field::Text(_) => FieldComponent::TextFormField,
            Field::Date(_) => FieldComponent::DateFormField,
            Field::Select(_) => FieldComponent::SelectFormField,
            Field::Radio(_) => FieldComponent::RadioFormField,
            Field::Checkbox(_) => FieldComponent::CheckboxFormField,
            Field::Description(_) => FieldComponent::DescriptionFormField,
            Field::Divider(_) => FieldComponent::DividerFormField,
            Field::KeyValue(_) => FieldComponent::KeyValueFormField,
            Field::Custom(f) => FieldComponent::Custom(f.component_name.clone()),
            Field::Submit(_) => FieldComponent::SubmitFormField,
            Field::Repeater(_) => FieldComponent::FieldsRepeaterFormField,
        }
    }

    /// Evaluate the visibility condition against current state.
    pub fn is_visible(&self, application: &Application) -> bool {
        self.base().is_visible(application)
    }

    /// True if this field participates in the answers document.
    pub fn requires_answer(&self) -> bool {
        let base = self.base();
        !base.does_not_require_answer && !base.id.is_empty()
    }

    /// The option list or loader, for kinds that carry one.
    pub fn options(&self) -> Option<&DynValue<Vec<SelectOption>>> {
        match self {
            Field::Select(f) => Some(&f.options),
            Field::Radio(f) => Some(&f.options),
            Field::Checkbox(f) => Some(&f.options),
            _ => None,
        }
    }

    /// The `required` flag, for kinds that carry one. `None` means the
    /// attribute is unset and not enforced.
    pub fn required(&self) -> Option<&DynFlag> {
        match self {
            Field::Text(f) => f.required.as_ref(),
            Field::Date(f) => f.required.as_ref(),
            Field::Select(f) => f.required.as_ref(),
            Field::Radio(f) => f.required.as_ref(),
            Field::Checkbox(f) => f.required.as_ref(),
            _ => None,
        }
    }
}
