//! Field builder layer
//!
//! Pure factories: each `build_*` function takes a partial configuration
//! (fill the rest with `..Default::default()`) and returns a fully
//! normalized descriptor. All kinds funnel their base attributes through
//! [`extract_common_fields`] so defaulting semantics are identical across
//! the board. Malformed configuration fails here, at definition time.

use crate::application::is_valid_path;
use crate::error::DefinitionError;
use crate::fields::base::{BaseField, CallToAction, FieldWidth, SelectOption, ThemeColor, TitleVariant};
use crate::fields::kinds::{
    CheckboxField, CustomField, DateField, DescriptionField, DividerField, Field, KeyValueField,
    RadioField, RepeaterField, RowTitleNumbering, SelectField, SubmitField, SubmitPlacement,
    TextField, TextVariant,
};
use crate::resolve::{Condition, DynFlag, DynValue, FormText, Message};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Base attributes accepted by every builder.
#[derive(Debug, Clone, Default)]
pub struct CommonFieldConfig {
    pub id: String,
    pub title: FormText,
    pub description: Option<FormText>,
    pub width: Option<FieldWidth>,
    pub disabled: bool,
    /// Unset means the kind's documented default applies.
    pub does_not_require_answer: Option<bool>,
    pub condition: Option<Condition>,
    pub default_value: Option<Value>,
}

/// The single shared defaulting step. No field kind hand-rolls its own
/// base attributes.
fn extract_common_fields(config: CommonFieldConfig) -> BaseField {
    BaseField {
        id: config.id,
        title: config.title,
        description: config.description,
        width: config.width.unwrap_or_default(),
        disabled: config.disabled,
        does_not_require_answer: config.does_not_require_answer.unwrap_or(false),
        condition: config.condition,
        default_value: config.default_value,
    }
}

/// Answer-bearing kinds need a non-empty, path-safe id.
fn require_answer_path(id: &str) -> Result<(), DefinitionError> {
    if id.is_empty() {
        return Err(DefinitionError::EmptyFieldId);
    }
    if !is_valid_path(id) {
        return Err(DefinitionError::InvalidFieldId { id: id.to_string() });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct TextFieldConfig {
    pub common: CommonFieldConfig,
    pub placeholder: Option<FormText>,
    pub variant: TextVariant,
    pub background_color: Option<ThemeColor>,
    pub required: Option<DynFlag>,
    pub max_length: Option<usize>,
    pub read_only: bool,
}

pub fn build_text_field(config: TextFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.common.id)?;
    Ok(Field::Text(TextField {
        base: extract_common_fields(config.common),
        placeholder: config.placeholder,
        variant: config.variant,
        background_color: config.background_color.unwrap_or_default(),
        required: config.required,
        max_length: config.max_length,
        read_only: config.read_only,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct DateFieldConfig {
    pub common: CommonFieldConfig,
    pub placeholder: Option<FormText>,
    pub min_date: Option<DynValue<NaiveDate>>,
    pub max_date: Option<DynValue<NaiveDate>>,
    pub exclude_dates: Option<DynValue<Vec<NaiveDate>>>,
    pub background_color: Option<ThemeColor>,
    pub required: Option<DynFlag>,
}

pub fn build_date_field(config: DateFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.common.id)?;
    Ok(Field::Date(DateField {
        base: extract_common_fields(config.common),
        placeholder: config.placeholder,
        min_date: config.min_date,
        max_date: config.max_date,
        exclude_dates: config.exclude_dates,
        background_color: config.background_color.unwrap_or_default(),
        required: config.required,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct SelectFieldConfig {
    pub common: CommonFieldConfig,
    /// Literal list or option loader. Required.
    pub options: Option<DynValue<Vec<SelectOption>>>,
    pub placeholder: Option<FormText>,
    pub is_multi: bool,
    pub background_color: Option<ThemeColor>,
    pub required: Option<DynFlag>,
}

pub fn build_select_field(config: SelectFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.common.id)?;
    let options = config
        .options
        .ok_or_else(|| DefinitionError::MissingAttribute {
            field_id: config.common.id.clone(),
            attribute: "options",
        })?;
    Ok(Field::Select(SelectField {
        base: extract_common_fields(config.common),
        options,
        placeholder: config.placeholder,
        is_multi: config.is_multi,
        background_color: config.background_color.unwrap_or_default(),
        required: config.required,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct RadioFieldConfig {
    pub common: CommonFieldConfig,
    pub options: Option<DynValue<Vec<SelectOption>>>,
    /// Defaults to large buttons, matching the select-style kinds.
    pub large_buttons: Option<bool>,
    pub background_color: Option<ThemeColor>,
    pub required: Option<DynFlag>,
}

pub fn build_radio_field(config: RadioFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.common.id)?;
    let options = config
        .options
        .ok_or_else(|| DefinitionError::MissingAttribute {
            field_id: config.common.id.clone(),
            attribute: "options",
        })?;
    Ok(Field::Radio(RadioField {
        base: extract_common_fields(config.common),
        options,
        large_buttons: config.large_buttons.unwrap_or(true),
        background_color: config.background_color,
        required: config.required,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct CheckboxFieldConfig {
    pub common: CommonFieldConfig,
    pub options: Option<DynValue<Vec<SelectOption>>>,
    pub large: Option<bool>,
    pub strong: bool,
    pub background_color: Option<ThemeColor>,
    pub required: Option<DynFlag>,
}

pub fn build_checkbox_field(config: CheckboxFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.common.id)?;
    let options = config
        .options
        .ok_or_else(|| DefinitionError::MissingAttribute {
            field_id: config.common.id.clone(),
            attribute: "options",
        })?;
    Ok(Field::Checkbox(CheckboxField {
        base: extract_common_fields(config.common),
        options,
        large: config.large.unwrap_or(true),
        strong: config.strong,
        background_color: config.background_color.unwrap_or_default(),
        required: config.required,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct DescriptionFieldConfig {
    pub common: CommonFieldConfig,
    pub title_variant: TitleVariant,
    pub tooltip: Option<FormText>,
}

/// Display-only text block. Holds no answer unless explicitly opted in.
pub fn build_description_field(config: DescriptionFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.common.id)?;
    let mut common = config.common;
    common.does_not_require_answer = Some(common.does_not_require_answer.unwrap_or(true));
    Ok(Field::Description(DescriptionField {
        base: extract_common_fields(common),
        title_variant: config.title_variant,
        tooltip: config.tooltip,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct DividerFieldConfig {
    pub title: Option<FormText>,
    pub color: Option<ThemeColor>,
    pub condition: Option<Condition>,
}

/// Id-less pseudo-field; never participates in the answers document.
pub fn build_divider_field(config: DividerFieldConfig) -> Field {
    Field::Divider(DividerField {
        base: extract_common_fields(CommonFieldConfig {
            title: config.title.unwrap_or_default(),
            condition: config.condition,
            does_not_require_answer: Some(true),
            ..Default::default()
        }),
        color: config.color,
    })
}

#[derive(Debug, Clone, Default)]
pub struct KeyValueFieldConfig {
    pub label: FormText,
    pub value: FormText,
    pub width: Option<FieldWidth>,
    pub divider: bool,
    pub condition: Option<Condition>,
}

/// Id-less pseudo-field; never participates in the answers document.
pub fn build_key_value_field(config: KeyValueFieldConfig) -> Field {
    Field::KeyValue(KeyValueField {
        base: extract_common_fields(CommonFieldConfig {
            width: config.width,
            condition: config.condition,
            does_not_require_answer: Some(true),
            ..Default::default()
        }),
        label: config.label,
        value: config.value,
        divider: config.divider,
    })
}

#[derive(Debug, Clone, Default)]
pub struct CustomFieldConfig {
    pub common: CommonFieldConfig,
    /// Host-registered component name. Required.
    pub component_name: String,
    pub child_input_ids: Vec<String>,
    pub props: Map<String, Value>,
}

pub fn build_custom_field(config: CustomFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.common.id)?;
    if config.component_name.is_empty() {
        return Err(DefinitionError::MissingAttribute {
            field_id: config.common.id,
            attribute: "component_name",
        });
    }
    Ok(Field::Custom(CustomField {
        base: extract_common_fields(config.common),
        component_name: config.component_name,
        child_input_ids: config.child_input_ids,
        props: config.props,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct SubmitFieldConfig {
    pub id: String,
    pub title: FormText,
    pub placement: SubmitPlacement,
    /// At least one action is required.
    pub actions: Vec<CallToAction>,
    pub refetch_application_after_submit: bool,
}

pub fn build_submit_field(config: SubmitFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.id)?;
    if config.actions.is_empty() {
        return Err(DefinitionError::MissingAttribute {
            field_id: config.id,
            attribute: "actions",
        });
    }
    Ok(Field::Submit(SubmitField {
        base: extract_common_fields(CommonFieldConfig {
            id: config.id,
            title: config.title,
            does_not_require_answer: Some(true),
            ..Default::default()
        }),
        placement: config.placement,
        actions: config.actions,
        refetch_application_after_submit: config.refetch_application_after_submit,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct RepeaterFieldConfig {
    pub common: CommonFieldConfig,
    /// Child templates instantiated per row. Required.
    pub fields: Vec<Field>,
    pub row_title: Option<FormText>,
    pub row_title_numbering: RowTitleNumbering,
    pub add_item_button_text: Option<FormText>,
    pub remove_item_button_text: Option<FormText>,
    pub min_rows: Option<usize>,
    pub max_rows: Option<usize>,
}

pub fn build_repeater_field(config: RepeaterFieldConfig) -> Result<Field, DefinitionError> {
    require_answer_path(&config.common.id)?;
    let repeater_id = config.common.id.clone();
    if config.fields.is_empty() {
        return Err(DefinitionError::MissingAttribute {
            field_id: repeater_id,
            attribute: "fields",
        });
    }
    let mut seen = std::collections::HashSet::new();
    for child in &config.fields {
        let child_id = child.id();
        if child_id.is_empty() {
            continue;
        }
        if !seen.insert(child_id.to_string()) {
            return Err(DefinitionError::DuplicateSiblingId {
                parent_id: repeater_id,
                child_id: child_id.to_string(),
            });
        }
    }
    let min_rows = config.min_rows.unwrap_or(1);
    if let Some(max_rows) = config.max_rows {
        if min_rows > max_rows {
            return Err(DefinitionError::InvalidRowBounds {
                field_id: repeater_id,
                min_rows,
                max_rows,
            });
        }
    }
    Ok(Field::Repeater(RepeaterField {
        base: extract_common_fields(config.common),
        fields: config.fields,
        row_title: config.row_title,
        row_title_numbering: config.row_title_numbering,
        add_item_button_text: config
            .add_item_button_text
            .unwrap_or_else(|| Message::new("core.buttonAdd").into()),
        remove_item_button_text: config
            .remove_item_button_text
            .unwrap_or_else(|| Message::new("core.buttonRemove").into()),
        min_rows,
        max_rows: config.max_rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn common(id: &str) -> CommonFieldConfig {
        CommonFieldConfig {
            id: id.to_string(),
            title: "Title".into(),
            description: Some("A description".into()),
            condition: Some(Condition::Static(true)),
            default_value: Some(json!("x")),
            ..Default::default()
        }
    }

    mod purity {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_building_twice_yields_equal_descriptors() {
            let build = || {
                build_text_field(TextFieldConfig {
                    common: common("applicant.name"),
                    max_length: Some(64),
                    ..Default::default()
                })
                .expect("build")
            };
            assert_eq!(build(), build());
        }

        #[test]
        fn test_select_purity_with_literal_options() {
            let build = || {
                build_select_field(SelectFieldConfig {
                    common: common("employer"),
                    options: Some(vec![SelectOption::new("Yes", "yes")].into()),
                    ..Default::default()
                })
                .expect("build")
            };
            assert_eq!(build(), build());
        }
    }

    mod defaults {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_omitted_width_defaults_to_full() {
            let field = build_text_field(TextFieldConfig {
                common: common("a"),
                ..Default::default()
            })
            .expect("build");
            assert_eq!(field.base().width, FieldWidth::Full);
        }

        #[test]
        fn test_omitted_required_stays_unset() {
            let field = build_text_field(TextFieldConfig {
                common: common("a"),
                ..Default::default()
            })
            .expect("build");
            assert!(field.required().is_none());
        }

        #[test]
        fn test_background_color_defaults_to_blue() {
            let field = build_text_field(TextFieldConfig {
                common: common("a"),
                ..Default::default()
            })
            .expect("build");
            match field {
                Field::Text(f) => assert_eq!(f.background_color, ThemeColor::Blue),
                _ => unreachable!(),
            }
        }

        #[test]
        fn test_radio_background_has_no_default() {
            let field = build_radio_field(RadioFieldConfig {
                common: common("a"),
                options: Some(vec![SelectOption::new("Yes", "yes")].into()),
                ..Default::default()
            })
            .expect("build");
            match field {
                Field::Radio(f) => {
                    assert_eq!(f.background_color, None);
                    assert!(f.large_buttons);
                }
                _ => unreachable!(),
            }
        }

        #[test]
        fn test_checkbox_large_defaults_true_strong_false() {
            let field = build_checkbox_field(CheckboxFieldConfig {
                common: common("a"),
                options: Some(vec![SelectOption::new("Yes", "yes")].into()),
                ..Default::default()
            })
            .expect("build");
            match field {
                Field::Checkbox(f) => {
                    assert!(f.large);
                    assert!(!f.strong);
                }
                _ => unreachable!(),
            }
        }

        #[test]
        fn test_repeater_row_bounds_and_button_defaults() {
            let field = build_repeater_field(RepeaterFieldConfig {
                common: common("periods"),
                fields: vec![build_text_field(TextFieldConfig {
                    common: CommonFieldConfig {
                        id: "endDate".to_string(),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .expect("child")],
                ..Default::default()
            })
            .expect("build");
            match field {
                Field::Repeater(f) => {
                    assert_eq!(f.min_rows, 1);
                    assert_eq!(f.max_rows, None);
                    assert_eq!(
                        f.add_item_button_text,
                        FormText::Message(Message::new("core.buttonAdd"))
                    );
                    assert_eq!(
                        f.remove_item_button_text,
                        FormText::Message(Message::new("core.buttonRemove"))
                    );
                }
                _ => unreachable!(),
            }
        }
    }

    mod shared_defaulting {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_base_attributes_identical_across_kinds() {
            let text = build_text_field(TextFieldConfig {
                common: common("same.id"),
                ..Default::default()
            })
            .expect("text");
            let date = build_date_field(DateFieldConfig {
                common: common("same.id"),
                ..Default::default()
            })
            .expect("date");
            let select = build_select_field(SelectFieldConfig {
                common: common("same.id"),
                options: Some(vec![].into()),
                ..Default::default()
            })
            .expect("select");
            assert_eq!(text.base(), date.base());
            assert_eq!(text.base(), select.base());
        }
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_id_is_rejected() {
            let err = build_text_field(TextFieldConfig::default()).expect_err("should fail");
            assert!(matches!(err, DefinitionError::EmptyFieldId));
        }

        #[test]
        fn test_unparseable_id_is_rejected() {
            let err = build_text_field(TextFieldConfig {
                common: common("bad..path"),
                ..Default::default()
            })
            .expect_err("should fail");
            assert!(matches!(err, DefinitionError::InvalidFieldId { .. }));
        }

        #[test]
        fn test_select_without_options_is_rejected() {
            let err = build_select_field(SelectFieldConfig {
                common: common("employer"),
                ..Default::default()
            })
            .expect_err("should fail");
            match err {
                DefinitionError::MissingAttribute {
                    field_id,
                    attribute,
                } => {
                    assert_eq!(field_id, "employer");
                    assert_eq!(attribute, "options");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_submit_without_actions_is_rejected() {
            let err = build_submit_field(SubmitFieldConfig {
                id: "submit".to_string(),
                title: "Submit".into(),
                ..Default::default()
            })
            .expect_err("should fail");
            assert!(matches!(
                err,
                DefinitionError::MissingAttribute {
                    attribute: "actions",
                    ..
                }
            ));
        }

        #[test]
        fn test_repeater_without_children_is_rejected() {
            let err = build_repeater_field(RepeaterFieldConfig {
                common: common("periods"),
                ..Default::default()
            })
            .expect_err("should fail");
            assert!(matches!(
                err,
                DefinitionError::MissingAttribute {
                    attribute: "fields",
                    ..
                }
            ));
        }

        #[test]
        fn test_repeater_duplicate_child_ids_rejected() {
            let child = || {
                build_text_field(TextFieldConfig {
                    common: CommonFieldConfig {
                        id: "endDate".to_string(),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .expect("child")
            };
            let err = build_repeater_field(RepeaterFieldConfig {
                common: common("periods"),
                fields: vec![child(), child()],
                ..Default::default()
            })
            .expect_err("should fail");
            assert!(matches!(err, DefinitionError::DuplicateSiblingId { .. }));
        }

        #[test]
        fn test_repeater_contradictory_bounds_rejected() {
            let err = build_repeater_field(RepeaterFieldConfig {
                common: common("periods"),
                fields: vec![build_divider_field(Default::default())],
                min_rows: Some(3),
                max_rows: Some(2),
                ..Default::default()
            })
            .expect_err("should fail");
            assert!(matches!(err, DefinitionError::InvalidRowBounds { .. }));
        }

        #[test]
        fn test_custom_field_needs_component_name() {
            let err = build_custom_field(CustomFieldConfig {
                common: common("usage"),
                ..Default::default()
            })
            .expect_err("should fail");
            assert!(matches!(
                err,
                DefinitionError::MissingAttribute {
                    attribute: "component_name",
                    ..
                }
            ));
        }
    }

    mod pseudo_fields {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_divider_has_empty_id_and_no_answer() {
            let field = build_divider_field(DividerFieldConfig {
                color: Some(ThemeColor::Purple),
                ..Default::default()
            });
            assert_eq!(field.id(), "");
            assert!(field.base().does_not_require_answer);
            assert!(!field.requires_answer());
        }

        #[test]
        fn test_key_value_has_empty_id_and_no_answer() {
            let field = build_key_value_field(KeyValueFieldConfig {
                label: "Name".into(),
                value: "Jónína".into(),
                ..Default::default()
            });
            assert_eq!(field.id(), "");
            assert!(!field.requires_answer());
        }

        #[test]
        fn test_description_defaults_to_no_answer() {
            let field = build_description_field(DescriptionFieldConfig {
                common: common("intro"),
                ..Default::default()
            })
            .expect("build");
            assert!(field.base().does_not_require_answer);
        }

        #[test]
        fn test_description_explicit_opt_in_preserved() {
            let mut config = common("intro");
            config.does_not_require_answer = Some(false);
            let field = build_description_field(DescriptionFieldConfig {
                common: config,
                ..Default::default()
            })
            .expect("build");
            assert!(!field.base().does_not_require_answer);
        }

        #[test]
        fn test_submit_never_requires_answer() {
            let field = build_submit_field(SubmitFieldConfig {
                id: "submit".to_string(),
                title: "Submit".into(),
                actions: vec![CallToAction::new("SUBMIT", "Send in", Default::default())],
                ..Default::default()
            })
            .expect("build");
            assert!(!field.requires_answer());
        }
    }
}
