//! Form composition model
//!
//! Assembles sections, subsections, fields, and data providers into one
//! ordered tree per form definition. `build_form` is the registration
//! step: it validates node identity once, and the resulting tree is
//! read-only configuration from then on.

use crate::application::Application;
use crate::error::DefinitionError;
use crate::fields::Field;
use crate::provider::DataProviderItem;
use crate::resolve::{Condition, FormText};
use std::collections::HashSet;

/// A leaf of the composition tree: a field or an external-data screen.
#[derive(Debug, Clone, PartialEq)]
pub enum FormLeaf {
    Field(Field),
    ExternalData(ExternalDataGroup),
}

impl From<Field> for FormLeaf {
    fn from(value: Field) -> Self {
        Self::Field(value)
    }
}

impl From<ExternalDataGroup> for FormLeaf {
    fn from(value: ExternalDataGroup) -> Self {
        Self::ExternalData(value)
    }
}

/// Direct child of a section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionChild {
    SubSection(SubSection),
    Leaf(FormLeaf),
}

impl From<SubSection> for SectionChild {
    fn from(value: SubSection) -> Self {
        Self::SubSection(value)
    }
}

impl From<Field> for SectionChild {
    fn from(value: Field) -> Self {
        Self::Leaf(FormLeaf::Field(value))
    }
}

impl From<ExternalDataGroup> for SectionChild {
    fn from(value: ExternalDataGroup) -> Self {
        Self::Leaf(FormLeaf::ExternalData(value))
    }
}

/// Approval screen listing the external data a form will fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalDataGroup {
    pub id: String,
    pub title: FormText,
    pub providers: Vec<DataProviderItem>,
}

/// Named, ordered grouping of leaves below a section.
#[derive(Debug, Clone, PartialEq)]
pub struct SubSection {
    pub id: String,
    pub title: FormText,
    pub condition: Option<Condition>,
    pub children: Vec<FormLeaf>,
}

impl SubSection {
    pub fn is_visible(&self, application: &Application) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.evaluate(application))
    }
}

/// Top-level navigation grouping of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: FormText,
    pub condition: Option<Condition>,
    pub children: Vec<SectionChild>,
}

impl Section {
    pub fn is_visible(&self, application: &Application) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.evaluate(application))
    }
}

/// A registered form definition: the immutable descriptor tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub id: String,
    pub title: FormText,
    pub children: Vec<Section>,
}

impl Form {
    pub fn sections(&self) -> &[Section] {
        &self.children
    }

    /// All field leaves in document order, ignoring conditions.
    pub fn fields(&self) -> Vec<&Field> {
        let mut fields = Vec::new();
        self.for_each_leaf(|leaf| {
            if let FormLeaf::Field(field) = leaf {
                fields.push(field);
            }
        });
        fields
    }

    /// All data provider items in document order.
    pub fn data_providers(&self) -> Vec<&DataProviderItem> {
        let mut providers = Vec::new();
        self.for_each_leaf(|leaf| {
            if let FormLeaf::ExternalData(group) = leaf {
                providers.extend(group.providers.iter());
            }
        });
        providers
    }

    fn for_each_leaf<'a>(&'a self, mut visit: impl FnMut(&'a FormLeaf)) {
        for section in &self.children {
            for child in &section.children {
                match child {
                    SectionChild::Leaf(leaf) => visit(leaf),
                    SectionChild::SubSection(sub) => {
                        for leaf in &sub.children {
                            visit(leaf);
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SectionConfig {
    pub id: String,
    pub title: FormText,
    pub condition: Option<Condition>,
    pub children: Vec<SectionChild>,
}

pub fn build_section(config: SectionConfig) -> Section {
    Section {
        id: config.id,
        title: config.title,
        condition: config.condition,
        children: config.children,
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubSectionConfig {
    pub id: String,
    pub title: FormText,
    pub condition: Option<Condition>,
    pub children: Vec<FormLeaf>,
}

pub fn build_sub_section(config: SubSectionConfig) -> SubSection {
    SubSection {
        id: config.id,
        title: config.title,
        condition: config.condition,
        children: config.children,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExternalDataGroupConfig {
    pub id: String,
    pub title: FormText,
    pub providers: Vec<DataProviderItem>,
}

pub fn build_external_data_provider(config: ExternalDataGroupConfig) -> ExternalDataGroup {
    ExternalDataGroup {
        id: config.id,
        title: config.title,
        providers: config.providers,
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    pub id: String,
    pub title: FormText,
    pub children: Vec<Section>,
}

/// The one-time registration step. Validates identity across the tree:
/// sibling ids unique within their parent, field ids and provider ids
/// unique across the whole form. Failures prevent the form from being
/// served.
pub fn build_form(config: FormConfig) -> Result<Form, DefinitionError> {
    let form = Form {
        id: config.id,
        title: config.title,
        children: config.children,
    };
    validate_sibling_ids(&form)?;
    validate_field_ids(&form)?;
    validate_provider_ids(&form)?;
    Ok(form)
}

fn duplicate(parent_id: &str, child_id: &str) -> DefinitionError {
    DefinitionError::DuplicateSiblingId {
        parent_id: parent_id.to_string(),
        child_id: child_id.to_string(),
    }
}

fn validate_sibling_ids(form: &Form) -> Result<(), DefinitionError> {
    let mut section_ids = HashSet::new();
    for section in &form.children {
        if !section_ids.insert(section.id.as_str()) {
            return Err(duplicate(&form.id, &section.id));
        }
        let mut child_ids = HashSet::new();
        for child in &section.children {
            let child_id = match child {
                SectionChild::SubSection(sub) => sub.id.as_str(),
                SectionChild::Leaf(FormLeaf::ExternalData(group)) => group.id.as_str(),
                SectionChild::Leaf(FormLeaf::Field(field)) => field.id(),
            };
            if child_id.is_empty() {
                continue;
            }
            if !child_ids.insert(child_id) {
                return Err(duplicate(&section.id, child_id));
            }
        }
    }
    Ok(())
}

fn validate_field_ids(form: &Form) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();
    for field in form.fields() {
        let id = field.id();
        if id.is_empty() {
            continue;
        }
        if !seen.insert(id) {
            return Err(DefinitionError::DuplicateFieldId {
                form_id: form.id.clone(),
                field_id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_provider_ids(form: &Form) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();
    for provider in form.data_providers() {
        if !seen.insert(provider.id.as_str()) {
            return Err(DefinitionError::DuplicateProviderId {
                form_id: form.id.clone(),
                provider_id: provider.id.clone(),
            });
        }
    }
    Ok(())
}
