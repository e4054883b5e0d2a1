//! Builder engine
//!
//! Every operation takes the current [`BuilderState`] by reference and
//! returns a new one. Stale references (unknown field ids, out-of-range
//! indices) are absorbed as no-ops; only step navigation can fail.

mod session;

pub use session::{BuilderSession, HISTORY_LIMIT};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FormsError, Result};
use crate::schema::ids::{derive_field_name, generate_field_id, step_id_for};
use crate::schema::registry::{default_template, FieldTemplate};
use crate::schema::{FieldContainer, FieldDefinition, FormDefinition, StepDefinition};

/// Definition under edit plus the step the editor is looking at
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderState {
    pub definition: FormDefinition,
    pub active_step: usize,
}

impl BuilderState {
    pub fn new(definition: FormDefinition) -> Self {
        Self {
            definition,
            active_step: 0,
        }
    }

    /// Fields of the container the editor is working on
    pub fn active_fields(&self) -> &[FieldDefinition] {
        self.definition.active_fields(self.active_step)
    }
}

/// Partial update applied to a field; id, name and type are not patchable
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPatch {
    pub field_label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub validation: Option<String>,
    pub options: Option<Vec<String>>,
}

impl FieldPatch {
    fn apply_to(&self, field: &mut FieldDefinition) {
        if let Some(label) = &self.field_label {
            field.field_label = label.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            field.placeholder = placeholder.clone();
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(validation) = &self.validation {
            field.validation = validation.clone();
        }
        if let Some(options) = &self.options {
            field.options = options.clone();
        }
    }
}

/// One editor command, as sent by the builder UI
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum BuilderOp {
    #[serde(rename_all = "camelCase")]
    InsertField {
        template: FieldTemplate,
        #[serde(default)]
        at_index: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveField { field_id: String },
    #[serde(rename_all = "camelCase")]
    ReorderField { from_index: usize, to_index: usize },
    #[serde(rename_all = "camelCase")]
    UpdateField { field_id: String, patch: FieldPatch },
    SetActiveStep { index: usize },
    NextStep,
    PreviousStep,
    ConvertToMultiStep,
    ConvertToSingleStep,
}

/// Apply one operation
pub fn apply(state: &BuilderState, op: &BuilderOp) -> Result<BuilderState> {
    debug!(op = ?op, active_step = state.active_step, "Applying builder operation");
    let next = match op {
        BuilderOp::InsertField { template, at_index } => insert_field(state, template, *at_index),
        BuilderOp::RemoveField { field_id } => remove_field(state, field_id),
        BuilderOp::ReorderField {
            from_index,
            to_index,
        } => reorder_field(state, *from_index, *to_index),
        BuilderOp::UpdateField { field_id, patch } => update_field(state, field_id, patch),
        BuilderOp::SetActiveStep { index } => set_active_step(state, *index)?,
        BuilderOp::NextStep => next_step(state),
        BuilderOp::PreviousStep => previous_step(state),
        BuilderOp::ConvertToMultiStep => convert_to_multi_step(state),
        BuilderOp::ConvertToSingleStep => convert_to_single_step(state),
    };
    Ok(next)
}

/// Fill a bare `{fieldType}` template from the palette defaults
fn resolve_template(template: &FieldTemplate) -> FieldTemplate {
    if template.field_label.trim().is_empty() {
        if let Some(defaults) = default_template(&template.field_type) {
            return defaults;
        }
    }
    template.clone()
}

/// Create a field from a template and insert it into the active container
///
/// `at` is clamped to the container length; `None` appends.
pub fn insert_field(state: &BuilderState, template: &FieldTemplate, at: Option<usize>) -> BuilderState {
    let template = resolve_template(template);
    let field_id = generate_field_id();
    let field_name = Some(derive_field_name(&template.field_label))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| field_id.clone());
    let field = FieldDefinition {
        field_id,
        field_type: template.field_type,
        field_name,
        field_label: template.field_label,
        placeholder: template.placeholder,
        required: template.required,
        validation: template.validation,
        options: template.options,
    };

    let mut next = state.clone();
    if let Some(fields) = next.definition.active_fields_mut(next.active_step) {
        let index = at.unwrap_or(fields.len()).min(fields.len());
        fields.insert(index, field);
    }
    next
}

/// Remove a field from the active container; unknown ids are a no-op
pub fn remove_field(state: &BuilderState, field_id: &str) -> BuilderState {
    let mut next = state.clone();
    if let Some(fields) = next.definition.active_fields_mut(next.active_step) {
        fields.retain(|f| f.field_id != field_id);
    }
    next
}

/// Move the field at `from` using remove-then-insert semantics
///
/// When `from < to` the insert point is `to - 1` after removal. `to` may
/// equal the container length (drop past the last field).
pub fn reorder_field(state: &BuilderState, from: usize, to: usize) -> BuilderState {
    let len = state.active_fields().len();
    if from == to || from >= len || to > len {
        return state.clone();
    }
    let mut next = state.clone();
    if let Some(fields) = next.definition.active_fields_mut(next.active_step) {
        let moved = fields.remove(from);
        let insert_at = if from < to { to - 1 } else { to };
        fields.insert(insert_at.min(fields.len()), moved);
    }
    next
}

/// Merge a patch onto the field with `field_id`, wherever it lives in the form
///
/// Unlike [`remove_field`], the lookup spans every step: field ids are unique
/// across the form, so a patch cannot hit the wrong field, and the properties
/// panel may still hold a field from a step the editor has navigated away from.
pub fn update_field(state: &BuilderState, field_id: &str, patch: &FieldPatch) -> BuilderState {
    let mut next = state.clone();
    let field = match &mut next.definition.container {
        FieldContainer::Flat(fields) => fields.iter_mut().find(|f| f.field_id == field_id),
        FieldContainer::Stepped(steps) => steps
            .iter_mut()
            .flat_map(|s| s.form_fields.iter_mut())
            .find(|f| f.field_id == field_id),
    };
    if let Some(field) = field {
        patch.apply_to(field);
    }
    next
}

/// Jump to a step; out-of-range indices are rejected
pub fn set_active_step(state: &BuilderState, index: usize) -> Result<BuilderState> {
    let step_count = state.definition.step_count();
    if index >= step_count || (!state.definition.is_multi_step() && index != 0) {
        return Err(FormsError::InvalidStep { index, step_count });
    }
    Ok(BuilderState {
        definition: state.definition.clone(),
        active_step: index,
    })
}

pub fn next_step(state: &BuilderState) -> BuilderState {
    let last = state.definition.step_count().saturating_sub(1);
    BuilderState {
        definition: state.definition.clone(),
        active_step: (state.active_step + 1).min(last),
    }
}

pub fn previous_step(state: &BuilderState) -> BuilderState {
    BuilderState {
        definition: state.definition.clone(),
        active_step: state.active_step.saturating_sub(1),
    }
}

/// Wrap the flat field list in a single step
pub fn convert_to_multi_step(state: &BuilderState) -> BuilderState {
    let fields = match &state.definition.container {
        FieldContainer::Stepped(_) => return state.clone(),
        FieldContainer::Flat(fields) => fields.clone(),
    };
    BuilderState {
        definition: FormDefinition {
            form_title: state.definition.form_title.clone(),
            form_subheading: state.definition.form_subheading.clone(),
            container: FieldContainer::Stepped(vec![StepDefinition {
                step_id: step_id_for(0),
                step_title: "Step 1".into(),
                step_description: String::new(),
                form_fields: fields,
            }]),
        },
        active_step: 0,
    }
}

/// Concatenate every step's fields into one flat list
pub fn convert_to_single_step(state: &BuilderState) -> BuilderState {
    let steps = match &state.definition.container {
        FieldContainer::Flat(_) => return state.clone(),
        FieldContainer::Stepped(steps) => steps,
    };
    let fields = steps
        .iter()
        .flat_map(|s| s.form_fields.iter().cloned())
        .collect();
    BuilderState {
        definition: FormDefinition {
            form_title: state.definition.form_title.clone(),
            form_subheading: state.definition.form_subheading.clone(),
            container: FieldContainer::Flat(fields),
        },
        active_step: 0,
    }
}
