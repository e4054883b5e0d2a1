//! Form schema: model, normalizer, field registry and renderer

pub mod ids;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod render;

pub use ids::{derive_field_name, generate_field_id};
pub use model::{FieldContainer, FieldDefinition, FieldType, FormDefinition, StepDefinition};
pub use normalize::{normalize, DEFAULT_FORM_TITLE};
pub use registry::{
    default_template, options_applicable, palette, resolve, resolve_field, FieldTemplate,
    PaletteEntry, RenderKind,
};
pub use render::{display_value, render_field, render_form, Control, RenderedField, RenderedForm};
