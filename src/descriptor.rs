//! Declarative field metadata shared by the node and credential descriptors.
//!
//! Serialized as camelCase JSON so the host can render configuration forms.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Options,
}

/// Rendering hints for string fields.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub password: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionValue {
    pub name: &'static str,
    pub value: &'static str,
}

/// Show a field only when other fields hold one of the listed values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayOptions {
    pub show: BTreeMap<&'static str, Vec<&'static str>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionValue>,
    pub default: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_options: Option<DisplayOptions>,
    pub description: &'static str,
}

impl PropertyDescriptor {
    /// A plain string field with an empty default.
    pub fn string(display_name: &'static str, name: &'static str, description: &'static str) -> Self {
        Self {
            display_name,
            name,
            property_type: PropertyType::String,
            type_options: None,
            options: Vec::new(),
            default: "",
            required: false,
            display_options: None,
            description,
        }
    }

    /// A dropdown; the first option is the default unless overridden.
    pub fn options(
        display_name: &'static str,
        name: &'static str,
        options: Vec<OptionValue>,
        description: &'static str,
    ) -> Self {
        let default = options.first().map(|o| o.value).unwrap_or("");
        Self {
            property_type: PropertyType::Options,
            options,
            default,
            ..Self::string(display_name, name, description)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    pub fn with_type_options(mut self, type_options: TypeOptions) -> Self {
        self.type_options = Some(type_options);
        self
    }

    pub fn shown_when(mut self, field: &'static str, values: &[&'static str]) -> Self {
        self.display_options
            .get_or_insert_with(DisplayOptions::default)
            .show
            .insert(field, values.to_vec());
        self
    }
}
