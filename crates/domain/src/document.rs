//! The assistant's JSON configuration document.
//!
//! Only a small slice of the document is owned here: the `$schema` marker,
//! the default `model` reference, and `provider.azure`. Every other key is
//! carried through load, merge, and save untouched.

use crate::{Credential, EndpointDescriptor};
use azure_setup_shared::SecretString;
use serde_json::{Map, Value, json};

/// Schema marker written at the top of the document.
pub const SCHEMA_URL: &str = "https://opencode.ai/config.json";

/// Key of the owned provider entry under `provider`.
pub const PROVIDER_NAME: &str = "azure";

/// SDK package the assistant loads for the provider.
pub const PROVIDER_PACKAGE: &str = "@ai-sdk/azure";

/// Human-readable provider label.
pub const PROVIDER_DISPLAY_NAME: &str = "Azure OpenAI";

const KEY_SCHEMA: &str = "$schema";
const KEY_MODEL: &str = "model";
const KEY_PROVIDER: &str = "provider";
const KEY_OPTIONS: &str = "options";
const KEY_MODELS: &str = "models";

/// Provider settings found in an existing document.
///
/// Every field is optional: hand-edited documents may carry any subset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderSettings {
    /// `options.baseURL`.
    pub base_url: Option<Box<str>>,
    /// `options.apiKey`.
    pub api_key: Option<SecretString>,
    /// `options.apiVersion`.
    pub api_version: Option<Box<str>>,
    /// First key of `models`.
    pub deployment: Option<Box<str>>,
}

impl ProviderSettings {
    /// Stored credential, if a non-blank key is present.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.api_key
            .as_ref()
            .and_then(|key| Credential::new(key.expose()).ok())
    }
}

/// Open-ended JSON object holding the assistant configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    /// An empty document.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap a parsed JSON value. Returns `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    /// Borrow the underlying object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Consume into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Returns true when the document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Settings of the owned provider entry.
    ///
    /// Returns `None` when `provider.azure.options` is absent or not an object.
    #[must_use]
    pub fn provider_settings(&self) -> Option<ProviderSettings> {
        let entry = self
            .root
            .get(KEY_PROVIDER)?
            .as_object()?
            .get(PROVIDER_NAME)?
            .as_object()?;
        let options = entry.get(KEY_OPTIONS)?.as_object()?;

        let text = |key: &str| {
            options
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let deployment = entry
            .get(KEY_MODELS)
            .and_then(Value::as_object)
            .and_then(|models| models.keys().next())
            .filter(|name| !name.trim().is_empty())
            .map(|name| Box::from(name.as_str()));

        Some(ProviderSettings {
            base_url: text("baseURL").map(Box::from),
            api_key: text("apiKey").map(SecretString::from),
            api_version: text("apiVersion").map(Box::from),
            deployment,
        })
    }

    /// Write `endpoint` and `credential` into the owned slice.
    ///
    /// `options` and `models` are replaced wholesale. `npm` and `name` are
    /// only filled in when missing. Sibling providers and unrelated keys are
    /// left as they were.
    pub fn merge(&mut self, endpoint: &EndpointDescriptor, credential: &Credential) {
        self.root
            .insert(KEY_SCHEMA.to_owned(), Value::from(SCHEMA_URL));
        self.root.insert(
            KEY_MODEL.to_owned(),
            Value::from(format!("{PROVIDER_NAME}/{}", endpoint.deployment())),
        );

        let providers = self.root.entry(KEY_PROVIDER).or_insert(Value::Null);
        edit_object(providers, |providers| {
            let entry = providers.entry(PROVIDER_NAME).or_insert(Value::Null);
            edit_object(entry, |entry| fill_provider_entry(entry, endpoint, credential));
        });
    }
}

fn fill_provider_entry(
    entry: &mut Map<String, Value>,
    endpoint: &EndpointDescriptor,
    credential: &Credential,
) {
    entry
        .entry("npm")
        .or_insert_with(|| Value::from(PROVIDER_PACKAGE));
    entry
        .entry("name")
        .or_insert_with(|| Value::from(PROVIDER_DISPLAY_NAME));
    entry.insert(
        KEY_OPTIONS.to_owned(),
        json!({
            "baseURL": endpoint.base_url(),
            "apiKey": credential.expose(),
            "apiVersion": endpoint.api_version(),
            "useDeploymentBasedUrls": true,
        }),
    );

    let mut models = Map::new();
    models.insert(
        endpoint.deployment().to_owned(),
        json!({ "name": endpoint.deployment() }),
    );
    entry.insert(KEY_MODELS.to_owned(), Value::Object(models));
}

// Edits the object in `slot` in place; any non-object value is replaced.
fn edit_object(slot: &mut Value, edit: impl FnOnce(&mut Map<String, Value>)) {
    let mut map = match std::mem::take(slot) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    edit(&mut map);
    *slot = Value::Object(map);
}
