//! Configuration & Permission Filter
//!
//! A [`Configuration`] is the per-session allow-list. Only actions explicitly
//! set to `true` are granted; anything absent, `false`, or not a boolean is
//! denied. Unknown category and action keys are ignored so newer
//! configurations still load on older builds.
//!
//! ```json
//! {
//!   "actions": { "products": { "create": true }, "prices": { "create": true } },
//!   "context": { "account": "acct_123" }
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalogue::{Action, Catalogue, Category};
use crate::error::{Result, ToolkitError};

/// Session-scoped state threaded into every dispatched call
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Connected account the provider calls act on behalf of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl Context {
    pub fn for_account(account: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
        }
    }
}

/// Declarative allow-list plus optional tenant context
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// `category -> {action -> flag}`, kept raw so unknown keys and
    /// unexpected value shapes never fail parsing
    #[serde(default, deserialize_with = "null_as_empty")]
    pub actions: BTreeMap<String, Value>,

    /// Tenant scoping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

impl Configuration {
    /// Empty configuration (grants nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant one action on one category
    #[must_use]
    pub fn allow(mut self, category: Category, action: Action) -> Self {
        let entry = self
            .actions
            .entry(category.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        entry[action.as_str()] = Value::Bool(true);
        self
    }

    /// Scope provider calls to a connected account
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.context = Some(Context::for_account(account));
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ToolkitError::Config(format!("invalid configuration: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ToolkitError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Context to thread into calls (empty when none was configured)
    pub fn context(&self) -> Context {
        self.context.clone().unwrap_or_default()
    }

    /// Resolve the raw allow-list into granted `(category, action)` pairs
    pub fn permissions(&self) -> Permissions {
        let mut granted = HashSet::new();

        for (category_key, actions) in &self.actions {
            let Some(category) = Category::from_key(category_key) else {
                tracing::debug!(category = %category_key, "Ignoring unknown category in configuration");
                continue;
            };

            let Some(actions) = actions.as_object() else {
                tracing::debug!(category = %category_key, "Ignoring non-object category entry in configuration");
                continue;
            };

            for (action_key, flag) in actions {
                if flag.as_bool() != Some(true) {
                    if !flag.is_boolean() {
                        tracing::debug!(
                            category = %category_key,
                            action = %action_key,
                            "Ignoring non-boolean action flag in configuration"
                        );
                    }
                    continue;
                }
                for action in Action::from_key(action_key) {
                    granted.insert((category, *action));
                }
            }
        }

        Permissions { granted }
    }
}

/// `null` reads as an empty allow-list
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Resolved set of granted permissions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Permissions {
    granted: HashSet<(Category, Action)>,
}

impl Permissions {
    pub fn allows(&self, category: Category, action: Action) -> bool {
        self.granted.contains(&(category, action))
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

/// Subset of `catalogue` the configuration allows, in catalogue order.
///
/// Deny by default: an empty configuration yields an empty catalogue.
pub fn filter(catalogue: &Catalogue, configuration: &Configuration) -> Catalogue {
    let permissions = configuration.permissions();

    let allowed = catalogue
        .iter()
        .filter(|d| permissions.allows(d.category, d.action))
        .cloned()
        .collect();

    Catalogue::from_descriptors(allowed)
}
