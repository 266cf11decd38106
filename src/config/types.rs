use serde::{Deserialize, Serialize};

/// Root of an option definition file.
///
/// ```toml
/// [[option]]
/// name = "numbers"
/// default = 666
/// validate = "positive"
/// filter = "even"
/// invalid = "default"
/// ```
///
/// Method names resolve against the builtin [`MethodTable`](crate::options::MethodTable)
/// unless the caller supplies its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionFile {
    /// Option definitions in registration order.
    #[serde(default, rename = "option")]
    pub options: Vec<OptionDefinition>,
}

/// Declarative definition of one option.
///
/// Hooks are method names resolved against the registry's method table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionDefinition {
    /// Option name, unique within the file.
    pub name: String,
    /// Default value (any TOML value except tables).
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Invalid value policy: "raise" or "default".
    #[serde(default = "default_invalid")]
    pub invalid: String,
    /// Validator method name.
    #[serde(default)]
    pub validate: Option<String>,
    /// Element filter method name.
    #[serde(default)]
    pub filter: Option<String>,
    /// Element transform method name.
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(default)]
    pub incremental: bool,
    /// Store a block passed without arguments as the value.
    #[serde(default)]
    pub allow_block: bool,
}

fn default_invalid() -> String {
    "raise".to_string()
}

impl OptionDefinition {
    /// A definition with only a name; everything else at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            invalid: default_invalid(),
            validate: None,
            filter: None,
            transform: None,
            incremental: false,
            allow_block: false,
        }
    }
}
