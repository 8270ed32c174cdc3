use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    #[default]
    Bare,
    Function,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImportOrder {
    #[default]
    Discovery,
    Reverse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wrap: WrapMode,

    #[serde(default)]
    pub import_order: ImportOrder,

    #[serde(default)]
    pub dedupe_includes: bool,

    #[serde(default = "default_true")]
    pub normalize_newlines: bool,

    #[serde(default = "default_true")]
    pub escape_literals: bool,

    #[serde(default = "default_output_call")]
    pub output_call: String,

    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default = "default_target_extension")]
    pub target_extension: String,

    /// Names the `.Value` accessor rule is limited to. Empty means any
    /// identifier called with a single string key.
    #[serde(default)]
    pub record_accessors: Vec<String>,

    #[serde(default = "default_lookup_prefix")]
    pub lookup_prefix: String,

    #[serde(default = "default_lookup_index")]
    pub lookup_index: String,
}

fn default_true() -> bool {
    true
}
fn default_output_call() -> String {
    "Response.Write".to_string()
}
fn default_source_extension() -> String {
    "asp".to_string()
}
fn default_target_extension() -> String {
    "ts".to_string()
}
fn default_lookup_prefix() -> String {
    "l_".to_string()
}
fn default_lookup_index() -> String {
    "p_lan".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            wrap: WrapMode::Bare,
            import_order: ImportOrder::Discovery,
            dedupe_includes: false,
            normalize_newlines: true,
            escape_literals: true,
            output_call: default_output_call(),
            source_extension: default_source_extension(),
            target_extension: default_target_extension(),
            record_accessors: Vec::new(),
            lookup_prefix: default_lookup_prefix(),
            lookup_index: default_lookup_index(),
        }
    }
}
