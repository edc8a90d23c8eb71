//! Vineflower option map handling.
//!
//! The decompiler takes a flat map of short string keys to string values
//! (booleans are passed as "0"/"1"). Defaults are bundled with the binary as
//! a TOML resource; if that resource is malformed we fall back to a hardcoded
//! default set so the tool keeps working.
//!
//! Only the options we actually surface are named here. The full catalogue
//! lives in Vineflower's IFernflowerPreferences; add more keys as needed.

use std::collections::BTreeMap;

use tracing::warn;

/// Short option keys understood by Vineflower.
pub mod keys {
    // Core decompilation options
    pub const DECOMPILE_INNER: &str = "din";
    pub const DECOMPILE_GENERICS: &str = "dgs";
    pub const DECOMPILE_ASSERTIONS: &str = "das";
    pub const DECOMPILE_ENUMS: &str = "den";
    pub const DECOMPILE_PREVIEW: &str = "dpr";
    pub const SWITCH_EXPRESSIONS: &str = "swe";
    pub const PATTERN_MATCHING: &str = "pam";

    // Code quality options
    pub const USE_DEBUG_VAR_NAMES: &str = "udv";
    pub const USE_METHOD_PARAMETERS: &str = "ump";
    pub const REMOVE_EMPTY_RANGES: &str = "rer";
    pub const HIDE_EMPTY_SUPER: &str = "hes";
    pub const HIDE_DEFAULT_CONSTRUCTOR: &str = "hdc";

    // Formatting options
    pub const THREADS: &str = "thr";
    pub const INDENT_STRING: &str = "ind";
}

/// Bundled option defaults, compiled into the binary.
const DEFAULT_OPTIONS_RESOURCE: &str = include_str!("../../resources/default-options.toml");

/// Hardcoded fallback used when the bundled resource fails to parse.
const DEFAULT_OPTIONS: &[(&str, &str)] = &[
    (keys::DECOMPILE_INNER, "1"),
    (keys::DECOMPILE_GENERICS, "1"),
    (keys::DECOMPILE_ASSERTIONS, "1"),
    (keys::DECOMPILE_ENUMS, "1"),
    (keys::DECOMPILE_PREVIEW, "1"),
    (keys::SWITCH_EXPRESSIONS, "1"),
    (keys::PATTERN_MATCHING, "1"),
    (keys::USE_DEBUG_VAR_NAMES, "1"),
    (keys::USE_METHOD_PARAMETERS, "1"),
    (keys::REMOVE_EMPTY_RANGES, "1"),
    (keys::HIDE_EMPTY_SUPER, "1"),
    (keys::HIDE_DEFAULT_CONSTRUCTOR, "1"),
    (keys::INDENT_STRING, "   "),
];

/// Immutable option map handed to every task and to the external adapter.
///
/// Keys iterate in a stable order so the external command line is
/// reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompilerOptions {
    values: BTreeMap<String, String>,
}

impl DecompilerOptions {
    /// Load the bundled defaults, falling back to [`DEFAULT_OPTIONS`] when the
    /// resource does not parse.
    pub fn defaults() -> Self {
        match toml::from_str::<BTreeMap<String, String>>(DEFAULT_OPTIONS_RESOURCE) {
            Ok(values) => Self { values },
            Err(e) => {
                warn!("bundled default-options resource is invalid ({e}), using built-in defaults");
                Self::built_in()
            }
        }
    }

    /// The hardcoded fallback set.
    pub fn built_in() -> Self {
        let values = DEFAULT_OPTIONS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder with typed setters over the raw option map.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    options: DecompilerOptions,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsBuilder {
    /// Start from the bundled defaults.
    pub fn new() -> Self {
        Self {
            options: DecompilerOptions::defaults(),
        }
    }

    /// Set a raw key/value pair, overriding any default.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.values.insert(key.into(), value.into());
        self
    }

    fn with_flag(self, key: &str, enable: bool) -> Self {
        self.with_option(key, if enable { "1" } else { "0" })
    }

    pub fn with_inner_classes(self, enable: bool) -> Self {
        self.with_flag(keys::DECOMPILE_INNER, enable)
    }

    pub fn with_generics(self, enable: bool) -> Self {
        self.with_flag(keys::DECOMPILE_GENERICS, enable)
    }

    pub fn with_assertions(self, enable: bool) -> Self {
        self.with_flag(keys::DECOMPILE_ASSERTIONS, enable)
    }

    pub fn with_enums(self, enable: bool) -> Self {
        self.with_flag(keys::DECOMPILE_ENUMS, enable)
    }

    pub fn with_preview_features(self, enable: bool) -> Self {
        self.with_flag(keys::DECOMPILE_PREVIEW, enable)
    }

    pub fn with_switch_expressions(self, enable: bool) -> Self {
        self.with_flag(keys::SWITCH_EXPRESSIONS, enable)
    }

    pub fn with_pattern_matching(self, enable: bool) -> Self {
        self.with_flag(keys::PATTERN_MATCHING, enable)
    }

    pub fn with_local_var_names(self, enable: bool) -> Self {
        self.with_flag(keys::USE_DEBUG_VAR_NAMES, enable)
    }

    pub fn with_method_params(self, enable: bool) -> Self {
        self.with_flag(keys::USE_METHOD_PARAMETERS, enable)
    }

    pub fn with_remove_empty_try_catch(self, enable: bool) -> Self {
        self.with_flag(keys::REMOVE_EMPTY_RANGES, enable)
    }

    pub fn with_hide_empty_super(self, enable: bool) -> Self {
        self.with_flag(keys::HIDE_EMPTY_SUPER, enable)
    }

    pub fn with_hide_default_constructor(self, enable: bool) -> Self {
        self.with_flag(keys::HIDE_DEFAULT_CONSTRUCTOR, enable)
    }

    /// Tell the decompiler itself how many threads it may use internally.
    /// Ignored when `thread_count` is zero.
    pub fn with_threads(self, thread_count: usize) -> Self {
        if thread_count > 0 {
            self.with_option(keys::THREADS, thread_count.to_string())
        } else {
            self
        }
    }

    pub fn with_indent(self, indent: impl Into<String>) -> Self {
        self.with_option(keys::INDENT_STRING, indent)
    }

    pub fn build(self) -> DecompilerOptions {
        self.options
    }
}
