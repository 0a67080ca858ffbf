//! Raw YAML table structures
//!
//! These mirror the on-disk layout of `resources/*.yaml` one to one. The
//! converter turns them into the checked IR.

use serde::{Deserialize, Serialize};

/// Root of a resource table document
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableDoc {
    /// Resource name without provider prefix
    pub name: String,
    /// Type name used as the fallback identifier
    pub type_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// FortiOS CMDB path
    pub api_path: String,
    /// "table" or "singleton"
    pub kind: String,
    #[serde(default)]
    pub mkey: Option<String>,
    #[serde(default)]
    pub adopt_existing: Option<AdoptDoc>,
    pub attributes: Vec<AttributeDoc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdoptDoc {
    pub attribute: String,
    pub equals: String,
}

/// One attribute entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttributeDoc {
    pub name: String,
    #[serde(default)]
    pub api_name: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub force_new: bool,
    /// Defaults to a name-based guess when omitted
    #[serde(default)]
    pub sensitive: Option<bool>,
    /// Shorthand for `length: [0, max_length]`
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub length: Option<[usize; 2]>,
    #[serde(default)]
    pub range: Option<[i64; 2]>,
    #[serde(default)]
    pub normalize: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDoc>,
}
