//! Key translation between Terraform attribute names and FortiOS REST keys
//!
//! Terraform keys are underscored (`dhcp_relay_ip`), FortiOS keys are
//! hyphenated (`dhcp-relay-ip`). Irregular REST names are carried as explicit
//! overrides on the attribute definition and never go through these helpers.

/// Convert an underscored Terraform key to a hyphenated REST key
///
/// # Examples
/// ```
/// use fortios_provider_common::to_api_key;
///
/// assert_eq!(to_api_key("dhcp_relay_ip"), "dhcp-relay-ip");
/// assert_eq!(to_api_key("ip"), "ip");
/// ```
pub fn to_api_key(tf_key: &str) -> String {
    tf_key.replace('_', "-")
}

/// Convert a hyphenated REST key to an underscored Terraform key
///
/// # Examples
/// ```
/// use fortios_provider_common::to_tf_key;
///
/// assert_eq!(to_tf_key("url-pattern"), "url_pattern");
/// ```
pub fn to_tf_key(api_key: &str) -> String {
    api_key.replace('-', "_")
}
