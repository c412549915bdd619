//! Deterministic resource naming derived from the service instance id
//!
//! Storage account names are limited to 24 lowercase alphanumeric characters,
//! so the id is stripped of hyphens and truncated to 22 characters after the
//! two-character prefix. Truncation is char-boundary safe and never panics for
//! short ids.

/// Prefix for resource group names
pub const RESOURCE_GROUP_PREFIX: &str = "cloud-foundry-";

/// Prefix for storage account names
pub const STORAGE_ACCOUNT_PREFIX: &str = "cf";

/// Prefix for blob container names
pub const CONTAINER_PREFIX: &str = "cloud-foundry-";

/// Maximum id characters kept in a storage account name after the prefix
const STORAGE_ACCOUNT_ID_CHARS: usize = 22;

/// Resource group name for an instance id
pub fn resource_group_name(instance_id: &str) -> String {
    format!("{}{}", RESOURCE_GROUP_PREFIX, instance_id)
}

/// Storage account name for an instance id: prefix plus the id with hyphens
/// removed, truncated to at most 22 characters
pub fn storage_account_name(instance_id: &str) -> String {
    let compact: String = instance_id
        .chars()
        .filter(|c| *c != '-')
        .take(STORAGE_ACCOUNT_ID_CHARS)
        .collect();
    format!("{}{}", STORAGE_ACCOUNT_PREFIX, compact)
}

/// Blob container name for an instance id
pub fn container_name(instance_id: &str) -> String {
    format!("{}{}", CONTAINER_PREFIX, instance_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ID: &str = "abcd1234-ef56-7890-ab12-cd34ef567890";

    #[test]
    fn resource_group_is_prefix_plus_id() {
        assert_eq!(resource_group_name(ID), format!("cloud-foundry-{}", ID));
    }

    #[test]
    fn container_is_prefix_plus_id() {
        assert_eq!(container_name(ID), format!("cloud-foundry-{}", ID));
    }

    #[test]
    fn storage_account_strips_hyphens_and_truncates() {
        // first 22 chars of "abcd1234ef567890ab12cd34ef567890"
        assert_eq!(storage_account_name(ID), "cfabcd1234ef567890ab12cd");
        assert_eq!(storage_account_name(ID).len(), STORAGE_ACCOUNT_PREFIX.len() + 22);
        assert!(!storage_account_name(ID).contains('-'));
    }

    #[test]
    fn storage_account_is_deterministic() {
        assert_eq!(storage_account_name(ID), storage_account_name(ID));
    }

    #[test]
    fn short_id_does_not_panic() {
        assert_eq!(storage_account_name("ab-cd"), "cfabcd");
        assert_eq!(storage_account_name("a"), "cfa");
    }

    #[test]
    fn empty_id_yields_bare_prefixes() {
        assert_eq!(storage_account_name(""), "cf");
        assert_eq!(resource_group_name(""), "cloud-foundry-");
    }

    #[test]
    fn multibyte_id_truncates_on_char_boundaries() {
        let id = "é".repeat(30);
        let name = storage_account_name(&id);
        assert_eq!(name.chars().count(), 2 + 22);
    }
}
