//! DNS Naming
//!
//! Turns free-form instance group, network and deployment names into
//! DNS-label-safe strings and assembles the fully qualified hostnames
//! published in a snapshot.

use std::fmt;

/// Network name that matches every network of an instance
pub const WILDCARD_NETWORK: &str = "%";

/// Host part of a record name: an instance id or its numeric index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostLabel<'a> {
    Id(&'a str),
    Index(u32),
}

impl fmt::Display for HostLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostLabel::Id(id) => f.write_str(id),
            HostLabel::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Canonicalize a name into a DNS label
///
/// Lowercases, maps `_` to `-` and drops anything outside `[a-z0-9-]`.
pub fn canonicalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Build the fully qualified record name for a host
///
/// `<host>.<group>.<network>.<deployment>.<domain>`, with every part except
/// the domain canonicalized. The wildcard network is kept as is.
pub fn dns_record_name(
    host: HostLabel<'_>,
    instance_group: &str,
    network: &str,
    deployment: &str,
    domain: &str,
) -> String {
    let network = if network == WILDCARD_NETWORK {
        network.to_string()
    } else {
        canonicalize(network)
    };

    format!(
        "{}.{}.{}.{}.{}",
        canonicalize(&host.to_string()),
        canonicalize(instance_group),
        network,
        canonicalize(deployment),
        domain
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("Web_Server"), "web-server");
        assert_eq!(canonicalize("my deploy!"), "mydeploy");
        assert_eq!(canonicalize("default"), "default");
        assert_eq!(canonicalize("a.b"), "ab");
    }

    #[test]
    fn test_record_name_from_id() {
        let name = dns_record_name(
            HostLabel::Id("inst-1"),
            "Web",
            "default",
            "my_deploy",
            "bosh",
        );
        assert_eq!(name, "inst-1.web.default.my-deploy.bosh");
    }

    #[test]
    fn test_record_name_from_index() {
        let name = dns_record_name(HostLabel::Index(3), "web", "default", "cf", "bosh");
        assert_eq!(name, "3.web.default.cf.bosh");
    }

    #[test]
    fn test_wildcard_network_kept() {
        let name = dns_record_name(HostLabel::Id("a"), "web", "%", "cf", "bosh");
        assert_eq!(name, "a.web.%.cf.bosh");
    }

    #[test]
    fn test_domain_not_canonicalized() {
        let name = dns_record_name(HostLabel::Index(0), "web", "net", "cf", "Corp.Example");
        assert!(name.ends_with(".Corp.Example"));
    }
}
