//! Port denylist policy

/// Ports associated with non-relay protocols (FTP, SSH, SMTP, DNS, NetBIOS,
/// LDAP, SMB, IRC and friends). Addresses on these ports are never emitted,
/// reachable or not. Sorted ascending; membership is a binary search.
const DENYLISTED_PORTS: &[u16] = &[
    1, 7, 9, 11, 13, 15, 17, 19, 20, 21, 22, 23, 25, 37, 42, 43, 53, 69, 77, 79, 87, 95, 101,
    102, 103, 104, 109, 110, 111, 113, 115, 117, 119, 123, 135, 137, 139, 143, 161, 179, 389,
    427, 465, 512, 513, 514, 515, 526, 530, 531, 532, 540, 548, 554, 556, 563, 587, 601, 636,
    989, 990, 993, 995, 1719, 1720, 1723, 2049, 3659, 4045, 5060, 5061, 6000, 6566, 6665, 6666,
    6667, 6668, 6669, 6697, 10080,
];

/// Static membership test for the fixed port denylist.
///
/// Pure function over a hardcoded set; no configuration, no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortPolicy;

impl PortPolicy {
    /// Returns `false` iff `port` is denylisted.
    pub fn is_allowed(&self, port: u16) -> bool {
        DENYLISTED_PORTS.binary_search(&port).is_err()
    }
}
