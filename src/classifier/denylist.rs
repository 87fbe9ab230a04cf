//! Static denylist of known disposable-mail domains.
//!
//! Used only when the remote classifier is unreachable. Matching is
//! case-insensitive on the part after the last `@`, subdomains included.

/// Known disposable/throwaway mail providers.
const DISPOSABLE_DOMAINS: &[&str] = &[
    "mailinator.com",
    "yopmail.com",
    "guerrillamail.com",
    "sharklasers.com",
    "10minutemail.com",
    "tempmail.com",
    "temp-mail.org",
    "trashmail.com",
    "getnada.com",
    "dispostable.com",
    "maildrop.cc",
    "fakeinbox.com",
    "throwawaymail.com",
    "mintemail.com",
    "mohmal.com",
];

/// Local disposable-domain check against a fixed denylist.
#[derive(Debug, Clone, Default)]
pub struct DenylistClassifier;

impl DenylistClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Check whether the address' domain is a known disposable provider.
    ///
    /// Addresses without an `@` never match.
    pub fn is_disposable(&self, email: &str) -> bool {
        let Some(domain) = email.rsplit_once('@').map(|(_, d)| d) else {
            return false;
        };
        let domain = domain.trim().to_lowercase();
        DISPOSABLE_DOMAINS
            .iter()
            .any(|d| domain == *d || domain.ends_with(&format!(".{d}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_domain_matches() {
        let denylist = DenylistClassifier::new();
        assert!(denylist.is_disposable("bob@mailinator.com"));
        assert!(denylist.is_disposable("eve@yopmail.com"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let denylist = DenylistClassifier::new();
        assert!(denylist.is_disposable("Bob@Mailinator.COM"));
    }

    #[test]
    fn subdomain_of_known_domain_matches() {
        let denylist = DenylistClassifier::new();
        assert!(denylist.is_disposable("bob@mail.mailinator.com"));
    }

    #[test]
    fn regular_domain_does_not_match() {
        let denylist = DenylistClassifier::new();
        assert!(!denylist.is_disposable("alice@gmail.com"));
        assert!(!denylist.is_disposable("carol@example.org"));
    }

    #[test]
    fn similar_suffix_is_not_a_match() {
        // "notmailinator.com" is a different domain, not a subdomain.
        let denylist = DenylistClassifier::new();
        assert!(!denylist.is_disposable("bob@notmailinator.com"));
    }

    #[test]
    fn address_without_at_sign_never_matches() {
        let denylist = DenylistClassifier::new();
        assert!(!denylist.is_disposable("mailinator.com"));
        assert!(!denylist.is_disposable(""));
    }
}
