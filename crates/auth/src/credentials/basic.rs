use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use subtle::ConstantTimeEq;

use crate::credentials::CredentialManager;
use crate::password::{PasswordError, PasswordHasher};
use crate::{AuthError, BasicPrincipal};

/// Username → expected secret.
///
/// Lookup is exact-match. Secrets are either plaintext or password hashes,
/// depending on how the owning [`BasicCredentialManager`] is built.
#[derive(Clone, Default)]
pub struct CredentialTable {
    entries: HashMap<String, String>,
}

impl CredentialTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// A table holding exactly one username/secret pair.
    pub fn single(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::new(HashMap::from([(username.into(), secret.into())]))
    }

    pub fn lookup(&self, username: &str) -> Option<&str> {
        self.entries.get(username).map(String::as_str)
    }
}

impl<U: Into<String>, S: Into<String>> FromIterator<(U, S)> for CredentialTable {
    fn from_iter<I: IntoIterator<Item = (U, S)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(u, s)| (u.into(), s.into())).collect())
    }
}

impl core::fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut users: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        users.sort_unstable();
        f.debug_struct("CredentialTable").field("users", &users).finish()
    }
}

/// Checked in place of a real secret when the username is unknown.
const DECOY_SECRET: &str = "b16-basic-auth-decoy";

#[derive(Clone)]
enum SecretCheck {
    Plaintext,
    Hashed {
        hasher: Arc<dyn PasswordHasher>,
        decoy: String,
    },
}

/// HTTP basic authentication against a static [`CredentialTable`].
///
/// Unknown usernames and wrong secrets both yield
/// [`AuthError::Unauthorized`], and both pay for one secret comparison, so
/// neither the answer nor its timing reveals which usernames exist.
#[derive(Clone)]
pub struct BasicCredentialManager {
    table: CredentialTable,
    check: SecretCheck,
}

impl BasicCredentialManager {
    /// Table secrets are plaintext, compared in constant time.
    pub fn new(table: CredentialTable) -> Self {
        Self {
            table,
            check: SecretCheck::Plaintext,
        }
    }

    /// Single configured username/password pair.
    pub fn single(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(CredentialTable::single(username, password))
    }

    /// Table secrets are password hashes, verified through `hasher`.
    ///
    /// Hashes a decoy secret up front so unknown usernames can be checked at
    /// the same cost as known ones.
    pub fn hashed(table: CredentialTable, hasher: Arc<dyn PasswordHasher>) -> Result<Self, PasswordError> {
        let decoy = hasher.hash(DECOY_SECRET)?;
        Ok(Self {
            table,
            check: SecretCheck::Hashed { hasher, decoy },
        })
    }

    fn secret_matches(&self, expected: &str, supplied: &str) -> bool {
        match &self.check {
            SecretCheck::Plaintext => expected.as_bytes().ct_eq(supplied.as_bytes()).into(),
            SecretCheck::Hashed { hasher, .. } => hasher.compare(supplied, expected).is_ok(),
        }
    }

    fn decoy(&self) -> &str {
        match &self.check {
            SecretCheck::Plaintext => DECOY_SECRET,
            SecretCheck::Hashed { decoy, .. } => decoy,
        }
    }
}

impl CredentialManager for BasicCredentialManager {
    type Principal = BasicPrincipal;

    fn authenticate(&self, headers: &HeaderMap) -> Result<BasicPrincipal, AuthError> {
        let (username, password) = basic_credentials(headers).ok_or(AuthError::Unauthorized)?;

        match self.table.lookup(&username) {
            Some(expected) if self.secret_matches(expected, &password) => Ok(BasicPrincipal::new(username)),
            Some(_) => Err(AuthError::Unauthorized),
            None => {
                // Result ignored: the comparison only equalizes cost.
                let _ = self.secret_matches(self.decoy(), &password);
                Err(AuthError::Unauthorized)
            }
        }
    }
}

impl core::fmt::Debug for BasicCredentialManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mode = match self.check {
            SecretCheck::Plaintext => "plaintext",
            SecretCheck::Hashed { .. } => "hashed",
        };
        f.debug_struct("BasicCredentialManager")
            .field("table", &self.table)
            .field("mode", &mode)
            .finish()
    }
}

/// Parse `Authorization: Basic base64(username:password)`.
///
/// The scheme name is case-insensitive; the password is everything after the
/// first `:` and may itself contain colons.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::HeaderValue;

    use super::*;
    use crate::password::BcryptHasher;
    use crate::Principal;

    fn table() -> CredentialTable {
        CredentialTable::from_iter([("admin", "secret"), ("user", "password")])
    }

    fn raw_header(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn basic_header(username: &str, password: &str) -> HeaderMap {
        raw_header(&format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))))
    }

    #[test]
    fn authenticate_table_cases() {
        let manager = BasicCredentialManager::new(table());

        let cases: Vec<(&str, HeaderMap, Result<&str, AuthError>)> = vec![
            ("no basic auth header", HeaderMap::new(), Err(AuthError::Unauthorized)),
            ("invalid credentials", basic_header("admin", "wrong"), Err(AuthError::Unauthorized)),
            ("valid credentials - admin", basic_header("admin", "secret"), Ok("admin")),
            ("valid credentials - user", basic_header("user", "password"), Ok("user")),
            ("non-existent user", basic_header("unknown", "password"), Err(AuthError::Unauthorized)),
            ("bearer scheme", raw_header("Bearer abc"), Err(AuthError::Unauthorized)),
            ("not base64", raw_header("Basic !!!"), Err(AuthError::Unauthorized)),
            ("missing colon", raw_header(&format!("Basic {}", STANDARD.encode("admin"))), Err(AuthError::Unauthorized)),
            ("scheme only", raw_header("Basic"), Err(AuthError::Unauthorized)),
        ];

        for (name, headers, expected) in cases {
            let got = manager
                .authenticate(&headers)
                .map(|p| p.username().to_string());
            assert_eq!(got.as_deref().map_err(|e| *e), expected, "case: {name}");
        }
    }

    #[test]
    fn scheme_name_is_case_insensitive() {
        let manager = BasicCredentialManager::new(table());
        let headers = raw_header(&format!("basic {}", STANDARD.encode("admin:secret")));

        assert_eq!(manager.authenticate(&headers).unwrap().username(), "admin");
    }

    #[test]
    fn password_may_contain_colons() {
        let manager = BasicCredentialManager::single("svc", "a:b:c");

        let principal = manager.authenticate(&basic_header("svc", "a:b:c")).unwrap();
        assert_eq!(principal.as_principal(), "svc");
        assert_eq!(
            manager.authenticate(&basic_header("svc", "a:b")),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn lookup_is_exact_match() {
        let manager = BasicCredentialManager::new(table());

        assert_eq!(
            manager.authenticate(&basic_header("Admin", "secret")),
            Err(AuthError::Unauthorized)
        );
        assert_eq!(
            manager.authenticate(&basic_header("admin", "secret ")),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn hashed_table_verifies_through_hasher() {
        let hasher = BcryptHasher::new(4);
        let hashed = hasher.hash("secret").unwrap();
        let manager = BasicCredentialManager::hashed(
            CredentialTable::single("admin", hashed.clone()),
            Arc::new(hasher),
        )
        .unwrap();

        assert_eq!(
            manager.authenticate(&basic_header("admin", "secret")).unwrap().username(),
            "admin"
        );
        assert_eq!(
            manager.authenticate(&basic_header("admin", "wrong")),
            Err(AuthError::Unauthorized)
        );
        // The stored hash itself is not an accepted password.
        assert_eq!(
            manager.authenticate(&basic_header("admin", &hashed)),
            Err(AuthError::Unauthorized)
        );
    }

    /// Stores `hashed:<password>` and counts comparisons.
    #[derive(Default)]
    struct CountingHasher {
        compares: AtomicUsize,
    }

    impl PasswordHasher for CountingHasher {
        fn hash(&self, password: &str) -> Result<String, PasswordError> {
            Ok(format!("hashed:{password}"))
        }

        fn compare(&self, password: &str, hashed: &str) -> Result<(), PasswordError> {
            self.compares.fetch_add(1, Ordering::SeqCst);
            if hashed == format!("hashed:{password}") {
                Ok(())
            } else {
                Err(PasswordError::Mismatch)
            }
        }
    }

    #[test]
    fn unknown_user_costs_one_hash_comparison() {
        let hasher = Arc::new(CountingHasher::default());
        let manager = BasicCredentialManager::hashed(
            CredentialTable::single("admin", "hashed:secret"),
            hasher.clone(),
        )
        .unwrap();

        let cases = [
            ("unknown user", basic_header("nobody", "secret"), Err(AuthError::Unauthorized)),
            ("wrong password", basic_header("admin", "wrong"), Err(AuthError::Unauthorized)),
            ("valid credentials", basic_header("admin", "secret"), Ok("admin")),
        ];

        for (name, headers, expected) in cases {
            let before = hasher.compares.load(Ordering::SeqCst);
            let got = manager.authenticate(&headers).map(|p| p.username().to_string());

            assert_eq!(got.as_deref().map_err(|e| *e), expected, "case: {name}");
            assert_eq!(hasher.compares.load(Ordering::SeqCst) - before, 1, "case: {name}");
        }
    }

    #[test]
    fn decoy_secret_does_not_authenticate_unknown_users() {
        let manager = BasicCredentialManager::hashed(CredentialTable::default(), Arc::new(CountingHasher::default()))
            .unwrap();

        assert_eq!(
            manager.authenticate(&basic_header("nobody", DECOY_SECRET)),
            Err(AuthError::Unauthorized)
        );
        assert_eq!(
            BasicCredentialManager::new(CredentialTable::default())
                .authenticate(&basic_header("nobody", DECOY_SECRET)),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn debug_output_lists_users_but_not_secrets() {
        let rendered = format!("{:?}", BasicCredentialManager::new(table()));

        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("password"));
    }
}
