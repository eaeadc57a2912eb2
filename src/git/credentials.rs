use dashmap::DashMap;
use log::trace;
use regex_lite::Regex;

/// Access tokens keyed by repository URL.
///
/// Tokens are registered by whoever discovers them (configuration, command
/// line) before or while components are being resolved. Lookups and inserts
/// may race freely; a reader sees either the previous or the new token.
#[derive(Debug, Default)]
pub struct CredentialTable {
    tokens: DashMap<String, String>,
}

impl CredentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, repo: impl Into<String>, token: impl Into<String>) {
        let repo = repo.into();
        trace!("Registering access token for {}", repo);
        self.tokens.insert(repo, token.into());
    }

    /// A miss is not an error, the repository is simply fetched without
    /// injected credentials.
    pub fn get(&self, repo: &str) -> Option<String> {
        self.tokens.get(repo).map(|token| token.value().clone())
    }

    pub fn extend<I, K, V>(&self, tokens: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (repo, token) in tokens {
            self.set(repo, token);
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Embeds `token` into the authority of an http(s) repository URL.
///
/// URLs that already carry credentials, and URLs with any other scheme, are
/// returned unchanged.
pub fn inject_token(repo: &str, token: &str) -> Result<String, regex_lite::Error> {
    let re = Regex::new(r"^(?P<scheme>https?)://(?P<credentials>[^@/]+@)?(?P<rest>.+)$")?;
    let Some(captures) = re.captures(repo) else {
        return Ok(repo.to_owned());
    };
    if captures.name("credentials").is_some() {
        return Ok(repo.to_owned());
    }
    match (captures.name("scheme"), captures.name("rest")) {
        (Some(scheme), Some(rest)) => Ok(format!(
            "{}://{}@{}",
            scheme.as_str(),
            token,
            rest.as_str()
        )),
        _ => Ok(repo.to_owned()),
    }
}
