//! Git remotes
//!
//! Lists configured remotes and extracts the hosting service from their
//! URLs, which picks the avatar source for commit authors.

use std::path::Path;

use git2::Repository;

use super::Error;

/// A configured remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Remote name (`origin`, `upstream`, ...)
    pub name: String,
    /// URL used for fetching
    pub fetch_url: Option<String>,
    /// URL used for pushing, if configured separately
    pub push_url: Option<String>,
}

impl Remote {
    /// Hosting service name derived from the fetch URL
    pub fn host(&self) -> Option<&str> {
        self.fetch_url.as_deref().and_then(remote_host)
    }

    /// Push URL when it differs from the fetch URL
    pub fn distinct_push_url(&self) -> Option<&str> {
        match (&self.push_url, &self.fetch_url) {
            (Some(push), Some(fetch)) if push == fetch => None,
            (Some(push), _) => Some(push),
            (None, _) => None,
        }
    }
}

/// List the remotes of the repository containing `repo_path`
pub fn list_remotes(repo_path: &Path) -> Result<Vec<Remote>, Error> {
    let repo = Repository::discover(repo_path)?;
    let names = repo.remotes()?;

    let mut remotes = Vec::new();
    for name in names.iter().flatten() {
        match repo.find_remote(name) {
            Ok(remote) => remotes.push(Remote {
                name: name.to_string(),
                fetch_url: remote.url().map(str::to_string),
                push_url: remote.pushurl().map(str::to_string),
            }),
            Err(e) => log::warn!("skipping remote {}: {}", name, e),
        }
    }

    Ok(remotes)
}

/// Pick the remote used to guess the hosting service: `origin`, else the first
pub fn primary_remote(remotes: &[Remote]) -> Option<&Remote> {
    remotes
        .iter()
        .find(|r| r.name == "origin")
        .or_else(|| remotes.first())
}

/// First host label of a remote URL
///
/// `git@github.com:org/repo.git` and `https://github.com/org/repo` both
/// yield `github`.
pub fn remote_host(url: &str) -> Option<&str> {
    let rest = match url.split_once("//") {
        Some((_, after_scheme)) => {
            // Skip `user@` in `ssh://user@host/path`
            let authority_end = after_scheme.find('/').unwrap_or(after_scheme.len());
            match after_scheme[..authority_end].rfind('@') {
                Some(at) => &after_scheme[at + 1..],
                None => after_scheme,
            }
        }
        None => url.split_once('@').map(|(_, host)| host)?,
    };

    let first = rest.chars().next()?;
    if !first.is_ascii_lowercase() {
        return None;
    }

    let end = rest
        .find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+' || c == '-'))
        .unwrap_or(rest.len());

    // A host needs at least two characters
    if end < 2 {
        return None;
    }

    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_host() {
        assert_eq!(remote_host("git@github.com:org/repo.git"), Some("github"));
        assert_eq!(remote_host("https://github.com/org/repo"), Some("github"));
        assert_eq!(remote_host("ssh://git@gitlab.example.com/x"), Some("gitlab"));
        assert_eq!(remote_host("https://bitbucket.org/team/repo"), Some("bitbucket"));
        assert_eq!(remote_host("/srv/git/repo.git"), None);
        assert_eq!(remote_host("https://10.0.0.1/repo"), None);
    }

    #[test]
    fn test_primary_remote() {
        let remote = |name: &str| Remote {
            name: name.to_string(),
            fetch_url: None,
            push_url: None,
        };

        let remotes = vec![remote("upstream"), remote("origin")];
        assert_eq!(primary_remote(&remotes).map(|r| r.name.as_str()), Some("origin"));

        let remotes = vec![remote("upstream"), remote("fork")];
        assert_eq!(primary_remote(&remotes).map(|r| r.name.as_str()), Some("upstream"));

        assert!(primary_remote(&[]).is_none());
    }

    #[test]
    fn test_distinct_push_url() {
        let mut remote = Remote {
            name: "origin".to_string(),
            fetch_url: Some("https://github.com/a/b".to_string()),
            push_url: Some("https://github.com/a/b".to_string()),
        };
        assert_eq!(remote.distinct_push_url(), None);

        remote.push_url = Some("git@github.com:a/b".to_string());
        assert_eq!(remote.distinct_push_url(), Some("git@github.com:a/b"));
        assert_eq!(remote.host(), Some("github"));
    }
}
