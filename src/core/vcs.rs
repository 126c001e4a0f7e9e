//! Code-hosting platform recognition and raw-content URL derivation
//!
//! Maps repository and file URLs of the supported hosting platforms to the
//! URLs that serve stored bytes directly. Everything here is pure: no
//! network I/O happens while deriving a URL.

use url::Url;

/// Branch assumed for every repository root.
///
/// Repositories whose default branch was renamed resolve to a root that
/// does not exist; there is no default-branch lookup.
pub const DEFAULT_BRANCH: &str = "master";

/// Host serving raw GitHub content
pub const GITHUB_RAW_HOST: &str = "raw.githubusercontent.com";

/// Supported hosting platform families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    GitHub,
    GitLab,
    Bitbucket,
}

/// A web host belonging to a platform family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub kind: PlatformKind,
    pub host: String,
}

impl Platform {
    pub fn new(kind: PlatformKind, host: impl Into<String>) -> Self {
        Self {
            kind,
            host: host.into().to_ascii_lowercase(),
        }
    }

    /// Self-hosted GitLab instance
    pub fn gitlab(host: impl Into<String>) -> Self {
        Self::new(PlatformKind::GitLab, host)
    }
}

/// Lookup table of recognised hosts
#[derive(Debug, Clone)]
pub struct PlatformTable {
    platforms: Vec<Platform>,
}

impl Default for PlatformTable {
    fn default() -> Self {
        Self {
            platforms: vec![
                Platform::new(PlatformKind::GitHub, "github.com"),
                Platform::new(PlatformKind::GitHub, "www.github.com"),
                Platform::new(PlatformKind::GitLab, "gitlab.com"),
                Platform::new(PlatformKind::Bitbucket, "bitbucket.org"),
            ],
        }
    }
}

impl PlatformTable {
    /// Register an additional host, e.g. a self-hosted GitLab
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platforms.push(platform);
        self
    }

    /// Platform family serving `url`, if any
    pub fn platform_for(&self, url: &Url) -> Option<PlatformKind> {
        let host = url.host_str()?.to_ascii_lowercase();
        if let Some(platform) = self.platforms.iter().find(|p| p.host == host) {
            return Some(platform.kind);
        }
        // gitlab.example.org style instances
        if host.split('.').next() == Some("gitlab") && host.contains('.') {
            return Some(PlatformKind::GitLab);
        }
        None
    }

    /// Raw content root of the repository `url` points at.
    ///
    /// Only `(org, repo)` take part in the result: a `.git` suffix, trailing
    /// slashes and any deeper path (`tree/...`) are ignored. Returns `None`
    /// for unrecognised hosts; callers treat that as "no base URL".
    pub fn resolve_root(&self, url: &Url) -> Option<Url> {
        let kind = self.platform_for(url)?;
        let segments = path_segments(url);

        match kind {
            PlatformKind::GitHub => {
                let (org, repo) = owner_and_repo(&segments)?;
                Url::parse(&format!(
                    "https://{}/{}/{}/{}/",
                    GITHUB_RAW_HOST, org, repo, DEFAULT_BRANCH
                ))
                .ok()
            }
            PlatformKind::GitLab => {
                let end = segments
                    .iter()
                    .position(|s| *s == "-")
                    .unwrap_or(segments.len());
                let project = gitlab_project_path(&segments[..end])?;
                with_path(url, &format!("/{}/-/raw/{}/", project, DEFAULT_BRANCH))
            }
            PlatformKind::Bitbucket => {
                let (org, repo) = owner_and_repo(&segments)?;
                with_path(url, &format!("/{}/{}/raw/{}/", org, repo, DEFAULT_BRANCH))
            }
        }
    }

    /// Raw URL of the single file `url` points at.
    ///
    /// Accepts the platform's file views (`blob`, `src`) and URLs that are
    /// already raw. Derivation says nothing about existence.
    pub fn resolve_file(&self, url: &Url) -> Option<Url> {
        let segments = path_segments(url);

        if url
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(GITHUB_RAW_HOST))
        {
            // org/repo/ref/path...
            return (segments.len() >= 4).then(|| without_query(url));
        }

        match self.platform_for(url)? {
            PlatformKind::GitHub => {
                // org/repo/{blob|raw}/ref/path...
                if segments.len() < 5 || !matches!(segments[2], "blob" | "raw") {
                    return None;
                }
                let (org, repo) = owner_and_repo(&segments)?;
                Url::parse(&format!(
                    "https://{}/{}/{}/{}",
                    GITHUB_RAW_HOST,
                    org,
                    repo,
                    segments[3..].join("/")
                ))
                .ok()
            }
            PlatformKind::GitLab => {
                let view = segments
                    .iter()
                    .position(|s| matches!(*s, "blob" | "raw"))?;
                let project_end = if view > 0 && segments[view - 1] == "-" {
                    view - 1
                } else {
                    view
                };
                let project = gitlab_project_path(&segments[..project_end])?;
                let rest = &segments[view + 1..];
                if rest.len() < 2 {
                    return None;
                }
                with_path(url, &format!("/{}/-/raw/{}", project, rest.join("/")))
            }
            PlatformKind::Bitbucket => {
                // org/repo/{src|raw}/ref/path...
                if segments.len() < 5 || !matches!(segments[2], "src" | "raw") {
                    return None;
                }
                let (org, repo) = owner_and_repo(&segments)?;
                with_path(
                    url,
                    &format!("/{}/{}/raw/{}", org, repo, segments[3..].join("/")),
                )
            }
        }
    }
}

/// Raw root of `url` using the default platform table
pub fn resolve_root(url: &Url) -> Option<Url> {
    PlatformTable::default().resolve_root(url)
}

/// Raw file URL of `url` using the default platform table
pub fn resolve_file(url: &Url) -> Option<Url> {
    PlatformTable::default().resolve_file(url)
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn strip_git_suffix(name: &str) -> Option<&str> {
    let name = name.strip_suffix(".git").unwrap_or(name);
    (!name.is_empty()).then_some(name)
}

fn owner_and_repo<'a>(segments: &[&'a str]) -> Option<(&'a str, &'a str)> {
    let org = *segments.first()?;
    let repo = strip_git_suffix(segments.get(1)?)?;
    Some((org, repo))
}

/// GitLab projects may sit in nested groups: group/subgroup/project
fn gitlab_project_path(segments: &[&str]) -> Option<String> {
    let (last, groups) = segments.split_last()?;
    if groups.is_empty() {
        return None;
    }
    let project = strip_git_suffix(last)?;
    Some(format!("{}/{}", groups.join("/"), project))
}

fn with_path(url: &Url, path: &str) -> Option<Url> {
    let mut out = without_query(url);
    out.set_path(path);
    Some(out)
}

fn without_query(url: &Url) -> Url {
    let mut out = url.clone();
    out.set_query(None);
    out.set_fragment(None);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn root(s: &str) -> Option<String> {
        resolve_root(&Url::parse(s).unwrap()).map(|u| u.to_string())
    }

    fn file(s: &str) -> Option<String> {
        resolve_file(&Url::parse(s).unwrap()).map(|u| u.to_string())
    }

    #[test]
    fn test_github_root_ignores_git_suffix() {
        let expected = "https://raw.githubusercontent.com/italia/publiccode-validator/master/";
        assert_eq!(
            root("https://github.com/italia/publiccode-validator").as_deref(),
            Some(expected)
        );
        assert_eq!(
            root("https://github.com/italia/publiccode-validator.git").as_deref(),
            Some(expected)
        );
        assert_eq!(
            root("http://www.github.com/italia/publiccode-validator/").as_deref(),
            Some(expected)
        );
        assert_eq!(
            root("https://github.com/italia/publiccode-validator/tree/develop/docs").as_deref(),
            Some(expected)
        );
    }

    #[test]
    fn test_github_root_needs_org_and_repo() {
        assert_eq!(root("https://github.com/italia"), None);
        assert_eq!(root("https://github.com/italia/.git"), None);
        assert_eq!(root("https://github.com/"), None);
    }

    #[test]
    fn test_unrecognized_host_has_no_root() {
        assert_eq!(root("https://example.com/italia/repo"), None);
        assert_eq!(root("https://git.example.org/italia/repo.git"), None);
        assert_eq!(root("https://raw.githubusercontent.com/a/b/master/x.yml"), None);
    }

    #[test]
    fn test_gitlab_root_with_nested_groups() {
        assert_eq!(
            root("https://gitlab.com/group/sub/project.git").as_deref(),
            Some("https://gitlab.com/group/sub/project/-/raw/master/")
        );
        assert_eq!(
            root("https://gitlab.com/group/project/-/tree/main").as_deref(),
            Some("https://gitlab.com/group/project/-/raw/master/")
        );
        assert_eq!(
            root("https://gitlab.example.org/pa/app").as_deref(),
            Some("https://gitlab.example.org/pa/app/-/raw/master/")
        );
        assert_eq!(root("https://gitlab.com/lonely"), None);
    }

    #[test]
    fn test_bitbucket_root() {
        assert_eq!(
            root("https://bitbucket.org/team/app.git").as_deref(),
            Some("https://bitbucket.org/team/app/raw/master/")
        );
    }

    #[test]
    fn test_custom_platform_registration() {
        let table = PlatformTable::default().with_platform(Platform::gitlab("code.example.org"));
        let url = Url::parse("https://code.example.org/dept/tool").unwrap();
        assert_eq!(
            table.resolve_root(&url).unwrap().as_str(),
            "https://code.example.org/dept/tool/-/raw/master/"
        );
        assert_eq!(resolve_root(&url), None);
    }

    #[test]
    fn test_github_blob_to_raw_file() {
        assert_eq!(
            file("https://github.com/italia/pcv/blob/master/tests/valid.yml").as_deref(),
            Some("https://raw.githubusercontent.com/italia/pcv/master/tests/valid.yml")
        );
        assert_eq!(
            file("https://github.com/italia/pcv.git/blob/main/publiccode.yml?plain=1").as_deref(),
            Some("https://raw.githubusercontent.com/italia/pcv/main/publiccode.yml")
        );
    }

    #[test]
    fn test_raw_github_url_passes_through() {
        let raw = "https://raw.githubusercontent.com/italia/pcv/master/publiccode.yml";
        assert_eq!(file(raw).as_deref(), Some(raw));
        assert_eq!(file("https://raw.githubusercontent.com/italia/pcv"), None);
    }

    #[test]
    fn test_repository_url_is_not_a_file() {
        assert_eq!(file("https://github.com/italia/pcv"), None);
        assert_eq!(file("https://github.com/italia/pcv/tree/master/docs"), None);
        assert_eq!(file("https://example.com/publiccode.yml"), None);
    }

    #[test]
    fn test_gitlab_file_views() {
        let expected = "https://gitlab.com/group/project/-/raw/main/publiccode.yml";
        assert_eq!(
            file("https://gitlab.com/group/project/-/blob/main/publiccode.yml").as_deref(),
            Some(expected)
        );
        assert_eq!(
            file("https://gitlab.com/group/project/blob/main/publiccode.yml").as_deref(),
            Some(expected)
        );
        assert_eq!(file(expected).as_deref(), Some(expected));
        assert_eq!(file("https://gitlab.com/group/project/-/blob/main"), None);
    }

    #[test]
    fn test_bitbucket_file_views() {
        assert_eq!(
            file("https://bitbucket.org/team/app/src/master/publiccode.yml?at=master").as_deref(),
            Some("https://bitbucket.org/team/app/raw/master/publiccode.yml")
        );
        assert_eq!(
            file("https://bitbucket.org/team/app/raw/master/publiccode.yml").as_deref(),
            Some("https://bitbucket.org/team/app/raw/master/publiccode.yml")
        );
    }

    #[test]
    fn test_self_hosted_gitlab_keeps_port() {
        let table = PlatformTable::default().with_platform(Platform::gitlab("127.0.0.1"));
        let url = Url::parse("http://127.0.0.1:8929/org/repo/-/blob/main/publiccode.yml").unwrap();
        assert_eq!(
            table.resolve_file(&url).unwrap().as_str(),
            "http://127.0.0.1:8929/org/repo/-/raw/main/publiccode.yml"
        );
    }
}
