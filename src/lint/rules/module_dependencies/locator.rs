//! Module source detection.
//!
//! Turns the shorthand forms accepted in a module `source` into canonical
//! URLs, without touching the network:
//!
//! | Source                               | Detected as                                  |
//! |--------------------------------------|----------------------------------------------|
//! | `github.com/org/repo//sub?ref=v1`    | `git::https://github.com/org/repo.git//sub?ref=v1` |
//! | `git@github.com:org/repo.git`        | `git::ssh://git@github.com/org/repo.git`     |
//! | `bitbucket.org/org/repo`             | `git::https://bitbucket.org/org/repo.git`    |
//! | `www.googleapis.com/storage/v1/b/o`  | `gcs::https://www.googleapis.com/storage/v1/b/o` |
//! | `bucket.s3.amazonaws.com/key`        | `s3::https://bucket.s3.amazonaws.com/key`    |
//! | `./modules/vpc`                      | `file:///<dir>/modules/vpc`                  |
//!
//! Sources that already carry a scheme (`git::https://...`, `https://...`)
//! are returned unchanged.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

static FORCED_GETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9]+)::(.+)$").unwrap());

static SSH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:([^@]+)@)?([^:]+):/?(.+)$").unwrap());

/// A source string that cannot be turned into a locator.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("invalid source string: {0}")]
    InvalidSource(String),

    #[error("GitHub URLs should be github.com/username/repo")]
    GitHubShorthand,

    #[error("error parsing URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

type Result<T> = std::result::Result<T, LocatorError>;

/// Detect the canonical locator for `src`, resolving local paths against `pwd`.
pub fn detect(src: &str, pwd: &Path) -> Result<String> {
    let (forced, rest) = forced_getter(src);
    let (rest, subdir) = source_dir_subdir(rest);

    if Url::parse(&rest).is_ok_and(|u| !u.scheme().is_empty()) {
        return Ok(src.to_string());
    }

    let detectors: [fn(&str, &Path) -> Result<Option<String>>; 6] = [
        detect_github,
        detect_git_ssh,
        detect_bitbucket,
        detect_gcs,
        detect_s3,
        detect_file,
    ];

    for detector in detectors {
        let Some(result) = detector(&rest, pwd)? else {
            continue;
        };

        let (detected_force, result) = forced_getter(&result);
        let (mut result, detected_subdir) = source_dir_subdir(result);

        let subdir = match (detected_subdir.is_empty(), subdir.is_empty()) {
            (true, _) => subdir.clone(),
            (false, true) => detected_subdir,
            (false, false) => format!("{}/{}", detected_subdir, subdir),
        };
        if !subdir.is_empty() {
            let mut url = parse_url(&result)?;
            let path = format!("{}//{}", url.path(), subdir);
            url.set_path(&path);
            result = url.to_string();
        }

        let force = forced.or(detected_force);
        return Ok(match force {
            Some(force) => format!("{}::{}", force, result),
            None => result,
        });
    }

    Err(LocatorError::InvalidSource(src.to_string()))
}

/// Split a `getter::` prefix from `src`.
fn forced_getter(src: &str) -> (Option<&str>, &str) {
    match FORCED_GETTER.captures(src) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(getter), Some(rest)) => (Some(getter.as_str()), rest.as_str()),
            _ => (None, src),
        },
        None => (None, src),
    }
}

/// Split a `//subdir` suffix from `src`, keeping any query on the source.
pub fn source_dir_subdir(src: &str) -> (String, String) {
    let stop = src.find('?').unwrap_or(src.len());
    let offset = src[..stop].find("://").map(|i| i + 3).unwrap_or(0);

    let Some(idx) = src[offset..stop].find("//").map(|i| i + offset) else {
        return (src.to_string(), String::new());
    };

    let mut source = src[..idx].to_string();
    let mut subdir = src[idx + 2..].to_string();
    if let Some(q) = subdir.find('?') {
        source.push_str(&subdir[q..]);
        subdir.truncate(q);
    }
    (source, subdir)
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| LocatorError::Url {
        url: url.to_string(),
        source,
    })
}

/// Append `.git` to the URL path if missing.
fn with_git_suffix(mut url: Url) -> Url {
    if !url.path().ends_with(".git") {
        let path = format!("{}.git", url.path());
        url.set_path(&path);
    }
    url
}

fn detect_github(src: &str, _pwd: &Path) -> Result<Option<String>> {
    if !src.starts_with("github.com/") {
        return Ok(None);
    }

    let parts: Vec<&str> = src.split('/').collect();
    if parts.len() < 3 {
        return Err(LocatorError::GitHubShorthand);
    }

    let mut url = with_git_suffix(parse_url(&format!("https://{}", parts[..3].join("/")))?);
    if parts.len() > 3 {
        let path = format!("{}//{}", url.path(), parts[3..].join("/"));
        url.set_path(&path);
    }
    Ok(Some(format!("git::{}", url)))
}

fn detect_git_ssh(src: &str, _pwd: &Path) -> Result<Option<String>> {
    let Some(caps) = SSH_PATTERN.captures(src) else {
        return Ok(None);
    };

    let user = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    if user != "git" {
        return Ok(None);
    }
    let host = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    let path = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };

    let mut url = parse_url(&format!("ssh://{}@{}/{}", user, host, path))?;
    if let Some(query) = query {
        let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Ok(Some(format!("git::{}", url)))
}

fn detect_bitbucket(src: &str, _pwd: &Path) -> Result<Option<String>> {
    if !src.starts_with("bitbucket.org/") {
        return Ok(None);
    }

    let url = with_git_suffix(parse_url(&format!("https://{}", src))?);
    Ok(Some(format!("git::{}", url)))
}

fn detect_gcs(src: &str, _pwd: &Path) -> Result<Option<String>> {
    if !src.contains("googleapis.com/") {
        return Ok(None);
    }
    Ok(Some(format!("gcs::https://{}", src)))
}

fn detect_s3(src: &str, _pwd: &Path) -> Result<Option<String>> {
    if !src.contains(".amazonaws.com/") {
        return Ok(None);
    }
    Ok(Some(format!("s3::https://{}", src)))
}

fn detect_file(src: &str, pwd: &Path) -> Result<Option<String>> {
    if src.is_empty() {
        return Ok(None);
    }

    let path = Path::new(src);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        pwd.join(path)
    };
    let path = path.to_string_lossy();
    Ok(Some(format!(
        "file:///{}",
        path.strip_prefix('/').unwrap_or(&*path)
    )))
}
