//! GitHub Releases publisher for nanoscope.
//!
//! Implements the [`ReleasePublisher`] trait over the GitHub REST API with a
//! blocking HTTP client.

use nanoscope_release::artifact::{ReleaseAsset, asset_name, read_artifact};
use nanoscope_release::backends::{ReleasePublisher, ReleaseRecord};
use nanoscope_release::error::{Error, Result};
use nanoscope_release::process::{ProcessCommand, ProcessRunner, SystemProcessRunner, run_checked};
use nanoscope_release::{Credentials, GitHubSettings, Version};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Media type requested from the GitHub API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Releases requested per page when listing.
pub const PER_PAGE: usize = 100;

/// Default cap on pages fetched when listing releases.
pub const MAX_PAGES: usize = 100;

const USER_AGENT: &str = concat!("nanoscope-release/", env!("CARGO_PKG_VERSION"));

/// Configuration for the GitHub Releases publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubReleaseConfig {
    /// Repository owner (e.g., "uber")
    pub owner: String,
    /// Repository name (e.g., "nanoscope")
    pub repo: String,
    /// API root without trailing slash
    pub api_base_url: String,
    /// Asset file name template; `{version}` is substituted
    pub asset_name: String,
    /// Release body template; `{version}` is substituted
    pub body: String,
    /// Checkout whose `HEAD` the release tag points at
    pub source_dir: PathBuf,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Most pages fetched when listing releases
    pub max_pages: usize,
}

impl GitHubReleaseConfig {
    /// Creates a configuration with the default API root and templates.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        let defaults = GitHubSettings::default();
        Self {
            owner: owner.into(),
            repo: repo.into(),
            api_base_url: defaults.api_base_url,
            asset_name: defaults.asset_name,
            body: defaults.body,
            source_dir: defaults.source_dir,
            timeout: None,
            max_pages: MAX_PAGES,
        }
    }

    /// Sets the API root. A trailing slash is dropped.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the asset name template.
    #[must_use]
    pub fn with_asset_name(mut self, template: impl Into<String>) -> Self {
        self.asset_name = template.into();
        self
    }

    /// Sets the release body template.
    #[must_use]
    pub fn with_body(mut self, template: impl Into<String>) -> Self {
        self.body = template.into();
        self
    }

    /// Sets the source checkout directory.
    #[must_use]
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the page cap for release listing.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Builds the configuration from the `[github]` settings table.
    #[must_use]
    pub fn from_settings(settings: &GitHubSettings, timeout: Option<Duration>) -> Self {
        Self::new(settings.owner.clone(), settings.repo.clone())
            .with_api_base_url(settings.api_base_url.clone())
            .with_asset_name(settings.asset_name.clone())
            .with_body(settings.body.clone())
            .with_source_dir(settings.source_dir.clone())
            .with_timeout(timeout)
    }

    /// `{api}/repos/{owner}/{repo}/releases`
    #[must_use]
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_base_url, self.owner, self.repo
        )
    }
}

/// Turns the `upload_url` URI template from a created release into the
/// concrete upload endpoint for `name`.
///
/// `https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}`
/// becomes `https://uploads.github.com/repos/o/r/releases/1/assets?name=<name>`,
/// with `name` form-encoded.
///
/// # Errors
///
/// Returns [`Error::Http`] if the template is not a valid URL.
pub fn upload_url(template: &str, name: &str) -> Result<String> {
    let base = template.split_once('{').map_or(template, |(base, _)| base);
    let mut url = Url::parse(base)
        .map_err(|e| Error::http(template, format!("invalid `upload_url`: {e}")))?;
    url.query_pairs_mut().append_pair("name", name);
    Ok(url.into())
}

#[derive(Debug, Serialize)]
struct CreateReleaseRequest<'a> {
    tag_name: &'a str,
    target_commitish: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

#[derive(Debug, Deserialize)]
struct CreatedRelease {
    upload_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadedAsset {
    browser_download_url: Option<String>,
}

fn require_field(value: Option<String>, field: &str, url: &str) -> Result<String> {
    value.ok_or_else(|| Error::http(url, format!("response has no `{field}` field")))
}

fn authorized(builder: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
    builder
        .header(ACCEPT, GITHUB_ACCEPT)
        .header(AUTHORIZATION, credentials.bearer())
}

/// Sends the request and fails on transport errors or non-2xx statuses.
fn send(builder: RequestBuilder, url: &str) -> Result<Response> {
    let response = builder
        .send()
        .map_err(|e| Error::http(url, format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(Error::http(url, format!("HTTP {status}: {}", body.trim())));
    }
    Ok(response)
}

fn send_json<T: DeserializeOwned>(builder: RequestBuilder, url: &str) -> Result<T> {
    send(builder, url)?
        .json()
        .map_err(|e| Error::http(url, format!("failed to parse response: {e}")))
}

/// GitHub Releases publisher.
///
/// Creates the release for a version, uploads the artifact as its single
/// asset, and lists or deletes releases for draft cleanup.
pub struct GitHubReleasePublisher {
    config: GitHubReleaseConfig,
    client: Client,
    runner: Box<dyn ProcessRunner>,
}

impl GitHubReleasePublisher {
    /// Creates a publisher that resolves commits with the real `git`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: GitHubReleaseConfig) -> Result<Self> {
        Self::with_runner(config, Box::new(SystemProcessRunner))
    }

    /// Creates a publisher with a custom process runner.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_runner(config: GitHubReleaseConfig, runner: Box<dyn ProcessRunner>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                Error::http(
                    config.api_base_url.as_str(),
                    format!("failed to build HTTP client: {e}"),
                )
            })?;
        Ok(Self {
            config,
            client,
            runner,
        })
    }

    /// Returns the publisher configuration.
    #[must_use]
    pub const fn config(&self) -> &GitHubReleaseConfig {
        &self.config
    }

    /// Resolves `HEAD` of the source checkout to a commit id.
    fn head_commit(&self) -> Result<String> {
        let command = ProcessCommand::git()
            .args(["rev-parse", "--verify", "HEAD"])
            .current_dir(&self.config.source_dir);
        let output = run_checked(self.runner.as_ref(), &command)?;
        Ok(output.stdout.trim().to_string())
    }
}

impl ReleasePublisher for GitHubReleasePublisher {
    fn publish(
        &self,
        credentials: &Credentials,
        artifact: &Path,
        version: &Version,
    ) -> Result<ReleaseAsset> {
        let bytes = read_artifact(artifact)?;
        let commit = self.head_commit()?;
        let tag = version.to_string();
        let body = self.config.body.replace("{version}", &tag);

        let releases_url = self.config.releases_url();
        info!(
            owner = %self.config.owner,
            repo = %self.config.repo,
            tag = %tag,
            commit = %commit,
            "Creating GitHub release"
        );
        let request = CreateReleaseRequest {
            tag_name: &tag,
            target_commitish: &commit,
            name: &tag,
            body: &body,
            draft: false,
            prerelease: version.is_initial_development(),
        };
        let created: CreatedRelease = send_json(
            authorized(self.client.post(&releases_url), credentials).json(&request),
            &releases_url,
        )?;
        let template = require_field(created.upload_url, "upload_url", &releases_url)?;

        let name = asset_name(&self.config.asset_name, &tag);
        let upload = upload_url(&template, &name)?;
        info!(asset = %name, size = bytes.len(), "Uploading release asset");
        debug!(url = %upload, "Upload endpoint");
        let uploaded: UploadedAsset = send_json(
            authorized(self.client.post(&upload), credentials)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(bytes.clone()),
            &upload,
        )?;
        let download_url =
            require_field(uploaded.browser_download_url, "browser_download_url", &upload)?;

        info!(url = %download_url, "Uploaded release asset");
        Ok(ReleaseAsset::new(download_url, bytes))
    }

    fn list_releases(&self, credentials: &Credentials) -> Result<Vec<ReleaseRecord>> {
        let base = self.config.releases_url();
        let mut releases = Vec::new();

        for page in 1..=self.config.max_pages {
            let url = format!("{base}?per_page={PER_PAGE}&page={page}");
            debug!(url = %url, "Listing releases");
            let batch: Vec<ReleaseRecord> =
                send_json(authorized(self.client.get(&url), credentials), &url)?;
            let last = batch.len() < PER_PAGE;
            releases.extend(batch);
            if last {
                return Ok(releases);
            }
        }

        Err(Error::http(
            base,
            format!(
                "release listing did not end within {} pages",
                self.config.max_pages
            ),
        ))
    }

    fn delete_release(&self, credentials: &Credentials, url: &str) -> Result<()> {
        debug!(url = %url, "Deleting release");
        send(authorized(self.client.delete(url), credentials), url)?;
        Ok(())
    }
}
