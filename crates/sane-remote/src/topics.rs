use crate::RemoteError;
use sane_schema::Repo;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

const GITHUB_API: &str = "https://api.github.com";
const TOPICS_MEDIA_TYPE: &str = "application/vnd.github.mercy-preview+json";

/// Looks up the topic labels of a repo.
pub trait TopicSource {
    fn topics(&self, repo: &Repo) -> Result<Vec<String>, RemoteError>;
}

#[derive(Deserialize)]
struct TopicsResponse {
    #[serde(default)]
    names: Vec<String>,
}

/// Topic lookup through the GitHub REST API.
pub struct GithubTopics {
    api_url: String,
    agent: ureq::Agent,
}

impl Default for GithubTopics {
    fn default() -> Self {
        Self::new(GITHUB_API)
    }
}

impl GithubTopics {
    pub fn new(api_url: &str) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .build()
            .into();
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            agent,
        }
    }

    pub fn url(&self, repo: &Repo) -> String {
        format!("{}/repos/{}/{}/topics", self.api_url, repo.user, repo.name)
    }
}

/// Decode the body of a `GET /repos/:user/:name/topics` response.
pub fn parse_topics(body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_slice::<TopicsResponse>(body).map(|r| r.names)
}

impl TopicSource for GithubTopics {
    fn topics(&self, repo: &Repo) -> Result<Vec<String>, RemoteError> {
        let url = self.url(repo);
        debug!("GET {url}");
        let resp = match self
            .agent
            .get(&url)
            .header("Accept", TOPICS_MEDIA_TYPE)
            .header("User-Agent", concat!("sane/", env!("CARGO_PKG_VERSION")))
            .call()
        {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(code)) => {
                return Err(RemoteError::Http(format!("HTTP {code} for {url}")));
            }
            Err(e) => return Err(RemoteError::Http(e.to_string())),
        };

        let mut body = Vec::new();
        resp.into_body()
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| RemoteError::Http(e.to_string()))?;
        parse_topics(&body).map_err(|e| RemoteError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

/// Topic source that never has anything to say. Used when lookups are
/// disabled with `SANE_NO_TOPICS`.
pub struct NoTopics;

impl TopicSource for NoTopics {
    fn topics(&self, _repo: &Repo) -> Result<Vec<String>, RemoteError> {
        Ok(Vec::new())
    }
}
