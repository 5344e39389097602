use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, TmaError};
use crate::templates::style_files;

const USER_AGENT: &str = concat!("tmagen/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the raw text of a named style resource (`tma.sty`, ...).
///
/// Failures are not fatal: the generator substitutes the embedded copy.
#[allow(async_fn_in_trait)]
pub trait StyleProvider {
    async fn fetch(&self, name: &str) -> Result<String>;
}

/// Serves the embedded style files without touching disk or network.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedStyles;

impl StyleProvider for EmbeddedStyles {
    async fn fetch(&self, name: &str) -> Result<String> {
        style_files::fallback(name)
            .map(str::to_string)
            .ok_or_else(|| TmaError::Custom(format!("No embedded style resource named {name}")))
    }
}

/// Reads style files from a local directory.
#[derive(Clone, Debug)]
pub struct DirStyles {
    dir: PathBuf,
}

impl DirStyles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl StyleProvider for DirStyles {
    async fn fetch(&self, name: &str) -> Result<String> {
        Ok(tokio::fs::read_to_string(self.dir.join(name)).await?)
    }
}

/// Downloads style files from `<base_url>/<name>`.
#[derive(Clone, Debug)]
pub struct HttpStyles {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStyles {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl StyleProvider for HttpStyles {
    async fn fetch(&self, name: &str) -> Result<String> {
        let url = format!("{}/{name}", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(TmaError::Custom(format!(
                "Failed to fetch {name}: HTTP {} from {url}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

/// Where style files come from, as chosen on the command line.
#[derive(Clone, Debug)]
pub enum StyleSource {
    Embedded(EmbeddedStyles),
    Dir(DirStyles),
    Http(HttpStyles),
}

impl StyleSource {
    /// `http://` and `https://` locations are fetched, anything else is a
    /// directory; no location means the embedded files.
    pub fn from_location(location: Option<&str>) -> Result<Self> {
        Ok(match location {
            None => Self::Embedded(EmbeddedStyles),
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Self::Http(HttpStyles::new(url)?)
            }
            Some(dir) => Self::Dir(DirStyles::new(crate::util::expand_tilde(dir))),
        })
    }
}

impl StyleProvider for StyleSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        match self {
            Self::Embedded(styles) => styles.fetch(name).await,
            Self::Dir(styles) => styles.fetch(name).await,
            Self::Http(styles) => styles.fetch(name).await,
        }
    }
}
