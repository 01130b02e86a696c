use crate::core::config::TileLoadingConfig;
use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Expands a `{z}/{x}/{y}` URL template, optionally appending an access token.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplateSource {
    template: String,
    token: Option<String>,
}

impl UrlTemplateSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn from_config(config: &TileLoadingConfig) -> Self {
        Self {
            template: config.url_template.clone(),
            token: config.token.clone(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = self
            .template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if let Some(token) = &self.token {
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str("token=");
            url.push_str(token);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_expansion() {
        let source = UrlTemplateSource::new("https://tiles.example/{z}/{x}/{y}.png");
        assert_eq!(
            source.url(TileCoord::new(3, 5, 7)),
            "https://tiles.example/3/5/7.png"
        );
    }

    #[test]
    fn test_token_is_appended_as_query() {
        let source = UrlTemplateSource::new("https://tiles.example/{z}/{x}/{y}").with_token("s3cret");
        assert_eq!(
            source.url(TileCoord::new(1, 0, 1)),
            "https://tiles.example/1/0/1?token=s3cret"
        );

        let source = UrlTemplateSource::new("https://tiles.example/t?z={z}&x={x}&y={y}").with_token("k");
        assert_eq!(
            source.url(TileCoord::new(2, 1, 3)),
            "https://tiles.example/t?z=2&x=1&y=3&token=k"
        );
    }
}
