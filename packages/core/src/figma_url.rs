// ABOUTME: Canonical parsing of Figma share links
// ABOUTME: Extracts the file key from /file, /design or /proto paths and the optional node-id

use thiserror::Error;
use url::Url;

const FILE_PATH_MARKERS: &[&str] = &["file", "design", "proto"];

#[derive(Error, Debug, PartialEq)]
pub enum FigmaUrlError {
    #[error("Not a valid URL: {0}")]
    Malformed(String),

    #[error("Not a Figma URL: {0}")]
    NotFigma(String),

    #[error("No file key found in URL")]
    MissingFileKey,
}

/// File key and optional node id referenced by a Figma link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigmaLink {
    pub file_key: String,
    pub node_id: Option<String>,
}

impl FigmaLink {
    pub fn parse(input: &str) -> Result<Self, FigmaUrlError> {
        let url = Url::parse(input.trim()).map_err(|e| FigmaUrlError::Malformed(e.to_string()))?;

        let host = url.host_str().unwrap_or_default();
        if host != "figma.com" && !host.ends_with(".figma.com") {
            return Err(FigmaUrlError::NotFigma(host.to_string()));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        let file_key = match segments.as_slice() {
            [marker, key, ..] if FILE_PATH_MARKERS.contains(marker) && is_file_key(key) => {
                key.to_string()
            }
            _ => return Err(FigmaUrlError::MissingFileKey),
        };

        // query_pairs already percent-decodes, so "1%3A2" arrives as "1:2"
        let node_id = url
            .query_pairs()
            .find(|(name, _)| name == "node-id")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        Ok(Self { file_key, node_id })
    }
}

fn is_file_key(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.figma.com/file/AbC123/My-App", "AbC123")]
    #[case("https://www.figma.com/design/XyZ789/My-App?t=1", "XyZ789")]
    #[case("https://figma.com/proto/Key42/Prototype", "Key42")]
    #[case("https://www.figma.com/file/AbC123", "AbC123")]
    fn test_parses_file_key(#[case] input: &str, #[case] expected: &str) {
        let link = FigmaLink::parse(input).unwrap();
        assert_eq!(link.file_key, expected);
        assert_eq!(link.node_id, None);
    }

    #[rstest]
    #[case("https://www.figma.com/design/AbC123/App?node-id=12-34&t=x", "12-34")]
    #[case("https://www.figma.com/file/AbC123/App?node-id=12%3A34", "12:34")]
    fn test_parses_node_id(#[case] input: &str, #[case] expected: &str) {
        let link = FigmaLink::parse(input).unwrap();
        assert_eq!(link.node_id.as_deref(), Some(expected));
    }

    #[test]
    fn test_rejects_non_figma_host() {
        assert_eq!(
            FigmaLink::parse("https://example.com/file/AbC123/App"),
            Err(FigmaUrlError::NotFigma("example.com".to_string()))
        );
    }

    #[test]
    fn test_rejects_unknown_path() {
        assert_eq!(
            FigmaLink::parse("https://www.figma.com/community/plugin/123"),
            Err(FigmaUrlError::MissingFileKey)
        );
        assert_eq!(
            FigmaLink::parse("https://www.figma.com/file/bad-key!/App"),
            Err(FigmaUrlError::MissingFileKey)
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            FigmaLink::parse("not a url"),
            Err(FigmaUrlError::Malformed(_))
        ));
    }
}
