use cuerip_engine::FetchConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::info;

/// Parse a header string in format "Name: Value" and add it to the HeaderMap
pub fn parse_and_add_header(headers: &mut HeaderMap, header_str: &str) {
    // Find the first colon which separates name and value
    let Some(colon_pos) = header_str.find(':') else {
        tracing::warn!(
            "Invalid header format: '{}'. Expected 'Name: Value'",
            header_str
        );
        return;
    };

    let name = header_str[..colon_pos].trim();
    let value = header_str[colon_pos + 1..].trim();

    // Try to create a header name and value
    let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
        tracing::warn!("Invalid header name: '{}'", name);
        return;
    };

    let Ok(header_value) = HeaderValue::from_str(value) else {
        tracing::warn!("Invalid header value: '{}'", value);
        return;
    };

    info!("Adding header: {}: {}", name, value);
    headers.insert(header_name, header_value);
}

/// Build the request header map: browser-like defaults plus user overrides
pub fn build_headers(header_strings: &[String]) -> HeaderMap {
    let mut headers = FetchConfig::get_default_headers();

    for header_str in header_strings {
        parse_and_add_header(&mut headers, header_str);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_header_is_added() {
        let mut headers = HeaderMap::new();
        parse_and_add_header(&mut headers, "Referer: https://player.example.com/");
        assert_eq!(
            headers.get("Referer").unwrap().to_str().unwrap(),
            "https://player.example.com/"
        );
    }

    #[test]
    fn test_malformed_headers_are_skipped() {
        let mut headers = HeaderMap::new();
        parse_and_add_header(&mut headers, "NoColonHere");
        parse_and_add_header(&mut headers, "Bad Name!: value");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_build_headers_keeps_defaults_and_overrides() {
        let headers = build_headers(&[
            "X-Api-Key: secret".to_string(),
            "Accept: application/vnd.apple.mpegurl".to_string(),
        ]);

        assert_eq!(
            headers.get("X-Api-Key").unwrap().to_str().unwrap(),
            "secret"
        );
        // User values replace defaults of the same name
        assert_eq!(
            headers
                .get(reqwest::header::ACCEPT)
                .unwrap()
                .to_str()
                .unwrap(),
            "application/vnd.apple.mpegurl"
        );
        assert!(headers.get(reqwest::header::ACCEPT_ENCODING).is_some());
    }
}
