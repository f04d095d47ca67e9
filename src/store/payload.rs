//! Form payload for the `storeDocument` action

use crate::config::ApiToken;
use crate::error::Result;
use crate::models::Metadata;

/// REDCap routes external module calls with `content=externalModule`
pub const CONTENT_EXTERNAL_MODULE: &str = "externalModule";
pub const MODULE_PREFIX: &str = "redcap_rag";
pub const ACTION_STORE_DOCUMENT: &str = "storeDocument";
pub const FORMAT_JSON: &str = "json";

/// Build the form fields for storing one document.
///
/// The body goes in `text` because REDCap reserves `content`. `metadata`
/// is only sent when there is at least one entry.
pub fn store_document_form(
    token: &ApiToken,
    title: &str,
    content: &str,
    metadata: Option<&Metadata>,
) -> Result<Vec<(&'static str, String)>> {
    let mut form = vec![
        ("token", token.as_str().to_string()),
        ("content", CONTENT_EXTERNAL_MODULE.to_string()),
        ("prefix", MODULE_PREFIX.to_string()),
        ("action", ACTION_STORE_DOCUMENT.to_string()),
        ("format", FORMAT_JSON.to_string()),
        ("returnFormat", FORMAT_JSON.to_string()),
        ("title", title.to_string()),
        ("text", content.to_string()),
    ];

    if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
        form.push(("metadata", metadata.to_json()?));
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(form: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        form.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_fixed_protocol_fields() {
        let token = ApiToken::new("tok");
        let form = store_document_form(&token, "sec_001", "Body text", None).unwrap();

        assert_eq!(field(&form, "token"), Some("tok"));
        assert_eq!(field(&form, "content"), Some("externalModule"));
        assert_eq!(field(&form, "prefix"), Some("redcap_rag"));
        assert_eq!(field(&form, "action"), Some("storeDocument"));
        assert_eq!(field(&form, "format"), Some("json"));
        assert_eq!(field(&form, "returnFormat"), Some("json"));
        assert_eq!(field(&form, "title"), Some("sec_001"));
        assert_eq!(field(&form, "text"), Some("Body text"));
        assert_eq!(field(&form, "metadata"), None);
    }

    #[test]
    fn test_empty_metadata_not_sent() {
        let token = ApiToken::new("tok");
        let metadata = Metadata::new();
        let form = store_document_form(&token, "t", "c", Some(&metadata)).unwrap();
        assert_eq!(field(&form, "metadata"), None);
    }

    #[test]
    fn test_metadata_serialized_as_json_string() {
        let token = ApiToken::new("tok");
        let mut metadata = Metadata::new();
        metadata.insert("doc_id", "d1");
        metadata.insert("location_page", 9_i64);

        let form = store_document_form(&token, "t", "c", Some(&metadata)).unwrap();
        let sent = field(&form, "metadata").unwrap();
        let decoded: Metadata = serde_json::from_str(sent).unwrap();
        assert_eq!(decoded, metadata);
    }
}
