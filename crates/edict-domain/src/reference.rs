//! Storage references - turning a document URL into an object key

use percent_encoding::percent_decode_str;

/// Extension of the only document type the pipeline accepts
pub const PDF_EXTENSION: &str = ".pdf";

/// Derive an object-storage key from a document reference
///
/// The reference is URL-decoded first, then the scheme and host are
/// dropped along with any query string or fragment, and finally the leading
/// slashes are stripped. A plain key passes through unchanged. Returns
/// `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use edict_domain::storage_key;
///
/// assert_eq!(storage_key("https://x/a%2Fb.pdf").as_deref(), Some("a/b.pdf"));
/// assert_eq!(storage_key("editais/2024/edital.pdf").as_deref(), Some("editais/2024/edital.pdf"));
/// assert_eq!(storage_key("https://bucket.s3.amazonaws.com/"), None);
/// ```
pub fn storage_key(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let decoded = percent_decode_str(reference).decode_utf8_lossy();
    let path = strip_authority(&decoded);
    let path = path
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let key = path.trim_start_matches('/');

    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Check that a key names a PDF (case-insensitive suffix match)
///
/// # Examples
///
/// ```
/// use edict_domain::is_pdf_key;
///
/// assert!(is_pdf_key("a/b.PDF"));
/// assert!(!is_pdf_key("a/b.docx"));
/// ```
pub fn is_pdf_key(key: &str) -> bool {
    key.to_ascii_lowercase().ends_with(PDF_EXTENSION)
}

/// Drop `scheme://host` or a bare `//host` prefix, keeping the path
fn strip_authority(url: &str) -> &str {
    let after_scheme = match url.find("://") {
        Some(idx) if is_scheme(&url[..idx]) => Some(&url[idx + 3..]),
        _ => url.strip_prefix("//"),
    };

    match after_scheme {
        Some(rest) => match rest.find('/') {
            Some(slash) => &rest[slash..],
            None => "",
        },
        None => url,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
    use proptest::prelude::*;

    #[test]
    fn test_encoded_url() {
        assert_eq!(storage_key("https://x/a%2Fb.pdf").as_deref(), Some("a/b.pdf"));
    }

    #[test]
    fn test_s3_virtual_host_url() {
        let url = "https://bids.s3.us-east-1.amazonaws.com/editais/2024/Edital%20N%C2%BA%2012.pdf";
        assert_eq!(storage_key(url).as_deref(), Some("editais/2024/Edital Nº 12.pdf"));
    }

    #[test]
    fn test_encoded_scheme_separator() {
        assert_eq!(
            storage_key("https%3A%2F%2Fhost%2Fdocs%2Fa.pdf").as_deref(),
            Some("docs/a.pdf")
        );
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        assert_eq!(
            storage_key("https://host/a/b.pdf?X-Amz-Signature=abc#page=2").as_deref(),
            Some("a/b.pdf")
        );
    }

    #[test]
    fn test_plain_key_and_leading_slashes() {
        assert_eq!(storage_key("a/b.pdf").as_deref(), Some("a/b.pdf"));
        assert_eq!(storage_key("///a/b.pdf").as_deref(), Some("a/b.pdf"));
        assert_eq!(storage_key("//host/a/b.pdf").as_deref(), Some("a/b.pdf"));
    }

    #[test]
    fn test_empty_references() {
        assert_eq!(storage_key(""), None);
        assert_eq!(storage_key("   "), None);
        assert_eq!(storage_key("https://host"), None);
        assert_eq!(storage_key("https://host/"), None);
    }

    #[test]
    fn test_is_pdf_key() {
        assert!(is_pdf_key("edital.pdf"));
        assert!(is_pdf_key("EDITAL.Pdf"));
        assert!(!is_pdf_key("edital.pdf.zip"));
        assert!(!is_pdf_key("pdf"));
    }

    fn arb_key() -> impl Strategy<Value = String> {
        proptest::collection::vec("[a-zA-Z0-9 _.çãé-]{1,12}", 1..5)
            .prop_map(|segments| format!("{}.pdf", segments.join("/")))
    }

    proptest! {
        #[test]
        fn prop_decoding_is_idempotent(key in arb_key()) {
            let encoded = format!("https://bucket.example.com/{}", utf8_percent_encode(&key, NON_ALPHANUMERIC));
            let decoded = format!("https://bucket.example.com/{}", key);

            let from_encoded = storage_key(&encoded);
            let from_decoded = storage_key(&decoded);

            prop_assert_eq!(&from_encoded, &from_decoded);
            prop_assert_eq!(from_encoded.as_deref(), Some(key.as_str()));
        }

        #[test]
        fn prop_key_is_a_fixed_point(key in arb_key()) {
            let once = storage_key(&key);
            let twice = once.as_deref().and_then(storage_key);
            prop_assert_eq!(once, twice);
        }
    }
}
