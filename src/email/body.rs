use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use log::{debug, warn};
use regex::Regex;
use std::sync::OnceLock;

use super::common::BodyPart;

/// Gmail body data is base64url, with or without padding
const BODY_DATA_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Flatten a payload tree into all of its human-readable text.
///
/// Children are visited in order and concatenated without separator.
/// `text/plain` leaves are appended verbatim, `text/html` leaves contribute
/// only their visible text. Anything else contributes nothing.
pub fn flatten_body(part: &BodyPart) -> String {
    let mut out = String::new();
    flatten_into(part, &mut out);
    out
}

fn flatten_into(part: &BodyPart, out: &mut String) {
    match part {
        BodyPart::Branch { parts, .. } => {
            for child in parts {
                flatten_into(child, out);
            }
        }
        BodyPart::Leaf { mime_type, data } => {
            let Some(data) = data else {
                return;
            };

            let essence = mime_essence(mime_type);
            if essence != "text/plain" && essence != "text/html" {
                debug!("Skipping body part of type {}", mime_type);
                return;
            }

            let Some(text) = decode_body_data(data) else {
                return;
            };

            if essence == "text/plain" {
                out.push_str(&text);
            } else {
                out.push_str(&html_to_text(&text));
            }
        }
    }
}

/// Lowercased type/subtype without parameters
fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Decode base64url body data; invalid UTF-8 is replaced, never fatal
pub fn decode_body_data(data: &str) -> Option<String> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    match BODY_DATA_ENGINE.decode(compact.as_bytes()) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            warn!("Undecodable body data ({} chars): {}", data.len(), e);
            None
        }
    }
}

fn hidden_block_regexes() -> &'static [Regex; 3] {
    static RE: OnceLock<[Regex; 3]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid script regex"),
            Regex::new(r"(?is)<style\b.*?</style\s*>").expect("valid style regex"),
            Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"),
        ]
    })
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

/// Visible text of an HTML document, text runs joined by a single space
pub fn html_to_text(html: &str) -> String {
    let mut visible = html.to_string();
    for re in hidden_block_regexes() {
        visible = re.replace_all(&visible, " ").into_owned();
    }

    tag_regex()
        .split(&visible)
        .map(decode_html_entities)
        .map(|run| run.trim().to_string())
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_html_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> Option<String> {
        Some(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(text))
    }

    #[test]
    fn test_plain_leaf_is_verbatim() {
        let part = BodyPart::leaf("text/plain; charset=UTF-8", encode("Hello\nthere"));
        assert_eq!(flatten_body(&part), "Hello\nthere");
    }

    #[test]
    fn test_html_leaf_keeps_only_visible_text() {
        let html = "<html><head><style>p { color: red; }</style></head>\
                    <body><p>Thanks for applying</p><b>at</b> <i>Globex</i>\
                    <script>var x = '<p>';</script><!-- hidden --></body></html>";
        let part = BodyPart::leaf("text/html", encode(html));

        let text = flatten_body(&part);
        assert_eq!(text, "Thanks for applying at Globex");
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_html_entities_are_decoded() {
        assert_eq!(html_to_text("<p>Tom&nbsp;&amp;&nbsp;Jerry</p>"), "Tom & Jerry");
    }

    #[test]
    fn test_branch_concatenates_children_in_order() {
        let tree = BodyPart::branch(
            "multipart/mixed",
            vec![
                BodyPart::branch(
                    "multipart/alternative",
                    vec![
                        BodyPart::leaf("text/plain", encode("first ")),
                        BodyPart::leaf("text/html", encode("<div>second</div>")),
                    ],
                ),
                BodyPart::leaf("application/pdf", encode("%PDF-1.4")),
                BodyPart::leaf("text/plain", None),
                BodyPart::leaf("text/plain", encode(" third")),
            ],
        );

        assert_eq!(flatten_body(&tree), "first second third");
    }

    #[test]
    fn test_padded_and_unpadded_data_both_decode() {
        let padded = base64::engine::general_purpose::URL_SAFE.encode("ab");
        assert!(padded.ends_with('='));
        assert_eq!(decode_body_data(&padded).as_deref(), Some("ab"));
        assert_eq!(decode_body_data("YWI").as_deref(), Some("ab"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let data = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode([b'o', b'k', 0xff]);
        assert_eq!(decode_body_data(&data).as_deref(), Some("ok\u{FFFD}"));
    }

    #[test]
    fn test_undecodable_base64_contributes_nothing() {
        let part = BodyPart::leaf("text/plain", Some("!!not base64!!".to_string()));
        assert_eq!(flatten_body(&part), "");
    }
}
