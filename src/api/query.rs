// Query string parsing module
// Decodes urlencoded key=value pairs from the request URI

use std::collections::HashMap;

/// Parse a request query string into decoded key/value pairs.
///
/// Later duplicates overwrite earlier ones. Keys without '=' map to the
/// empty string, as browsers send them.
pub fn parse(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let Some(query) = query else {
        return params;
    };

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        params.insert(decode_component(key), decode_component(value));
    }

    params
}

/// Percent-decode one urlencoded component, with '+' as space.
///
/// Malformed escapes are passed through literally rather than rejected;
/// the validation layer owns deciding what a bad value means.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' => match hex_pair(bytes.get(i + 1).copied(), bytes.get(i + 2).copied()) {
                Some(byte) => {
                    decoded.push(byte);
                    i += 3;
                }
                None => {
                    decoded.push(b'%');
                    i += 1;
                }
            },
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_pair(high: Option<u8>, low: Option<u8>) -> Option<u8> {
    let high = (high? as char).to_digit(16)?;
    let low = (low? as char).to_digit(16)?;
    u8::try_from(high * 16 + low).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_pairs() {
        let params = parse(Some("courtType=Tennis&studentId=S1"));
        assert_eq!(params.get("courtType").map(String::as_str), Some("Tennis"));
        assert_eq!(params.get("studentId").map(String::as_str), Some("S1"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_parse_percent_encoded_timestamp() {
        // encodeURIComponent("2026-03-01T09:00")
        let params = parse(Some("startTime=2026-03-01T09%3A00"));
        assert_eq!(
            params.get("startTime").map(String::as_str),
            Some("2026-03-01T09:00")
        );
    }

    #[test]
    fn test_parse_plus_as_space() {
        let params = parse(Some("studentId=Jane+Doe"));
        assert_eq!(params.get("studentId").map(String::as_str), Some("Jane Doe"));
    }

    #[test]
    fn test_parse_empty_and_valueless() {
        assert!(parse(None).is_empty());
        assert!(parse(Some("")).is_empty());

        let params = parse(Some("flag&courtType=Tennis"));
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
        assert_eq!(params.get("courtType").map(String::as_str), Some("Tennis"));
    }

    #[test]
    fn test_malformed_escape_passes_through() {
        let params = parse(Some("studentId=50%25&note=%ZZ"));
        assert_eq!(params.get("studentId").map(String::as_str), Some("50%"));
        assert_eq!(params.get("note").map(String::as_str), Some("%ZZ"));
    }
}
