//! Minimal `multipart/form-data` reader for buffered responses.

use super::options::{FormData, FormDataValue};

/// Parse a multipart body using the boundary from `content_type`.
pub fn parse_multipart(content_type: &str, body: &[u8]) -> Result<FormData, String> {
    let boundary = content_type
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("boundary="))
        .map(|boundary| boundary.trim_matches('"'))
        .filter(|boundary| !boundary.is_empty())
        .ok_or_else(|| "missing multipart boundary".to_string())?;
    let delimiter = format!("--{}", boundary);
    let delimiter = delimiter.as_bytes();

    let mut form = FormData::new();
    let mut rest = match find(body, delimiter) {
        Some(start) => &body[start + delimiter.len()..],
        None => return Err("multipart body has no parts".to_string()),
    };

    loop {
        if rest.starts_with(b"--") {
            return Ok(form);
        }
        let end = find(rest, delimiter).ok_or_else(|| "unterminated multipart body".to_string())?;
        let part = trim_crlf(&rest[..end]);
        let (name, value) = parse_part(part)?;
        form.append(name, value);
        rest = &rest[end + delimiter.len()..];
    }
}

fn parse_part(part: &[u8]) -> Result<(String, FormDataValue), String> {
    let split = find(part, b"\r\n\r\n").ok_or_else(|| "part has no header block".to_string())?;
    let head = String::from_utf8_lossy(&part[..split]);
    let content = &part[split + 4..];

    let mut name = None;
    let mut filename = None;
    let mut content_type = None;

    for line in head.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if key.trim().eq_ignore_ascii_case("content-disposition") {
            for param in value.split(';').map(str::trim) {
                if let Some(v) = param.strip_prefix("name=") {
                    name = Some(v.trim_matches('"').to_string());
                } else if let Some(v) = param.strip_prefix("filename=") {
                    filename = Some(v.trim_matches('"').to_string());
                }
            }
        } else if key.trim().eq_ignore_ascii_case("content-type") {
            content_type = Some(value.to_string());
        }
    }

    let name = name.ok_or_else(|| "part has no name".to_string())?;
    let value = if filename.is_none() && content_type.is_none() {
        FormDataValue::Text(String::from_utf8_lossy(content).into_owned())
    } else {
        FormDataValue::File {
            filename,
            content_type,
            bytes: content.to_vec(),
        }
    };
    Ok((name, value))
}

fn trim_crlf(part: &[u8]) -> &[u8] {
    let part = part.strip_prefix(b"\r\n").unwrap_or(part);
    part.strip_suffix(b"\r\n").unwrap_or(part)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "--XyZ\r\n\
        Content-Disposition: form-data; name=\"title\"\r\n\
        \r\n\
        Hello\r\n\
        --XyZ\r\n\
        Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        abc\r\n\
        --XyZ--\r\n";

    #[test]
    fn test_parses_text_and_file_parts() {
        let form = parse_multipart("multipart/form-data; boundary=XyZ", BODY.as_bytes()).unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("title").and_then(|v| v.as_text()), Some("Hello"));
        assert_eq!(
            form.get("file"),
            Some(&FormDataValue::File {
                filename: Some("a.txt".into()),
                content_type: Some("text/plain".into()),
                bytes: b"abc".to_vec(),
            })
        );
    }

    #[test]
    fn test_missing_boundary() {
        assert!(parse_multipart("multipart/form-data", BODY.as_bytes()).is_err());
    }

    #[test]
    fn test_unterminated() {
        let body = "--XyZ\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n";
        assert!(parse_multipart("multipart/form-data; boundary=XyZ", body.as_bytes()).is_err());
    }
}
