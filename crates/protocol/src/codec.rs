use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{self, BufRead, Write};

/// Header lines longer than this are a malformed client, not a huge request.
const MAX_HEADER_LINE_BYTES: usize = 8 * 1024;

/// Caps a single message body; generous for any realistic changeset or
/// search pattern while still bounding a hostile `Content-Length`.
const MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

fn read_line_limited<R: BufRead>(reader: &mut R, max_len: usize) -> io::Result<Option<String>> {
    let mut buf = Vec::<u8>::new();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            if buf.is_empty() {
                return Ok(None);
            }
            break;
        }

        let newline_pos = available.iter().position(|&b| b == b'\n');
        let take = newline_pos.map(|pos| pos + 1).unwrap_or(available.len());
        if buf.len() + take > max_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("header line exceeds maximum size ({max_len} bytes)"),
            ));
        }

        buf.extend_from_slice(&available[..take]);
        reader.consume(take);
        if newline_pos.is_some() {
            break;
        }
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "header line is not UTF-8"))
}

/// Reads one `Content-Length:`-framed message body from `reader`:
///
/// ```text
/// Content-Length: 123\r\n
/// \r\n
/// { ...json... }
/// ```
///
/// Returns `Ok(None)` on a clean EOF before any header line was read (the
/// peer closed the stream between messages, not mid-message).
pub fn read_raw_message<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut content_length: Option<usize> = None;
    let mut saw_header_line = false;

    loop {
        let Some(line) = read_line_limited(reader, MAX_HEADER_LINE_BYTES)? else {
            if !saw_header_line {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "EOF while reading message headers",
            ));
        };
        saw_header_line = true;

        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }

        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("Content-Length")
        {
            let value = value.trim();
            content_length = Some(value.parse::<usize>().map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid Content-Length {value:?}: {err}"),
                )
            })?);
        }
    }

    let Some(content_length) = content_length else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "message missing Content-Length header",
        ));
    };

    if content_length > MAX_MESSAGE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Content-Length {content_length} exceeds maximum allowed size {MAX_MESSAGE_BYTES}"
            ),
        ));
    }

    let mut buf = vec![0u8; content_length];
    reader.read_exact(&mut buf)?;
    Ok(Some(buf))
}

/// Writes `json_bytes` framed with a `Content-Length` header.
pub fn write_raw_message<W: Write>(writer: &mut W, json_bytes: &[u8]) -> io::Result<()> {
    write!(writer, "Content-Length: {}\r\n\r\n", json_bytes.len())?;
    writer.write_all(json_bytes)?;
    writer.flush()
}

/// Reads one framed message and deserializes it as JSON. `Ok(None)` means a
/// clean EOF between messages; a present-but-malformed body is an `Err`.
pub fn read_json_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> io::Result<Option<T>> {
    let Some(bytes) = read_raw_message(reader)? else {
        return Ok(None);
    };
    let parsed = serde_json::from_slice(&bytes)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    Ok(Some(parsed))
}

/// Serializes `message` as JSON and writes it framed.
pub fn write_json_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> io::Result<()> {
    let bytes = serde_json::to_vec(message)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    write_raw_message(writer, &bytes)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
