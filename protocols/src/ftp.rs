//! FTP control-channel reply handling.
//!
//! Reply codes: <https://en.wikipedia.org/wiki/List_of_FTP_server_return_codes>

/// Reply code sent by a server that is ready for a new user.
pub const SERVICE_READY: u16 = 220;

/// Extracts the three-digit reply code from a control-channel line.
///
/// Multiline replies mark continuation lines with a dash after the code
/// (`220-...`); the code itself parses the same either way.
pub fn parse_reply_code(line: &str) -> Option<u16> {
    let digits: &str = line.get(0..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_greeting() {
        assert_eq!(parse_reply_code("220 ProFTPD Server ready.\r\n"), Some(220));
    }

    #[test]
    fn parses_a_multiline_greeting_marker() {
        assert_eq!(parse_reply_code("220-Welcome\r\n"), Some(220));
    }

    #[test]
    fn parses_other_reply_codes() {
        assert_eq!(parse_reply_code("421 Too many connections\r\n"), Some(421));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_reply_code(""), None);
        assert_eq!(parse_reply_code("2x"), None);
        assert_eq!(parse_reply_code("hello"), None);
        assert_eq!(parse_reply_code("SSH-2.0-OpenSSH"), None);
    }
}
