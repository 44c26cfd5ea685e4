//! # Credential Helper Protocol
//!
//! Reads and writes the `key=value` records git exchanges with credential
//! helpers on stdin/stdout. A record ends at the first blank line or at end
//! of input.
//!
//! Only `protocol`, `host`, `path`, `username` and `password` are understood;
//! any other key git sends (`capability[]`, `wwwauth[]`, ...) is skipped.
//! Each line is split at its first `=`, so values may themselves contain `=`.
//! Values containing a line feed, carriage return or NUL cannot be represented
//! and are rejected by [`write`] rather than emitted as a corrupt record.

use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// One credential record as exchanged with git
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
  pub protocol: String,
  pub host: String,
  pub path: String,
  pub username: String,
  pub password: String,
}

impl Credential {
  /// Fields in wire order
  fn fields(&self) -> [(&'static str, &str); 5] {
    [
      ("protocol", self.protocol.as_str()),
      ("host", self.host.as_str()),
      ("path", self.path.as_str()),
      ("username", self.username.as_str()),
      ("password", self.password.as_str()),
    ]
  }

  fn field_mut(&mut self, key: &str) -> Option<&mut String> {
    match key {
      "protocol" => Some(&mut self.protocol),
      "host" => Some(&mut self.host),
      "path" => Some(&mut self.path),
      "username" => Some(&mut self.username),
      "password" => Some(&mut self.password),
      _ => None,
    }
  }
}

/// Parse one record from `reader`
pub fn parse<R: BufRead>(reader: R) -> Result<Credential> {
  let mut credential = Credential::default();

  for line in reader.lines() {
    let line = line.map_err(Error::ProtocolRead)?;
    if line.is_empty() {
      break;
    }

    let Some((key, value)) = line.split_once('=') else {
      continue;
    };

    if let Some(field) = credential.field_mut(key) {
      *field = value.to_string();
    }
  }

  Ok(credential)
}

/// Write `credential` as one record, omitting empty fields
///
/// The record is validated before anything is written, so an unencodable
/// value never produces partial output.
pub fn write<W: Write>(mut writer: W, credential: &Credential) -> Result<()> {
  let fields = credential.fields();

  if let Some((field, _)) = fields.iter().find(|(_, value)| value.contains(['\n', '\r', '\0'])) {
    return Err(Error::UnencodableValue { field: *field });
  }

  let mut record = String::new();
  for (key, value) in fields.iter().filter(|(_, value)| !value.is_empty()) {
    record.push_str(key);
    record.push('=');
    record.push_str(value);
    record.push('\n');
  }
  record.push('\n');

  writer.write_all(record.as_bytes()).map_err(Error::ProtocolWrite)?;
  writer.flush().map_err(Error::ProtocolWrite)
}

#[cfg(test)]
mod tests {
  use std::io::{self, BufReader, Cursor, Read};

  use proptest::prelude::*;

  use super::*;

  fn parse_str(input: &str) -> Credential {
    parse(Cursor::new(input.as_bytes())).unwrap()
  }

  #[test]
  fn parses_a_full_record() {
    let cred = parse_str("protocol=https\nhost=gitlab.com\npath=org1/repo.git\nusername=oauth2\npassword=glpat-x\n\n");

    assert_eq!(
      cred,
      Credential {
        protocol: "https".into(),
        host: "gitlab.com".into(),
        path: "org1/repo.git".into(),
        username: "oauth2".into(),
        password: "glpat-x".into(),
      }
    );
  }

  #[test]
  fn stops_at_the_first_blank_line() {
    let cred = parse_str("host=gitlab.com\n\nhost=github.com\n");
    assert_eq!(cred.host, "gitlab.com");
  }

  #[test]
  fn accepts_end_of_input_without_terminator() {
    let cred = parse_str("protocol=https\nhost=example.com");
    assert_eq!(cred.protocol, "https");
    assert_eq!(cred.host, "example.com");
  }

  #[test]
  fn ignores_unknown_keys_and_lines_without_separator() {
    let cred = parse_str("capability[]=authtype\nwwwauth[]=Basic realm=x\ngarbage\nhost=example.com\n\n");
    assert_eq!(
      cred,
      Credential {
        host: "example.com".into(),
        ..Default::default()
      }
    );
  }

  #[test]
  fn keeps_equals_signs_inside_values() {
    let cred = parse_str("password=abc=def==\n\n");
    assert_eq!(cred.password, "abc=def==");
  }

  #[test]
  fn empty_input_yields_empty_credential() {
    assert_eq!(parse_str(""), Credential::default());
  }

  struct FailingReader;

  impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
      Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))
    }
  }

  #[test]
  fn read_failure_is_a_protocol_read_error() {
    let err = parse(BufReader::new(FailingReader)).unwrap_err();
    assert!(matches!(err, Error::ProtocolRead(_)));
  }

  #[test]
  fn writes_non_empty_fields_in_fixed_order() {
    let cred = Credential {
      protocol: "https".into(),
      host: "github.com".into(),
      path: String::new(),
      username: "x-access-token".into(),
      password: "ghp_123".into(),
    };

    let mut out = Vec::new();
    write(&mut out, &cred).unwrap();

    assert_eq!(
      String::from_utf8(out).unwrap(),
      "protocol=https\nhost=github.com\nusername=x-access-token\npassword=ghp_123\n\n"
    );
  }

  #[test]
  fn empty_credential_writes_only_the_terminator() {
    let mut out = Vec::new();
    write(&mut out, &Credential::default()).unwrap();
    assert_eq!(out, b"\n");
  }

  #[test]
  fn rejects_newlines_without_writing_anything() {
    let cred = Credential {
      host: "example.com".into(),
      password: "line1\nline2".into(),
      ..Default::default()
    };

    let mut out = Vec::new();
    let err = write(&mut out, &cred).unwrap_err();

    assert!(matches!(err, Error::UnencodableValue { field: "password" }));
    assert!(out.is_empty());
  }

  #[test]
  fn rejects_carriage_returns() {
    let cred = Credential {
      host: "example.com".into(),
      password: "secret\r".into(),
      ..Default::default()
    };

    let mut out = Vec::new();
    let err = write(&mut out, &cred).unwrap_err();

    assert!(matches!(err, Error::UnencodableValue { field: "password" }));
    assert!(out.is_empty());
  }

  #[test]
  fn round_trips_a_record() {
    let cred = Credential {
      protocol: "https".into(),
      host: "git.example.com:8443".into(),
      path: "team/project.git".into(),
      username: "alice".into(),
      password: "s3cr=t".into(),
    };

    let mut out = Vec::new();
    write(&mut out, &cred).unwrap();

    assert_eq!(parse(Cursor::new(out)).unwrap(), cred);
  }

  /// Any text the protocol can carry: no line breaks, no NUL
  fn encodable() -> impl Strategy<Value = String> {
    r"[^\r\n\x00]{0,24}"
  }

  fn arb_credential() -> impl Strategy<Value = Credential> {
    (encodable(), encodable(), encodable(), encodable(), encodable()).prop_map(
      |(protocol, host, path, username, password)| Credential {
        protocol,
        host,
        path,
        username,
        password,
      },
    )
  }

  proptest! {
    #[test]
    fn written_records_parse_back_unchanged(cred in arb_credential()) {
      let mut out = Vec::new();
      write(&mut out, &cred).unwrap();

      prop_assert_eq!(parse(Cursor::new(out)).unwrap(), cred);
    }

    #[test]
    fn line_breaks_and_nul_are_never_written(
      prefix in encodable(),
      suffix in encodable(),
      bad in prop::sample::select(vec!['\n', '\r', '\0']),
    ) {
      let cred = Credential {
        host: "example.com".into(),
        username: format!("{prefix}{bad}{suffix}"),
        ..Default::default()
      };

      let mut out = Vec::new();
      let err = write(&mut out, &cred).unwrap_err();

      let is_unencodable_username = matches!(err, Error::UnencodableValue { field: "username" });
      prop_assert!(is_unencodable_username);
      prop_assert!(out.is_empty());
    }
  }
}
