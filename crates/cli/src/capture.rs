//! Capture lines and the caller-side decode policy
//!
//! ```text
//! # comment
//! 0B 00000007 0005
//! 0x1C 00 00 00 01 ...
//! ```

use anyhow::{bail, Context, Result};
use uodecode_core::{DecodeError, ProtocolEra};
use uodecode_protocol::{decode, Packet};

/// Parse one capture line into a packet id and body
///
/// Returns `None` for blank and comment lines. The body may be split by
/// whitespace; an id without a body is an empty packet.
pub fn parse_line(line: &str) -> Result<Option<(u8, Vec<u8>)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (id, body) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let id = id.trim_start_matches("0x").trim_start_matches("0X");
    let id = u8::from_str_radix(id, 16).with_context(|| format!("bad packet id `{}`", id))?;

    let digits: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let body = hex::decode(&digits).context("bad hex body")?;

    Ok(Some((id, body)))
}

/// What happened to one packet
#[derive(Debug)]
pub enum Outcome {
    Decoded(Packet),
    /// Body exceeded the configured size budget and was not decoded
    Rejected { length: usize },
    /// Decode failed; the packet is dropped
    Failed(DecodeError),
    /// Too many consecutive underruns, the stream can no longer be trusted
    Desync(DecodeError),
}

/// Decode state for one captured connection
pub struct Session {
    era: ProtocolEra,
    max_body_length: usize,
    desync_threshold: u32,
    underruns: u32,
}

impl Session {
    pub fn new(era: ProtocolEra, max_body_length: usize, desync_threshold: u32) -> Self {
        Self {
            era,
            max_body_length,
            desync_threshold,
            underruns: 0,
        }
    }

    /// Decode one packet in arrival order
    pub fn feed(&mut self, packet_id: u8, body: &[u8]) -> Outcome {
        if body.len() > self.max_body_length {
            self.underruns = 0;
            return Outcome::Rejected { length: body.len() };
        }

        match decode(packet_id, body, &self.era) {
            Ok(packet) => {
                self.underruns = 0;
                Outcome::Decoded(packet)
            }
            Err(e) if e.is_underrun() => {
                self.underruns += 1;
                if self.underruns >= self.desync_threshold {
                    Outcome::Desync(e)
                } else {
                    Outcome::Failed(e)
                }
            }
            Err(e) => {
                self.underruns = 0;
                Outcome::Failed(e)
            }
        }
    }
}

/// Run a whole capture, handing each decoded packet to `emit`
///
/// Returns the number of decoded packets, or an error on desync.
pub fn run<F>(content: &str, session: &mut Session, mut emit: F) -> Result<usize>
where
    F: FnMut(usize, u8, &Packet) -> Result<()>,
{
    let mut decoded = 0;

    for (index, line) in content.lines().enumerate() {
        let number = index + 1;
        let Some((packet_id, body)) =
            parse_line(line).with_context(|| format!("line {}", number))?
        else {
            continue;
        };

        match session.feed(packet_id, &body) {
            Outcome::Decoded(packet) => {
                emit(number, packet_id, &packet)?;
                decoded += 1;
            }
            Outcome::Rejected { length } => {
                tracing::warn!(
                    "Line {}: packet 0x{:02X} body of {} bytes exceeds budget, skipped",
                    number,
                    packet_id,
                    length
                );
            }
            Outcome::Failed(e) => {
                tracing::warn!("Line {}: packet 0x{:02X} dropped: {}", number, packet_id, e);
            }
            Outcome::Desync(e) => {
                bail!(
                    "protocol desync at line {} (packet 0x{:02X}): {}",
                    number,
                    packet_id,
                    e
                );
            }
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(threshold: u32) -> Session {
        Session::new(ProtocolEra::default(), 64, threshold)
    }

    #[test]
    fn test_parse_line() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("  # note").unwrap().is_none());
        assert_eq!(
            parse_line("0B 00000007 00 05").unwrap(),
            Some((0x0B, vec![0, 0, 0, 7, 0, 5]))
        );
        assert_eq!(parse_line("0x55").unwrap(), Some((0x55, vec![])));
        assert!(parse_line("ZZ 00").is_err());
        assert!(parse_line("0B 0").is_err());
    }

    #[test]
    fn test_underruns_reset_on_success() {
        let mut session = session(2);
        assert!(matches!(session.feed(0x0B, &[0, 0]), Outcome::Failed(_)));
        assert!(matches!(
            session.feed(0x0B, &[0, 0, 0, 7, 0, 5]),
            Outcome::Decoded(_)
        ));
        assert!(matches!(session.feed(0x0B, &[0, 0]), Outcome::Failed(_)));
        assert!(matches!(session.feed(0x0B, &[0]), Outcome::Desync(_)));
    }

    #[test]
    fn test_oversized_body_rejected() {
        let mut session = session(2);
        let body = vec![0u8; 65];
        assert!(matches!(
            session.feed(0x0B, &body),
            Outcome::Rejected { length: 65 }
        ));
    }

    #[test]
    fn test_run_stops_on_desync() {
        let capture = "# two good, then garbage\n0B 00000007 0005\n55\n0B 00\n0B 00\n0B 00000007 0005\n";
        let mut lines = Vec::new();
        let err = run(capture, &mut session(2), |line, _, _| {
            lines.push(line);
            Ok(())
        })
        .unwrap_err();

        assert_eq!(lines, vec![2, 3]);
        assert!(err.to_string().contains("line 5"));
    }

    #[test]
    fn test_run_skips_unknown_ids() {
        let capture = "02 00\n0B 00000007 0005\n";
        let decoded = run(capture, &mut session(1), |_, _, _| Ok(())).unwrap();
        assert_eq!(decoded, 1);
    }
}
