//! Inbound commands from web and broker subscribers

use alloc::string::String;
use serde::Deserialize;
use serde_json::Value;

/// A validated request from a subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch the bridged line to a new baud rate
    SetBaud(u32),
    /// Transmit a line of text on the bridged line
    Send(String),
}

/// Why an inbound payload was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Not JSON, or required fields missing or of the wrong type
    Malformed,
    /// Well-formed but names a command we do not know
    Unknown,
}

#[derive(Deserialize)]
struct RawCommand {
    command: String,
    #[serde(default)]
    value: Option<Value>,
}

impl Command {
    /// Parse a JSON command payload
    pub fn parse(payload: &[u8]) -> Result<Self, CommandError> {
        let raw: RawCommand =
            serde_json::from_slice(payload).map_err(|_| CommandError::Malformed)?;

        match raw.command.as_str() {
            "setBaud" => {
                let value = raw
                    .value
                    .as_ref()
                    .and_then(Value::as_u64)
                    .ok_or(CommandError::Malformed)?;
                let value = u32::try_from(value).map_err(|_| CommandError::Malformed)?;
                Ok(Command::SetBaud(value))
            }
            "send" => match raw.value {
                Some(Value::String(text)) => Ok(Command::Send(text)),
                _ => Err(CommandError::Malformed),
            },
            _ => Err(CommandError::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_baud() {
        let cmd = Command::parse(br#"{"command":"setBaud","value":57600}"#).unwrap();
        assert_eq!(cmd, Command::SetBaud(57600));
    }

    #[test]
    fn test_parse_send() {
        let cmd = Command::parse(br#"{"command":"send","value":"AT+GMR"}"#).unwrap();
        assert_eq!(cmd, Command::Send(String::from("AT+GMR")));
    }

    #[test]
    fn test_unknown_command() {
        let result = Command::parse(br#"{"command":"reboot"}"#);
        assert_eq!(result, Err(CommandError::Unknown));
    }

    #[test]
    fn test_malformed_payloads() {
        let cases: [&[u8]; 6] = [
            b"not json",
            br#"{"value":9600}"#,
            br#"{"command":"setBaud"}"#,
            br#"{"command":"setBaud","value":"fast"}"#,
            br#"{"command":"setBaud","value":-1}"#,
            br#"{"command":"send","value":42}"#,
        ];
        for payload in cases {
            assert_eq!(Command::parse(payload), Err(CommandError::Malformed));
        }
    }

    #[test]
    fn test_baud_out_of_u32_range() {
        let result = Command::parse(br#"{"command":"setBaud","value":5000000000}"#);
        assert_eq!(result, Err(CommandError::Malformed));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let cmd = Command::parse(br#"{"command":"send","value":"x","id":3}"#).unwrap();
        assert_eq!(cmd, Command::Send(String::from("x")));
    }
}
