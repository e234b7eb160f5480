//! Application protocols carried by service ports

use std::fmt;

/// Protocol spoken on a service port
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Protocol {
    Grpc,
    Http,
    Http2,
    Https,
    Tcp,
    Tls,
    Udp,
    Mongo,
    Redis,
    Mysql,
    /// Anything the protocol table does not recognize, including the empty string
    Unsupported,
}

impl Protocol {
    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Grpc => "GRPC",
            Protocol::Http => "HTTP",
            Protocol::Http2 => "HTTP2",
            Protocol::Https => "HTTPS",
            Protocol::Tcp => "TCP",
            Protocol::Tls => "TLS",
            Protocol::Udp => "UDP",
            Protocol::Mongo => "Mongo",
            Protocol::Redis => "Redis",
            Protocol::Mysql => "MySQL",
            Protocol::Unsupported => "UnsupportedProtocol",
        }
    }

    /// Whether traffic on this port is HTTP-based and can be routed at layer 7
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            Protocol::Http | Protocol::Http2 | Protocol::Grpc
        )
    }

    /// Whether traffic on this port is handled as opaque TCP
    pub fn is_tcp(&self) -> bool {
        matches!(
            self,
            Protocol::Tcp
                | Protocol::Https
                | Protocol::Tls
                | Protocol::Mongo
                | Protocol::Redis
                | Protocol::Mysql
        )
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps declared protocol names to [`Protocol`] values.
///
/// Parsing never fails: names outside the table map to
/// [`Protocol::Unsupported`].
pub trait ProtocolParser {
    fn parse(&self, name: &str) -> Protocol;
}

impl<F> ProtocolParser for F
where
    F: Fn(&str) -> Protocol,
{
    fn parse(&self, name: &str) -> Protocol {
        self(name)
    }
}

const PROTOCOL_NAMES: [(&str, Protocol); 10] = [
    ("grpc", Protocol::Grpc),
    ("http", Protocol::Http),
    ("http2", Protocol::Http2),
    ("https", Protocol::Https),
    ("tcp", Protocol::Tcp),
    ("tls", Protocol::Tls),
    ("udp", Protocol::Udp),
    ("mongo", Protocol::Mongo),
    ("redis", Protocol::Redis),
    ("mysql", Protocol::Mysql),
];

/// The built-in, case-insensitive protocol table
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultProtocolParser;

impl ProtocolParser for DefaultProtocolParser {
    fn parse(&self, name: &str) -> Protocol {
        PROTOCOL_NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, protocol)| *protocol)
            .unwrap_or(Protocol::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        let parser = DefaultProtocolParser;
        assert_eq!(parser.parse("http"), Protocol::Http);
        assert_eq!(parser.parse("HTTP"), Protocol::Http);
        assert_eq!(parser.parse("gRPC"), Protocol::Grpc);
        assert_eq!(parser.parse("Mongo"), Protocol::Mongo);
        assert_eq!(parser.parse("MYSQL"), Protocol::Mysql);
        assert_eq!(parser.parse("Http2"), Protocol::Http2);
    }

    #[test]
    fn test_parse_round_trips_canonical_names() {
        let parser = DefaultProtocolParser;
        for (_, protocol) in PROTOCOL_NAMES {
            assert_eq!(parser.parse(protocol.as_str()), protocol);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let parser = DefaultProtocolParser;
        assert_eq!(parser.parse(""), Protocol::Unsupported);
        assert_eq!(parser.parse("smtp"), Protocol::Unsupported);
        assert_eq!(parser.parse(" http"), Protocol::Unsupported);
    }

    #[test]
    fn test_closure_parser() {
        let parser = |_: &str| Protocol::Tcp;
        assert_eq!(parser.parse("http"), Protocol::Tcp);
    }

    #[test]
    fn test_protocol_classes() {
        assert!(Protocol::Http.is_http());
        assert!(Protocol::Grpc.is_http());
        assert!(!Protocol::Https.is_http());
        assert!(Protocol::Https.is_tcp());
        assert!(!Protocol::Udp.is_tcp());
        assert!(!Protocol::Unsupported.is_http());
        assert!(!Protocol::Unsupported.is_tcp());
        assert_eq!(Protocol::Http2.to_string(), "HTTP2");
    }
}
