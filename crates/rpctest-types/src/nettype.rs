//! Transport protocols and the nettype names that select them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A concrete transport protocol an endpoint is bound on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// A named transport family a service can be registered under.
///
/// `netpath` and `visible` cover every visible transport; the `circuit_*`
/// names select connection-oriented transports and the `datagram_*` names
/// connectionless ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nettype {
    Netpath,
    Visible,
    CircuitN,
    CircuitV,
    DatagramN,
    DatagramV,
    Tcp,
    Udp,
}

impl Nettype {
    /// Nettype used when the caller expresses no preference.
    pub const DEFAULT: Self = Self::Netpath;

    /// Protocols this nettype binds, in binding order.
    pub fn protocols(self) -> &'static [Protocol] {
        match self {
            Self::Netpath | Self::Visible => &[Protocol::Tcp, Protocol::Udp],
            Self::CircuitN | Self::CircuitV | Self::Tcp => &[Protocol::Tcp],
            Self::DatagramN | Self::DatagramV | Self::Udp => &[Protocol::Udp],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Netpath => "netpath",
            Self::Visible => "visible",
            Self::CircuitN => "circuit_n",
            Self::CircuitV => "circuit_v",
            Self::DatagramN => "datagram_n",
            Self::DatagramV => "datagram_v",
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }

    /// Resolve an optional nettype name, `None` meaning no preference.
    pub fn resolve(name: Option<&str>) -> Result<Self, NettypeError> {
        name.map_or(Ok(Self::DEFAULT), str::parse)
    }
}

impl std::fmt::Display for Nettype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The given name is not a known nettype.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown nettype \"{0}\"")]
pub struct NettypeError(pub String);

impl FromStr for Nettype {
    type Err = NettypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "netpath" => Ok(Self::Netpath),
            "visible" => Ok(Self::Visible),
            "circuit_n" => Ok(Self::CircuitN),
            "circuit_v" => Ok(Self::CircuitV),
            "datagram_n" => Ok(Self::DatagramN),
            "datagram_v" => Ok(Self::DatagramV),
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            _ => Err(NettypeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() {
        assert_eq!("tcp".parse::<Nettype>().unwrap(), Nettype::Tcp);
        assert_eq!("circuit_v".parse::<Nettype>().unwrap(), Nettype::CircuitV);
        assert_eq!("DATAGRAM_N".parse::<Nettype>().unwrap(), Nettype::DatagramN);
    }

    #[test]
    fn unknown_name_is_error() {
        let err = "carrier-pigeon".parse::<Nettype>().unwrap_err();
        assert_eq!(err.to_string(), "unknown nettype \"carrier-pigeon\"");
    }

    #[test]
    fn no_preference_is_netpath() {
        assert_eq!(Nettype::resolve(None).unwrap(), Nettype::Netpath);
        assert_eq!(Nettype::resolve(Some("udp")).unwrap(), Nettype::Udp);
    }

    #[test]
    fn visible_covers_both_protocols() {
        assert_eq!(Nettype::Visible.protocols(), &[Protocol::Tcp, Protocol::Udp]);
        assert_eq!(Nettype::CircuitN.protocols(), &[Protocol::Tcp]);
        assert_eq!(Nettype::DatagramV.protocols(), &[Protocol::Udp]);
    }

    #[test]
    fn display_matches_parse() {
        for n in [
            Nettype::Netpath,
            Nettype::Visible,
            Nettype::CircuitN,
            Nettype::CircuitV,
            Nettype::DatagramN,
            Nettype::DatagramV,
            Nettype::Tcp,
            Nettype::Udp,
        ] {
            assert_eq!(n.to_string().parse::<Nettype>().unwrap(), n);
        }
    }
}
