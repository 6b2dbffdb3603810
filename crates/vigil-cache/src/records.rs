use regex::Regex;
use std::net::{IpAddr, SocketAddr};
use std::sync::LazyLock;

use crate::{Error, Result};

/// Nickname reported for relays that never published one.
pub const DEFAULT_NICKNAME: &str = "Unnamed";

static FINGERPRINT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{40}$").unwrap());

static NICKNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,19}$").unwrap());

/// Relay identifier: forty hex digits.
pub fn is_valid_fingerprint(fingerprint: &str) -> bool {
    FINGERPRINT_PATTERN.is_match(fingerprint)
}

/// Relay nickname: one to nineteen ASCII alphanumerics.
pub fn is_valid_nickname(nickname: &str) -> bool {
    NICKNAME_PATTERN.is_match(nickname)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRecord {
    pub fingerprint: String,
    pub address: IpAddr,
    pub or_port: u16,
    pub nickname: String,
}

impl RelayRecord {
    /// Validates raw relay fields, checking fingerprint, nickname, address and
    /// port in that order and failing on the first bad one.
    pub fn new(
        fingerprint: &str,
        address: &str,
        or_port: u16,
        nickname: Option<&str>,
    ) -> Result<Self> {
        let nickname = nickname.unwrap_or(DEFAULT_NICKNAME);

        if !is_valid_fingerprint(fingerprint) {
            return Err(Error::InvalidFingerprint(fingerprint.to_string()));
        }

        if !is_valid_nickname(nickname) {
            return Err(Error::InvalidNickname(nickname.to_string()));
        }

        let address: IpAddr = address
            .parse()
            .map_err(|_| Error::InvalidAddress(address.to_string()))?;

        if or_port == 0 {
            return Err(Error::InvalidPort(or_port));
        }

        Ok(Self {
            fingerprint: fingerprint.to_ascii_uppercase(),
            address,
            or_port,
            nickname: nickname.to_string(),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.or_port)
    }
}
