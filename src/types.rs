//! Identifiers, timestamps and the request status enum
use super::error::IdError;
use bech32::{Bech32m, Hrp};
use chrono::{DateTime, TimeZone, Utc};
use std::{fmt, str::FromStr};
use uuid7::{Uuid, uuid7};

// human readable part of every rendered request id
const REQUEST_HRP: Hrp = Hrp::parse_unchecked("sigreq");

/// Identity of a signature request. A UUIDv7 under the hood so ids sort by
/// creation time, rendered as bech32m with the `sigreq` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(Uuid);

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureStatus {
    /// Created but not yet sent
    #[n(0)]
    Draft,
    /// Waiting on the signer
    #[n(1)]
    Sent,
    #[n(2)]
    Signed,
    #[n(3)]
    Expired,
    #[n(4)]
    Cancelled,
    #[n(5)]
    Failed,
}

impl RequestId {
    pub fn new() -> Self {
        Self(uuid7())
    }
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[u8; 16]> for RequestId {
    fn from(bytes: [u8; 16]) -> Self {
        Self(Uuid::from(bytes))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded =
            bech32::encode::<Bech32m>(REQUEST_HRP, self.0.as_bytes()).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl FromStr for RequestId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, data) = bech32::decode(s).map_err(|e| IdError::Malformed(e.to_string()))?;
        if hrp != REQUEST_HRP {
            return Err(IdError::WrongPrefix(hrp.to_string()));
        }
        let bytes: [u8; 16] = data
            .try_into()
            .map_err(|data: Vec<u8>| IdError::WrongLength(data.len()))?;

        Ok(Self::from(bytes))
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl SignatureStatus {
    /// No public operation leads out of these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Signed | Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "Draft",
            Self::Sent => "Sent",
            Self::Signed => "Signed",
            Self::Expired => "Expired",
            Self::Cancelled => "Cancelled",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

impl<C> minicbor::Encode<C> for RequestId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.bytes(self.0.as_bytes())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for RequestId {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let bytes: [u8; 16] = d
            .bytes()?
            .try_into()
            .map_err(|_| minicbor::decode::Error::message("request id must be 16 bytes"))?;

        Ok(RequestId::from(bytes))
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
