//! Client side validation of sarcophagus creation inputs.

use crate::*;
use std::sync::Arc;

/// Settings for a new sarcophagus, in contract argument order.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SarcophagusSettings {
    /// Human readable name.
    pub name: Arc<str>,

    /// Address allowed to resurrect the payload.
    pub recipient_address: Arc<str>,

    /// Creation time, unix seconds.
    pub creation_time: i64,

    /// Initial resurrection time, unix seconds.
    pub resurrection_time: i64,

    /// Number of archaeologist keys required to resurrect.
    pub threshold: u8,

    /// Maximum seconds a single rewrap may extend the deadline by.
    pub maximum_rewrap_interval: i64,

    /// Resurrection time may never be pushed beyond this.
    pub maximum_resurrection_time: i64,
}

/// A selected archaeologist, with the signed curse parameters they
/// returned during negotiation.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ArchaeologistSettings {
    /// Archaeologist account address.
    pub archaeologist_address: Arc<str>,

    /// Public key the payload shard is encrypted to.
    pub public_key: Arc<str>,

    /// Digging fee, token base units per second.
    pub digging_fee_per_second: TokenAmount,

    /// Flat curse fee, token base units.
    pub curse_fee: TokenAmount,

    /// Signature recovery id.
    pub v: u8,

    /// Signature r component, 32 byte hex.
    pub r: Arc<str>,

    /// Signature s component, 32 byte hex.
    pub s: Arc<str>,
}

fn decode_hex_field(field: &str, value: &str) -> SarcoResult<Vec<u8>> {
    let digits = value.strip_prefix("0x").ok_or_else(|| {
        validation_err(format!("{field} must be 0x-prefixed hex: {value:?}"))
    })?;
    hex::decode(digits).map_err(|e| {
        validation_err(format!("{field} is not valid hex ({e}): {value:?}"))
    })
}

fn check_hex_len(field: &str, value: &str, len: usize) -> SarcoResult<()> {
    let bytes = decode_hex_field(field, value)?;
    if bytes.len() != len {
        return Err(validation_err(format!(
            "{field} must be {len} bytes, got {}",
            bytes.len(),
        )));
    }
    Ok(())
}

/// Validate an account address: 0x followed by 20 hex-encoded bytes.
pub fn validate_address(field: &str, address: &str) -> SarcoResult<()> {
    check_hex_len(field, address, 20)
}

impl SarcophagusSettings {
    /// Validate these settings.
    pub fn validate(&self) -> SarcoResult<()> {
        if self.name.trim().is_empty() {
            return Err(validation_err("name is required"));
        }
        validate_address("recipientAddress", &self.recipient_address)?;
        if self.threshold == 0 {
            return Err(validation_err("threshold must be at least 1"));
        }
        if self.resurrection_time <= self.creation_time {
            return Err(validation_err(
                "resurrectionTime must be after creationTime",
            ));
        }
        if self.resurrection_time > self.maximum_resurrection_time {
            return Err(validation_err(
                "resurrectionTime must not exceed maximumResurrectionTime",
            ));
        }
        if self.maximum_rewrap_interval <= 0 {
            return Err(validation_err(
                "maximumRewrapInterval must be positive",
            ));
        }
        Ok(())
    }
}

impl ArchaeologistSettings {
    /// Validate these settings.
    pub fn validate(&self) -> SarcoResult<()> {
        validate_address("archaeologistAddress", &self.archaeologist_address)?;
        if self.public_key.trim().is_empty() {
            return Err(validation_err("publicKey is required"));
        }
        check_hex_len("r", &self.r, 32)?;
        check_hex_len("s", &self.s, 32)?;
        Ok(())
    }
}

/// Validate a full sarcophagus creation request.
pub fn validate_create(
    settings: &SarcophagusSettings,
    archaeologists: &[ArchaeologistSettings],
) -> SarcoResult<()> {
    settings.validate()?;
    for arch in archaeologists {
        arch.validate()?;
    }
    if archaeologists.len() < settings.threshold as usize {
        return Err(validation_err("Not enough archaeologists selected"));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn valid_create() {
        validate_create(&settings(2), &[arch(1), arch(2)]).unwrap();
        validate_create(&settings(1), &[arch(1), arch(2)]).unwrap();
    }

    #[test]
    fn not_enough_archaeologists() {
        let err = validate_create(&settings(3), &[arch(1), arch(2)]).unwrap_err();
        assert_eq!(VALIDATION_ERROR, err.str_kind());
    }

    #[test]
    fn bad_settings() {
        let mut s = settings(1);
        s.name = "  ".into();
        assert!(s.validate().is_err());

        let mut s = settings(1);
        s.threshold = 0;
        assert!(s.validate().is_err());

        let mut s = settings(1);
        s.resurrection_time = s.creation_time;
        assert!(s.validate().is_err());

        let mut s = settings(1);
        s.resurrection_time = s.maximum_resurrection_time + 1;
        assert!(s.validate().is_err());

        let mut s = settings(1);
        s.maximum_rewrap_interval = 0;
        assert!(s.validate().is_err());

        let mut s = settings(1);
        s.recipient_address = "0x1234".into();
        assert!(s.validate().is_err());
    }

    #[test]
    fn bad_archaeologist() {
        let mut a = arch(1);
        a.archaeologist_address = addr(1).replace("0x", "").into();
        assert!(a.validate().is_err());

        let mut a = arch(1);
        a.public_key = "".into();
        assert!(a.validate().is_err());

        let mut a = arch(1);
        a.r = "0xzz".into();
        assert!(a.validate().is_err());

        let mut a = arch(1);
        a.s = "0x00".into();
        assert!(a.validate().is_err());
    }

    #[test]
    fn address_check() {
        validate_address("a", &addr(7)).unwrap();
        validate_address("a", &addr(7).to_uppercase().replace("0X", "0x"))
            .unwrap();
        let err = validate_address("a", "0xnothex").unwrap_err();
        assert_eq!(VALIDATION_ERROR, err.str_kind());
    }
}
