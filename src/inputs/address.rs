use alloy_primitives::U256;

use super::AssemblyError;

/// Convert a hex address (optional `0x` prefix) to its decimal string.
///
/// Bytes are read big-endian. An odd digit count is left-padded with one
/// zero nibble. Values wider than 256 bits are rejected.
pub fn address_to_decimal(address: &str) -> Result<String, AssemblyError> {
    let invalid = |reason: &str| AssemblyError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    if digits.is_empty() {
        return Err(invalid("no hex digits"));
    }

    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    let bytes = hex::decode(&padded).map_err(|e| invalid(&e.to_string()))?;
    let value = U256::try_from_be_slice(&bytes).ok_or_else(|| invalid("wider than 256 bits"))?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one() {
        let addr = format!("0x{}1", "0".repeat(39));
        assert_eq!(address_to_decimal(&addr).unwrap(), "1");
    }

    #[test]
    fn ethereum_address() {
        assert_eq!(
            address_to_decimal("0xffffffffffffffffffffffffffffffffffffffff").unwrap(),
            "1461501637330902918203684832716283019655932542975"
        );
    }

    #[test]
    fn without_prefix_and_mixed_case() {
        assert_eq!(address_to_decimal("0A").unwrap(), "10");
        assert_eq!(address_to_decimal("0XfF").unwrap(), "255");
    }

    #[test]
    fn odd_length_is_padded() {
        assert_eq!(address_to_decimal("0x100").unwrap(), "256");
    }

    #[test]
    fn all_zero_is_zero() {
        assert_eq!(address_to_decimal("0x0000").unwrap(), "0");
    }

    #[test]
    fn non_hex_is_invalid() {
        let err = address_to_decimal("0xnothex").unwrap_err();
        match err {
            AssemblyError::InvalidAddress { address, .. } => assert_eq!(address, "0xnothex"),
            other => panic!("expected InvalidAddress, got {other:?}"),
        }
    }

    #[test]
    fn empty_is_invalid() {
        assert!(matches!(
            address_to_decimal("0x"),
            Err(AssemblyError::InvalidAddress { .. })
        ));
        assert!(matches!(
            address_to_decimal(""),
            Err(AssemblyError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn too_wide_is_invalid() {
        let addr = format!("0x01{}", "00".repeat(32));
        assert!(matches!(
            address_to_decimal(&addr),
            Err(AssemblyError::InvalidAddress { .. })
        ));
    }
}
