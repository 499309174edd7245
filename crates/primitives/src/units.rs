//! Display helpers for wei amounts.
//!
//! Log lines render fees in Gwei and balances in ETH; comparisons always
//! stay in wei.

use alloy::primitives::U256;

const WEI_PER_CENTI_GWEI: u128 = 10_000_000;
const WEI_PER_TENTH_MILLI_ETH: u128 = 100_000_000_000_000;

/// Renders a wei amount in Gwei with two decimal places, e.g. `"52.50 gwei"`.
#[must_use]
pub fn format_gwei(wei: u128) -> String {
    let centi = wei / WEI_PER_CENTI_GWEI;
    format!("{}.{:02} gwei", centi / 100, centi % 100)
}

/// Renders a wei amount in ETH with four decimal places, e.g. `"1.2500 ETH"`.
///
/// Amounts beyond what a `u128` of 0.0001 ETH units can hold saturate.
#[must_use]
pub fn format_eth(wei: U256) -> String {
    let tenth_milli = (wei / U256::from(WEI_PER_TENTH_MILLI_ETH)).saturating_to::<u128>();
    format!("{}.{:04} ETH", tenth_milli / 10_000, tenth_milli % 10_000)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, "0.00 gwei")]
    #[case(1_000_000_000, "1.00 gwei")]
    #[case(52_500_000_000, "52.50 gwei")]
    #[case(1_230_000_000, "1.23 gwei")]
    #[case(999_999_999, "0.99 gwei")]
    #[case(200_000_000_000, "200.00 gwei")]
    fn format_gwei_cases(#[case] wei: u128, #[case] expected: &str) {
        assert_eq!(format_gwei(wei), expected);
    }

    #[rstest]
    #[case(U256::ZERO, "0.0000 ETH")]
    #[case(U256::from(1_000_000_000_000_000_000u128), "1.0000 ETH")]
    #[case(U256::from(1_250_000_000_000_000_000u128), "1.2500 ETH")]
    #[case(U256::from(10_000_000_000_000_000_000u128), "10.0000 ETH")]
    #[case(U256::from(99_999_999_999_999u128), "0.0000 ETH")]
    fn format_eth_cases(#[case] wei: U256, #[case] expected: &str) {
        assert_eq!(format_eth(wei), expected);
    }

    #[test]
    fn format_eth_saturates_on_absurd_balances() {
        let formatted = format_eth(U256::MAX);
        assert!(formatted.ends_with(" ETH"));
    }
}
