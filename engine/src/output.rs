//! Commission output formatting.

use std::io::{BufWriter, Write};

use commission_common::Money;

/// Format a commission with exactly two decimal places, whatever the
/// currency's own granularity (`5 JPY` prints as `5.00`).
pub fn format_commission(commission: &Money) -> String {
    format!("{:.2}", commission.value)
}

/// Write one commission per line, in the given order.
pub fn write_commissions<W: Write>(commissions: &[Money], writer: W) -> std::io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for commission in commissions {
        writeln!(writer, "{}", format_commission(commission))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use commission_common::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_pads_to_two_places() {
        assert_eq!(format_commission(&Money::new(dec!(5), Currency::jpy())), "5.00");
        assert_eq!(format_commission(&Money::new(dec!(0.6), Currency::eur())), "0.60");
        assert_eq!(format_commission(&Money::new(dec!(0.06000), Currency::eur())), "0.06");
        assert_eq!(format_commission(&Money::zero(Currency::usd())), "0.00");
    }

    #[test]
    fn test_writes_one_line_each() {
        let mut buf = Vec::new();
        let commissions = vec![
            Money::new(dec!(0.06), Currency::eur()),
            Money::new(dec!(1.5), Currency::eur()),
            Money::new(dec!(8612), Currency::jpy()),
        ];

        write_commissions(&commissions, &mut buf).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "0.06\n1.50\n8612.00\n");
    }
}
