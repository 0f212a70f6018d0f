mod common;

mod tests {
    use myrtio_pulse_stream::translation::{WS2811_T0H_NS, WS2811_T1H_NS};
    use myrtio_pulse_stream::{
        BitSymbol, ConfigurationError, Level, PulseCode, TranslationEntry, TranslationTable,
    };

    use crate::common::{GAP, ONE, ZERO, entries};

    #[test]
    fn test_missing_table() {
        assert_eq!(
            TranslationTable::configure(None),
            Err(ConfigurationError::MissingTable)
        );
    }

    #[test]
    fn test_data_bits_are_mandatory() {
        let only_zero = [TranslationEntry::new(BitSymbol::Zero, ZERO)];
        assert_eq!(
            TranslationTable::configure(Some(&only_zero)),
            Err(ConfigurationError::MissingTranslation(BitSymbol::One))
        );
    }

    #[test]
    fn test_lookup_after_configure() {
        let table = TranslationTable::configure(Some(&entries())).unwrap();
        assert_eq!(table.lookup(BitSymbol::Zero), ZERO);
        assert_eq!(table.lookup(BitSymbol::One), ONE);
        assert_eq!(table.lookup(BitSymbol::InterframeGap), GAP);
        for symbol in BitSymbol::ALL {
            assert!(table.is_installed(symbol));
            assert!(table.require(symbol).is_ok());
        }
    }

    #[test]
    fn test_framing_symbols_are_optional_until_required() {
        let data_only = [
            TranslationEntry::new(BitSymbol::Zero, ZERO),
            TranslationEntry::new(BitSymbol::One, ONE),
        ];
        let table = TranslationTable::configure(Some(&data_only)).unwrap();
        assert_eq!(table.get(BitSymbol::Stop), None);
        assert_eq!(
            table.require(BitSymbol::Stop),
            Err(ConfigurationError::MissingTranslation(BitSymbol::Stop))
        );
    }

    #[test]
    fn test_validate_reports_mismatches() {
        let mut table = TranslationTable::configure(Some(&entries())).unwrap();
        assert_eq!(table.validate(&entries()), 0);

        // Only the superseded first entry disagrees with the installed table
        let duplicated = [
            TranslationEntry::new(BitSymbol::Zero, PulseCode::high_low(1, 1)),
            TranslationEntry::new(BitSymbol::Zero, ZERO),
            TranslationEntry::new(BitSymbol::One, ONE),
        ];
        let mut table = TranslationTable::configure(Some(&duplicated)).unwrap();
        assert_eq!(table.validate(&duplicated), 1);
        // Re-applying keeps last-one-wins, so a second pass sees the same
        assert_eq!(table.lookup(BitSymbol::Zero), ZERO);
        assert_eq!(table.validate(&duplicated), 1);
    }

    #[test]
    fn test_validate_reinstalls_diverging_codes() {
        let mut table = TranslationTable::configure(Some(&entries())).unwrap();
        let slower = PulseCode::high_low(40, 40);
        let replacement = [
            TranslationEntry::new(BitSymbol::One, slower),
            TranslationEntry::new(BitSymbol::Zero, ZERO),
        ];

        assert_eq!(table.validate(&replacement), 1);
        assert_eq!(table.lookup(BitSymbol::One), slower);
        assert_eq!(table.validate(&replacement), 0);
        assert_eq!(table.lookup(BitSymbol::InterframeGap), GAP);
    }

    #[test]
    fn test_ws2811_preset() {
        let table = TranslationTable::ws2811(40_000_000);
        // 25 ns per tick
        assert_eq!(
            table.lookup(BitSymbol::Zero).duration0,
            (WS2811_T0H_NS / 25) as u16
        );
        assert_eq!(
            table.lookup(BitSymbol::One).duration0,
            (WS2811_T1H_NS / 25) as u16
        );
        assert_eq!(table.lookup(BitSymbol::One).level0, Level::High);
        let gap = table.lookup(BitSymbol::InterframeGap);
        assert_eq!(gap.level0, Level::Low);
        assert_eq!(gap.total_ticks(), 12_000);
        assert!(!table.is_installed(BitSymbol::Stop));
    }
}
