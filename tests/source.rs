mod tests {
    use myrtio_pulse_stream::{ColorOrder, DataSource, Rgb, RgbSource, SliceSource};

    fn drain(source: &mut impl DataSource) -> Vec<u32> {
        core::iter::from_fn(|| source.next_intensity_value()).collect()
    }

    #[test]
    fn test_rgb_source_uses_wire_order() {
        let pixels = [Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)];
        let mut source = RgbSource::new(&pixels, ColorOrder::default());

        assert!(source.more_data_available());
        assert_eq!(drain(&mut source), [2, 1, 3, 5, 4, 6]);
        assert!(!source.more_data_available());
    }

    #[test]
    fn test_color_orders() {
        let color = Rgb::new(10, 20, 30);
        assert_eq!(ColorOrder::Rgb.components(color), [10, 20, 30]);
        assert_eq!(ColorOrder::Grb.components(color), [20, 10, 30]);
        assert_eq!(ColorOrder::Brg.components(color), [30, 10, 20]);
        assert_eq!(ColorOrder::Rbg.components(color), [10, 30, 20]);
        assert_eq!(ColorOrder::Gbr.components(color), [20, 30, 10]);
        assert_eq!(ColorOrder::Bgr.components(color), [30, 20, 10]);
    }

    #[test]
    fn test_rgb_source_rewinds_each_frame() {
        let pixels = [Rgb::new(9, 8, 7)];
        let mut source = RgbSource::new(&pixels, ColorOrder::Rgb);

        assert_eq!(drain(&mut source), [9, 8, 7]);
        source.on_frame_start();
        assert_eq!(drain(&mut source), [9, 8, 7]);

        let replaced = [Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)];
        source.set_pixels(&replaced);
        assert_eq!(drain(&mut source).len(), 6);
    }

    #[test]
    fn test_slice_source() {
        let mut source = SliceSource::new(&[0x00, 0x7F, 0xFF]);
        assert_eq!(source.next_intensity_value(), Some(0));
        assert_eq!(source.position(), 1);
        assert_eq!(drain(&mut source), [0x7F, 0xFF]);
        assert_eq!(source.next_intensity_value(), None);

        source.on_frame_start();
        assert_eq!(source.position(), 0);
        assert!(source.more_data_available());

        source.set_data(&[]);
        assert!(!source.more_data_available());
    }

    #[test]
    fn test_mutable_reference_is_a_source() {
        let mut inner = SliceSource::new(&[5]);
        {
            let mut borrowed = &mut inner;
            assert_eq!(drain(&mut borrowed), [5]);
        }
        assert_eq!(inner.position(), 1);
    }
}
