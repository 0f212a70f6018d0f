mod tests {
    use myrtio_pulse_stream::{OverrunError, PulseCode, SendBuffer};

    const CAPACITY: usize = 8;

    fn code(tag: u16) -> PulseCode {
        PulseCode::high_low(tag, 1)
    }

    fn assert_invariants(ring: &SendBuffer<CAPACITY>) {
        let used = ring.available_to_drain();
        assert!(used <= CAPACITY);
        assert_eq!(ring.available_to_fill() + used, CAPACITY);
        assert_eq!(
            ring.write_index().wrapping_sub(ring.read_index()) % CAPACITY,
            used % CAPACITY
        );
    }

    #[test]
    fn test_indices_track_used_slots() {
        let mut ring = SendBuffer::<CAPACITY>::new();
        let mut next_tag = 0u16;
        let mut expected_tag = 0u16;
        // Linear congruential sequence of fill and drain steps
        let mut seed = 0x1234_5678u32;

        for _ in 0..2000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let amount = ((seed >> 16) as usize) % (CAPACITY + 1);
            if seed & 1 == 0 {
                let room = ring.available_to_fill();
                for _ in 0..amount.min(room) {
                    ring.write(code(next_tag)).unwrap();
                    next_tag = next_tag.wrapping_add(1) & 0x7FFF;
                }
            } else {
                for _ in 0..amount.min(ring.available_to_drain()) {
                    assert_eq!(ring.pop(), Some(code(expected_tag)));
                    expected_tag = expected_tag.wrapping_add(1) & 0x7FFF;
                }
            }
            assert_invariants(&ring);
        }
    }

    #[test]
    fn test_reset_empties_buffer() {
        let mut ring = SendBuffer::<CAPACITY>::new();
        for tag in 0..5 {
            ring.write(code(tag)).unwrap();
        }
        ring.consume(2);

        ring.reset();
        assert_eq!(ring.available_to_drain(), 0);
        assert_eq!(ring.available_to_fill(), CAPACITY);
        assert_eq!(ring.write_index(), 0);
        assert_eq!(ring.read_index(), 0);

        ring.reset();
        assert_eq!(ring.available_to_drain(), 0);
    }

    #[test]
    fn test_write_on_full_buffer_overruns() {
        let mut ring = SendBuffer::<CAPACITY>::new();
        for tag in 0..CAPACITY as u16 {
            ring.write(code(tag)).unwrap();
        }
        assert_eq!(ring.available_to_fill(), 0);
        assert_eq!(ring.write(code(99)), Err(OverrunError));
        assert_eq!(ring.available_to_drain(), CAPACITY);
        assert_eq!(ring.pop(), Some(code(0)));
    }

    #[test]
    fn test_consume_is_clamped() {
        let mut ring = SendBuffer::<CAPACITY>::new();
        ring.write(code(1)).unwrap();
        ring.consume(5);
        assert!(ring.is_empty());
        assert_eq!(ring.read_index(), ring.write_index());
    }
}
