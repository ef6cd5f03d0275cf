mod tests {
    use std::net::{SocketAddr, UdpSocket};
    use std::time::Duration;

    use myrtio_strip_output::backend::network::{
        MAX_DATAGRAM_LEN, MAX_PIXELS_PER_DATAGRAM, encode_datagrams, split_changed,
    };
    use myrtio_strip_output::{
        ConfigError, CorrectedFrame, DeviceError, FilterProcessor, NetworkBackend, OutputBackend,
        Rgb, Strip,
    };

    fn gradient(len: usize) -> CorrectedFrame {
        let colors: Vec<Rgb> = (0..len)
            .map(|i| {
                let i = u8::try_from(i % 256).unwrap();
                Rgb {
                    r: i,
                    g: i.wrapping_add(1),
                    b: i.wrapping_add(2),
                }
            })
            .collect();
        CorrectedFrame::from_colors(&colors)
    }

    fn receiver() -> UdpSocket {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        socket
    }

    fn recv(socket: &UdpSocket) -> Vec<u8> {
        let mut buf = [0u8; 1024];
        let len = socket.recv(&mut buf).unwrap();
        buf[..len].to_vec()
    }

    #[test]
    fn test_datagram_layout() {
        let frame = gradient(10);
        let datagrams: Vec<_> = encode_datagrams(&frame, &[2, 7]).unwrap().collect();
        assert_eq!(datagrams.len(), 1);
        assert_eq!(datagrams[0].as_slice(), &[2, 2, 3, 4, 7, 7, 8, 9]);
    }

    #[test]
    fn test_split_is_greedy() {
        let changed: Vec<usize> = (0..300).collect();
        let runs: Vec<usize> = split_changed(&changed).map(<[usize]>::len).collect();
        assert_eq!(runs, [126, 126, 48]);
        assert_eq!(split_changed(&[]).count(), 0);
    }

    #[test]
    fn test_datagrams_are_split_at_capacity() {
        let frame = gradient(256);
        let changed: Vec<usize> = (0..256).collect();
        let datagrams = encode_datagrams(&frame, &changed).unwrap();
        assert_eq!(datagrams.len(), 3);

        let datagrams: Vec<_> = datagrams.collect();
        let lens: Vec<usize> = datagrams.iter().map(|d| d.len()).collect();
        assert_eq!(lens, [MAX_DATAGRAM_LEN, MAX_DATAGRAM_LEN, 16]);

        // entries stay in ascending order across datagrams
        let indices: Vec<u8> = datagrams
            .iter()
            .flat_map(|d| d.chunks_exact(4).map(|entry| entry[0]))
            .collect();
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(indices.len(), 256);
        assert_eq!(datagrams[1][0], u8::try_from(MAX_PIXELS_PER_DATAGRAM).unwrap());
    }

    #[test]
    fn test_exact_multiple_has_no_empty_datagram() {
        let frame = gradient(252);
        let changed: Vec<usize> = (0..252).collect();
        assert_eq!(encode_datagrams(&frame, &changed).unwrap().len(), 2);
        assert_eq!(encode_datagrams(&frame, &[]).unwrap().len(), 0);
    }

    #[test]
    fn test_index_overflow() {
        let frame = gradient(300);
        let result = encode_datagrams(&frame, &[0, 256]);
        assert!(matches!(result, Err(DeviceError::IndexOverflow { index: 256 })));
    }

    #[test]
    fn test_resize_limit() {
        let socket = receiver();
        let mut backend = NetworkBackend::connect(socket.local_addr().unwrap()).unwrap();
        assert!(backend.resize(256).is_ok());
        assert!(matches!(
            backend.resize(257),
            Err(ConfigError::TooManyPixels { count: 257, max: 256, .. })
        ));
    }

    #[test]
    fn test_sends_only_changed_pixels() {
        let socket = receiver();
        let backend = NetworkBackend::connect(socket.local_addr().unwrap()).unwrap();
        let mut strip = Strip::new(backend, FilterProcessor::clamp_only(), 10).unwrap();

        strip.frame_mut().set_pixel(3, [1, 2, 3]);
        strip.update().unwrap();
        assert_eq!(recv(&socket), [3, 1, 2, 3]);

        // nothing changed: nothing is sent
        strip.update().unwrap();

        strip.frame_mut().set_pixel(4, [300, -1, 9]);
        strip.update().unwrap();
        assert_eq!(recv(&socket), [4, 255, 0, 9]);
    }

    #[test]
    fn test_strip_rejects_too_many_pixels() {
        let socket = receiver();
        let backend = NetworkBackend::connect(socket.local_addr().unwrap()).unwrap();
        assert!(Strip::new(backend, FilterProcessor::clamp_only(), 300).is_err());
    }

    #[test]
    fn test_resolve_failure_keeps_cause() {
        let error = NetworkBackend::resolve("bad\0host", 7777).unwrap_err();
        let ConfigError::Address { target, source } = &error else {
            panic!("unexpected error: {error}");
        };
        assert_eq!(target, "bad\0host:7777");
        assert_eq!(source.kind(), std::io::ErrorKind::InvalidInput);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_resolve() {
        let backend = NetworkBackend::resolve("127.0.0.1", 7777).unwrap();
        let expected: SocketAddr = "127.0.0.1:7777".parse().unwrap();
        assert_eq!(backend.target(), expected);
    }
}
