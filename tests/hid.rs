mod tests {
    use std::sync::{Arc, mpsc};
    use std::thread;
    use std::time::Duration;

    use myrtio_strip_output::backend::hid::MAX_HID_PIXELS;
    use myrtio_strip_output::drivers::blinkstick::{MAX_REPORT_LEN, led_data_report, report_layout};
    use myrtio_strip_output::{
        BackendKind, ConfigError, CorrectedFrame, FilterProcessor, HidBackend, LedDataSink,
        OutputBackend, Rgb, Strip,
    };

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl LedDataSink for Recorder {
        type Error = ();

        fn set_led_data(&mut self, channel: u8, data: &[u8]) -> Result<(), ()> {
            self.writes.push((channel, data.to_vec()));
            Ok(())
        }
    }

    fn writes(backend: &HidBackend<Recorder>) -> Vec<(u8, Vec<u8>)> {
        backend.device().with(|d| d.writes.clone())
    }

    #[test]
    fn test_full_frame_in_grb_order() {
        let mut backend = HidBackend::new(Recorder::default(), 1, 10).unwrap();
        let mut colors = [Rgb::default(); 10];
        colors[0] = Rgb { r: 1, g: 2, b: 3 };
        colors[9] = Rgb { r: 7, g: 8, b: 9 };
        let frame = CorrectedFrame::from_colors(&colors);

        backend.transmit(&frame, &[0]).unwrap();

        let writes = writes(&backend);
        assert_eq!(writes.len(), 1);
        let (channel, data) = &writes[0];
        assert_eq!(*channel, 1);
        assert_eq!(data.len(), 30);
        assert_eq!(&data[..3], &[2, 1, 3]);
        assert_eq!(&data[27..], &[8, 7, 9]);
    }

    #[test]
    fn test_strip_skips_diff() {
        let backend = HidBackend::new(Recorder::default(), 0, 4).unwrap();
        let mut strip = Strip::new(backend, FilterProcessor::clamp_only(), 4).unwrap();
        assert_eq!(strip.backend().kind(), BackendKind::BlinkStick);

        strip.frame_mut().set_pixel(2, [10, 20, 30]);
        strip.update().unwrap();
        assert!(strip.changed().is_empty());

        // unchanged frame is still written in full
        strip.update().unwrap();
        let writes = writes(strip.backend());
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1].1, [0, 0, 0, 0, 0, 0, 20, 10, 30, 0, 0, 0]);
    }

    #[test]
    fn test_blackout_hook() {
        let backend = HidBackend::new(Recorder::default(), 2, 10).unwrap();
        backend.shutdown_hook().blackout().unwrap();

        let writes = writes(&backend);
        assert_eq!(writes, [(2, vec![0; 30])]);
    }

    #[test]
    fn test_timed_blackout() {
        let backend = HidBackend::new(Recorder::default(), 3, 2).unwrap();
        assert!(backend.shutdown_hook().try_blackout(Duration::from_secs(2)));
        assert_eq!(writes(&backend), [(3, vec![0; 6])]);
    }

    #[test]
    fn test_blackout_gives_up_on_busy_device() {
        let backend = HidBackend::new(Recorder::default(), 0, 4).unwrap();
        let device = Arc::clone(backend.device());
        let (entered, busy) = mpsc::channel();
        let writer = thread::spawn(move || {
            device.with(|_| {
                entered.send(()).unwrap();
                thread::sleep(Duration::from_millis(300));
            });
        });

        busy.recv().unwrap();
        assert!(!backend.shutdown_hook().try_blackout(Duration::from_millis(50)));
        writer.join().unwrap();
    }

    #[test]
    fn test_blackout_follows_resize() {
        let mut backend = HidBackend::new(Recorder::default(), 0, 10).unwrap();
        backend.resize(20).unwrap();
        backend.shutdown_hook().blackout().unwrap();
        assert_eq!(writes(&backend)[0].1.len(), 60);
    }

    #[test]
    fn test_pixel_limit() {
        assert!(HidBackend::new(Recorder::default(), 0, MAX_HID_PIXELS).is_ok());
        assert!(matches!(
            HidBackend::new(Recorder::default(), 0, 65),
            Err(ConfigError::TooManyPixels { kind: BackendKind::BlinkStick, count: 65, max: 64 })
        ));

        let mut backend = HidBackend::new(Recorder::default(), 0, 8).unwrap();
        assert!(backend.resize(65).is_err());
        assert_eq!(backend.buffer().len(), 24);
    }

    #[test]
    fn test_report_layout() {
        assert_eq!(report_layout(0), (6, 8));
        assert_eq!(report_layout(24), (6, 8));
        assert_eq!(report_layout(25), (7, 16));
        assert_eq!(report_layout(96), (8, 32));
        assert_eq!(report_layout(97), (9, 64));
    }

    #[test]
    fn test_full_report_per_layout() {
        for (leds, report_id) in [(8, 6), (16, 7), (32, 8), (64, 9)] {
            let data: Vec<u8> = (0..leds * 3)
                .map(|i| u8::try_from(i % 251 + 1).unwrap())
                .collect();
            let report = led_data_report(5, &data);
            assert_eq!(report.len(), 2 + leds * 3);
            assert_eq!(&report[..2], &[report_id, 5]);
            assert_eq!(&report[2..], data.as_slice());
        }
    }

    #[test]
    fn test_led_data_report() {
        let report = led_data_report(1, &[9, 8, 7]);
        assert_eq!(report.len(), 2 + 24);
        assert_eq!(&report[..5], &[6, 1, 9, 8, 7]);
        assert!(report[5..].iter().all(|&b| b == 0));

        let full = led_data_report(0, &[1; 300]);
        assert_eq!(full.len(), MAX_REPORT_LEN);
        assert_eq!(full[0], 9);
        assert!(full[2..].iter().all(|&b| b == 1));
    }
}
