mod tests {
    use myrtio_strip_output::{
        BackendKind, ConfigError, CorrectedFrame, DeviceError, DirectBackend, FilterProcessor,
        OutputBackend, Rgb, Strip,
    };
    use smart_leds::SmartLedsWrite;

    /// Backend that records every transmit
    #[derive(Default)]
    struct Recorder {
        sent: Vec<Vec<usize>>,
        frames: Vec<CorrectedFrame>,
        fail: bool,
        max: Option<usize>,
    }

    impl OutputBackend for Recorder {
        fn kind(&self) -> BackendKind {
            BackendKind::Esp8266
        }

        fn resize(&mut self, pixel_count: usize) -> Result<(), ConfigError> {
            match self.max {
                Some(max) if pixel_count > max => Err(ConfigError::TooManyPixels {
                    kind: self.kind(),
                    count: pixel_count,
                    max,
                }),
                _ => Ok(()),
            }
        }

        fn transmit(
            &mut self,
            frame: &CorrectedFrame,
            changed: &[usize],
        ) -> Result<(), DeviceError> {
            if self.fail {
                return Err(DeviceError::Strip("unplugged".into()));
            }
            self.sent.push(changed.to_vec());
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn strip(pixels: usize) -> Strip<Recorder> {
        Strip::new(Recorder::default(), FilterProcessor::clamp_only(), pixels).unwrap()
    }

    #[test]
    fn test_initial_frame_is_black() {
        let mut strip = strip(8);
        assert_eq!(strip.pixel_count(), 8);
        strip.update().unwrap();
        assert!(strip.changed().is_empty());
        assert_eq!(strip.backend().sent, [Vec::<usize>::new()]);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut strip = strip(8);
        strip.frame_mut().set_pixel(5, [1, 1, 1]);
        strip.update().unwrap();
        assert_eq!(strip.changed(), &[5]);

        strip.update().unwrap();
        assert!(strip.changed().is_empty());
    }

    #[test]
    fn test_clamped_values_compare_equal() {
        let mut strip = strip(2);
        strip.frame_mut().set_pixel(0, [300, 0, 0]);
        strip.update().unwrap();

        // clamps to the same corrected value as before
        strip.frame_mut().set_pixel(0, [1000, -4, 0]);
        strip.update().unwrap();
        assert!(strip.changed().is_empty());
        assert_eq!(strip.corrected().pixel(0), Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn test_failed_transmit_is_retried() {
        let mut strip = strip(4);
        strip.frame_mut().set_pixel(1, [9, 9, 9]);
        strip.backend_mut().fail = true;
        assert!(matches!(strip.update(), Err(DeviceError::Strip(_))));

        strip.backend_mut().fail = false;
        strip.update().unwrap();
        assert_eq!(strip.changed(), &[1]);
        assert_eq!(strip.backend().sent, [vec![1]]);
    }

    #[test]
    fn test_grow_resends_every_pixel() {
        let mut strip = strip(10);
        strip.frame_mut().fill(Rgb { r: 4, g: 5, b: 6 });
        strip.update().unwrap();

        strip.set_pixel_count(15).unwrap();
        assert_eq!(strip.frame().len(), 15);
        assert_eq!(strip.frame().pixel(3), Some([4, 5, 6]));
        assert_eq!(strip.frame().pixel(12), Some([0, 0, 0]));

        strip.update().unwrap();
        assert_eq!(strip.changed(), (0..15).collect::<Vec<_>>().as_slice());
        assert!(strip.changed().ends_with(&[10, 11, 12, 13, 14]));

        strip.update().unwrap();
        assert!(strip.changed().is_empty());
    }

    #[test]
    fn test_shrink_resends_every_pixel() {
        let mut strip = strip(10);
        strip.frame_mut().fill(Rgb { r: 1, g: 2, b: 3 });
        strip.update().unwrap();

        strip.set_pixel_count(5).unwrap();
        strip.update().unwrap();
        assert_eq!(strip.changed(), &[0, 1, 2, 3, 4]);
        assert_eq!(strip.corrected().len(), 5);
        assert_eq!(strip.corrected().pixel(4), Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_same_count_keeps_previous() {
        let mut strip = strip(4);
        strip.frame_mut().fill(Rgb { r: 1, g: 1, b: 1 });
        strip.update().unwrap();

        strip.set_pixel_count(4).unwrap();
        strip.update().unwrap();
        assert!(strip.changed().is_empty());
    }

    #[test]
    fn test_rejected_resize_keeps_state() {
        let backend = Recorder {
            max: Some(16),
            ..Recorder::default()
        };
        let mut strip = Strip::new(backend, FilterProcessor::clamp_only(), 8).unwrap();
        assert!(strip.set_pixel_count(17).is_err());
        assert_eq!(strip.pixel_count(), 8);
        assert_eq!(strip.frame().len(), 8);
    }

    #[test]
    fn test_frame_length_self_heals() {
        let mut strip = strip(6);
        strip.frame_mut().resize(2);
        strip.update().unwrap();
        assert_eq!(strip.frame().len(), 6);
        assert_eq!(strip.backend().frames[0].len(), 6);
    }

    #[test]
    fn test_gamma_runs_before_diff() {
        let mut strip = Strip::new(Recorder::default(), FilterProcessor::default(), 3).unwrap();
        // 1 maps to 0 on the WS2812 curve
        strip.frame_mut().set_pixel(0, [1, 1, 1]);
        strip.update().unwrap();
        assert!(strip.changed().is_empty());
    }

    /// Strip driver that records flushed frames
    #[derive(Default)]
    struct MockWriter {
        frames: Vec<Vec<Rgb>>,
    }

    impl SmartLedsWrite for MockWriter {
        type Error = ();
        type Color = Rgb;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            self.frames.push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    #[test]
    fn test_direct_backend_flushes_whole_strip() {
        let backend = DirectBackend::new(MockWriter::default(), 3, 255);
        let mut strip = Strip::new(backend, FilterProcessor::clamp_only(), 3).unwrap();
        assert_eq!(strip.backend().kind(), BackendKind::Pi);

        strip.frame_mut().set_pixel(1, [10, 20, 30]);
        strip.update().unwrap();
        strip.frame_mut().set_pixel(2, [1, 2, 3]);
        strip.update().unwrap();

        let frames = &strip.backend().writer().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(
            frames[1],
            [
                Rgb { r: 0, g: 0, b: 0 },
                Rgb { r: 10, g: 20, b: 30 },
                Rgb { r: 1, g: 2, b: 3 },
            ]
        );
    }

    #[test]
    fn test_direct_backend_brightness() {
        let mut backend = DirectBackend::new(MockWriter::default(), 2, 0);
        backend
            .transmit(&CorrectedFrame::from_colors(&[Rgb { r: 200, g: 100, b: 50 }; 2]), &[0, 1])
            .unwrap();
        assert_eq!(backend.leds()[0], Rgb { r: 200, g: 100, b: 50 });
        assert_eq!(backend.writer().frames[0], [Rgb::default(); 2]);

        backend.set_brightness(255);
        backend.flush().unwrap();
        assert_eq!(backend.writer().frames[1], [Rgb { r: 200, g: 100, b: 50 }; 2]);
    }

    #[test]
    fn test_direct_backend_resize() {
        let mut backend = DirectBackend::new(MockWriter::default(), 2, 255);
        backend.resize(5).unwrap();
        assert_eq!(backend.leds().len(), 5);
    }

    #[test]
    fn test_direct_backend_capacity() {
        let backend = DirectBackend::new(MockWriter::default(), 4, 255).with_capacity(4);
        let mut strip = Strip::new(backend, FilterProcessor::clamp_only(), 4).unwrap();

        assert!(matches!(
            strip.set_pixel_count(6),
            Err(ConfigError::TooManyPixels { kind: BackendKind::Pi, count: 6, max: 4 })
        ));
        assert_eq!(strip.pixel_count(), 4);
        assert_eq!(strip.backend().leds().len(), 4);

        strip.set_pixel_count(2).unwrap();
        strip.update().unwrap();
        assert_eq!(strip.backend().writer().frames[0].len(), 2);
    }

    #[test]
    fn test_direct_backend_capacity_at_start() {
        let backend = DirectBackend::new(MockWriter::default(), 8, 255).with_capacity(4);
        assert!(Strip::new(backend, FilterProcessor::clamp_only(), 8).is_err());
    }
}
