use typereel::{
    blink_interval, chars_per_frame, hold_frames, schedule, total_chars, AnimationConfig, Rgba8,
    Token,
};

fn config(speed: f64, fps: u32) -> AnimationConfig {
    AnimationConfig {
        speed,
        fps,
        ..AnimationConfig::default()
    }
}

#[test]
fn chars_per_frame_property_sweep() {
    for (speed, expected) in [(0.0, 1), (0.1, 1), (1.0, 2), (10.0, 20)] {
        assert_eq!(chars_per_frame(speed), expected, "speed {speed}");
    }
}

#[test]
fn scheduler_length_closed_form_across_inputs() {
    for total in [0usize, 1, 2, 3, 99, 100, 1000] {
        for (speed, fps) in [(0.5, 10), (1.0, 30), (3.3, 24)] {
            let cfg = config(speed, fps);
            let frames = schedule(total, &cfg);
            let typing = total.div_ceil(chars_per_frame(speed)) + 1;
            assert_eq!(
                frames.len(),
                typing + hold_frames(fps),
                "total {total}, speed {speed}, fps {fps}"
            );
        }
    }
}

#[test]
fn reveal_never_regresses_or_overshoots() {
    let cfg = config(2.5, 30);
    let frames = schedule(777, &cfg);
    let mut last = 0;
    for frame in &frames {
        assert!(frame.reveal >= last);
        assert!(frame.reveal <= 777);
        last = frame.reveal;
    }
    assert_eq!(last, 777);
}

#[test]
fn tokenized_end_to_end_scenario() {
    // [("ab", red), ("\nc", blue)]: 3 visible chars, one newline.
    let tokens = vec![
        Token::new("ab", Some(Rgba8::rgb(255, 0, 0))),
        Token::new("\nc", Some(Rgba8::rgb(0, 0, 255))),
    ];
    let total = total_chars(&tokens);
    assert_eq!(total, 3);

    let cfg = config(1.0, 2);
    let frames = schedule(total, &cfg);
    let reveals: Vec<usize> = frames.iter().map(|f| f.reveal).collect();
    assert_eq!(reveals, vec![0, 2, 3, 3, 3, 3, 3]);
    assert_eq!(frames.len(), 7);
    assert!(frames[3..].iter().all(|f| !f.cursor_visible));
}

#[test]
fn blink_interval_is_half_a_second_of_frames() {
    assert_eq!(blink_interval(30), 15);
    assert_eq!(blink_interval(2), 1);
    assert_eq!(blink_interval(1), 1);

    let cfg = config(0.1, 30);
    let frames = schedule(90, &cfg);
    let typing = 90usize.div_ceil(1) + 1;
    let states: Vec<bool> = frames[..typing].iter().map(|f| f.cursor_visible).collect();
    for (i, pair) in states.windows(2).enumerate() {
        let toggled = pair[0] != pair[1];
        assert_eq!(toggled, (i + 1) % 15 == 0, "between frames {i} and {}", i + 1);
    }
}
