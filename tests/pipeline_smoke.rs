//! End-to-end pipeline tests. Rasterization needs a real monospace font, so
//! each test skips quietly when none is discoverable on the host.

use typereel::{
    chars_per_frame, hold_frames, render_frames, render_frames_with_stats, render_to_gif,
    resolve_font_path, AnimationConfig, ChromeStyle, Rgba8, RenderThreading, RenderToGifOpts,
    Token,
};

fn font_available() -> bool {
    resolve_font_path(None).is_ok()
}

fn small_config() -> AnimationConfig {
    AnimationConfig {
        canvas_width: 240,
        font_size: 12.0,
        speed: 2.0,
        fps: 2,
        ..AnimationConfig::default()
    }
}

fn sample_tokens() -> Vec<Token> {
    vec![
        Token::new("fn ", Some(Rgba8::rgb(255, 121, 198))),
        Token::new("main", Some(Rgba8::rgb(80, 250, 123))),
        Token::plain("() {\n"),
        Token::new("    println!", Some(Rgba8::rgb(139, 233, 253))),
        Token::plain("(\"hi\");\n}"),
    ]
}

fn expected_frame_count(tokens: &[Token], config: &AnimationConfig) -> usize {
    let total = typereel::total_chars(tokens);
    total.div_ceil(chars_per_frame(config.speed)) + 1 + hold_frames(config.fps)
}

#[test]
fn every_frame_shares_one_canvas() {
    if !font_available() {
        return;
    }
    let config = small_config();
    let tokens = sample_tokens();
    let frames = render_frames(&tokens, &config).expect("render");

    assert_eq!(frames.len(), expected_frame_count(&tokens, &config));
    let (w, h) = (frames[0].width, frames[0].height);
    assert!(w > 0 && h > 0);
    for frame in &frames {
        assert_eq!((frame.width, frame.height), (w, h));
        frame.validate().expect("well-formed buffer");
        assert!(frame.premultiplied);
    }
}

#[test]
fn parallel_render_matches_sequential_order() {
    if !font_available() {
        return;
    }
    let config = small_config();
    let tokens = sample_tokens();

    let sequential = render_frames(&tokens, &config).expect("sequential render");
    let (parallel, stats) = render_frames_with_stats(
        &tokens,
        &config,
        &RenderThreading {
            parallel: true,
            threads: Some(2),
            ..RenderThreading::default()
        },
    )
    .expect("parallel render");

    assert_eq!(stats.frames_total as usize, sequential.len());
    assert_eq!(parallel.len(), sequential.len());
    for (i, (a, b)) in sequential.iter().zip(&parallel).enumerate() {
        assert_eq!(a, b, "frame {i} differs between threading modes");
    }
}

#[test]
fn empty_input_renders_only_the_hold() {
    if !font_available() {
        return;
    }
    let config = small_config();
    let frames = render_frames(&[], &config).expect("render");
    assert_eq!(frames.len(), 1 + hold_frames(config.fps));
}

#[test]
fn chrome_and_gutter_grow_the_canvas() {
    if !font_available() {
        return;
    }
    let base = small_config();
    let tokens = sample_tokens();
    let plain = render_frames(&tokens, &base).expect("plain");

    let chrome = AnimationConfig {
        chrome: ChromeStyle::MacOs,
        ..base.clone()
    };
    let with_chrome = render_frames(&tokens, &chrome).expect("chrome");
    assert_eq!(with_chrome[0].width, plain[0].width);
    assert!(with_chrome[0].height > plain[0].height);

    let hidpi = AnimationConfig {
        hidpi: true,
        ..base.clone()
    };
    let doubled = render_frames(&tokens, &hidpi).expect("hidpi");
    assert_eq!(doubled[0].width, plain[0].width * 2);
    assert_eq!(doubled[0].height, plain[0].height * 2);
}

#[test]
fn gif_artifact_is_written_atomically_and_decodes() {
    if !font_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("nested").join("code.gif");

    let config = small_config();
    let tokens = sample_tokens();
    let stats = render_to_gif(&tokens, &config, &out, RenderToGifOpts::default())
        .expect("render to gif");

    assert!(out.exists());
    assert!(!out.with_file_name("code.gif.part").exists());
    assert_eq!(
        stats.frames_total as usize,
        expected_frame_count(&tokens, &config)
    );

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let file = std::fs::File::open(&out).expect("open artifact");
    let mut decoder = options.read_info(file).expect("read info");
    let mut frames = 0usize;
    while let Some(frame) = decoder.read_next_frame().expect("decode") {
        assert_eq!(frame.delay, 50);
        frames += 1;
    }
    assert_eq!(frames, stats.frames_total as usize);
}

#[test]
fn existing_output_is_respected_without_overwrite() {
    if !font_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("code.gif");
    std::fs::write(&out, b"precious").expect("seed file");

    let err = render_to_gif(
        &sample_tokens(),
        &small_config(),
        &out,
        RenderToGifOpts {
            overwrite: false,
            ..RenderToGifOpts::default()
        },
    )
    .expect_err("must refuse to overwrite");
    assert!(err.to_string().contains("already exists"));
    assert_eq!(std::fs::read(&out).expect("intact"), b"precious");
}

#[test]
fn highlighted_lines_and_numbers_render() {
    if !font_available() {
        return;
    }
    let config = AnimationConfig {
        highlighted_lines: typereel::parse_highlight_spec("1,3").expect("spec"),
        line_numbers: true,
        chrome: ChromeStyle::Windows,
        ..small_config()
    };
    let frames = render_frames(&sample_tokens(), &config).expect("render");
    assert!(!frames.is_empty());
}

#[test]
fn missing_font_aborts_before_rendering() {
    let config = AnimationConfig {
        font_path: Some("/definitely/not/a/font.ttf".into()),
        ..small_config()
    };
    let err = render_frames(&sample_tokens(), &config).expect_err("font failure is fatal");
    assert!(matches!(err, typereel::ReelError::Font(_)));
}
